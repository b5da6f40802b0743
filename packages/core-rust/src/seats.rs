//! Seat count derivation from the selected bus type.
//!
//! The seat selector is never edited directly. Its only option is the seat
//! count of the currently selected bus type, and it is empty when no bus type
//! is selected.

use crate::reference::BusTypeRef;

/// Derived seat-count selection: at most one option, always read-only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeatSelection(Option<u32>);

impl SeatSelection {
    /// Applies the cascading rule for a bus type change.
    #[must_use]
    pub fn for_bus_type(bus_type: Option<&BusTypeRef>) -> Self {
        Self(bus_type.map(|b| b.seat_count))
    }

    /// The single derived option, if any.
    #[must_use]
    pub fn value(self) -> Option<u32> {
        self.0
    }

    /// The option set presented to the selector (zero or one entries).
    #[must_use]
    pub fn options(self) -> Vec<u32> {
        self.0.into_iter().collect()
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.0.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bus_type_yields_singleton() {
        let semi = BusTypeRef::new("Semi-Luxury", 45);
        let seats = SeatSelection::for_bus_type(Some(&semi));
        assert_eq!(seats.options(), vec![45]);
        assert_eq!(seats.value(), Some(45));
    }

    #[test]
    fn no_bus_type_clears_selection() {
        let seats = SeatSelection::for_bus_type(None);
        assert!(seats.is_empty());
        assert!(seats.options().is_empty());
    }

    #[test]
    fn reselecting_replaces_previous_option() {
        let ordinary = BusTypeRef::new("Ordinary", 52);
        let semi = BusTypeRef::new("Semi-Luxury", 45);
        let first = SeatSelection::for_bus_type(Some(&ordinary));
        let second = SeatSelection::for_bus_type(Some(&semi));
        assert_eq!(first.options(), vec![52]);
        assert_eq!(second.options(), vec![45]);
    }
}
