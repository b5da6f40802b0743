//! Route form state: everything the operator has entered for one route.
//!
//! The form holds free-text metadata, the depot and bus type selections, the
//! operating days, and the stage rows. Reference data is injected at
//! construction and shared by every form created in the session, so
//! [`RouteFormState::reset`] can produce a fresh form without reloading it.

use std::str::FromStr;
use std::sync::Arc;

use crate::days::OperatingDaySet;
use crate::reference::{BusTypeRef, DepotRef, ReferenceDataCache};
use crate::seats::SeatSelection;
use crate::stages::StageRowCollection;

/// Free-text route metadata fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteField {
    RouteNo,
    RouteName,
    SourceEn,
    /// Source stop name in the local language.
    SourceLocal,
    DestinationEn,
    /// Destination stop name in the local language.
    DestinationLocal,
    /// Departure time, entered as `HH:MM`. Not parsed.
    ScheduledTime,
}

impl RouteField {
    /// All metadata fields in form order.
    pub const ALL: [RouteField; 7] = [
        RouteField::RouteNo,
        RouteField::RouteName,
        RouteField::SourceEn,
        RouteField::SourceLocal,
        RouteField::DestinationEn,
        RouteField::DestinationLocal,
        RouteField::ScheduledTime,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            RouteField::RouteNo => "Route No.",
            RouteField::RouteName => "Route Name",
            RouteField::SourceEn => "Source En",
            RouteField::SourceLocal => "Source Mr",
            RouteField::DestinationEn => "Destination En",
            RouteField::DestinationLocal => "Destination Mr",
            RouteField::ScheduledTime => "Scheduled Time",
        }
    }
}

impl FromStr for RouteField {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.label() == s)
            .ok_or_else(|| FormError::UnknownField(s.to_string()))
    }
}

/// Errors from form edits that reference something outside the loaded sets.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("unknown depot code: {0}")]
    UnknownDepot(String),
    #[error("unknown bus type: {0}")]
    UnknownBusType(String),
    #[error("unknown route field: {0}")]
    UnknownField(String),
}

/// Composite route being edited.
///
/// Seat count is not stored: [`RouteFormState::seats`] derives it from the
/// selected bus type every time it is read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteFormState {
    reference: Arc<ReferenceDataCache>,
    route_no: String,
    route_name: String,
    source_en: String,
    source_local: String,
    destination_en: String,
    destination_local: String,
    scheduled_time: String,
    selected_depot: Option<DepotRef>,
    selected_bus_type: Option<BusTypeRef>,
    operating_days: OperatingDaySet,
    stages: StageRowCollection,
}

impl RouteFormState {
    /// Creates an empty form backed by the session's reference data.
    #[must_use]
    pub fn new(reference: Arc<ReferenceDataCache>) -> Self {
        Self {
            reference,
            route_no: String::new(),
            route_name: String::new(),
            source_en: String::new(),
            source_local: String::new(),
            destination_en: String::new(),
            destination_local: String::new(),
            scheduled_time: String::new(),
            selected_depot: None,
            selected_bus_type: None,
            operating_days: OperatingDaySet::new(),
            stages: StageRowCollection::new(),
        }
    }

    /// Replaces this form with a fresh empty one sharing the same reference data.
    pub fn reset(&mut self) {
        *self = Self::new(Arc::clone(&self.reference));
    }

    /// Returns `true` if the form equals a freshly created one.
    #[must_use]
    pub fn is_pristine(&self) -> bool {
        *self == Self::new(Arc::clone(&self.reference))
    }

    #[must_use]
    pub fn reference(&self) -> &ReferenceDataCache {
        &self.reference
    }

    // -- metadata -----------------------------------------------------------

    pub fn set_field(&mut self, field: RouteField, value: impl Into<String>) {
        *self.slot(field) = value.into();
    }

    #[must_use]
    pub fn field(&self, field: RouteField) -> &str {
        match field {
            RouteField::RouteNo => &self.route_no,
            RouteField::RouteName => &self.route_name,
            RouteField::SourceEn => &self.source_en,
            RouteField::SourceLocal => &self.source_local,
            RouteField::DestinationEn => &self.destination_en,
            RouteField::DestinationLocal => &self.destination_local,
            RouteField::ScheduledTime => &self.scheduled_time,
        }
    }

    fn slot(&mut self, field: RouteField) -> &mut String {
        match field {
            RouteField::RouteNo => &mut self.route_no,
            RouteField::RouteName => &mut self.route_name,
            RouteField::SourceEn => &mut self.source_en,
            RouteField::SourceLocal => &mut self.source_local,
            RouteField::DestinationEn => &mut self.destination_en,
            RouteField::DestinationLocal => &mut self.destination_local,
            RouteField::ScheduledTime => &mut self.scheduled_time,
        }
    }

    #[must_use]
    pub fn route_no(&self) -> &str {
        &self.route_no
    }

    #[must_use]
    pub fn route_name(&self) -> &str {
        &self.route_name
    }

    #[must_use]
    pub fn source_en(&self) -> &str {
        &self.source_en
    }

    #[must_use]
    pub fn source_local(&self) -> &str {
        &self.source_local
    }

    #[must_use]
    pub fn destination_en(&self) -> &str {
        &self.destination_en
    }

    #[must_use]
    pub fn destination_local(&self) -> &str {
        &self.destination_local
    }

    #[must_use]
    pub fn scheduled_time(&self) -> &str {
        &self.scheduled_time
    }

    // -- selections ---------------------------------------------------------

    /// Selects a depot by code, or clears the selection with `None`.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::UnknownDepot`] if the code is not in the reference
    /// data. The current selection is left unchanged.
    pub fn select_depot(&mut self, code: Option<&str>) -> Result<(), FormError> {
        self.selected_depot = match code {
            Some(code) => Some(
                self.reference
                    .depot(code)
                    .cloned()
                    .ok_or_else(|| FormError::UnknownDepot(code.to_string()))?,
            ),
            None => None,
        };
        Ok(())
    }

    /// Selects a bus type by name, or clears it with `None`. The seat count
    /// follows automatically.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::UnknownBusType`] if the name is not in the
    /// reference data. The current selection is left unchanged.
    pub fn select_bus_type(&mut self, name: Option<&str>) -> Result<(), FormError> {
        self.selected_bus_type = match name {
            Some(name) => Some(
                self.reference
                    .bus_type(name)
                    .cloned()
                    .ok_or_else(|| FormError::UnknownBusType(name.to_string()))?,
            ),
            None => None,
        };
        Ok(())
    }

    #[must_use]
    pub fn selected_depot(&self) -> Option<&DepotRef> {
        self.selected_depot.as_ref()
    }

    #[must_use]
    pub fn selected_bus_type(&self) -> Option<&BusTypeRef> {
        self.selected_bus_type.as_ref()
    }

    /// Seat options derived from the selected bus type.
    #[must_use]
    pub fn seats(&self) -> SeatSelection {
        SeatSelection::for_bus_type(self.selected_bus_type.as_ref())
    }

    // -- days and stages ----------------------------------------------------

    #[must_use]
    pub fn operating_days(&self) -> &OperatingDaySet {
        &self.operating_days
    }

    pub fn operating_days_mut(&mut self) -> &mut OperatingDaySet {
        &mut self.operating_days
    }

    #[must_use]
    pub fn stages(&self) -> &StageRowCollection {
        &self.stages
    }

    pub fn stages_mut(&mut self) -> &mut StageRowCollection {
        &mut self.stages
    }
}
