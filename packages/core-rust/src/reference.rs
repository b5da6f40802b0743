//! Read-only reference data: depots and bus types.
//!
//! Both sets are loaded once per session from the lookup service and then
//! shared (via `Arc`) with every [`RouteFormState`](crate::RouteFormState)
//! created for that session. Nothing in this module mutates after load.

use serde::{Deserialize, Serialize};

/// An operating depot a route can be assigned to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DepotRef {
    /// Short depot code, e.g. `"PNQ"`. Used in the route's identity keys.
    pub code: String,
    /// Human-readable depot name.
    pub name: String,
}

impl DepotRef {
    #[must_use]
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }

    /// Selector label in the form `"{code} - {name}"`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} - {}", self.code, self.name)
    }
}

/// A vehicle category with a fixed seating capacity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BusTypeRef {
    /// Bus type name, also used as its key, e.g. `"Semi-Luxury"`.
    pub name: String,
    /// Number of seats every bus of this type has.
    pub seat_count: u32,
}

impl BusTypeRef {
    #[must_use]
    pub fn new(name: impl Into<String>, seat_count: u32) -> Self {
        Self {
            name: name.into(),
            seat_count,
        }
    }
}

/// Which reference sets failed to load. Both `false` means a clean load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub depots_failed: bool,
    pub bus_types_failed: bool,
}

impl LoadReport {
    /// Returns `true` if either fetch failed.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.depots_failed || self.bus_types_failed
    }
}

/// Session-wide lookup sets.
///
/// A failed fetch leaves its set empty rather than putting the cache into an
/// error state; the [`LoadReport`] records which set degraded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceDataCache {
    depots: Vec<DepotRef>,
    bus_types: Vec<BusTypeRef>,
    report: LoadReport,
}

impl ReferenceDataCache {
    /// Builds a cache from already-fetched sets.
    #[must_use]
    pub fn new(depots: Vec<DepotRef>, bus_types: Vec<BusTypeRef>) -> Self {
        Self {
            depots,
            bus_types,
            report: LoadReport::default(),
        }
    }

    /// Builds a cache that also remembers which fetches failed.
    #[must_use]
    pub fn with_report(
        depots: Vec<DepotRef>,
        bus_types: Vec<BusTypeRef>,
        report: LoadReport,
    ) -> Self {
        Self {
            depots,
            bus_types,
            report,
        }
    }

    #[must_use]
    pub fn depots(&self) -> &[DepotRef] {
        &self.depots
    }

    #[must_use]
    pub fn bus_types(&self) -> &[BusTypeRef] {
        &self.bus_types
    }

    #[must_use]
    pub fn report(&self) -> LoadReport {
        self.report
    }

    /// Looks up a depot by its code.
    #[must_use]
    pub fn depot(&self, code: &str) -> Option<&DepotRef> {
        self.depots.iter().find(|d| d.code == code)
    }

    /// Looks up a bus type by its name.
    #[must_use]
    pub fn bus_type(&self, name: &str) -> Option<&BusTypeRef> {
        self.bus_types.iter().find(|b| b.name == name)
    }
}
