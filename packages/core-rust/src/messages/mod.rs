//! Wire-compatible JSON schemas exchanged with the lookup service and the
//! route store.
//!
//! Field names follow the store's `PascalCase` convention. Every type here is
//! a plain serde struct; conversion to and from the domain model lives next to
//! the type.

pub mod lookup;
pub mod route;

pub use lookup::{BusTypeEntry, BusTypesResponse, DepotEntry, DepotsResponse};
pub use route::{partition_key, sort_key, RouteRecord, StageEntry};
