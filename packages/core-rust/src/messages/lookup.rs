//! Lookup service response bodies for depots and bus types.
//!
//! A body that lacks the expected top-level key decodes to an empty list,
//! matching how the lookup service reports "no rows". Rows are decoded one at
//! a time: a malformed row is logged and skipped, the rest of the set is kept.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use super::route::seat_count;
use crate::reference::{BusTypeRef, DepotRef};

/// `{ "Depots": [ { "Code", "Name" } ] }`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DepotsResponse {
    #[serde(default)]
    pub depots: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DepotEntry {
    pub code: String,
    pub name: String,
}

/// `{ "BusTypes": [ { "Name", "NoOfSeats" } ] }`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BusTypesResponse {
    #[serde(default)]
    pub bus_types: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BusTypeEntry {
    pub name: String,
    /// Accepts either a JSON number or a numeric string.
    #[serde(deserialize_with = "seat_count::deserialize_required")]
    pub no_of_seats: u32,
}

impl From<DepotEntry> for DepotRef {
    fn from(entry: DepotEntry) -> Self {
        DepotRef {
            code: entry.code,
            name: entry.name,
        }
    }
}

impl From<BusTypeEntry> for BusTypeRef {
    fn from(entry: BusTypeEntry) -> Self {
        BusTypeRef {
            name: entry.name,
            seat_count: entry.no_of_seats,
        }
    }
}

/// Decodes each raw row as `E`, skipping (and logging) rows that do not fit.
fn decode_rows<E, R>(set: &'static str, rows: Vec<Value>) -> Vec<R>
where
    E: DeserializeOwned,
    R: From<E>,
{
    rows.into_iter()
        .enumerate()
        .filter_map(|(index, row)| match serde_json::from_value::<E>(row) {
            Ok(entry) => Some(R::from(entry)),
            Err(e) => {
                warn!(set, index, error = %e, "skipping malformed lookup row");
                None
            }
        })
        .collect()
}

impl DepotsResponse {
    #[must_use]
    pub fn into_refs(self) -> Vec<DepotRef> {
        decode_rows::<DepotEntry, _>("depots", self.depots)
    }
}

impl BusTypesResponse {
    #[must_use]
    pub fn into_refs(self) -> Vec<BusTypeRef> {
        decode_rows::<BusTypeEntry, _>("bus_types", self.bus_types)
    }
}
