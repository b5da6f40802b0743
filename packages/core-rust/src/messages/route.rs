//! Route write record: the JSON body posted to the route store.
//!
//! Field names are fixed by the store (`PascalCase`, with `PK`/`SK` upper-case
//! and the local-language fields carrying the `Mr` / `Marathi` suffix).

use serde::{Deserialize, Serialize};

use crate::days::OperatingDaysRecord;
use crate::form::RouteFormState;
use crate::stages::StageRecord;

// ---------------------------------------------------------------------------
// Identity keys
// ---------------------------------------------------------------------------

/// Partition key: `Depot-{depot}-{routeNo}-Metadata`.
///
/// An unset depot renders as the empty string; the key is still produced.
#[must_use]
pub fn partition_key(depot_code: &str, route_no: &str) -> String {
    format!("Depot-{depot_code}-{route_no}-Metadata")
}

/// Sort key: `{depot}-{routeNo}-Metadata`.
#[must_use]
pub fn sort_key(depot_code: &str, route_no: &str) -> String {
    format!("{depot_code}-{route_no}-Metadata")
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// One entry of the `Stages` array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StageEntry {
    pub stage_no: String,
    pub stop_name: String,
    pub stop_name_marathi: String,
    pub kms_from_source: String,
    pub kms_from_destination: String,
}

impl From<&StageRecord> for StageEntry {
    fn from(row: &StageRecord) -> Self {
        Self {
            stage_no: row.stage_no.clone(),
            stop_name: row.stop_name_en.clone(),
            stop_name_marathi: row.stop_name_local.clone(),
            kms_from_source: row.km_from_source.clone(),
            kms_from_destination: row.km_from_destination.clone(),
        }
    }
}

/// Canonical route record sent on submission.
///
/// Built from a snapshot of [`RouteFormState`]; `no_of_seats` is always the
/// selected bus type's seat count and serializes as `""` when none is selected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RouteRecord {
    #[serde(rename = "PK")]
    pub pk: String,
    #[serde(rename = "SK")]
    pub sk: String,
    pub route_no: String,
    pub operating_depot: String,
    pub bus_type: String,
    #[serde(with = "seat_count")]
    pub no_of_seats: Option<u32>,
    pub route_name: String,
    pub source_en: String,
    pub source_mr: String,
    pub destination_en: String,
    pub destination_mr: String,
    pub scheduled_time: String,
    pub operating_days: OperatingDaysRecord,
    pub stages: Vec<StageEntry>,
}

impl From<&RouteFormState> for RouteRecord {
    fn from(form: &RouteFormState) -> Self {
        let depot = form.selected_depot().map_or("", |d| d.code.as_str());
        let route_no = form.route_no();
        Self {
            pk: partition_key(depot, route_no),
            sk: sort_key(depot, route_no),
            route_no: route_no.to_string(),
            operating_depot: depot.to_string(),
            bus_type: form
                .selected_bus_type()
                .map(|b| b.name.clone())
                .unwrap_or_default(),
            no_of_seats: form.seats().value(),
            route_name: form.route_name().to_string(),
            source_en: form.source_en().to_string(),
            source_mr: form.source_local().to_string(),
            destination_en: form.destination_en().to_string(),
            destination_mr: form.destination_local().to_string(),
            scheduled_time: form.scheduled_time().to_string(),
            operating_days: OperatingDaysRecord::from(form.operating_days()),
            stages: form.stages().iter().map(StageEntry::from).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Seat count encoding
// ---------------------------------------------------------------------------

/// Seat counts travel as JSON numbers, or as `""` when absent. Numeric strings
/// are accepted on decode since lookup tables sometimes store them as text.
pub(crate) mod seat_count {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u32),
        Text(String),
    }

    pub(crate) fn parse<E: serde::de::Error>(text: &str) -> Result<Option<u32>, E> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        trimmed
            .parse::<u32>()
            .map(Some)
            .map_err(|_| E::custom(format!("invalid seat count: {text:?}")))
    }

    pub fn serialize<S: Serializer>(value: &Option<u32>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(n) => serializer.serialize_u32(*n),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Ok(Some(n)),
            Raw::Text(s) => parse(&s),
        }
    }

    /// Decodes a seat count that must be present.
    pub(crate) fn deserialize_required<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<u32, D::Error> {
        deserialize(deserializer)?.ok_or_else(|| D::Error::custom("missing seat count"))
    }
}
