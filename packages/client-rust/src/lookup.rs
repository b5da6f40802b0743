//! One-shot loading of the session's reference data.
//!
//! Both fetches are issued together and resolve independently. A failed fetch
//! is logged and leaves its set empty; it never blocks the other set and is
//! never retried.

use route_entry_core::{LoadReport, LookupSource, ReferenceDataCache};
use tracing::{error, info};

/// Fetches depots and bus types concurrently and builds the cache.
pub async fn load_reference_data(source: &dyn LookupSource) -> ReferenceDataCache {
    let (depots, bus_types) = tokio::join!(source.fetch_depots(), source.fetch_bus_types());
    let mut report = LoadReport::default();

    let depots = match depots {
        Ok(depots) => depots,
        Err(e) => {
            error!(error = %e, "failed to fetch depots");
            metrics::counter!("reference_fetch_failures_total", "set" => "depots").increment(1);
            report.depots_failed = true;
            Vec::new()
        }
    };

    let bus_types = match bus_types {
        Ok(bus_types) => bus_types,
        Err(e) => {
            error!(error = %e, "failed to fetch bus types");
            metrics::counter!("reference_fetch_failures_total", "set" => "bus_types")
                .increment(1);
            report.bus_types_failed = true;
            Vec::new()
        }
    };

    info!(
        depots = depots.len(),
        bus_types = bus_types.len(),
        degraded = report.is_degraded(),
        "reference data loaded"
    );

    ReferenceDataCache::with_report(depots, bus_types, report)
}
