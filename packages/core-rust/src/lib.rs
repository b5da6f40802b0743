//! Route entry core: reference data, stage rows, operating days, form state,
//! and the wire records exchanged with the route store.

pub mod days;
pub mod form;
pub mod messages;
pub mod reference;
pub mod seats;
pub mod stages;
pub mod traits;

pub use days::{OperatingDaySet, OperatingDaysRecord, UnknownWeekday, Weekday};
pub use form::{FormError, RouteField, RouteFormState};
pub use messages::{RouteRecord, StageEntry};
pub use reference::{BusTypeRef, DepotRef, LoadReport, ReferenceDataCache};
pub use seats::SeatSelection;
pub use stages::{StageField, StageRecord, StageRowCollection, UnknownStageField};
pub use traits::{LookupError, LookupSource, RouteSink, SinkError, SinkResponse};
