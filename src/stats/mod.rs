//! Query resolution and aggregation engine
//!
//! Flow: [`scope::resolve`] picks the upstream query and grouping mode, the
//! caller fetches records, [`aggregate::aggregate`] groups them (using
//! [`delta::delta`] when a time range is set) and [`format`] renders the
//! response sentence.

pub mod aggregate;
pub mod delta;
pub mod format;
pub mod scope;
pub mod time_range;

pub use aggregate::aggregate;
pub use delta::delta;
pub use format::{format_locations, format_worldwide};
pub use scope::{resolve, DataSource, GroupingMode, QueryScope, QuerySpec, ResolvedScope};
pub use time_range::resolve_time_range;
