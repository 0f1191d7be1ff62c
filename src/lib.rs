//! Season table and percentile engine behind a family of football
//! analytics dashboards.
//!
//! Two pure computations over immutable CSV snapshots:
//! - [`standings::build_standings`] rebuilds running points, goal
//!   difference and league rank per club per chronological round.
//! - [`percentile::normalize_and_rank`] turns raw player season stats into
//!   per-90 rates and percentile ranks within a position cohort.
//!
//! The rendering layer consuming these tables lives elsewhere; this crate
//! owns the data contracts, the lenient loading policy and the numeric
//! semantics.

pub mod load;
pub mod match_dataset;
pub mod percentile;
pub mod player_dataset;
pub mod standings;
pub mod view_config;

pub use load::{DatasetError, LoadSummary};
