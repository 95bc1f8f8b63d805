//! Region comparison
//!
//! Builds a bounding box around each of two points, sums per-station train
//! counts inside each box, and reports the difference. The station data comes
//! from the cached railway loader, so repeated comparisons reuse one download.

mod compare;
mod error;
mod region;
mod summary;

pub use compare::{
    compare_points, CompareOptions, ComparisonReport, MetricDifference, RegionComparison,
};
pub use error::{RegionError, Result};
pub use region::Coordinate;
pub use summary::RegionSummary;
