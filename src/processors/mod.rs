pub mod pipeline;
pub mod quality_checker;
pub mod record_filter;
pub mod session;
pub mod town_aggregator;

pub use pipeline::{DashboardOptions, DashboardPipeline, DashboardView};
pub use quality_checker::{
    QualityChecker, QualityReport, QualityViolation, TownStatistics, ViolationType,
};
pub use record_filter::{filter, RecordFilter};
pub use session::DashboardSession;
pub use town_aggregator::average_by_town;
