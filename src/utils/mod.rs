pub mod constants;
pub mod dates;
pub mod progress;

pub use constants::*;
pub use dates::{is_null_token, parse_date, parse_optional_f64};
pub use progress::ProgressReporter;
