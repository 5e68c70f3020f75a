pub mod aggregates;
pub mod selection;
pub mod table;
pub mod weather;

pub use aggregates::{TownAverage, TownAverages};
pub use selection::{DateRange, Selection};
pub use table::WeatherTable;
pub use weather::{NumericColumn, WeatherRecord, WeatherRecordBuilder};
