pub mod cached_loader;
pub mod weather_reader;

pub use cached_loader::CachedLoader;
pub use weather_reader::{LoadReport, RowRejection, WeatherReader};
