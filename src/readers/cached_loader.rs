use crate::error::Result;
use crate::models::WeatherTable;
use crate::readers::{LoadReport, WeatherReader};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;
use tracing::{debug, info};

/// Modification time and length of the source file at load time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Fingerprint {
    modified: Option<SystemTime>,
    len: u64,
}

impl Fingerprint {
    fn of(path: &Path) -> Result<Self> {
        let metadata = std::fs::metadata(path)?;
        Ok(Self {
            modified: metadata.modified().ok(),
            len: metadata.len(),
        })
    }
}

struct CachedTable {
    table: Arc<WeatherTable>,
    report: LoadReport,
    fingerprint: Fingerprint,
}

/// Loads the dataset once and hands out the same table until invalidated
pub struct CachedLoader {
    path: PathBuf,
    reader: WeatherReader,
    cached: Option<CachedTable>,
}

impl CachedLoader {
    pub fn new(path: impl Into<PathBuf>, reader: WeatherReader) -> Self {
        Self {
            path: path.into(),
            reader,
            cached: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_loaded(&self) -> bool {
        self.cached.is_some()
    }

    /// Load on first use, then return the cached table
    pub fn get(&mut self) -> Result<Arc<WeatherTable>> {
        if let Some(cached) = &self.cached {
            debug!(path = %self.path.display(), "Weather table cache hit");
            return Ok(Arc::clone(&cached.table));
        }

        self.load()
    }

    /// Load report of the cached table, if loaded
    pub fn report(&self) -> Option<&LoadReport> {
        self.cached.as_ref().map(|c| &c.report)
    }

    pub fn invalidate(&mut self) {
        if self.cached.take().is_some() {
            info!(path = %self.path.display(), "Weather table cache cleared");
        }
    }

    /// Reload wholesale when the source file changed since the last load.
    /// On failure the previously cached table is kept.
    pub fn refresh_if_changed(&mut self) -> Result<bool> {
        let current = Fingerprint::of(&self.path)?;

        let unchanged = matches!(&self.cached, Some(cached) if cached.fingerprint == current);
        if unchanged {
            return Ok(false);
        }

        info!(path = %self.path.display(), "Source file changed, reloading");
        self.load()?;
        Ok(true)
    }

    fn load(&mut self) -> Result<Arc<WeatherTable>> {
        let fingerprint = Fingerprint::of(&self.path)?;
        let (table, report) = self.reader.read_table_with_report(&self.path)?;
        let table = Arc::new(table);

        self.cached = Some(CachedTable {
            table: Arc::clone(&table),
            report,
            fingerprint,
        });

        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    const HEADER: &str =
        "town,date,avg_temp_c,max_temp_c,min_temp_c,humidity,precipitation_mm,wind_kph";

    fn write_rows(file: &NamedTempFile, rows: &[&str]) -> Result<()> {
        let mut content = format!("{}\n", HEADER);
        for row in rows {
            content.push_str(row);
            content.push('\n');
        }
        std::fs::write(file.path(), content)?;
        Ok(())
    }

    #[test]
    fn test_loads_once() -> Result<()> {
        let file = NamedTempFile::new()?;
        write_rows(&file, &["Nairobi,2024-01-01,19,25,13,65,0,12"])?;

        let mut loader = CachedLoader::new(file.path(), WeatherReader::new());
        assert!(!loader.is_loaded());

        let first = loader.get()?;
        let second = loader.get()?;
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(loader.report().map(|r| r.rows_read), Some(1));
        Ok(())
    }

    #[test]
    fn test_invalidate_forces_reload() -> Result<()> {
        let file = NamedTempFile::new()?;
        write_rows(&file, &["Nairobi,2024-01-01,19,25,13,65,0,12"])?;

        let mut loader = CachedLoader::new(file.path(), WeatherReader::new());
        let first = loader.get()?;
        loader.invalidate();
        assert!(!loader.is_loaded());

        let second = loader.get()?;
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(first.records(), second.records());
        Ok(())
    }

    #[test]
    fn test_refresh_if_changed() -> Result<()> {
        let file = NamedTempFile::new()?;
        write_rows(&file, &["Nairobi,2024-01-01,19,25,13,65,0,12"])?;

        let mut loader = CachedLoader::new(file.path(), WeatherReader::new());
        loader.get()?;
        assert!(!loader.refresh_if_changed()?);

        write_rows(
            &file,
            &[
                "Nairobi,2024-01-01,19,25,13,65,0,12",
                "Mombasa,2024-01-01,28,31,24,78,2,18",
            ],
        )?;
        assert!(loader.refresh_if_changed()?);
        assert_eq!(loader.get()?.len(), 2);
        Ok(())
    }

    #[test]
    fn test_failed_refresh_keeps_previous_table() -> Result<()> {
        let file = NamedTempFile::new()?;
        write_rows(&file, &["Nairobi,2024-01-01,19,25,13,65,0,12"])?;

        let mut loader = CachedLoader::new(file.path(), WeatherReader::new());
        loader.get()?;

        write_rows(&file, &["Nairobi,garbage,19,25,13,65,0,12"])?;
        assert!(loader.refresh_if_changed().is_err());
        assert_eq!(loader.get()?.len(), 1);
        Ok(())
    }
}
