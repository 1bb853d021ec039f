//! Memoised transaction tables
//!
//! The pipeline itself never caches; callers that reload the same file with the same
//! window can keep one of these instead.

use demand_forecast::{DateWindow, Result, Transaction, TransactionLoader};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Loaded transaction tables keyed by (canonical source path, window)
#[derive(Debug, Default)]
pub struct TransactionCache {
    entries: HashMap<(PathBuf, DateWindow), Rc<[Transaction]>>,
}

impl TransactionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached table, loading it on first use
    pub fn get_or_load(&mut self, path: &Path, window: &DateWindow) -> Result<Rc<[Transaction]>> {
        let key = (std::fs::canonicalize(path)?, *window);
        if let Some(rows) = self.entries.get(&key) {
            log::debug!("transaction cache hit for {}", key.0.display());
            return Ok(Rc::clone(rows));
        }

        let rows: Rc<[Transaction]> = TransactionLoader::from_csv(&key.0, window)?.into();
        self.entries.insert(key, Rc::clone(&rows));
        Ok(rows)
    }

    /// Drop every cached window of `path`
    pub fn invalidate(&mut self, path: &Path) {
        match std::fs::canonicalize(path) {
            Ok(canonical) => self.entries.retain(|(p, _), _| *p != canonical),
            Err(e) => log::warn!("cannot invalidate {}: {}", path.display(), e),
        }
    }

    /// Number of cached tables
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn sales_file() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "created_at,name,product_name,quantity").unwrap();
        writeln!(file, "2025-01-10,Acme,Widget,4").unwrap();
        writeln!(file, "2025-02-10,Acme,Widget,6").unwrap();
        file
    }

    #[test]
    fn test_same_key_shares_table() {
        let file = sales_file();
        let mut cache = TransactionCache::new();
        let window = DateWindow::unbounded();

        let first = cache.get_or_load(file.path(), &window).unwrap();
        let second = cache.get_or_load(file.path(), &window).unwrap();

        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_windows_cached_separately() {
        let file = sales_file();
        let mut cache = TransactionCache::new();
        let february = DateWindow::from_dates(
            NaiveDate::from_ymd_opt(2025, 2, 1),
            NaiveDate::from_ymd_opt(2025, 3, 1),
        )
        .unwrap();

        let all = cache.get_or_load(file.path(), &DateWindow::unbounded()).unwrap();
        let feb = cache.get_or_load(file.path(), &february).unwrap();

        assert_eq!(all.len(), 2);
        assert_eq!(feb.len(), 1);
        assert_eq!(cache.len(), 2);

        cache.invalidate(file.path());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_missing_file_not_cached() {
        let mut cache = TransactionCache::new();
        let result = cache.get_or_load(Path::new("no_such_sales.csv"), &DateWindow::unbounded());

        assert!(result.is_err());
        assert!(cache.is_empty());
    }
}
