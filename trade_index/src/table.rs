//! CSV-backed trade-index and product-category tables

use crate::months::month_index;
use crate::recommend::TradeIndexLookup;
use crate::{IndexError, Result};
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

const DATE_COLUMN: &str = "date";
const MONTH_COLUMN: &str = "Month";
const CATEGORY_COLUMN: &str = "Description_HS4";
const PCT_CHANGE_COLUMN: &str = "value_MoM_pct_change";
const PRODUCT_COLUMN: &str = "Product Name";
const MAPPED_CATEGORY_COLUMN: &str = "Imp_category";

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader)
}

fn column_index(headers: &csv::StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| IndexError::DataFormat(format!("Required column '{}' not found", name)))
}

/// Month-over-month percentage changes keyed by (category, month name).
///
/// When several rows share a key the first one in file order is kept, even when
/// that row has no change value; such a key fails on lookup.
#[derive(Debug, Clone, Default)]
pub struct TradeIndexTable {
    changes: HashMap<(String, String), Option<f64>>,
}

impl TradeIndexTable {
    /// Load a trade-index CSV file
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        log::info!("loading trade index from {}", path.display());

        Self::from_reader(file)
    }

    /// Load a trade-index table from any CSV source
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv_reader(reader);
        let headers = reader.headers()?.clone();
        column_index(&headers, DATE_COLUMN)?;
        let month_col = column_index(&headers, MONTH_COLUMN)?;
        let category_col = column_index(&headers, CATEGORY_COLUMN)?;
        let pct_col = column_index(&headers, PCT_CHANGE_COLUMN)?;

        let mut table = Self::default();
        for result in reader.records() {
            let record = result?;
            let line = record.position().map_or(0, |p| p.line());

            let month = record.get(month_col).unwrap_or_default();
            month_index(month).map_err(|_| {
                IndexError::DataFormat(format!("Invalid month '{}' at line {}", month, line))
            })?;

            let category = record.get(category_col).unwrap_or_default();
            let raw_pct = record.get(pct_col).unwrap_or_default();
            // The first month of a series has no month-over-month change.
            if raw_pct.is_empty() || raw_pct.eq_ignore_ascii_case("nan") {
                log::warn!("trade index row at line {} has no change value", line);
                table.insert_entry(category, month, None);
                continue;
            }
            let pct = raw_pct
                .parse::<f64>()
                .ok()
                .filter(|p| p.is_finite())
                .ok_or_else(|| {
                    IndexError::DataFormat(format!(
                        "Invalid {} '{}' at line {}",
                        PCT_CHANGE_COLUMN, raw_pct, line
                    ))
                })?;

            table.insert(category, month, pct);
        }

        log::debug!("trade index holds {} entries", table.len());
        Ok(table)
    }

    /// Add an entry unless the key is already present
    pub fn insert(&mut self, category: &str, month: &str, pct_change: f64) {
        self.insert_entry(category, month, Some(pct_change));
    }

    fn insert_entry(&mut self, category: &str, month: &str, pct_change: Option<f64>) {
        self.changes
            .entry((category.to_string(), month.to_string()))
            .or_insert(pct_change);
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

impl TradeIndexLookup for TradeIndexTable {
    fn pct_change(&self, category: &str, month: &str) -> Result<f64> {
        match self.changes.get(&(category.to_string(), month.to_string())) {
            Some(Some(pct)) => Ok(*pct),
            Some(None) => Err(IndexError::Lookup(format!(
                "Trade index entry for category '{}' in {} has no change value",
                category, month
            ))),
            None => Err(IndexError::Lookup(format!(
                "No trade index entry for category '{}' in {}",
                category, month
            ))),
        }
    }
}

/// Product name to import category, first row wins
#[derive(Debug, Clone, Default)]
pub struct CategoryMapping {
    categories: HashMap<String, String>,
    products: Vec<String>,
}

impl CategoryMapping {
    /// Load a product-category CSV file
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        log::info!("loading category mapping from {}", path.display());

        Self::from_reader(file)
    }

    /// Load a product-category mapping from any CSV source
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv_reader(reader);
        let headers = reader.headers()?.clone();
        let product_col = column_index(&headers, PRODUCT_COLUMN)?;
        let category_col = column_index(&headers, MAPPED_CATEGORY_COLUMN)?;

        let mut mapping = Self::default();
        for result in reader.records() {
            let record = result?;
            mapping.insert(
                record.get(product_col).unwrap_or_default(),
                record.get(category_col).unwrap_or_default(),
            );
        }

        Ok(mapping)
    }

    /// Map a product unless it is already mapped
    pub fn insert(&mut self, product: &str, category: &str) {
        if !self.categories.contains_key(product) {
            self.categories
                .insert(product.to_string(), category.to_string());
            self.products.push(product.to_string());
        }
    }

    /// Category of `product`
    pub fn category_for(&self, product: &str) -> Result<&str> {
        self.categories
            .get(product)
            .map(String::as_str)
            .ok_or_else(|| IndexError::Lookup(format!("No category mapped for product '{}'", product)))
    }

    /// Mapped products in first-seen order
    pub fn products(&self) -> &[String] {
        &self.products
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRADE_CSV: &str = "\
date,Month,Description_HS4,value_MoM_pct_change
2024-03-01,March,Beverages,
2024-04-01,April,Beverages,0.10
2024-05-01,May,Beverages,-0.05
2025-04-01,April,Beverages,0.50
2024-04-01,April,Snacks,0.02
";

    const MAPPING_CSV: &str = "\
Product Name,Imp_category
Kola Classic,Beverages
Chin Chin,Snacks
Kola Classic,Snacks
";

    #[test]
    fn test_trade_index_first_row_wins() {
        let table = TradeIndexTable::from_reader(TRADE_CSV.as_bytes()).unwrap();

        assert_eq!(table.len(), 4);
        assert_eq!(table.pct_change("Beverages", "April").unwrap(), 0.10);
        assert_eq!(table.pct_change("Beverages", "May").unwrap(), -0.05);
    }

    #[test]
    fn test_blank_change_is_missing_not_zero() {
        let table = TradeIndexTable::from_reader(TRADE_CSV.as_bytes()).unwrap();

        assert!(matches!(
            table.pct_change("Beverages", "March"),
            Err(IndexError::Lookup(_))
        ));
    }

    #[test]
    fn test_trade_index_requires_columns() {
        let csv = "date,Month,value_MoM_pct_change\n2024-04-01,April,0.1\n";
        assert!(matches!(
            TradeIndexTable::from_reader(csv.as_bytes()),
            Err(IndexError::DataFormat(_))
        ));
    }

    #[test]
    fn test_trade_index_requires_date_column() {
        let csv = "Month,Description_HS4,value_MoM_pct_change\nApril,Beverages,0.1\n";
        assert!(matches!(
            TradeIndexTable::from_reader(csv.as_bytes()),
            Err(IndexError::DataFormat(_))
        ));
    }

    #[test]
    fn test_missing_first_row_shadows_later_rows() {
        let csv = "\
date,Month,Description_HS4,value_MoM_pct_change
2024-03-01,March,Beverages,NaN
2025-03-01,March,Beverages,0.10
";
        let table = TradeIndexTable::from_reader(csv.as_bytes()).unwrap();

        assert!(matches!(
            table.pct_change("Beverages", "March"),
            Err(IndexError::Lookup(_))
        ));
    }

    #[test]
    fn test_trade_index_rejects_bad_month() {
        let csv = "date,Month,Description_HS4,value_MoM_pct_change\n2024-04-01,Apr,Beverages,0.1\n";
        assert!(matches!(
            TradeIndexTable::from_reader(csv.as_bytes()),
            Err(IndexError::DataFormat(_))
        ));
    }

    #[test]
    fn test_tables_from_files() {
        use std::io::Write;

        let mut trade = tempfile::NamedTempFile::new().unwrap();
        write!(trade, "{}", TRADE_CSV).unwrap();
        let mut mapping = tempfile::NamedTempFile::new().unwrap();
        write!(mapping, "{}", MAPPING_CSV).unwrap();

        assert_eq!(TradeIndexTable::from_csv(trade.path()).unwrap().len(), 4);
        assert_eq!(CategoryMapping::from_csv(mapping.path()).unwrap().products().len(), 2);
        assert!(matches!(
            TradeIndexTable::from_csv("no_such_trade_index.csv"),
            Err(IndexError::Io(_))
        ));
    }

    #[test]
    fn test_category_mapping() {
        let mapping = CategoryMapping::from_reader(MAPPING_CSV.as_bytes()).unwrap();

        assert_eq!(mapping.category_for("Kola Classic").unwrap(), "Beverages");
        assert_eq!(mapping.category_for("Chin Chin").unwrap(), "Snacks");
        assert_eq!(mapping.products(), &["Kola Classic", "Chin Chin"]);
        assert!(matches!(
            mapping.category_for("Plantain Chips"),
            Err(IndexError::Lookup(_))
        ));
    }
}
