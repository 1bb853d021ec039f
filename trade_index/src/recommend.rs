//! Order quantity recommendations

use crate::months::get_next_month;
use crate::table::CategoryMapping;
use crate::Result;
use serde::Serialize;

/// Source of month-over-month percentage changes per category
pub trait TradeIndexLookup {
    /// Change for `category` in the month named `month`, 0.05 meaning +5%.
    ///
    /// A missing entry is an error, never 0%.
    fn pct_change(&self, category: &str, month: &str) -> Result<f64>;
}

/// Scale last month's units by the trade index of the predicted month.
///
/// Rounds half to even and never goes below zero.
pub fn recommend_quantity<L: TradeIndexLookup + ?Sized>(
    lookup: &L,
    prev_units: u64,
    category: &str,
    pred_month: &str,
) -> Result<u64> {
    let pct_change = lookup.pct_change(category, pred_month)?;
    Ok(scale_units(prev_units, pct_change))
}

fn scale_units(units: u64, pct_change: f64) -> u64 {
    let scaled = (units as f64 * (1.0 + pct_change)).round_ties_even();
    if scaled <= 0.0 {
        0
    } else {
        scaled as u64
    }
}

/// Outcome of a recommendation for one product
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub product: String,
    pub category: String,
    pub pred_month: &'static str,
    pub pct_change: f64,
    pub prev_units: u64,
    pub recommended_units: u64,
}

/// Resolves a product's category and next month, then scales its units
#[derive(Debug)]
pub struct Recommender<L> {
    mapping: CategoryMapping,
    lookup: L,
}

impl<L: TradeIndexLookup> Recommender<L> {
    pub fn new(mapping: CategoryMapping, lookup: L) -> Self {
        Self { mapping, lookup }
    }

    /// Recommend next month's units given last month's name and sales
    pub fn recommend(
        &self,
        product: &str,
        prev_month: &str,
        prev_units: u64,
    ) -> Result<Recommendation> {
        let pred_month = get_next_month(prev_month)?;
        let category = self.mapping.category_for(product)?;
        let pct_change = self.lookup.pct_change(category, pred_month)?;
        let recommended_units = scale_units(prev_units, pct_change);

        log::debug!(
            "{} ({}) {}: {} units * (1 + {}) = {}",
            product,
            category,
            pred_month,
            prev_units,
            pct_change,
            recommended_units
        );

        Ok(Recommendation {
            product: product.to_string(),
            category: category.to_string(),
            pred_month,
            pct_change,
            prev_units,
            recommended_units,
        })
    }

    pub fn mapping(&self) -> &CategoryMapping {
        &self.mapping
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::TradeIndexTable;
    use crate::IndexError;

    fn table() -> TradeIndexTable {
        let mut table = TradeIndexTable::default();
        table.insert("Beverages", "April", 0.10);
        table.insert("Beverages", "May", -0.05);
        table.insert("Snacks", "January", -1.5);
        table
    }

    #[test]
    fn test_recommend_quantity_scales() {
        let table = table();

        assert_eq!(recommend_quantity(&table, 100, "Beverages", "April").unwrap(), 110);
        assert_eq!(recommend_quantity(&table, 100, "Beverages", "May").unwrap(), 95);
    }

    #[test]
    fn test_missing_entry_is_lookup_error() {
        let table = table();

        assert!(matches!(
            recommend_quantity(&table, 100, "Beverages", "June"),
            Err(IndexError::Lookup(_))
        ));
        assert!(matches!(
            recommend_quantity(&table, 100, "Toys", "April"),
            Err(IndexError::Lookup(_))
        ));
    }

    #[test]
    fn test_rounding_and_floor() {
        assert_eq!(scale_units(5, 0.5), 8);
        assert_eq!(scale_units(3, 0.5), 4);
        assert_eq!(scale_units(10, -1.5), 0);
        assert_eq!(scale_units(0, 0.2), 0);
    }

    #[test]
    fn test_recommender_end_to_end() {
        let mut mapping = CategoryMapping::default();
        mapping.insert("Kola Classic", "Beverages");
        let recommender = Recommender::new(mapping, table());

        let rec = recommender.recommend("Kola Classic", "March", 100).unwrap();
        assert_eq!(rec.pred_month, "April");
        assert_eq!(rec.category, "Beverages");
        assert_eq!(rec.recommended_units, 110);

        assert!(matches!(
            recommender.recommend("Kola Classic", "Frobuary", 100),
            Err(IndexError::InvalidMonth(_))
        ));
        assert!(matches!(
            recommender.recommend("Unknown", "March", 100),
            Err(IndexError::Lookup(_))
        ));
    }
}
