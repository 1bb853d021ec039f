//! Per-group monthly aggregation of a transaction log
//!
//! Every (customer, product) pair that appears in the log becomes a group. Groups
//! without transactions never appear in the output maps: "not present" means there
//! is nothing to predict from, which is different from a month that sold 0 units.

use crate::data::Transaction;
use crate::error::{ForecastError, Result};
use crate::month::MonthKey;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Lags available on a group, counted back from its latest month
pub const MAX_OFFSET: u32 = 6;

/// Identity of a (customer, product) group
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GroupKey {
    pub customer: String,
    pub product: String,
}

impl GroupKey {
    /// Key for `customer` buying `product`
    pub fn new(customer: &str, product: &str) -> Self {
        Self {
            customer: customer.to_string(),
            product: product.to_string(),
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.customer, self.product)
    }
}

/// Total units sold per (group, month)
pub type MonthTotals = BTreeMap<(GroupKey, MonthKey), u64>;

/// Latest active month per group
pub fn compute_latest_months(transactions: &[Transaction]) -> BTreeMap<GroupKey, MonthKey> {
    let mut latest: BTreeMap<GroupKey, MonthKey> = BTreeMap::new();

    for t in transactions {
        let month = MonthKey::from_datetime(&t.timestamp);
        latest
            .entry(GroupKey::new(&t.customer, &t.product))
            .and_modify(|current| *current = (*current).max(month))
            .or_insert(month);
    }

    latest
}

/// Summed quantity per (group, month)
///
/// Fails with `ValidationError` when a group-month total does not fit in a `u64`.
pub fn compute_month_totals(transactions: &[Transaction]) -> Result<MonthTotals> {
    let mut totals = MonthTotals::new();

    for t in transactions {
        let month = MonthKey::from_datetime(&t.timestamp);
        let total = totals
            .entry((GroupKey::new(&t.customer, &t.product), month))
            .or_insert(0);
        *total = total.checked_add(t.quantity).ok_or_else(|| {
            ForecastError::ValidationError(format!(
                "Quantity total for {} / {} in {} overflows",
                t.customer, t.product, month
            ))
        })?;
    }

    Ok(totals)
}

/// Both aggregation maps over one transaction table
#[derive(Debug, Clone, Default)]
pub struct MonthlySales {
    latest_months: BTreeMap<GroupKey, MonthKey>,
    totals: MonthTotals,
}

impl MonthlySales {
    /// Aggregate a transaction table
    pub fn from_transactions(transactions: &[Transaction]) -> Result<Self> {
        let sales = Self {
            latest_months: compute_latest_months(transactions),
            totals: compute_month_totals(transactions)?,
        };

        log::debug!(
            "aggregated {} transactions into {} groups and {} group-months",
            transactions.len(),
            sales.latest_months.len(),
            sales.totals.len()
        );

        Ok(sales)
    }

    /// Latest active month per group
    pub fn latest_months(&self) -> &BTreeMap<GroupKey, MonthKey> {
        &self.latest_months
    }

    /// Summed quantity per (group, month)
    pub fn totals(&self) -> &MonthTotals {
        &self.totals
    }

    /// Latest active month of one group, `None` if the group never transacted
    pub fn latest_month(&self, key: &GroupKey) -> Option<MonthKey> {
        self.latest_months.get(key).copied()
    }

    /// Resolve a group, failing with `GroupNotFound` when it has no transactions
    pub fn group(&self, customer: &str, product: &str) -> Result<CustomerProductGroup<'_>> {
        let key = GroupKey::new(customer, product);
        match self.latest_months.get(&key) {
            Some(&latest_month) => Ok(CustomerProductGroup {
                key,
                latest_month,
                totals: &self.totals,
            }),
            None => Err(ForecastError::GroupNotFound {
                customer: customer.to_string(),
                product: product.to_string(),
            }),
        }
    }

    /// All groups in key order
    pub fn groups(&self) -> impl Iterator<Item = CustomerProductGroup<'_>> {
        self.latest_months
            .iter()
            .map(move |(key, &latest_month)| CustomerProductGroup {
                key: key.clone(),
                latest_month,
                totals: &self.totals,
            })
    }

    /// Number of groups
    pub fn len(&self) -> usize {
        self.latest_months.len()
    }

    /// True when no group has transactions
    pub fn is_empty(&self) -> bool {
        self.latest_months.is_empty()
    }
}

/// A (customer, product) group with at least one transaction
#[derive(Debug, Clone)]
pub struct CustomerProductGroup<'a> {
    key: GroupKey,
    latest_month: MonthKey,
    totals: &'a MonthTotals,
}

impl<'a> CustomerProductGroup<'a> {
    /// The (customer, product) identity
    pub fn key(&self) -> &GroupKey {
        &self.key
    }

    /// Most recent month with a transaction; offset 0
    pub fn latest_month(&self) -> MonthKey {
        self.latest_month
    }

    /// Units sold `offset` months before the latest month; 0 when that month has no sales.
    ///
    /// Offsets beyond `MAX_OFFSET` are rejected.
    pub fn quantity_at_offset(&self, offset: u32) -> Result<u64> {
        if offset > MAX_OFFSET {
            return Err(ForecastError::ValidationError(format!(
                "Offset {} exceeds the maximum of {}",
                offset, MAX_OFFSET
            )));
        }

        Ok(month_total(
            self.totals,
            &self.key,
            self.latest_month.shift(-(offset as i32)),
        ))
    }
}

/// Total for one group-month, 0 when absent
pub fn month_total(totals: &MonthTotals, key: &GroupKey, month: MonthKey) -> u64 {
    totals.get(&(key.clone(), month)).copied().unwrap_or(0)
}
