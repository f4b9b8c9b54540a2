//! Derived views over a snapshot of records.
//!
//! Everything here is a pure function of its input; nothing is cached.

use std::collections::{BTreeMap, HashSet};

use expense_domain::{Category, CategoryFilter, Record};

/// Records matching both the category filter and the note search, in input order.
///
/// An empty `search` matches every record, including those without a note.
pub fn filter_by<'a>(
    records: &'a [Record],
    filter: CategoryFilter,
    search: &str,
) -> Vec<&'a Record> {
    let needle = search.to_lowercase();
    records
        .iter()
        .filter(|record| filter.matches(&record.category))
        .filter(|record| needle.is_empty() || record.note.to_lowercase().contains(&needle))
        .collect()
}

/// Sums amounts per known category.
pub fn totals_by_category(records: &[Record]) -> CategoryTotals {
    let mut totals: BTreeMap<Category, f64> =
        Category::ALL.into_iter().map(|category| (category, 0.0)).collect();
    let mut excluded = ExcludedTotal::default();
    for record in records {
        match record.category.known() {
            Some(category) => {
                *totals.entry(category).or_insert(0.0) += record.amount.value();
            }
            None => {
                excluded.amount += record.amount.value();
                excluded.count += 1;
            }
        }
    }
    CategoryTotals { totals, excluded }
}

/// Amounts filed under labels outside the known category set.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ExcludedTotal {
    pub amount: f64,
    pub count: usize,
}

/// Per-category totals; always holds one entry for every known category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotals {
    totals: BTreeMap<Category, f64>,
    excluded: ExcludedTotal,
}

impl CategoryTotals {
    pub fn get(&self, category: Category) -> f64 {
        self.totals.get(&category).copied().unwrap_or(0.0)
    }

    /// Entries in the fixed category order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, f64)> + '_ {
        self.totals.iter().map(|(category, total)| (*category, *total))
    }

    pub fn as_map(&self) -> &BTreeMap<Category, f64> {
        &self.totals
    }

    pub fn grand_total(&self) -> f64 {
        self.totals.values().sum()
    }

    /// Fraction of the grand total per category, all zero when nothing was spent.
    pub fn shares(&self) -> Vec<(Category, f64)> {
        let total = self.grand_total();
        self.iter()
            .map(|(category, amount)| {
                let share = if total > 0.0 { amount / total } else { 0.0 };
                (category, share)
            })
            .collect()
    }

    pub fn excluded(&self) -> ExcludedTotal {
        self.excluded
    }
}

/// Describes anomalies in a snapshot that views tolerate but callers may want to report.
pub fn snapshot_warnings(records: &[Record]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut warnings = Vec::new();
    for record in records {
        if !record.category.is_known() {
            warnings.push(format!(
                "expense {} uses unknown category `{}` and is left out of category totals",
                record.id, record.category
            ));
        }
        if !seen.insert(&record.id) {
            warnings.push(format!("expense id {} appears more than once", record.id));
        }
    }
    warnings
}
