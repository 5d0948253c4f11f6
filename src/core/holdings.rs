use crate::domain::model::{round2, Holding};
use std::collections::HashMap;

/// Holdings of one sheet in order of first appearance, unique by case-insensitive company.
#[derive(Debug, Clone, Default)]
pub struct HoldingSet {
    holdings: Vec<Holding>,
    index: HashMap<String, usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insertion {
    Added,
    Merged,
}

impl HoldingSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a holding, or folds its weight into an existing one with the same name.
    /// A merge keeps the existing position and may leave the single-row range.
    pub fn insert(&mut self, company: String, percent: f64) -> Insertion {
        let key = company.to_lowercase();
        if let Some(&pos) = self.index.get(&key) {
            let existing = &mut self.holdings[pos];
            existing.percent_of_nav = round2(existing.percent_of_nav + percent);
            return Insertion::Merged;
        }

        self.index.insert(key, self.holdings.len());
        self.holdings.push(Holding::new(company, percent));
        Insertion::Added
    }

    pub fn len(&self) -> usize {
        self.holdings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.holdings.is_empty()
    }

    pub fn holdings(&self) -> &[Holding] {
        &self.holdings
    }

    pub fn get(&self, company: &str) -> Option<&Holding> {
        self.index
            .get(&company.to_lowercase())
            .map(|&pos| &self.holdings[pos])
    }

    pub fn into_vec(self) -> Vec<Holding> {
        self.holdings
    }
}

/// Stable sort by weight, largest first.
pub fn rank_holdings(mut holdings: Vec<Holding>) -> Vec<Holding> {
    holdings.sort_by(|a, b| b.percent_of_nav.total_cmp(&a.percent_of_nav));
    holdings
}
