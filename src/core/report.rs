use crate::domain::model::{round2, FundSnapshot, Holding};
use std::collections::HashSet;
use std::fmt;

/// Quality summary of one persisted snapshot.
#[derive(Debug, Clone)]
pub struct VerificationReport {
    pub month: String,
    pub year: i32,
    pub holdings_count: usize,
    pub top: Vec<Holding>,
    pub total_percent: f64,
    pub issues: Vec<String>,
}

impl VerificationReport {
    pub fn from_snapshot(snapshot: &FundSnapshot) -> Self {
        let mut issues = Vec::new();

        if snapshot.holdings_count != snapshot.holdings.len() {
            issues.push(format!(
                "holdingsCount is {} but {} holdings are listed",
                snapshot.holdings_count,
                snapshot.holdings.len()
            ));
        }

        if let Some(pos) = snapshot
            .holdings
            .windows(2)
            .position(|pair| pair[0].percent_of_nav < pair[1].percent_of_nav)
        {
            issues.push(format!(
                "holdings not sorted by weight at position {}",
                pos + 1
            ));
        }

        let mut seen = HashSet::new();
        for holding in &snapshot.holdings {
            if holding.company.trim().is_empty() {
                issues.push("holding with empty company name".to_string());
            } else if !seen.insert(holding.company.to_lowercase()) {
                issues.push(format!("duplicate company '{}'", holding.company));
            }
        }

        Self {
            month: snapshot.month.clone(),
            year: snapshot.year,
            holdings_count: snapshot.holdings_count,
            top: snapshot.holdings.iter().take(5).cloned().collect(),
            total_percent: round2(snapshot.holdings.iter().map(|h| h.percent_of_nav).sum()),
            issues,
        }
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

impl fmt::Display for VerificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {}:", self.month, self.year)?;
        writeln!(f, "  Total Holdings: {}", self.holdings_count)?;
        writeln!(f, "  Top 5:")?;
        for (i, holding) in self.top.iter().enumerate() {
            writeln!(f, "    {}. {}: {}%", i + 1, holding.company, holding.percent_of_nav)?;
        }
        writeln!(f, "  Total NAV %: {:.2}%", self.total_percent)?;
        for issue in &self.issues {
            writeln!(f, "  ! {}", issue)?;
        }
        Ok(())
    }
}
