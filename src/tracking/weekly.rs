use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{
    categories::{Category, CategoryList},
    ledger::DayUsage,
};

/// Amount of calendar days folded into [WeeklySummary], today included.
pub const WEEK_DAYS: u64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainTotal {
    pub seconds: u64,
    pub category: Category,
}

/// Rollup over the last [WEEK_DAYS] days. Always derived from day usage and the current
/// categories, so it can be thrown away and rebuilt at any moment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklySummary {
    #[serde(default)]
    pub productive: u64,
    #[serde(default)]
    pub unproductive: u64,
    #[serde(default)]
    pub neutral: u64,
    #[serde(default)]
    pub domains: BTreeMap<String, DomainTotal>,
}

impl WeeklySummary {
    /// Sums domains across days first and classifies the totals afterwards.
    pub fn aggregate<'a>(
        days: impl IntoIterator<Item = &'a DayUsage>,
        categories: &CategoryList,
    ) -> Self {
        let mut totals = BTreeMap::<&str, u64>::new();
        for day in days {
            for (domain, seconds) in day.iter() {
                let total = totals.entry(domain).or_default();
                *total = total.saturating_add(seconds);
            }
        }

        let mut summary = WeeklySummary::default();
        for (domain, seconds) in totals {
            let category = categories.classify(domain);
            let total = summary.total_mut(category);
            *total = total.saturating_add(seconds);
            summary
                .domains
                .insert(domain.to_owned(), DomainTotal { seconds, category });
        }
        summary
    }

    pub fn total(&self, category: Category) -> u64 {
        match category {
            Category::Productive => self.productive,
            Category::Unproductive => self.unproductive,
            Category::Neutral => self.neutral,
        }
    }

    fn total_mut(&mut self, category: Category) -> &mut u64 {
        match category {
            Category::Productive => &mut self.productive,
            Category::Unproductive => &mut self.unproductive,
            Category::Neutral => &mut self.neutral,
        }
    }
}
