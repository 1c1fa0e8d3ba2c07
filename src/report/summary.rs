use super::{filter_accounts, within_period, ReportParameters};
use crate::utils::month_start;
use crate::{Date, Decimal, Error, Journal};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A running balance as of the end of one month.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryPoint {
    /// The first day of the month this point summarizes.
    pub month: Date,
    /// The cumulative total of every bucket at or before this month.
    pub total: Decimal,
}

/// Cumulative month-end totals over the in-scope accounts, e.g. net worth
/// over time.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlySummary {
    pub title: String,
    pub points: Vec<SummaryPoint>,
}

impl MonthlySummary {
    /// Buckets every in-scope posting by the first day of its month, then
    /// emits one cumulative point per bucket inside the period. Postings
    /// before the period still seed the running total.
    pub fn generate(journal: &Journal, params: &ReportParameters) -> Result<Self, Error> {
        let accounts = filter_accounts(journal, params)?;

        let mut buckets: BTreeMap<Date, Decimal> = BTreeMap::new();
        for entry in journal.entries() {
            if !accounts.contains(&entry.account) {
                continue;
            }
            *buckets.entry(month_start(entry.header.date)).or_default() += entry.amount.number;
        }

        let mut points = Vec::new();
        let mut running = Decimal::ZERO;
        for (month, total) in buckets {
            running += total;
            if within_period(month, params) {
                points.push(SummaryPoint {
                    month,
                    total: running,
                });
            }
        }

        Ok(MonthlySummary {
            title: params.title.clone(),
            points,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Ledger;

    const TEXT: &str = "\
2012/01/10 January pay
    Assets:Bank  1000.00
    Income:Salary

2012/01/25 January rent
    Expenses:Rent  400.00
    Assets:Bank

2012/02/10 February pay
    Assets:Bank  1000.00
    Income:Salary

2012/04/10 April pay
    Assets:Bank  1000.00
    Income:Salary
";

    fn journal() -> Journal {
        Journal::from_ledger(&Ledger::from_text(TEXT).unwrap())
    }

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd_opt(y, m, d).unwrap()
    }

    fn assets_params() -> ReportParameters {
        let mut params = ReportParameters::new("Net Worth", date(2012, 4, 30));
        params.accounts_with = Some(vec!["assets".to_string()]);
        params
    }

    #[test]
    fn points_are_cumulative_running_balances() {
        let summary = MonthlySummary::generate(&journal(), &assets_params()).unwrap();
        let points: Vec<_> = summary
            .points
            .iter()
            .map(|point| (point.month, point.total))
            .collect();
        assert_eq!(
            points,
            vec![
                (date(2012, 1, 1), "600.00".parse().unwrap()),
                (date(2012, 2, 1), "1600.00".parse().unwrap()),
                (date(2012, 4, 1), "2600.00".parse().unwrap()),
            ]
        );
    }

    #[test]
    fn earlier_buckets_seed_points_inside_the_period() {
        let mut params = assets_params();
        params.period_start = Some(date(2012, 2, 1));
        let summary = MonthlySummary::generate(&journal(), &params).unwrap();
        let points: Vec<_> = summary
            .points
            .iter()
            .map(|point| (point.month, point.total))
            .collect();
        assert_eq!(
            points,
            vec![
                (date(2012, 2, 1), "1600.00".parse().unwrap()),
                (date(2012, 4, 1), "2600.00".parse().unwrap()),
            ]
        );
    }

    #[test]
    fn matches_brute_force_summation() {
        let journal = journal();
        let params = assets_params();
        let summary = MonthlySummary::generate(&journal, &params).unwrap();
        for point in &summary.points {
            let expected: Decimal = journal
                .entries()
                .iter()
                .filter(|entry| entry.account.to_lowercase().contains("assets"))
                .filter(|entry| month_start(entry.header.date) <= point.month)
                .map(|entry| entry.amount.number)
                .sum();
            assert_eq!(point.total, expected);
        }
    }
}
