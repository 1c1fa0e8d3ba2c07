use super::{filter_accounts, within_period, ReportParameters};
use crate::{Account, Date, Decimal, Error, Journal, JournalEntry};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One register row. The first row of a transaction group carries the date
/// and description; the rest are continuations.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterLine {
    pub date: Option<Date>,
    pub description: Option<String>,
    pub account: Account,
    pub amount: Decimal,
    /// The running total over the whole report up to and including this row.
    pub total: Decimal,
    pub is_continuation: bool,
}

/// A chronological register of in-scope postings, grouped back into their
/// original transactions, with a running total.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterReport {
    pub title: String,
    pub lines: Vec<RegisterLine>,
}

impl RegisterReport {
    /// Groups in-scope, in-period postings by `(date, description)`,
    /// walks the groups chronologically, and threads one running total
    /// through every row.
    pub fn generate(journal: &Journal, params: &ReportParameters) -> Result<Self, Error> {
        let accounts = filter_accounts(journal, params)?;

        let mut groups: BTreeMap<(Date, &str), Vec<&JournalEntry>> = BTreeMap::new();
        for entry in journal.entries() {
            if accounts.contains(&entry.account) && within_period(entry.header.date, params) {
                groups
                    .entry((entry.header.date, entry.header.description.as_str()))
                    .or_default()
                    .push(entry);
            }
        }

        let mut total = Decimal::ZERO;
        let mut lines = Vec::new();
        for ((date, description), group) in groups {
            let mut first = true;
            for entry in group {
                total += entry.amount.number;
                lines.push(RegisterLine {
                    date: if first { Some(date) } else { None },
                    description: if first {
                        Some(description.to_string())
                    } else {
                        None
                    },
                    account: entry.account.clone(),
                    amount: entry.amount.number,
                    total,
                    is_continuation: !first,
                });
                first = false;
            }
        }

        Ok(RegisterReport {
            title: params.title.clone(),
            lines,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Ledger;

    const TEXT: &str = "\
2012/04/20 Groceries
    Expenses:Food  55.00
    Assets:Bank

2012/04/15 Paycheck
    Assets:Bank  1500.00
    Income:Salary

2012/04/15 Lunch
    Expenses:Food  10.00
    Assets:Bank
";

    fn journal() -> Journal {
        Journal::from_ledger(&Ledger::from_text(TEXT).unwrap())
    }

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd_opt(y, m, d).unwrap()
    }

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn groups_sort_chronologically_and_keep_source_order_inside() {
        let mut params = ReportParameters::new("Register", date(2012, 4, 30));
        params.accounts_with = Some(vec!["assets".to_string(), "expenses".to_string()]);
        let report = RegisterReport::generate(&journal(), &params).unwrap();
        let rows: Vec<_> = report
            .lines
            .iter()
            .map(|line| {
                (
                    line.date,
                    line.account.as_str(),
                    line.amount,
                    line.total,
                    line.is_continuation,
                )
            })
            .collect();
        assert_eq!(
            rows,
            vec![
                (
                    Some(date(2012, 4, 15)),
                    "Expenses:Food",
                    dec("10.00"),
                    dec("10.00"),
                    false,
                ),
                (None, "Assets:Bank", dec("-10.00"), dec("0.00"), true),
                (
                    Some(date(2012, 4, 15)),
                    "Assets:Bank",
                    dec("1500.00"),
                    dec("1500.00"),
                    false,
                ),
                (
                    Some(date(2012, 4, 20)),
                    "Expenses:Food",
                    dec("55.00"),
                    dec("1555.00"),
                    false,
                ),
                (None, "Assets:Bank", dec("-55.00"), dec("1500.00"), true),
            ]
        );
    }

    #[test]
    fn first_line_of_a_group_carries_the_description() {
        let params = ReportParameters::new("Register", date(2012, 4, 30));
        let report = RegisterReport::generate(&journal(), &params).unwrap();
        let first = &report.lines[0];
        assert_eq!(first.description.as_deref(), Some("Lunch"));
        assert!(!first.is_continuation);
        assert_eq!(report.lines[1].description, None);
        assert!(report.lines[1].is_continuation);
    }

    #[test]
    fn period_bounds_drop_whole_groups() {
        let mut params = ReportParameters::new("Register", date(2012, 4, 30));
        params.period_end = Some(date(2012, 4, 15));
        let report = RegisterReport::generate(&journal(), &params).unwrap();
        assert!(report
            .lines
            .iter()
            .all(|line| line.date.map_or(true, |d| d <= date(2012, 4, 15))));
        assert_eq!(report.lines.len(), 4);
    }
}
