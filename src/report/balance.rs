use super::{filter_accounts, within_period, ReportParameters};
use crate::{Account, Decimal, Error, Journal};
use rust_decimal::prelude::Zero;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// One row of a balance report, ready for rendering.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceLine {
    /// The account's full internal key path; empty for the grand total.
    pub account: Account,
    /// The path with redundant ancestor prefixes stripped.
    pub display_name: String,
    pub balance: Decimal,
    /// How many surviving ancestors this row is displayed under.
    pub depth: usize,
    pub is_grand_total: bool,
}

/// A point-in-time balance sheet or period income statement.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceReport {
    pub title: String,
    pub subtitle: String,
    pub lines: Vec<BalanceLine>,
}

impl BalanceReport {
    /// Aggregates in-scope, in-period postings up each account lineage,
    /// collapses redundant ancestors, and appends the grand total row.
    pub fn generate(journal: &Journal, params: &ReportParameters) -> Result<Self, Error> {
        let accounts = filter_accounts(journal, params)?;

        // attribute every posting's amount to its whole lineage, and keep
        // the leaf-only sum for the grand total
        let mut nets: HashMap<Account, Decimal> = HashMap::new();
        let mut grand_total = Decimal::ZERO;
        for entry in journal.entries() {
            if !accounts.contains(&entry.account) || !within_period(entry.header.date, params) {
                continue;
            }
            grand_total += entry.amount.number;
            for account in &entry.lineage {
                *nets.entry(account.clone()).or_default() += entry.amount.number;
            }
        }
        nets.retain(|_, number| !number.is_zero());

        // an account is redundant when one of its descendants explains its
        // whole balance
        let mut survivors: Vec<(Account, Decimal)> = nets
            .iter()
            .filter(|(account, number)| {
                !nets.iter().any(|(other, other_number)| {
                    is_strict_descendant(other.as_str(), account.as_str())
                        && other_number == *number
                })
            })
            .map(|(account, number)| (account.clone(), *number))
            .collect();
        survivors.sort_by(|a, b| a.0.cmp(&b.0));

        let suppressed: Vec<Account> = nets
            .keys()
            .filter(|account| {
                !survivors
                    .iter()
                    .any(|(survivor, _)| survivor.as_str() == account.as_str())
            })
            .cloned()
            .collect();

        let mut lines = Vec::with_capacity(survivors.len() + 1);
        for (account, number) in &survivors {
            let mut depth = 0;
            let mut parent: Option<&Account> = None;
            for (other, _) in &survivors {
                if is_strict_descendant(account.as_str(), other.as_str()) {
                    depth += 1;
                    // sorted order: the last match is the nearest ancestor
                    parent = Some(other);
                }
            }
            let display_name = match parent {
                Some(parent) => account[parent.len() + 1..].to_string(),
                None => match suppressed
                    .iter()
                    .filter(|ancestor| is_strict_descendant(account.as_str(), ancestor.as_str()))
                    .min_by_key(|ancestor| ancestor.len())
                {
                    Some(top) => account[top.len() + 1..].to_string(),
                    None => account.to_string(),
                },
            };
            lines.push(BalanceLine {
                account: account.clone(),
                display_name,
                balance: *number,
                depth,
                is_grand_total: false,
            });
        }
        lines.push(BalanceLine {
            account: Arc::new(String::new()),
            display_name: String::new(),
            balance: grand_total,
            depth: 0,
            is_grand_total: true,
        });

        Ok(BalanceReport {
            title: params.title.clone(),
            subtitle: subtitle(params),
            lines,
        })
    }
}

fn is_strict_descendant(child: &str, ancestor: &str) -> bool {
    !ancestor.is_empty()
        && child
            .strip_prefix(ancestor)
            .map_or(false, |rest| rest.starts_with(':'))
}

fn subtitle(params: &ReportParameters) -> String {
    const FORMAT: &str = "%B %d, %Y";
    match (params.period_start, params.period_end) {
        (Some(start), Some(end)) => format!(
            "For the period of {} to {}",
            start.format(FORMAT),
            end.format(FORMAT)
        ),
        (Some(start), None) => format!("Since {}", start.format(FORMAT)),
        (None, Some(end)) => format!("Up to {}", end.format(FORMAT)),
        (None, None) => format!("As of {}", params.today.format(FORMAT)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Date, Ledger};

    fn journal(text: &str) -> Journal {
        Journal::from_ledger(&Ledger::from_text(text).unwrap())
    }

    fn today() -> Date {
        Date::from_ymd_opt(2012, 4, 30).unwrap()
    }

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn params(terms: &[&str]) -> ReportParameters {
        let mut params = ReportParameters::new("Balance", today());
        if !terms.is_empty() {
            params.accounts_with = Some(terms.iter().map(|t| t.to_string()).collect());
        }
        params
    }

    #[test]
    fn collapses_an_ancestor_explained_by_one_descendant() {
        let journal = journal(
            "2012/04/01 Deposit\n    Assets:Bank  100.00\n    Income:Gift\n",
        );
        let report =
            BalanceReport::generate(&journal, &params(&["assets"])).unwrap();
        let rows: Vec<_> = report
            .lines
            .iter()
            .filter(|line| !line.is_grand_total)
            .collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].display_name, "Bank");
        assert_eq!(rows[0].account.as_str(), "Assets:Bank");
        assert_eq!(rows[0].depth, 0);
        assert_eq!(rows[0].balance, dec("100.00"));
    }

    #[test]
    fn end_to_end_paycheck_report() {
        let journal = journal(
            "2012/04/01 Paycheck\n    Assets:Bank:Checking  1000.00\n    Income:Salary\n",
        );
        let report =
            BalanceReport::generate(&journal, &params(&["assets", "liabilities"])).unwrap();
        let rows: Vec<_> = report
            .lines
            .iter()
            .filter(|line| !line.is_grand_total)
            .collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].display_name, "Bank:Checking");
        assert_eq!(rows[0].balance, dec("1000.00"));
        let total = report.lines.last().unwrap();
        assert!(total.is_grand_total);
        assert_eq!(total.balance, dec("1000.00"));
        assert_eq!(total.depth, 0);
    }

    #[test]
    fn surviving_ancestors_indent_their_descendants() {
        let journal = journal(
            "2012/04/01 Deposit\n    Assets:Bank  60.00\n    Assets:Cash  40.00\n    Income:Gift\n",
        );
        let report = BalanceReport::generate(&journal, &params(&["assets"])).unwrap();
        let rows: Vec<_> = report
            .lines
            .iter()
            .filter(|line| !line.is_grand_total)
            .map(|line| (line.display_name.as_str(), line.depth, line.balance))
            .collect();
        assert_eq!(
            rows,
            vec![
                ("Assets", 0, dec("100.00")),
                ("Bank", 1, dec("60.00")),
                ("Cash", 1, dec("40.00")),
            ]
        );
    }

    #[test]
    fn zero_net_accounts_are_dropped() {
        let journal = journal(
            "2012/04/01 Wash\n    Assets:Bank  25.00\n    Assets:Cash  -25.00\n",
        );
        let report = BalanceReport::generate(&journal, &params(&[])).unwrap();
        let names: Vec<_> = report
            .lines
            .iter()
            .filter(|line| !line.is_grand_total)
            .map(|line| line.account.as_str())
            .collect();
        // the shared Assets parent nets to zero and disappears
        assert_eq!(names, vec!["Assets:Bank", "Assets:Cash"]);
    }

    #[test]
    fn filtering_excludes_matching_accounts() {
        let journal = journal(
            "2012/04/15 Paycheck\n    Assets:Bank  1500.00\n    Income:Salary\n\n2012/04/20 Bonus\n    Assets:Bank  300.00\n    Income:Bonus\n",
        );
        let mut params = params(&["income"]);
        params.exclude_accounts_with = Some(vec!["Bonus".to_string()]);
        let report = BalanceReport::generate(&journal, &params).unwrap();
        let rows: Vec<_> = report
            .lines
            .iter()
            .filter(|line| !line.is_grand_total)
            .collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].account.as_str(), "Income:Salary");
        assert_eq!(rows[0].balance, dec("-1500.00"));
    }

    #[test]
    fn period_bounds_limit_the_aggregation() {
        let journal = journal(
            "2012/03/01 March\n    Assets:Bank  10.00\n    Income:Gift\n\n2012/04/01 April\n    Assets:Bank  5.00\n    Income:Gift\n",
        );
        let mut params = params(&["assets"]);
        params.period_start = Some(Date::from_ymd_opt(2012, 4, 1).unwrap());
        let report = BalanceReport::generate(&journal, &params).unwrap();
        let total = report.lines.last().unwrap();
        assert_eq!(total.balance, dec("5.00"));
    }

    #[test]
    fn subtitle_describes_the_period() {
        let journal = journal(
            "2012/04/01 Deposit\n    Assets:Bank  1.00\n    Income:Gift\n",
        );
        let mut bounded = params(&[]);
        bounded.period_start = Some(Date::from_ymd_opt(2012, 4, 1).unwrap());
        bounded.period_end = Some(Date::from_ymd_opt(2012, 4, 30).unwrap());
        let report = BalanceReport::generate(&journal, &bounded).unwrap();
        assert_eq!(
            report.subtitle,
            "For the period of April 01, 2012 to April 30, 2012"
        );
        let report = BalanceReport::generate(&journal, &params(&[])).unwrap();
        assert_eq!(report.subtitle, "As of April 30, 2012");
    }
}
