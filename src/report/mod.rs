//! The report engine: account filtering, period bounding, lineage-based
//! aggregation, and the three report kinds.
//!
//! Every report is a pure function of an immutable [`Journal`] and a
//! [`ReportParameters`]; a failed report request never touches the journal.

mod balance;
mod params;
mod register;
mod summary;

pub use balance::{BalanceLine, BalanceReport};
pub use params::ReportParameters;
pub use register::{RegisterLine, RegisterReport};
pub use summary::{MonthlySummary, SummaryPoint};

use crate::{Account, Date, Error, Journal};
use regex::{Regex, RegexBuilder};
use std::collections::HashSet;

/// The accounts a report covers: every account matching at least one
/// inclusion term (or all, with no terms) and none of the exclusion terms.
/// Terms match case-insensitively, as substrings or regex alternations.
pub(crate) fn filter_accounts(
    journal: &Journal,
    params: &ReportParameters,
) -> Result<HashSet<Account>, Error> {
    let include = compile_terms(params.accounts_with.as_deref())?;
    let exclude = compile_terms(params.exclude_accounts_with.as_deref())?;
    Ok(journal
        .all_accounts()
        .iter()
        .filter(|account| {
            let included = include
                .as_ref()
                .map_or(true, |regex| regex.is_match(account));
            let excluded = exclude
                .as_ref()
                .map_or(false, |regex| regex.is_match(account));
            included && !excluded
        })
        .cloned()
        .collect())
}

fn compile_terms(terms: Option<&[String]>) -> Result<Option<Regex>, Error> {
    match terms {
        None => Ok(None),
        Some([]) => Ok(None),
        Some(terms) => RegexBuilder::new(&terms.join("|"))
            .case_insensitive(true)
            .build()
            .map(Some)
            .map_err(|err| Error::query(format!("Invalid account match terms: {}.", err))),
    }
}

/// True when `date` falls inside the inclusive period bounds; an absent
/// bound is unbounded on that side.
pub(crate) fn within_period(date: Date, params: &ReportParameters) -> bool {
    params.period_start.map_or(true, |start| date >= start)
        && params.period_end.map_or(true, |end| date <= end)
}
