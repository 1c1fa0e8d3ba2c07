//! The flattened journal: one record per posting, each carrying its entry's
//! shared header and a precomputed account lineage.

use crate::{Account, Amount, Date, Ledger, PostingKind, Status};
use getset::Getters;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

/// The fields shared by every posting of one entry. The `note` field is
/// reserved and always empty at construction time.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Header {
    pub date: Date,
    pub status: Status,
    pub code: Option<String>,
    pub description: String,
    pub note: Option<String>,
}

/// One flattened posting: the shared header, the posting fields, and the
/// account lineage, longest path first.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalEntry {
    pub header: Arc<Header>,
    pub account: Account,
    pub kind: PostingKind,
    pub amount: Amount,
    pub value: Option<Amount>,
    pub note: Option<String>,
    pub lineage: Vec<Account>,
}

/// An ordered sequence of [`JournalEntry`]s plus the derived account sets.
/// Immutable after construction; reports only ever read it, so one journal
/// may serve any number of concurrent report calls.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct Journal {
    /// Returns the flattened postings in source order.
    #[getset(get = "pub")]
    pub(crate) entries: Vec<JournalEntry>,

    /// Returns the accounts that appear as an exact posting target.
    #[getset(get = "pub")]
    pub(crate) leaf_accounts: HashSet<Account>,

    /// Returns the leaf accounts plus every ancestor in every lineage.
    #[getset(get = "pub")]
    pub(crate) all_accounts: HashSet<Account>,
}

impl Journal {
    /// Flattens a ledger, computing each posting's lineage and accumulating
    /// the leaf and ancestor account sets along the way.
    pub fn from_ledger(ledger: &Ledger) -> Journal {
        let mut entries = Vec::new();
        let mut leaf_accounts = HashSet::new();
        let mut all_accounts = HashSet::new();

        for entry in ledger.entries() {
            let header = Arc::new(Header {
                date: entry.date(),
                status: entry.status(),
                code: entry.code().clone(),
                description: entry.description().clone(),
                note: None,
            });
            for posting in entry.postings() {
                let lineage = account_lineage(&posting.account);
                leaf_accounts.insert(posting.account.clone());
                for account in &lineage {
                    all_accounts.insert(account.clone());
                }
                entries.push(JournalEntry {
                    header: header.clone(),
                    account: posting.account.clone(),
                    kind: posting.kind,
                    amount: posting.amount.clone(),
                    value: posting.value.clone(),
                    note: posting.note.clone(),
                    lineage,
                });
            }
        }

        Journal {
            entries,
            leaf_accounts,
            all_accounts,
        }
    }
}

/// The account path and each successively shorter colon-truncated prefix,
/// longest first.
pub fn account_lineage(account: &Account) -> Vec<Account> {
    let mut lineage = vec![account.clone()];
    let mut path = account.as_str();
    while let Some(index) = path.rfind(':') {
        path = &path[..index];
        lineage.push(Arc::new(path.to_string()));
    }
    lineage
}
