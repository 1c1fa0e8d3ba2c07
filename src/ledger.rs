pub use chrono::NaiveDate as Date;
use getset::{CopyGetters, Getters};
pub use rust_decimal::Decimal;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Representing a location, line number and column number (both 0-based),
/// in a source text.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Location {
    pub line: usize,
    pub col: usize,
}

impl Location {
    pub fn advance(&self, width: usize) -> Self {
        Location {
            col: self.col + width,
            line: self.line,
        }
    }
}

impl From<(usize, usize)> for Location {
    fn from(tuple: (usize, usize)) -> Self {
        Location {
            line: tuple.0,
            col: tuple.1,
        }
    }
}

/// A string wrapped in [`Arc`](std::sync::Arc)
/// representing the full source text.
pub type SrcText = Arc<String>;

/// Represents a range in the source text. This struct is used to track the
/// origins of any information in the generated [`Ledger`], as well as for
/// locating errors.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Source {
    pub start: Location,
    pub end: Location,
}

impl Source {
    pub fn at(location: Location) -> Self {
        Source {
            start: location,
            end: location,
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.start.line, self.start.col)
    }
}

/// Kinds of errors that `tally` encountered while turning input text into a
/// [`Ledger`] or while interpreting report parameters.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorType {
    /// An unrecognized character in the source text.
    Lex,
    /// A token-type mismatch in the source text.
    Syntax,
    /// Indicates an entry whose postings cannot be balanced.
    NotBalanced,
    /// An invalid report command or period expression. Local to one report
    /// request; the journal is unaffected.
    Query,
}

impl ErrorType {
    fn label(&self) -> &'static str {
        match self {
            ErrorType::Lex => "lex error",
            ErrorType::Syntax => "syntax error",
            ErrorType::NotBalanced => "balance error",
            ErrorType::Query => "query error",
        }
    }
}

/// Contains the full information of an error. Lex, syntax, and balance
/// errors abort the parse: either the whole text becomes a valid [`Ledger`]
/// or nothing does.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Error {
    pub msg: String,
    pub src: Option<Source>,
    pub r#type: ErrorType,
}

impl Error {
    pub(crate) fn lex(msg: impl Into<String>, src: Source) -> Self {
        Error {
            msg: msg.into(),
            src: Some(src),
            r#type: ErrorType::Lex,
        }
    }

    pub(crate) fn syntax(msg: impl Into<String>, src: Source) -> Self {
        Error {
            msg: msg.into(),
            src: Some(src),
            r#type: ErrorType::Syntax,
        }
    }

    pub(crate) fn balance(msg: impl Into<String>, src: Source) -> Self {
        Error {
            msg: msg.into(),
            src: Some(src),
            r#type: ErrorType::NotBalanced,
        }
    }

    pub(crate) fn query(msg: impl Into<String>) -> Self {
        Error {
            msg: msg.into(),
            src: None,
            r#type: ErrorType::Query,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.r#type.label(), self.msg)?;
        if let Some(src) = &self.src {
            write!(f, "\n  at {}", src)?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {}

pub type Currency = String;

/// A [`Decimal`] number plus an optional commodity.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Amount {
    pub number: Decimal,
    pub commodity: Option<Currency>,
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.commodity {
            Some(commodity) => write!(f, "{} {}", self.number, commodity),
            None => write!(f, "{}", self.number),
        }
    }
}

/// The cleared status of an [`Entry`].
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Status {
    /// Entries flagged by `*`.
    Cleared,
    /// Entries flagged by `!`.
    Pending,
    /// Entries with no flag.
    Uncleared,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Cleared => write!(f, "*"),
            Status::Pending => write!(f, "!"),
            Status::Uncleared => Ok(()),
        }
    }
}

/// How a posting participates in balancing, derived from the account syntax:
/// `(...)` is virtual unbalanced, `[...]` is virtual balanced, a bare
/// account is real.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PostingKind {
    /// Nets to zero with the other real postings of its entry.
    Real,
    /// Nets to zero with the other virtual balanced postings of its entry.
    VirtualBalanced,
    /// Carries no netting requirement; must state an explicit amount.
    VirtualUnbalanced,
}

/// A string wrapped in [`Arc`](std::sync::Arc)
/// representing a colon-delimited account path.
pub type Account = Arc<String>;

/// A posting like `Assets:Bank:Checking  1500.00` inside an [`Entry`].
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Posting {
    pub account: Account,
    pub kind: PostingKind,
    pub amount: Amount,
    /// The converted value recorded with `@` (amount times unit price) or
    /// `@@` (total price, taken verbatim).
    pub value: Option<Amount>,
    pub note: Option<String>,
}

/// Represents one dated, described group of postings sharing a header.
///
/// After construction the real postings sum to exactly zero, and so do the
/// virtual balanced postings; every posting carries an amount.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Getters, CopyGetters)]
pub struct Entry {
    /// Returns the entry date.
    #[getset(get_copy = "pub")]
    pub(crate) date: Date,

    /// Returns the cleared status.
    #[getset(get_copy = "pub")]
    pub(crate) status: Status,

    /// Returns the entry code, if any.
    #[getset(get = "pub")]
    pub(crate) code: Option<String>,

    /// Returns the description.
    #[getset(get = "pub")]
    pub(crate) description: String,

    /// Returns the postings of this entry.
    #[getset(get = "pub")]
    pub(crate) postings: Vec<Posting>,

    /// Returns the source span of this entry.
    #[getset(get = "pub")]
    pub(crate) src: Source,
}

/// Represents a valid ledger containing balanced entries in source order.
/// Immutable once built.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct Ledger {
    /// Returns the entries in source order.
    #[getset(get = "pub")]
    pub(crate) entries: Vec<Entry>,
}

impl Ledger {
    /// Parses a journal text into a validated, balanced ledger.
    ///
    /// The text either parses completely or not at all; no partial ledger is
    /// ever produced.
    pub fn from_text(text: &str) -> Result<Self, Error> {
        let ast = crate::parse::Parser::parse(text)?;
        let entries = crate::parse::build_entries(&ast)?;
        Ok(Ledger { entries })
    }
}
