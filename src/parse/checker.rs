use rust_decimal::prelude::Zero;

use super::ast::{Child, Node, NodeKind};
use super::token::{Sym, TokenKind};
use crate::utils::parse_decimal;
use crate::{
    Account, Amount, Currency, Date, Decimal, Entry, Error, Posting, PostingKind, Source, Status,
};
use std::fmt;
use std::sync::Arc;

/// An [`Entry`] under construction: postings may still be missing amounts
/// until the balancer has run.
#[derive(Debug)]
pub(crate) struct EntryDraft {
    pub date: Date,
    pub status: Status,
    pub code: Option<String>,
    pub description: String,
    pub postings: Vec<PostingDraft>,
    pub src: Source,
}

#[derive(Debug)]
pub(crate) struct PostingDraft {
    pub account: Account,
    pub kind: PostingKind,
    pub amount: Option<Amount>,
    pub value: Option<Amount>,
    pub note: Option<String>,
}

impl fmt::Display for EntryDraft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.date.format("%Y/%m/%d"))?;
        if self.status != Status::Uncleared {
            write!(f, " {}", self.status)?;
        }
        if let Some(code) = &self.code {
            write!(f, " ({})", code)?;
        }
        write!(f, " {}", self.description)?;
        for posting in &self.postings {
            write!(f, "\n    {}", posting)?;
        }
        Ok(())
    }
}

impl fmt::Display for PostingDraft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            PostingKind::Real => write!(f, "{}", self.account)?,
            PostingKind::VirtualUnbalanced => write!(f, "({})", self.account)?,
            PostingKind::VirtualBalanced => write!(f, "[{}]", self.account)?,
        }
        if let Some(amount) = &self.amount {
            write!(f, "  {}", amount)?;
        }
        if let Some(value) = &self.value {
            write!(f, " @@ {}", value)?;
        }
        if let Some(note) = &self.note {
            write!(f, "  ; {}", note)?;
        }
        Ok(())
    }
}

/// Walks the generic syntax tree into domain entries, balancing each one.
pub(crate) fn build_entries(ast: &Node) -> Result<Vec<Entry>, Error> {
    let mut entries = Vec::new();
    for node in ast.nodes() {
        if node.kind == NodeKind::Entry {
            let mut draft = build_entry(node)?;
            balance_entry(&mut draft)?;
            entries.push(complete_entry(draft)?);
        }
    }
    Ok(entries)
}

fn node_src(node: &Node) -> Source {
    Source::at(node.location().unwrap_or_default())
}

fn build_entry(node: &Node) -> Result<EntryDraft, Error> {
    let src = node_src(node);
    let mut date = None;
    let mut status = Status::Uncleared;
    let mut code = None;
    let mut description = String::new();
    let mut postings = Vec::new();

    for child in &node.children {
        match child {
            Child::Node(child) => match child.kind {
                NodeKind::Date => date = Some(build_date(child)?),
                NodeKind::Code => code = Some(child.text()),
                NodeKind::Description => description = child.text(),
                NodeKind::Transaction => postings.push(build_posting(child)?),
                kind => {
                    return Err(Error::syntax(
                        format!("Unexpected {:?} node under an entry.", kind),
                        node_src(child),
                    ))
                }
            },
            Child::Token(token) => match token.kind {
                TokenKind::Symbol(Sym::Star) => status = Status::Cleared,
                TokenKind::Symbol(Sym::Bang) => status = Status::Pending,
                _ => {}
            },
        }
    }

    let date = date.ok_or_else(|| Error::syntax("Entry without a date.".to_string(), src.clone()))?;
    Ok(EntryDraft {
        date,
        status,
        code,
        description,
        postings,
        src,
    })
}

/// Reads `YYYY/MM/DD` out of the three number tokens of a date node.
fn build_date(node: &Node) -> Result<Date, Error> {
    let src = node_src(node);
    let text = node.text();
    let numbers: Vec<&str> = node
        .tokens()
        .filter(|token| token.kind == TokenKind::Number)
        .map(|token| token.text.as_str())
        .collect();
    let invalid = || Error::syntax(format!("Invalid date: {}.", text), src.clone());
    if numbers.len() != 3 {
        return Err(invalid());
    }
    let year = numbers[0].parse::<i32>().map_err(|_| invalid())?;
    let month = numbers[1].parse::<u32>().map_err(|_| invalid())?;
    let day = numbers[2].parse::<u32>().map_err(|_| invalid())?;
    Date::from_ymd_opt(year, month, day).ok_or_else(invalid)
}

fn build_posting(node: &Node) -> Result<PostingDraft, Error> {
    let mut account = Arc::new(String::new());
    let mut kind = PostingKind::Real;
    let mut amount: Option<Amount> = None;
    let mut price: Option<(Sym, Amount)> = None;
    let mut note = None;

    for child in &node.children {
        match child {
            Child::Node(child) => match child.kind {
                NodeKind::Account => {
                    let (parsed, parsed_kind) = build_account(child);
                    account = parsed;
                    kind = parsed_kind;
                }
                NodeKind::Amount => amount = Some(build_amount(child)?),
                NodeKind::Value => price = Some(build_value(child)?),
                other => {
                    return Err(Error::syntax(
                        format!("Unexpected {:?} node under a transaction.", other),
                        node_src(child),
                    ))
                }
            },
            Child::Token(token) if token.kind == TokenKind::Note => {
                note = Some(token.text.trim_start_matches(';').trim().to_string());
            }
            Child::Token(_) => {}
        }
    }

    let value = match price {
        None => None,
        // @@ records the stated total verbatim
        Some((Sym::AtAt, total)) => Some(total),
        // @ converts through the unit price; the commodity comes from the price
        Some((_, unit_price)) => {
            let amount = amount.as_ref().ok_or_else(|| {
                Error::syntax("Unit price without an amount.".to_string(), node_src(node))
            })?;
            Some(Amount {
                number: amount.number * unit_price.number,
                commodity: unit_price.commodity,
            })
        }
    };

    Ok(PostingDraft {
        account,
        kind,
        amount,
        value,
        note,
    })
}

/// Classifies the raw account text: `(...)` is virtual unbalanced, `[...]`
/// is virtual balanced, anything else is real.
fn build_account(node: &Node) -> (Account, PostingKind) {
    let raw = node.text();
    if raw.starts_with('(') {
        let stripped = raw.trim_start_matches('(').trim_end_matches(')');
        (Arc::new(stripped.to_string()), PostingKind::VirtualUnbalanced)
    } else if raw.starts_with('[') {
        let stripped = raw.trim_start_matches('[').trim_end_matches(']');
        (Arc::new(stripped.to_string()), PostingKind::VirtualBalanced)
    } else {
        (Arc::new(raw), PostingKind::Real)
    }
}

fn build_amount(node: &Node) -> Result<Amount, Error> {
    let src = node_src(node);
    let mut number = None;
    let mut commodity = None;
    for child in &node.children {
        match child {
            Child::Token(token) if token.kind == TokenKind::Number => {
                number = Some(parse_decimal(&token.text, &src)?);
            }
            Child::Node(child) if child.kind == NodeKind::Commodity => {
                commodity = Some(build_commodity(child));
            }
            _ => {}
        }
    }
    let number =
        number.ok_or_else(|| Error::syntax("Amount without a number.".to_string(), src))?;
    Ok(Amount { number, commodity })
}

fn build_commodity(node: &Node) -> Currency {
    let text = node.text();
    if text.len() >= 2 && text.starts_with('"') && text.ends_with('"') {
        text[1..text.len() - 1].to_string()
    } else {
        text
    }
}

fn build_value(node: &Node) -> Result<(Sym, Amount), Error> {
    let sym = node
        .tokens()
        .find_map(|token| match token.kind {
            TokenKind::Symbol(sym @ (Sym::At | Sym::AtAt)) => Some(sym),
            _ => None,
        })
        .ok_or_else(|| {
            Error::syntax("Value without a price marker.".to_string(), node_src(node))
        })?;
    let amount = node
        .nodes()
        .find(|child| child.kind == NodeKind::Amount)
        .ok_or_else(|| Error::syntax("Value without an amount.".to_string(), node_src(node)))?;
    Ok((sym, build_amount(amount)?))
}

/// The running state of one balancing group (real or virtual balanced).
#[derive(Default)]
struct Group {
    sum: Decimal,
    commodity: Option<Currency>,
    missing: Vec<usize>,
}

impl Group {
    fn add(&mut self, index: usize, posting: &PostingDraft) {
        match &posting.amount {
            Some(amount) => {
                self.sum += amount.number;
                if self.commodity.is_none() {
                    self.commodity = amount.commodity.clone();
                }
            }
            None => self.missing.push(index),
        }
    }
}

/// Verifies that an entry balances, filling in at most one missing amount
/// per group so the group nets to exactly zero.
///
/// Real and virtual balanced postings form independent groups that never
/// interact. Virtual unbalanced postings only need an explicit amount.
fn balance_entry(entry: &mut EntryDraft) -> Result<(), Error> {
    let mut real = Group::default();
    let mut virtual_balanced = Group::default();

    for (index, posting) in entry.postings.iter().enumerate() {
        match posting.kind {
            PostingKind::Real => real.add(index, posting),
            PostingKind::VirtualBalanced => virtual_balanced.add(index, posting),
            PostingKind::VirtualUnbalanced => {
                if posting.amount.is_none() {
                    return Err(Error::balance(
                        format!(
                            "This entry contains a virtual unbalanced posting without an amount:\n{}",
                            entry
                        ),
                        entry.src.clone(),
                    ));
                }
            }
        }
    }

    resolve_group(entry, real)?;
    resolve_group(entry, virtual_balanced)
}

fn resolve_group(entry: &mut EntryDraft, group: Group) -> Result<(), Error> {
    let Group {
        sum,
        commodity,
        missing,
    } = group;
    match missing.as_slice() {
        [] if sum.is_zero() => Ok(()),
        [] => Err(Error::balance(
            format!(
                "This entry does not balance, off by {}:\n{}",
                Amount {
                    number: sum,
                    commodity,
                },
                entry
            ),
            entry.src.clone(),
        )),
        [index] => {
            entry.postings[*index].amount = Some(Amount {
                number: -sum,
                commodity,
            });
            Ok(())
        }
        _ => Err(Error::balance(
            format!(
                "This entry has multiple postings without an amount and cannot be auto-balanced:\n{}",
                entry
            ),
            entry.src.clone(),
        )),
    }
}

fn complete_entry(draft: EntryDraft) -> Result<Entry, Error> {
    let EntryDraft {
        date,
        status,
        code,
        description,
        postings,
        src,
    } = draft;
    let mut complete = Vec::with_capacity(postings.len());
    for posting in postings {
        let PostingDraft {
            account,
            kind,
            amount,
            value,
            note,
        } = posting;
        let amount = amount.ok_or_else(|| {
            Error::balance("Posting left without an amount.".to_string(), src.clone())
        })?;
        complete.push(Posting {
            account,
            kind,
            amount,
            value,
            note,
        });
    }
    Ok(Entry {
        date,
        status,
        code,
        description,
        postings: complete,
        src,
    })
}
