//! A position-tracked character scanner over an in-memory source text.

use crate::{Location, SrcText};
use std::sync::Arc;

/// The character returned by [`Scanner::get`] once the source text is
/// exhausted.
pub const ENDMARK: char = '\0';

/// A single source character together with its 0-based position and a
/// reference back to the full source text, for diagnostic context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Character {
    pub ch: char,
    pub line: usize,
    pub col: usize,
    pub index: usize,
    pub src: SrcText,
}

impl Character {
    pub fn location(&self) -> Location {
        Location {
            line: self.line,
            col: self.col,
        }
    }

    pub fn is_end(&self) -> bool {
        self.ch == ENDMARK
    }
}

/// Reads through a source text and returns one [`Character`] at a time.
pub struct Scanner {
    src: SrcText,
    chars: Vec<char>,
    pos: usize,
    line: usize,
    col: usize,
}

impl Scanner {
    pub fn new(text: &str) -> Self {
        Scanner {
            src: Arc::new(text.to_string()),
            chars: text.chars().collect(),
            pos: 0,
            line: 0,
            col: 0,
        }
    }

    /// Returns the next character, advancing the cursor. The column resets
    /// and the line increments immediately after a `\n` is consumed. Once
    /// the text is exhausted every further call returns the end marker
    /// without advancing.
    pub fn get(&mut self) -> Character {
        match self.chars.get(self.pos).copied() {
            Some(ch) => {
                let character = Character {
                    ch,
                    line: self.line,
                    col: self.col,
                    index: self.pos,
                    src: self.src.clone(),
                };
                self.pos += 1;
                if ch == '\n' {
                    self.line += 1;
                    self.col = 0;
                } else {
                    self.col += 1;
                }
                character
            }
            None => Character {
                ch: ENDMARK,
                line: self.line,
                col: self.col,
                index: self.pos,
                src: self.src.clone(),
            },
        }
    }

    /// Peeks `n` characters ahead without consuming anything; `lookahead(1)`
    /// is the character the next [`get`](Scanner::get) would return. Out of
    /// range positions yield the end marker.
    pub fn lookahead(&self, n: usize) -> char {
        match (self.pos + n).checked_sub(1) {
            Some(index) => self.chars.get(index).copied().unwrap_or(ENDMARK),
            None => ENDMARK,
        }
    }
}
