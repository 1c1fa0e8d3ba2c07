use crate::Location;
use std::fmt;

/// The literal one- and two-character symbols recognized by the tokenizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sym {
    Equals,
    LParen,
    RParen,
    Lt,
    Gt,
    Slash,
    Star,
    Plus,
    Minus,
    Bang,
    Amp,
    Dollar,
    At,
    AtAt,
    Colon,
    Question,
    Hash,
    Percent,
    Comma,
    Dot,
    Apostrophe,
    Quote,
    LBracket,
    RBracket,
}

impl Sym {
    pub fn text(self) -> &'static str {
        match self {
            Sym::Equals => "=",
            Sym::LParen => "(",
            Sym::RParen => ")",
            Sym::Lt => "<",
            Sym::Gt => ">",
            Sym::Slash => "/",
            Sym::Star => "*",
            Sym::Plus => "+",
            Sym::Minus => "-",
            Sym::Bang => "!",
            Sym::Amp => "&",
            Sym::Dollar => "$",
            Sym::At => "@",
            Sym::AtAt => "@@",
            Sym::Colon => ":",
            Sym::Question => "?",
            Sym::Hash => "#",
            Sym::Percent => "%",
            Sym::Comma => ",",
            Sym::Dot => ".",
            Sym::Apostrophe => "'",
            Sym::Quote => "\"",
            Sym::LBracket => "[",
            Sym::RBracket => "]",
        }
    }
}

impl fmt::Display for Sym {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text())
    }
}

/// Two-character symbols, matched before one-character symbols.
pub(crate) const TWO_CHAR_SYMBOLS: &[(&str, Sym)] = &[("@@", Sym::AtAt)];

pub(crate) const ONE_CHAR_SYMBOLS: &[(char, Sym)] = &[
    ('=', Sym::Equals),
    ('(', Sym::LParen),
    (')', Sym::RParen),
    ('<', Sym::Lt),
    ('>', Sym::Gt),
    ('/', Sym::Slash),
    ('*', Sym::Star),
    ('+', Sym::Plus),
    ('-', Sym::Minus),
    ('!', Sym::Bang),
    ('&', Sym::Amp),
    ('$', Sym::Dollar),
    ('@', Sym::At),
    (':', Sym::Colon),
    ('?', Sym::Question),
    ('#', Sym::Hash),
    ('%', Sym::Percent),
    (',', Sym::Comma),
    ('.', Sym::Dot),
    ('\'', Sym::Apostrophe),
    ('"', Sym::Quote),
    ('[', Sym::LBracket),
    (']', Sym::RBracket),
];

/// The classification of a [`Token`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Digits with `.`/`,` separators, optionally led by a minus sign.
    Number,
    /// A letter followed by letters, digits, and underscores.
    Word,
    /// A double-quoted string, quotes included, no escape handling.
    Str,
    /// A `;` comment running to the end of its line.
    Note,
    /// One line terminator (`\r\n`, `\n`, or `\r`).
    Linebreak,
    /// A run of spaces and tabs, collapsed into one token.
    Whitespace,
    /// A literal symbol from the fixed symbol table.
    Symbol(Sym),
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Number => write!(f, "Number"),
            TokenKind::Word => write!(f, "Identifier"),
            TokenKind::Str => write!(f, "String"),
            TokenKind::Note => write!(f, "Note"),
            TokenKind::Linebreak => write!(f, "Linebreak"),
            TokenKind::Whitespace => write!(f, "Whitespace"),
            TokenKind::Symbol(sym) => write!(f, "\"{}\"", sym),
            TokenKind::Eof => write!(f, "EOF"),
        }
    }
}

/// A classified unit of source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub location: Location,
}

impl Token {
    /// Renders the token for diagnostics, e.g. `Identifier("Assets")`.
    pub fn show(&self) -> String {
        match self.kind {
            TokenKind::Eof => "EOF".to_string(),
            _ => format!("{}({:?})", self.kind, self.text),
        }
    }
}
