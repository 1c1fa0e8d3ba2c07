use super::scanner::{Character, Scanner, ENDMARK};
use super::token::{Token, TokenKind, ONE_CHAR_SYMBOLS, TWO_CHAR_SYMBOLS};
use crate::{Error, Location, Source};

fn is_whitespace(c: char) -> bool {
    c == ' ' || c == '\t'
}

fn is_number_char(c: char) -> bool {
    c.is_ascii_digit() || c == '.' || c == ','
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Groups the scanner's character stream into [`Token`]s, longest match
/// first.
pub struct Lexer {
    scanner: Scanner,
    ch: Character,
}

impl Lexer {
    pub fn new(text: &str) -> Self {
        let mut scanner = Scanner::new(text);
        let ch = scanner.get();
        Lexer { scanner, ch }
    }

    fn advance(&mut self) {
        self.ch = self.scanner.get();
    }

    /// Classifies the characters at the cursor into the next token. After
    /// the source is exhausted, every call returns an `EOF` token.
    pub fn next_token(&mut self) -> Result<Token, Error> {
        let location = self.ch.location();
        let c = self.ch.ch;

        if c == ENDMARK {
            return Ok(self.token(TokenKind::Eof, String::new(), location));
        }
        if is_whitespace(c) {
            let text = self.take_while(is_whitespace);
            return Ok(self.token(TokenKind::Whitespace, text, location));
        }
        if c == '\r' || c == '\n' {
            // one token per line terminator, so a blank line is visible to
            // the grammar as a second Linebreak
            let mut text = String::new();
            if c == '\r' {
                text.push(c);
                self.advance();
            }
            if self.ch.ch == '\n' {
                text.push('\n');
                self.advance();
            }
            return Ok(self.token(TokenKind::Linebreak, text, location));
        }
        if c == ';' {
            let text = self.take_while(|c| c != '\r' && c != '\n' && c != ENDMARK);
            return Ok(self.token(TokenKind::Note, text, location));
        }
        if c == '"' {
            return self.string_token(location);
        }
        if c.is_ascii_digit() || (c == '-' && self.scanner.lookahead(1).is_ascii_digit()) {
            let mut text = String::new();
            text.push(c);
            self.advance();
            text.push_str(&self.take_while(is_number_char));
            return Ok(self.token(TokenKind::Number, text, location));
        }
        if c.is_alphabetic() {
            let text = self.take_while(is_word_char);
            return Ok(self.token(TokenKind::Word, text, location));
        }
        for (text, sym) in TWO_CHAR_SYMBOLS {
            let mut chars = text.chars();
            if chars.next() == Some(c) && chars.next() == Some(self.scanner.lookahead(1)) {
                self.advance();
                self.advance();
                return Ok(self.token(TokenKind::Symbol(*sym), text.to_string(), location));
            }
        }
        for (symbol_char, sym) in ONE_CHAR_SYMBOLS {
            if *symbol_char == c {
                self.advance();
                return Ok(self.token(TokenKind::Symbol(*sym), c.to_string(), location));
            }
        }
        Err(Error::lex(
            format!("Unexpected character {:?}.", c),
            Source::at(location),
        ))
    }

    fn string_token(&mut self, location: Location) -> Result<Token, Error> {
        let mut text = String::from('"');
        self.advance();
        while self.ch.ch != '"' {
            if self.ch.ch == ENDMARK {
                return Err(Error::lex(
                    "Unterminated string.".to_string(),
                    Source::at(location),
                ));
            }
            text.push(self.ch.ch);
            self.advance();
        }
        text.push('"');
        self.advance();
        Ok(self.token(TokenKind::Str, text, location))
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> String {
        let mut text = String::new();
        while self.ch.ch != ENDMARK && pred(self.ch.ch) {
            text.push(self.ch.ch);
            self.advance();
        }
        text
    }

    fn token(&self, kind: TokenKind, text: String, location: Location) -> Token {
        Token {
            kind,
            text,
            location,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::token::Sym;

    fn kinds(text: &str) -> Vec<TokenKind> {
        let mut lexer = Lexer::new(text);
        let mut kinds = Vec::new();
        loop {
            let token = lexer.next_token().unwrap();
            let kind = token.kind;
            kinds.push(kind);
            if kind == TokenKind::Eof {
                return kinds;
            }
        }
    }

    #[test]
    fn classifies_an_entry_line() {
        assert_eq!(
            kinds("2012/04/15 * (CHK001) Paycheck\n"),
            vec![
                TokenKind::Number,
                TokenKind::Symbol(Sym::Slash),
                TokenKind::Number,
                TokenKind::Symbol(Sym::Slash),
                TokenKind::Number,
                TokenKind::Whitespace,
                TokenKind::Symbol(Sym::Star),
                TokenKind::Whitespace,
                TokenKind::Symbol(Sym::LParen),
                TokenKind::Word,
                TokenKind::Symbol(Sym::RParen),
                TokenKind::Whitespace,
                TokenKind::Word,
                TokenKind::Linebreak,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn two_char_symbols_take_precedence() {
        assert_eq!(
            kinds("@@ @"),
            vec![
                TokenKind::Symbol(Sym::AtAt),
                TokenKind::Whitespace,
                TokenKind::Symbol(Sym::At),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn numbers_take_separators_and_a_leading_minus() {
        let mut lexer = Lexer::new("-1,500.00 12");
        let token = lexer.next_token().unwrap();
        assert_eq!(token.kind, TokenKind::Number);
        assert_eq!(token.text, "-1,500.00");
    }

    #[test]
    fn minus_without_a_digit_is_a_symbol() {
        assert_eq!(
            kinds("a-b"),
            vec![
                TokenKind::Word,
                TokenKind::Symbol(Sym::Minus),
                TokenKind::Word,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn notes_run_to_the_end_of_the_line() {
        let mut lexer = Lexer::new("; a note\nx");
        let token = lexer.next_token().unwrap();
        assert_eq!(token.kind, TokenKind::Note);
        assert_eq!(token.text, "; a note");
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Linebreak);
    }

    #[test]
    fn whitespace_runs_collapse() {
        let mut lexer = Lexer::new(" \t  x");
        let token = lexer.next_token().unwrap();
        assert_eq!(token.kind, TokenKind::Whitespace);
        assert_eq!(token.text, " \t  ");
    }

    #[test]
    fn each_line_terminator_is_its_own_token() {
        assert_eq!(
            kinds("\r\n\n"),
            vec![TokenKind::Linebreak, TokenKind::Linebreak, TokenKind::Eof]
        );
    }

    #[test]
    fn strings_keep_their_quotes() {
        let mut lexer = Lexer::new("\"MUTF 500\"");
        let token = lexer.next_token().unwrap();
        assert_eq!(token.kind, TokenKind::Str);
        assert_eq!(token.text, "\"MUTF 500\"");
    }

    #[test]
    fn unterminated_string_is_a_lex_error() {
        let mut lexer = Lexer::new("\"oops");
        let err = lexer.next_token().unwrap_err();
        assert_eq!(err.r#type, crate::ErrorType::Lex);
    }

    #[test]
    fn unexpected_character_is_a_lex_error() {
        let mut lexer = Lexer::new("a^b");
        lexer.next_token().unwrap();
        let err = lexer.next_token().unwrap_err();
        assert_eq!(err.r#type, crate::ErrorType::Lex);
        assert_eq!(err.src.unwrap().start, Location { line: 0, col: 1 });
    }
}
