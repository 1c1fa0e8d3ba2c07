use super::ast::{Node, NodeKind};
use super::lexer::Lexer;
use super::token::{Sym, Token, TokenKind};
use crate::{Error, Source};
use log::trace;

/// A recursive-descent parser over the token stream, with a single token of
/// lookahead and no backtracking. Produces the generic syntax tree.
pub struct Parser {
    lexer: Lexer,
    token: Token,
}

impl Parser {
    /// Parses a journal text into the root `Ledger` node.
    pub fn parse(text: &str) -> Result<Node, Error> {
        let mut lexer = Lexer::new(text);
        let token = lexer.next_token()?;
        let mut parser = Parser { lexer, token };
        parser.ledger()
    }

    fn advance(&mut self) -> Result<(), Error> {
        self.token = self.lexer.next_token()?;
        Ok(())
    }

    fn found(&self, kind: TokenKind) -> bool {
        self.token.kind == kind
    }

    fn found_sym(&self, sym: Sym) -> bool {
        self.token.kind == TokenKind::Symbol(sym)
    }

    /// Clones the current token and advances past it.
    fn take(&mut self) -> Result<Token, Error> {
        let token = self.token.clone();
        self.advance()?;
        Ok(token)
    }

    fn consume(&mut self, kind: TokenKind) -> Result<(), Error> {
        if self.token.kind == kind {
            self.advance()
        } else {
            Err(self.expected(kind))
        }
    }

    fn eat_while(&mut self, kind: TokenKind) -> Result<(), Error> {
        while self.token.kind == kind {
            self.advance()?;
        }
        Ok(())
    }

    fn expected(&self, kind: TokenKind) -> Error {
        let start = self.token.location;
        Error::syntax(
            format!("Expected {}, found {}.", kind, self.token.show()),
            Source {
                start,
                end: start.advance(self.token.text.chars().count()),
            },
        )
    }

    /// `ledger = statement {statement} EOF`
    fn ledger(&mut self) -> Result<Node, Error> {
        trace!("ledger");
        let mut node = Node::new(NodeKind::Ledger);
        self.statement(&mut node)?;
        while !self.found(TokenKind::Eof) {
            self.statement(&mut node)?;
        }
        self.consume(TokenKind::Eof)?;
        Ok(node)
    }

    /// `statement = NOTE | LINEBREAK | WHITESPACE | entryStatement`
    fn statement(&mut self, node: &mut Node) -> Result<(), Error> {
        trace!("statement: {}", self.token.show());
        if self.found(TokenKind::Note) {
            // top-level notes are not retained
            self.advance()
        } else if self.found(TokenKind::Linebreak) {
            self.eat_while(TokenKind::Linebreak)
        } else if self.found(TokenKind::Whitespace) {
            self.eat_while(TokenKind::Whitespace)
        } else {
            self.entry_statement(node)
        }
    }

    /// `entryStatement = date WS [*|!] WS [(code)] description LB
    ///                   transaction {transaction}`
    fn entry_statement(&mut self, node: &mut Node) -> Result<(), Error> {
        trace!("entry_statement");
        let mut entry = Node::new(NodeKind::Entry);

        self.date(&mut entry)?;
        self.eat_while(TokenKind::Whitespace)?;

        if self.found_sym(Sym::Star) || self.found_sym(Sym::Bang) {
            let token = self.take()?;
            entry.add_token(token);
        }
        self.eat_while(TokenKind::Whitespace)?;

        if self.found_sym(Sym::LParen) {
            self.code(&mut entry)?;
        }
        self.eat_while(TokenKind::Whitespace)?;

        self.description(&mut entry)?;
        self.consume(TokenKind::Linebreak)?;

        self.transaction(&mut entry)?;
        while !self.found(TokenKind::Linebreak) && !self.found(TokenKind::Eof) {
            if self.found(TokenKind::Note) {
                // a line holding nothing but a note is skipped
                self.advance()?;
                self.consume(TokenKind::Linebreak)?;
            } else {
                self.transaction(&mut entry)?;
            }
        }

        node.add_node(entry);
        Ok(())
    }

    /// `date = NUMBER / NUMBER / NUMBER`
    fn date(&mut self, node: &mut Node) -> Result<(), Error> {
        trace!("date");
        let mut date = Node::new(NodeKind::Date);
        let shape = [
            TokenKind::Number,
            TokenKind::Symbol(Sym::Slash),
            TokenKind::Number,
            TokenKind::Symbol(Sym::Slash),
            TokenKind::Number,
        ];
        for kind in shape {
            if !self.found(kind) {
                return Err(self.expected(kind));
            }
            let token = self.take()?;
            date.add_token(token);
        }
        node.add_node(date);
        Ok(())
    }

    /// `code = ( anything {anything} )`
    fn code(&mut self, node: &mut Node) -> Result<(), Error> {
        trace!("code");
        let mut code = Node::new(NodeKind::Code);
        self.consume(TokenKind::Symbol(Sym::LParen))?;
        while !self.found_sym(Sym::RParen) && !self.found(TokenKind::Eof) {
            let token = self.take()?;
            code.add_token(token);
        }
        self.consume(TokenKind::Symbol(Sym::RParen))?;
        node.add_node(code);
        Ok(())
    }

    /// `description = anything {anything}` up to, excluding, the linebreak
    fn description(&mut self, node: &mut Node) -> Result<(), Error> {
        trace!("description");
        let mut description = Node::new(NodeKind::Description);
        while !self.found(TokenKind::Linebreak) && !self.found(TokenKind::Eof) {
            let token = self.take()?;
            description.add_token(token);
        }
        node.add_node(description);
        Ok(())
    }

    /// `transaction = WS account WS [amount [value] [NOTE]] LB | WS LB`
    fn transaction(&mut self, node: &mut Node) -> Result<(), Error> {
        trace!("transaction");
        self.consume(TokenKind::Whitespace)?;

        if !self.found(TokenKind::Linebreak) {
            let mut txn = Node::new(NodeKind::Transaction);
            self.account(&mut txn)?;
            self.eat_while(TokenKind::Whitespace)?;

            if !self.found(TokenKind::Linebreak) {
                self.amount(&mut txn)?;
                self.eat_while(TokenKind::Whitespace)?;

                if self.found_sym(Sym::At) || self.found_sym(Sym::AtAt) {
                    self.value(&mut txn)?;
                }
                self.eat_while(TokenKind::Whitespace)?;

                if self.found(TokenKind::Note) {
                    let token = self.take()?;
                    txn.add_token(token);
                }
            }
            node.add_node(txn);
        }
        self.consume(TokenKind::Linebreak)
    }

    /// `account = anything {anything}` until whitespace or linebreak
    fn account(&mut self, node: &mut Node) -> Result<(), Error> {
        trace!("account");
        let mut account = Node::new(NodeKind::Account);
        while !self.found(TokenKind::Whitespace)
            && !self.found(TokenKind::Linebreak)
            && !self.found(TokenKind::Eof)
        {
            let token = self.take()?;
            account.add_token(token);
        }
        node.add_node(account);
        Ok(())
    }

    /// `amount = NUMBER [WS commodity] | commodity [WS] NUMBER`
    fn amount(&mut self, node: &mut Node) -> Result<(), Error> {
        trace!("amount");
        let mut amount = Node::new(NodeKind::Amount);
        if self.found(TokenKind::Number) {
            let token = self.take()?;
            amount.add_token(token);
            self.eat_while(TokenKind::Whitespace)?;
            if !self.found_sym(Sym::At)
                && !self.found_sym(Sym::AtAt)
                && !self.found(TokenKind::Linebreak)
                && !self.found(TokenKind::Note)
                && !self.found(TokenKind::Eof)
            {
                self.commodity(&mut amount)?;
            }
        } else {
            self.commodity(&mut amount)?;
            self.eat_while(TokenKind::Whitespace)?;
            if !self.found(TokenKind::Number) {
                return Err(self.expected(TokenKind::Number));
            }
            let token = self.take()?;
            amount.add_token(token);
        }
        node.add_node(amount);
        Ok(())
    }

    /// `commodity = anything | "any thing"`
    ///
    /// A quoted commodity arrives from the tokenizer as one string token, so
    /// either way a commodity is a single token.
    fn commodity(&mut self, node: &mut Node) -> Result<(), Error> {
        trace!("commodity");
        let mut commodity = Node::new(NodeKind::Commodity);
        let token = self.take()?;
        commodity.add_token(token);
        node.add_node(commodity);
        Ok(())
    }

    /// `value = @ WS amount | @@ WS amount`
    fn value(&mut self, node: &mut Node) -> Result<(), Error> {
        trace!("value");
        let mut value = Node::new(NodeKind::Value);
        let token = self.take()?;
        value.add_token(token);
        self.eat_while(TokenKind::Whitespace)?;
        self.amount(&mut value)?;
        node.add_node(value);
        Ok(())
    }
}
