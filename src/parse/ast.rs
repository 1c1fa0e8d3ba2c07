use super::token::Token;
use crate::Location;

/// The syntactic category of a [`Node`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Ledger,
    Entry,
    Date,
    Code,
    Description,
    Transaction,
    Account,
    Amount,
    Value,
    Commodity,
}

/// A child of a [`Node`]: either a nested node or a raw token leaf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Child {
    Node(Node),
    Token(Token),
}

/// A node of the generic syntax tree. Purely syntactic; no semantic
/// validation has happened yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub kind: NodeKind,
    pub children: Vec<Child>,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Node {
            kind,
            children: Vec::new(),
        }
    }

    pub fn add_node(&mut self, node: Node) {
        self.children.push(Child::Node(node));
    }

    pub fn add_token(&mut self, token: Token) {
        self.children.push(Child::Token(token));
    }

    /// The direct child nodes, in order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.children.iter().filter_map(|child| match child {
            Child::Node(node) => Some(node),
            Child::Token(_) => None,
        })
    }

    /// The direct token children, in order.
    pub fn tokens(&self) -> impl Iterator<Item = &Token> {
        self.children.iter().filter_map(|child| match child {
            Child::Token(token) => Some(token),
            Child::Node(_) => None,
        })
    }

    /// Concatenates the text of the direct token children and trims the
    /// surrounding whitespace.
    pub fn text(&self) -> String {
        let mut text = String::new();
        for token in self.tokens() {
            text.push_str(&token.text);
        }
        text.trim().to_string()
    }

    /// The location of the first token under this node, if any.
    pub fn location(&self) -> Option<Location> {
        for child in &self.children {
            match child {
                Child::Token(token) => return Some(token.location),
                Child::Node(node) => {
                    if let Some(location) = node.location() {
                        return Some(location);
                    }
                }
            }
        }
        None
    }
}
