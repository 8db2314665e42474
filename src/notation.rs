//! Bracket notation parser
//!
//! Parses strings such as `a(b, c(d))` into a [`Tree`] using a pest grammar.
//! Labels made of letters, digits and `_ - . ' :` may be written bare; any
//! other label is double-quoted. Nodes are created in preorder, so node ids
//! equal preorder indices.

use pest::Parser;
use pest::iterators::Pair;
use pest_derive::Parser;
use thiserror::Error;

use crate::tree::{NodeId, Tree, TreeError};

#[derive(Parser)]
#[grammar = "notation.pest"]
struct NotationParser;

/// Error type for bracket notation failures
#[derive(Debug, Error)]
pub enum NotationError {
    #[error("Notation error: {0}")]
    ParseError(#[from] pest::error::Error<Rule>),

    #[error("Notation error: expected {0}")]
    Malformed(&'static str),

    #[error("Notation error: {0}")]
    Tree(#[from] TreeError),
}

/// Parse a tree written in bracket notation
pub fn parse_tree(input: &str) -> Result<Tree, NotationError> {
    let mut pairs = NotationParser::parse(Rule::tree, input)?;
    let Some(tree_pair) = pairs.next() else {
        return Err(NotationError::Malformed("a tree"));
    };
    let Some(root_pair) = tree_pair.into_inner().next() else {
        return Err(NotationError::Malformed("a root node"));
    };

    let mut tree = Tree::new();
    let root = build_node(&mut tree, root_pair)?;
    tree.set_root(root)?;
    tree.assign_preorder_and_depth();
    Ok(tree)
}

/// Create the node for a `node` pair, then its subtree left to right
fn build_node(tree: &mut Tree, pair: Pair<Rule>) -> Result<NodeId, NotationError> {
    let mut inner = pair.into_inner();

    let Some(label_pair) = inner.next() else {
        return Err(NotationError::Malformed("a label"));
    };
    let id = tree.create_node(label_text(label_pair)?);

    if let Some(children) = inner.next() {
        for child_pair in children.into_inner() {
            let child = build_node(tree, child_pair)?;
            tree.add_child(id, child)?;
        }
    }

    Ok(id)
}

/// Extract the label text, stripping quotes
fn label_text(pair: Pair<'_, Rule>) -> Result<&str, NotationError> {
    let Some(label) = pair.into_inner().next() else {
        return Err(NotationError::Malformed("label text"));
    };

    match label.as_rule() {
        Rule::quoted_label => match label.into_inner().next() {
            Some(quoted) => Ok(quoted.as_str()),
            None => Err(NotationError::Malformed("quoted label text")),
        },
        _ => Ok(label.as_str()),
    }
}
