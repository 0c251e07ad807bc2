//! The canonicalisation pass.
//!
//! One post-order rewrite with two jobs: propagate implicit keywords onto
//! bare values inside legacy subtrees, and replace every `LegacyQuery` with
//! its modern `KeywordQuery` equivalent, resolving the field name through a
//! [`LegacyFieldMap`]. The boolean skeleton of the tree is untouched.

use bibql_parser::Node;

use crate::fields::LegacyFieldMap;
use crate::fold::{fold, Fold};

/// Canonicalise with the stock field aliases.
pub fn canonicalise(tree: &Node) -> Node {
    canonicalise_with(&LegacyFieldMap::default(), tree)
}

/// Canonicalise, resolving legacy field names through `fields`.
pub fn canonicalise_with(fields: &LegacyFieldMap, tree: &Node) -> Node {
    let mut pass = Canonicaliser::new(fields);
    fold(&mut pass, tree)
}

/// The rewrite pass. Holds the one piece of walk state the language needs:
/// the most recent legacy keyword, which bare values to the right of it
/// inherit. Boolean nodes do not reset it.
pub struct Canonicaliser<'a> {
    fields: &'a LegacyFieldMap,
    current_keyword: Option<String>,
}

impl<'a> Canonicaliser<'a> {
    pub fn new(fields: &'a LegacyFieldMap) -> Self {
        Self {
            fields,
            current_keyword: None,
        }
    }

    fn keyword_query(&self, legacy_name: &str, value: Node) -> Node {
        Node::keyword_query(Node::keyword(self.fields.resolve(legacy_name)), value)
    }
}

impl Fold for Canonicaliser<'_> {
    type Output = Node;

    // the keyword must be current before the value subtree is walked, so a
    // keyword-bound group distributes onto its bare values in source order
    fn enter_legacy_query(&mut self, node: &Node) {
        if let Some(name) = node.query_keyword() {
            self.current_keyword = Some(name.to_string());
        }
    }

    fn fold_and(&mut self, _: &Node, left: Node, right: Node) -> Node {
        Node::and(left, right)
    }

    fn fold_or(&mut self, _: &Node, left: Node, right: Node) -> Node {
        Node::or(left, right)
    }

    fn fold_not(&mut self, _: &Node, op: Node) -> Node {
        Node::not(op)
    }

    fn fold_keyword(&mut self, _: &Node, name: &str) -> Node {
        Node::keyword(name)
    }

    fn fold_value(&mut self, _: &Node, text: &str) -> Node {
        Node::value(text)
    }

    fn fold_single_quoted(&mut self, _: &Node, text: &str) -> Node {
        Node::single_quoted(text)
    }

    fn fold_double_quoted(&mut self, _: &Node, text: &str) -> Node {
        Node::double_quoted(text)
    }

    fn fold_regex(&mut self, _: &Node, text: &str) -> Node {
        Node::regex(text)
    }

    fn fold_range(&mut self, _: &Node, low: Node, high: Node) -> Node {
        Node::range(low, high)
    }

    fn fold_greater(&mut self, _: &Node, value: Node) -> Node {
        Node::greater(value)
    }

    fn fold_greater_equal(&mut self, _: &Node, value: Node) -> Node {
        Node::greater_equal(value)
    }

    fn fold_lower(&mut self, _: &Node, value: Node) -> Node {
        Node::lower(value)
    }

    fn fold_lower_equal(&mut self, _: &Node, value: Node) -> Node {
        Node::lower_equal(value)
    }

    fn fold_keyword_query(&mut self, _: &Node, keyword: Node, value: Node) -> Node {
        Node::keyword_query(keyword, value)
    }

    fn fold_legacy_query(&mut self, node: &Node, _keyword: Node, value: Node) -> Node {
        let name = node.query_keyword().unwrap_or_default();
        match value {
            // a keyword-bound group: the keyword has already been
            // distributed onto the group's bare values
            Node::And(..) | Node::Or(..) | Node::Not(..) => value,
            _ => self.keyword_query(name, value),
        }
    }

    fn fold_value_query(&mut self, _: &Node, value: Node) -> Node {
        match self.current_keyword.clone() {
            Some(name) => self.keyword_query(&name, value),
            None => Node::value_query(value),
        }
    }

    fn fold_empty(&mut self, _: &Node) -> Node {
        Node::Empty
    }
}
