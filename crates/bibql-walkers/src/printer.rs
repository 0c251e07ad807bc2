//! The pretty-printer pass.
//!
//! Serialises a tree to its canonical textual form. The printer is total —
//! it renders pre-canonicalisation trees too, spelling `LegacyQuery` nodes
//! back with `find` — and idempotent: printing, re-parsing and printing
//! again yields the same text.

use bibql_parser::Node;

use crate::fold::{fold, Fold};

/// Render a tree to its canonical textual form.
pub fn print(tree: &Node) -> String {
    fold(&mut Printer, tree)
}

/// The serialiser. Stateless; every handler formats its children's output.
pub struct Printer;

impl Fold for Printer {
    type Output = String;

    fn fold_and(&mut self, _: &Node, left: String, right: String) -> String {
        format!("({left} and {right})")
    }

    fn fold_or(&mut self, _: &Node, left: String, right: String) -> String {
        format!("({left} or {right})")
    }

    fn fold_not(&mut self, _: &Node, op: String) -> String {
        format!("(not {op})")
    }

    fn fold_keyword(&mut self, _: &Node, name: &str) -> String {
        name.to_string()
    }

    fn fold_value(&mut self, _: &Node, text: &str) -> String {
        text.to_string()
    }

    fn fold_single_quoted(&mut self, _: &Node, text: &str) -> String {
        format!("'{text}'")
    }

    fn fold_double_quoted(&mut self, _: &Node, text: &str) -> String {
        format!("\"{text}\"")
    }

    fn fold_regex(&mut self, _: &Node, text: &str) -> String {
        format!("/{text}/")
    }

    fn fold_range(&mut self, _: &Node, low: String, high: String) -> String {
        format!("{low}->{high}")
    }

    fn fold_greater(&mut self, _: &Node, value: String) -> String {
        format!(">{value}")
    }

    fn fold_greater_equal(&mut self, _: &Node, value: String) -> String {
        format!(">={value}")
    }

    fn fold_lower(&mut self, _: &Node, value: String) -> String {
        format!("<{value}")
    }

    fn fold_lower_equal(&mut self, _: &Node, value: String) -> String {
        format!("<={value}")
    }

    fn fold_keyword_query(&mut self, _: &Node, keyword: String, value: String) -> String {
        format!("{keyword}:{value}")
    }

    fn fold_legacy_query(&mut self, _: &Node, keyword: String, value: String) -> String {
        format!("find {keyword} {value}")
    }

    fn fold_value_query(&mut self, _: &Node, value: String) -> String {
        value
    }

    fn fold_empty(&mut self, _: &Node) -> String {
        String::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn boolean_forms() {
        let and = Node::and(Node::value("a"), Node::value("b"));
        assert_eq!(print(&and), "(a and b)");
        let or = Node::or(Node::value("a"), Node::value("b"));
        assert_eq!(print(&or), "(a or b)");
        let not = Node::not(Node::value("a"));
        assert_eq!(print(&not), "(not a)");
    }

    #[test]
    fn keyword_and_value_forms() {
        let query = Node::keyword_query(Node::keyword("author"), Node::value("ellis"));
        assert_eq!(print(&query), "author:ellis");
        assert_eq!(
            print(&Node::value_query(Node::value("e(+)e(-)"))),
            "e(+)e(-)"
        );
    }

    #[test]
    fn quoting_is_reproduced() {
        assert_eq!(print(&Node::single_quoted("bar")), "'bar'");
        assert_eq!(print(&Node::double_quoted("Ellis, J")), "\"Ellis, J\"");
        assert_eq!(print(&Node::regex("bar")), "/bar/");
    }

    #[test]
    fn ranges_and_comparisons() {
        let range = Node::range(Node::value("2000"), Node::value("2012"));
        assert_eq!(print(&range), "2000->2012");
        assert_eq!(print(&Node::greater(Node::value("1984"))), ">1984");
        assert_eq!(print(&Node::greater_equal(Node::value("200"))), ">=200");
        assert_eq!(print(&Node::lower(Node::value("1984"))), "<1984");
        assert_eq!(print(&Node::lower_equal(Node::value("1984"))), "<=1984");
    }

    #[test]
    fn legacy_queries_print_with_find() {
        let query = Node::legacy_query(Node::keyword("t"), Node::value("quark"));
        assert_eq!(print(&query), "find t quark");
    }

    #[test]
    fn empty_prints_nothing() {
        assert_eq!(print(&Node::Empty), "");
    }
}
