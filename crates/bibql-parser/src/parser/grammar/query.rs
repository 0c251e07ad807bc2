use crate::ast::Node;
use crate::error::ParseError;
use crate::lexer::TokenKind;
use crate::parser::grammar::legacy;
use crate::parser::grammar::value::{self, ValueContext};
use crate::parser::Parser;

/// Keywords whose value is itself a query; these accept a whitespace
/// separator in place of `:`.
const SECOND_ORDER_KEYWORDS: [&str; 2] = ["refersto", "citedby"];

/// ```txt
/// main := WS? (find_query | query) WS? EOF
///       | WS* EOF
/// ```
pub(crate) fn main(p: &mut Parser<'_>) -> Result<Node, ParseError> {
    p.skip_ws();
    if p.at(TokenKind::Eof) {
        return Ok(Node::Empty);
    }
    let node = if p.at(TokenKind::Find) {
        legacy::find_query(p)?
    } else {
        or_query(p)?
    };
    p.skip_ws();
    match p.peek_kind() {
        TokenKind::Eof => Ok(node),
        TokenKind::RParen => Err(p.syntax_err("mismatched parentheses")),
        _ => Err(p.syntax_err("expected end of input")),
    }
}

/// ```txt
/// or_query := and_query ((OR | PIPE) WS? or_query)?
/// ```
pub(crate) fn or_query(p: &mut Parser<'_>) -> Result<Node, ParseError> {
    let lhs = and_query(p)?;
    let save = p.pos();
    p.skip_ws();
    if matches!(p.peek_kind(), TokenKind::Or | TokenKind::Pipe) {
        p.bump();
        p.skip_ws();
        let rhs = p.descend(or_query)?;
        Ok(Node::or(lhs, rhs))
    } else {
        p.set_pos(save);
        Ok(lhs)
    }
}

/// Conjunctions. Implicit adjacency folds left, so `a b c` is
/// `((a and b) and c)`; an explicit connective hands the remainder of the
/// chain to a right recursion, and `-` negates that remainder.
pub(crate) fn and_query(p: &mut Parser<'_>) -> Result<Node, ParseError> {
    let mut lhs = not_query(p)?;
    loop {
        let save = p.pos();
        p.skip_ws();
        match p.peek_kind() {
            TokenKind::And => {
                p.bump();
                p.skip_ws();
                if p.at(TokenKind::Not) {
                    p.bump();
                    p.skip_ws();
                    let rest = p.descend(and_query)?;
                    return Ok(Node::and(lhs, Node::not(rest)));
                }
                let rest = p.descend(and_query)?;
                return Ok(Node::and(lhs, rest));
            }
            TokenKind::Plus => {
                p.bump();
                p.skip_ws();
                let rest = p.descend(and_query)?;
                return Ok(Node::and(lhs, rest));
            }
            TokenKind::Minus => {
                p.bump();
                p.skip_ws();
                let rest = p.descend(and_query)?;
                return Ok(Node::and(lhs, Node::not(rest)));
            }
            kind if starts_clause(kind) => {
                let rhs = not_query(p)?;
                lhs = Node::and(lhs, rhs);
            }
            _ => {
                p.set_pos(save);
                break;
            }
        }
    }
    Ok(lhs)
}

/// ```txt
/// not_query := (NOT WS? | MINUS) not_query | atom
/// ```
pub(crate) fn not_query(p: &mut Parser<'_>) -> Result<Node, ParseError> {
    match p.peek_kind() {
        TokenKind::Not | TokenKind::Minus => {
            p.bump();
            p.skip_ws();
            let op = p.descend(not_query)?;
            Ok(Node::not(op))
        }
        _ => atom(p),
    }
}

/// ```txt
/// atom := '(' WS? query WS? ')' | find_query | simple_query
/// ```
pub(crate) fn atom(p: &mut Parser<'_>) -> Result<Node, ParseError> {
    match p.peek_kind() {
        TokenKind::LParen => {
            p.bump();
            p.skip_ws();
            let inner = p.descend(|p| {
                if p.at(TokenKind::Find) {
                    legacy::find_query(p)
                } else {
                    or_query(p)
                }
            })?;
            p.skip_ws();
            p.expect(TokenKind::RParen, "expected a closing `)`")?;
            Ok(inner)
        }
        TokenKind::Find => legacy::find_query(p),
        TokenKind::Word => {
            if at_keyword_query(p, 0) {
                keyword_query(p)
            } else if at_second_order_query(p) {
                second_order_query(p)
            } else {
                value_query(p)
            }
        }
        TokenKind::XWord
        | TokenKind::Star
        | TokenKind::SingleQuoted
        | TokenKind::DoubleQuoted
        | TokenKind::RegexQuoted
        | TokenKind::Lt
        | TokenKind::Le
        | TokenKind::Gt
        | TokenKind::Ge
        | TokenKind::After
        | TokenKind::Before => value_query(p),
        TokenKind::Colon => Err(p.syntax_err("expected a field name before `:`")),
        _ => Err(p.syntax_err("expected a query expression")),
    }
}

/// ```txt
/// keyword_query := WORD WS? ':' WS? kw_rhs
/// ```
pub(crate) fn keyword_query(p: &mut Parser<'_>) -> Result<Node, ParseError> {
    let name = p.expect(TokenKind::Word, "expected a field name")?;
    p.skip_ws();
    p.expect(TokenKind::Colon, "expected `:` after a field name")?;
    p.skip_ws();
    let rhs = p.descend(kw_rhs)?;
    Ok(Node::keyword_query(Node::keyword(name.data()), rhs))
}

/// ```txt
/// kw_rhs := keyword_query          ; refersto:author:Ellis
///         | '(' WS? query WS? ')'  ; refersto:(…)
///         | value
/// ```
fn kw_rhs(p: &mut Parser<'_>) -> Result<Node, ParseError> {
    match p.peek_kind() {
        TokenKind::Word if at_keyword_query(p, 0) => keyword_query(p),
        TokenKind::LParen => atom(p),
        TokenKind::Word
        | TokenKind::XWord
        | TokenKind::Star
        | TokenKind::Minus
        | TokenKind::Plus
        | TokenKind::SingleQuoted
        | TokenKind::DoubleQuoted
        | TokenKind::RegexQuoted
        | TokenKind::Lt
        | TokenKind::Le
        | TokenKind::Gt
        | TokenKind::Ge
        | TokenKind::After
        | TokenKind::Before => value::value(p, ValueContext::KeywordRhs),
        _ => Err(p.syntax_err("expected a value after `:`")),
    }
}

/// `refersto author:Ellis` — the whitespace-separated second-order form.
fn second_order_query(p: &mut Parser<'_>) -> Result<Node, ParseError> {
    let name = p.bump();
    p.skip_ws();
    let rhs = p.descend(|p| {
        if p.at(TokenKind::LParen) {
            atom(p)
        } else if at_keyword_query(p, 0) {
            keyword_query(p)
        } else if at_second_order_query(p) {
            second_order_query(p)
        } else {
            value::value(p, ValueContext::KeywordRhs)
        }
    })?;
    Ok(Node::keyword_query(Node::keyword(name.data()), rhs))
}

fn value_query(p: &mut Parser<'_>) -> Result<Node, ParseError> {
    let value = value::value(p, ValueContext::Bare)?;
    Ok(Node::value_query(value))
}

/// `WORD ':'` or `WORD WS ':'` ahead, starting `base` tokens in.
pub(crate) fn at_keyword_query(p: &Parser<'_>, base: usize) -> bool {
    p.nth_kind(base) == TokenKind::Word
        && (p.nth_kind(base + 1) == TokenKind::Colon
            || (p.nth_kind(base + 1) == TokenKind::Whitespace
                && p.nth_kind(base + 2) == TokenKind::Colon))
}

fn is_second_order(name: &str) -> bool {
    SECOND_ORDER_KEYWORDS
        .iter()
        .any(|kw| name.eq_ignore_ascii_case(kw))
}

fn at_second_order_query(p: &Parser<'_>) -> bool {
    p.nth_kind(0) == TokenKind::Word
        && is_second_order(p.nth_data(0))
        && p.nth_kind(1) == TokenKind::Whitespace
        && (p.nth_kind(2) == TokenKind::LParen
            || at_keyword_query(p, 2)
            || (p.nth_kind(2) == TokenKind::Word
                && is_second_order(p.nth_data(2))
                && p.nth_kind(3) == TokenKind::Whitespace))
}

fn starts_clause(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Word
            | TokenKind::XWord
            | TokenKind::Star
            | TokenKind::SingleQuoted
            | TokenKind::DoubleQuoted
            | TokenKind::RegexQuoted
            | TokenKind::LParen
            | TokenKind::Not
            | TokenKind::Find
            | TokenKind::Lt
            | TokenKind::Le
            | TokenKind::Gt
            | TokenKind::Ge
            | TokenKind::After
            | TokenKind::Before
    )
}
