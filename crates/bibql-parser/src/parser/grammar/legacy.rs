//! The `find` subgrammar.
//!
//! Legacy clauses are positional: the first word after `find` (or after a
//! boolean connective) names a field implicitly, and the space-separated run
//! that follows is its value. Clauses without a leading field word stay bare
//! and inherit the most recent keyword during canonicalisation.

use crate::ast::Node;
use crate::error::ParseError;
use crate::lexer::TokenKind;
use crate::parser::grammar::value::{comparison, comparison_operand, quoted, simple_value, try_range};
use crate::parser::Parser;

/// ```txt
/// find_query := FIND WS legacy_query
/// ```
pub(crate) fn find_query(p: &mut Parser<'_>) -> Result<Node, ParseError> {
    p.expect(TokenKind::Find, "expected `find`")?;
    p.skip_ws();
    legacy_or(p)
}

/// ```txt
/// legacy_or := legacy_and ((OR | PIPE) WS? legacy_or)?
/// ```
fn legacy_or(p: &mut Parser<'_>) -> Result<Node, ParseError> {
    let lhs = legacy_and(p)?;
    let save = p.pos();
    p.skip_ws();
    if matches!(p.peek_kind(), TokenKind::Or | TokenKind::Pipe) {
        p.bump();
        p.skip_ws();
        let rhs = p.descend(legacy_or)?;
        Ok(Node::or(lhs, rhs))
    } else {
        p.set_pos(save);
        Ok(lhs)
    }
}

/// Legacy conjunctions. `and not` is one connective; like `-`, it negates
/// the remainder of the chain.
fn legacy_and(p: &mut Parser<'_>) -> Result<Node, ParseError> {
    let mut lhs = legacy_not(p)?;
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
                    let rest = p.descend(legacy_and)?;
                    return Ok(Node::and(lhs, Node::not(rest)));
                }
                let rest = p.descend(legacy_and)?;
                return Ok(Node::and(lhs, rest));
            }
            TokenKind::Plus => {
                p.bump();
                p.skip_ws();
                let rest = p.descend(legacy_and)?;
                return Ok(Node::and(lhs, rest));
            }
            TokenKind::Minus => {
                p.bump();
                p.skip_ws();
                let rest = p.descend(legacy_and)?;
                return Ok(Node::and(lhs, Node::not(rest)));
            }
            kind if starts_legacy_clause(kind) => {
                let rhs = legacy_not(p)?;
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

fn legacy_not(p: &mut Parser<'_>) -> Result<Node, ParseError> {
    match p.peek_kind() {
        TokenKind::Not | TokenKind::Minus => {
            p.bump();
            p.skip_ws();
            let op = p.descend(legacy_not)?;
            Ok(Node::not(op))
        }
        _ => legacy_atom(p),
    }
}

fn legacy_atom(p: &mut Parser<'_>) -> Result<Node, ParseError> {
    // a redundant `find` inside a legacy expression re-enters the clause
    if p.at(TokenKind::Find) {
        p.bump();
        p.skip_ws();
    }
    if p.at(TokenKind::LParen) {
        p.bump();
        p.skip_ws();
        let inner = p.descend(legacy_or)?;
        p.skip_ws();
        p.expect(TokenKind::RParen, "expected a closing `)`")?;
        Ok(inner)
    } else {
        legacy_clause(p)
    }
}

/// One clause: `field value-run` or a bare value run.
fn legacy_clause(p: &mut Parser<'_>) -> Result<Node, ParseError> {
    if at_implicit_keyword(p) {
        let name = p.bump();
        p.skip_ws();
        let value = legacy_value(p)?;
        Ok(Node::legacy_query(Node::keyword(name.data()), value))
    } else {
        let value = legacy_value(p)?;
        Ok(Node::value_query(value))
    }
}

/// A standalone word followed by more value content reads as an implicit
/// keyword; `find a ellis` fields on `a`, while `find hep-ph` stays bare.
fn at_implicit_keyword(p: &Parser<'_>) -> bool {
    p.nth_kind(0) == TokenKind::Word
        && p.nth_kind(1) == TokenKind::Whitespace
        && starts_legacy_value(p.nth_kind(2))
}

/// The value run of one legacy clause.
fn legacy_value(p: &mut Parser<'_>) -> Result<Node, ParseError> {
    match p.peek_kind() {
        // `find a (ellis or kane)` — a keyword-bound legacy group
        TokenKind::LParen => {
            p.bump();
            p.skip_ws();
            let inner = p.descend(legacy_or)?;
            p.skip_ws();
            p.expect(TokenKind::RParen, "expected a closing `)`")?;
            return Ok(inner);
        }
        TokenKind::Gt | TokenKind::Ge | TokenKind::Lt | TokenKind::Le => return comparison(p),
        TokenKind::After => {
            p.bump();
            p.skip_ws();
            return Ok(Node::greater(comparison_operand(p)?));
        }
        TokenKind::Before => {
            p.bump();
            p.skip_ws();
            return Ok(Node::lower(comparison_operand(p)?));
        }
        _ => {}
    }

    let mut pieces: Vec<Node> = Vec::new();
    loop {
        match p.peek_kind() {
            TokenKind::SingleQuoted | TokenKind::DoubleQuoted | TokenKind::RegexQuoted => {
                pieces.push(quoted(p));
            }
            TokenKind::Word
            | TokenKind::XWord
            | TokenKind::Star
            | TokenKind::Plus
            | TokenKind::Colon
            | TokenKind::Lt
            | TokenKind::Le
            | TokenKind::Gt
            | TokenKind::Ge
            | TokenKind::After
            | TokenKind::Before => {
                let text = simple_value(p, true)?;
                if let Some(bound) = split_trailing_sign(p, &text) {
                    pieces.push(bound);
                    break;
                }
                pieces.push(Node::value(text));
            }
            _ => break,
        }

        // `1984 -> 2000` — a range completes and terminates the run
        if pieces.len() == 1
            && matches!(pieces[0], Node::Value(_) | Node::DoubleQuotedValue(_))
        {
            let low = pieces.remove(0);
            let node = try_range(p, low)?;
            let is_range = matches!(node, Node::Range(..));
            pieces.push(node);
            if is_range {
                break;
            }
        }

        let save = p.pos();
        p.skip_ws();
        if !continues_run(p.peek_kind()) {
            p.set_pos(save);
            break;
        }
    }

    match pieces.len() {
        0 => Err(p.syntax_err("expected a value")),
        1 => Ok(pieces.remove(0)),
        // a multi-word run reads as one phrase
        _ => {
            let joined = pieces
                .iter()
                .filter_map(piece_text)
                .collect::<Vec<_>>()
                .join(" ");
            Ok(Node::double_quoted(joined))
        }
    }
}

/// `200+` and `2014-01-` close a clause as a lower or upper bound when the
/// sign sits on the run boundary.
fn split_trailing_sign(p: &Parser<'_>, text: &str) -> Option<Node> {
    let sign = text.chars().last()?;
    if !matches!(sign, '+' | '-') {
        return None;
    }
    if !matches!(
        p.peek_kind(),
        TokenKind::Whitespace | TokenKind::RParen | TokenKind::Eof
    ) {
        return None;
    }
    let rest = &text[..text.len() - 1];
    // a run ending `++` or `--` is value content (`c++`), not a bound
    match rest.chars().last() {
        None | Some('+') | Some('-') => return None,
        Some(_) => {}
    }
    Some(match sign {
        '+' => Node::greater_equal(Node::value(rest)),
        _ => Node::lower_equal(Node::value(rest)),
    })
}

fn piece_text(piece: &Node) -> Option<&str> {
    match piece {
        Node::Value(text)
        | Node::SingleQuotedValue(text)
        | Node::DoubleQuotedValue(text)
        | Node::RegexValue(text) => Some(text),
        _ => None,
    }
}

fn continues_run(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Word
            | TokenKind::XWord
            | TokenKind::Star
            | TokenKind::SingleQuoted
            | TokenKind::DoubleQuoted
            | TokenKind::RegexQuoted
            | TokenKind::After
            | TokenKind::Before
    )
}

fn starts_legacy_value(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Word
            | TokenKind::XWord
            | TokenKind::Star
            | TokenKind::SingleQuoted
            | TokenKind::DoubleQuoted
            | TokenKind::RegexQuoted
            | TokenKind::Lt
            | TokenKind::Le
            | TokenKind::Gt
            | TokenKind::Ge
            | TokenKind::After
            | TokenKind::Before
            | TokenKind::LParen
    )
}

fn starts_legacy_clause(kind: TokenKind) -> bool {
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
