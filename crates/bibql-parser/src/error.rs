use thiserror::Error;

/// An error produced while lexing or parsing a query.
///
/// Errors are values: each variant carries the byte offset where the problem
/// begins and, where one exists, the offending input fragment. Whitespace-only
/// input is not an error (it parses to [`Node::Empty`]); everything the lexer
/// cannot classify as an operator flows into values instead of failing, so
/// these variants cover genuinely malformed queries only.
///
/// [`Node::Empty`]: crate::Node::Empty
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A `'…'`, `"…"` or `/…/` string was opened and never closed.
    #[error("unterminated quoted string `{data}` at offset {index}")]
    UnterminatedQuote { data: String, index: usize },

    /// A construct the grammar cannot accept: mismatched parentheses, `:`
    /// without a field name or value, `->` with a missing endpoint, a stray
    /// operator.
    #[error("{message}, got `{data}` at offset {index}")]
    Syntax {
        message: String,
        data: String,
        index: usize,
    },

    /// The input ended where the grammar still required something.
    #[error("{message} at end of input (offset {index})")]
    Eof { message: String, index: usize },

    /// Nesting exceeded the parser's recursion limit.
    #[error("parser recursion limit reached at offset {index}")]
    RecursionLimit { index: usize },
}

impl ParseError {
    /// Byte offset into the original input where the error begins.
    pub fn index(&self) -> usize {
        match self {
            ParseError::UnterminatedQuote { index, .. }
            | ParseError::Syntax { index, .. }
            | ParseError::Eof { index, .. }
            | ParseError::RecursionLimit { index } => *index,
        }
    }

    /// The offending input fragment, when one exists.
    pub fn data(&self) -> Option<&str> {
        match self {
            ParseError::UnterminatedQuote { data, .. } | ParseError::Syntax { data, .. } => {
                Some(data)
            }
            ParseError::Eof { .. } | ParseError::RecursionLimit { .. } => None,
        }
    }
}
