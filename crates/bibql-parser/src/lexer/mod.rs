mod cursor;
mod token;
mod token_kind;

use crate::error::ParseError;

use cursor::Cursor;

pub use token::Token;
pub use token_kind::TokenKind;

/// Streams [`Token`]s out of a query string.
///
/// The lexer never fails on ordinary input: anything that is not a word,
/// whitespace or an operator accumulates into [`TokenKind::XWord`] and flows
/// into values downstream. The single fatal condition is a quoted string that
/// opens and never closes.
///
/// Two pieces of context steer the scan:
///
/// * `find`/`fin`/`f` become [`TokenKind::Find`] only at an *expression
///   start* (input start, after `(`, or after a boolean connective) and only
///   when followed by whitespace. Everywhere else they are ordinary words, so
///   `find` inside a value is never swallowed.
/// * `'`, `"` and `/` open a quoted token only when they are not immediately
///   adjacent to preceding value content. `O'Shea` keeps its apostrophe and
///   `hep-th/0201100` keeps its slash.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    cursor: Cursor<'a>,
    expr_start: bool,
    value_adjacent: bool,
    finished: bool,
}

impl<'a> Lexer<'a> {
    /// Create a new instance of `Lexer`.
    pub fn new(input: &'a str) -> Self {
        Self {
            cursor: Cursor::new(input),
            expr_start: true,
            value_adjacent: false,
            finished: false,
        }
    }

    fn quoted(&mut self, delimiter: char) -> Result<TokenKind, ParseError> {
        let start = self.cursor.pos();
        self.cursor.bump();
        loop {
            match self.cursor.bump() {
                Some(c) if c == delimiter => {
                    return Ok(match delimiter {
                        '\'' => TokenKind::SingleQuoted,
                        '"' => TokenKind::DoubleQuoted,
                        _ => TokenKind::RegexQuoted,
                    });
                }
                Some(_) => {}
                None => {
                    return Err(ParseError::UnterminatedQuote {
                        data: self.cursor.slice_from(start).to_string(),
                        index: start,
                    });
                }
            }
        }
    }

    fn word(&mut self) -> TokenKind {
        let start = self.cursor.pos();
        self.cursor.eat_while(is_word_char);
        let text = self.cursor.slice_from(start);

        if self.expr_start
            && is_find_spelling(text)
            && self.cursor.first().is_some_and(char::is_whitespace)
        {
            return TokenKind::Find;
        }
        if text.eq_ignore_ascii_case("and") {
            TokenKind::And
        } else if text.eq_ignore_ascii_case("or") {
            TokenKind::Or
        } else if text.eq_ignore_ascii_case("not") {
            TokenKind::Not
        } else if text.eq_ignore_ascii_case("after") {
            TokenKind::After
        } else if text.eq_ignore_ascii_case("before") {
            TokenKind::Before
        } else {
            TokenKind::Word
        }
    }

    fn xword(&mut self) -> TokenKind {
        self.cursor
            .eat_while(|c| !c.is_whitespace() && !is_word_char(c) && !is_operator_char(c));
        TokenKind::XWord
    }

    fn update_state(&mut self, kind: TokenKind) {
        match kind {
            // whitespace separates values but does not end an expression
            TokenKind::Whitespace => {
                self.value_adjacent = false;
            }
            TokenKind::LParen
            | TokenKind::And
            | TokenKind::Or
            | TokenKind::Pipe
            | TokenKind::Not => {
                self.expr_start = true;
                self.value_adjacent = false;
            }
            _ => {
                self.expr_start = false;
                self.value_adjacent = matches!(
                    kind,
                    TokenKind::Word
                        | TokenKind::XWord
                        | TokenKind::SingleQuoted
                        | TokenKind::DoubleQuoted
                        | TokenKind::RegexQuoted
                        | TokenKind::Star
                        | TokenKind::RParen
                );
            }
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Token<'a>, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let start = self.cursor.pos();
        let c = match self.cursor.first() {
            Some(c) => c,
            None => {
                self.finished = true;
                return Some(Ok(Token::new(TokenKind::Eof, "", start)));
            }
        };

        let kind = match c {
            c if c.is_whitespace() => {
                self.cursor.eat_while(char::is_whitespace);
                TokenKind::Whitespace
            }
            ':' => {
                self.cursor.bump();
                TokenKind::Colon
            }
            '(' => {
                self.cursor.bump();
                TokenKind::LParen
            }
            ')' => {
                self.cursor.bump();
                TokenKind::RParen
            }
            '|' => {
                self.cursor.bump();
                TokenKind::Pipe
            }
            '+' => {
                self.cursor.bump();
                TokenKind::Plus
            }
            '*' => {
                self.cursor.bump();
                TokenKind::Star
            }
            '<' => {
                self.cursor.bump();
                if self.cursor.first() == Some('=') {
                    self.cursor.bump();
                    TokenKind::Le
                } else {
                    TokenKind::Lt
                }
            }
            '>' => {
                self.cursor.bump();
                if self.cursor.first() == Some('=') {
                    self.cursor.bump();
                    TokenKind::Ge
                } else {
                    TokenKind::Gt
                }
            }
            '-' => {
                self.cursor.bump();
                if self.cursor.first() == Some('>') {
                    self.cursor.bump();
                    TokenKind::Arrow
                } else {
                    TokenKind::Minus
                }
            }
            '\'' | '"' | '/' if !self.value_adjacent => match self.quoted(c) {
                Ok(kind) => kind,
                Err(err) => {
                    self.finished = true;
                    return Some(Err(err));
                }
            },
            c if is_word_char(c) => self.word(),
            _ => self.xword(),
        };

        let data = self.cursor.slice_from(start);
        self.update_state(kind);
        Some(Ok(Token::new(kind, data, start)))
    }
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn is_operator_char(c: char) -> bool {
    matches!(
        c,
        ':' | '(' | ')' | '|' | '+' | '*' | '<' | '>' | '-'
    )
}

fn is_find_spelling(text: &str) -> bool {
    text.eq_ignore_ascii_case("find")
        || text.eq_ignore_ascii_case("fin")
        || text.eq_ignore_ascii_case("f")
}

#[cfg(test)]
mod tests {
    use super::*;
    use expect_test::expect;
    use pretty_assertions::assert_eq;
    use TokenKind::*;

    fn lex(input: &str) -> Vec<(TokenKind, &str)> {
        Lexer::new(input)
            .map(|token| token.expect("unexpected lex error"))
            .map(|token| (token.kind(), token.data()))
            .collect()
    }

    #[test]
    fn basic_keyword_value() {
        assert_eq!(
            lex("foo:bar"),
            vec![(Word, "foo"), (Colon, ":"), (Word, "bar"), (Eof, "")]
        );
        assert_eq!(
            lex("foo: bar"),
            vec![
                (Word, "foo"),
                (Colon, ":"),
                (Whitespace, " "),
                (Word, "bar"),
                (Eof, "")
            ]
        );
        assert_eq!(
            lex("999__u: bar"),
            vec![
                (Word, "999__u"),
                (Colon, ":"),
                (Whitespace, " "),
                (Word, "bar"),
                (Eof, "")
            ]
        );
    }

    #[test]
    fn quoted_strings() {
        assert_eq!(
            lex("foo: 'bar'"),
            vec![
                (Word, "foo"),
                (Colon, ":"),
                (Whitespace, " "),
                (SingleQuoted, "'bar'"),
                (Eof, "")
            ]
        );
        assert_eq!(
            lex("foo: /bar/"),
            vec![
                (Word, "foo"),
                (Colon, ":"),
                (Whitespace, " "),
                (RegexQuoted, "/bar/"),
                (Eof, "")
            ]
        );
        // a double-quoted string keeps internal quotes of the opposite kind
        assert_eq!(
            lex("foo: \"'bar'\""),
            vec![
                (Word, "foo"),
                (Colon, ":"),
                (Whitespace, " "),
                (DoubleQuoted, "\"'bar'\""),
                (Eof, "")
            ]
        );
        assert_eq!(
            lex("author:\"Ellis, J\""),
            vec![
                (Word, "author"),
                (Colon, ":"),
                (DoubleQuoted, "\"Ellis, J\""),
                (Eof, "")
            ]
        );
    }

    #[test]
    fn date_ranges() {
        assert_eq!(
            lex("year: 2000->2012"),
            vec![
                (Word, "year"),
                (Colon, ":"),
                (Whitespace, " "),
                (Word, "2000"),
                (Arrow, "->"),
                (Word, "2012"),
                (Eof, "")
            ]
        );
        assert_eq!(
            lex("year: 2000-10 -> 2012-09"),
            vec![
                (Word, "year"),
                (Colon, ":"),
                (Whitespace, " "),
                (Word, "2000"),
                (Minus, "-"),
                (Word, "10"),
                (Whitespace, " "),
                (Arrow, "->"),
                (Whitespace, " "),
                (Word, "2012"),
                (Minus, "-"),
                (Word, "09"),
                (Eof, "")
            ]
        );
    }

    #[test]
    fn star_patterns() {
        assert_eq!(
            lex("foo: he*lo*"),
            vec![
                (Word, "foo"),
                (Colon, ":"),
                (Whitespace, " "),
                (Word, "he"),
                (Star, "*"),
                (Word, "lo"),
                (Star, "*"),
                (Eof, "")
            ]
        );
        assert_eq!(
            lex("foo: *hello"),
            vec![
                (Word, "foo"),
                (Colon, ":"),
                (Whitespace, " "),
                (Star, "*"),
                (Word, "hello"),
                (Eof, "")
            ]
        );
    }

    #[test]
    fn adjacent_quote_characters_are_literal() {
        assert_eq!(
            lex("foo: O'Shea"),
            vec![
                (Word, "foo"),
                (Colon, ":"),
                (Whitespace, " "),
                (Word, "O"),
                (XWord, "'"),
                (Word, "Shea"),
                (Eof, "")
            ]
        );
        assert_eq!(
            lex("refersto:hep-th/0201100"),
            vec![
                (Word, "refersto"),
                (Colon, ":"),
                (Word, "hep"),
                (Minus, "-"),
                (Word, "th"),
                (XWord, "/"),
                (Word, "0201100"),
                (Eof, "")
            ]
        );
    }

    #[test]
    fn non_ascii_input_becomes_xwords() {
        assert_eq!(
            lex("foo: пушкин"),
            vec![
                (Word, "foo"),
                (Colon, ":"),
                (Whitespace, " "),
                (XWord, "пушкин"),
                (Eof, "")
            ]
        );
        assert_eq!(
            lex("foo: Lemaître"),
            vec![
                (Word, "foo"),
                (Colon, ":"),
                (Whitespace, " "),
                (Word, "Lema"),
                (XWord, "î"),
                (Word, "tre"),
                (Eof, "")
            ]
        );
    }

    #[test]
    fn boolean_connectives_are_word_bounded() {
        assert_eq!(
            lex("foo:bar AND foo:bar"),
            vec![
                (Word, "foo"),
                (Colon, ":"),
                (Word, "bar"),
                (Whitespace, " "),
                (And, "AND"),
                (Whitespace, " "),
                (Word, "foo"),
                (Colon, ":"),
                (Word, "bar"),
                (Eof, "")
            ]
        );
        // `band` is one word, not `b and`
        assert_eq!(lex("band"), vec![(Word, "band"), (Eof, "")]);
    }

    #[test]
    fn find_at_expression_start() {
        for input in ["find t quark", "FIND t quark", "fin t quark", "f t quark"] {
            let tokens = lex(input);
            assert_eq!(tokens[0].0, Find, "{input}");
        }
        // not at a value position
        assert_eq!(
            lex("title:find"),
            vec![(Word, "title"), (Colon, ":"), (Word, "find"), (Eof, "")]
        );
        // requires following whitespace
        assert_eq!(
            lex("f(x)"),
            vec![
                (Word, "f"),
                (LParen, "("),
                (Word, "x"),
                (RParen, ")"),
                (Eof, "")
            ]
        );
    }

    #[test]
    fn legacy_comparisons() {
        assert_eq!(
            lex("find date > 1984"),
            vec![
                (Find, "find"),
                (Whitespace, " "),
                (Word, "date"),
                (Whitespace, " "),
                (Gt, ">"),
                (Whitespace, " "),
                (Word, "1984"),
                (Eof, "")
            ]
        );
        assert_eq!(
            lex("find topcite 200+"),
            vec![
                (Find, "find"),
                (Whitespace, " "),
                (Word, "topcite"),
                (Whitespace, " "),
                (Word, "200"),
                (Plus, "+"),
                (Eof, "")
            ]
        );
        assert_eq!(
            lex("a <= b"),
            vec![
                (Word, "a"),
                (Whitespace, " "),
                (Le, "<="),
                (Whitespace, " "),
                (Word, "b"),
                (Eof, "")
            ]
        );
    }

    #[test]
    fn group_bearing_identifiers() {
        assert_eq!(
            lex("e(+)e(-)"),
            vec![
                (Word, "e"),
                (LParen, "("),
                (Plus, "+"),
                (RParen, ")"),
                (Word, "e"),
                (LParen, "("),
                (Minus, "-"),
                (RParen, ")"),
                (Eof, "")
            ]
        );
    }

    #[test]
    fn journal_reference_xwords() {
        assert_eq!(
            lex("find j phys.rev.,D50,1140"),
            vec![
                (Find, "find"),
                (Whitespace, " "),
                (Word, "j"),
                (Whitespace, " "),
                (Word, "phys"),
                (XWord, "."),
                (Word, "rev"),
                (XWord, ".,"),
                (Word, "D50"),
                (XWord, ","),
                (Word, "1140"),
                (Eof, "")
            ]
        );
    }

    #[test]
    fn unterminated_quote_is_fatal() {
        let err = Lexer::new("foo: 'bar")
            .find_map(Result::err)
            .expect("expected a lex error");
        assert_eq!(
            err,
            ParseError::UnterminatedQuote {
                data: "'bar".to_string(),
                index: 5,
            }
        );
    }

    #[test]
    fn token_debug_stream() {
        let tokens: Vec<_> = Lexer::new("find a ellis")
            .map(|token| token.expect("unexpected lex error"))
            .collect();
        let expected = expect![[r#"
            [
                FIND@0:4 "find",
                WS@4:5 " ",
                WORD@5:6 "a",
                WS@6:7 " ",
                WORD@7:12 "ellis",
                EOF@12:12 "",
            ]"#]];
        expected.assert_eq(&format!("{tokens:#?}"));
    }
}
