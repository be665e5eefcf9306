//! A [`GraphQLTokenSource`](crate::token_source::GraphQLTokenSource) that
//! lexes from a `&str` input.
//!
//! Token values borrow directly from the source string (`Cow::Borrowed`), so
//! names, numbers and strings are never copied while lexing.
//!
//! Invalid input does not stop the lexer: it emits an `Error` token for the
//! offending text and continues with the next character, so the parser can
//! report several problems in one pass.
//!
//! # Usage
//!
//! ```rust
//! use libfieldtree_parser::token_source::StrGraphQLTokenSource;
//!
//! let lexer = StrGraphQLTokenSource::new("{ name }");
//! for token in lexer {
//!     println!("{:?}", token.kind);
//! }
//! // Output:
//! // CurlyBraceOpen
//! // Name("name")
//! // CurlyBraceClose
//! // Eof
//! ```

use crate::token::GraphQLToken;
use crate::token::GraphQLTokenKind;
use crate::GraphQLErrorNote;
use crate::GraphQLSourceSpan;
use crate::SourcePosition;
use smallvec::smallvec;
use std::borrow::Cow;

pub struct StrGraphQLTokenSource<'src> {
    source: &'src str,

    /// The remaining text to lex is `&source[curr_byte_offset..]`.
    curr_byte_offset: usize,

    curr_line: usize,

    /// Current character column (0-based). Counts characters, not bytes.
    curr_col: usize,

    /// Whether the previous character was `\r`, so that `\r\n` counts as a
    /// single line break.
    last_char_was_cr: bool,

    /// Whether the EOF token has been emitted.
    finished: bool,
}

impl<'src> StrGraphQLTokenSource<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            curr_byte_offset: 0,
            curr_line: 0,
            curr_col: 0,
            last_char_was_cr: false,
            finished: false,
        }
    }

    // =========================================================================
    // Position and scanning helpers
    // =========================================================================

    fn remaining(&self) -> &'src str {
        &self.source[self.curr_byte_offset..]
    }

    fn curr_position(&self) -> SourcePosition {
        SourcePosition::new(self.curr_line, self.curr_col, self.curr_byte_offset)
    }

    fn peek_char(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    fn peek_char_nth(&self, n: usize) -> Option<char> {
        self.remaining().chars().nth(n)
    }

    /// Consumes the next character and updates position tracking.
    ///
    /// `\n`, `\r` and `\r\n` each count as one line break.
    fn consume(&mut self) -> Option<char> {
        let ch = self.peek_char()?;

        match ch {
            '\n' if self.last_char_was_cr => {
                // Second half of `\r\n`; the line was already advanced.
                self.last_char_was_cr = false;
            },
            '\n' | '\r' => {
                self.curr_line += 1;
                self.curr_col = 0;
                self.last_char_was_cr = ch == '\r';
            },
            _ => {
                self.curr_col += 1;
                self.last_char_was_cr = false;
            },
        }

        self.curr_byte_offset += ch.len_utf8();
        Some(ch)
    }

    /// Consumes characters while `pred` holds.
    fn consume_while(&mut self, pred: impl Fn(char) -> bool) {
        while let Some(ch) = self.peek_char() {
            if !pred(ch) {
                break;
            }
            self.consume();
        }
    }

    fn make_span(&self, start: SourcePosition) -> GraphQLSourceSpan {
        GraphQLSourceSpan::new(start, self.curr_position())
    }

    fn make_token(
        &self,
        kind: GraphQLTokenKind<'src>,
        start: SourcePosition,
    ) -> GraphQLToken<'src> {
        GraphQLToken::new(kind, self.make_span(start))
    }

    /// Consumes a single-character punctuator.
    fn lex_punctuator(
        &mut self,
        kind: GraphQLTokenKind<'src>,
        start: SourcePosition,
    ) -> GraphQLToken<'src> {
        self.consume();
        self.make_token(kind, start)
    }

    // =========================================================================
    // Lexer main loop
    // =========================================================================

    fn next_token(&mut self) -> GraphQLToken<'src> {
        loop {
            self.skip_ignored();

            let start = self.curr_position();
            return match self.peek_char() {
                None => self.make_token(GraphQLTokenKind::Eof, start),

                Some('#') => {
                    self.skip_comment();
                    continue;
                },

                Some('!') => self.lex_punctuator(GraphQLTokenKind::Bang, start),
                Some('$') => self.lex_punctuator(GraphQLTokenKind::Dollar, start),
                Some('(') => self.lex_punctuator(GraphQLTokenKind::ParenOpen, start),
                Some(')') => self.lex_punctuator(GraphQLTokenKind::ParenClose, start),
                Some(':') => self.lex_punctuator(GraphQLTokenKind::Colon, start),
                Some('=') => self.lex_punctuator(GraphQLTokenKind::Equals, start),
                Some('@') => self.lex_punctuator(GraphQLTokenKind::At, start),
                Some('[') => self.lex_punctuator(GraphQLTokenKind::SquareBracketOpen, start),
                Some(']') => self.lex_punctuator(GraphQLTokenKind::SquareBracketClose, start),
                Some('{') => self.lex_punctuator(GraphQLTokenKind::CurlyBraceOpen, start),
                Some('}') => self.lex_punctuator(GraphQLTokenKind::CurlyBraceClose, start),

                Some('.') => self.lex_dot_or_ellipsis(start),
                Some('"') => self.lex_string(start),
                Some(c) if is_name_start(c) => self.lex_name(start),
                Some(c) if c == '-' || c.is_ascii_digit() => self.lex_number(start),
                Some(_) => self.lex_invalid_character(start),
            };
        }
    }

    // =========================================================================
    // Ignored tokens
    // =========================================================================

    /// Skips whitespace, line terminators, commas and the Unicode BOM.
    ///
    /// See: <https://spec.graphql.org/October2021/#sec-Language.Source-Text.Ignored-Tokens>
    fn skip_ignored(&mut self) {
        self.consume_while(|ch| matches!(ch, ' ' | '\t' | '\n' | '\r' | ',' | '\u{FEFF}'));
    }

    /// Skips a `#` comment up to (not including) the end of the line.
    fn skip_comment(&mut self) {
        self.consume_while(|ch| ch != '\n' && ch != '\r');
    }

    // =========================================================================
    // Dot / Ellipsis lexing
    // =========================================================================

    /// Lexes adjacent dots: `...` is an `Ellipsis`, anything shorter is an
    /// error token.
    fn lex_dot_or_ellipsis(&mut self, start: SourcePosition) -> GraphQLToken<'src> {
        let dot_count = self
            .remaining()
            .chars()
            .take(3)
            .take_while(|&ch| ch == '.')
            .count();
        for _ in 0..dot_count {
            self.consume();
        }

        let kind = match dot_count {
            3 => GraphQLTokenKind::Ellipsis,
            2 => GraphQLTokenKind::error(
                "Unexpected `..` (use `...` for spread operator)",
                smallvec![GraphQLErrorNote::help(
                    "Add one more `.` to form the spread operator `...`"
                )],
            ),
            _ => GraphQLTokenKind::error("Unexpected `.`", smallvec![]),
        };
        self.make_token(kind, start)
    }

    // =========================================================================
    // Name lexing
    // =========================================================================

    /// Lexes a name or keyword: `/[_A-Za-z][_0-9A-Za-z]*/`.
    ///
    /// `true`, `false`, and `null` are emitted as distinct token kinds.
    fn lex_name(&mut self, start: SourcePosition) -> GraphQLToken<'src> {
        let name_start = self.curr_byte_offset;
        self.consume();
        self.consume_while(is_name_continue);
        let name = &self.source[name_start..self.curr_byte_offset];

        let kind = match name {
            "true" => GraphQLTokenKind::True,
            "false" => GraphQLTokenKind::False,
            "null" => GraphQLTokenKind::Null,
            _ => GraphQLTokenKind::Name(Cow::Borrowed(name)),
        };
        self.make_token(kind, start)
    }

    // =========================================================================
    // Number lexing
    // =========================================================================

    /// Lexes an integer or float literal.
    ///
    /// - Optional negative sign: `-`
    /// - Integer part: `0` or `[1-9][0-9]*`
    /// - Optional fraction: `.[0-9]+`
    /// - Optional exponent: `[eE][+-]?[0-9]+`
    fn lex_number(&mut self, start: SourcePosition) -> GraphQLToken<'src> {
        let num_start = self.curr_byte_offset;
        let mut is_float = false;

        if self.peek_char() == Some('-') {
            self.consume();
        }

        match self.peek_char() {
            Some('0') => {
                self.consume();
                if self.peek_char().is_some_and(|ch| ch.is_ascii_digit()) {
                    return self.lex_number_error(
                        start,
                        num_start,
                        "Invalid number: leading zeros are not allowed",
                    );
                }
            },
            Some(ch) if ch.is_ascii_digit() => {
                self.consume_while(|ch| ch.is_ascii_digit());
            },
            _ => {
                let kind = GraphQLTokenKind::error("Unexpected `-`", smallvec![]);
                return self.make_token(kind, start);
            },
        }

        // A `.` only starts a fraction when a digit follows it.
        if self.peek_char() == Some('.')
            && self.peek_char_nth(1).is_some_and(|ch| ch.is_ascii_digit()) {
            is_float = true;
            self.consume();
            self.consume_while(|ch| ch.is_ascii_digit());
        }

        if matches!(self.peek_char(), Some('e' | 'E')) {
            is_float = true;
            self.consume();
            if matches!(self.peek_char(), Some('+' | '-')) {
                self.consume();
            }
            if !self.peek_char().is_some_and(|ch| ch.is_ascii_digit()) {
                return self.lex_number_error(
                    start,
                    num_start,
                    "Invalid number: exponent must have at least one digit",
                );
            }
            self.consume_while(|ch| ch.is_ascii_digit());
        }

        let num_text = &self.source[num_start..self.curr_byte_offset];
        let kind = if is_float {
            GraphQLTokenKind::FloatValue(Cow::Borrowed(num_text))
        } else {
            GraphQLTokenKind::IntValue(Cow::Borrowed(num_text))
        };
        self.make_token(kind, start)
    }

    /// Creates an error token for an invalid number, swallowing the rest of
    /// the number-like text so lexing resumes after it.
    fn lex_number_error(
        &mut self,
        start: SourcePosition,
        num_start: usize,
        message: &str,
    ) -> GraphQLToken<'src> {
        self.consume_while(|ch| ch.is_ascii_digit() || matches!(ch, '.' | 'e' | 'E' | '+' | '-'));
        let invalid_text = &self.source[num_start..self.curr_byte_offset];
        let kind = GraphQLTokenKind::error(format!("{message}: `{invalid_text}`"), smallvec![]);
        self.make_token(kind, start)
    }

    // =========================================================================
    // String lexing
    // =========================================================================

    /// Lexes a string literal (single-line or block string). The token keeps
    /// the raw text, quotes included.
    fn lex_string(&mut self, start: SourcePosition) -> GraphQLToken<'src> {
        let str_start = self.curr_byte_offset;

        if self.remaining().starts_with("\"\"\"") {
            return self.lex_block_string(start, str_start);
        }

        self.consume(); // opening "
        loop {
            match self.peek_char() {
                None | Some('\n') | Some('\r') => {
                    let kind = GraphQLTokenKind::error(
                        "Unterminated string literal",
                        smallvec![
                            GraphQLErrorNote::general_with_span(
                                "String started here",
                                GraphQLSourceSpan::empty_at(start),
                            ),
                            GraphQLErrorNote::help("Add closing `\"`"),
                        ],
                    );
                    return self.make_token(kind, start);
                },
                Some('"') => {
                    self.consume();
                    break;
                },
                Some('\\') => {
                    // Escape sequence: keep the escaped character raw.
                    self.consume();
                    if self.peek_char().is_some() {
                        self.consume();
                    }
                },
                Some(_) => {
                    self.consume();
                },
            }
        }

        let string_text = &self.source[str_start..self.curr_byte_offset];
        self.make_token(GraphQLTokenKind::StringValue(Cow::Borrowed(string_text)), start)
    }

    fn lex_block_string(&mut self, start: SourcePosition, str_start: usize) -> GraphQLToken<'src> {
        for _ in 0..3 {
            self.consume();
        }

        loop {
            let rest = self.remaining();
            if rest.is_empty() {
                let kind = GraphQLTokenKind::error(
                    "Unterminated block string",
                    smallvec![GraphQLErrorNote::help("Add closing `\"\"\"`")],
                );
                return self.make_token(kind, start);
            }
            if rest.starts_with("\\\"\"\"") {
                for _ in 0..4 {
                    self.consume();
                }
            } else if rest.starts_with("\"\"\"") {
                for _ in 0..3 {
                    self.consume();
                }
                break;
            } else {
                self.consume();
            }
        }

        let string_text = &self.source[str_start..self.curr_byte_offset];
        self.make_token(GraphQLTokenKind::StringValue(Cow::Borrowed(string_text)), start)
    }

    // =========================================================================
    // Invalid character handling
    // =========================================================================

    fn lex_invalid_character(&mut self, start: SourcePosition) -> GraphQLToken<'src> {
        let Some(ch) = self.consume() else {
            return self.make_token(GraphQLTokenKind::Eof, start);
        };
        let kind = GraphQLTokenKind::error(
            format!("Unexpected character {}", describe_char(ch)),
            smallvec![],
        );
        self.make_token(kind, start)
    }
}

impl<'src> Iterator for StrGraphQLTokenSource<'src> {
    type Item = GraphQLToken<'src>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let token = self.next_token();
        if matches!(token.kind, GraphQLTokenKind::Eof) {
            self.finished = true;
        }
        Some(token)
    }
}

/// See: <https://spec.graphql.org/October2021/#NameStart>
fn is_name_start(ch: char) -> bool {
    ch == '_' || ch.is_ascii_alphabetic()
}

/// See: <https://spec.graphql.org/October2021/#NameContinue>
fn is_name_continue(ch: char) -> bool {
    ch == '_' || ch.is_ascii_alphanumeric()
}

/// Printable characters are shown in backticks; invisible ones also get their
/// code point so the message is actionable.
fn describe_char(ch: char) -> String {
    if ch.is_control() || (ch.is_whitespace() && ch != ' ') {
        format!("`{}` (U+{:04X})", ch.escape_default(), ch as u32)
    } else {
        format!("`{ch}`")
    }
}
