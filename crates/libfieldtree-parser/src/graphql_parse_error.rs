use crate::GraphQLErrorNote;
use crate::GraphQLErrorNotes;
use crate::GraphQLParseErrorKind;
use crate::GraphQLSourceSpan;

/// A parse error with location information and contextual notes.
#[derive(Clone, Debug, thiserror::Error)]
#[error("{}", self.format_oneline())]
pub struct GraphQLParseError {
    /// Human-readable primary error message, e.g. "expected `:`, found `3`".
    message: String,

    /// The primary span where the error was detected.
    ///
    /// - For "unexpected token" errors: the unexpected token's span
    /// - For "unclosed delimiter" errors: the position where closing was
    ///   expected
    span: GraphQLSourceSpan,

    kind: GraphQLParseErrorKind,

    notes: GraphQLErrorNotes,
}

impl GraphQLParseError {
    /// Creates a new parse error with no notes.
    pub fn new(
        message: impl Into<String>,
        span: GraphQLSourceSpan,
        kind: GraphQLParseErrorKind,
    ) -> Self {
        Self {
            message: message.into(),
            span,
            kind,
            notes: GraphQLErrorNotes::new(),
        }
    }

    /// Creates a parse error from a lexer error token, preserving the lexer's
    /// message and notes.
    pub fn from_lexer_error(
        message: impl Into<String>,
        span: GraphQLSourceSpan,
        lexer_notes: GraphQLErrorNotes,
    ) -> Self {
        Self {
            message: message.into(),
            span,
            kind: GraphQLParseErrorKind::LexerError,
            notes: lexer_notes,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn span(&self) -> &GraphQLSourceSpan {
        &self.span
    }

    pub fn kind(&self) -> &GraphQLParseErrorKind {
        &self.kind
    }

    pub fn notes(&self) -> &GraphQLErrorNotes {
        &self.notes
    }

    /// Adds a general note with a span (pointing to a related location).
    pub fn add_note_with_span(&mut self, message: impl Into<String>, span: GraphQLSourceSpan) {
        self.notes
            .push(GraphQLErrorNote::general_with_span(message, span));
    }

    /// Adds a help note without a span.
    pub fn add_help(&mut self, message: impl Into<String>) {
        self.notes.push(GraphQLErrorNote::help(message));
    }

    /// Formats this error as a diagnostic string for CLI output.
    ///
    /// Produces output like:
    /// ```text
    /// error: expected `:`, found `3`
    ///   --> <input>:1:11
    ///    |
    ///  1 | { user(id 3) { name } }
    ///    |           ^
    ///    = help: ...
    /// ```
    ///
    /// When `source` is `None` the snippet is omitted but the location line
    /// is still shown.
    pub fn format_detailed(&self, source: Option<&str>) -> String {
        let mut output = String::new();
        let start = self.span.start_inclusive;

        output.push_str("error: ");
        output.push_str(&self.message);
        output.push('\n');
        output.push_str(&format!("  --> <input>:{start}\n"));

        if let Some(line_text) = source.and_then(|src| src.lines().nth(start.line())) {
            let line_num = (start.line() + 1).to_string();
            let gutter = " ".repeat(line_num.len());

            // Underline to the end of the span when it stays on one line.
            let underline_len =
                if self.span.end_exclusive.line() == start.line() {
                    self.span
                        .end_exclusive
                        .column()
                        .saturating_sub(start.column())
                        .max(1)
                } else {
                    1
                };

            output.push_str(&format!(" {gutter} |\n"));
            output.push_str(&format!(" {line_num} | {line_text}\n"));
            output.push_str(&format!(
                " {gutter} | {}{}\n",
                " ".repeat(start.column()),
                "^".repeat(underline_len),
            ));
        }

        for note in &self.notes {
            output.push_str("   ");
            output.push_str(&note.format_line());
            output.push('\n');
        }

        output
    }

    /// Formats this error as a single line: `line:col: message`.
    pub fn format_oneline(&self) -> String {
        format!("{}: {}", self.span.start_inclusive, self.message)
    }
}
