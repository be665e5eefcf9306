/// Categorizes parse errors for programmatic handling.
///
/// Each variant contains minimal data needed for programmatic decisions.
/// Human-readable context belongs in the `notes` of the owning
/// [`GraphQLParseError`](crate::GraphQLParseError).
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum GraphQLParseErrorKind {
    /// Expected specific token(s) but found something else.
    ///
    /// ```text
    /// { user(id 3) { name } }
    ///           ^ expected `:`, found `3`
    /// ```
    #[error("unexpected token: `{found}`")]
    UnexpectedToken {
        expected: Vec<String>,
        found: String,
    },

    /// The document ended before a complete construct was parsed.
    #[error("unexpected end of input")]
    UnexpectedEof {
        expected: Vec<String>,
    },

    /// The parser hit a `GraphQLTokenKind::Error` token. The lexer's message
    /// and notes are carried by the owning error.
    #[error("lexer error")]
    LexerError,

    /// A delimiter was opened but the input ended before it was closed.
    ///
    /// ```text
    /// { user { name }
    /// # EOF here, missing `}`
    /// ```
    #[error("unclosed delimiter: `{delimiter}`")]
    UnclosedDelimiter {
        delimiter: String,
    },

    /// A construct that must be non-empty was empty (`{}`, `()`).
    #[error("invalid empty {construct}")]
    InvalidEmptyConstruct {
        construct: String,
    },

    /// An `@include`/`@skip` directive without exactly one `if` argument.
    ///
    /// ```text
    /// { user @include { name } }
    ///        ^^^^^^^^ missing `if` argument
    /// ```
    #[error("invalid condition for `@{directive}`")]
    InvalidDirectiveCondition {
        directive: String,
    },

    /// Valid GraphQL this parser deliberately does not handle (inline
    /// fragments, list and object literals).
    #[error("unsupported {construct}")]
    UnsupportedSyntax {
        construct: String,
    },

    /// A reserved name used where it is not allowed (`fragment on on T`).
    #[error("reserved name: `{name}`")]
    ReservedName {
        name: String,
    },

    /// Catch-all for syntax errors with no more specific category (e.g. the
    /// nesting depth limit).
    #[error("invalid syntax")]
    InvalidSyntax,
}
