use crate::GraphQLSourceSpan;
use smallvec::SmallVec;

/// The kind of an error note (determines how the note is prefixed when
/// rendered).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum GraphQLErrorNoteKind {
    /// Explanatory context, rendered as `= note: ...`.
    General,
    /// An actionable suggestion, rendered as `= help: ...`.
    Help,
}

impl GraphQLErrorNoteKind {
    fn prefix(&self) -> &'static str {
        match self {
            GraphQLErrorNoteKind::General => "note",
            GraphQLErrorNoteKind::Help => "help",
        }
    }
}

/// An error note providing additional context about an error.
///
/// Notes augment the primary error message with explanatory context, fix
/// suggestions and related source locations (e.g., where a delimiter was
/// opened).
#[derive(Clone, Debug, PartialEq)]
pub struct GraphQLErrorNote {
    pub kind: GraphQLErrorNoteKind,
    pub message: String,

    /// Optional span pointing to a related location.
    pub span: Option<GraphQLSourceSpan>,
}

impl GraphQLErrorNote {
    /// Creates a general note without a span.
    pub fn general(message: impl Into<String>) -> Self {
        Self {
            kind: GraphQLErrorNoteKind::General,
            message: message.into(),
            span: None,
        }
    }

    /// Creates a general note with a span.
    pub fn general_with_span(message: impl Into<String>, span: GraphQLSourceSpan) -> Self {
        Self {
            kind: GraphQLErrorNoteKind::General,
            message: message.into(),
            span: Some(span),
        }
    }

    /// Creates a help note without a span.
    pub fn help(message: impl Into<String>) -> Self {
        Self {
            kind: GraphQLErrorNoteKind::Help,
            message: message.into(),
            span: None,
        }
    }

    /// Renders the note as a single `= kind: message` line, appending the
    /// related location when there is one.
    pub(crate) fn format_line(&self) -> String {
        match &self.span {
            Some(span) => format!(
                "= {}: {} (at {})",
                self.kind.prefix(),
                self.message,
                span.start_inclusive,
            ),
            None => format!("= {}: {}", self.kind.prefix(), self.message),
        }
    }
}

/// Most errors have 0-2 notes, so these live inline.
pub type GraphQLErrorNotes = SmallVec<[GraphQLErrorNote; 2]>;
