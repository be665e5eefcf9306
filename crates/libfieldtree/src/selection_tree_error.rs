use libfieldtree_parser::GraphQLParseError;
use libfieldtree_parser::SourcePosition;
use thiserror::Error;

/// Why a selection tree could not be built.
///
/// No partial tree is ever produced alongside an error.
#[derive(Clone, Debug, Error)]
pub enum SelectionTreeError {
    /// The document failed to lex or parse. Holds every error the parser
    /// collected, in source order.
    #[error("{}", format_syntax_errors(.0))]
    Syntax(Vec<GraphQLParseError>),

    #[error("Undefined fragment '{fragment_name}' spread at {position}")]
    UndefinedFragment {
        fragment_name: String,
        position: SourcePosition,
    },

    /// `cycle_path` starts and ends with the same fragment name.
    #[error("Fragment cycle detected: {}", format_cycle_path(.cycle_path))]
    FragmentCycle { cycle_path: Vec<String> },

    #[error(
        "Duplicate fragment definition: '{fragment_name}' (first defined at \
        {first_position}, redefined at {second_position})"
    )]
    DuplicateFragment {
        fragment_name: String,
        first_position: SourcePosition,
        second_position: SourcePosition,
    },

    #[error("Document contains no operation")]
    MissingOperation,

    #[error("Document contains {count} operations; exactly one is supported")]
    MultipleOperations { count: usize },

    /// Selection sets, counted across inlined fragments, nest deeper than
    /// [`MAX_SELECTION_DEPTH`](crate::MAX_SELECTION_DEPTH).
    #[error("Selections nest deeper than the maximum depth of {limit}")]
    MaxDepthExceeded { limit: usize },
}

impl SelectionTreeError {
    /// Renders the error for a terminal. Syntax errors get the full
    /// source-annotated diagnostic; everything else its one-line message.
    pub fn format_detailed(&self, source: Option<&str>) -> String {
        match self {
            Self::Syntax(errors) => errors
                .iter()
                .map(|e| e.format_detailed(source))
                .collect::<Vec<_>>()
                .join("\n"),
            other => format!("error: {other}"),
        }
    }
}

fn format_syntax_errors(errors: &[GraphQLParseError]) -> String {
    match errors {
        [] => "Syntax error".to_string(),
        [only] => format!("Syntax error at {only}"),
        [first, rest @ ..] => format!(
            "Syntax error at {first} (and {} more)",
            rest.len(),
        ),
    }
}

fn format_cycle_path(cycle: &[String]) -> String {
    cycle.join(" → ")
}
