//! Result type for parsing operations that may produce partial results.

use crate::GraphQLParseError;

/// The result of a parsing operation.
///
/// Unlike `Result<T, E>`, `ParseResult` can hold both a recovered AST and
/// the errors encountered while producing it, so a single pass can report
/// every syntax error in a document.
///
/// Use [`valid_ast()`](Self::valid_ast) when only a fully valid document is
/// acceptable and [`ast()`](Self::ast) for best-effort consumers.
///
/// # Example
///
/// ```
/// use libfieldtree_parser::GraphQLParser;
///
/// let source = "{ user { name } }";
/// let result = GraphQLParser::new(source).parse_executable_document();
///
/// assert!(result.is_ok());
/// if result.has_errors() {
///     eprintln!("{}", result.format_errors(Some(source)));
/// }
/// ```
#[derive(Debug)]
pub struct ParseResult<TAst> {
    ast: Option<TAst>,

    /// Errors encountered during parsing, in source order. Empty if parsing
    /// was completely successful.
    pub errors: Vec<GraphQLParseError>,
}

impl<TAst> ParseResult<TAst> {
    pub(crate) fn ok(ast: TAst) -> Self {
        Self {
            ast: Some(ast),
            errors: Vec::new(),
        }
    }

    /// Creates a recovered parse result with both AST and errors.
    pub(crate) fn recovered(ast: TAst, errors: Vec<GraphQLParseError>) -> Self {
        Self {
            ast: Some(ast),
            errors,
        }
    }

    /// Returns the AST only if parsing was completely successful (no errors).
    pub fn valid_ast(&self) -> Option<&TAst> {
        if self.errors.is_empty() {
            self.ast.as_ref()
        } else {
            None
        }
    }

    /// Returns the AST if present, regardless of whether errors occurred.
    pub fn ast(&self) -> Option<&TAst> {
        self.ast.as_ref()
    }

    /// Takes ownership of the AST regardless of errors.
    pub fn into_ast(self) -> Option<TAst> {
        self.ast
    }

    /// Returns `true` if parsing was completely successful (has AST, no
    /// errors).
    pub fn is_ok(&self) -> bool {
        self.ast.is_some() && self.errors.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Formats all errors as a single string for display.
    pub fn format_errors(&self, source: Option<&str>) -> String {
        self.errors
            .iter()
            .map(|e| e.format_detailed(source))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl<TAst> From<ParseResult<TAst>> for Result<TAst, Vec<GraphQLParseError>> {
    /// Converts to a standard `Result`, treating recovered ASTs as errors.
    fn from(result: ParseResult<TAst>) -> Self {
        if result.errors.is_empty() {
            match result.ast {
                Some(ast) => Ok(ast),
                None => Err(Vec::new()),
            }
        } else {
            Err(result.errors)
        }
    }
}
