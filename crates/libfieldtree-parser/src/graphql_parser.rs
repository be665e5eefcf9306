//! Recursive descent parser for executable GraphQL documents.
//!
//! [`GraphQLParser`] works with any token source implementing
//! [`GraphQLTokenSource`] and produces an [`ast::Document`] holding the
//! operations and fragment definitions in source order. Fragment spreads are
//! kept as spreads; inlining them is left to consumers of the AST.
//!
//! # Architecture
//!
//! Each grammar rule has a `parse_*` method returning `Result<AstNode, ()>`.
//! `Err(())` means an error was already recorded via `record_error()` and the
//! caller should attempt recovery. A delimiter stack remembers where each
//! open `{`/`(`/`[` started so that unclosed delimiters can point back at
//! their opener.
//!
//! # Error Recovery
//!
//! - Inside a selection set, a failed selection skips ahead to the next
//!   field, spread or closing `}`.
//! - Inside an argument or variable list, a failed entry skips past the
//!   closing `)`.
//! - At the top level, a failed definition skips ahead to the next
//!   `query`/`mutation`/`subscription`/`fragment` keyword or `{`.
//!
//! This allows collecting multiple errors in a single parse pass.

use crate::ast;
use crate::GraphQLParseError;
use crate::GraphQLParseErrorKind;
use crate::GraphQLSourceSpan;
use crate::GraphQLTokenStream;
use crate::ParseResult;
use crate::SourcePosition;
use crate::token::GraphQLToken;
use crate::token::GraphQLTokenKind;
use crate::token_source::GraphQLTokenSource;
use crate::token_source::StrGraphQLTokenSource;
use smallvec::SmallVec;
use std::borrow::Cow;

const INCLUDE_DIRECTIVE: &str = "include";
const SKIP_DIRECTIVE: &str = "skip";
const CONDITION_ARGUMENT: &str = "if";

// =============================================================================
// Delimiter tracking for error recovery
// =============================================================================

/// Context in which a delimiter was opened, for error messages.
#[derive(Debug, Clone, Copy)]
enum DelimiterContext {
    /// `{ field ... }` in operations/fragments
    SelectionSet,
    /// `(arg: value)` in field arguments
    FieldArguments,
    /// `@directive(arg: value)` in directive arguments
    DirectiveArguments,
    /// `($var: Type)` in operation variable definitions
    VariableDefinitions,
    /// `[Type]` in type annotations
    ListType,
}

impl DelimiterContext {
    fn description(&self) -> &'static str {
        match self {
            DelimiterContext::SelectionSet => "selection set",
            DelimiterContext::FieldArguments => "field arguments",
            DelimiterContext::DirectiveArguments => "directive arguments",
            DelimiterContext::VariableDefinitions => "variable definitions",
            DelimiterContext::ListType => "list type annotation",
        }
    }
}

/// Tracks an open delimiter for error recovery.
#[derive(Debug, Clone)]
struct OpenDelimiter {
    span: GraphQLSourceSpan,
    context: DelimiterContext,
}

/// Internal enum for recovery actions, used to avoid borrow conflicts.
enum RecoveryAction {
    Stop,
    Skip,
    CheckKeyword(String),
}

/// What was found where something else was expected.
enum Mismatch<'src> {
    EndOfInput,
    LexerError(GraphQLToken<'src>),
    Unexpected {
        span: GraphQLSourceSpan,
        found: String,
    },
}

/// Where a value is being parsed, which decides whether variables are
/// allowed.
#[derive(Clone, Copy, Debug)]
enum ValueContext {
    Argument,
    VariableDefaultValue,
}

// =============================================================================
// Main parser struct
// =============================================================================

/// A recursive descent parser for executable GraphQL documents.
///
/// # Usage
///
/// ```
/// use libfieldtree_parser::ast;
/// use libfieldtree_parser::GraphQLParser;
///
/// let source = "query ($id: ID!) { user(id: $id) { name } }";
/// let result = GraphQLParser::new(source).parse_executable_document();
///
/// let doc = result.valid_ast().unwrap();
/// let op = doc.operations().next().unwrap();
/// assert_eq!(op.operation_kind, ast::OperationKind::Query);
/// assert_eq!(op.variable_definitions[0].variable, "id");
/// ```
pub struct GraphQLParser<'src, TTokenSource: GraphQLTokenSource<'src>> {
    token_stream: GraphQLTokenStream<'src, TTokenSource>,

    /// Accumulated parse errors.
    errors: Vec<GraphQLParseError>,

    /// Stack of open delimiters for error recovery.
    delimiter_stack: SmallVec<[OpenDelimiter; 8]>,

    /// Shared nesting depth counter for selection sets and type
    /// annotations.
    recursion_depth: usize,

    /// End position of the most recently consumed token, used by
    /// `eof_span()` to anchor EOF errors to the last known source location.
    last_end_position: Option<SourcePosition>,
}

impl<'src> GraphQLParser<'src, StrGraphQLTokenSource<'src>> {
    /// Creates a new parser from a string-like source.
    ///
    /// Accepts any type that can be referenced as a `str`, including `&str`
    /// and `&String`.
    pub fn new<S: AsRef<str> + ?Sized>(source: &'src S) -> Self {
        let token_source = StrGraphQLTokenSource::new(source.as_ref());
        Self::from_token_source(token_source)
    }
}

impl<'src, TTokenSource: GraphQLTokenSource<'src>> GraphQLParser<'src, TTokenSource> {
    /// Maximum nesting depth for selection sets and list type annotations.
    pub const MAX_RECURSION_DEPTH: usize = 64;

    /// Creates a new parser from a token source.
    pub fn from_token_source(token_source: TTokenSource) -> Self {
        Self {
            token_stream: GraphQLTokenStream::new(token_source),
            errors: Vec::new(),
            delimiter_stack: SmallVec::new(),
            recursion_depth: 0,
            last_end_position: None,
        }
    }

    // =========================================================================
    // Entry point
    // =========================================================================

    /// Parses an executable document (operations and fragments).
    ///
    /// Always returns an AST; check [`ParseResult::errors`] (or use
    /// [`ParseResult::valid_ast`]) to find out whether it is complete.
    pub fn parse_executable_document(mut self) -> ParseResult<ast::Document<'src>> {
        let mut definitions = Vec::new();

        while !self.token_stream.is_at_end() {
            match self.parse_definition() {
                Ok(def) => definitions.push(def),
                Err(()) => self.recover_to_next_definition(),
            }
        }

        let document = ast::Document { definitions };

        if self.errors.is_empty() {
            ParseResult::ok(document)
        } else {
            ParseResult::recovered(document, self.errors)
        }
    }

    // =========================================================================
    // Error recording and recovery
    // =========================================================================

    fn record_error(&mut self, error: GraphQLParseError) {
        self.errors.push(error);
    }

    fn push_delimiter(&mut self, span: GraphQLSourceSpan, context: DelimiterContext) {
        self.delimiter_stack.push(OpenDelimiter { span, context });
    }

    fn pop_delimiter(&mut self) -> Option<OpenDelimiter> {
        self.delimiter_stack.pop()
    }

    /// Records an error for whatever token sits where `description` was
    /// expected. Lexer error tokens are reported with the lexer's own
    /// message and consumed so that recovery makes progress.
    fn record_mismatch(&mut self, expected: Vec<String>, description: &str) {
        let mismatch = match self.token_stream.peek() {
            None => Mismatch::EndOfInput,
            Some(token) => match &token.kind {
                GraphQLTokenKind::Eof => Mismatch::EndOfInput,
                GraphQLTokenKind::Error { .. } => Mismatch::LexerError(token.clone()),
                kind => Mismatch::Unexpected {
                    span: token.span,
                    found: kind.display(),
                },
            },
        };

        match mismatch {
            Mismatch::EndOfInput => {
                let span = self.eof_span();
                self.record_error(GraphQLParseError::new(
                    format!("expected {description}, found end of input"),
                    span,
                    GraphQLParseErrorKind::UnexpectedEof { expected },
                ));
            },
            Mismatch::LexerError(token) => {
                self.handle_lexer_error(&token);
                self.consume_token();
            },
            Mismatch::Unexpected { span, found } => {
                self.record_error(GraphQLParseError::new(
                    format!("expected {description}, found `{found}`"),
                    span,
                    GraphQLParseErrorKind::UnexpectedToken { expected, found },
                ));
            },
        }
    }

    /// Converts a lexer error token into a parse error.
    fn handle_lexer_error(&mut self, token: &GraphQLToken<'src>) {
        if let GraphQLTokenKind::Error {
            message,
            error_notes,
        } = &token.kind
        {
            self.record_error(GraphQLParseError::from_lexer_error(
                message.clone(),
                token.span,
                error_notes.clone(),
            ));
        }
    }

    /// Skip tokens until we find the start of a new definition: `{`, or one
    /// of `query`, `mutation`, `subscription`, `fragment` in a position where
    /// it starts a definition.
    fn recover_to_next_definition(&mut self) {
        loop {
            let action = match self.token_stream.peek() {
                None => RecoveryAction::Stop,
                Some(token) => match &token.kind {
                    GraphQLTokenKind::Eof | GraphQLTokenKind::CurlyBraceOpen => {
                        RecoveryAction::Stop
                    },
                    GraphQLTokenKind::Name(name) => RecoveryAction::CheckKeyword(name.to_string()),
                    _ => RecoveryAction::Skip,
                },
            };

            match action {
                RecoveryAction::Stop => break,
                RecoveryAction::Skip => {
                    self.consume_token();
                },
                RecoveryAction::CheckKeyword(keyword) => {
                    if self.looks_like_definition_start(&keyword) {
                        break;
                    }
                    self.consume_token();
                },
            }
        }
        self.delimiter_stack.clear();
    }

    /// Checks whether `keyword` (the current token) starts a definition by
    /// peeking at the token after it. This keeps a field named `query` from
    /// being mistaken for a recovery point.
    fn looks_like_definition_start(&mut self, keyword: &str) -> bool {
        let next = self.token_stream.peek_nth(1).map(|t| &t.kind);

        match keyword {
            "query" | "mutation" | "subscription" => matches!(
                next,
                Some(
                    GraphQLTokenKind::Name(_)
                        | GraphQLTokenKind::True
                        | GraphQLTokenKind::False
                        | GraphQLTokenKind::Null
                        | GraphQLTokenKind::CurlyBraceOpen
                        | GraphQLTokenKind::ParenOpen
                        | GraphQLTokenKind::At
                )
            ),
            "fragment" => match next {
                Some(GraphQLTokenKind::Name(name)) => name.as_ref() != "on",
                Some(kind) => matches!(
                    kind,
                    GraphQLTokenKind::True | GraphQLTokenKind::False | GraphQLTokenKind::Null
                ),
                None => false,
            },
            _ => false,
        }
    }

    /// Skip tokens within a selection set until the next selection or the
    /// closing `}`.
    fn skip_to_selection_recovery_point(&mut self) {
        loop {
            let stop = match self.token_stream.peek() {
                None => true,
                Some(token) => matches!(
                    token.kind,
                    GraphQLTokenKind::CurlyBraceClose
                        | GraphQLTokenKind::Eof
                        | GraphQLTokenKind::Ellipsis
                        | GraphQLTokenKind::Name(_)
                        | GraphQLTokenKind::True
                        | GraphQLTokenKind::False
                        | GraphQLTokenKind::Null
                ),
            };
            if stop {
                break;
            }
            self.consume_token();
        }
    }

    /// Skip tokens past the `)` that closes the current parenthesized list.
    ///
    /// Returns `false` (without consuming it) if a brace or the end of input
    /// comes first, in which case the list cannot be resumed.
    fn recover_to_closing_paren(&mut self) -> bool {
        loop {
            let kind = match self.token_stream.peek() {
                None => return false,
                Some(token) => token.kind.clone(),
            };
            match kind {
                GraphQLTokenKind::ParenClose => {
                    self.consume_token();
                    return true;
                },
                GraphQLTokenKind::CurlyBraceOpen
                | GraphQLTokenKind::CurlyBraceClose
                | GraphQLTokenKind::Eof => return false,
                _ => {
                    self.consume_token();
                },
            }
        }
    }

    /// Consumes a balanced `open ... close` group starting at the current
    /// token. Stops early at end of input.
    fn skip_balanced(&mut self, open: &GraphQLTokenKind, close: &GraphQLTokenKind) {
        let mut depth = 0usize;
        loop {
            let kind = match self.token_stream.peek() {
                None => return,
                Some(token) => token.kind.clone(),
            };
            if kind == GraphQLTokenKind::Eof {
                return;
            }
            self.consume_token();
            if kind == *open {
                depth += 1;
            } else if kind == *close {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return;
                }
            }
        }
    }

    fn handle_unclosed_brace(&mut self) {
        self.handle_unclosed_delimiter("{");
    }

    fn handle_unclosed_paren(&mut self) {
        self.handle_unclosed_delimiter("(");
    }

    fn handle_unclosed_delimiter(&mut self, delimiter: &str) {
        let span = self.eof_span();
        let open_delim = self.pop_delimiter();
        let mut error = GraphQLParseError::new(
            format!("unclosed `{delimiter}`"),
            span,
            GraphQLParseErrorKind::UnclosedDelimiter {
                delimiter: delimiter.to_string(),
            },
        );
        if let Some(delim) = open_delim {
            error.add_note_with_span(
                format!(
                    "opening `{delimiter}` in {} here",
                    delim.context.description(),
                ),
                delim.span,
            );
        }
        self.record_error(error);
    }

    /// Checks recursion depth and records an error if the limit is exceeded.
    /// On success the caller must call `exit_recursion()` when done.
    ///
    /// The over-deep group is skipped whole, so one too-deep construct
    /// yields one error.
    fn enter_recursion(&mut self) -> Result<(), ()> {
        self.recursion_depth += 1;
        if self.recursion_depth > Self::MAX_RECURSION_DEPTH {
            let span = self.peek_span();
            match self.token_stream.peek().map(|token| token.kind.clone()) {
                Some(GraphQLTokenKind::CurlyBraceOpen) => self.skip_balanced(
                    &GraphQLTokenKind::CurlyBraceOpen,
                    &GraphQLTokenKind::CurlyBraceClose,
                ),
                Some(GraphQLTokenKind::SquareBracketOpen) => self.skip_balanced(
                    &GraphQLTokenKind::SquareBracketOpen,
                    &GraphQLTokenKind::SquareBracketClose,
                ),
                _ => {
                    self.consume_token();
                },
            }
            self.record_error(GraphQLParseError::new(
                format!(
                    "maximum nesting depth of {} exceeded",
                    Self::MAX_RECURSION_DEPTH,
                ),
                span,
                GraphQLParseErrorKind::InvalidSyntax,
            ));
            self.recursion_depth -= 1;
            return Err(());
        }
        Ok(())
    }

    fn exit_recursion(&mut self) {
        self.recursion_depth -= 1;
    }

    // =========================================================================
    // Token helpers
    // =========================================================================

    /// Consumes the next token and tracks its end position for EOF error
    /// reporting.
    fn consume_token(&mut self) -> Option<GraphQLToken<'src>> {
        let token = self.token_stream.consume();
        if let Some(t) = &token {
            self.last_end_position = Some(t.span.end_exclusive);
        }
        token
    }

    /// Consumes a token whose presence was already established by a peek.
    fn advance(&mut self) -> Result<GraphQLToken<'src>, ()> {
        self.consume_token().ok_or(())
    }

    /// Returns a span for EOF errors, anchored to the end of the last
    /// consumed token if available.
    fn eof_span(&self) -> GraphQLSourceSpan {
        let pos = self
            .last_end_position
            .unwrap_or_else(|| SourcePosition::new(0, 0, 0));
        GraphQLSourceSpan::empty_at(pos)
    }

    fn peek_span(&mut self) -> GraphQLSourceSpan {
        self.token_stream
            .peek()
            .map(|t| t.span)
            .unwrap_or_else(|| self.eof_span())
    }

    /// Builds a span from `start` to the end of the last consumed token.
    fn make_span(&self, start: GraphQLSourceSpan) -> GraphQLSourceSpan {
        let end = self.last_end_position.unwrap_or(start.start_inclusive);
        GraphQLSourceSpan::new(start.start_inclusive, end)
    }

    /// Checks if the current token has the same variant as `kind` (payloads
    /// are not compared).
    fn peek_is(&mut self, kind: &GraphQLTokenKind) -> bool {
        self.token_stream
            .peek()
            .is_some_and(|t| std::mem::discriminant(&t.kind) == std::mem::discriminant(kind))
    }

    /// Checks if the current token is the `Name` `keyword`. `true`, `false`
    /// and `null` never match since they are lexed as distinct kinds.
    fn peek_is_keyword(&mut self, keyword: &str) -> bool {
        self.token_stream.peek().is_some_and(|t| {
            matches!(&t.kind, GraphQLTokenKind::Name(name) if name.as_ref() == keyword)
        })
    }

    fn peek_is_name_like(&mut self) -> bool {
        self.token_stream
            .peek()
            .is_some_and(|t| t.kind.is_name_like())
    }

    /// Expects a specific token kind and consumes it.
    fn expect(&mut self, expected_kind: &GraphQLTokenKind) -> Result<GraphQLToken<'src>, ()> {
        if self.peek_is(expected_kind) {
            return self.advance();
        }
        let display = expected_kind.display();
        self.record_mismatch(vec![display.clone()], &format!("`{display}`"));
        Err(())
    }

    /// Expects a name and returns it with its span.
    ///
    /// `true`, `false` and `null` are valid names outside of value positions
    /// and are accepted here.
    fn expect_name(&mut self) -> Result<ast::Name<'src>, ()> {
        if !self.peek_is_name_like() {
            self.record_mismatch(vec!["name".to_string()], "name");
            return Err(());
        }
        let token = self.advance()?;
        let value = match token.kind {
            GraphQLTokenKind::Name(s) => s,
            GraphQLTokenKind::True => Cow::Borrowed("true"),
            GraphQLTokenKind::False => Cow::Borrowed("false"),
            GraphQLTokenKind::Null => Cow::Borrowed("null"),
            _ => return Err(()),
        };
        Ok(ast::Name {
            span: token.span,
            value,
        })
    }

    /// Expects a specific keyword (a `Name` token with specific text).
    fn expect_keyword(&mut self, keyword: &str) -> Result<GraphQLSourceSpan, ()> {
        if self.peek_is_keyword(keyword) {
            return Ok(self.advance()?.span);
        }
        self.record_mismatch(vec![keyword.to_string()], &format!("`{keyword}`"));
        Err(())
    }

    // =========================================================================
    // Definitions
    // =========================================================================

    fn parse_definition(&mut self) -> Result<ast::Definition<'src>, ()> {
        if self.peek_is_keyword("query")
            || self.peek_is_keyword("mutation")
            || self.peek_is_keyword("subscription")
            || self.peek_is(&GraphQLTokenKind::CurlyBraceOpen)
        {
            return Ok(ast::Definition::Operation(
                self.parse_operation_definition()?,
            ));
        }
        if self.peek_is_keyword("fragment") {
            return Ok(ast::Definition::Fragment(
                self.parse_fragment_definition()?,
            ));
        }

        let expected = ["query", "mutation", "subscription", "fragment", "{"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        // Recovery skips the offending token: it cannot start a definition.
        self.record_mismatch(expected, "operation or fragment definition");
        Err(())
    }

    /// Parses an operation definition, either shorthand (`{ ... }`) or
    /// `query|mutation|subscription Name? ($vars)? @directives { ... }`.
    fn parse_operation_definition(&mut self) -> Result<ast::OperationDefinition<'src>, ()> {
        if self.peek_is(&GraphQLTokenKind::CurlyBraceOpen) {
            let start = self.peek_span();
            let selection_set = self.parse_selection_set()?;
            return Ok(ast::OperationDefinition {
                span: self.make_span(start),
                operation_kind: ast::OperationKind::Query,
                is_shorthand: true,
                name: None,
                variable_definitions: Vec::new(),
                directives: Vec::new(),
                selection_set,
            });
        }

        let (operation_kind, start) = if self.peek_is_keyword("query") {
            (ast::OperationKind::Query, self.expect_keyword("query")?)
        } else if self.peek_is_keyword("mutation") {
            (ast::OperationKind::Mutation, self.expect_keyword("mutation")?)
        } else {
            (
                ast::OperationKind::Subscription,
                self.expect_keyword("subscription")?,
            )
        };

        let name = if self.peek_is_name_like() {
            Some(self.expect_name()?)
        } else {
            None
        };

        let variable_definitions = if self.peek_is(&GraphQLTokenKind::ParenOpen) {
            self.parse_variable_definitions()?
        } else {
            Vec::new()
        };

        let directives = self.parse_directive_annotations()?;
        let selection_set = self.parse_selection_set()?;

        Ok(ast::OperationDefinition {
            span: self.make_span(start),
            operation_kind,
            is_shorthand: false,
            name,
            variable_definitions,
            directives,
            selection_set,
        })
    }

    /// Parses variable definitions: `($var: Type = default, ...)`
    fn parse_variable_definitions(&mut self) -> Result<Vec<ast::VariableDefinition<'src>>, ()> {
        let open_token = self.expect(&GraphQLTokenKind::ParenOpen)?;
        self.push_delimiter(open_token.span, DelimiterContext::VariableDefinitions);

        let mut definitions = Vec::new();

        if self.peek_is(&GraphQLTokenKind::ParenClose) {
            let mut error = GraphQLParseError::new(
                "variable definitions cannot be empty",
                open_token.span,
                GraphQLParseErrorKind::InvalidEmptyConstruct {
                    construct: "variable definitions".to_string(),
                },
            );
            error.add_help("omit the parentheses instead");
            self.record_error(error);
        }

        loop {
            if self.peek_is(&GraphQLTokenKind::ParenClose) {
                break;
            }
            if self.token_stream.is_at_end() {
                self.handle_unclosed_paren();
                return Err(());
            }

            match self.parse_variable_definition() {
                Ok(definition) => definitions.push(definition),
                Err(()) => {
                    if self.recover_to_closing_paren() {
                        self.pop_delimiter();
                        return Ok(definitions);
                    }
                    return Err(());
                },
            }
        }

        self.expect(&GraphQLTokenKind::ParenClose)?;
        self.pop_delimiter();

        Ok(definitions)
    }

    /// Parses a single variable definition: `$name: Type = default`
    fn parse_variable_definition(&mut self) -> Result<ast::VariableDefinition<'src>, ()> {
        let dollar = self.expect(&GraphQLTokenKind::Dollar)?;
        let variable = self.expect_name()?;
        self.expect(&GraphQLTokenKind::Colon)?;
        let var_type = self.parse_type_annotation()?;

        let default_value = if self.peek_is(&GraphQLTokenKind::Equals) {
            self.consume_token();
            Some(self.parse_value(ValueContext::VariableDefaultValue)?)
        } else {
            None
        };

        Ok(ast::VariableDefinition {
            span: self.make_span(dollar.span),
            variable,
            var_type,
            default_value,
        })
    }

    /// Parses a type annotation: `Name`, `[Type]`, either optionally followed
    /// by `!`.
    fn parse_type_annotation(&mut self) -> Result<ast::TypeAnnotation<'src>, ()> {
        self.enter_recursion()?;
        let result = self.parse_type_annotation_impl();
        self.exit_recursion();
        result
    }

    fn parse_type_annotation_impl(&mut self) -> Result<ast::TypeAnnotation<'src>, ()> {
        let base_type = if self.peek_is(&GraphQLTokenKind::SquareBracketOpen) {
            let open_token = self.advance()?;
            self.push_delimiter(open_token.span, DelimiterContext::ListType);
            let inner = self.parse_type_annotation()?;
            self.expect(&GraphQLTokenKind::SquareBracketClose)?;
            self.pop_delimiter();
            ast::TypeAnnotation::List(Box::new(inner))
        } else {
            ast::TypeAnnotation::Named(self.expect_name()?)
        };

        if self.peek_is(&GraphQLTokenKind::Bang) {
            self.consume_token();
            Ok(ast::TypeAnnotation::NonNull(Box::new(base_type)))
        } else {
            Ok(base_type)
        }
    }

    /// Parses a fragment definition:
    /// `fragment Name on Type @directives { ... }`
    fn parse_fragment_definition(&mut self) -> Result<ast::FragmentDefinition<'src>, ()> {
        let start = self.expect_keyword("fragment")?;

        let name = self.expect_name()?;
        if name == "on" {
            // The AST is still produced; the error marks the document invalid.
            let mut error = GraphQLParseError::new(
                "fragment name cannot be `on`",
                name.span,
                GraphQLParseErrorKind::ReservedName {
                    name: "on".to_string(),
                },
            );
            error.add_help("rename the fragment");
            self.record_error(error);
        }

        self.expect_keyword("on")?;
        let type_condition = self.expect_name()?;
        let directives = self.parse_directive_annotations()?;
        let selection_set = self.parse_selection_set()?;

        Ok(ast::FragmentDefinition {
            span: self.make_span(start),
            name,
            type_condition,
            directives,
            selection_set,
        })
    }

    // =========================================================================
    // Selection sets
    // =========================================================================

    /// Parses a selection set: `{ selection... }`
    fn parse_selection_set(&mut self) -> Result<ast::SelectionSet<'src>, ()> {
        self.enter_recursion()?;
        let result = self.parse_selection_set_impl();
        self.exit_recursion();
        result
    }

    fn parse_selection_set_impl(&mut self) -> Result<ast::SelectionSet<'src>, ()> {
        let open_token = self.expect(&GraphQLTokenKind::CurlyBraceOpen)?;
        self.push_delimiter(open_token.span, DelimiterContext::SelectionSet);

        let mut selections = Vec::new();

        if self.peek_is(&GraphQLTokenKind::CurlyBraceClose) {
            self.record_error(GraphQLParseError::new(
                "selection set cannot be empty",
                open_token.span,
                GraphQLParseErrorKind::InvalidEmptyConstruct {
                    construct: "selection set".to_string(),
                },
            ));
        }

        loop {
            if self.peek_is(&GraphQLTokenKind::CurlyBraceClose) {
                break;
            }
            if self.token_stream.is_at_end() {
                self.handle_unclosed_brace();
                return Err(());
            }

            match self.parse_selection() {
                Ok(selection) => selections.push(selection),
                Err(()) => self.skip_to_selection_recovery_point(),
            }
        }

        self.expect(&GraphQLTokenKind::CurlyBraceClose)?;
        self.pop_delimiter();

        Ok(ast::SelectionSet {
            span: self.make_span(open_token.span),
            selections,
        })
    }

    /// Parses a single selection: a field or a fragment spread.
    fn parse_selection(&mut self) -> Result<ast::Selection<'src>, ()> {
        if !self.peek_is(&GraphQLTokenKind::Ellipsis) {
            return self.parse_field().map(ast::Selection::Field);
        }

        let ellipsis = self.advance()?;
        if self.peek_is_keyword("on")
            || self.peek_is(&GraphQLTokenKind::At)
            || self.peek_is(&GraphQLTokenKind::CurlyBraceOpen)
        {
            self.parse_inline_fragment(ellipsis.span)?;
            return Err(());
        }

        let name = self.expect_name()?;
        let directives = self.parse_directive_annotations()?;
        Ok(ast::Selection::FragmentSpread(ast::FragmentSpread {
            span: self.make_span(ellipsis.span),
            name,
            directives,
        }))
    }

    /// Parses a field: `alias: name(args) @directives { selections }`
    fn parse_field(&mut self) -> Result<ast::Field<'src>, ()> {
        let first_name = self.expect_name()?;
        let start = first_name.span;

        let (alias, name) = if self.peek_is(&GraphQLTokenKind::Colon) {
            self.consume_token();
            (Some(first_name), self.expect_name()?)
        } else {
            (None, first_name)
        };

        let arguments = if self.peek_is(&GraphQLTokenKind::ParenOpen) {
            self.parse_arguments(DelimiterContext::FieldArguments)?
        } else {
            Vec::new()
        };

        let directives = self.parse_directive_annotations()?;

        let selection_set = if self.peek_is(&GraphQLTokenKind::CurlyBraceOpen) {
            Some(self.parse_selection_set()?)
        } else {
            None
        };

        Ok(ast::Field {
            span: self.make_span(start),
            alias,
            name,
            arguments,
            directives,
            selection_set,
        })
    }

    /// Consumes an inline fragment (`... on Type @directives { ... }`, called
    /// after the `...`) and reports it as unsupported.
    fn parse_inline_fragment(&mut self, ellipsis_span: GraphQLSourceSpan) -> Result<(), ()> {
        if self.peek_is_keyword("on") {
            self.consume_token();
            self.expect_name()?;
        }
        self.parse_directive_annotations()?;
        self.parse_selection_set()?;

        let mut error = GraphQLParseError::new(
            "inline fragments are not supported",
            self.make_span(ellipsis_span),
            GraphQLParseErrorKind::UnsupportedSyntax {
                construct: "inline fragment".to_string(),
            },
        );
        error.add_help(
            "move the selections into a named fragment and spread it with `...FragmentName`",
        );
        self.record_error(error);
        Ok(())
    }

    // =========================================================================
    // Directives and arguments
    // =========================================================================

    /// Parses zero or more directive annotations: `@directive(args)...`
    fn parse_directive_annotations(&mut self) -> Result<Vec<ast::DirectiveAnnotation<'src>>, ()> {
        let mut directives = Vec::new();
        while self.peek_is(&GraphQLTokenKind::At) {
            directives.push(self.parse_directive_annotation()?);
        }
        Ok(directives)
    }

    /// Parses a single directive annotation: `@name` or `@name(args)`
    fn parse_directive_annotation(&mut self) -> Result<ast::DirectiveAnnotation<'src>, ()> {
        let at = self.expect(&GraphQLTokenKind::At)?;
        let name = self.expect_name()?;

        let arguments = if self.peek_is(&GraphQLTokenKind::ParenOpen) {
            self.parse_arguments(DelimiterContext::DirectiveArguments)?
        } else {
            Vec::new()
        };

        let directive = ast::DirectiveAnnotation {
            span: self.make_span(at.span),
            name,
            arguments,
        };
        self.validate_condition_directive(&directive);
        Ok(directive)
    }

    /// `@include` and `@skip` take exactly one argument, `if`.
    fn validate_condition_directive(&mut self, directive: &ast::DirectiveAnnotation<'src>) {
        let name = directive.name.as_str();
        if name != INCLUDE_DIRECTIVE && name != SKIP_DIRECTIVE {
            return;
        }
        let [only_argument] = directive.arguments.as_slice() else {
            self.record_condition_error(directive);
            return;
        };
        if only_argument.name != CONDITION_ARGUMENT {
            self.record_condition_error(directive);
        }
    }

    fn record_condition_error(&mut self, directive: &ast::DirectiveAnnotation<'src>) {
        let name = directive.name.as_str();
        let message = if directive.argument(CONDITION_ARGUMENT).is_none() {
            format!("`@{name}` requires an `{CONDITION_ARGUMENT}` argument")
        } else {
            format!("`@{name}` takes exactly one argument, `{CONDITION_ARGUMENT}`")
        };
        let mut error = GraphQLParseError::new(
            message,
            directive.span,
            GraphQLParseErrorKind::InvalidDirectiveCondition {
                directive: name.to_string(),
            },
        );
        error.add_help(format!(
            "write `@{name}(if: true)`, `@{name}(if: false)` or `@{name}(if: $variable)`",
        ));
        self.record_error(error);
    }

    /// Parses arguments: `(name: value, ...)`
    fn parse_arguments(&mut self, context: DelimiterContext) -> Result<Vec<ast::Argument<'src>>, ()> {
        let open_token = self.expect(&GraphQLTokenKind::ParenOpen)?;
        self.push_delimiter(open_token.span, context);

        let mut arguments = Vec::new();

        if self.peek_is(&GraphQLTokenKind::ParenClose) {
            let mut error = GraphQLParseError::new(
                "argument list cannot be empty",
                open_token.span,
                GraphQLParseErrorKind::InvalidEmptyConstruct {
                    construct: "argument list".to_string(),
                },
            );
            error.add_help("omit the parentheses instead");
            self.record_error(error);
        }

        loop {
            if self.peek_is(&GraphQLTokenKind::ParenClose) {
                break;
            }
            if self.token_stream.is_at_end() {
                self.handle_unclosed_paren();
                return Err(());
            }

            match self.parse_argument() {
                Ok(argument) => arguments.push(argument),
                Err(()) => {
                    if self.recover_to_closing_paren() {
                        self.pop_delimiter();
                        return Ok(arguments);
                    }
                    return Err(());
                },
            }
        }

        self.expect(&GraphQLTokenKind::ParenClose)?;
        self.pop_delimiter();

        Ok(arguments)
    }

    fn parse_argument(&mut self) -> Result<ast::Argument<'src>, ()> {
        let name = self.expect_name()?;
        let start = name.span;
        self.expect(&GraphQLTokenKind::Colon)?;
        let value = self.parse_value(ValueContext::Argument)?;
        Ok(ast::Argument {
            span: self.make_span(start),
            name,
            value,
        })
    }

    // =========================================================================
    // Values
    // =========================================================================

    /// Parses a scalar value or a variable reference.
    fn parse_value(&mut self, context: ValueContext) -> Result<ast::Value<'src>, ()> {
        let Some(token) = self.token_stream.peek().cloned() else {
            self.record_mismatch(vec!["value".to_string()], "value");
            return Err(());
        };

        match &token.kind {
            GraphQLTokenKind::Dollar => {
                self.consume_token();
                if let ValueContext::VariableDefaultValue = context {
                    self.record_error(GraphQLParseError::new(
                        "variables are not allowed in variable default values",
                        token.span,
                        GraphQLParseErrorKind::InvalidSyntax,
                    ));
                    return Err(());
                }
                Ok(ast::Value::Variable(self.expect_name()?))
            },

            GraphQLTokenKind::IntValue(raw) => {
                self.consume_token();
                match token.kind.parse_int_value() {
                    Some(Ok(value)) => Ok(ast::Value::Int(value)),
                    _ => {
                        self.record_error(GraphQLParseError::new(
                            format!("integer `{raw}` does not fit in 64 bits"),
                            token.span,
                            GraphQLParseErrorKind::InvalidSyntax,
                        ));
                        Err(())
                    },
                }
            },

            GraphQLTokenKind::FloatValue(raw) => {
                self.consume_token();
                match token.kind.parse_float_value() {
                    Some(Ok(value)) if value.is_finite() => Ok(ast::Value::Float(value)),
                    _ => {
                        self.record_error(GraphQLParseError::new(
                            format!("float `{raw}` is not a finite number"),
                            token.span,
                            GraphQLParseErrorKind::InvalidSyntax,
                        ));
                        Err(())
                    },
                }
            },

            GraphQLTokenKind::StringValue(_) => {
                self.consume_token();
                match token.kind.parse_string_value() {
                    Some(Ok(value)) => Ok(ast::Value::String(value)),
                    Some(Err(err)) => {
                        self.record_error(GraphQLParseError::new(
                            format!("invalid string: {err}"),
                            token.span,
                            GraphQLParseErrorKind::InvalidSyntax,
                        ));
                        Err(())
                    },
                    None => Err(()),
                }
            },

            GraphQLTokenKind::True => {
                self.consume_token();
                Ok(ast::Value::Boolean(true))
            },
            GraphQLTokenKind::False => {
                self.consume_token();
                Ok(ast::Value::Boolean(false))
            },
            GraphQLTokenKind::Null => {
                self.consume_token();
                Ok(ast::Value::Null)
            },

            GraphQLTokenKind::Name(raw) => {
                self.consume_token();
                Ok(ast::Value::Enum(ast::Name {
                    span: token.span,
                    value: raw.clone(),
                }))
            },

            GraphQLTokenKind::SquareBracketOpen => {
                self.skip_balanced(
                    &GraphQLTokenKind::SquareBracketOpen,
                    &GraphQLTokenKind::SquareBracketClose,
                );
                self.record_unsupported_value("list", token.span);
                Err(())
            },

            GraphQLTokenKind::CurlyBraceOpen => {
                self.skip_balanced(
                    &GraphQLTokenKind::CurlyBraceOpen,
                    &GraphQLTokenKind::CurlyBraceClose,
                );
                self.record_unsupported_value("object", token.span);
                Err(())
            },

            _ => {
                self.record_mismatch(vec!["value".to_string()], "value");
                Err(())
            },
        }
    }

    fn record_unsupported_value(&mut self, what: &str, start: GraphQLSourceSpan) {
        let mut error = GraphQLParseError::new(
            format!("{what} values are not supported"),
            self.make_span(start),
            GraphQLParseErrorKind::UnsupportedSyntax {
                construct: format!("{what} value"),
            },
        );
        error.add_help("pass the value through a variable instead");
        self.record_error(error);
    }
}
