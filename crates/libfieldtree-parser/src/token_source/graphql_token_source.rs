use crate::token::GraphQLToken;

/// Marker trait for [`GraphQLToken`] lexers (iterators that generate
/// [`GraphQLToken`]s).
///
/// All lookahead, buffering, and peeking is handled by
/// [`GraphQLTokenStream`](crate::GraphQLTokenStream). Lexers are responsible
/// for:
/// - Skipping ignored tokens (whitespace, commas, comments)
/// - Emitting [`GraphQLTokenKind::Error`](crate::token::GraphQLTokenKind::Error)
///   for lexer errors so the parser can report them with a position
/// - Emitting a final [`GraphQLTokenKind::Eof`](crate::token::GraphQLTokenKind::Eof)
///   token
///
/// The blanket impl lets tests drive the parser from a plain `Vec` of tokens.
pub trait GraphQLTokenSource<'src>: Iterator<Item = GraphQLToken<'src>> {}

impl<'src, T> GraphQLTokenSource<'src> for T where T: Iterator<Item = GraphQLToken<'src>> {}
