//! A lexer and error-recovering parser for executable GraphQL documents
//! (operations and named fragments).
//!
//! The parser is generic over its token source; [`GraphQLParser::new`] lexes
//! a `&str` with [`token_source::StrGraphQLTokenSource`]. Parsing always
//! yields a [`ParseResult`] so that every syntax error in a document can be
//! reported at once.

pub mod ast;
mod graphql_error_note;
mod graphql_parse_error;
mod graphql_parse_error_kind;
mod graphql_parser;
mod graphql_source_span;
mod graphql_string_parsing_error;
mod graphql_token_stream;
mod parse_result;
mod source_position;
pub mod token;
pub mod token_source;

pub use graphql_error_note::GraphQLErrorNote;
pub use graphql_error_note::GraphQLErrorNoteKind;
pub use graphql_error_note::GraphQLErrorNotes;
pub use graphql_parse_error::GraphQLParseError;
pub use graphql_parse_error_kind::GraphQLParseErrorKind;
pub use graphql_parser::GraphQLParser;
pub use graphql_source_span::GraphQLSourceSpan;
pub use graphql_string_parsing_error::GraphQLStringParsingError;
pub use graphql_token_stream::GraphQLTokenStream;
pub use parse_result::ParseResult;
pub use smallvec::smallvec;
pub use smallvec::SmallVec;
pub use source_position::SourcePosition;

#[cfg(test)]
mod tests;
