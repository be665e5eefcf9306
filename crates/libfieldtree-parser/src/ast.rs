//! Syntax tree for executable GraphQL documents (operations and fragment
//! definitions).
//!
//! Names borrow from the source text where possible (`Cow<'src, str>`), so
//! building the tree does not copy identifiers. Every node carries the
//! [`GraphQLSourceSpan`] it was parsed from.

use crate::GraphQLSourceSpan;
use std::borrow::Cow;

/// A name together with where it appeared.
#[derive(Clone, Debug, PartialEq)]
pub struct Name<'src> {
    pub span: GraphQLSourceSpan,
    pub value: Cow<'src, str>,
}

impl Name<'_> {
    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl PartialEq<str> for Name<'_> {
    fn eq(&self, other: &str) -> bool {
        self.value == other
    }
}

impl PartialEq<&str> for Name<'_> {
    fn eq(&self, other: &&str) -> bool {
        self.value == *other
    }
}

// =========================================================
// Document
// =========================================================

/// An executable document: operations and fragment definitions in source
/// order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Document<'src> {
    pub definitions: Vec<Definition<'src>>,
}

impl<'src> Document<'src> {
    pub fn operations(&self) -> impl Iterator<Item = &OperationDefinition<'src>> {
        self.definitions.iter().filter_map(|def| match def {
            Definition::Operation(op) => Some(op),
            Definition::Fragment(_) => None,
        })
    }

    pub fn fragments(&self) -> impl Iterator<Item = &FragmentDefinition<'src>> {
        self.definitions.iter().filter_map(|def| match def {
            Definition::Fragment(frag) => Some(frag),
            Definition::Operation(_) => None,
        })
    }
}

#[allow(clippy::large_enum_variant)]
#[derive(Clone, Debug, PartialEq)]
pub enum Definition<'src> {
    Operation(OperationDefinition<'src>),
    Fragment(FragmentDefinition<'src>),
}

// =========================================================
// Operation definitions
// =========================================================

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OperationKind {
    Query,
    Mutation,
    Subscription,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Query => "query",
            OperationKind::Mutation => "mutation",
            OperationKind::Subscription => "subscription",
        }
    }
}

/// An operation definition. The shorthand form `{ ... }` is a query with no
/// name, no variables and `is_shorthand` set.
///
/// See
/// [Operations](https://spec.graphql.org/October2021/#sec-Language.Operations)
/// in the GraphQL language reference.
#[derive(Clone, Debug, PartialEq)]
pub struct OperationDefinition<'src> {
    pub span: GraphQLSourceSpan,
    pub operation_kind: OperationKind,
    pub is_shorthand: bool,
    pub name: Option<Name<'src>>,
    pub variable_definitions: Vec<VariableDefinition<'src>>,
    pub directives: Vec<DirectiveAnnotation<'src>>,
    pub selection_set: SelectionSet<'src>,
}

/// A variable definition (e.g. `$id: ID! = 4`).
///
/// Only the name matters when building selection trees; the type annotation
/// and default value are kept so the AST round-trips what was written.
#[derive(Clone, Debug, PartialEq)]
pub struct VariableDefinition<'src> {
    pub span: GraphQLSourceSpan,
    pub variable: Name<'src>,
    pub var_type: TypeAnnotation<'src>,
    pub default_value: Option<Value<'src>>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum TypeAnnotation<'src> {
    Named(Name<'src>),
    List(Box<TypeAnnotation<'src>>),
    NonNull(Box<TypeAnnotation<'src>>),
}

impl TypeAnnotation<'_> {
    /// The innermost named type (`[ID!]!` -> `ID`).
    pub fn innermost_name(&self) -> &str {
        match self {
            TypeAnnotation::Named(name) => name.as_str(),
            TypeAnnotation::List(inner) | TypeAnnotation::NonNull(inner) => {
                inner.innermost_name()
            },
        }
    }
}

// =========================================================
// Fragment definitions
// =========================================================

/// A named fragment definition: `fragment Name on Type { ... }`.
#[derive(Clone, Debug, PartialEq)]
pub struct FragmentDefinition<'src> {
    pub span: GraphQLSourceSpan,
    pub name: Name<'src>,
    pub type_condition: Name<'src>,
    pub directives: Vec<DirectiveAnnotation<'src>>,
    pub selection_set: SelectionSet<'src>,
}

// =========================================================
// Selection sets
// =========================================================

/// The fields and fragment spreads selected within braces `{ ... }`. Never
/// empty in a successfully parsed document.
#[derive(Clone, Debug, PartialEq)]
pub struct SelectionSet<'src> {
    pub span: GraphQLSourceSpan,
    pub selections: Vec<Selection<'src>>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Selection<'src> {
    Field(Field<'src>),
    FragmentSpread(FragmentSpread<'src>),
}

/// A field selection, optionally aliased, with arguments, directives, and a
/// nested selection set.
#[derive(Clone, Debug, PartialEq)]
pub struct Field<'src> {
    pub span: GraphQLSourceSpan,
    pub alias: Option<Name<'src>>,
    pub name: Name<'src>,
    pub arguments: Vec<Argument<'src>>,
    pub directives: Vec<DirectiveAnnotation<'src>>,
    pub selection_set: Option<SelectionSet<'src>>,
}

impl Field<'_> {
    /// The key this field is returned under: its alias if it has one,
    /// otherwise its name.
    pub fn response_key(&self) -> &str {
        self.alias.as_ref().unwrap_or(&self.name).as_str()
    }
}

/// `...FragmentName @directives`
#[derive(Clone, Debug, PartialEq)]
pub struct FragmentSpread<'src> {
    pub span: GraphQLSourceSpan,
    pub name: Name<'src>,
    pub directives: Vec<DirectiveAnnotation<'src>>,
}

// =========================================================
// Arguments, directives and values
// =========================================================

/// `name: value`
#[derive(Clone, Debug, PartialEq)]
pub struct Argument<'src> {
    pub span: GraphQLSourceSpan,
    pub name: Name<'src>,
    pub value: Value<'src>,
}

/// A directive applied to a field, spread, fragment or operation
/// (`@include(if: $flag)`).
#[derive(Clone, Debug, PartialEq)]
pub struct DirectiveAnnotation<'src> {
    pub span: GraphQLSourceSpan,
    pub name: Name<'src>,
    pub arguments: Vec<Argument<'src>>,
}

impl<'src> DirectiveAnnotation<'src> {
    /// Looks up an argument value by name.
    pub fn argument(&self, name: &str) -> Option<&Value<'src>> {
        self.arguments
            .iter()
            .find(|arg| arg.name == name)
            .map(|arg| &arg.value)
    }
}

/// A literal or variable value. List and object literals are not supported
/// by the parser.
#[derive(Clone, Debug, PartialEq)]
pub enum Value<'src> {
    /// `$name`; holds the name without the `$`.
    Variable(Name<'src>),
    Boolean(bool),
    Int(i64),
    Float(f64),
    /// The cooked string contents (quotes removed, escapes processed).
    String(String),
    Enum(Name<'src>),
    Null,
}

impl Value<'_> {
    /// A short description of the value's kind, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Variable(_) => "variable",
            Value::Boolean(_) => "boolean",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Enum(_) => "enum",
            Value::Null => "null",
        }
    }
}
