//! Evaluation of the `@include` and `@skip` conditions that decide whether a
//! field is marked as excluded in a selection tree.

use crate::Variables;
use libfieldtree_parser::ast;

pub const INCLUDE_DIRECTIVE: &str = "include";
pub const SKIP_DIRECTIVE: &str = "skip";
pub const CONDITION_ARGUMENT: &str = "if";

/// The outcome of resolving a directive's `if:` value.
///
/// `Other` covers everything that is not a definite boolean: unbound
/// variables, variables bound to non-booleans, and non-boolean literals.
/// A field whose conditions are all `True` or `Other` is included as-is.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Condition {
    True,
    False,
    Other,
}

impl Condition {
    /// Swaps `True` and `False`. `Other` stays `Other`.
    pub fn negate(self) -> Self {
        match self {
            Self::True => Self::False,
            Self::False => Self::True,
            Self::Other => Self::Other,
        }
    }
}

impl From<bool> for Condition {
    fn from(value: bool) -> Self {
        if value { Self::True } else { Self::False }
    }
}

/// Resolves a condition value against the supplied variables.
pub fn evaluate_condition(value: &ast::Value<'_>, variables: &Variables) -> Condition {
    match value {
        ast::Value::Boolean(literal) => Condition::from(*literal),
        ast::Value::Variable(name) => match variables.get_bool(name.as_str()) {
            Some(bound) => Condition::from(bound),
            None => {
                log::trace!(
                    "Variable `${}` is {}; treating its condition as inert.",
                    name.as_str(),
                    variables
                        .get(name.as_str())
                        .map_or("unbound", |v| v.kind_name()),
                );
                Condition::Other
            },
        },
        _ => Condition::Other,
    }
}

/// Whether a single directive asks for the field to be included.
///
/// `@include` maps its condition directly and `@skip` negates it. Every
/// other directive is inert and yields `Condition::Other`, as does a
/// condition directive without an `if:` argument.
pub fn evaluate_directive(
    directive: &ast::DirectiveAnnotation<'_>,
    variables: &Variables,
) -> Condition {
    let name = directive.name.as_str();
    if name != INCLUDE_DIRECTIVE && name != SKIP_DIRECTIVE {
        return Condition::Other;
    }

    let condition = directive
        .argument(CONDITION_ARGUMENT)
        .map_or(Condition::Other, |value| evaluate_condition(value, variables));

    if name == SKIP_DIRECTIVE {
        condition.negate()
    } else {
        condition
    }
}

/// Whether any directive in `directives` excludes the annotated field.
///
/// Exclusion wins over inclusion regardless of directive order, so
/// `@include(if: true) @skip(if: true)` excludes.
pub fn is_excluded(directives: &[ast::DirectiveAnnotation<'_>], variables: &Variables) -> bool {
    directives
        .iter()
        .any(|directive| evaluate_directive(directive, variables) == Condition::False)
}
