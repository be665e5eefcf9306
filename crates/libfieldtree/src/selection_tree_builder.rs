use crate::FragmentRegistry;
use crate::SelectionTree;
use crate::SelectionTreeError;
use crate::Variables;
use crate::directives;
use crate::fragment_registry::FragmentExpansionStack;
use indexmap::IndexMap;
use indexmap::IndexSet;
use libfieldtree_parser::GraphQLParseError;
use libfieldtree_parser::GraphQLParser;
use libfieldtree_parser::ast;
use std::borrow::Cow;
use std::collections::HashSet;

type Result<T> = std::result::Result<T, SelectionTreeError>;

/// Appended to the name of a field whose `@include`/`@skip` condition
/// excludes it.
pub const EXCLUDED_FIELD_SUFFIX: &str = "_FALSE";

/// How many selection sets may be open at once during a walk, counting the
/// operation's root set and every inlined fragment body.
pub const MAX_SELECTION_DEPTH: usize = 256;

/// Decides which name a field is recorded under.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum AliasPolicy {
    /// Always the declared field name; aliases are ignored, so aliased
    /// copies of a field merge with the unaliased one.
    #[default]
    IgnoreAliases,

    /// The alias when one is given, otherwise the declared field name.
    UseAliases,
}

impl AliasPolicy {
    pub fn effective_name<'a>(&self, field: &'a ast::Field<'_>) -> &'a str {
        match self {
            Self::IgnoreAliases => field.name.as_str(),
            Self::UseAliases => field.response_key(),
        }
    }
}

/// Builds [`SelectionTree`]s from operation documents.
///
/// ```
/// use libfieldtree::AliasPolicy;
/// use libfieldtree::SelectionTreeBuilder;
/// use libfieldtree::Variables;
///
/// let tree = SelectionTreeBuilder::new(AliasPolicy::UseAliases)
///     .build("{ search { filters } best: search { connection } }", &Variables::new())
///     .unwrap();
///
/// assert_eq!(tree.root(), ["search", "best"]);
/// assert_eq!(tree.children("best").unwrap(), ["connection"]);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct SelectionTreeBuilder {
    policy: AliasPolicy,
}

impl SelectionTreeBuilder {
    pub fn new(policy: AliasPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> AliasPolicy {
        self.policy
    }

    /// Parses `document` and builds the tree of its single operation.
    pub fn build(&self, document: &str, variables: &Variables) -> Result<SelectionTree> {
        let parse_result = GraphQLParser::new(document).parse_executable_document();
        if parse_result.has_errors() {
            log::debug!(
                "Document failed to parse with {} error(s).",
                parse_result.errors.len(),
            );
        }
        let parsed: std::result::Result<ast::Document<'_>, Vec<GraphQLParseError>> =
            parse_result.into();
        let document_ast = parsed.map_err(SelectionTreeError::Syntax)?;
        self.build_from_ast(&document_ast, variables)
    }

    /// Builds the tree of an already-parsed document's single operation.
    pub fn build_from_ast(
        &self,
        document: &ast::Document<'_>,
        variables: &Variables,
    ) -> Result<SelectionTree> {
        let operation = single_operation(document)?;
        let registry = FragmentRegistry::from_document(document)?;

        let mut walk = TreeWalk {
            policy: self.policy,
            variables,
            registry: &registry,
            expanding: FragmentExpansionStack::default(),
            expanded: HashSet::new(),
            depth: 0,
            paths: IndexMap::new(),
            num_spreads_inlined: 0,
        };
        walk.walk_selection_set(SelectionTree::ROOT_PATH, &operation.selection_set)?;

        log::debug!(
            "Built selection tree for {} `{}` with {} path(s) ({} fragment \
            spread(s) inlined, {:?}).",
            operation.operation_kind.as_str(),
            operation.name.as_ref().map_or("<anonymous>", |name| name.as_str()),
            walk.paths.len(),
            walk.num_spreads_inlined,
            self.policy,
        );

        Ok(SelectionTree::new(
            walk.paths
                .into_iter()
                .map(|(path, children)| (path, children.into_iter().collect()))
                .collect(),
        ))
    }
}

/// Builds the selection tree of `document`, recording every field under its
/// declared name and ignoring aliases.
///
/// ```
/// use libfieldtree::Variables;
///
/// let tree = libfieldtree::build_tree(
///     "{ search { filters } best: search { connection } }",
///     &Variables::new(),
/// )
/// .unwrap();
///
/// assert_eq!(tree.root(), ["search"]);
/// assert_eq!(tree.children("search").unwrap(), ["filters", "connection"]);
/// ```
pub fn build_tree(document: &str, variables: &Variables) -> Result<SelectionTree> {
    SelectionTreeBuilder::new(AliasPolicy::IgnoreAliases).build(document, variables)
}

/// Builds the selection tree of `document`, recording aliased fields under
/// their alias.
pub fn build_tree_using_aliases(
    document: &str,
    variables: &Variables,
) -> Result<SelectionTree> {
    SelectionTreeBuilder::new(AliasPolicy::UseAliases).build(document, variables)
}

fn single_operation<'doc, 'src>(
    document: &'doc ast::Document<'src>,
) -> Result<&'doc ast::OperationDefinition<'src>> {
    let mut operations = document.operations();
    match (operations.next(), operations.next()) {
        (Some(operation), None) => Ok(operation),
        (None, _) => Err(SelectionTreeError::MissingOperation),
        (Some(_), Some(_)) => Err(SelectionTreeError::MultipleOperations {
            count: document.operations().count(),
        }),
    }
}

/// The state of one depth-first walk over an operation.
struct TreeWalk<'a, 'doc, 'src> {
    policy: AliasPolicy,
    variables: &'a Variables,
    registry: &'a FragmentRegistry<'doc, 'src>,
    expanding: FragmentExpansionStack<'doc>,
    /// `(path, fragment)` pairs already inlined in full. Inlining one again
    /// at the same path adds nothing.
    expanded: HashSet<(String, &'doc str)>,
    depth: usize,
    paths: IndexMap<String, IndexSet<String>>,
    num_spreads_inlined: usize,
}

impl<'doc, 'src> TreeWalk<'_, 'doc, 'src> {
    fn walk_selection_set(
        &mut self,
        path: &str,
        selection_set: &'doc ast::SelectionSet<'src>,
    ) -> Result<()> {
        if self.depth >= MAX_SELECTION_DEPTH {
            return Err(SelectionTreeError::MaxDepthExceeded {
                limit: MAX_SELECTION_DEPTH,
            });
        }
        self.depth += 1;
        let result = self.walk_selections(path, selection_set);
        self.depth -= 1;
        result
    }

    fn walk_selections(
        &mut self,
        path: &str,
        selection_set: &'doc ast::SelectionSet<'src>,
    ) -> Result<()> {
        self.paths.entry(path.to_string()).or_default();

        for selection in &selection_set.selections {
            match selection {
                ast::Selection::Field(field) => self.walk_field(path, field)?,
                ast::Selection::FragmentSpread(spread) => self.inline_spread(path, spread)?,
            }
        }
        Ok(())
    }

    fn walk_field(&mut self, path: &str, field: &'doc ast::Field<'src>) -> Result<()> {
        let name = self.field_name(field);

        let children = self.paths.entry(path.to_string()).or_default();
        if !children.contains(&*name) {
            children.insert(name.to_string());
        }

        if let Some(nested) = &field.selection_set {
            let nested_path = if path.is_empty() {
                name.into_owned()
            } else {
                format!("{path}.{name}")
            };
            self.walk_selection_set(&nested_path, nested)?;
        }
        Ok(())
    }

    /// Splices the spread fragment's selections in at `path`.
    fn inline_spread(&mut self, path: &str, spread: &'doc ast::FragmentSpread<'src>) -> Result<()> {
        let fragment = self.registry.resolve(spread)?;
        let fragment_name = fragment.name.as_str();
        if self.expanded.contains(&(path.to_string(), fragment_name)) {
            return Ok(());
        }
        self.expanding.enter(fragment_name)?;
        log::trace!(
            "Inlining fragment `{}` at `{path}` (depth {}).",
            fragment_name,
            self.expanding.depth(),
        );
        self.num_spreads_inlined += 1;

        self.walk_selection_set(path, &fragment.selection_set)?;
        self.expanding.exit();
        self.expanded.insert((path.to_string(), fragment_name));
        Ok(())
    }

    /// An excluded field is always recorded under its suffixed declared
    /// name, whatever the alias policy.
    fn field_name(&self, field: &'doc ast::Field<'src>) -> Cow<'doc, str> {
        if directives::is_excluded(&field.directives, self.variables) {
            let name = field.name.as_str();
            log::trace!("Field `{name}` is excluded by its directives.");
            Cow::Owned(format!("{name}{EXCLUDED_FIELD_SUFFIX}"))
        } else {
            Cow::Borrowed(self.policy.effective_name(field))
        }
    }
}
