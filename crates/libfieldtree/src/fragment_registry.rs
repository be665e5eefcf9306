use crate::SelectionTreeError;
use libfieldtree_parser::ast;
use std::collections::HashMap;
use std::collections::HashSet;

/// The named fragments of one document, keyed by fragment name.
///
/// A registry borrows from the parsed [`ast::Document`] it was built from
/// and lives only as long as a single tree build; it is passed explicitly
/// through the walk rather than held anywhere global.
#[derive(Clone, Debug, Default)]
pub struct FragmentRegistry<'doc, 'src> {
    fragments: HashMap<&'doc str, &'doc ast::FragmentDefinition<'src>>,
}

impl<'doc, 'src> FragmentRegistry<'doc, 'src> {
    /// Collects every fragment definition in `document`. Fails on the first
    /// fragment name that is defined twice.
    pub fn from_document(
        document: &'doc ast::Document<'src>,
    ) -> Result<Self, SelectionTreeError> {
        let mut builder = FragmentRegistryBuilder::new();
        for fragment in document.fragments() {
            builder.add_fragment(fragment)?;
        }
        Ok(builder.build())
    }

    pub fn get(&self, name: &str) -> Option<&'doc ast::FragmentDefinition<'src>> {
        self.fragments.get(name).copied()
    }

    /// Looks up the fragment a spread refers to.
    pub fn resolve(
        &self,
        spread: &ast::FragmentSpread<'_>,
    ) -> Result<&'doc ast::FragmentDefinition<'src>, SelectionTreeError> {
        self.get(spread.name.as_str())
            .ok_or_else(|| SelectionTreeError::UndefinedFragment {
                fragment_name: spread.name.as_str().to_string(),
                position: spread.span.start_inclusive,
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fragments.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Checks every fragment, used or not, for spreads of undefined
    /// fragments and for spread cycles.
    ///
    /// Tree building only reports problems in fragments it reaches; this
    /// reports all of them at once. Each fragment is visited once, so long
    /// or heavily shared spread chains stay cheap. Cycles that are
    /// rotations of one another (`A → B → A` and `B → A → B`) are reported
    /// once.
    pub fn validate(&self) -> Vec<SelectionTreeError> {
        let mut errors = Vec::new();

        let mut names: Vec<&'doc str> = self.fragments.keys().copied().collect();
        names.sort_unstable();

        let mut visits = HashMap::new();
        let mut seen_normalized_cycles = HashSet::new();
        for &name in &names {
            if !visits.contains_key(name) {
                self.check_fragment_cycles(
                    name,
                    &mut visits,
                    &mut errors,
                    &mut seen_normalized_cycles,
                );
            }
        }

        for name in &names {
            if let Some(fragment) = self.get(name) {
                self.check_references(&fragment.selection_set, &mut errors);
            }
        }

        errors
    }

    /// Depth-first search from `root` over fragment spreads, using an
    /// explicit stack. A spread of a fragment that is still in progress
    /// closes a cycle.
    fn check_fragment_cycles(
        &self,
        root: &'doc str,
        visits: &mut HashMap<&'doc str, Visit>,
        errors: &mut Vec<SelectionTreeError>,
        seen_normalized: &mut HashSet<Vec<String>>,
    ) {
        let mut path = vec![root];
        let mut pending = vec![(self.spread_names(root), 0usize)];
        visits.insert(root, Visit::InProgress);

        loop {
            let Some((spreads, next_idx)) = pending.last_mut() else {
                break;
            };
            let Some(&spread) = spreads.get(*next_idx) else {
                pending.pop();
                if let Some(finished) = path.pop() {
                    visits.insert(finished, Visit::Done);
                }
                continue;
            };
            *next_idx += 1;

            match visits.get(spread).copied() {
                Some(Visit::InProgress) => {
                    let start = path.iter().position(|name| *name == spread).unwrap_or(0);
                    let mut cycle: Vec<String> =
                        path[start..].iter().map(|name| name.to_string()).collect();
                    cycle.push(spread.to_string());

                    if seen_normalized.insert(normalize_cycle(&cycle)) {
                        errors.push(SelectionTreeError::FragmentCycle { cycle_path: cycle });
                    }
                },
                Some(Visit::Done) => (),
                // Undefined fragments are reported by `check_references`.
                None if !self.contains(spread) => (),
                None => {
                    visits.insert(spread, Visit::InProgress);
                    path.push(spread);
                    pending.push((self.spread_names(spread), 0));
                },
            }
        }
    }

    /// The fragment names spread anywhere inside fragment `name`, in source
    /// order.
    fn spread_names(&self, name: &str) -> Vec<&'doc str> {
        let mut spreads = Vec::new();
        if let Some(fragment) = self.get(name) {
            collect_spread_names(&fragment.selection_set, &mut spreads);
        }
        spreads
    }

    fn check_references(
        &self,
        selection_set: &ast::SelectionSet<'_>,
        errors: &mut Vec<SelectionTreeError>,
    ) {
        for selection in &selection_set.selections {
            match selection {
                ast::Selection::FragmentSpread(spread) => {
                    if let Err(err) = self.resolve(spread) {
                        errors.push(err);
                    }
                },
                ast::Selection::Field(field) => {
                    if let Some(nested) = &field.selection_set {
                        self.check_references(nested, errors);
                    }
                },
            }
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum Visit {
    InProgress,
    Done,
}

fn collect_spread_names<'doc>(
    selection_set: &'doc ast::SelectionSet<'_>,
    spreads: &mut Vec<&'doc str>,
) {
    for selection in &selection_set.selections {
        match selection {
            ast::Selection::FragmentSpread(spread) => spreads.push(spread.name.as_str()),
            ast::Selection::Field(field) => {
                if let Some(nested) = &field.selection_set {
                    collect_spread_names(nested, spreads);
                }
            },
        }
    }
}

/// Incrementally collects fragment definitions, rejecting duplicate names.
#[derive(Debug, Default)]
pub struct FragmentRegistryBuilder<'doc, 'src> {
    fragments: HashMap<&'doc str, &'doc ast::FragmentDefinition<'src>>,
}

impl<'doc, 'src> FragmentRegistryBuilder<'doc, 'src> {
    pub fn new() -> Self {
        Self {
            fragments: HashMap::new(),
        }
    }

    /// Adds a fragment definition. Returns an error if a fragment with the
    /// same name was already added.
    pub fn add_fragment(
        &mut self,
        fragment: &'doc ast::FragmentDefinition<'src>,
    ) -> Result<(), SelectionTreeError> {
        let name = fragment.name.as_str();
        if let Some(existing) = self.fragments.get(name) {
            return Err(SelectionTreeError::DuplicateFragment {
                fragment_name: name.to_string(),
                first_position: existing.span.start_inclusive,
                second_position: fragment.span.start_inclusive,
            });
        }

        self.fragments.insert(name, fragment);
        Ok(())
    }

    pub fn build(self) -> FragmentRegistry<'doc, 'src> {
        FragmentRegistry {
            fragments: self.fragments,
        }
    }
}

/// The fragments currently being inlined, outermost first.
///
/// Pushing a fragment that is already on the stack means the spreads loop
/// back on themselves.
#[derive(Debug, Default)]
pub(crate) struct FragmentExpansionStack<'doc> {
    expanding: Vec<&'doc str>,
}

impl<'doc> FragmentExpansionStack<'doc> {
    pub(crate) fn enter(&mut self, fragment_name: &'doc str) -> Result<(), SelectionTreeError> {
        if let Some(start) = self.expanding.iter().position(|name| *name == fragment_name) {
            let mut cycle_path: Vec<String> = self.expanding[start..]
                .iter()
                .map(|name| name.to_string())
                .collect();
            cycle_path.push(fragment_name.to_string());
            return Err(SelectionTreeError::FragmentCycle { cycle_path });
        }
        self.expanding.push(fragment_name);
        Ok(())
    }

    pub(crate) fn exit(&mut self) {
        self.expanding.pop();
    }

    pub(crate) fn depth(&self) -> usize {
        self.expanding.len()
    }
}

/// Rotates a cycle (`[B, C, A, B]`) so that it starts at its
/// lexicographically smallest name (`[A, B, C, A]`).
fn normalize_cycle(cycle: &[String]) -> Vec<String> {
    let Some((_, without_repeat)) = cycle.split_last() else {
        return Vec::new();
    };

    let min_idx = without_repeat
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.cmp(b))
        .map(|(idx, _)| idx)
        .unwrap_or(0);

    let mut normalized = Vec::with_capacity(cycle.len());
    normalized.extend_from_slice(&without_repeat[min_idx..]);
    normalized.extend_from_slice(&without_repeat[..min_idx]);
    if let Some(first) = normalized.first().cloned() {
        normalized.push(first);
    }
    normalized
}
