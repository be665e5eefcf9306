use indexmap::IndexMap;

/// A flattened view of the fields an operation requests.
///
/// Maps each dot-joined field path to the distinct names selected directly
/// beneath it, in the order they were first encountered. The root selection
/// set lives under the empty path `""`.
///
/// Equality compares entries as a map (entry order is ignored, child order
/// is not).
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(transparent)]
pub struct SelectionTree {
    paths: IndexMap<String, Vec<String>>,
}

impl SelectionTree {
    /// The path under which the operation's root selection set is recorded.
    pub const ROOT_PATH: &'static str = "";

    pub(crate) fn new(paths: IndexMap<String, Vec<String>>) -> Self {
        Self { paths }
    }

    /// The names selected directly beneath `path`, or `None` if nothing was
    /// selected there.
    pub fn children(&self, path: &str) -> Option<&[String]> {
        self.paths.get(path).map(Vec::as_slice)
    }

    /// The names selected at the operation's root.
    pub fn root(&self) -> &[String] {
        self.children(Self::ROOT_PATH).unwrap_or_default()
    }

    pub fn contains_path(&self, path: &str) -> bool {
        self.paths.contains_key(path)
    }

    /// All recorded paths, in first-encounter order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.paths.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.paths
            .iter()
            .map(|(path, children)| (path.as_str(), children.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn into_inner(self) -> IndexMap<String, Vec<String>> {
        self.paths
    }
}

impl<P, C> FromIterator<(P, C)> for SelectionTree
where
    P: Into<String>,
    C: IntoIterator,
    C::Item: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (P, C)>>(iter: I) -> Self {
        Self {
            paths: iter
                .into_iter()
                .map(|(path, children)| {
                    (path.into(), children.into_iter().map(Into::into).collect())
                })
                .collect(),
        }
    }
}

impl From<SelectionTree> for IndexMap<String, Vec<String>> {
    fn from(tree: SelectionTree) -> Self {
        tree.paths
    }
}

impl std::fmt::Display for SelectionTree {
    /// One `path: child, child` line per entry; the root path is shown as
    /// `<root>`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (idx, (path, children)) in self.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            let path = if path.is_empty() { "<root>" } else { path };
            write!(f, "{path}: {}", children.join(", "))?;
        }
        Ok(())
    }
}
