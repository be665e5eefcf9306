use crate::output_utils;
use crate::Cli;
use crate::CommandResult;
use crate::RunnableCommand;
use libfieldtree::FragmentRegistry;
use libfieldtree::SelectionTreeBuilder;
use libfieldtree::Variables;
use libfieldtree::parser::GraphQLParser;
use std::collections::HashSet;
use std::path::PathBuf;
use walkdir::WalkDir;

#[derive(Debug, clap::Args)]
pub(crate) struct CheckCmd {
    #[arg(
        default_values_t=[
            "graphql".to_string(),
            "gql".to_string(),
        ],
        help="Set of file extensions to filter to when searching for files \
             within a directory.",
        long,
        value_delimiter = ',',
    )]
    graphql_file_exts: Vec<String>,

    #[arg(
        help="Paths to one or more GraphQL documents or directories \
             containing GraphQL documents which need to be checked.",
        name="FILE_OR_DIR_PATHS",
        required=true,
    )]
    file_or_dir_paths: Vec<PathBuf>,
}

impl CheckCmd {
    pub(crate) fn graphql_file_exts(&self) -> &[String] {
        &self.graphql_file_exts
    }
}

/// Files found under the paths given on the command line.
#[derive(Debug, Default)]
pub(crate) struct DocumentPaths {
    pub file_paths: Vec<PathBuf>,
    pub num_skipped_files: usize,
    pub walk_errors: Vec<walkdir::Error>,
}

/// What a successfully checked document contained.
#[derive(Debug, PartialEq)]
pub(crate) struct DocumentSummary {
    pub num_paths: usize,
    pub num_fragments: usize,
}

#[inherent::inherent]
impl RunnableCommand for CheckCmd {
    pub async fn run(self, _cli: Cli) -> CommandResult {
        log::debug!(
            "Scanning {} input paths...",
            self.file_or_dir_paths.len(),
        );
        let DocumentPaths {
            file_paths,
            num_skipped_files,
            walk_errors,
        } = collect_document_paths(&self.file_or_dir_paths, self.graphql_file_exts());

        if !walk_errors.is_empty() {
            return CommandResult::stderr(format_args!(
                "{} Failed to scan input paths:\n{}",
                output_utils::RED_X,
                walk_errors.iter()
                    .map(|e| format!("  * {e}"))
                    .collect::<Vec<_>>()
                    .join("\n"),
            ));
        }

        log::debug!(
            "Found {} GraphQL documents to be checked.",
            file_paths.len(),
        );

        let mut tasks = tokio::task::JoinSet::new();
        for path in file_paths {
            tasks.spawn(async move {
                let outcome = match tokio::fs::read_to_string(&path).await {
                    Ok(source) => check_document(&source),
                    Err(e) => Err(vec![format!("Failed to read file: {e}")]),
                };
                (path, outcome)
            });
        }

        let mut num_documents = 0;
        let mut num_paths = 0;
        let mut num_fragments = 0;
        let mut failures: Vec<(PathBuf, Vec<String>)> = vec![];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((path, Ok(summary))) => {
                    log::trace!("Checked {path:?}: {summary:?}.");
                    num_documents += 1;
                    num_paths += summary.num_paths;
                    num_fragments += summary.num_fragments;
                },
                Ok((path, Err(errors))) => failures.push((path, errors)),
                Err(e) => failures.push((PathBuf::new(), vec![format!("Check task failed: {e}")])),
            }
        }

        if !failures.is_empty() {
            failures.sort_by(|(a, _), (b, _)| a.cmp(b));
            return CommandResult::stderr(format_args!(
                "{} {} of {} documents failed:\n{}",
                output_utils::RED_X,
                failures.len(),
                failures.len() + num_documents,
                failures.iter()
                    .map(|(path, errors)| format!("{}:\n{}", path.display(), errors.join("\n")))
                    .collect::<Vec<_>>()
                    .join("\n"),
            ));
        }

        CommandResult::stdout(format_args!(
            concat!(
                "{} All documents built successfully:\n",
                "  * Checked {} documents.\n",
                "  * Skipped {} non-graphql files.\n",
                "  * Validated {} fragment definitions.\n",
                "  * Built {} selection paths.",
            ),
            output_utils::GREEN_CHECK,
            num_documents,
            num_skipped_files,
            num_fragments,
            num_paths,
        ))
    }
}

/// Finds every file at or under `paths` whose extension is one of
/// `extensions` (with or without the leading dot).
///
/// A single file path given on its own is always checked, whatever its
/// extension.
pub(crate) fn collect_document_paths(
    paths: &[PathBuf],
    extensions: &[String],
) -> DocumentPaths {
    let extensions: HashSet<&str> = extensions
        .iter()
        .map(|ext| ext.trim_start_matches('.'))
        .collect();

    let mut found = DocumentPaths::default();
    for path in paths {
        for entry in WalkDir::new(path.as_path()).follow_links(true).sort_by_file_name() {
            match entry {
                Ok(entry) => {
                    let entry_path = entry.path();
                    if !entry.file_type().is_file() {
                        continue;
                    }
                    let matches_ext = entry_path
                        .extension()
                        .is_some_and(|ext| extensions.contains(&*ext.to_string_lossy()));
                    if matches_ext {
                        log::trace!("Found document at {entry_path:?}.");
                        found.file_paths.push(entry_path.to_path_buf());
                    } else {
                        log::trace!("Skipping non-graphql file: {entry_path:?}.");
                        found.num_skipped_files += 1;
                    }
                },

                Err(e) => {
                    log::trace!(
                        "Encountered an error while iterating recursive \
                        filesystem entities at/under {path:?}."
                    );
                    found.walk_errors.push(e);
                },
            }
        }
    }

    if found.file_paths.is_empty()
        && let [only_path] = paths
        && only_path.is_file() {
        log::warn!(
            "Proceeding to check {only_path:?} even though it doesn't match \
            any of the --graphql-file-exts.",
        );
        found.num_skipped_files = found.num_skipped_files.saturating_sub(1);
        found.file_paths.push(only_path.clone());
    }

    found
}

/// Parses `source`, validates all of its fragments and builds its selection
/// tree. Returns every problem found, formatted for display.
pub(crate) fn check_document(source: &str) -> Result<DocumentSummary, Vec<String>> {
    let parse_result = GraphQLParser::new(source).parse_executable_document();
    if parse_result.has_errors() {
        return Err(parse_result
            .errors
            .iter()
            .map(|e| e.format_detailed(Some(source)))
            .collect());
    }
    let Some(document) = parse_result.ast() else {
        return Err(vec!["error: document could not be parsed".to_string()]);
    };

    let registry = FragmentRegistry::from_document(document)
        .map_err(|e| vec![e.format_detailed(Some(source))])?;
    let fragment_errors = registry.validate();
    if !fragment_errors.is_empty() {
        return Err(fragment_errors
            .iter()
            .map(|e| e.format_detailed(Some(source)))
            .collect());
    }

    let tree = SelectionTreeBuilder::default()
        .build_from_ast(document, &Variables::new())
        .map_err(|e| vec![e.format_detailed(Some(source))])?;

    Ok(DocumentSummary {
        num_paths: tree.len(),
        num_fragments: registry.len(),
    })
}
