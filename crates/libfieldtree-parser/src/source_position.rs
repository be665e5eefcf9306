/// A position within a source document.
///
/// This is a pure data struct with no mutation methods. Lexers are responsible
/// for computing position values as they scan input.
///
/// # Indexing Convention
///
/// **All stored values are 0-based:**
/// - `line`: 0 = first line of the document
/// - `column`: character count within the current line (a multi-byte UTF-8
///   character counts once)
/// - `byte_offset`: byte offset within the whole document
///
/// The [`Display`](std::fmt::Display) impl renders the 1-based `line:column`
/// form that editors and diagnostics use.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct SourcePosition {
    line: usize,
    column: usize,
    byte_offset: usize,
}

impl SourcePosition {
    /// Create a new SourcePosition from 0-based components.
    pub fn new(line: usize, column: usize, byte_offset: usize) -> Self {
        Self {
            line,
            column,
            byte_offset,
        }
    }

    /// Returns the 0-based line number.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Returns the 0-based character column within the current line.
    pub fn column(&self) -> usize {
        self.column
    }

    /// Returns the 0-based byte offset from document start.
    pub fn byte_offset(&self) -> usize {
        self.byte_offset
    }
}

impl std::fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.column + 1)
    }
}
