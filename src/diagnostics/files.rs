use std::path::{Path, PathBuf};

/// Identifier for a compilation unit's source text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FileId(pub usize);

impl FileId {
    pub const UNKNOWN: Self = FileId(usize::MAX);
}

impl Default for FileId {
    fn default() -> Self {
        FileId::UNKNOWN
    }
}

/// Line/column position (1-based, columns counted in chars).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LineCol {
    pub line: usize,
    pub column: usize,
}

#[derive(Clone, Debug)]
pub struct SourceFile {
    pub id: FileId,
    pub path: PathBuf,
    pub source: String,
    line_starts: Vec<usize>,
}

impl SourceFile {
    #[must_use]
    pub fn new(id: FileId, path: PathBuf, source: String) -> Self {
        let line_starts = compute_line_starts(&source);
        Self {
            id,
            path,
            source,
            line_starts,
        }
    }

    #[must_use]
    pub fn line_col(&self, offset: usize) -> Option<LineCol> {
        if offset > self.source.len() {
            return None;
        }
        let index = match self.line_starts.binary_search(&offset) {
            Ok(idx) => idx,
            Err(idx) => idx.saturating_sub(1),
        };
        let line_start = *self.line_starts.get(index)?;
        let prefix = self.source.get(line_start..offset)?;
        Some(LineCol {
            line: index + 1,
            column: prefix.chars().count() + 1,
        })
    }

    /// Text of a 1-based line without its terminator.
    #[must_use]
    pub fn line(&self, line: usize) -> Option<&str> {
        let (start, end) = self.line_bounds(line)?;
        self.source
            .get(start..end)
            .map(|text| text.trim_end_matches(['\n', '\r']))
    }

    #[must_use]
    pub fn line_bounds(&self, line: usize) -> Option<(usize, usize)> {
        if line == 0 {
            return None;
        }
        let start = *self.line_starts.get(line - 1)?;
        let end = self
            .line_starts
            .get(line)
            .copied()
            .unwrap_or(self.source.len());
        Some((start, end))
    }

    #[must_use]
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

/// Source texts addressed by `FileId`, used when rendering diagnostics.
#[derive(Clone, Debug, Default)]
pub struct FileCache {
    files: Vec<SourceFile>,
}

impl FileCache {
    pub fn add_file(&mut self, path: impl Into<PathBuf>, source: impl Into<String>) -> FileId {
        let id = FileId(self.files.len());
        self.files
            .push(SourceFile::new(id, path.into(), source.into()));
        id
    }

    #[must_use]
    pub fn get(&self, file_id: FileId) -> Option<&SourceFile> {
        self.files.get(file_id.0)
    }

    #[must_use]
    pub fn path(&self, file_id: FileId) -> Option<&Path> {
        self.get(file_id).map(|file| file.path.as_path())
    }

    #[must_use]
    pub fn line_col(&self, file_id: FileId, offset: usize) -> Option<LineCol> {
        self.get(file_id).and_then(|file| file.line_col(offset))
    }
}

fn compute_line_starts(source: &str) -> Vec<usize> {
    let mut starts = vec![0];
    starts.extend(
        source
            .match_indices('\n')
            .map(|(idx, newline)| idx + newline.len()),
    );
    starts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_col_counts_chars_not_bytes() {
        let file = SourceFile::new(FileId(0), "a.bf".into(), "int é = 1;\nx".into());
        let eq = file.source.find('=').unwrap_or_default();
        assert_eq!(file.line_col(eq), Some(LineCol { line: 1, column: 7 }));
        let x = file.source.len() - 1;
        assert_eq!(file.line_col(x), Some(LineCol { line: 2, column: 1 }));
        assert_eq!(file.line(1), Some("int é = 1;"));
        assert_eq!(file.line_count(), 2);
    }

    #[test]
    fn cache_resolves_paths_by_id() {
        let mut cache = FileCache::default();
        let id = cache.add_file("Program.bf", "class A {}");
        assert_eq!(cache.path(id), Some(Path::new("Program.bf")));
        assert!(cache.get(FileId::UNKNOWN).is_none());
    }
}
