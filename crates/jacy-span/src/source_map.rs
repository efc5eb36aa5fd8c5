//! Session-owned storage of source file contents.
//!
//! The map hands out a dense [`FileId`] per file and answers all
//! span-to-text and span-to-line/column questions downstream stages
//! ask. No component ever holds a raw pointer into source text; spans
//! go through here by `FileId`.

use std::path::{Path, PathBuf};

use crate::span::Span;

/// Dense id of a registered source file.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileId(u32);

impl FileId {
    /// Sentinel used by [`Span::DUMMY`]; never registered in a map.
    pub const DUMMY: FileId = FileId(u32::MAX);

    pub fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Debug for FileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FileId({})", self.0)
    }
}

impl std::fmt::Display for FileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Errors for queries about unknown files or out-of-range positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceMapError {
    NoSuchFile(FileId),
}

impl std::fmt::Display for SourceMapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceMapError::NoSuchFile(id) => write!(f, "no source file with id {id}"),
        }
    }
}

impl std::error::Error for SourceMapError {}

/// One registered file: path, contents and a line-start table.
#[derive(Debug, Clone)]
pub struct SourceFile {
    path: PathBuf,
    src: String,
    /// Byte offset of the first character of each line.
    line_starts: Vec<u32>,
}

impl SourceFile {
    fn new(path: PathBuf, src: String) -> Self {
        let mut line_starts = vec![0u32];
        for (offset, byte) in src.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push(offset as u32 + 1);
            }
        }
        Self {
            path,
            src,
            line_starts,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn src(&self) -> &str {
        &self.src
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// 0-based line index containing `pos`.
    fn line_index(&self, pos: u32) -> usize {
        match self.line_starts.binary_search(&pos) {
            Ok(exact) => exact,
            Err(insert) => insert - 1,
        }
    }

    /// The full text of a 0-based line, without the trailing newline.
    pub fn line(&self, index: usize) -> Option<&str> {
        let start = *self.line_starts.get(index)? as usize;
        let end = self
            .line_starts
            .get(index + 1)
            .map(|next| *next as usize - 1)
            .unwrap_or(self.src.len());
        Some(&self.src[start..end])
    }

    /// Byte offset of the start of a 0-based line.
    pub fn line_start(&self, index: usize) -> Option<u32> {
        self.line_starts.get(index).copied()
    }
}

/// All sources of one compilation session.
#[derive(Debug, Default)]
pub struct SourceMap {
    files: Vec<SourceFile>,
}

impl SourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a file and return its id.
    pub fn add_file(&mut self, path: impl Into<PathBuf>, src: impl Into<String>) -> FileId {
        let id = FileId(self.files.len() as u32);
        self.files.push(SourceFile::new(path.into(), src.into()));
        id
    }

    pub fn file(&self, id: FileId) -> Result<&SourceFile, SourceMapError> {
        self.files
            .get(id.as_usize())
            .ok_or(SourceMapError::NoSuchFile(id))
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    pub fn files(&self) -> impl Iterator<Item = (FileId, &SourceFile)> {
        self.files
            .iter()
            .enumerate()
            .map(|(i, f)| (FileId(i as u32), f))
    }

    /// The exact source text a span covers.
    pub fn slice(&self, span: Span) -> Result<&str, SourceMapError> {
        let file = self.file(span.file)?;
        let lo = span.pos as usize;
        let hi = (span.hi() as usize).min(file.src.len());
        Ok(&file.src[lo.min(file.src.len())..hi])
    }

    /// 1-based `(line, column)` of a byte position.
    pub fn line_col(&self, id: FileId, pos: u32) -> Result<(u32, u32), SourceMapError> {
        let file = self.file(id)?;
        let line = file.line_index(pos);
        let col = pos - file.line_starts[line];
        Ok((line as u32 + 1, col + 1))
    }

    pub fn line_count(&self, id: FileId) -> Result<usize, SourceMapError> {
        Ok(self.file(id)?.line_count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn map_with(src: &str) -> (SourceMap, FileId) {
        let mut map = SourceMap::new();
        let id = map.add_file("test.jc", src);
        (map, id)
    }

    #[test]
    fn slice_returns_exact_text() {
        let (map, id) = map_with("fn main() {}\n");
        let span = Span::from_bounds(3, 7, id);
        assert_eq!(map.slice(span).unwrap(), "main");
    }

    #[test]
    fn line_col_is_one_based() {
        let (map, id) = map_with("a\nbc\ndef\n");
        assert_eq!(map.line_col(id, 0).unwrap(), (1, 1));
        assert_eq!(map.line_col(id, 2).unwrap(), (2, 1));
        assert_eq!(map.line_col(id, 3).unwrap(), (2, 2));
        assert_eq!(map.line_col(id, 7).unwrap(), (3, 3));
    }

    #[test]
    fn line_count_counts_the_trailing_line() {
        let (map, id) = map_with("a\nb");
        assert_eq!(map.line_count(id).unwrap(), 2);
        let (map, id) = map_with("");
        assert_eq!(map.line_count(id).unwrap(), 1);
    }

    #[test]
    fn unknown_file_is_an_error() {
        let map = SourceMap::new();
        let missing = FileId::new(7);
        assert_eq!(
            map.line_count(missing),
            Err(SourceMapError::NoSuchFile(missing))
        );
    }

    #[test]
    fn line_text_lookup() {
        let (map, id) = map_with("one\ntwo\nthree");
        let file = map.file(id).unwrap();
        assert_eq!(file.line(0), Some("one"));
        assert_eq!(file.line(2), Some("three"));
        assert_eq!(file.line(3), None);
    }
}
