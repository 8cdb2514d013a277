//! Front-matter conversion library.
//!
//! Rewrites colon-style metadata blocks (`key: value` between `---` lines) into
//! assignment-style blocks (`key = "value"` between `+++` lines), one document at a time.
//! The transform is pure; discovery, storage, and the run driver wrap it for the CLI.

pub mod core {
    use std::ffi::OsStr;

    /* ----------------------------- Convention ----------------------------- */

    pub const DEFAULT_SOURCE_MARKER: &str = "---";
    pub const DEFAULT_TARGET_MARKER: &str = "+++";
    pub const DEFAULT_EXTENSION: &str = "markdown";

    /// Which marker opens/closes a block in the input, which marker replaces it,
    /// and which document suffix is picked up during discovery.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct Convention {
        pub source_marker: String,
        pub target_marker: String,
        /// File suffix without the leading dot.
        pub extension: String,
    }

    impl Default for Convention {
        fn default() -> Self {
            Self {
                source_marker: DEFAULT_SOURCE_MARKER.to_string(),
                target_marker: DEFAULT_TARGET_MARKER.to_string(),
                extension: DEFAULT_EXTENSION.to_string(),
            }
        }
    }

    impl Convention {
        pub fn new(
            source_marker: impl Into<String>,
            target_marker: impl Into<String>,
            extension: impl Into<String>,
        ) -> Result<Self, DomainError> {
            let convention = Self {
                source_marker: source_marker.into(),
                target_marker: target_marker.into(),
                extension: extension.into(),
            };
            convention.validate()?;
            Ok(convention)
        }

        /// Lines are compared after trailing whitespace is stripped, so a marker
        /// with surrounding whitespace or a line break could never match.
        pub fn validate(&self) -> Result<(), DomainError> {
            for marker in [&self.source_marker, &self.target_marker] {
                if marker.is_empty() {
                    return Err(DomainError::EmptyMarker);
                }
                if marker.trim() != marker.as_str() || marker.contains(['\n', '\r']) {
                    return Err(DomainError::InvalidMarker(marker.clone()));
                }
            }
            if self.extension.is_empty() || self.extension.starts_with('.') {
                return Err(DomainError::InvalidExtension(self.extension.clone()));
            }
            Ok(())
        }

        pub fn is_source_marker(&self, line: &str) -> bool {
            line == self.source_marker
        }

        /// True when `name` ends with `.<extension>`. Compared on the raw bytes so
        /// names that are not valid UTF-8 still match.
        pub fn matches_file_name(&self, name: impl AsRef<OsStr>) -> bool {
            name.as_ref()
                .as_encoded_bytes()
                .strip_suffix(self.extension.as_bytes())
                .is_some_and(|stem| stem.ends_with(b"."))
        }
    }

    /* ------------------------------- Entries ------------------------------- */

    /// One converted `key = "value"` pair. The key is kept exactly as written
    /// before the first colon; the value is never escaped.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct Entry {
        pub key: String,
        pub value: String,
    }

    impl Entry {
        pub fn render(&self) -> String {
            format!("{} = \"{}\"", self.key, self.value)
        }
    }

    /* ----------------------------- Block state ----------------------------- */

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub enum BlockState {
        #[default]
        Outside,
        /// `opened_at` is the 1-based line number of the opening marker.
        Inside { opened_at: usize },
    }

    impl BlockState {
        pub fn toggle(self, line: usize) -> Self {
            match self {
                BlockState::Outside => BlockState::Inside { opened_at: line },
                BlockState::Inside { .. } => BlockState::Outside,
            }
        }

        pub fn is_inside(self) -> bool {
            matches!(self, BlockState::Inside { .. })
        }
    }

    /// What to do when a document ends inside a metadata block.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub enum UnbalancedPolicy {
        #[default]
        Reject,
        /// Log and emit the output as-is; the block structure is never repaired.
        Warn,
    }

    /* ---------------------------- Errors (domain) ---------------------------- */

    #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
    pub enum DomainError {
        #[error("block markers must not be empty")]
        EmptyMarker,
        #[error("block marker {0:?} must be a single line without surrounding whitespace")]
        InvalidMarker(String),
        #[error("extension {0:?} must be non-empty and given without a leading dot")]
        InvalidExtension(String),
    }

    #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
    pub enum ConvertError {
        #[error("line {line}: metadata line has no `:` separator: {content:?}")]
        MalformedEntry { line: usize, content: String },
        #[error("metadata block opened on line {opened_at} is never closed")]
        UnbalancedMarkers { opened_at: usize },
    }

}

pub mod parser {
    //! Line splitting, plus nom parsers for the pieces of a colon-style metadata line.

    use nom::{
        IResult,
        bytes::complete::take_till,
        character::complete::char,
        combinator::{all_consuming, rest},
        sequence::separated_pair,
    };

    type PResult<'a, T> = IResult<&'a str, T>;

    /// Split a line on its first colon. The key is returned verbatim and the
    /// value untrimmed; `None` when the line has no colon at all.
    pub fn split_entry(line: &str) -> Option<(&str, &str)> {
        key_value(line).ok().map(|(_, pair)| pair)
    }

    /// Strip exactly one pair of enclosing double quotes. A lone `"` is left alone.
    pub fn unquote(value: &str) -> &str {
        value
            .strip_prefix('"')
            .and_then(|inner| inner.strip_suffix('"'))
            .unwrap_or(value)
    }

    /// Split a document into lines ending in `\n`, `\r\n`, or a lone `\r`. A
    /// terminator at the very end does not start another line.
    pub fn split_lines(input: &str) -> DocumentLines<'_> {
        DocumentLines { rest: input }
    }

    pub struct DocumentLines<'a> {
        rest: &'a str,
    }

    impl<'a> Iterator for DocumentLines<'a> {
        type Item = &'a str;

        fn next(&mut self) -> Option<&'a str> {
            if self.rest.is_empty() {
                return None;
            }
            let Some(end) = self.rest.find(['\n', '\r']) else {
                return Some(std::mem::take(&mut self.rest));
            };
            let line = &self.rest[..end];
            let width = if self.rest[end..].starts_with("\r\n") { 2 } else { 1 };
            self.rest = &self.rest[end + width..];
            Some(line)
        }
    }

    /// Split `<date> <time>` on a single space. Either side may be empty, but
    /// the value must contain exactly one space.
    pub fn split_date_time(value: &str) -> Option<(&str, &str)> {
        date_time(value).ok().map(|(_, pair)| pair)
    }

    fn key_value(i: &str) -> PResult<'_, (&str, &str)> {
        separated_pair(take_till(|c: char| c == ':'), char(':'), rest)(i)
    }

    fn date_time(i: &str) -> PResult<'_, (&str, &str)> {
        all_consuming(separated_pair(
            take_till(is_space),
            char(' '),
            take_till(is_space),
        ))(i)
    }

    fn is_space(c: char) -> bool {
        c == ' '
    }

}

pub mod transform {
    //! The metadata block transformer.
    //!
    //! Each input line maps to exactly one output line. A line equal to the source
    //! marker is replaced by the target marker and flips the block state; inside a
    //! block every line must be a `key: value` entry, outside it lines pass through
    //! with trailing whitespace removed.

    use super::core::{BlockState, Convention, ConvertError, Entry, UnbalancedPolicy};
    use super::parser::{split_date_time, split_entry, split_lines, unquote};
    use chrono::NaiveDateTime;
    use tracing::{debug, warn};

    const DATE_KEY: &str = "date";
    const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

    /// Replacement text for one document plus what the transform saw on the way.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct Conversion {
        /// Output lines joined with `\n`, no trailing newline.
        pub text: String,
        pub lines: usize,
        /// Number of blocks opened.
        pub blocks: usize,
        pub entries: usize,
        /// Opening line of a block left open at end of input (tolerated only under
        /// [`UnbalancedPolicy::Warn`]).
        pub unclosed_block: Option<usize>,
        pub changed: bool,
    }

    struct Fold {
        out: Vec<String>,
        state: BlockState,
        blocks: usize,
        entries: usize,
    }

    pub fn convert_str(
        input: &str,
        convention: &Convention,
        unbalanced: UnbalancedPolicy,
    ) -> Result<Conversion, ConvertError> {
        let init = Fold {
            out: Vec::new(),
            state: BlockState::Outside,
            blocks: 0,
            entries: 0,
        };

        let folded = split_lines(input).enumerate().try_fold(
            init,
            |mut acc: Fold, (idx, raw): (usize, &str)| -> Result<Fold, ConvertError> {
                let number = idx + 1;
                let line = raw.trim_end();

                if convention.is_source_marker(line) {
                    acc.out.push(convention.target_marker.clone());
                    acc.state = acc.state.toggle(number);
                    if acc.state.is_inside() {
                        acc.blocks += 1;
                    }
                    return Ok(acc);
                }

                match acc.state {
                    BlockState::Inside { .. } => {
                        let entry = metadata_entry(number, line)?;
                        acc.out.push(entry.render());
                        acc.entries += 1;
                    }
                    BlockState::Outside => acc.out.push(line.to_string()),
                }
                Ok(acc)
            },
        )?;

        let unclosed_block = match folded.state {
            BlockState::Outside => None,
            BlockState::Inside { opened_at } => match unbalanced {
                UnbalancedPolicy::Reject => {
                    return Err(ConvertError::UnbalancedMarkers { opened_at });
                }
                UnbalancedPolicy::Warn => {
                    warn!(
                        opened_at,
                        "metadata block is never closed; trailing lines were converted as entries"
                    );
                    Some(opened_at)
                }
            },
        };

        let lines = folded.out.len();
        let text = folded.out.join("\n");
        let changed = text != input;

        Ok(Conversion {
            text,
            lines,
            blocks: folded.blocks,
            entries: folded.entries,
            unclosed_block,
            changed,
        })
    }

    /// Parse one line found inside a block. `number` is only used for diagnostics.
    pub fn metadata_entry(number: usize, line: &str) -> Result<Entry, ConvertError> {
        let (key, value) = split_entry(line).ok_or_else(|| ConvertError::MalformedEntry {
            line: number,
            content: line.to_string(),
        })?;

        let value = unquote(value.trim());
        let value = if key == DATE_KEY {
            normalize_date(number, value)
        } else {
            value.to_string()
        };

        Ok(Entry {
            key: key.to_string(),
            value,
        })
    }

    // `2012-09-09 23:11` -> `2012-09-09T23:11:00`; any other shape is kept.
    fn normalize_date(number: usize, value: &str) -> String {
        let Some((date, time)) = split_date_time(value) else {
            debug!(line = number, value, "date is not `<date> <time>`; left unchanged");
            return value.to_string();
        };

        let stamp = format!("{date}T{time}:00");
        if NaiveDateTime::parse_from_str(&stamp, TIMESTAMP_FORMAT).is_err() {
            warn!(line = number, value = %stamp, "date entry is not a valid timestamp");
        }
        stamp
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn convert(input: &str) -> Result<Conversion, ConvertError> {
            convert_str(input, &Convention::default(), UnbalancedPolicy::Reject)
        }

        #[test]
        fn markers_toggle_and_entries_are_rewritten() {
            let input = "---\ntitle: \"Hello\"\n---\nBody text\n";
            let out = convert(input).expect("convert");
            assert_eq!(out.text, "+++\ntitle = \"Hello\"\n+++\nBody text");
            assert_eq!(out.lines, 4);
            assert_eq!(out.blocks, 1);
            assert_eq!(out.entries, 1);
            assert_eq!(out.unclosed_block, None);
            assert!(out.changed);
        }

        #[test]
        fn unquoted_and_quoted_values_render_the_same() {
            let out = convert("---\na: hello\nb: \"hello\"\nc:   spaced out  \n---").expect("convert");
            assert_eq!(
                out.text,
                "+++\na = \"hello\"\nb = \"hello\"\nc = \"spaced out\"\n+++"
            );
        }

        #[test]
        fn value_keeps_everything_after_first_colon() {
            let out = convert("---\nlink: http://example.com/a:b\n---").expect("convert");
            assert_eq!(out.text, "+++\nlink = \"http://example.com/a:b\"\n+++");
        }

        #[test]
        fn date_with_time_becomes_timestamp() {
            let out = convert("---\ndate: \"2012-09-09 23:11\"\n---").expect("convert");
            assert_eq!(out.text, "+++\ndate = \"2012-09-09T23:11:00\"\n+++");
        }

        #[test]
        fn date_without_single_space_is_left_alone() {
            let out = convert("---\ndate: \"2012-09-09\"\n---").expect("convert");
            assert_eq!(out.text, "+++\ndate = \"2012-09-09\"\n+++");

            let out = convert("---\ndate: 2012-09-09 23:11 +0100\n---").expect("convert");
            assert_eq!(out.text, "+++\ndate = \"2012-09-09 23:11 +0100\"\n+++");
        }

        #[test]
        fn only_the_exact_date_key_is_reformatted() {
            let out = convert("---\nupdated: 2012-09-09 23:11\nDate: 2012-09-09 23:11\n---")
                .expect("convert");
            assert_eq!(
                out.text,
                "+++\nupdated = \"2012-09-09 23:11\"\nDate = \"2012-09-09 23:11\"\n+++"
            );
        }

        #[test]
        fn malformed_line_inside_block_fails_closed() {
            let err = convert("---\ntitle: ok\nnotakeyvalue\n---\n").unwrap_err();
            assert_eq!(
                err,
                ConvertError::MalformedEntry {
                    line: 3,
                    content: "notakeyvalue".into(),
                }
            );
            assert!(err.to_string().contains("line 3"));
        }

        #[test]
        fn blank_line_inside_block_is_malformed() {
            let err = convert("---\n\n---").unwrap_err();
            assert!(matches!(err, ConvertError::MalformedEntry { line: 2, .. }));
        }

        #[test]
        fn lines_outside_blocks_pass_through_minus_trailing_whitespace() {
            let input = "  indented   \n# Heading: with colon\t\nplain";
            let out = convert(input).expect("convert");
            assert_eq!(out.text, "  indented\n# Heading: with colon\nplain");
            assert_eq!(out.entries, 0);
        }

        #[test]
        fn marker_with_trailing_whitespace_still_toggles() {
            let out = convert("---  \ntitle: x\n---\t").expect("convert");
            assert_eq!(out.text, "+++\ntitle = \"x\"\n+++");
        }

        #[test]
        fn line_count_is_preserved() {
            for input in [
                "---\r\ntitle: x\r\n---\r\nbody\r\n",
                "a\n\n\n",
                "---\ntitle: x\n---\n\n\nbody",
                "no newline at all",
            ] {
                let out = convert(input).expect("convert");
                assert_eq!(out.lines, split_lines(input).count(), "input {input:?}");
                assert_eq!(out.text.split('\n').count(), out.lines, "input {input:?}");
            }
        }

        #[test]
        fn lone_carriage_returns_end_lines() {
            let out = convert("---\rtitle: x\r---\rBody\r").expect("convert");
            assert_eq!(out.text, "+++\ntitle = \"x\"\n+++\nBody");
            assert_eq!(out.lines, 4);
            assert_eq!(out.blocks, 1);
        }

        #[test]
        fn empty_document_stays_empty() {
            let out = convert("").expect("convert");
            assert_eq!(out.text, "");
            assert_eq!(out.lines, 0);
            assert!(!out.changed);
        }

        #[test]
        fn converted_output_is_a_fixed_point() {
            let input = "---\ntitle: \"Hello\"\ndate: 2012-09-09 23:11\n---\n\nBody: text\n";
            let first = convert(input).expect("first pass");
            let second = convert(&first.text).expect("second pass");
            assert_eq!(second.text, first.text);
            assert!(!second.changed);
            assert_eq!(second.blocks, 0);
        }

        #[test]
        fn every_marker_pair_opens_a_block() {
            let out = convert("---\na: 1\n---\ntext\n---\nb: 2\n---").expect("convert");
            assert_eq!(
                out.text,
                "+++\na = \"1\"\n+++\ntext\n+++\nb = \"2\"\n+++"
            );
            assert_eq!(out.blocks, 2);
            assert_eq!(out.entries, 2);
        }

        #[test]
        fn unbalanced_markers_are_rejected_by_default() {
            let err = convert("intro\n---\ntitle: x\n").unwrap_err();
            assert_eq!(err, ConvertError::UnbalancedMarkers { opened_at: 2 });
        }

        #[test]
        fn unbalanced_markers_pass_through_when_tolerated() {
            let out = convert_str(
                "---\ntitle: x\n",
                &Convention::default(),
                UnbalancedPolicy::Warn,
            )
            .expect("convert");
            assert_eq!(out.text, "+++\ntitle = \"x\"");
            assert_eq!(out.unclosed_block, Some(1));
        }

        #[test]
        fn custom_convention_is_honoured() {
            let convention = Convention::new("~~~", "===", "md").expect("convention");
            let out = convert_str(
                "~~~\nk: v\n~~~\n---",
                &convention,
                UnbalancedPolicy::Reject,
            )
            .expect("convert");
            assert_eq!(out.text, "===\nk = \"v\"\n===\n---");
        }
    }
}

pub mod storage {
    use anyhow::{Context, Result};
    use std::{fs, path::Path};

    /// Whole-document reads and overwrites, kept apart from the transform.
    pub trait DocumentStore {
        fn read_document(&self, path: &Path) -> Result<String>;

        /// Replace the document's content entirely.
        fn write_document(&self, path: &Path, text: &str) -> Result<()>;
    }

    /// Plain filesystem store: no temporary file, no rename, no backup.
    pub struct FsDocumentStore;

    impl DocumentStore for FsDocumentStore {
        fn read_document(&self, path: &Path) -> Result<String> {
            fs::read_to_string(path).with_context(|| format!("reading {:?}", path))
        }

        fn write_document(&self, path: &Path, text: &str) -> Result<()> {
            fs::write(path, text.as_bytes()).with_context(|| format!("writing {:?}", path))
        }
    }
}

pub mod workspace {
    //! Document discovery under one or more roots.

    use super::core::Convention;
    use anyhow::{Context, Result, bail};
    use std::{
        collections::BTreeSet,
        fs,
        path::{Path, PathBuf},
    };
    use tracing::debug;

    /// Expand `roots` into the sorted, de-duplicated list of canonical document
    /// paths. Directories are walked recursively (symlinks skipped); a file root
    /// must carry the convention's extension.
    pub fn collect_documents(roots: &[PathBuf], convention: &Convention) -> Result<Vec<PathBuf>> {
        let mut out = BTreeSet::new();
        for root in roots {
            let canonical =
                fs::canonicalize(root).with_context(|| format!("resolving path {:?}", root))?;
            let meta = fs::metadata(&canonical)
                .with_context(|| format!("reading metadata for {:?}", canonical))?;
            if meta.is_dir() {
                debug!(dir = ?canonical, "scanning directory");
                let mut visited = BTreeSet::new();
                visit_dir(&canonical, convention, &mut out, &mut visited)?;
            } else if meta.is_file() {
                if !has_extension(&canonical, convention) {
                    bail!("{:?} is not a .{} file", canonical, convention.extension);
                }
                debug!(path = ?canonical, "adding file");
                out.insert(canonical);
            }
        }
        Ok(out.into_iter().collect())
    }

    fn visit_dir(
        path: &Path,
        convention: &Convention,
        out: &mut BTreeSet<PathBuf>,
        visited: &mut BTreeSet<PathBuf>,
    ) -> Result<()> {
        let canonical =
            fs::canonicalize(path).with_context(|| format!("resolving path {:?}", path))?;
        if !visited.insert(canonical.clone()) {
            return Ok(());
        }

        let metadata = fs::metadata(&canonical)
            .with_context(|| format!("reading metadata for {:?}", canonical))?;
        if metadata.is_dir() {
            for entry in
                fs::read_dir(&canonical).with_context(|| format!("listing {:?}", canonical))?
            {
                let entry = entry?;
                if entry.file_type()?.is_symlink() {
                    debug!(path = ?entry.path(), "skipping symlink");
                    continue;
                }
                visit_dir(&entry.path(), convention, out, visited)?;
            }
        } else if metadata.is_file() && has_extension(&canonical, convention) {
            debug!(path = ?canonical, "found document");
            out.insert(canonical);
        }
        Ok(())
    }

    fn has_extension(path: &Path, convention: &Convention) -> bool {
        path.file_name()
            .is_some_and(|name| convention.matches_file_name(name))
    }

}

pub mod runner {
    //! Drives a conversion run: discover, then read, transform, and overwrite each
    //! document in turn.

    use super::core::{Convention, UnbalancedPolicy};
    use super::storage::DocumentStore;
    use super::transform::convert_str;
    use super::workspace::collect_documents;
    use anyhow::{Context, Result};
    use indexmap::IndexMap;
    use serde::{Serialize, Serializer};
    use std::path::{Path, PathBuf};
    use tracing::{debug, warn};

    /// Whether a failing document stops the run.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub enum ErrorPolicy {
        #[default]
        Abort,
        Continue,
    }

    #[derive(Debug, Clone, Default, PartialEq, Eq)]
    pub struct RunOptions {
        pub convention: Convention,
        pub unbalanced: UnbalancedPolicy,
        pub on_error: ErrorPolicy,
        /// Compute everything but never write.
        pub dry_run: bool,
    }

    #[serde_with::skip_serializing_none]
    #[derive(Debug, Clone, PartialEq, Eq, Serialize)]
    pub struct ConvertedFile {
        pub lines: usize,
        pub blocks: usize,
        pub entries: usize,
        pub changed: bool,
        pub written: bool,
        pub unclosed_block: Option<usize>,
    }

    #[derive(Debug, Clone, PartialEq, Eq, Serialize)]
    #[serde(tag = "status", rename_all = "snake_case")]
    pub enum FileOutcome {
        Converted(ConvertedFile),
        Failed { error: String },
    }

    /// Per-document outcomes in visit order.
    #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
    pub struct RunReport {
        #[serde(serialize_with = "serialize_lossy_paths")]
        pub files: IndexMap<PathBuf, FileOutcome>,
    }

    // Document names need not be UTF-8; JSON keys must be.
    fn serialize_lossy_paths<S: Serializer>(
        files: &IndexMap<PathBuf, FileOutcome>,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(
            files
                .iter()
                .map(|(path, outcome)| (path.to_string_lossy(), outcome)),
        )
    }

    impl RunReport {
        pub fn is_empty(&self) -> bool {
            self.files.is_empty()
        }

        pub fn failures(&self) -> usize {
            self.files
                .values()
                .filter(|outcome| matches!(outcome, FileOutcome::Failed { .. }))
                .count()
        }

        pub fn changed(&self) -> impl Iterator<Item = &Path> {
            self.files.iter().filter_map(|(path, outcome)| match outcome {
                FileOutcome::Converted(file) if file.changed => Some(path.as_path()),
                _ => None,
            })
        }
    }

    /// Convert a single document. The write only happens once the complete
    /// replacement text exists.
    pub fn convert_document(
        store: &dyn DocumentStore,
        path: &Path,
        options: &RunOptions,
    ) -> Result<ConvertedFile> {
        let text = store.read_document(path)?;
        let conversion = convert_str(&text, &options.convention, options.unbalanced)
            .with_context(|| format!("converting {:?}", path))?;

        let written = !options.dry_run;
        if written {
            store.write_document(path, &conversion.text)?;
        }
        debug!(
            path = ?path,
            blocks = conversion.blocks,
            entries = conversion.entries,
            changed = conversion.changed,
            written,
            "converted document"
        );

        Ok(ConvertedFile {
            lines: conversion.lines,
            blocks: conversion.blocks,
            entries: conversion.entries,
            changed: conversion.changed,
            written,
            unclosed_block: conversion.unclosed_block,
        })
    }

    /// Convert every document found under `roots`. `on_file` is called before each
    /// document is processed.
    pub fn run(
        store: &dyn DocumentStore,
        roots: &[PathBuf],
        options: &RunOptions,
        mut on_file: impl FnMut(&Path),
    ) -> Result<RunReport> {
        options.convention.validate()?;
        let documents = collect_documents(roots, &options.convention)?;
        debug!(count = documents.len(), "discovered documents");

        let mut report = RunReport::default();
        for path in documents {
            on_file(&path);
            match convert_document(store, &path, options) {
                Ok(file) => {
                    report.files.insert(path, FileOutcome::Converted(file));
                }
                Err(err) => match options.on_error {
                    ErrorPolicy::Abort => return Err(err),
                    ErrorPolicy::Continue => {
                        let error = format!("{err:#}");
                        warn!(path = ?path, %error, "conversion failed; continuing");
                        report.files.insert(path, FileOutcome::Failed { error });
                    }
                },
            }
        }
        Ok(report)
    }

}
