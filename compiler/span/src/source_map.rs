//! The source map: a collection of source files addressable by global byte index.

use super::{ByteIndex, LocalSpan, Span, Spanning};
use std::{fmt, io, ops::Range, path::{Path, PathBuf}};
use unicode_width::UnicodeWidthStr;
use utility::index_map::{Index, IndexMap};

/// A mapping from [index](SourceFileIndex) to [source file](SourceFile).
///
/// The source files are laid out next to each other and padded on their left
/// by one byte to reserve space for _end of input_ pseudo tokens. Additionally,
/// this frees up the byte index `0` and allows `Span::default()` — starting at
/// this unmapped index and empty — to be interpreted as an _unknown location_.
#[derive(Default)]
pub struct SourceMap {
    files: IndexMap<SourceFileIndex, SourceFile>,
}

impl SourceMap {
    fn next_offset(&self) -> ByteIndex {
        const PADDING: u32 = 1;

        self.files
            .last()
            .map(|file| file.span().end())
            .unwrap_or_default()
            + PADDING
    }

    /// Open a file given its path and add it as a [`SourceFile`] to the map.
    pub fn load(&mut self, path: &Path) -> io::Result<SourceFileIndex> {
        let source = std::fs::read_to_string(path)?;
        Ok(self.add(FileName::Path(path.to_owned()), source))
    }

    /// Add text to the map creating a [`SourceFile`] in the process.
    pub fn add(&mut self, name: FileName, source: String) -> SourceFileIndex {
        let offset = self.next_offset();
        self.files.insert(SourceFile::new(name, source, offset))
    }

    pub fn add_str(&mut self, name: FileName, source: &str) -> SourceFileIndex {
        self.add(name, source.to_owned())
    }

    pub fn file(&self, span: Span) -> &SourceFile {
        debug_assert!(span != Span::default());

        self.files
            .values()
            .find(|file| file.span().contains(span.start()))
            .unwrap()
    }

    /// Resolve a span to the string content it points to.
    pub fn snippet(&self, span: Span) -> &str {
        let file = self.file(span);
        let span = span.local(file);
        &file[span]
    }

    /// Resolve a span to the source lines containing it together with
    /// one-indexed highlight columns.
    pub fn lines_with_highlight(&self, span: Span) -> LinesWithHighlight<'_> {
        let file = self.file(span);
        let local = span.local(file);
        let content = file.content();

        let start = local.start().value() as usize;
        let end = local.end().value() as usize;

        let mut first = None;
        let mut last = None;

        let mut line_start = 0usize;
        let mut number = 1u32;

        // Iterate over the lines of the file, the last one without a
        // trailing line break included.
        let mut offset = 0;
        loop {
            let line_end = match content[offset..].find('\n') {
                Some(index) => offset + index,
                None => content.len(),
            };

            let contains =
                |index: usize| line_start <= index && index <= line_end;

            if first.is_none() && contains(start) {
                first = Some((number, line_start, line_end));
            }

            if first.is_some() && contains(end) {
                last = Some((number, line_start, line_end));
                break;
            }

            if line_end == content.len() {
                break;
            }

            offset = line_end + 1;
            line_start = offset;
            number += 1;
        }

        let resolve = |(number, line_start, line_end): (u32, usize, usize)| {
            let line = &content[line_start..line_end];
            let highlight_start = start.clamp(line_start, line_end);
            let highlight_end = end.clamp(line_start, line_end);
            let prefix = &content[line_start..highlight_start];
            let highlight = &content[highlight_start..highlight_end];

            let start_column = prefix.chars().count() as u32 + 1;
            let end_column = start_column + highlight.chars().count() as u32;

            LineWithHighlight {
                number,
                content: line,
                highlight: Highlight {
                    start: start_column,
                    end: end_column,
                    width: highlight.width().max(1),
                    prefix_width: prefix.width(),
                },
            }
        };

        let first = resolve(first.unwrap());
        let last = last.map(resolve);
        let last = match &last {
            Some(line) if line.number == first.number => None,
            _ => last,
        };

        LinesWithHighlight {
            file: file.name(),
            first,
            last,
        }
    }
}

impl std::ops::Index<SourceFileIndex> for SourceMap {
    type Output = SourceFile;

    fn index(&self, index: SourceFileIndex) -> &Self::Output {
        &self.files[index]
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct SourceFileIndex(usize);

impl Index for SourceFileIndex {
    fn new(index: usize) -> Self {
        Self(index)
    }

    fn value(self) -> usize {
        self.0
    }
}

#[derive(Debug)]
#[cfg_attr(test, derive(PartialEq, Eq))]
pub struct LinesWithHighlight<'a> {
    pub file: &'a FileName,
    pub first: LineWithHighlight<'a>,
    /// This is `None` if the last line is the first line.
    pub last: Option<LineWithHighlight<'a>>,
}

#[derive(Debug, Clone)]
#[cfg_attr(test, derive(PartialEq, Eq))]
pub struct LineWithHighlight<'a> {
    /// One-indexed line number.
    pub number: u32,
    /// The content of the entire line that contains the highlighted snippet.
    pub content: &'a str,
    pub highlight: Highlight,
}

#[derive(Debug, Clone)]
#[cfg_attr(test, derive(PartialEq, Eq))]
pub struct Highlight {
    /// One-indexed start column.
    pub start: u32,
    /// One-indexed end column, exclusive.
    pub end: u32,
    pub width: usize,
    pub prefix_width: usize,
}

/// A source file.
///
/// Obtained by and contained within a [source map](SourceMap).
#[cfg_attr(test, derive(PartialEq, Eq))]
pub struct SourceFile {
    name: FileName,
    content: String,
    span: Span,
}

impl SourceFile {
    fn new(name: FileName, content: String, start: ByteIndex) -> Self {
        Self {
            span: Span::with_length(start, content.len().try_into().unwrap()),
            name,
            content,
        }
    }

    pub fn name(&self) -> &FileName {
        &self.name
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn local_span(&self) -> LocalSpan {
        self.span.local(self)
    }
}

impl Spanning for SourceFile {
    fn span(&self) -> Span {
        self.span
    }
}

impl std::ops::Index<LocalSpan> for SourceFile {
    type Output = str;

    fn index(&self, index: LocalSpan) -> &Self::Output {
        &self.content[Range::from(index)]
    }
}

#[derive(PartialEq, Eq, Debug, Clone)]
pub enum FileName {
    Anonymous,
    Stdin,
    Path(PathBuf),
    Virtual(&'static str),
}

impl FileName {
    pub fn path(&self) -> Option<&Path> {
        utility::obtain!(self, Self::Path(path) => path)
    }
}

impl fmt::Display for FileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Anonymous => f.write_str("⟨anonymous⟩"),
            Self::Stdin => f.write_str("⟨stdin⟩"),
            Self::Path(path) => write!(f, "{}", path.display()),
            Self::Virtual(name) => f.write_str(name),
        }
    }
}

#[cfg(test)]
mod test;
