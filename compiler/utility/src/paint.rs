//! Styled terminal output.

use crate::SmallVec;
use std::io::{self, BufWriter, StderrLock, StdoutLock, Write};
use supports_color::Stream;

pub use anstyle::{AnsiColor, Effects, Style};

/// Paint to a `String`.
pub fn paint_to_string(
    paint: impl FnOnce(&mut Painter) -> io::Result<()>,
    choice: ColorChoice,
) -> String {
    let mut painter = Painter::bytes(choice);
    paint(&mut painter).unwrap(); // Writing to bytes should never fail.
    String::from_utf8(painter.buffer()).unwrap()
}

pub struct Painter {
    // An enum of the writers common to this workspace instead of `dyn io::Write`
    // to avoid dynamic dispatch.
    writer: Writer,
    colorize: bool,
    stack: SmallVec<Style, 3>,
}

impl Painter {
    pub fn bytes(choice: ColorChoice) -> Self {
        Self::new(Writer::Bytes(Vec::new()), choice.resolve(None))
    }

    pub fn stdout(choice: ColorChoice) -> Self {
        Self::new(
            Writer::Stdout(BufWriter::new(std::io::stdout().lock())),
            choice.resolve(Some(Stream::Stdout)),
        )
    }

    pub fn stderr(choice: ColorChoice) -> Self {
        Self::new(
            Writer::Stderr(BufWriter::new(std::io::stderr().lock())),
            choice.resolve(Some(Stream::Stderr)),
        )
    }

    fn new(writer: Writer, colorize: bool) -> Self {
        Self {
            writer,
            colorize,
            stack: SmallVec::new(),
        }
    }

    pub fn set(&mut self, style: impl IntoStyle) -> io::Result<()> {
        if !self.colorize {
            return Ok(());
        }

        let style = style.into_style();
        self.stack.push(style);
        write!(self.writer, "{style}")
    }

    pub fn unset(&mut self) -> io::Result<()> {
        if !self.colorize {
            return Ok(());
        }

        if let Some(style) = self.stack.pop() {
            write!(self.writer, "{}", style.render_reset())?;
        }

        for style in &self.stack {
            write!(self.writer, "{style}")?;
        }

        Ok(())
    }

    pub fn buffer(self) -> Vec<u8> {
        match self.writer {
            Writer::Bytes(bytes) => bytes,
            Writer::Stdout(_) | Writer::Stderr(_) => Vec::new(),
        }
    }
}

impl Write for Painter {
    fn write(&mut self, buffer: &[u8]) -> io::Result<usize> {
        self.writer.write(buffer)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

enum Writer {
    Stdout(BufWriter<StdoutLock<'static>>),
    Stderr(BufWriter<StderrLock<'static>>),
    Bytes(Vec<u8>),
}

impl Write for Writer {
    fn write(&mut self, buffer: &[u8]) -> io::Result<usize> {
        match self {
            Self::Stdout(stdout) => stdout.write(buffer),
            Self::Stderr(stderr) => stderr.write(buffer),
            Self::Bytes(bytes) => bytes.write(buffer),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::Stdout(stdout) => stdout.flush(),
            Self::Stderr(stderr) => stderr.flush(),
            Self::Bytes(bytes) => bytes.flush(),
        }
    }
}

#[derive(Default, Clone, Copy, PartialEq, Eq, Debug)]
pub enum ColorChoice {
    #[default]
    Auto,
    Never,
    Always,
}

impl ColorChoice {
    pub const VALUES: [&'static str; 3] = ["auto", "never", "always"];

    fn resolve(self, stream: Option<Stream>) -> bool {
        match (self, stream) {
            (Self::Auto, Some(stream)) => {
                supports_color::on_cached(stream).is_some_and(|level| level.has_basic)
            }
            (Self::Never, _) | (Self::Auto, None) => false,
            (Self::Always, _) => true,
        }
    }
}

impl std::str::FromStr for ColorChoice {
    type Err = ();

    fn from_str(source: &str) -> Result<Self, Self::Err> {
        match source {
            "auto" => Ok(Self::Auto),
            "never" => Ok(Self::Never),
            "always" => Ok(Self::Always),
            _ => Err(()),
        }
    }
}

pub trait IntoStyle {
    fn into_style(self) -> Style;
}

impl IntoStyle for Style {
    fn into_style(self) -> Style {
        self
    }
}

impl IntoStyle for AnsiColor {
    fn into_style(self) -> Style {
        self.on_default()
    }
}

impl IntoStyle for Effects {
    fn into_style(self) -> Style {
        Style::new().effects(self)
    }
}
