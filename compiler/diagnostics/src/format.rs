//! Diagnostic formatting.

use super::{Highlight, Role, Subdiagnostic, UnboxedUntaggedDiagnostic};
use span::{
    source_map::{LineWithHighlight, LinesWithHighlight},
    SourceMap,
};
use std::{fmt, iter::once};
use unicode_width::UnicodeWidthStr;

#[cfg(test)]
mod test;

pub(super) fn format(diagnostic: &UnboxedUntaggedDiagnostic, map: Option<&SourceMap>) -> String {
    Formatter { diagnostic, map }.to_string()
}

struct Formatter<'a> {
    diagnostic: &'a UnboxedUntaggedDiagnostic,
    map: Option<&'a SourceMap>,
}

impl Formatter<'_> {
    fn format_header(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.diagnostic.severity)?;

        if let Some(code) = self.diagnostic.code {
            write!(f, "[{code}]")?;
        }

        if let Some(message) = &self.diagnostic.message {
            write!(f, ": {message}")?;
        }

        Ok(())
    }

    fn format_path_and_highlights(
        &self,
        padding: &mut String,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let highlights = &self.diagnostic.highlights;

        let rows_of_lines = if highlights.is_empty() {
            *padding = " ".into();
            None
        } else {
            let map = match self.map {
                Some(map) => map,
                // Diagnostics with highlights require a source map. Render
                // what we can instead of crashing the reporter.
                None => return Ok(()),
            };

            let rows_of_lines = highlights
                .iter()
                .map(|highlight| map.lines_with_highlight(highlight.span))
                .collect::<Vec<_>>();

            *padding = " ".repeat(calculate_padding(&rows_of_lines));
            Some(rows_of_lines)
        };

        let bar = Line::Vertical.single();
        let mut needs_upward_connection = false;

        if let Some(path) = &self.diagnostic.path {
            let path = path.to_string_lossy();
            let is_final = highlights.is_empty() && self.diagnostic.subdiagnostics.is_empty();

            let connector = if is_final {
                Line::Horizontal
            } else {
                Line::DownAndRight
            }
            .single();

            writeln!(f)?;
            write!(f, "{padding} {connector}{} {path}", Line::Horizontal.single())?;

            if !is_final {
                writeln!(f)?;
                write!(f, "{padding} {bar}")?;
            }

            needs_upward_connection = true;
        }

        let Some(rows_of_lines) = rows_of_lines else {
            return Ok(());
        };

        let amount = highlights.len();

        for (index, (highlight, lines)) in highlights.iter().zip(rows_of_lines).enumerate() {
            let file = lines.file;
            let line = lines.first.number;
            let column = lines.first.highlight.start;

            let connector = if needs_upward_connection {
                Line::VerticalAndRight
            } else {
                Line::DownAndRight
            }
            .single();

            writeln!(f)?;
            write!(
                f,
                "{padding} {connector}{} {file}:{line}:{column}",
                Line::Horizontal.single()
            )?;

            match &lines.last {
                None => self.format_single_line_highlight(highlight, &lines, bar, padding, f),
                Some(final_line) => {
                    self.format_multi_line_highlight(highlight, &lines, final_line, bar, padding, f)
                }
            }?;

            let is_final = index + 1 == amount && self.diagnostic.subdiagnostics.is_empty();

            if !is_final {
                writeln!(f)?;
                write!(f, "{padding} {bar}")?;
            }

            needs_upward_connection = true;
        }

        Ok(())
    }

    fn format_single_line_highlight(
        &self,
        highlight: &Highlight,
        lines: &LinesWithHighlight<'_>,
        bar: &str,
        padding: &str,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let number = format!("{0:>1$}", lines.first.number, padding.len());
        let snippet = lines.first.content;
        let highlight_prefix_width = lines.first.highlight.prefix_width;
        let zero_length_highlight = lines.first.highlight.width == 0;
        let mut lines_of_label = highlight.label.iter().flat_map(|label| label.split('\n'));

        let snippet_padding = match zero_length_highlight && highlight_prefix_width == 0 {
            true => " ",
            false => "",
        };

        writeln!(f)?;
        writeln!(f, "{padding} {bar}")?;
        writeln!(f, "{number} {bar} {snippet_padding}{snippet}")?;

        let underline_padding = " ".repeat(match zero_length_highlight {
            true => highlight_prefix_width.saturating_sub(1),
            false => highlight_prefix_width,
        });
        let underline = if zero_length_highlight {
            format!(
                "{}{}",
                Line::RightAngleBracket.to_str(highlight.role),
                Line::LeftAngleBracket.to_str(highlight.role),
            )
        } else {
            Line::Horizontal
                .to_str(highlight.role)
                .repeat(lines.first.highlight.width)
        };

        write!(f, "{padding} {bar} {underline_padding}{underline}")?;

        if let Some(line_of_label) = lines_of_label.next() {
            write!(f, " {line_of_label}")?;
        }

        let spacing = " ".repeat(
            highlight_prefix_width
                + if zero_length_highlight {
                    1
                } else {
                    lines.first.highlight.width
                },
        );

        for line_of_label in lines_of_label {
            writeln!(f)?;
            write!(f, "{padding} {bar}")?;

            if !line_of_label.is_empty() {
                write!(f, " {spacing} {line_of_label}")?;
            }
        }

        Ok(())
    }

    fn format_multi_line_highlight(
        &self,
        highlight: &Highlight,
        lines: &LinesWithHighlight<'_>,
        final_line: &LineWithHighlight<'_>,
        bar: &str,
        padding: &str,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let mut lines_of_label = highlight.label.iter().flat_map(|label| label.split('\n'));
        let hand = Line::UpAndLeft.to_str(highlight.role);

        // The upper arm.
        {
            let number = format!("{0:>1$}", lines.first.number, padding.len());
            let snippet = lines.first.content;
            let joint = Line::DownAndRight.to_str(highlight.role);
            let horizontal_arm = Line::Horizontal
                .to_str(highlight.role)
                .repeat(lines.first.highlight.prefix_width + 1);
            let ellipsis_or_bar = if final_line.number - lines.first.number > 1 {
                "·"
            } else {
                bar
            };

            writeln!(f)?;
            writeln!(f, "{padding} {bar}")?;
            writeln!(f, "{number} {bar}   {snippet}")?;
            writeln!(f, "{padding} {ellipsis_or_bar} {joint}{horizontal_arm}{hand}")?;
        }

        // The connector and the lower arm.
        {
            let number = format!("{0:>1$}", final_line.number, padding.len());
            let snippet = final_line.content;
            let horizontal_arm = Line::Horizontal
                .to_str(highlight.role)
                .repeat(final_line.highlight.width);
            let vertical_arm = Line::Vertical.to_str(highlight.role);
            let joint = Line::UpAndRight.to_str(highlight.role);

            writeln!(f, "{number} {bar} {vertical_arm} {snippet}")?;
            write!(f, "{padding} {bar} {joint}{horizontal_arm}{hand}")?;

            if let Some(line_of_label) = lines_of_label.next() {
                if !line_of_label.is_empty() {
                    write!(f, " {line_of_label}")?;
                }
            }

            let spacing = " ".repeat(1 + final_line.highlight.width + 1);

            for line_of_label in lines_of_label {
                writeln!(f)?;
                write!(f, "{padding} {bar}")?;

                if !line_of_label.is_empty() {
                    write!(f, " {spacing} {line_of_label}")?;
                }
            }
        }

        Ok(())
    }
}

impl fmt::Display for Formatter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.format_header(f)?;

        let mut padding = String::new();
        self.format_path_and_highlights(&mut padding, f)?;

        for subdiagnostic in &self.diagnostic.subdiagnostics {
            format_subdiagnostic(subdiagnostic, &padding, f)?;
        }

        Ok(())
    }
}

fn format_subdiagnostic(
    subdiagnostic: &Subdiagnostic,
    padding: &str,
    f: &mut fmt::Formatter<'_>,
) -> fmt::Result {
    writeln!(f)?;
    write!(f, "{padding}{}: ", subdiagnostic.severity)?;

    let mut lines_of_message = subdiagnostic.message.split('\n');

    if let Some(line_of_message) = lines_of_message.next() {
        write!(f, "{line_of_message}")?;
    }

    let severity_spacing = " ".repeat(subdiagnostic.severity.to_string().width() + 1);

    for line_of_message in lines_of_message {
        if !line_of_message.is_empty() {
            writeln!(f)?;
            write!(f, "{padding}{severity_spacing} {line_of_message}")?;
        }
    }

    Ok(())
}

fn calculate_padding(rows_of_lines: &[LinesWithHighlight<'_>]) -> usize {
    let mut padding = 0;

    let mut largest_line_number = rows_of_lines
        .iter()
        .flat_map(|lines| {
            once(lines.first.number).chain(lines.last.as_ref().map(|line| line.number))
        })
        .max()
        .unwrap_or(1);

    while largest_line_number > 0 {
        largest_line_number /= 10;
        padding += 1;
    }

    padding
}

#[derive(Clone, Copy)]
enum Line {
    Horizontal,
    Vertical,
    DownAndRight,
    VerticalAndRight,
    UpAndLeft,
    UpAndRight,
    RightAngleBracket,
    LeftAngleBracket,
}

impl Line {
    const fn single(self) -> &'static str {
        match self {
            Self::Horizontal => "─",
            Self::Vertical => "│",
            Self::DownAndRight => "┌",
            Self::VerticalAndRight => "├",
            Self::UpAndLeft => "┘",
            Self::UpAndRight => "└",
            Self::LeftAngleBracket => "⟨",
            Self::RightAngleBracket => "⟩",
        }
    }

    const fn double(self) -> &'static str {
        match self {
            Self::Horizontal => "═",
            Self::Vertical => "║",
            Self::DownAndRight => "╔",
            Self::VerticalAndRight => "╠",
            Self::UpAndLeft => "╝",
            Self::UpAndRight => "╚",
            Self::LeftAngleBracket => "⟪",
            Self::RightAngleBracket => "⟫",
        }
    }

    const fn to_str(self, role: Role) -> &'static str {
        match role {
            Role::Primary => self.double(),
            Role::Secondary => self.single(),
        }
    }
}
