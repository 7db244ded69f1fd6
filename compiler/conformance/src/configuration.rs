//! The directive block of a conformance test.
//!
//! Directives are `//` comment lines anywhere in the file. A comment line
//! is a directive if its text is `IGNORE` or starts with a known key
//! followed by a colon; everything else is an ordinary comment.

use crate::Error;
use diagnostics::ErrorCode;
use session::{Feature, Features};
use span::{LocalByteIndex, LocalSpan, SourceFile, Span};


#[derive(Default)]
#[cfg_attr(test, derive(Debug, PartialEq, Eq))]
pub struct Configuration {
    pub features: Features,
    /// Diagnostic kinds that are not reported as unexpected.
    pub suppressions: Vec<ErrorCode>,
    pub citation: Citation,
    /// The declared test case numbers in order of appearance.
    pub test_cases: Vec<u32>,
    pub ignored: bool,
}

/// Specification citation metadata, recorded for reporting only.
#[derive(Default)]
#[cfg_attr(test, derive(Debug, PartialEq, Eq))]
pub struct Citation {
    pub version: Option<String>,
    pub place: Option<String>,
    pub number: Option<String>,
    pub description: Option<String>,
    pub issues: Vec<String>,
}

impl Configuration {
    pub fn parse(file: &SourceFile) -> Result<Self, Error> {
        let mut configuration = Self::default();
        let mut offset = 0;

        for line in file.content().split('\n') {
            configuration.parse_line(line, offset, file)?;
            offset += line.len() as u32 + 1;
        }

        Ok(configuration)
    }

    fn parse_line(&mut self, line: &str, offset: u32, file: &SourceFile) -> Result<(), Error> {
        let trimmed = line.trim_start();
        let Some(rest) = trimmed.strip_prefix("//") else {
            return Ok(());
        };
        let rest_offset = offset + (line.len() - trimmed.len()) as u32 + 2;

        let body = rest.trim_start().trim_end();
        let body_offset = rest_offset + (rest.len() - rest.trim_start().len()) as u32;

        if body == "IGNORE" {
            self.ignored = true;
            return Ok(());
        }

        let Some((key, tail)) = body.split_once(':') else {
            return Ok(());
        };
        let tail_offset = body_offset + key.len() as u32 + 1;
        let key_span = spot(file, body_offset, key.len());

        match key {
            "LANGUAGE" => {
                for (word_offset, word) in words(tail) {
                    let span = spot(file, tail_offset + word_offset, word.len());

                    let (enabled, name) = if let Some(name) = word.strip_prefix('+') {
                        (true, name)
                    } else if let Some(name) = word.strip_prefix('-') {
                        (false, name)
                    } else {
                        return Err(Error::spanned(
                            format!("expected ‘+’ or ‘-’ in front of ‘{word}’"),
                            span,
                        ));
                    };

                    let feature: Feature = name.parse().map_err(|()| {
                        Error::spanned(format!("‘{name}’ is not a valid language feature"), span)
                    })?;

                    self.features.apply(feature, enabled);
                }
            }
            "DIAGNOSTICS" => {
                for (word_offset, word) in words(tail) {
                    let span = spot(file, tail_offset + word_offset, word.len());

                    let Some(name) = word.strip_prefix('-') else {
                        return Err(Error::spanned(
                            format!("expected ‘-’ in front of ‘{word}’"),
                            span,
                        ));
                    };

                    let code: ErrorCode = name.parse().map_err(|()| {
                        Error::spanned(format!("‘{name}’ is not a valid diagnostic kind"), span)
                    })?;

                    self.suppressions.push(code);
                }
            }
            "TESTCASE NUMBER" => {
                let text = tail.trim();
                let number = text.parse().map_err(|_| {
                    let text_offset = tail_offset + (tail.len() - tail.trim_start().len()) as u32;
                    Error::spanned(
                        format!("‘{text}’ is not a valid test case number"),
                        spot(file, text_offset, text.len()),
                    )
                })?;

                self.test_cases.push(number);
            }
            "SPEC VERSION" => set(&mut self.citation.version, tail, key, key_span)?,
            "PLACE" => set(&mut self.citation.place, tail, key, key_span)?,
            "NUMBER" => set(&mut self.citation.number, tail, key, key_span)?,
            "DESCRIPTION" => set(&mut self.citation.description, tail, key, key_span)?,
            "ISSUES" => self
                .citation
                .issues
                .extend(tail.split(',').map(str::trim).map(ToOwned::to_owned)),
            _ => {}
        }

        Ok(())
    }
}

fn set(field: &mut Option<String>, tail: &str, key: &str, span: Span) -> Result<(), Error> {
    if field.is_some() {
        return Err(Error::spanned(format!("‘{key}’ is already set"), span));
    }

    *field = Some(tail.trim().to_owned());
    Ok(())
}

/// The whitespace-separated words of a line together with their offsets.
fn words(source: &str) -> impl Iterator<Item = (u32, &str)> + '_ {
    source.split_whitespace().map(move |word| {
        let offset = word.as_ptr() as usize - source.as_ptr() as usize;
        (offset as u32, word)
    })
}

fn spot(file: &SourceFile, offset: u32, length: usize) -> Span {
    LocalSpan::with_length(LocalByteIndex::new(offset), length as u32).global(file)
}
