//! Inline expected-diagnostic markers.
//!
//! An expectation is written as `<!KIND!>snippet<!>` around the source
//! snippet the diagnostic is anchored at, with `KIND` one or more
//! comma-separated diagnostic kind names. Markers may be nested.
//!
//! Extraction strips the markers and yields spans into the stripped
//! source, the text the pipeline actually analyzes.

use crate::Error;
use diagnostics::ErrorCode;
use span::{LocalByteIndex, LocalSpan, SourceFile};
use utility::SmallVec;

#[cfg(test)]
mod test;

const OPENER: &str = "<!";
const CLOSER: &str = "<!>";
const OPENER_END: &str = "!>";

type Expectations = Vec<(ErrorCode, LocalSpan)>;

pub(crate) fn extract(file: &SourceFile) -> Result<(String, Expectations), Error> {
    let source = file.content();
    let mut stripped = String::with_capacity(source.len());
    let mut expectations = Vec::new();
    let mut open: Vec<(SmallVec<ErrorCode, 1>, LocalByteIndex, u32)> = Vec::new();
    let mut cursor = 0;

    while let Some(index) = source[cursor..].find(OPENER) {
        let start = cursor + index;
        stripped.push_str(&source[cursor..start]);

        let after = &source[start + OPENER.len()..];

        if after.starts_with('>') {
            let Some((codes, opening, _)) = open.pop() else {
                return Err(Error::spanned(
                    "this closing marker has no matching opening marker",
                    spot(file, start, CLOSER.len()),
                ));
            };

            let span = LocalSpan::new(opening, LocalByteIndex::new(stripped.len() as u32));
            for code in codes {
                expectations.push((code, span));
            }

            cursor = start + CLOSER.len();
        } else if let Some(end) = after.find(OPENER_END) {
            let kinds = &after[..end];
            let mut codes = SmallVec::new();

            for kind in kinds.split(',').map(str::trim) {
                let code = kind.parse().map_err(|()| {
                    Error::spanned(
                        format!("‘{kind}’ is not a valid diagnostic kind"),
                        spot(file, start, OPENER.len() + kinds.len() + OPENER_END.len()),
                    )
                })?;
                codes.push(code);
            }

            open.push((
                codes,
                LocalByteIndex::new(stripped.len() as u32),
                start as u32,
            ));
            cursor = start + OPENER.len() + kinds.len() + OPENER_END.len();
        } else {
            return Err(Error::spanned(
                "this expectation marker is unterminated",
                spot(file, start, OPENER.len()),
            ));
        }
    }

    stripped.push_str(&source[cursor..]);

    if let Some((_, _, start)) = open.pop() {
        return Err(Error::spanned(
            "this expectation marker is never closed",
            spot(file, start as usize, OPENER.len()),
        ));
    }

    Ok((stripped, expectations))
}

fn spot(file: &SourceFile, offset: usize, length: usize) -> span::Span {
    LocalSpan::with_length(LocalByteIndex::new(offset as u32), length as u32).global(file)
}
