//! The analysis driver.
//!
//! Composes the passes into the per-file pipeline: lexing, parsing, name
//! resolution and type checking run once per file, synchronously. Only
//! syntax errors abort a file; every other finding is reported as a
//! diagnostic and analysis continues.

use diagnostics::error::Result;
use session::Session;
use span::{SourceFileIndex, SourceMap};

#[cfg(test)]
mod test;

pub fn analyze(map: &SourceMap, index: SourceFileIndex, session: &Session<'_>) -> Result {
    let tokens = lexer::lex(&map[index], session.reporter);
    let file = parser::parse(tokens.bare, index, session.reporter)?;
    let bindings = resolver::resolve(&file, session);
    let health = tokens
        .health
        .and(bindings.health)
        .and(typer::check(&file, &bindings.bare, session));
    health.into()
}
