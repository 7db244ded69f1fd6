//! The lexical analyzer (lexer).

use diagnostics::{error::{Health, Outcome}, Diagnostic, ErrorCode, Reporter};
use span::{LocalByteIndex, LocalSpan, SourceFile, Span, Spanned};
use token::parse_keyword;
use BareToken::*;

pub use token::{BareToken, Token};

pub mod token;

#[cfg(test)]
mod test;

pub fn lex(file: &SourceFile, reporter: &Reporter) -> Outcome<Vec<Token>> {
    Lexer::new(file, reporter).lex()
}

/// The state of the lexer.
struct Lexer<'a> {
    file: &'a SourceFile,
    characters: std::iter::Peekable<std::str::CharIndices<'a>>,
    tokens: Vec<Token>,
    local_span: LocalSpan,
    reporter: &'a Reporter,
    health: Health,
}

impl<'a> Lexer<'a> {
    fn new(file: &'a SourceFile, reporter: &'a Reporter) -> Self {
        Self {
            characters: file.content().char_indices().peekable(),
            file,
            tokens: Vec::new(),
            local_span: LocalSpan::default(),
            reporter,
            health: Health::Untainted,
        }
    }

    fn lex(mut self) -> Outcome<Vec<Token>> {
        while let Some((index, character)) = self.peek_with_index() {
            self.local_span = LocalSpan::empty(index);

            match character {
                ' ' | '\t' | '\r' | '\n' => self.advance(),
                '/' => self.lex_comment_or_illegal(),
                character if is_identifier_start(character) => self.lex_identifier(),
                character if character.is_ascii_digit() => self.lex_number_literal(),
                '"' => self.lex_text_literal(),
                '-' => self.lex_arrow_or_illegal(),
                ':' => self.consume(Colon),
                ',' => self.consume(Comma),
                '.' => self.consume(Dot),
                '=' => self.consume(Equals),
                '(' => self.consume(OpeningRoundBracket),
                ')' => self.consume(ClosingRoundBracket),
                '{' => self.consume(OpeningCurlyBracket),
                '}' => self.consume(ClosingCurlyBracket),
                character => {
                    self.consume(Illegal(character));

                    let error = Diagnostic::error()
                        .code(ErrorCode::SyntaxError)
                        .message(format!(
                            "found invalid character U+{:04X} ‘{character}’",
                            character as u32
                        ))
                        .unlabeled_span(self.span())
                        .report(self.reporter);
                    self.health.taint(error);
                }
            }
        }

        self.local_span = LocalSpan::empty(self.file.local_span().end());
        self.add(EndOfInput);

        Outcome::new(self.tokens, self.health)
    }

    /// Lex a line comment introduced by `//`.
    ///
    /// Directive blocks and expected-diagnostic markers also live in such
    /// comments but they are read from the raw text by the conformance
    /// harness, not from the token stream. The lexer simply skips them.
    fn lex_comment_or_illegal(&mut self) {
        self.take();
        self.advance();

        if self.peek() == Some('/') {
            while let Some(character) = self.peek() {
                self.advance();

                if character == '\n' {
                    break;
                }
            }
        } else {
            self.add(Illegal('/'));

            let error = Diagnostic::error()
                .code(ErrorCode::SyntaxError)
                .message("found a stray ‘/’, comments start with ‘//’")
                .unlabeled_span(self.span())
                .report(self.reporter);
            self.health.taint(error);
        }
    }

    fn lex_identifier(&mut self) {
        self.take();
        self.advance();
        self.take_while(is_identifier_middle);

        match parse_keyword(self.source()) {
            Some(keyword) => self.add(keyword),
            None => self.add(Word(self.source().into())),
        }
    }

    fn lex_number_literal(&mut self) {
        self.take();
        self.advance();
        self.take_while(|character| character.is_ascii_digit());

        self.add(NumberLiteral(self.source().into()));
    }

    fn lex_text_literal(&mut self) {
        self.take();
        self.advance();

        let mut is_terminated = false;

        while let Some(character) = self.peek() {
            if character == '\n' {
                break;
            }

            self.take();
            self.advance();

            if character == '"' {
                is_terminated = true;
                break;
            }
        }

        if !is_terminated {
            let error = Diagnostic::error()
                .code(ErrorCode::SyntaxError)
                .message("unterminated text literal")
                .unlabeled_span(self.span())
                .report(self.reporter);
            self.health.taint(error);
        }

        let content = self.source();
        let content = content.strip_prefix('"').unwrap_or(content);
        let content = content.strip_suffix('"').unwrap_or(content);
        self.add(TextLiteral(content.into()));
    }

    fn lex_arrow_or_illegal(&mut self) {
        self.take();
        self.advance();

        if self.peek() == Some('>') {
            self.take();
            self.advance();
            self.add(Arrow);
        } else {
            self.add(Illegal('-'));

            let error = Diagnostic::error()
                .code(ErrorCode::SyntaxError)
                .message("found a stray ‘-’, did you mean ‘->’?")
                .unlabeled_span(self.span())
                .report(self.reporter);
            self.health.taint(error);
        }
    }

    fn span(&self) -> Span {
        self.local_span.global(self.file)
    }

    fn source(&self) -> &'a str {
        &self.file[self.local_span]
    }

    /// Step to the next character in the input stream.
    fn advance(&mut self) {
        self.characters.next();
    }

    /// Include the current character in the span of the token-to-be-added.
    fn take(&mut self) {
        if let Some((index, character)) = self.peek_with_index() {
            self.local_span.set_end(index + character.len_utf8() as u32);
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.peek_with_index().map(|(_, character)| character)
    }

    fn peek_with_index(&mut self) -> Option<(LocalByteIndex, char)> {
        self.characters
            .peek()
            .map(|&(index, character)| (LocalByteIndex::new(index as u32), character))
    }

    fn take_while(&mut self, predicate: fn(char) -> bool) {
        while let Some(character) = self.peek() {
            if !predicate(character) {
                break;
            }
            self.take();
            self.advance();
        }
    }

    fn add(&mut self, token: BareToken) {
        let span = self.span();
        self.tokens.push(Spanned::new(span, token));
    }

    fn consume(&mut self, token: BareToken) {
        self.take();
        self.advance();
        self.add(token);
    }
}

const fn is_identifier_start(character: char) -> bool {
    character.is_ascii_alphabetic() || character == '_'
}

const fn is_identifier_middle(character: char) -> bool {
    character.is_ascii_alphanumeric() || character == '_'
}
