//! The syntactic analyzer (parser).
//!
//! A recursive descent parser over the token stream. Syntax errors abort
//! the analysis of the file, they are not recovered from.

use ast::{
    BareDecl, BareExpr, BareWhenCondition, Block, Call, Class, ClassKind, Decl, EnumEntry, Expr,
    File, Function, Identifier, Modifiers, Object, Parameter, Path, Property, Statement,
    SupertypeRef, When, WhenBranch, WhenCondition,
};
use diagnostics::{error::Result, reporter::ErasedReportedError, Diagnostic, ErrorCode, Reporter};
use lexer::{BareToken, Token};
use span::{SourceFileIndex, Span, Spanned, Spanning};
use std::{fmt, mem};

#[cfg(test)]
mod test;

pub fn parse(tokens: Vec<Token>, file: SourceFileIndex, reporter: &Reporter) -> Result<File> {
    Parser::new(tokens, file, reporter).parse_file()
}

/// The parser.
struct Parser<'a> {
    tokens: Vec<Token>,
    file: SourceFileIndex,
    index: usize,
    reporter: &'a Reporter,
}

impl<'a> Parser<'a> {
    fn new(tokens: Vec<Token>, file: SourceFileIndex, reporter: &'a Reporter) -> Self {
        Self {
            tokens,
            file,
            index: 0,
            reporter,
        }
    }

    fn parse_file(&mut self) -> Result<File> {
        let mut decls = Vec::new();

        while !self.token_is(BareToken::EndOfInput) {
            decls.push(self.parse_decl()?);
        }

        Ok(File {
            index: self.file,
            decls,
        })
    }

    fn parse_decl(&mut self) -> Result<Decl> {
        let start = self.token().span;
        let modifiers = self.parse_modifiers();

        match self.token().bare {
            BareToken::Class => {
                self.advance();
                self.finish_parse_class(start, modifiers, ClassKind::Class)
            }
            BareToken::Interface => {
                self.advance();
                self.finish_parse_class(start, modifiers, ClassKind::Interface)
            }
            BareToken::Enum => {
                self.advance();
                self.consume(BareToken::Class)?;
                self.finish_parse_class(start, modifiers, ClassKind::Enum)
            }
            BareToken::Object => {
                let object = self.parse_object(false)?;
                Ok(Decl::new(
                    start.merge(object.span),
                    BareDecl::Object(Box::new(object.bare)),
                ))
            }
            BareToken::Companion => {
                self.advance();
                let object = self.parse_object(true)?;
                Ok(Decl::new(
                    start.merge(object.span),
                    BareDecl::Object(Box::new(object.bare)),
                ))
            }
            BareToken::Fun => {
                self.advance();
                self.finish_parse_function(start, modifiers)
            }
            BareToken::Val => {
                self.advance();
                self.finish_parse_property(start, modifiers, false)
            }
            BareToken::Var => {
                self.advance();
                self.finish_parse_property(start, modifiers, true)
            }
            _ => Err(self.expected("a declaration")),
        }
    }

    fn parse_modifiers(&mut self) -> Modifiers {
        let mut modifiers = Modifiers::default();

        loop {
            let span = self.token().span;

            match self.token().bare {
                BareToken::Abstract => modifiers.abstract_ = Some(span),
                BareToken::Open => modifiers.open = Some(span),
                BareToken::Sealed => modifiers.sealed = Some(span),
                BareToken::Inner => modifiers.inner = Some(span),
                BareToken::Override => modifiers.override_ = Some(span),
                _ => break,
            }

            self.advance();
        }

        modifiers
    }

    /// Finish parsing a class-like declaration, the introducing keyword
    /// already being consumed.
    fn finish_parse_class(
        &mut self,
        start: Span,
        modifiers: Modifiers,
        kind: ClassKind,
    ) -> Result<Decl> {
        let name = self.consume_word()?;

        let mut members = Vec::new();

        // The primary constructor. `val`/`var` parameters become members.
        if self.maybe_consume(BareToken::OpeningRoundBracket) {
            if !self.token_is(BareToken::ClosingRoundBracket) {
                loop {
                    members.extend(self.parse_constructor_parameter()?);

                    if !self.maybe_consume(BareToken::Comma) {
                        break;
                    }
                }
            }

            self.consume(BareToken::ClosingRoundBracket)?;
        }

        let supertypes = self.parse_supertype_list()?;

        if self.token_is(BareToken::OpeningCurlyBracket) {
            match kind {
                ClassKind::Enum => members.extend(self.parse_enum_entries()?),
                _ => members.extend(self.parse_members()?),
            }
        }

        Ok(Decl::new(
            start.merge(self.preceding_span()),
            BareDecl::Class(Box::new(Class {
                kind,
                name,
                modifiers,
                supertypes,
                members,
            })),
        ))
    }

    /// Parse one primary constructor parameter.
    ///
    /// Yields a property member for `val`/`var` parameters, nothing for
    /// plain ones.
    fn parse_constructor_parameter(&mut self) -> Result<Option<Decl>> {
        let start = self.token().span;
        let modifiers = self.parse_modifiers();

        let mutable = match self.token().bare {
            BareToken::Val => {
                self.advance();
                Some(false)
            }
            BareToken::Var => {
                self.advance();
                Some(true)
            }
            _ => None,
        };

        let name = self.consume_word()?;
        let type_ = match self.maybe_consume(BareToken::Colon) {
            true => Some(self.consume_word()?),
            false => None,
        };

        if self.maybe_consume(BareToken::Equals) {
            let _default = self.parse_expr()?;
        }

        Ok(mutable.map(|mutable| {
            Decl::new(
                start.merge(self.preceding_span()),
                BareDecl::Property(Box::new(Property {
                    name,
                    modifiers,
                    mutable,
                    type_,
                    initializer: None,
                })),
            )
        }))
    }

    fn parse_supertype_list(&mut self) -> Result<Vec<SupertypeRef>> {
        let mut supertypes = Vec::new();

        if self.maybe_consume(BareToken::Colon) {
            loop {
                let name = self.consume_word()?;
                let mut has_constructor_call = false;

                if self.maybe_consume(BareToken::OpeningRoundBracket) {
                    // Constructor arguments are not analyzed.
                    if !self.token_is(BareToken::ClosingRoundBracket) {
                        loop {
                            self.parse_expr()?;

                            if !self.maybe_consume(BareToken::Comma) {
                                break;
                            }
                        }
                    }

                    self.consume(BareToken::ClosingRoundBracket)?;
                    has_constructor_call = true;
                }

                supertypes.push(SupertypeRef {
                    name,
                    has_constructor_call,
                });

                if !self.maybe_consume(BareToken::Comma) {
                    break;
                }
            }
        }

        Ok(supertypes)
    }

    fn parse_members(&mut self) -> Result<Vec<Decl>> {
        self.consume(BareToken::OpeningCurlyBracket)?;

        let mut members = Vec::new();

        while !self.token_is(BareToken::ClosingCurlyBracket) {
            members.push(self.parse_decl()?);
        }

        self.advance();

        Ok(members)
    }

    fn parse_enum_entries(&mut self) -> Result<Vec<Decl>> {
        self.consume(BareToken::OpeningCurlyBracket)?;

        let mut entries = Vec::new();

        if !self.token_is(BareToken::ClosingCurlyBracket) {
            loop {
                let name = self.consume_word()?;
                entries.push(Decl::new(
                    name.span(),
                    BareDecl::EnumEntry(Box::new(EnumEntry { name })),
                ));

                if !self.maybe_consume(BareToken::Comma) {
                    break;
                }

                // A trailing comma.
                if self.token_is(BareToken::ClosingCurlyBracket) {
                    break;
                }
            }
        }

        self.consume(BareToken::ClosingCurlyBracket)?;

        Ok(entries)
    }

    /// Parse an object declaration or expression starting at the `object`
    /// keyword.
    fn parse_object(&mut self, is_companion: bool) -> Result<Spanned<Object>> {
        let keyword_span = self.consume(BareToken::Object)?.span;

        let name = match self.token().bare {
            BareToken::Word(_) => Some(self.consume_word()?),
            _ => None,
        };

        let supertypes = self.parse_supertype_list()?;

        let members = match self.token_is(BareToken::OpeningCurlyBracket) {
            true => self.parse_members()?,
            false => Vec::new(),
        };

        Ok(Spanned::new(
            keyword_span.merge(self.preceding_span()),
            Object {
                name,
                keyword_span,
                is_companion,
                supertypes,
                members,
            },
        ))
    }

    fn finish_parse_function(&mut self, start: Span, modifiers: Modifiers) -> Result<Decl> {
        let name = self.consume_word()?;

        self.consume(BareToken::OpeningRoundBracket)?;

        let mut parameters = Vec::new();

        if !self.token_is(BareToken::ClosingRoundBracket) {
            loop {
                let name = self.consume_word()?;
                self.consume(BareToken::Colon)?;
                let type_ = self.consume_word()?;
                parameters.push(Parameter { name, type_ });

                if !self.maybe_consume(BareToken::Comma) {
                    break;
                }
            }
        }

        self.consume(BareToken::ClosingRoundBracket)?;

        let return_type = match self.maybe_consume(BareToken::Colon) {
            true => Some(self.consume_word()?),
            false => None,
        };

        let body = if self.maybe_consume(BareToken::Equals) {
            Some(self.parse_expr()?)
        } else if self.token_is(BareToken::OpeningCurlyBracket) {
            Some(self.parse_block()?)
        } else {
            None
        };

        Ok(Decl::new(
            start.merge(self.preceding_span()),
            BareDecl::Function(Box::new(Function {
                name,
                modifiers,
                parameters,
                return_type,
                body,
            })),
        ))
    }

    fn finish_parse_property(
        &mut self,
        start: Span,
        modifiers: Modifiers,
        mutable: bool,
    ) -> Result<Decl> {
        let property = self.parse_property_tail(modifiers, mutable)?;

        Ok(Decl::new(
            start.merge(self.preceding_span()),
            BareDecl::Property(Box::new(property)),
        ))
    }

    /// Parse the name, type annotation and initializer of a property, the
    /// `val`/`var` keyword already being consumed.
    fn parse_property_tail(&mut self, modifiers: Modifiers, mutable: bool) -> Result<Property> {
        let name = self.consume_word()?;

        let type_ = match self.maybe_consume(BareToken::Colon) {
            true => Some(self.consume_word()?),
            false => None,
        };

        let initializer = match self.maybe_consume(BareToken::Equals) {
            true => Some(self.parse_expr()?),
            false => None,
        };

        Ok(Property {
            name,
            modifiers,
            mutable,
            type_,
            initializer,
        })
    }

    fn parse_expr(&mut self) -> Result<Expr> {
        let mut expr = self.parse_primary_expr()?;

        while self.token_is(BareToken::OpeningRoundBracket) {
            self.advance();

            let mut arguments = Vec::new();

            if !self.token_is(BareToken::ClosingRoundBracket) {
                loop {
                    arguments.push(self.parse_expr()?);

                    if !self.maybe_consume(BareToken::Comma) {
                        break;
                    }
                }
            }

            self.consume(BareToken::ClosingRoundBracket)?;

            expr = Expr::new(
                expr.span.merge(self.preceding_span()),
                BareExpr::Call(Box::new(Call {
                    callee: expr,
                    arguments,
                })),
            );
        }

        Ok(expr)
    }

    fn parse_primary_expr(&mut self) -> Result<Expr> {
        let token = *self.token();

        match token.bare {
            BareToken::Word(atom) => {
                self.advance();

                let mut segments = vec![Identifier::new(token.span, atom)];

                while self.maybe_consume(BareToken::Dot) {
                    segments.push(self.consume_word()?);
                }

                Ok(Expr::new(
                    token.span.merge(self.preceding_span()),
                    BareExpr::Path(Box::new(Path { segments })),
                ))
            }
            BareToken::NumberLiteral(atom) => {
                self.advance();
                Ok(Expr::new(token.span, BareExpr::Number(atom)))
            }
            BareToken::TextLiteral(atom) => {
                self.advance();
                Ok(Expr::new(token.span, BareExpr::Text(atom)))
            }
            BareToken::When => self.parse_when(),
            BareToken::Object => {
                let object = self.parse_object(false)?;
                Ok(Expr::new(object.span, BareExpr::Object(Box::new(object.bare))))
            }
            BareToken::Return => {
                self.advance();

                let operand = match self.token_starts_expression() {
                    true => Some(self.parse_expr()?),
                    false => None,
                };

                Ok(Expr::new(
                    token.span.merge(operand.as_ref().map(|operand| operand.span)),
                    BareExpr::Return(Box::new(operand)),
                ))
            }
            BareToken::OpeningCurlyBracket => self.parse_block(),
            _ => Err(self.expected("an expression")),
        }
    }

    fn parse_when(&mut self) -> Result<Expr> {
        let start = self.consume(BareToken::When)?.span;

        self.consume(BareToken::OpeningRoundBracket)?;
        let subject = self.parse_expr()?;
        self.consume(BareToken::ClosingRoundBracket)?;

        self.consume(BareToken::OpeningCurlyBracket)?;

        let mut branches = Vec::new();

        while !self.token_is(BareToken::ClosingCurlyBracket) {
            let condition_start = self.token().span;

            let condition = match self.token().bare {
                BareToken::Is => {
                    self.advance();
                    let type_ = self.consume_word()?;
                    WhenCondition::new(
                        condition_start.merge(type_.span()),
                        BareWhenCondition::TypeTest(type_),
                    )
                }
                BareToken::Else => {
                    self.advance();
                    WhenCondition::new(condition_start, BareWhenCondition::Else)
                }
                _ => {
                    let operand = self.parse_expr()?;
                    WhenCondition::new(operand.span, BareWhenCondition::Equality(operand))
                }
            };

            self.consume(BareToken::Arrow)?;
            let body = self.parse_expr()?;

            branches.push(WhenBranch { condition, body });
        }

        self.advance();

        Ok(Expr::new(
            start.merge(self.preceding_span()),
            BareExpr::When(Box::new(When { subject, branches })),
        ))
    }

    fn parse_block(&mut self) -> Result<Expr> {
        let start = self.consume(BareToken::OpeningCurlyBracket)?.span;

        let mut statements = Vec::new();

        while !self.token_is(BareToken::ClosingCurlyBracket) {
            let statement = match self.token().bare {
                BareToken::Val => {
                    self.advance();
                    Statement::Property(Box::new(
                        self.parse_property_tail(Modifiers::default(), false)?,
                    ))
                }
                BareToken::Var => {
                    self.advance();
                    Statement::Property(Box::new(
                        self.parse_property_tail(Modifiers::default(), true)?,
                    ))
                }
                _ => Statement::Expression(self.parse_expr()?),
            };

            statements.push(statement);
        }

        self.advance();

        Ok(Expr::new(
            start.merge(self.preceding_span()),
            BareExpr::Block(Box::new(Block { statements })),
        ))
    }

    fn token_starts_expression(&self) -> bool {
        matches!(
            self.token().bare,
            BareToken::Word(_)
                | BareToken::NumberLiteral(_)
                | BareToken::TextLiteral(_)
                | BareToken::When
                | BareToken::Object
        )
    }

    fn expect(&self, expected: BareToken) -> Result<Token> {
        let token = self.token();

        if mem::discriminant(&token.bare) == mem::discriminant(&expected) {
            Ok(*token)
        } else {
            Err(self.expected(expected))
        }
    }

    /// [Expect](Self::expect) the current token and advance on success.
    fn consume(&mut self, expected: BareToken) -> Result<Token> {
        let token = self.expect(expected)?;
        self.advance();
        Ok(token)
    }

    fn consume_word(&mut self) -> Result<Identifier> {
        let token = *self.token();

        match token.bare {
            BareToken::Word(atom) => {
                self.advance();
                Ok(Identifier::new(token.span, atom))
            }
            _ => Err(self.expected("an identifier")),
        }
    }

    /// Consume the current token if it matches, indicating success.
    fn maybe_consume(&mut self, expected: BareToken) -> bool {
        if self.token_is(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn token_is(&self, expected: BareToken) -> bool {
        mem::discriminant(&self.token().bare) == mem::discriminant(&expected)
    }

    fn expected(&self, expected: impl fmt::Display) -> ErasedReportedError {
        let token = self.token();

        Diagnostic::error()
            .code(ErrorCode::SyntaxError)
            .message(format!(
                "found {actual} but expected {expected}",
                actual = token.bare
            ))
            .unlabeled_span(token.span)
            .report(self.reporter)
    }

    /// Step to the next token.
    ///
    /// Doesn't advance past [`BareToken::EndOfInput`].
    fn advance(&mut self) {
        if self.index + 1 < self.tokens.len() {
            self.index += 1;
        }
    }

    /// Get the current token.
    fn token(&self) -> &Token {
        &self.tokens[self.index]
    }

    /// The span of the most recently consumed token.
    fn preceding_span(&self) -> Span {
        self.tokens[self.index.saturating_sub(1)].span
    }
}
