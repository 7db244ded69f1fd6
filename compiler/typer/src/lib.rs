//! The type and flow checker.
//!
//! Two analyses run over the resolved declarations of a file. The
//! abstract-member checker verifies that every concrete classifier
//! discharges the abstract obligations found in its linearized supertype
//! chain. The condition checker verifies that equality conditions of `when`
//! branches reference values, not bare types.
//!
//! Findings are data: every violation is reported as a diagnostic and
//! analysis continues. The returned [`Health`] merely witnesses whether
//! anything was reported.

use ast::{BareDecl, BareExpr, BareWhenCondition, Statement};
use diagnostics::{error::Health, Diagnostic, ErrorCode};
use resolver::{Bindings, Builtin, DeclarationIndex, DeclarationKind, Signature};
use session::{Feature, Session};
use utility::{HashMap, QuoteExt};

#[cfg(test)]
mod test;

pub fn check(file: &ast::File, bindings: &Bindings, session: &Session<'_>) -> Health {
    let mut checker = Checker {
        bindings,
        session,
        health: Health::default(),
    };
    checker.check_implementations();
    for decl in &file.decls {
        checker.check_decl(decl);
    }
    checker.health
}

struct Checker<'a> {
    bindings: &'a Bindings,
    session: &'a Session<'a>,
    health: Health,
}

/// An abstract member a concrete classifier has to implement.
struct Obligation {
    signature: Signature,
    /// The classifier that declared the member abstract.
    origin: DeclarationIndex,
    member: DeclarationIndex,
}

/// The implementations found for one signature along a supertype chain.
#[derive(Default)]
struct Providers {
    /// Provided by the classifier itself or a class supertype.
    by_class: bool,
    /// Interface default implementations, one entry per interface.
    by_interfaces: Vec<(DeclarationIndex, DeclarationIndex)>,
}

impl Checker<'_> {
    fn check_implementations(&mut self) {
        for index in self.bindings.indices() {
            if self.bindings[index].requires_implementations() {
                self.check_obligations(index);
            }
        }
    }

    /// Verify that every abstract obligation of the given classifier is
    /// discharged by exactly one visible implementation.
    fn check_obligations(&mut self, target: DeclarationIndex) {
        let chain = self.bindings.linearize(target);

        let mut obligations: Vec<Obligation> = Vec::new();
        let mut providers: HashMap<Signature, Providers> = HashMap::default();

        for &classifier in std::iter::once(&target).chain(&chain) {
            let is_interface = self.bindings[classifier].is_interface();

            for &member in &self.bindings[classifier].members {
                let Some(signature) = self.bindings[member].signature() else {
                    continue;
                };

                if self.bindings[member].is_abstract {
                    let recorded = obligations
                        .iter()
                        .any(|obligation| obligation.signature == signature);
                    if !recorded {
                        obligations.push(Obligation {
                            signature,
                            origin: classifier,
                            member,
                        });
                    }
                } else {
                    let providers = providers.entry(signature).or_default();
                    if is_interface {
                        let recorded = providers
                            .by_interfaces
                            .iter()
                            .any(|&(interface, _)| interface == classifier);
                        if !recorded {
                            providers.by_interfaces.push((classifier, member));
                        }
                    } else {
                        providers.by_class = true;
                    }
                }
            }
        }

        for obligation in obligations {
            let Some(providers) = providers.get(&obligation.signature) else {
                self.report_unimplemented(target, &obligation);
                continue;
            };

            if providers.by_class {
                continue;
            }

            let visible: Vec<_> = providers
                .by_interfaces
                .iter()
                .filter(|&&(interface, _)| self.is_visible(obligation.origin, interface))
                .collect();

            // A default overridden by a more derived interface is not a
            // candidate, only the most derived providers compete.
            let candidates: Vec<_> = visible
                .iter()
                .filter(|&&&(interface, _)| {
                    !visible.iter().any(|&&(other, _)| {
                        other != interface && self.bindings.linearize(other).contains(&interface)
                    })
                })
                .copied()
                .collect();

            match candidates[..] {
                [] => self.report_unimplemented(target, &obligation),
                [_] => {}
                _ => self.report_ambiguous(target, &obligation, &candidates),
            }
        }
    }

    /// Whether an interface's default implementation discharges an
    /// obligation that was declared abstract on `origin`.
    ///
    /// With `ProhibitInvisibleAbstractMethodsInSuperclasses` enabled the
    /// interface has to extend the originating classifier itself. Since
    /// interfaces never extend classes, class-originated obligations are
    /// never discharged by interface defaults in that mode.
    fn is_visible(&self, origin: DeclarationIndex, interface: DeclarationIndex) -> bool {
        if !self
            .session
            .features
            .is_enabled(Feature::ProhibitInvisibleAbstractMethodsInSuperclasses)
        {
            return true;
        }

        origin == interface || self.bindings.linearize(interface).contains(&origin)
    }

    fn report_unimplemented(&mut self, target: DeclarationIndex, obligation: &Obligation) {
        let subject = self.describe(target);
        let origin = self.describe(obligation.origin);

        let error = Diagnostic::error()
            .code(ErrorCode::AbstractMemberNotImplemented)
            .message(format!(
                "{subject} does not implement the abstract member ‘{}’",
                obligation.signature
            ))
            .unlabeled_span(self.bindings[target].anchor)
            .label(
                self.bindings[obligation.member].anchor,
                format!("declared abstract by {origin} here"),
            )
            .report(self.session.reporter);
        self.health.taint(error);
    }

    fn report_ambiguous(
        &mut self,
        target: DeclarationIndex,
        obligation: &Obligation,
        providers: &[&(DeclarationIndex, DeclarationIndex)],
    ) {
        let subject = self.describe(target);

        let error = Diagnostic::error()
            .code(ErrorCode::AmbiguousOverride)
            .message(format!(
                "{subject} inherits conflicting implementations of ‘{}’",
                obligation.signature
            ))
            .unlabeled_span(self.bindings[target].anchor)
            .with(|mut it| {
                for &&(interface, member) in providers {
                    let interface = self.describe(interface);
                    it = it.label(
                        self.bindings[member].anchor,
                        format!("implemented by {interface} here"),
                    );
                }
                it
            })
            .help(format!(
                "override ‘{}’ explicitly to disambiguate",
                obligation.signature
            ))
            .report(self.session.reporter);
        self.health.taint(error);
    }

    fn describe(&self, index: DeclarationIndex) -> String {
        match self.bindings[index].name {
            Some(name) => name.quote(),
            None => "this object expression".into(),
        }
    }

    fn check_decl(&mut self, decl: &ast::Decl) {
        match &decl.bare {
            BareDecl::Class(class) => {
                for member in &class.members {
                    self.check_decl(member);
                }
            }
            BareDecl::Object(object) => self.check_object(object),
            BareDecl::Function(function) => {
                if let Some(body) = &function.body {
                    self.check_expr(body);
                }
            }
            BareDecl::Property(property) => {
                if let Some(initializer) = &property.initializer {
                    self.check_expr(initializer);
                }
            }
            BareDecl::EnumEntry(_) => {}
        }
    }

    fn check_object(&mut self, object: &ast::Object) {
        for member in &object.members {
            self.check_decl(member);
        }
    }

    fn check_expr(&mut self, expr: &ast::Expr) {
        match &expr.bare {
            BareExpr::Path(_) | BareExpr::Number(_) | BareExpr::Text(_) => {}
            BareExpr::Call(call) => {
                self.check_expr(&call.callee);
                for argument in &call.arguments {
                    self.check_expr(argument);
                }
            }
            BareExpr::When(when) => {
                self.check_expr(&when.subject);

                for branch in &when.branches {
                    if let BareWhenCondition::Equality(operand) = &branch.condition.bare {
                        self.check_condition(operand);
                        self.check_expr(operand);
                    }
                    self.check_expr(&branch.body);
                }
            }
            BareExpr::Object(object) => self.check_object(object),
            BareExpr::Return(operand) => {
                if let Some(operand) = &**operand {
                    self.check_expr(operand);
                }
            }
            BareExpr::Block(block) => {
                for statement in &block.statements {
                    match statement {
                        Statement::Property(property) => {
                            if let Some(initializer) = &property.initializer {
                                self.check_expr(initializer);
                            }
                        }
                        Statement::Expression(expr) => self.check_expr(expr),
                    }
                }
            }
        }
    }

    /// An equality condition of a `when` branch has to reference a value.
    ///
    /// A path that resolves to a type is reported unless the type exposes a
    /// companion object, in which case the path denotes that value. `Any`
    /// and `Nothing` never denote values.
    fn check_condition(&mut self, operand: &ast::Expr) {
        let BareExpr::Path(_) = &operand.bare else {
            return;
        };
        // an unresolvable operand was already reported by the resolver
        let Some(target) = self.bindings.reference(operand.span) else {
            return;
        };
        let declaration = &self.bindings[target];

        match declaration.kind {
            DeclarationKind::Builtin(builtin @ (Builtin::Any | Builtin::Nothing)) => {
                let error = Diagnostic::error()
                    .code(ErrorCode::TypeMismatch)
                    .message(format!(
                        "the type ‘{}’ cannot be used as an equality condition",
                        builtin.name()
                    ))
                    .unlabeled_span(operand.span)
                    .note(format!("‘{}’ never denotes a value", builtin.name()))
                    .report(self.session.reporter);
                self.health.taint(error);
            }
            _ if declaration.is_type() && self.bindings.companion(target).is_none() => {
                let name = self.describe(target);
                let error = Diagnostic::error()
                    .code(ErrorCode::TypeMismatch)
                    .message(format!(
                        "the type {name} cannot be used as an equality condition"
                    ))
                    .unlabeled_span(operand.span)
                    .with(|it| match declaration.name {
                        Some(name) => it.help(format!("did you mean ‘is {name}’?")),
                        None => it,
                    })
                    .report(self.session.reporter);
                self.health.taint(error);
            }
            _ => {}
        }
    }
}
