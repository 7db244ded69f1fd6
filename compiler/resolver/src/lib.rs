//! The name resolver.
//!
//! Builds a declaration record for every declaration of a file, resolves
//! supertype and expression references through the lexical scope chain and
//! computes the deterministic supertype linearization the checkers operate
//! on.
//!
//! Unresolvable references are contained findings: they are reported at the
//! reference's span and analysis of the rest of the file continues.

use ast::{BareDecl, BareExpr, BareWhenCondition, ClassKind, Statement};
use diagnostics::{
    error::{Health, Outcome},
    Diagnostic, ErrorCode,
};
use session::Session;
use span::{Span, Spanning};
use std::{fmt, mem};
use utility::{
    index_map::{Index, IndexMap},
    Atom, HashMap, QuoteExt,
};

#[cfg(test)]
mod test;

pub fn resolve(file: &ast::File, session: &Session<'_>) -> Outcome<Bindings> {
    let mut resolver = Resolver::new(session);
    resolver.collect_file(file);
    resolver.check_conflicts();
    resolver.resolve_supertypes();
    resolver.resolve_references();
    Outcome::new(resolver.bindings, resolver.health)
}

/// The declarations of a file together with the resolved references.
pub struct Bindings {
    declarations: IndexMap<DeclarationIndex, Declaration>,
    top_level: Vec<DeclarationIndex>,
    /// Path expression span to resolution target.
    references: HashMap<Span, DeclarationIndex>,
    builtins: HashMap<Atom, DeclarationIndex>,
}

impl Bindings {
    fn new() -> Self {
        let mut declarations = IndexMap::new();
        let mut builtins = HashMap::default();

        for builtin in [
            Builtin::Any,
            Builtin::Nothing,
            Builtin::Int,
            Builtin::String,
            Builtin::Boolean,
            Builtin::Unit,
        ] {
            let name = Atom::from(builtin.name());
            let index = declarations.insert(Declaration {
                name: Some(name),
                kind: DeclarationKind::Builtin(builtin),
                is_abstract: false,
                is_sealed: false,
                anchor: Span::default(),
                owner: None,
                members: Vec::new(),
                supertypes: Vec::new(),
            });
            builtins.insert(name, index);
        }

        Self {
            declarations,
            top_level: Vec::new(),
            references: HashMap::default(),
            builtins,
        }
    }

    pub fn indices(&self) -> impl Iterator<Item = DeclarationIndex> + '_ {
        self.declarations.indices()
    }

    pub fn top_level(&self) -> &[DeclarationIndex] {
        &self.top_level
    }

    /// The resolution target of the path expression at the given span.
    pub fn reference(&self, span: Span) -> Option<DeclarationIndex> {
        self.references.get(&span).copied()
    }

    fn builtin(&self, name: Atom) -> Option<DeclarationIndex> {
        self.builtins.get(&name).copied()
    }

    /// The linearized supertype chain of the given declaration.
    ///
    /// Depth-first over the declared supertypes, class supertype before
    /// interfaces, repeated ancestors deduplicated keeping the first
    /// occurrence. The declaration itself is not part of the chain.
    pub fn linearize(&self, index: DeclarationIndex) -> Vec<DeclarationIndex> {
        let mut chain = Vec::new();
        self.linearize_into(index, &mut chain);
        chain
    }

    fn linearize_into(&self, index: DeclarationIndex, chain: &mut Vec<DeclarationIndex>) {
        let supertypes = &self[index].supertypes;

        let classes = supertypes
            .iter()
            .copied()
            .filter(|&supertype| !self[supertype].is_interface());
        let interfaces = supertypes
            .iter()
            .copied()
            .filter(|&supertype| self[supertype].is_interface());

        for supertype in classes.chain(interfaces) {
            if !chain.contains(&supertype) {
                chain.push(supertype);
                self.linearize_into(supertype, chain);
            }
        }
    }

    /// The companion object of a classifier, if any.
    pub fn companion(&self, index: DeclarationIndex) -> Option<DeclarationIndex> {
        self[index].members.iter().copied().find(|&member| {
            matches!(
                self[member].kind,
                DeclarationKind::Object { is_companion: true }
            )
        })
    }
}

impl std::ops::Index<DeclarationIndex> for Bindings {
    type Output = Declaration;

    fn index(&self, index: DeclarationIndex) -> &Self::Output {
        &self.declarations[index]
    }
}

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct DeclarationIndex(usize);

impl Index for DeclarationIndex {
    fn new(index: usize) -> Self {
        Self(index)
    }

    fn value(self) -> usize {
        self.0
    }
}

/// A resolved declaration record.
///
/// Created during resolution, immutable afterwards.
#[derive(Debug)]
pub struct Declaration {
    /// `None` for anonymous objects and unnamed companion objects.
    pub name: Option<Atom>,
    pub kind: DeclarationKind,
    pub is_abstract: bool,
    pub is_sealed: bool,
    /// The diagnostic anchor: the name span or, for anonymous objects, the
    /// span of the `object` keyword.
    pub anchor: Span,
    pub owner: Option<DeclarationIndex>,
    pub members: Vec<DeclarationIndex>,
    /// Resolved direct supertypes in declaration order.
    pub supertypes: Vec<DeclarationIndex>,
}

impl Declaration {
    pub fn is_type(&self) -> bool {
        matches!(
            self.kind,
            DeclarationKind::Class(_) | DeclarationKind::Builtin(_)
        )
    }

    pub fn is_interface(&self) -> bool {
        matches!(self.kind, DeclarationKind::Class(ClassKind::Interface))
    }

    /// Whether the abstract-member checker has to verify this declaration.
    pub fn requires_implementations(&self) -> bool {
        match self.kind {
            DeclarationKind::Class(ClassKind::Class | ClassKind::Enum) => {
                !self.is_abstract && !self.is_sealed
            }
            DeclarationKind::Object { .. } => true,
            _ => false,
        }
    }

    /// The override signature of a member declaration.
    pub fn signature(&self) -> Option<Signature> {
        let name = self.name?;

        match self.kind {
            DeclarationKind::Function { arity } => Some(Signature {
                name,
                arity: Some(arity),
            }),
            DeclarationKind::Property => Some(Signature { name, arity: None }),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DeclarationKind {
    Class(ClassKind),
    Object { is_companion: bool },
    Function { arity: usize },
    Property,
    EnumEntry,
    Parameter,
    Builtin(Builtin),
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Builtin {
    Any,
    Nothing,
    Int,
    String,
    Boolean,
    Unit,
}

impl Builtin {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Any => "Any",
            Self::Nothing => "Nothing",
            Self::Int => "Int",
            Self::String => "String",
            Self::Boolean => "Boolean",
            Self::Unit => "Unit",
        }
    }
}

/// A member signature as compared for overriding and obligations.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Signature {
    pub name: Atom,
    /// `None` for properties.
    pub arity: Option<usize>,
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.arity {
            Some(_) => write!(f, "{}()", self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
enum Namespace {
    Type,
    Value,
}

struct SupertypeJob {
    class: DeclarationIndex,
    name: Atom,
    span: Span,
}

struct ReferenceJob {
    scope: Option<DeclarationIndex>,
    namespace: Namespace,
    /// The span of the whole path, the key into [`Bindings::references`].
    span: Span,
    segments: Vec<(Atom, Span)>,
}

struct Resolver<'a> {
    bindings: Bindings,
    session: &'a Session<'a>,
    supertype_jobs: Vec<SupertypeJob>,
    reference_jobs: Vec<ReferenceJob>,
    health: Health,
}

impl<'a> Resolver<'a> {
    fn new(session: &'a Session<'a>) -> Self {
        Self {
            bindings: Bindings::new(),
            session,
            supertype_jobs: Vec::new(),
            reference_jobs: Vec::new(),
            health: Health::Untainted,
        }
    }

    fn collect_file(&mut self, file: &ast::File) {
        for decl in &file.decls {
            let index = self.collect_decl(decl, None);
            self.bindings.top_level.push(index);
        }
    }

    fn collect_decl(&mut self, decl: &ast::Decl, owner: Option<DeclarationIndex>) -> DeclarationIndex {
        match &decl.bare {
            BareDecl::Class(class) => {
                let index = self.insert(Declaration {
                    name: Some(class.name.bare()),
                    kind: DeclarationKind::Class(class.kind),
                    is_abstract: class.modifiers.is_abstract()
                        || class.kind == ClassKind::Interface,
                    is_sealed: class.modifiers.sealed.is_some(),
                    anchor: class.name.span(),
                    owner,
                    members: Vec::new(),
                    supertypes: Vec::new(),
                });

                for supertype in &class.supertypes {
                    self.supertype_jobs.push(SupertypeJob {
                        class: index,
                        name: supertype.name.bare(),
                        span: supertype.name.span(),
                    });
                }

                let mut members = Vec::new();
                for member in &class.members {
                    members.push(self.collect_decl(member, Some(index)));
                }
                self.bindings.declarations[index].members = members;

                index
            }
            BareDecl::Object(object) => self.collect_object(object, owner),
            BareDecl::Function(function) => {
                let owner_is_interface = self.owner_is_interface(owner);

                let index = self.insert(Declaration {
                    name: Some(function.name.bare()),
                    kind: DeclarationKind::Function {
                        arity: function.parameters.len(),
                    },
                    is_abstract: function.modifiers.is_abstract()
                        || (owner_is_interface && function.body.is_none()),
                    is_sealed: false,
                    anchor: function.name.span(),
                    owner,
                    members: Vec::new(),
                    supertypes: Vec::new(),
                });

                let mut members = Vec::new();
                for parameter in &function.parameters {
                    members.push(self.insert(Declaration {
                        name: Some(parameter.name.bare()),
                        kind: DeclarationKind::Parameter,
                        is_abstract: false,
                        is_sealed: false,
                        anchor: parameter.name.span(),
                        owner: Some(index),
                        members: Vec::new(),
                        supertypes: Vec::new(),
                    }));
                    self.push_type_reference(Some(index), parameter.type_);
                }
                self.bindings.declarations[index].members = members;

                if let Some(return_type) = function.return_type {
                    self.push_type_reference(Some(index), return_type);
                }

                if let Some(body) = &function.body {
                    self.walk_expr(body, Some(index));
                }

                index
            }
            BareDecl::Property(property) => self.collect_property(property, owner),
            BareDecl::EnumEntry(entry) => self.insert(Declaration {
                name: Some(entry.name.bare()),
                kind: DeclarationKind::EnumEntry,
                is_abstract: false,
                is_sealed: false,
                anchor: entry.name.span(),
                owner,
                members: Vec::new(),
                supertypes: Vec::new(),
            }),
        }
    }

    fn collect_object(
        &mut self,
        object: &ast::Object,
        owner: Option<DeclarationIndex>,
    ) -> DeclarationIndex {
        let index = self.insert(Declaration {
            name: object.name.map(ast::Identifier::bare),
            kind: DeclarationKind::Object {
                is_companion: object.is_companion,
            },
            is_abstract: false,
            is_sealed: false,
            anchor: object
                .name
                .map_or(object.keyword_span, |name| name.span()),
            owner,
            members: Vec::new(),
            supertypes: Vec::new(),
        });

        for supertype in &object.supertypes {
            self.supertype_jobs.push(SupertypeJob {
                class: index,
                name: supertype.name.bare(),
                span: supertype.name.span(),
            });
        }

        let mut members = Vec::new();
        for member in &object.members {
            members.push(self.collect_decl(member, Some(index)));
        }
        self.bindings.declarations[index].members = members;

        index
    }

    fn collect_property(
        &mut self,
        property: &ast::Property,
        owner: Option<DeclarationIndex>,
    ) -> DeclarationIndex {
        let owner_is_interface = self.owner_is_interface(owner);

        let index = self.insert(Declaration {
            name: Some(property.name.bare()),
            kind: DeclarationKind::Property,
            is_abstract: property.modifiers.is_abstract()
                || (owner_is_interface && property.initializer.is_none()),
            is_sealed: false,
            anchor: property.name.span(),
            owner,
            members: Vec::new(),
            supertypes: Vec::new(),
        });

        if let Some(type_) = property.type_ {
            self.push_type_reference(owner, type_);
        }

        if let Some(initializer) = &property.initializer {
            self.walk_expr(initializer, owner);
        }

        index
    }

    fn walk_expr(&mut self, expr: &ast::Expr, scope: Option<DeclarationIndex>) {
        match &expr.bare {
            BareExpr::Path(path) => self.reference_jobs.push(ReferenceJob {
                scope,
                namespace: Namespace::Value,
                span: expr.span,
                segments: path
                    .segments
                    .iter()
                    .map(|segment| (segment.bare(), segment.span()))
                    .collect(),
            }),
            BareExpr::Number(_) | BareExpr::Text(_) => {}
            BareExpr::Call(call) => {
                self.walk_expr(&call.callee, scope);
                for argument in &call.arguments {
                    self.walk_expr(argument, scope);
                }
            }
            BareExpr::When(when) => {
                self.walk_expr(&when.subject, scope);

                for branch in &when.branches {
                    match &branch.condition.bare {
                        BareWhenCondition::TypeTest(type_) => {
                            self.push_type_reference(scope, *type_);
                        }
                        BareWhenCondition::Equality(operand) => self.walk_expr(operand, scope),
                        BareWhenCondition::Else => {}
                    }

                    self.walk_expr(&branch.body, scope);
                }
            }
            BareExpr::Object(object) => {
                self.collect_object(object, scope);
            }
            BareExpr::Return(operand) => {
                if let Some(operand) = &**operand {
                    self.walk_expr(operand, scope);
                }
            }
            BareExpr::Block(block) => {
                for statement in &block.statements {
                    match statement {
                        Statement::Property(property) => {
                            let index = self.collect_property(property, scope);
                            self.attach(scope, index);
                        }
                        Statement::Expression(expr) => self.walk_expr(expr, scope),
                    }
                }
            }
        }
    }

    fn push_type_reference(&mut self, scope: Option<DeclarationIndex>, name: ast::Identifier) {
        self.reference_jobs.push(ReferenceJob {
            scope,
            namespace: Namespace::Type,
            span: name.span(),
            segments: vec![(name.bare(), name.span())],
        });
    }

    fn attach(&mut self, scope: Option<DeclarationIndex>, member: DeclarationIndex) {
        match scope {
            Some(scope) => self.bindings.declarations[scope].members.push(member),
            None => self.bindings.top_level.push(member),
        }
    }

    fn owner_is_interface(&self, owner: Option<DeclarationIndex>) -> bool {
        owner.map_or(false, |owner| self.bindings[owner].is_interface())
    }

    fn insert(&mut self, declaration: Declaration) -> DeclarationIndex {
        self.bindings.declarations.insert(declaration)
    }

    /// Report conflicting declarations within every scope.
    ///
    /// Classifiers conflict by name, callables by signature. The first
    /// declaration wins, every further one is reported at its own span.
    fn check_conflicts(&mut self) {
        let mut scopes = vec![self.bindings.top_level.clone()];
        scopes.extend(
            self.bindings
                .declarations
                .values()
                .map(|declaration| declaration.members.clone()),
        );

        for scope in scopes {
            let mut seen: HashMap<(Atom, Namespace, Option<usize>), Span> = HashMap::default();

            for index in scope {
                let declaration = &self.bindings[index];
                let Some(name) = declaration.name else {
                    continue;
                };

                let key = match declaration.kind {
                    DeclarationKind::Class(_)
                    | DeclarationKind::Object { .. }
                    | DeclarationKind::Builtin(_) => (name, Namespace::Type, None),
                    DeclarationKind::Function { arity } => (name, Namespace::Value, Some(arity)),
                    DeclarationKind::Property
                    | DeclarationKind::EnumEntry
                    | DeclarationKind::Parameter => (name, Namespace::Value, None),
                };

                let anchor = declaration.anchor;

                match seen.get(&key) {
                    Some(&previous) => {
                        let error = Diagnostic::error()
                            .code(ErrorCode::ConflictingDeclarations)
                            .message(format!("conflicting declarations of ‘{name}’"))
                            .unlabeled_span(anchor)
                            .label(previous, "previously declared here")
                            .report(self.session.reporter);
                        self.health.taint(error);
                    }
                    None => {
                        seen.insert(key, anchor);
                    }
                }
            }
        }
    }

    fn resolve_supertypes(&mut self) {
        for job in mem::take(&mut self.supertype_jobs) {
            let scope = self.bindings[job.class].owner;

            match self.lookup(scope, job.name, Namespace::Type) {
                Some(target) => {
                    self.bindings.declarations[job.class].supertypes.push(target);
                }
                None => {
                    let error = Diagnostic::error()
                        .code(ErrorCode::UnresolvedReference)
                        .message(format!("cannot resolve the reference ‘{}’", job.name))
                        .unlabeled_span(job.span)
                        .report(self.session.reporter);
                    self.health.taint(error);
                }
            }
        }
    }

    fn resolve_references(&mut self) {
        for job in mem::take(&mut self.reference_jobs) {
            let (head_name, head_span) = job.segments[0];

            let Some(mut current) = self.lookup(job.scope, head_name, job.namespace) else {
                let error = Diagnostic::error()
                    .code(ErrorCode::UnresolvedReference)
                    .message(format!("cannot resolve the reference ‘{head_name}’"))
                    .unlabeled_span(head_span)
                    .report(self.session.reporter);
                self.health.taint(error);
                continue;
            };

            let mut resolved = true;

            for &(name, span) in &job.segments[1..] {
                match self.lookup_member(current, name) {
                    Some(next) => current = next,
                    None => {
                        let owner = self.bindings[current]
                            .name
                            .map_or_else(|| "this declaration".into(), QuoteExt::quote);

                        let error = Diagnostic::error()
                            .code(ErrorCode::UnresolvedReference)
                            .message(format!("‘{name}’ is not a member of {owner}"))
                            .unlabeled_span(span)
                            .report(self.session.reporter);
                        self.health.taint(error);
                        resolved = false;
                        break;
                    }
                }
            }

            if resolved {
                self.bindings.references.insert(job.span, current);
            }
        }
    }

    /// Look up a name through the lexical scope chain, innermost scope
    /// first, falling back to the built-in types.
    fn lookup(
        &self,
        mut scope: Option<DeclarationIndex>,
        name: Atom,
        namespace: Namespace,
    ) -> Option<DeclarationIndex> {
        loop {
            let members = match scope {
                Some(index) => &self.bindings[index].members,
                None => &self.bindings.top_level,
            };

            if let Some(found) = self.select(members, name, namespace) {
                return Some(found);
            }

            match scope {
                Some(index) => scope = self.bindings[index].owner,
                None => break,
            }
        }

        self.bindings.builtin(name)
    }

    fn select(
        &self,
        members: &[DeclarationIndex],
        name: Atom,
        namespace: Namespace,
    ) -> Option<DeclarationIndex> {
        let candidates: Vec<_> = members
            .iter()
            .copied()
            .filter(|&member| self.bindings[member].name == Some(name))
            .collect();

        match namespace {
            Namespace::Type => candidates
                .into_iter()
                .find(|&member| self.bindings[member].is_type()),
            // Values shadow classifiers of the same name.
            Namespace::Value => candidates
                .iter()
                .copied()
                .find(|&member| !self.bindings[member].is_type())
                .or_else(|| candidates.into_iter().next()),
        }
    }

    /// Look up a member of a declaration, searching its companion object as
    /// a fallback for classifiers.
    fn lookup_member(&self, owner: DeclarationIndex, name: Atom) -> Option<DeclarationIndex> {
        self.select(&self.bindings[owner].members, name, Namespace::Value)
            .or_else(|| {
                let companion = self.bindings.companion(owner)?;
                self.select(&self.bindings[companion].members, name, Namespace::Value)
            })
    }
}
