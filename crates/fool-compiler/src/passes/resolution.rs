//! Scope Resolution Pass (Pass 1) - Bind every name to its declaration.
//!
//! This pass walks the tree once, in declaration order, keeping a stack of
//! frames. It allocates each declaration's offset and records, for every
//! use site, the entry it resolved to and the nesting level it was used at.
//!
//! ## Responsibilities
//!
//! - Allocate offsets: declarations `-2, -3, ...`, parameters `1, 2, ...`
//! - Build each class's type and virtual table, inheriting by copy
//! - Allocate field offsets and method slots, reusing them for overrides
//! - Record uses of identifiers, calls, qualified calls and `new`
//!
//! ## Frames
//!
//! ```text
//! level 0   globals: classes, then top-level declarations
//! level 1   class body (its virtual table) or a top-level function body
//! level 2   method body, or a function nested in a level 1 body
//! ...
//! ```
//!
//! Errors never stop the pass; a failed lookup just leaves the node
//! without a binding.

use fool_ast::{
    ClassDecl, Decl, Expr, FieldDecl, FunDecl, Ident, MethodCallExpr, MethodDecl, NewExpr, Param,
    Program, ProgramKind, TypeExpr, TypeExprKind,
};
use fool_core::{
    ArrowType, ClassType, CompilationError, DeclKind, MemberKind, NodeId, RefKind, Span,
    SymbolEntry, Type,
};
use rustc_hash::FxHashSet;
use tracing::{debug, trace};

use crate::class_table::{ClassInfo, ClassTable, VirtualTable};
use crate::scope::{Frame, ScopeStack};
use crate::tables::{Bindings, Use};

/// Nesting level of every class body.
const CLASS_LEVEL: u32 = 1;

/// First offset of a declaration in a block.
const FIRST_DECL_OFFSET: i32 = -2;

/// Output of the scope resolution pass.
#[derive(Debug, Default)]
pub struct ResolutionOutput {
    /// Entries and uses attached to the tree.
    pub bindings: Bindings,
    /// Every declared class with its virtual table.
    pub class_table: ClassTable,
    /// Number of declarations that produced an entry.
    pub declarations: usize,
    /// Number of resolved use sites.
    pub uses: usize,
    /// Collected errors (resolution continues past each one).
    pub errors: Vec<CompilationError>,
}

impl ResolutionOutput {
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Pass 1: resolve scopes and build the class table.
pub struct ResolutionPass {
    scopes: ScopeStack,
    classes: ClassTable,
    bindings: Bindings,
    /// Offset for the next declaration in the innermost block.
    decl_offset: i32,
    /// Class whose body is being resolved.
    current_class: Option<String>,
    declarations: usize,
    uses: usize,
    errors: Vec<CompilationError>,
}

impl Default for ResolutionPass {
    fn default() -> Self {
        Self::new()
    }
}

impl ResolutionPass {
    /// Create a new resolution pass.
    pub fn new() -> Self {
        Self {
            scopes: ScopeStack::new(),
            classes: ClassTable::new(),
            bindings: Bindings::new(),
            decl_offset: FIRST_DECL_OFFSET,
            current_class: None,
            declarations: 0,
            uses: 0,
            errors: Vec::new(),
        }
    }

    /// Run the pass over a program.
    pub fn run(mut self, program: &Program<'_>) -> ResolutionOutput {
        debug!(program = %program.id, "starting scope resolution");

        match program.kind {
            ProgramKind::LetIn {
                classes,
                decls,
                body,
            } => {
                for class in classes {
                    self.resolve_class(class);
                }
                for decl in decls {
                    self.resolve_decl(decl);
                }
                self.resolve_expr(body);
            }
            ProgramKind::Expr(body) => self.resolve_expr(body),
        }

        debug!(
            declarations = self.declarations,
            uses = self.uses,
            classes = self.classes.len(),
            errors = self.errors.len(),
            "scope resolution finished"
        );

        ResolutionOutput {
            bindings: self.bindings,
            class_table: self.classes,
            declarations: self.declarations,
            uses: self.uses,
            errors: self.errors,
        }
    }

    // ==========================================================================
    // Declarations
    // ==========================================================================

    fn resolve_decl(&mut self, decl: &Decl<'_>) {
        match decl {
            Decl::Var(var) => {
                let ty = self.resolve_type(&var.ty);
                // The initializer cannot see the variable itself.
                self.resolve_expr(var.init);
                let entry =
                    SymbolEntry::new(self.scopes.nesting_level(), ty, self.next_decl_offset());
                self.declare(var.id, &var.name, DeclKind::Variable, entry);
            }
            Decl::Fun(fun) => self.resolve_fun(fun),
        }
    }

    fn resolve_fun(&mut self, fun: &FunDecl<'_>) {
        let arrow = self.signature(fun.params, &fun.ret);
        let params = arrow.params.clone();
        let entry = SymbolEntry::new(
            self.scopes.nesting_level(),
            Type::Arrow(arrow),
            self.next_decl_offset(),
        );
        // Declared before the body, so the function can call itself.
        self.declare(fun.id, &fun.name, DeclKind::Function, entry);
        self.resolve_body(fun.params, &params, fun.decls, fun.body);
    }

    /// Resolve a function or method body in a fresh frame.
    fn resolve_body(
        &mut self,
        params: &[Param<'_>],
        param_types: &[Type],
        decls: &[Decl<'_>],
        body: &Expr<'_>,
    ) {
        self.scopes.push_frame();
        let saved_offset = std::mem::replace(&mut self.decl_offset, FIRST_DECL_OFFSET);
        let level = self.scopes.nesting_level();

        for (offset, (param, ty)) in (1..).zip(params.iter().zip(param_types)) {
            let entry = SymbolEntry::new(level, ty.clone(), offset);
            self.declare(param.id, &param.name, DeclKind::Parameter, entry);
        }
        for decl in decls {
            self.resolve_decl(decl);
        }
        self.resolve_expr(body);

        self.decl_offset = saved_offset;
        self.scopes.pop_frame();
    }

    fn signature(&mut self, params: &[Param<'_>], ret: &TypeExpr<'_>) -> ArrowType {
        let params = params.iter().map(|p| self.resolve_type(&p.ty)).collect();
        ArrowType::new(params, self.resolve_type(ret))
    }

    fn declare(&mut self, id: NodeId, name: &Ident<'_>, kind: DeclKind, entry: SymbolEntry) {
        trace!(
            name = name.name,
            kind = kind.as_str(),
            level = entry.nesting_level,
            offset = entry.offset,
            "declared"
        );
        if self.scopes.insert(name.name, entry.clone()).is_some() {
            self.errors.push(CompilationError::DuplicateDeclaration {
                kind,
                name: name.name.to_string(),
                span: name.span,
            });
        }
        self.bindings.decls.insert(id, entry);
        self.declarations += 1;
    }

    fn next_decl_offset(&mut self) -> i32 {
        let offset = self.decl_offset;
        self.decl_offset -= 1;
        offset
    }

    fn resolve_type(&mut self, ty: &TypeExpr<'_>) -> Type {
        match ty.kind {
            TypeExprKind::Int => Type::Int,
            TypeExprKind::Bool => Type::Bool,
            TypeExprKind::Class(name) => {
                if !self.classes.contains(name) {
                    self.unresolved(RefKind::Class, name, ty.span);
                }
                Type::reference(name)
            }
        }
    }

    // ==========================================================================
    // Classes
    // ==========================================================================

    fn resolve_class(&mut self, class: &ClassDecl<'_>) {
        let name = class.name.name;
        let mut class_type = ClassType::new();
        let mut members = Frame::default();
        let mut superclass = None;

        if let Some(sup) = &class.superclass {
            match self.classes.get(sup.name) {
                Some(parent) => {
                    if let Some(parent_type) = parent.class_type() {
                        class_type = parent_type.clone();
                    }
                    members = parent.virtual_table.to_frame();
                    superclass = Some(sup.name.to_string());
                }
                None => self.unresolved(RefKind::Superclass, sup.name, sup.span),
            }
        }

        // Visible by name from here on, complete only once the body is done.
        let entry = SymbolEntry::new(0, Type::Incomplete, self.next_decl_offset());
        trace!(class = name, offset = entry.offset, "declared class");
        if self.scopes.lookup_global(name).is_some() {
            self.errors.push(CompilationError::DuplicateDeclaration {
                kind: DeclKind::Class,
                name: name.to_string(),
                span: class.name.span,
            });
        }
        self.scopes.set_global(name, entry.clone());

        self.classes.hierarchy_mut().remove_parent(name);
        if let Some(parent) = &superclass {
            let linked = self
                .classes
                .hierarchy_mut()
                .set_parent(name, parent, class.span);
            if let Err(err) = linked {
                self.errors.push(err);
                superclass = None;
            }
        }
        self.classes.declare(
            name,
            ClassInfo {
                entry: entry.clone(),
                superclass,
                virtual_table: VirtualTable::new(),
            },
        );

        let enclosing_class = self.current_class.replace(name.to_string());
        self.scopes.push_frame_with(members);
        self.resolve_fields(name, class.fields, &mut class_type);
        self.resolve_methods(name, class.methods, &mut class_type);
        let members = self.scopes.pop_frame().unwrap_or_default();
        self.current_class = enclosing_class;

        debug!(
            class = name,
            fields = class_type.fields.len(),
            methods = class_type.methods.len(),
            "resolved class"
        );

        let completed = SymbolEntry::new(0, Type::Class(class_type), entry.offset);
        self.scopes.set_global(name, completed.clone());
        self.classes
            .complete(name, completed.clone(), VirtualTable::from(members));
        self.bindings.decls.insert(class.id, completed);
        self.declarations += 1;
    }

    fn resolve_fields(&mut self, class: &str, fields: &[FieldDecl<'_>], class_type: &mut ClassType) {
        let level = self.scopes.nesting_level();
        let mut next_offset = -(class_type.fields.len() as i32) - 1;
        let mut seen = FxHashSet::default();

        for field in fields {
            let name = field.name.name;
            if !seen.insert(name) {
                self.duplicate_member(class, MemberKind::Field, &field.name);
            }
            let ty = self.resolve_type(&field.ty);

            let entry = match self.scopes.lookup_local(name) {
                Some(existing) if existing.is_method() => {
                    self.errors.push(CompilationError::MemberKindConflict {
                        class: class.to_string(),
                        kind: MemberKind::Field,
                        existing: MemberKind::Method,
                        name: name.to_string(),
                        span: field.name.span,
                    });
                    continue;
                }
                // Override: keep the inherited offset.
                Some(existing) => existing.overridden_by(level, ty.clone()),
                None => {
                    let entry = SymbolEntry::new(level, ty.clone(), next_offset);
                    next_offset -= 1;
                    entry
                }
            };

            trace!(class, field = name, offset = entry.offset, "declared field");
            class_type.set_field(entry.offset, ty);
            self.scopes.insert(name, entry.clone());
            self.bindings.decls.insert(field.id, entry);
            self.declarations += 1;
        }
    }

    fn resolve_methods(
        &mut self,
        class: &str,
        methods: &[MethodDecl<'_>],
        class_type: &mut ClassType,
    ) {
        let level = self.scopes.nesting_level();
        let mut next_slot = class_type.methods.len() as i32;
        let mut seen = FxHashSet::default();

        for method in methods {
            let name = method.name.name;
            if !seen.insert(name) {
                self.duplicate_member(class, MemberKind::Method, &method.name);
            }
            let arrow = self.signature(method.params, &method.ret);

            let entry = match self.scopes.lookup_local(name) {
                Some(existing) if !existing.is_method() => {
                    self.errors.push(CompilationError::MemberKindConflict {
                        class: class.to_string(),
                        kind: MemberKind::Method,
                        existing: MemberKind::Field,
                        name: name.to_string(),
                        span: method.name.span,
                    });
                    None
                }
                // Override: keep the inherited slot.
                Some(existing) => Some(existing.overridden_by(level, Type::Method(arrow.clone()))),
                None => {
                    let entry = SymbolEntry::new(level, Type::Method(arrow.clone()), next_slot);
                    next_slot += 1;
                    Some(entry)
                }
            };

            if let Some(entry) = entry {
                trace!(class, method = name, slot = entry.offset, "declared method");
                class_type.set_method(entry.offset, arrow.clone());
                self.scopes.insert(name, entry.clone());
                self.bindings.decls.insert(method.id, entry);
                self.declarations += 1;
            }

            self.resolve_body(method.params, &arrow.params, method.decls, method.body);
        }
    }

    fn duplicate_member(&mut self, class: &str, kind: MemberKind, name: &Ident<'_>) {
        self.errors.push(CompilationError::DuplicateMember {
            class: class.to_string(),
            kind,
            name: name.name.to_string(),
            span: name.span,
        });
    }

    // ==========================================================================
    // Expressions
    // ==========================================================================

    fn resolve_expr(&mut self, expr: &Expr<'_>) {
        match expr {
            Expr::Int(_) | Expr::Bool(_) | Expr::Null(_) => {}
            Expr::Ident(ident) => {
                self.resolve_use(ident.id, ident.name, ident.span, RefKind::Identifier);
            }
            Expr::Binary(binary) => {
                self.resolve_expr(binary.left);
                self.resolve_expr(binary.right);
            }
            Expr::Not(not) => self.resolve_expr(not.operand),
            Expr::If(cond) => {
                self.resolve_expr(cond.condition);
                self.resolve_expr(cond.then_branch);
                self.resolve_expr(cond.else_branch);
            }
            Expr::Print(print) => self.resolve_expr(print.value),
            Expr::Call(call) => {
                self.resolve_use(call.id, call.callee.name, call.callee.span, RefKind::Function);
                self.resolve_args(call.args);
            }
            Expr::MethodCall(call) => {
                self.resolve_method_call(call);
                self.resolve_args(call.args);
            }
            Expr::New(new) => {
                self.resolve_new(new);
                self.resolve_args(new.args);
            }
        }
    }

    fn resolve_args(&mut self, args: &[Expr<'_>]) {
        for arg in args {
            self.resolve_expr(arg);
        }
    }

    /// Bind a use site to the innermost declaration of `name`.
    fn resolve_use(
        &mut self,
        id: NodeId,
        name: &str,
        span: Span,
        kind: RefKind,
    ) -> Option<SymbolEntry> {
        let Some(entry) = self.scopes.lookup(name).cloned() else {
            self.unresolved(kind, name, span);
            return None;
        };
        let nesting_level = self.scopes.nesting_level();
        trace!(
            name,
            level = nesting_level,
            declared_at = entry.nesting_level,
            "resolved use"
        );
        self.bindings.uses.insert(
            id,
            Use {
                entry: entry.clone(),
                nesting_level,
            },
        );
        self.uses += 1;
        Some(entry)
    }

    fn resolve_method_call(&mut self, call: &MethodCallExpr<'_>) {
        let receiver = call.receiver;
        let Some(entry) =
            self.resolve_use(call.id, receiver.name, receiver.span, RefKind::Identifier)
        else {
            return;
        };
        let Type::Ref(class) = &entry.ty else {
            self.errors.push(CompilationError::NotAnObject {
                name: receiver.name.to_string(),
                span: receiver.span,
            });
            return;
        };

        match self.lookup_method(class, call.method.name) {
            Some(method) => self.bindings.methods.insert(call.id, method),
            None => self.errors.push(CompilationError::UnknownMethod {
                object: receiver.name.to_string(),
                class: class.clone(),
                method: call.method.name.to_string(),
                span: call.method.span,
            }),
        }
    }

    /// Method `method` of `class`. Inside the class's own body the virtual
    /// table is still being built, so it is read from the class frame.
    fn lookup_method(&self, class: &str, method: &str) -> Option<SymbolEntry> {
        let entry = if self.current_class.as_deref() == Some(class) {
            self.scopes.lookup_at(CLASS_LEVEL, method)
        } else {
            self.classes
                .virtual_table(class)
                .and_then(|vt| vt.get(method))
        };
        entry.filter(|entry| entry.is_method()).cloned()
    }

    fn resolve_new(&mut self, new: &NewExpr<'_>) {
        let class = new.class.name;
        if self.classes.contains(class) {
            self.bindings.classes.insert(new.id, class.to_string());
        } else {
            self.unresolved(RefKind::Class, class, new.class.span);
        }
    }

    fn unresolved(&mut self, kind: RefKind, name: &str, span: Span) {
        self.errors.push(CompilationError::Unresolved {
            kind,
            name: name.to_string(),
            span,
        });
    }
}
