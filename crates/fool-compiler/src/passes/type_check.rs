//! Type Checking Pass (Pass 2) - Validate every expression and declaration.
//!
//! This pass walks the resolved tree, computing the type of every
//! expression from the bindings produced by scope resolution and checking
//! it against [`type_rels`](crate::type_rels).
//!
//! ## Error recovery
//!
//! Every declaration (class member, top-level or local declaration) is
//! checked on its own: an error inside one is recorded and checking
//! continues with the next. The main expression is checked last.
//!
//! A type that is still incomplete is not an error of the node being
//! checked; the check is abandoned quietly.

use fool_ast::{
    BinaryExpr, CallExpr, ClassDecl, Decl, Expr, MethodCallExpr, MethodDecl, NewExpr,
    OperatorClass, Program, ProgramKind,
};
use fool_core::{ArrowType, CompilationError, NodeId, Span, SymbolEntry, Type};
use tracing::{debug, trace};

use crate::class_table::ClassTable;
use crate::tables::Bindings;
use crate::type_rels::{is_subtype, lowest_common_ancestor};

/// Why checking a node stopped.
#[derive(Debug)]
enum Failure {
    /// A type involved is still incomplete; nothing to report.
    Incomplete,
    /// A type rule was violated.
    Error(CompilationError),
}

impl From<CompilationError> for Failure {
    fn from(err: CompilationError) -> Self {
        Failure::Error(err)
    }
}

type CheckResult<T> = Result<T, Failure>;

/// Output of the type checking pass.
#[derive(Debug, Default)]
pub struct TypeCheckOutput {
    /// Type of the main expression, if it checked.
    pub program_type: Option<Type>,
    /// Number of declarations checked, successfully or not.
    pub declarations_checked: usize,
    /// Number of checks abandoned because a type was incomplete.
    pub incomplete: usize,
    /// Collected errors.
    pub errors: Vec<CompilationError>,
}

impl TypeCheckOutput {
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Pass 2: type check a resolved program.
pub struct TypeCheckPass<'a> {
    bindings: &'a Bindings,
    classes: &'a ClassTable,
    declarations_checked: usize,
    incomplete: usize,
    errors: Vec<CompilationError>,
}

impl<'a> TypeCheckPass<'a> {
    /// Create a new type checking pass over the output of scope resolution.
    pub fn new(bindings: &'a Bindings, classes: &'a ClassTable) -> Self {
        Self {
            bindings,
            classes,
            declarations_checked: 0,
            incomplete: 0,
            errors: Vec::new(),
        }
    }

    /// Run the pass over a program.
    pub fn run(mut self, program: &Program<'_>) -> TypeCheckOutput {
        debug!(program = %program.id, "starting type check");

        let body = match program.kind {
            ProgramKind::LetIn {
                classes,
                decls,
                body,
            } => {
                for class in classes {
                    self.check_class(class);
                }
                self.check_decls(decls);
                body
            }
            ProgramKind::Expr(body) => body,
        };

        let checked = self.check_expr(body);
        let program_type = self.settle(checked);

        debug!(
            declarations = self.declarations_checked,
            incomplete = self.incomplete,
            errors = self.errors.len(),
            "type check finished"
        );

        TypeCheckOutput {
            program_type,
            declarations_checked: self.declarations_checked,
            incomplete: self.incomplete,
            errors: self.errors,
        }
    }

    /// Record the outcome of one independent check.
    fn settle<T>(&mut self, result: CheckResult<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(Failure::Error(err)) => {
                trace!(error = %err, "type error");
                self.errors.push(err);
                None
            }
            Err(Failure::Incomplete) => {
                trace!("check abandoned on incomplete type");
                self.incomplete += 1;
                None
            }
        }
    }

    // ==========================================================================
    // Declarations
    // ==========================================================================

    fn check_decls(&mut self, decls: &[Decl<'_>]) {
        for decl in decls {
            let result = self.check_decl(decl);
            self.settle(result);
            self.declarations_checked += 1;
        }
    }

    fn check_decl(&mut self, decl: &Decl<'_>) -> CheckResult<()> {
        match decl {
            Decl::Var(var) => {
                let declared = self.decl_entry(var.id)?.ty.clone();
                let init = self.check_expr(var.init)?;
                if !self.subtype(&init, &declared) {
                    return Err(CompilationError::type_mismatch(
                        format!("Incompatible value for variable {}", var.name.name),
                        var.span,
                    )
                    .into());
                }
                Ok(())
            }
            Decl::Fun(fun) => {
                let arrow = self.callable(fun.id)?;
                self.check_decls(fun.decls);
                let body = self.check_expr(fun.body)?;
                if !self.subtype(&body, &arrow.ret) {
                    return Err(CompilationError::type_mismatch(
                        format!("Wrong return type for function {}", fun.name.name),
                        fun.span,
                    )
                    .into());
                }
                Ok(())
            }
        }
    }

    fn check_class(&mut self, class: &ClassDecl<'_>) {
        for method in class.methods {
            let result = self.check_method(method);
            self.settle(result);
            self.declarations_checked += 1;
        }

        let (bindings, classes) = (self.bindings, self.classes);
        let Some(parent) = classes
            .get(class.name.name)
            .and_then(|info| info.superclass.as_deref())
            .and_then(|name| classes.class_type(name))
        else {
            return;
        };

        for field in class.fields {
            let Some(entry) = bindings.decls.get(field.id) else {
                continue;
            };
            let Some(inherited) = parent.field_at(entry.offset) else {
                continue;
            };
            if !self.subtype(&entry.ty, inherited) {
                self.errors.push(CompilationError::type_mismatch(
                    format!("Wrong type for field {} overriding", field.name.name),
                    field.span,
                ));
            }
        }

        for method in class.methods {
            let Some(entry) = bindings.decls.get(method.id) else {
                continue;
            };
            let Some(inherited) = parent.method_at(entry.offset) else {
                continue;
            };
            if !self.subtype(&entry.ty, &Type::Method(inherited.clone())) {
                self.errors.push(CompilationError::type_mismatch(
                    format!("Wrong type for method {} overriding", method.name.name),
                    method.span,
                ));
            }
        }
    }

    fn check_method(&mut self, method: &MethodDecl<'_>) -> CheckResult<()> {
        let arrow = self.callable(method.id)?;
        self.check_decls(method.decls);
        let body = self.check_expr(method.body)?;
        if !self.subtype(&body, &arrow.ret) {
            return Err(CompilationError::type_mismatch(
                format!("Wrong return type for method {}", method.name.name),
                method.span,
            )
            .into());
        }
        Ok(())
    }

    fn decl_entry(&self, id: NodeId) -> CheckResult<&'a SymbolEntry> {
        self.bindings.decls.get(id).ok_or(Failure::Incomplete)
    }

    /// Signature of a function or method declaration.
    fn callable(&self, id: NodeId) -> CheckResult<&'a ArrowType> {
        self.decl_entry(id)?
            .ty
            .as_arrow()
            .ok_or(Failure::Incomplete)
    }

    // ==========================================================================
    // Expressions
    // ==========================================================================

    fn check_expr(&mut self, expr: &Expr<'_>) -> CheckResult<Type> {
        match expr {
            Expr::Int(_) => Ok(Type::Int),
            Expr::Bool(_) => Ok(Type::Bool),
            Expr::Null(_) => Ok(Type::Empty),
            Expr::Ident(ident) => self.check_ident(ident.id, ident.name, ident.span),
            Expr::Binary(binary) => self.check_binary(binary),
            Expr::Not(not) => {
                let operand = self.check_expr(not.operand)?;
                if !self.subtype(&operand, &Type::Bool) {
                    return Err(mismatch("Non boolean in not", not.span));
                }
                Ok(Type::Bool)
            }
            Expr::If(cond) => {
                let guard = self.check_expr(cond.condition)?;
                if !self.subtype(&guard, &Type::Bool) {
                    return Err(mismatch("Non boolean condition in if", cond.span));
                }
                let then_type = self.check_expr(cond.then_branch)?;
                let else_type = self.check_expr(cond.else_branch)?;
                lowest_common_ancestor(&then_type, &else_type, self.classes.hierarchy())
                    .ok_or_else(|| mismatch("Incompatible types in then-else branches", cond.span))
            }
            Expr::Print(print) => self.check_expr(print.value),
            Expr::Call(call) => self.check_call(call),
            Expr::MethodCall(call) => self.check_method_call(call),
            Expr::New(new) => self.check_new(new),
        }
    }

    fn check_ident(&mut self, id: NodeId, name: &str, span: Span) -> CheckResult<Type> {
        let bindings = self.bindings;
        let entry = &bindings.uses.get(id).ok_or(Failure::Incomplete)?.entry;
        let misuse = |what: &'static str| {
            Failure::Error(CompilationError::NotAValue {
                what,
                name: name.to_string(),
                span,
            })
        };
        match &entry.ty {
            Type::Arrow(_) => Err(misuse("function")),
            Type::Method(_) => Err(misuse("method")),
            Type::Class(_) => Err(misuse("class")),
            // A class named inside its own body has no type yet.
            Type::Incomplete if self.classes.contains(name) => Err(misuse("class")),
            Type::Incomplete => Err(Failure::Incomplete),
            ty => Ok(ty.clone()),
        }
    }

    fn check_binary(&mut self, binary: &BinaryExpr<'_>) -> CheckResult<Type> {
        let left = self.check_expr(binary.left)?;
        let right = self.check_expr(binary.right)?;
        let op = binary.op;

        let (operand, result, wording) = match op.class() {
            OperatorClass::Arithmetic => (Type::Int, Type::Int, "Non integers in"),
            OperatorClass::Comparison => (Type::Int, Type::Bool, "Non integers in"),
            OperatorClass::Logical => (Type::Bool, Type::Bool, "Non booleans in"),
            OperatorClass::Equality => {
                if !(self.subtype(&left, &right) || self.subtype(&right, &left)) {
                    return Err(mismatch("Incompatible types in equal", binary.span));
                }
                return Ok(Type::Bool);
            }
        };
        if !(self.subtype(&left, &operand) && self.subtype(&right, &operand)) {
            return Err(mismatch(
                &format!("{wording} {}", op.describe()),
                binary.span,
            ));
        }
        Ok(result)
    }

    fn check_call(&mut self, call: &CallExpr<'_>) -> CheckResult<Type> {
        let bindings = self.bindings;
        let entry = &bindings.uses.get(call.id).ok_or(Failure::Incomplete)?.entry;
        self.invoke(call.callee.name, &entry.ty, call.args, call.span)
    }

    fn check_method_call(&mut self, call: &MethodCallExpr<'_>) -> CheckResult<Type> {
        let bindings = self.bindings;
        let entry = bindings.methods.get(call.id).ok_or(Failure::Incomplete)?;
        self.invoke(call.method.name, &entry.ty, call.args, call.span)
    }

    /// Check a call of something of type `callee` named `name`.
    fn invoke(
        &mut self,
        name: &str,
        callee: &Type,
        args: &[Expr<'_>],
        span: Span,
    ) -> CheckResult<Type> {
        if callee.is_incomplete() {
            return Err(Failure::Incomplete);
        }
        let arrow = callee.as_arrow().ok_or_else(|| CompilationError::NotCallable {
            name: name.to_string(),
            span,
        })?;
        if arrow.arity() != args.len() {
            return Err(CompilationError::ArityMismatch {
                name: name.to_string(),
                expected: arrow.arity(),
                found: args.len(),
                span,
            }
            .into());
        }
        for (i, (arg, param)) in args.iter().zip(&arrow.params).enumerate() {
            let arg_type = self.check_expr(arg)?;
            if !self.subtype(&arg_type, param) {
                return Err(mismatch(
                    &format!(
                        "Wrong type for {}-th parameter in the invocation of {name}",
                        i + 1
                    ),
                    arg.span(),
                ));
            }
        }
        Ok((*arrow.ret).clone())
    }

    fn check_new(&mut self, new: &NewExpr<'_>) -> CheckResult<Type> {
        let (bindings, classes) = (self.bindings, self.classes);
        let class = bindings.classes.get(new.id).ok_or(Failure::Incomplete)?;
        let fields = &classes
            .class_type(class)
            .ok_or(Failure::Incomplete)?
            .fields;

        if fields.len() != new.args.len() {
            return Err(CompilationError::ArityMismatch {
                name: class.clone(),
                expected: fields.len(),
                found: new.args.len(),
                span: new.span,
            }
            .into());
        }
        for (i, (arg, field)) in new.args.iter().zip(fields).enumerate() {
            let arg_type = self.check_expr(arg)?;
            if !self.subtype(&arg_type, field) {
                return Err(mismatch(
                    &format!("Wrong type for {}-th field in new {class}", i + 1),
                    arg.span(),
                ));
            }
        }
        Ok(Type::reference(class.as_str()))
    }

    fn subtype(&self, sub: &Type, sup: &Type) -> bool {
        is_subtype(sub, sup, self.classes.hierarchy())
    }
}

fn mismatch(message: &str, span: Span) -> Failure {
    Failure::Error(CompilationError::type_mismatch(message, span))
}
