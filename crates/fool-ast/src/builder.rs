//! Arena-backed construction of syntax trees.
//!
//! The builder stands in for the front end: it allocates nodes in a
//! [`Bump`] arena, hands out dense [`NodeId`]s in creation order and stamps
//! every node with the current source line.
//!
//! # Example
//!
//! ```
//! use bumpalo::Bump;
//! use fool_ast::AstBuilder;
//!
//! let arena = Bump::new();
//! let b = AstBuilder::new(&arena);
//!
//! // let var x: int = 5; in x + 1
//! let x = b.var("x", b.int_type(), b.int(5));
//! let program = b.let_in(&[], &[x], b.add(b.ident("x"), b.int(1)));
//! assert_eq!(program.decls().len(), 1);
//! ```

use std::cell::Cell;

use bumpalo::Bump;
use fool_core::{NodeId, Span};

use crate::ast::*;

/// Allocates syntax tree nodes in an arena.
///
/// Nodes are `Copy`, so one node may appear in several places of a tree.
/// Every occurrence keeps the same [`NodeId`], and passes record what they
/// learn about it once.
pub struct AstBuilder<'ast> {
    arena: &'ast Bump,
    next_id: Cell<u32>,
    line: Cell<u32>,
}

impl<'ast> AstBuilder<'ast> {
    /// Create a builder allocating into `arena`, starting at line 1.
    pub fn new(arena: &'ast Bump) -> Self {
        Self {
            arena,
            next_id: Cell::new(0),
            line: Cell::new(1),
        }
    }

    /// The arena nodes are allocated into.
    pub fn arena(&self) -> &'ast Bump {
        self.arena
    }

    /// Set the source line stamped on nodes created from now on.
    pub fn at_line(&self, line: u32) -> &Self {
        self.line.set(line);
        self
    }

    /// The current source line.
    pub fn line(&self) -> u32 {
        self.line.get()
    }

    /// Number of node identifiers handed out so far.
    pub fn node_count(&self) -> u32 {
        self.next_id.get()
    }

    fn next_id(&self) -> NodeId {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        NodeId::new(id)
    }

    fn span(&self) -> Span {
        Span::at_line(self.line.get())
    }

    fn alloc<T>(&self, value: T) -> &'ast T {
        self.arena.alloc(value)
    }

    fn alloc_slice<T: Copy>(&self, items: &[T]) -> &'ast [T] {
        self.arena.alloc_slice_copy(items)
    }

    /// A name with the current line.
    pub fn name(&self, name: &str) -> Ident<'ast> {
        let name = self.arena.alloc_str(name);
        Ident::new(name, Span::new(self.line.get(), 1, name.len() as u32))
    }

    // ==========================================================================
    // Expressions
    // ==========================================================================

    pub fn int(&self, value: i32) -> Expr<'ast> {
        Expr::Int(IntLit {
            id: self.next_id(),
            value,
            span: self.span(),
        })
    }

    pub fn bool(&self, value: bool) -> Expr<'ast> {
        Expr::Bool(BoolLit {
            id: self.next_id(),
            value,
            span: self.span(),
        })
    }

    pub fn null(&self) -> Expr<'ast> {
        Expr::Null(NullLit {
            id: self.next_id(),
            span: self.span(),
        })
    }

    /// A reference to a variable, parameter or field.
    pub fn ident(&self, name: &str) -> Expr<'ast> {
        let name = self.name(name);
        Expr::Ident(IdentExpr {
            id: self.next_id(),
            name: name.name,
            span: name.span,
        })
    }

    pub fn binary(&self, left: Expr<'ast>, op: BinaryOp, right: Expr<'ast>) -> Expr<'ast> {
        Expr::Binary(self.alloc(BinaryExpr {
            id: self.next_id(),
            left: self.alloc(left),
            op,
            right: self.alloc(right),
            span: self.span(),
        }))
    }

    pub fn add(&self, left: Expr<'ast>, right: Expr<'ast>) -> Expr<'ast> {
        self.binary(left, BinaryOp::Add, right)
    }

    pub fn sub(&self, left: Expr<'ast>, right: Expr<'ast>) -> Expr<'ast> {
        self.binary(left, BinaryOp::Sub, right)
    }

    pub fn mul(&self, left: Expr<'ast>, right: Expr<'ast>) -> Expr<'ast> {
        self.binary(left, BinaryOp::Mul, right)
    }

    pub fn div(&self, left: Expr<'ast>, right: Expr<'ast>) -> Expr<'ast> {
        self.binary(left, BinaryOp::Div, right)
    }

    pub fn eq(&self, left: Expr<'ast>, right: Expr<'ast>) -> Expr<'ast> {
        self.binary(left, BinaryOp::Eq, right)
    }

    pub fn le(&self, left: Expr<'ast>, right: Expr<'ast>) -> Expr<'ast> {
        self.binary(left, BinaryOp::Le, right)
    }

    pub fn ge(&self, left: Expr<'ast>, right: Expr<'ast>) -> Expr<'ast> {
        self.binary(left, BinaryOp::Ge, right)
    }

    pub fn and(&self, left: Expr<'ast>, right: Expr<'ast>) -> Expr<'ast> {
        self.binary(left, BinaryOp::And, right)
    }

    pub fn or(&self, left: Expr<'ast>, right: Expr<'ast>) -> Expr<'ast> {
        self.binary(left, BinaryOp::Or, right)
    }

    pub fn not(&self, operand: Expr<'ast>) -> Expr<'ast> {
        Expr::Not(self.alloc(NotExpr {
            id: self.next_id(),
            operand: self.alloc(operand),
            span: self.span(),
        }))
    }

    pub fn if_(
        &self,
        condition: Expr<'ast>,
        then_branch: Expr<'ast>,
        else_branch: Expr<'ast>,
    ) -> Expr<'ast> {
        Expr::If(self.alloc(IfExpr {
            id: self.next_id(),
            condition: self.alloc(condition),
            then_branch: self.alloc(then_branch),
            else_branch: self.alloc(else_branch),
            span: self.span(),
        }))
    }

    pub fn print(&self, value: Expr<'ast>) -> Expr<'ast> {
        Expr::Print(self.alloc(PrintExpr {
            id: self.next_id(),
            value: self.alloc(value),
            span: self.span(),
        }))
    }

    /// `callee(args)`
    pub fn call(&self, callee: &str, args: &[Expr<'ast>]) -> Expr<'ast> {
        Expr::Call(self.alloc(CallExpr {
            id: self.next_id(),
            callee: self.name(callee),
            args: self.alloc_slice(args),
            span: self.span(),
        }))
    }

    /// `receiver.method(args)`
    pub fn method_call(&self, receiver: &str, method: &str, args: &[Expr<'ast>]) -> Expr<'ast> {
        Expr::MethodCall(self.alloc(MethodCallExpr {
            id: self.next_id(),
            receiver: self.name(receiver),
            method: self.name(method),
            args: self.alloc_slice(args),
            span: self.span(),
        }))
    }

    /// `new class(args)`
    pub fn new_object(&self, class: &str, args: &[Expr<'ast>]) -> Expr<'ast> {
        Expr::New(self.alloc(NewExpr {
            id: self.next_id(),
            class: self.name(class),
            args: self.alloc_slice(args),
            span: self.span(),
        }))
    }

    // ==========================================================================
    // Types
    // ==========================================================================

    pub fn int_type(&self) -> TypeExpr<'ast> {
        self.type_expr(TypeExprKind::Int)
    }

    pub fn bool_type(&self) -> TypeExpr<'ast> {
        self.type_expr(TypeExprKind::Bool)
    }

    pub fn class_type(&self, class: &str) -> TypeExpr<'ast> {
        let class = self.arena.alloc_str(class);
        self.type_expr(TypeExprKind::Class(class))
    }

    fn type_expr(&self, kind: TypeExprKind<'ast>) -> TypeExpr<'ast> {
        TypeExpr {
            id: self.next_id(),
            kind,
            span: self.span(),
        }
    }

    // ==========================================================================
    // Declarations
    // ==========================================================================

    /// `var name: ty = init;`
    pub fn var(&self, name: &str, ty: TypeExpr<'ast>, init: Expr<'ast>) -> Decl<'ast> {
        Decl::Var(self.alloc(VarDecl {
            id: self.next_id(),
            name: self.name(name),
            ty,
            init: self.alloc(init),
            span: self.span(),
        }))
    }

    /// `fun name: ret (params) let decls in body;`
    pub fn fun(
        &self,
        name: &str,
        ret: TypeExpr<'ast>,
        params: &[Param<'ast>],
        decls: &[Decl<'ast>],
        body: Expr<'ast>,
    ) -> Decl<'ast> {
        Decl::Fun(self.alloc(FunDecl {
            id: self.next_id(),
            name: self.name(name),
            ret,
            params: self.alloc_slice(params),
            decls: self.alloc_slice(decls),
            body: self.alloc(body),
            span: self.span(),
        }))
    }

    pub fn param(&self, name: &str, ty: TypeExpr<'ast>) -> Param<'ast> {
        Param {
            id: self.next_id(),
            name: self.name(name),
            ty,
            span: self.span(),
        }
    }

    pub fn field(&self, name: &str, ty: TypeExpr<'ast>) -> FieldDecl<'ast> {
        FieldDecl {
            id: self.next_id(),
            name: self.name(name),
            ty,
            span: self.span(),
        }
    }

    pub fn method(
        &self,
        name: &str,
        ret: TypeExpr<'ast>,
        params: &[Param<'ast>],
        decls: &[Decl<'ast>],
        body: Expr<'ast>,
    ) -> MethodDecl<'ast> {
        MethodDecl {
            id: self.next_id(),
            name: self.name(name),
            ret,
            params: self.alloc_slice(params),
            decls: self.alloc_slice(decls),
            body: self.alloc(body),
            span: self.span(),
        }
    }

    /// `class name [extends superclass] (fields) { methods }`
    pub fn class(
        &self,
        name: &str,
        superclass: Option<&str>,
        fields: &[FieldDecl<'ast>],
        methods: &[MethodDecl<'ast>],
    ) -> ClassDecl<'ast> {
        ClassDecl {
            id: self.next_id(),
            name: self.name(name),
            superclass: superclass.map(|s| self.name(s)),
            fields: self.alloc_slice(fields),
            methods: self.alloc_slice(methods),
            span: self.span(),
        }
    }

    // ==========================================================================
    // Programs
    // ==========================================================================

    /// `let classes decls in body`
    pub fn let_in(
        &self,
        classes: &[ClassDecl<'ast>],
        decls: &[Decl<'ast>],
        body: Expr<'ast>,
    ) -> Program<'ast> {
        Program {
            id: self.next_id(),
            kind: ProgramKind::LetIn {
                classes: self.alloc_slice(classes),
                decls: self.alloc_slice(decls),
                body: self.alloc(body),
            },
            span: self.span(),
        }
    }

    /// A program made of a single expression.
    pub fn program(&self, body: Expr<'ast>) -> Program<'ast> {
        Program {
            id: self.next_id(),
            kind: ProgramKind::Expr(self.alloc(body)),
            span: self.span(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_dense_and_unique() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let one = b.int(1);
        let two = b.int(2);
        let sum = b.add(one, two);

        assert_eq!(one.id(), NodeId::new(0));
        assert_eq!(two.id(), NodeId::new(1));
        assert_eq!(sum.id(), NodeId::new(2));
        assert_eq!(b.node_count(), 3);
    }

    #[test]
    fn current_line_is_stamped() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let first = b.null();
        b.at_line(7);
        let call = b.call("foo", &[]);

        assert_eq!(first.span().line, 1);
        assert_eq!(call.span().line, 7);
        match call {
            Expr::Call(c) => {
                assert_eq!(c.callee.name, "foo");
                assert_eq!(c.callee.span.len, 3);
            }
            other => panic!("expected call, got {other:?}"),
        }
    }

    #[test]
    fn let_in_program_parts() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let class = b.class("A", None, &[b.field("x", b.int_type())], &[]);
        let decl = b.var("a", b.class_type("A"), b.new_object("A", &[b.int(1)]));
        let program = b.let_in(&[class], &[decl], b.ident("a"));

        assert_eq!(program.classes().len(), 1);
        assert_eq!(program.classes()[0].fields[0].name.name, "x");
        assert_eq!(program.decls()[0].name(), "a");
        assert!(matches!(program.body(), Expr::Ident(i) if i.name == "a"));
    }

    #[test]
    fn bare_expression_program_has_no_decls() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let program = b.program(b.print(b.add(b.int(1), b.int(2))));

        assert!(program.classes().is_empty());
        assert!(program.decls().is_empty());
        assert!(matches!(program.body(), Expr::Print(_)));
    }
}
