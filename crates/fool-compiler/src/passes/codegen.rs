//! Code Generation Pass (Pass 3) - Emit stack machine assembly.
//!
//! This pass walks a resolved, type-checked tree and emits code for the
//! target stack machine. Inline code (preamble, class dispatch tables,
//! declarations, the main expression) goes into the main block; the body of
//! every function and method is emitted out of line into a code segment
//! appended after `halt`.
//!
//! ## Activation records
//!
//! ```text
//! fp + n    parameter n
//! ...
//! fp + 1    parameter 1
//! fp        access link (declaring frame, or the receiver for methods)
//! fp - 1    return address
//! fp - 2    first local declaration
//! ...
//! ```
//!
//! The caller's frame pointer (the control link) sits just above the
//! parameters.
//!
//! ## Objects
//!
//! An object reference points at the object's dispatch table pointer; its
//! fields live at the addresses just below it, field `-k` at `ref - k`.

use fool_ast::{
    BinaryExpr, BinaryOp, CallExpr, ClassDecl, Decl, Expr, MethodCallExpr, NewExpr, Program,
    ProgramKind,
};
use fool_core::NodeId;
use rustc_hash::FxHashMap;
use tracing::{debug, trace, warn};

use crate::asm::{Assembly, CodeBlock, Label};
use crate::class_table::ClassTable;
use crate::emit::{Emitter, LabelAllocator};
use crate::options::CompilerOptions;
use crate::tables::{Bindings, SideTable, Use};

/// Runtime value of `null`.
const NULL_REFERENCE: i32 = -1;

/// Output of the code generation pass.
#[derive(Debug)]
pub struct CodegenOutput {
    /// The finished program.
    pub assembly: Assembly,
    /// Number of functions and methods emitted out of line.
    pub routines: usize,
    /// Number of instructions, label definitions excluded.
    pub instructions: usize,
}

/// Pass 3: generate assembly for a checked program.
pub struct CodegenPass<'a> {
    bindings: &'a Bindings,
    classes: &'a ClassTable,
    options: &'a CompilerOptions,
    labels: LabelAllocator,
    /// Out-of-line routine bodies.
    segment: CodeBlock,
    /// Entry label of each method declaration.
    method_labels: SideTable<Label>,
    /// Entry labels of each class's methods, indexed by dispatch slot.
    dispatch_tables: FxHashMap<String, Vec<Label>>,
    routines: usize,
}

impl<'a> CodegenPass<'a> {
    pub fn new(bindings: &'a Bindings, classes: &'a ClassTable, options: &'a CompilerOptions) -> Self {
        Self {
            bindings,
            classes,
            options,
            labels: LabelAllocator::new(),
            segment: CodeBlock::new(),
            method_labels: SideTable::new(),
            dispatch_tables: FxHashMap::default(),
            routines: 0,
        }
    }

    /// Run the pass over a program.
    pub fn run(mut self, program: &Program<'_>) -> CodegenOutput {
        debug!(program = %program.id, "starting code generation");

        let mut main = Emitter::new();
        main.set_line(program.span.line);
        match program.kind {
            ProgramKind::LetIn {
                classes,
                decls,
                body,
            } => {
                // Slot -1 of the global frame, below which declarations start.
                main.push(0);
                for class in classes {
                    self.gen_class(&mut main, class);
                }
                for decl in decls {
                    self.gen_decl(&mut main, decl);
                }
                self.gen_expr(&mut main, body);
            }
            ProgramKind::Expr(body) => self.gen_expr(&mut main, body),
        }
        main.halt();

        let mut code = main.finish();
        code.append(&mut self.segment);
        let instructions = code
            .instructions()
            .iter()
            .filter(|instruction| !instruction.is_label())
            .count();

        debug!(
            instructions,
            routines = self.routines,
            methods = self.method_labels.len(),
            labels = self.labels.function_count(),
            "code generation finished"
        );

        CodegenOutput {
            assembly: Assembly::new(code, self.options.emit_line_table),
            routines: self.routines,
            instructions,
        }
    }

    // ==========================================================================
    // Declarations
    // ==========================================================================

    fn gen_decl(&mut self, out: &mut Emitter, decl: &Decl<'_>) {
        match decl {
            Decl::Var(var) => self.gen_expr(out, var.init),
            Decl::Fun(fun) => {
                let label = self.labels.function();
                let routine = Routine {
                    name: fun.name.name,
                    line: fun.span.line,
                    params: fun.params.len(),
                    decls: fun.decls,
                    body: fun.body,
                };
                self.gen_routine(label, routine);
                out.push_label(label);
            }
        }
    }

    /// Emit a function or method body into the code segment.
    fn gen_routine(&mut self, label: Label, routine: Routine<'_, '_>) {
        let mut out = Emitter::new();
        out.set_line(routine.line);

        out.label(label);
        out.copy_fp();
        out.load_ra();
        for decl in routine.decls {
            self.gen_decl(&mut out, decl);
        }
        self.gen_expr(&mut out, routine.body);

        // Keep the result while the frame is torn down.
        out.store_tm();
        out.pop_n(routine.decls.len());
        out.store_ra();
        out.pop();
        out.pop_n(routine.params);
        out.store_fp();
        out.load_tm();
        out.load_ra();
        out.jump_subroutine();

        trace!(
            routine = routine.name,
            %label,
            instructions = out.len(),
            "emitted routine"
        );
        self.segment.append(&mut out.finish());
        self.routines += 1;
    }

    /// Emit the class's methods and the inline code that copies its dispatch
    /// table onto the heap, leaving the table's address on the stack.
    fn gen_class(&mut self, out: &mut Emitter, class: &ClassDecl<'_>) {
        let name = class.name.name;
        let mut table = self
            .classes
            .get(name)
            .and_then(|info| info.superclass.as_deref())
            .and_then(|parent| self.dispatch_tables.get(parent))
            .cloned()
            .unwrap_or_default();

        for method in class.methods {
            let label = self.labels.function();
            self.method_labels.insert(method.id, label);

            let slot = self
                .bindings
                .decls
                .get(method.id)
                .and_then(|entry| usize::try_from(entry.offset).ok());
            match slot {
                Some(slot) if slot < table.len() => table[slot] = label,
                Some(_) => table.push(label),
                None => warn!(
                    class = name,
                    method = method.name.name,
                    "method has no dispatch slot"
                ),
            }

            let routine = Routine {
                name: method.name.name,
                line: method.span.line,
                params: method.params.len(),
                decls: method.decls,
                body: method.body,
            };
            self.gen_routine(label, routine);
        }

        out.set_line(class.span.line);
        out.load_hp();
        for label in &table {
            out.push_label(*label);
            out.store_on_heap();
        }
        trace!(class = name, slots = table.len(), "emitted dispatch table");
        self.dispatch_tables.insert(name.to_string(), table);
    }

    // ==========================================================================
    // Expressions
    // ==========================================================================

    fn gen_expr(&mut self, out: &mut Emitter, expr: &Expr<'_>) {
        let line = out.current_line();
        out.set_line(expr.span().line);

        match expr {
            Expr::Int(lit) => out.push(lit.value),
            Expr::Bool(lit) => out.push(i32::from(lit.value)),
            Expr::Null(_) => out.push(NULL_REFERENCE),
            Expr::Ident(ident) => self.gen_ident(out, ident.id, ident.name),
            Expr::Binary(binary) => self.gen_binary(out, binary),
            Expr::Not(not) => {
                let (was_false, end) = (self.labels.branch(), self.labels.branch());
                self.gen_expr(out, not.operand);
                out.push(0);
                out.branch_eq(was_false);
                out.materialize_bool(was_false, end, 0, 1);
            }
            Expr::If(cond) => {
                let (then_label, end) = (self.labels.branch(), self.labels.branch());
                self.gen_expr(out, cond.condition);
                out.push(1);
                out.branch_eq(then_label);
                self.gen_expr(out, cond.else_branch);
                out.branch(end);
                out.label(then_label);
                self.gen_expr(out, cond.then_branch);
                out.label(end);
            }
            Expr::Print(print) => {
                self.gen_expr(out, print.value);
                out.print();
            }
            Expr::Call(call) => self.gen_call(out, call),
            Expr::MethodCall(call) => self.gen_method_call(out, call),
            Expr::New(new) => self.gen_new(out, new),
        }

        out.set_line(line);
    }

    fn gen_binary(&mut self, out: &mut Emitter, binary: &BinaryExpr<'_>) {
        let arithmetic = match binary.op {
            BinaryOp::Add => Some(Emitter::add as fn(&mut Emitter)),
            BinaryOp::Sub => Some(Emitter::sub as fn(&mut Emitter)),
            BinaryOp::Mul => Some(Emitter::mult as fn(&mut Emitter)),
            BinaryOp::Div => Some(Emitter::div as fn(&mut Emitter)),
            _ => None,
        };
        if let Some(emit_op) = arithmetic {
            self.gen_expr(out, binary.left);
            self.gen_expr(out, binary.right);
            emit_op(out);
            return;
        }

        let (target, end) = (self.labels.branch(), self.labels.branch());
        match binary.op {
            BinaryOp::Eq => {
                self.gen_expr(out, binary.left);
                self.gen_expr(out, binary.right);
                out.branch_eq(target);
                out.materialize_bool(target, end, 0, 1);
            }
            BinaryOp::Le => {
                self.gen_expr(out, binary.left);
                self.gen_expr(out, binary.right);
                out.branch_less_eq(target);
                out.materialize_bool(target, end, 0, 1);
            }
            // l >= r  iff  not (l <= r - 1)
            BinaryOp::Ge => {
                self.gen_expr(out, binary.left);
                self.gen_expr(out, binary.right);
                out.push(1);
                out.sub();
                out.branch_less_eq(target);
                out.materialize_bool(target, end, 1, 0);
            }
            BinaryOp::Or => {
                self.gen_expr(out, binary.left);
                out.push(1);
                out.branch_eq(target);
                self.gen_expr(out, binary.right);
                out.push(1);
                out.branch_eq(target);
                out.materialize_bool(target, end, 0, 1);
            }
            BinaryOp::And => {
                self.gen_expr(out, binary.left);
                out.push(0);
                out.branch_eq(target);
                self.gen_expr(out, binary.right);
                out.push(0);
                out.branch_eq(target);
                out.materialize_bool(target, end, 1, 0);
            }
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div => {}
        }
    }

    fn gen_ident(&mut self, out: &mut Emitter, id: NodeId, name: &str) {
        let Some(used) = self.bindings.uses.get(id) else {
            return missing(out, name);
        };
        self.load_frame(out, used);
        out.load_at_offset(used.entry.offset);
    }

    fn gen_call(&mut self, out: &mut Emitter, call: &CallExpr<'_>) {
        let bindings = self.bindings;
        let Some(callee) = bindings.uses.get(call.id) else {
            return missing(out, call.callee.name);
        };

        // Control link, then the arguments.
        out.load_fp();
        self.gen_args_reversed(out, call.args);

        self.load_frame(out, callee);
        out.duplicate_via_tm();
        if callee.entry.is_method() {
            // A sibling method: the access link is the receiver.
            dispatch(out, callee.entry.offset);
        } else {
            out.load_at_offset(callee.entry.offset);
        }
        out.jump_subroutine();
    }

    fn gen_method_call(&mut self, out: &mut Emitter, call: &MethodCallExpr<'_>) {
        let bindings = self.bindings;
        let (Some(receiver), Some(method)) =
            (bindings.uses.get(call.id), bindings.methods.get(call.id))
        else {
            return missing(out, call.method.name);
        };

        out.load_fp();
        self.gen_args_reversed(out, call.args);

        self.load_frame(out, receiver);
        out.load_at_offset(receiver.entry.offset);
        out.duplicate_via_tm();
        dispatch(out, method.offset);
        out.jump_subroutine();
    }

    fn gen_new(&mut self, out: &mut Emitter, new: &NewExpr<'_>) {
        let (bindings, classes) = (self.bindings, self.classes);
        let Some(info) = bindings
            .classes
            .get(new.id)
            .and_then(|class| classes.get(class))
        else {
            return missing(out, new.class.name);
        };

        for arg in new.args {
            self.gen_expr(out, arg);
        }
        for _ in new.args {
            out.store_on_heap();
        }

        // Dispatch table address, from the class's global slot.
        out.push(self.options.memory_size);
        out.load_at_offset(info.entry.offset);
        out.load_hp();
        out.store_word();

        // The reference is the address of the dispatch pointer.
        out.load_hp();
        out.bump_heap();
    }

    fn gen_args_reversed(&mut self, out: &mut Emitter, args: &[Expr<'_>]) {
        for arg in args.iter().rev() {
            self.gen_expr(out, arg);
        }
    }

    /// Push the address of the frame holding `used`'s declaration.
    ///
    /// Class bodies are resolved before any global declaration, so the only
    /// level-0 names visible inside a class are classes themselves, which
    /// are never loaded as values. The walk never has to leave an object.
    fn load_frame(&self, out: &mut Emitter, used: &Use) {
        out.frame_of(used.hops());
    }
}

/// The parts of a function or method the routine emitter needs.
struct Routine<'n, 'ast> {
    name: &'n str,
    line: u32,
    params: usize,
    decls: &'ast [Decl<'ast>],
    body: &'ast Expr<'ast>,
}

/// From the object address on top of the stack, load the code address in
/// dispatch slot `slot`.
fn dispatch(out: &mut Emitter, slot: i32) {
    out.load_word();
    out.load_at_offset(slot);
}

fn missing(out: &mut Emitter, name: &str) {
    warn!(name, "no binding recorded, emitting a placeholder value");
    out.push(0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use bumpalo::Bump;
    use fool_ast::AstBuilder;

    use crate::passes::resolution::ResolutionPass;
    use crate::passes::type_check::TypeCheckPass;

    fn generate_with(program: &Program<'_>, options: &CompilerOptions) -> CodegenOutput {
        let resolved = ResolutionPass::new().run(program);
        assert!(resolved.is_success(), "{:?}", resolved.errors);
        let checked = TypeCheckPass::new(&resolved.bindings, &resolved.class_table).run(program);
        assert!(checked.is_success(), "{:?}", checked.errors);
        CodegenPass::new(&resolved.bindings, &resolved.class_table, options).run(program)
    }

    fn generate(program: &Program<'_>) -> Vec<String> {
        generate_with(program, &CompilerOptions::default())
            .assembly
            .instructions()
            .iter()
            .map(|i| i.to_string())
            .collect()
    }

    /// Inline code, up to and including `halt`.
    fn main_code(code: &[String]) -> &[String] {
        let end = code.iter().position(|i| i == "halt").map_or(code.len(), |i| i + 1);
        &code[..end]
    }

    #[test]
    fn print_sum() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let program = b.program(b.print(b.add(b.int(1), b.int(2))));

        assert_eq!(generate(&program), ["push 1", "push 2", "add", "print", "halt"]);
    }

    #[test]
    fn global_variable_access() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let x = b.var("x", b.int_type(), b.int(5));
        let program = b.let_in(&[], &[x], b.print(b.add(b.ident("x"), b.int(1))));

        assert_eq!(
            generate(&program),
            [
                "push 0", "push 5", "lfp", "push -2", "add", "lw", "push 1", "add", "print",
                "halt"
            ]
        );
    }

    #[test]
    fn literals() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let program = b.program(b.eq(b.null(), b.bool(false)));

        assert_eq!(
            generate_with(&b.program(b.bool(true)), &CompilerOptions::default())
                .assembly
                .to_text(),
            "push 1\nhalt\n"
        );
        assert_eq!(
            generate(&program),
            [
                "push -1", "push 0", "beq label0", "push 0", "b label1", "label0:", "push 1",
                "label1:", "halt"
            ]
        );
    }

    #[test]
    fn conditional() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let program = b.program(b.if_(b.bool(true), b.int(1), b.int(2)));

        assert_eq!(
            generate(&program),
            [
                "push 1", "push 1", "beq label0", "push 2", "b label1", "label0:", "push 1",
                "label1:", "halt"
            ]
        );
    }

    #[test]
    fn comparisons_and_logic() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);

        assert_eq!(
            generate(&b.program(b.ge(b.int(3), b.int(2)))),
            [
                "push 3", "push 2", "push 1", "sub", "bleq label0", "push 1", "b label1",
                "label0:", "push 0", "label1:", "halt"
            ]
        );
        assert_eq!(
            generate(&b.program(b.le(b.int(3), b.int(2)))),
            [
                "push 3", "push 2", "bleq label0", "push 0", "b label1", "label0:", "push 1",
                "label1:", "halt"
            ]
        );
        assert_eq!(
            generate(&b.program(b.not(b.bool(false)))),
            [
                "push 0", "push 0", "beq label0", "push 0", "b label1", "label0:", "push 1",
                "label1:", "halt"
            ]
        );
        assert_eq!(
            generate(&b.program(b.and(b.bool(true), b.bool(false)))),
            [
                "push 1", "push 0", "beq label0", "push 0", "push 0", "beq label0", "push 1",
                "b label1", "label0:", "push 0", "label1:", "halt"
            ]
        );
        assert_eq!(
            generate(&b.program(b.or(b.bool(false), b.bool(true)))),
            [
                "push 0", "push 1", "beq label0", "push 1", "push 1", "beq label0", "push 0",
                "b label1", "label0:", "push 1", "label1:", "halt"
            ]
        );
    }

    #[test]
    fn function_declaration_and_call() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let a = b.param("a", b.int_type());
        let f = b.fun("f", b.int_type(), &[a], &[], b.ident("a"));
        let program = b.let_in(&[], &[f], b.call("f", &[b.int(3)]));

        let output = generate_with(&program, &CompilerOptions::default());
        assert_eq!(output.routines, 1);
        let code: Vec<_> = output
            .assembly
            .instructions()
            .iter()
            .map(|i| i.to_string())
            .collect();
        assert_eq!(
            code,
            [
                "push 0", "push function0", "lfp", "push 3", "lfp", "stm", "ltm", "ltm",
                "push -2", "add", "lw", "js", "halt", "function0:", "cfp", "lra", "lfp",
                "push 1", "add", "lw", "stm", "sra", "pop", "pop", "sfp", "ltm", "lra", "js"
            ]
        );
        assert_eq!(output.instructions, code.len() - 1);
    }

    #[test]
    fn arguments_are_pushed_last_first() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let p = b.param("p", b.int_type());
        let q = b.param("q", b.int_type());
        let f = b.fun("f", b.int_type(), &[p, q], &[], b.ident("q"));
        let program = b.let_in(&[], &[f], b.call("f", &[b.int(1), b.int(2)]));

        let code = generate(&program);
        assert_eq!(&code[2..5], ["lfp", "push 2", "push 1"]);
        // q is the second parameter, two pops for the parameters.
        let body = &code[code.iter().position(|i| i == "function0:").unwrap()..];
        assert!(body.windows(2).any(|w| w == ["push 2", "add"]));
        assert_eq!(body.iter().filter(|i| *i == "pop").count(), 3);
    }

    #[test]
    fn locals_are_popped() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let y = b.var("y", b.int_type(), b.int(4));
        let f = b.fun("f", b.int_type(), &[], &[y], b.ident("y"));
        let program = b.let_in(&[], &[f], b.call("f", &[]));

        let code = generate(&program);
        let body = &code[code.iter().position(|i| i == "function0:").unwrap()..];
        assert_eq!(
            body,
            [
                "function0:", "cfp", "lra", "push 4", "lfp", "push -2", "add", "lw", "stm",
                "pop", "sra", "pop", "sfp", "ltm", "lra", "js"
            ]
        );
    }

    #[test]
    fn nested_function_walks_static_chain() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let g = b.fun("g", b.int_type(), &[], &[], b.ident("x"));
        let x = b.var("x", b.int_type(), b.int(7));
        let f = b.fun("f", b.int_type(), &[], &[x, g], b.call("g", &[]));
        let program = b.let_in(&[], &[f], b.call("f", &[]));

        let output = generate_with(&program, &CompilerOptions::default());
        assert_eq!(output.routines, 2);
        let text = output.assembly.to_text();
        // g reads x one frame up.
        assert!(text.contains("function1:\ncfp\nlra\nlfp\nlw\npush -2\nadd\nlw\n"));
    }

    #[test]
    fn dispatch_tables_inherit_and_override() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let am = b.method("m", b.int_type(), &[], &[], b.int(0));
        let an = b.method("n", b.int_type(), &[], &[], b.int(1));
        let bn = b.method("n", b.int_type(), &[], &[], b.int(2));
        let bo = b.method("o", b.int_type(), &[], &[], b.int(3));
        let classes = [
            b.class("A", None, &[], &[am, an]),
            b.class("B", Some("A"), &[], &[bn, bo]),
        ];
        let program = b.let_in(&classes, &[], b.int(0));

        let output = generate_with(&program, &CompilerOptions::default());
        assert_eq!(output.routines, 4);
        let code: Vec<_> = output
            .assembly
            .instructions()
            .iter()
            .map(|i| i.to_string())
            .collect();
        let tables: Vec<_> = main_code(&code)
            .iter()
            .filter(|i| i.starts_with("push function"))
            .map(String::as_str)
            .collect();
        assert_eq!(
            tables,
            [
                "push function0",
                "push function1",
                "push function0",
                "push function2",
                "push function3"
            ]
        );
    }

    #[test]
    fn empty_class_still_takes_a_slot() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let classes = [b.class("E", None, &[], &[])];
        let program = b.let_in(&classes, &[], b.new_object("E", &[]));

        assert_eq!(
            generate(&program),
            [
                "push 0", "lhp", "push 10000", "push -2", "add", "lw", "lhp", "sw", "lhp", "lhp",
                "push 1", "add", "shp", "halt"
            ]
        );
    }

    #[test]
    fn object_construction() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let x = b.field("x", b.int_type());
        let y = b.field("y", b.int_type());
        let classes = [b.class("P", None, &[x, y], &[])];
        let program = b.let_in(&classes, &[], b.new_object("P", &[b.int(1), b.int(2)]));

        let store = ["lhp", "sw", "lhp", "push 1", "add", "shp"];
        let mut expected = vec!["push 0", "lhp", "push 1", "push 2"];
        expected.extend(store);
        expected.extend(store);
        expected.extend([
            "push 10000", "push -2", "add", "lw", "lhp", "sw", "lhp", "lhp", "push 1", "add",
            "shp", "halt",
        ]);
        assert_eq!(generate(&program), expected);
    }

    #[test]
    fn method_reads_field_through_receiver() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let x = b.field("x", b.int_type());
        let get = b.method("get", b.int_type(), &[], &[], b.ident("x"));
        let classes = [b.class("A", None, &[x], &[get])];
        let program = b.let_in(&classes, &[], b.int(0));

        let text = generate_with(&program, &CompilerOptions::default())
            .assembly
            .to_text();
        assert!(text.contains("function0:\ncfp\nlra\nlfp\nlw\npush -1\nadd\nlw\nstm\n"));
    }

    #[test]
    fn construction_inside_method_uses_memory_base() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let k = b.class("K", None, &[], &[]);
        let make = b.method("make", b.class_type("K"), &[], &[], b.new_object("K", &[]));
        let a = b.class("A", None, &[], &[make]);
        let program = b.let_in(&[k, a], &[], b.int(0));

        let options = CompilerOptions::new().with_memory_size(500);
        let text = generate_with(&program, &options).assembly.to_text();
        assert!(text.contains("function0:\ncfp\nlra\npush 500\npush -2\nadd\nlw\nlhp\nsw\n"));
    }

    #[test]
    fn qualified_call_dispatches_through_receiver() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let m = b.method("m", b.int_type(), &[], &[], b.int(1));
        let classes = [b.class("A", None, &[], &[m])];
        let v = b.var("v", b.class_type("A"), b.new_object("A", &[]));
        let program = b.let_in(&classes, &[v], b.method_call("v", "m", &[]));

        let code = generate(&program);
        let main = main_code(&code);
        let call = &main[main.len() - 14..];
        assert_eq!(
            call,
            [
                "lfp", "lfp", "push -3", "add", "lw", "stm", "ltm", "ltm", "lw", "push 0", "add",
                "lw", "js", "halt"
            ]
        );
    }

    #[test]
    fn sibling_method_call_dispatches_through_access_link() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let one = b.method("one", b.int_type(), &[], &[], b.int(1));
        let two = b.method("two", b.int_type(), &[], &[], b.call("one", &[]));
        let classes = [b.class("A", None, &[], &[one, two])];
        let program = b.let_in(&classes, &[], b.int(0));

        let text = generate_with(&program, &CompilerOptions::default())
            .assembly
            .to_text();
        assert!(text.contains(
            "function1:\ncfp\nlra\nlfp\nlfp\nlw\nstm\nltm\nltm\nlw\npush 0\nadd\nlw\njs\n"
        ));
    }

    #[test]
    fn line_table_follows_nodes() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let left = b.at_line(2).int(1);
        let right = b.at_line(3).int(2);
        let sum = b.at_line(2).add(left, right);
        let program = b.at_line(1).program(sum);

        let output = generate_with(&program, &CompilerOptions::default());
        assert_eq!(output.assembly.lines(), Some(&[2, 3, 2, 1][..]));

        let output = generate_with(&program, &CompilerOptions::new().with_line_table(false));
        assert!(output.assembly.lines().is_none());
    }
}
