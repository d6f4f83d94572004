//! Performance benchmarks for the FOOL compiler pipeline.
//!
//! Programs are generated in memory at increasing sizes:
//! - Declarations: long chains of globals and functions
//! - Classes: deep inheritance chains with overriding methods
//! - Expressions: deeply nested arithmetic and conditionals

use bumpalo::Bump;
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use fool::ast::{AstBuilder, ClassDecl, Decl, Expr, Program};
use fool::compiler::Compiler;
use std::hint::black_box;

/// `n` globals, each a function of the previous one.
fn declarations<'ast>(b: &AstBuilder<'ast>, n: usize) -> Program<'ast> {
    let mut decls: Vec<Decl<'ast>> = Vec::with_capacity(n * 2);
    decls.push(b.var("v0", b.int_type(), b.int(1)));
    for i in 1..n {
        let x = b.param("x", b.int_type());
        let body = b.add(b.ident("x"), b.ident(&format!("v{}", i - 1)));
        decls.push(b.fun(&format!("f{i}"), b.int_type(), &[x], &[], body));
        let init = b.call(&format!("f{i}"), &[b.int(i as i32)]);
        decls.push(b.var(&format!("v{i}"), b.int_type(), init));
    }
    let last = b.ident(&format!("v{}", n - 1));
    b.let_in(&[], &decls, b.print(last))
}

/// A chain of `n` classes, each overriding `m` and adding a field.
fn class_chain<'ast>(b: &AstBuilder<'ast>, n: usize) -> Program<'ast> {
    let mut classes: Vec<ClassDecl<'ast>> = Vec::with_capacity(n);
    for i in 0..n {
        let field = b.field(&format!("x{i}"), b.int_type());
        let method = b.method("m", b.int_type(), &[], &[], b.ident(&format!("x{i}")));
        let parent = (i > 0).then(|| format!("C{}", i - 1));
        classes.push(b.class(&format!("C{i}"), parent.as_deref(), &[field], &[method]));
    }
    let args: Vec<Expr<'ast>> = (0..n).map(|i| b.int(i as i32)).collect();
    let last = format!("C{}", n - 1);
    let obj = b.var("obj", b.class_type("C0"), b.new_object(&last, &args));
    b.let_in(&classes, &[obj], b.print(b.method_call("obj", "m", &[])))
}

/// Nested `if`s and sums, `depth` levels deep.
fn nested_expression<'ast>(b: &AstBuilder<'ast>, depth: usize) -> Program<'ast> {
    let mut expr = b.int(0);
    for i in 0..depth {
        let guard = b.le(b.int(i as i32), b.int(depth as i32));
        expr = b.if_(guard, b.add(expr, b.int(1)), b.mul(b.int(2), b.int(3)));
    }
    b.program(b.print(expr))
}

type Workload = for<'ast> fn(&AstBuilder<'ast>, usize) -> Program<'ast>;

fn pipeline_benchmarks(c: &mut Criterion) {
    let compiler = Compiler::new();
    let workloads: [(&str, Workload); 3] = [
        ("declarations", declarations),
        ("class_chain", class_chain),
        ("nested_expression", nested_expression),
    ];

    for (name, generate) in workloads {
        let mut group = c.benchmark_group(format!("compiler/{name}"));
        for size in [10usize, 100, 500] {
            let arena = Bump::new();
            let b = AstBuilder::new(&arena);
            let program = generate(&b, size);
            group.throughput(Throughput::Elements(u64::from(b.node_count())));
            group.bench_with_input(BenchmarkId::from_parameter(size), &program, |bench, program| {
                bench.iter(|| {
                    let result = compiler.compile(black_box(program));
                    black_box(result.assembly.map(|a| a.len()))
                });
            });
        }
        group.finish();
    }
}

criterion_group!(benches, pipeline_benchmarks);
criterion_main!(benches);
