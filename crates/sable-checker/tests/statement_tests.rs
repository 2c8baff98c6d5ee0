//! Statement-level behaviors: switches, multi-assignment, named blocks and
//! reference lifetimes, debug, and quantified assertions.

use sable_ast::{
    AssertStmt, Block, Builder, Decl, DeclIndex, Expr, ExprKind, NamedBlockStmt, QuantifiedVar,
    QuantifierKind, Stmt, TypeExpr, Unit,
};
use sable_checker::{check_unit, CheckResult};
use sable_common::{CheckerOptions, ErrorCode, Interner, Lifetime};
use sable_solver::TypeInterner;

fn check(unit: &Unit, types: &TypeInterner, strings: &Interner) -> CheckResult {
    check_unit(unit, types, strings, CheckerOptions::default())
}

fn unit_of(b: &Builder<'_>, decls: Vec<Decl>) -> Unit {
    Unit {
        name: b.atom("statements"),
        decls,
    }
}

#[test]
fn test_switch_without_default_falls_through() {
    // function f(int x) -> int:
    //     switch x:
    //         case 0: return 0
    //     return 1
    let strings = Interner::new();
    let types = TypeInterner::new();
    let b = Builder::new(&strings);
    let param = b.param("x", TypeExpr::Int);
    let x = param.var;
    let body = Block::new(vec![
        b.switch(
            b.var(x),
            vec![b.case(vec![b.int(0)], Block::new(vec![b.ret(vec![b.int(0)])]))],
        ),
        b.ret(vec![b.int(1)]),
    ]);
    let f = b.function("f", vec![param], vec![b.param("r", TypeExpr::Int)], body);
    let result = check(&unit_of(&b, vec![Decl::FunctionOrMethod(f)]), &types, &strings);
    assert!(result.ok, "diagnostics: {:?}", result.diagnostics);
}

#[test]
fn test_switch_with_default_covers_exit() {
    // function f(int x) -> int:
    //     switch x:
    //         case 0: return 0
    //         default: return 1
    // No trailing return needed: every arm exits.
    let strings = Interner::new();
    let types = TypeInterner::new();
    let b = Builder::new(&strings);
    let param = b.param("x", TypeExpr::Int);
    let x = param.var;
    let body = Block::new(vec![b.switch(
        b.var(x),
        vec![
            b.case(vec![b.int(0)], Block::new(vec![b.ret(vec![b.int(0)])])),
            b.case(vec![], Block::new(vec![b.ret(vec![b.int(1)])])),
        ],
    )]);
    let f = b.function("f", vec![param], vec![b.param("r", TypeExpr::Int)], body);
    let result = check(&unit_of(&b, vec![Decl::FunctionOrMethod(f)]), &types, &strings);
    assert!(result.ok, "diagnostics: {:?}", result.diagnostics);
}

#[test]
fn test_switch_case_must_overlap_condition() {
    // case true on an int switch can never match
    let strings = Interner::new();
    let types = TypeInterner::new();
    let b = Builder::new(&strings);
    let param = b.param("x", TypeExpr::Int);
    let x = param.var;
    let body = Block::new(vec![
        b.switch(
            b.var(x),
            vec![b.case(vec![b.bool(true)], Block::new(vec![b.ret(vec![b.int(0)])]))],
        ),
        b.ret(vec![b.int(1)]),
    ]);
    let f = b.function("f", vec![param], vec![b.param("r", TypeExpr::Int)], body);
    let result = check(&unit_of(&b, vec![Decl::FunctionOrMethod(f)]), &types, &strings);
    assert!(result
        .diagnostics
        .iter()
        .any(|d| d.code == ErrorCode::SubtypeError));
}

#[test]
fn test_multi_value_assignment_from_invocation() {
    // function two() -> (int a, bool c): return 1, true
    // function g() -> int:
    //     int x
    //     bool y
    //     x, y = two()
    //     return x
    let strings = Interner::new();
    let types = TypeInterner::new();
    let b = Builder::new(&strings);

    let two = b.function(
        "two",
        vec![],
        vec![b.param("a", TypeExpr::Int), b.param("c", TypeExpr::Bool)],
        Block::new(vec![b.ret(vec![b.int(1), b.bool(true)])]),
    );

    let x = b.fresh_var();
    let y = b.fresh_var();
    let call = b.invoke("two", vec![DeclIndex(0)], vec![]);
    let body = Block::new(vec![
        b.var_decl(x, "x", TypeExpr::Int, None),
        b.var_decl(y, "y", TypeExpr::Bool, None),
        b.assign(vec![b.var(x), b.var(y)], vec![call]),
        b.ret(vec![b.var(x)]),
    ]);
    let g = b.function("g", vec![], vec![b.param("r", TypeExpr::Int)], body);
    let result = check(
        &unit_of(&b, vec![Decl::FunctionOrMethod(two), Decl::FunctionOrMethod(g)]),
        &types,
        &strings,
    );
    assert!(result.ok, "diagnostics: {:?}", result.diagnostics);
}

#[test]
fn test_return_arity_mismatch() {
    // function f() -> (int a, int c): return 1
    let strings = Interner::new();
    let types = TypeInterner::new();
    let b = Builder::new(&strings);
    let f = b.function(
        "f",
        vec![],
        vec![b.param("a", TypeExpr::Int), b.param("c", TypeExpr::Int)],
        Block::new(vec![b.ret(vec![b.int(1)])]),
    );
    let result = check(&unit_of(&b, vec![Decl::FunctionOrMethod(f)]), &types, &strings);
    assert!(result
        .diagnostics
        .iter()
        .any(|d| d.code == ErrorCode::InsufficientReturns));

    // function g() -> int: return 1, 2
    let g = b.function(
        "g",
        vec![],
        vec![b.param("r", TypeExpr::Int)],
        Block::new(vec![b.ret(vec![b.int(1), b.int(2)])]),
    );
    let result = check(&unit_of(&b, vec![Decl::FunctionOrMethod(g)]), &types, &strings);
    assert!(result
        .diagnostics
        .iter()
        .any(|d| d.code == ErrorCode::TooManyReturns));
}

#[test]
fn test_named_block_lifetime_nests_within_this() {
    // method m():
    //     myblock:
    //         &myblock:int p = new:this 1
    // A this-lifetime reference fits a block-lifetime variable: the block
    // is within the method.
    let strings = Interner::new();
    let types = TypeInterner::new();
    let b = Builder::new(&strings);

    let p = b.fresh_var();
    let block_name = b.atom("myblock");
    let alloc = b.expr(ExprKind::New {
        operand: Box::new(b.int(1)),
        lifetime: Some(Lifetime::This),
    });
    let inner = Block::new(vec![b.var_decl(
        p,
        "p",
        TypeExpr::Reference {
            elem: Box::new(TypeExpr::Int),
            lifetime: Some(Lifetime::Named(block_name)),
        },
        Some(alloc),
    )]);
    let body = Block::new(vec![Stmt::NamedBlock(NamedBlockStmt {
        name: block_name,
        body: inner,
        span: b.span(),
    })]);
    let mut m = b.function("m", vec![], vec![], body);
    m.kind = sable_common::CallableKind::Method;
    let result = check(&unit_of(&b, vec![Decl::FunctionOrMethod(m)]), &types, &strings);
    assert!(result.ok, "diagnostics: {:?}", result.diagnostics);
}

#[test]
fn test_block_lifetime_reference_cannot_escape_to_this() {
    // method m():
    //     myblock:
    //         &this:int p = new:myblock 1   // block-local cell, longer-lived view
    let strings = Interner::new();
    let types = TypeInterner::new();
    let b = Builder::new(&strings);

    let p = b.fresh_var();
    let block_name = b.atom("myblock");
    let alloc = b.expr(ExprKind::New {
        operand: Box::new(b.int(1)),
        lifetime: Some(Lifetime::Named(block_name)),
    });
    let inner = Block::new(vec![b.var_decl(
        p,
        "p",
        TypeExpr::Reference {
            elem: Box::new(TypeExpr::Int),
            lifetime: Some(Lifetime::This),
        },
        Some(alloc),
    )]);
    let body = Block::new(vec![Stmt::NamedBlock(NamedBlockStmt {
        name: block_name,
        body: inner,
        span: b.span(),
    })]);
    let mut m = b.function("m", vec![], vec![], body);
    m.kind = sable_common::CallableKind::Method;
    let result = check(&unit_of(&b, vec![Decl::FunctionOrMethod(m)]), &types, &strings);
    assert!(result
        .diagnostics
        .iter()
        .any(|d| d.code == ErrorCode::SubtypeError));
}

#[test]
fn test_debug_requires_byte_string() {
    let strings = Interner::new();
    let types = TypeInterner::new();
    let b = Builder::new(&strings);

    let good = Stmt::Debug(sable_ast::DebugStmt {
        operand: b.string("hello"),
        span: b.span(),
    });
    let f = b.function("f", vec![], vec![], Block::new(vec![good]));
    let result = check(&unit_of(&b, vec![Decl::FunctionOrMethod(f)]), &types, &strings);
    assert!(result.ok, "diagnostics: {:?}", result.diagnostics);

    let bad = Stmt::Debug(sable_ast::DebugStmt {
        operand: b.int(1),
        span: b.span(),
    });
    let g = b.function("g", vec![], vec![], Block::new(vec![bad]));
    let result = check(&unit_of(&b, vec![Decl::FunctionOrMethod(g)]), &types, &strings);
    assert!(result
        .diagnostics
        .iter()
        .any(|d| d.code == ErrorCode::SubtypeError));
}

#[test]
fn test_quantified_assertion() {
    // function f(int[] xs) -> int:
    //     assert all { i in 0..|xs| | xs[i] >= 0 }
    //     return 0
    let strings = Interner::new();
    let types = TypeInterner::new();
    let b = Builder::new(&strings);

    let param = b.param("xs", TypeExpr::array(TypeExpr::Int));
    let xs = param.var;
    let i = b.fresh_var();
    let length = b.expr(ExprKind::ArrayLength(Box::new(b.var(xs))));
    let condition = b.expr(ExprKind::Quantifier {
        kind: QuantifierKind::Universal,
        params: vec![QuantifiedVar {
            var: i,
            name: b.atom("i"),
            start: b.int(0),
            end: length,
        }],
        body: Box::new(b.ge(b.array_access(b.var(xs), b.var(i)), b.int(0))),
    });
    let body = Block::new(vec![
        Stmt::Assert(AssertStmt {
            condition,
            span: b.span(),
        }),
        b.ret(vec![b.int(0)]),
    ]);
    let f = b.function("f", vec![param], vec![b.param("r", TypeExpr::Int)], body);
    let result = check(&unit_of(&b, vec![Decl::FunctionOrMethod(f)]), &types, &strings);
    assert!(result.ok, "diagnostics: {:?}", result.diagnostics);
}

#[test]
fn test_dereference_read_and_heap_write() {
    // method m(&int p) -> int:
    //     *p = 5
    //     return *p
    let strings = Interner::new();
    let types = TypeInterner::new();
    let b = Builder::new(&strings);

    let param = b.param(
        "p",
        TypeExpr::Reference {
            elem: Box::new(TypeExpr::Int),
            lifetime: None,
        },
    );
    let p = param.var;
    let deref = |b: &Builder<'_>, var| -> Expr {
        b.expr(ExprKind::Dereference(Box::new(b.var(var))))
    };
    let body = Block::new(vec![
        b.assign(vec![deref(&b, p)], vec![b.int(5)]),
        b.ret(vec![deref(&b, p)]),
    ]);
    let mut m = b.function("m", vec![param], vec![b.param("r", TypeExpr::Int)], body);
    m.kind = sable_common::CallableKind::Method;
    let result = check(&unit_of(&b, vec![Decl::FunctionOrMethod(m)]), &types, &strings);
    assert!(result.ok, "diagnostics: {:?}", result.diagnostics);
}

#[test]
fn test_record_and_array_expressions() {
    // function f() -> int:
    //     {int a, int c} r = {a: 1, c: 2}
    //     int[] xs = [r.a, r.c, 3]
    //     return xs[0] + |xs|
    let strings = Interner::new();
    let types = TypeInterner::new();
    let b = Builder::new(&strings);

    let r = b.fresh_var();
    let xs = b.fresh_var();
    let record_type = TypeExpr::Record {
        open: false,
        fields: vec![(b.atom("a"), TypeExpr::Int), (b.atom("c"), TypeExpr::Int)],
    };
    let init = b.record_init(vec![("a", b.int(1)), ("c", b.int(2))]);
    let array_init = b.array_init(vec![
        b.record_access(b.var(r), "a"),
        b.record_access(b.var(r), "c"),
        b.int(3),
    ]);
    let length = b.expr(ExprKind::ArrayLength(Box::new(b.var(xs))));
    let body = Block::new(vec![
        b.var_decl(r, "r", record_type, Some(init)),
        b.var_decl(xs, "xs", TypeExpr::array(TypeExpr::Int), Some(array_init)),
        b.ret(vec![b.add(b.array_access(b.var(xs), b.int(0)), length)]),
    ]);
    let f = b.function("f", vec![], vec![b.param("out", TypeExpr::Int)], body);
    let result = check(&unit_of(&b, vec![Decl::FunctionOrMethod(f)]), &types, &strings);
    assert!(result.ok, "diagnostics: {:?}", result.diagnostics);
}
