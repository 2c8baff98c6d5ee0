//! Callable candidate resolution: overload selection, ambiguity,
//! argument-count errors, indirect invocation, and lambdas.

use sable_ast::{Block, Builder, Decl, DeclIndex, ExprKind, LambdaDecl, TypeExpr, Unit};
use sable_checker::{check_unit, CheckResult};
use sable_common::{CallableKind, CheckerOptions, ErrorCode, Interner};
use sable_solver::{TypeInterner, TypeKey};

fn check(unit: &Unit, types: &TypeInterner, strings: &Interner) -> CheckResult {
    check_unit(unit, types, strings, CheckerOptions::default())
}

fn int_or_null() -> TypeExpr {
    TypeExpr::Union(vec![TypeExpr::Int, TypeExpr::Null])
}

/// `function id_T(T x) -> T: return x` for a given parameter type.
fn identity(b: &Builder<'_>, name: &str, ty: TypeExpr) -> Decl {
    let param = b.param("x", ty.clone());
    let x = param.var;
    let body = Block::new(vec![b.ret(vec![b.var(x)])]);
    Decl::FunctionOrMethod(b.function(name, vec![param], vec![b.param("r", ty)], body))
}

#[test]
fn test_most_specific_candidate_wins() {
    let strings = Interner::new();
    let types = TypeInterner::new();
    let b = Builder::new(&strings);

    let narrow = identity(&b, "f", TypeExpr::Int);
    let wide = identity(&b, "f", int_or_null());
    // function g() -> int: return f(1)
    let call = b.invoke("f", vec![DeclIndex(0), DeclIndex(1)], vec![b.int(1)]);
    let call_id = call.id;
    let g = b.function(
        "g",
        vec![],
        vec![b.param("r", TypeExpr::Int)],
        Block::new(vec![b.ret(vec![call])]),
    );
    let unit = Unit {
        name: b.atom("calls"),
        decls: vec![narrow, wide, Decl::FunctionOrMethod(g)],
    };

    let result = check(&unit, &types, &strings);
    assert!(result.ok, "diagnostics: {:?}", result.diagnostics);
    // The int overload is more specific than the int|null one.
    assert_eq!(result.annotations.call_target(call_id), Some(DeclIndex(0)));
}

#[test]
fn test_no_matching_candidate_is_ambiguous() {
    let strings = Interner::new();
    let types = TypeInterner::new();
    let b = Builder::new(&strings);

    let only = identity(&b, "f", TypeExpr::Bool);
    let call = b.invoke("f", vec![DeclIndex(0)], vec![b.int(1)]);
    let g = b.function(
        "g",
        vec![],
        vec![b.param("r", TypeExpr::Bool)],
        Block::new(vec![b.ret(vec![call])]),
    );
    let unit = Unit {
        name: b.atom("calls"),
        decls: vec![only, Decl::FunctionOrMethod(g)],
    };

    let result = check(&unit, &types, &strings);
    assert!(result
        .diagnostics
        .iter()
        .any(|d| d.code == ErrorCode::AmbiguousCallable));
}

#[test]
fn test_incomparable_candidates_are_ambiguous() {
    let strings = Interner::new();
    let types = TypeInterner::new();
    let b = Builder::new(&strings);

    let a = identity(&b, "f", int_or_null());
    let c = identity(
        &b,
        "f",
        TypeExpr::Union(vec![TypeExpr::Int, TypeExpr::Bool]),
    );
    let call = b.invoke("f", vec![DeclIndex(0), DeclIndex(1)], vec![b.int(1)]);
    let g = b.function(
        "g",
        vec![],
        vec![b.param("r", TypeExpr::Any)],
        Block::new(vec![b.ret(vec![call])]),
    );
    let unit = Unit {
        name: b.atom("calls"),
        decls: vec![a, c, Decl::FunctionOrMethod(g)],
    };

    let result = check(&unit, &types, &strings);
    assert!(result
        .diagnostics
        .iter()
        .any(|d| d.code == ErrorCode::AmbiguousCallable));
}

#[test]
fn test_insufficient_arguments() {
    let strings = Interner::new();
    let types = TypeInterner::new();
    let b = Builder::new(&strings);

    // function f(int x, int y) -> int
    let p1 = b.param("x", TypeExpr::Int);
    let p2 = b.param("y", TypeExpr::Int);
    let x = p1.var;
    let f = b.function(
        "f",
        vec![p1, p2],
        vec![b.param("r", TypeExpr::Int)],
        Block::new(vec![b.ret(vec![b.var(x)])]),
    );
    let call = b.invoke("f", vec![DeclIndex(0)], vec![b.int(1)]);
    let g = b.function(
        "g",
        vec![],
        vec![b.param("r", TypeExpr::Int)],
        Block::new(vec![b.ret(vec![call])]),
    );
    let unit = Unit {
        name: b.atom("calls"),
        decls: vec![Decl::FunctionOrMethod(f), Decl::FunctionOrMethod(g)],
    };

    let result = check(&unit, &types, &strings);
    assert!(result
        .diagnostics
        .iter()
        .any(|d| d.code == ErrorCode::InsufficientArguments));
}

#[test]
fn test_indirect_invoke_through_callable_value() {
    let strings = Interner::new();
    let types = TypeInterner::new();
    let b = Builder::new(&strings);

    // function g((int)->(int) fn) -> int: return fn(1)
    let fn_type = TypeExpr::Callable {
        kind: CallableKind::Function,
        params: vec![TypeExpr::Int],
        returns: vec![TypeExpr::Int],
        lifetimes: vec![],
    };
    let param = b.param("fn", fn_type);
    let fn_var = param.var;
    let call = b.expr(ExprKind::IndirectInvoke {
        source: Box::new(b.var(fn_var)),
        args: vec![b.int(1)],
    });
    let g = b.function(
        "g",
        vec![param],
        vec![b.param("r", TypeExpr::Int)],
        Block::new(vec![b.ret(vec![call])]),
    );
    let unit = Unit {
        name: b.atom("calls"),
        decls: vec![Decl::FunctionOrMethod(g)],
    };

    let result = check(&unit, &types, &strings);
    assert!(result.ok, "diagnostics: {:?}", result.diagnostics);
}

#[test]
fn test_indirect_invoke_of_non_callable() {
    let strings = Interner::new();
    let types = TypeInterner::new();
    let b = Builder::new(&strings);

    let param = b.param("x", TypeExpr::Int);
    let x = param.var;
    let call = b.expr(ExprKind::IndirectInvoke {
        source: Box::new(b.var(x)),
        args: vec![],
    });
    let g = b.function(
        "g",
        vec![param],
        vec![b.param("r", TypeExpr::Int)],
        Block::new(vec![b.ret(vec![call])]),
    );
    let unit = Unit {
        name: b.atom("calls"),
        decls: vec![Decl::FunctionOrMethod(g)],
    };

    let result = check(&unit, &types, &strings);
    assert!(result
        .diagnostics
        .iter()
        .any(|d| d.code == ErrorCode::ExpectedLambda));
}

#[test]
fn test_lambda_declaration_infers_signature() {
    let strings = Interner::new();
    let types = TypeInterner::new();
    let b = Builder::new(&strings);

    // (int)->(int) inc = &(int n -> n + 1)
    let param = b.param("n", TypeExpr::Int);
    let n = param.var;
    let lambda_body = b.add(b.var(n), b.int(1));
    let lambda = b.expr(ExprKind::LambdaDecl(Box::new(LambdaDecl {
        kind: CallableKind::Function,
        parameters: vec![param],
        body: lambda_body,
        span: b.span(),
    })));
    let lambda_id = lambda.id;

    let fn_type = TypeExpr::Callable {
        kind: CallableKind::Function,
        params: vec![TypeExpr::Int],
        returns: vec![TypeExpr::Int],
        lifetimes: vec![],
    };
    let inc = b.fresh_var();
    let g = b.function(
        "g",
        vec![],
        vec![],
        Block::new(vec![b.var_decl(inc, "inc", fn_type, Some(lambda))]),
    );
    let unit = Unit {
        name: b.atom("calls"),
        decls: vec![Decl::FunctionOrMethod(g)],
    };

    let result = check(&unit, &types, &strings);
    assert!(result.ok, "diagnostics: {:?}", result.diagnostics);
    let signature = result
        .annotations
        .lambda_type(lambda_id)
        .expect("lambda signature");
    match types.lookup(signature) {
        TypeKey::Callable(shape) => {
            assert_eq!(shape.kind, CallableKind::Function);
            assert_eq!(shape.params.as_slice(), &[sable_solver::TypeId::INT]);
            assert_eq!(shape.returns.as_slice(), &[sable_solver::TypeId::INT]);
        }
        other => panic!("expected callable signature, got {other:?}"),
    }
}

#[test]
fn test_lambda_access_resolves_unique_candidate() {
    let strings = Interner::new();
    let types = TypeInterner::new();
    let b = Builder::new(&strings);

    let f = identity(&b, "f", TypeExpr::Int);
    let access = b.expr(ExprKind::LambdaAccess {
        link: sable_ast::CalleeLink {
            name: b.atom("f"),
            candidates: smallvec_from(vec![DeclIndex(0)]),
        },
    });
    let fn_type = TypeExpr::Callable {
        kind: CallableKind::Function,
        params: vec![TypeExpr::Int],
        returns: vec![TypeExpr::Int],
        lifetimes: vec![],
    };
    let handle = b.fresh_var();
    let g = b.function(
        "g",
        vec![],
        vec![],
        Block::new(vec![b.var_decl(handle, "handle", fn_type, Some(access))]),
    );
    let unit = Unit {
        name: b.atom("calls"),
        decls: vec![f, Decl::FunctionOrMethod(g)],
    };

    let result = check(&unit, &types, &strings);
    assert!(result.ok, "diagnostics: {:?}", result.diagnostics);
}

fn smallvec_from(v: Vec<DeclIndex>) -> smallvec::SmallVec<[DeclIndex; 2]> {
    smallvec::SmallVec::from_vec(v)
}
