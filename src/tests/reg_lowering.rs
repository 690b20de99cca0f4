use serde_json::json;

use crate::ast::reg::{load_reg_json, RegProgram};
use crate::ir::{BinaryOp, Initializer, MathIntrinsic, Node, NodeKind, UnaryOp};
use crate::semantic::{project_unit, RegFrontEnd};

fn project_reg(value: serde_json::Value) -> Vec<Node> {
    let program: RegProgram = serde_json::from_value(value).expect("fixture is not a valid register program");
    let output = project_unit(&RegFrontEnd, &program);
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
    match output.root.map(|n| n.kind) {
        Some(NodeKind::Program(items)) => items,
        other => panic!("expected a program, got {:?}", other),
    }
}

fn sym(name: &str) -> serde_json::Value {
    json!({"kind": "symbol", "name": name})
}

fn num(value: &str) -> serde_json::Value {
    json!({"kind": "number_i", "value": value})
}

#[test]
fn test_uninitialized_globals_get_zero() {
    let items = project_reg(json!({
        "definitions": [
            {"kind": "global_var", "name": "a", "type": "int", "init": null},
            {"kind": "global_var", "name": "b", "type": "float"},
            {"kind": "global_var", "name": "c", "type": "uint", "init": {"kind": "number_u", "value": "7"}},
        ]
    }));
    let inits: Vec<_> = items
        .iter()
        .map(|n| match &n.kind {
            NodeKind::GlobalVar(v) => match &v.init {
                Some(Initializer::Expr(e)) => (v.ty.to_string(), e.kind.clone()),
                other => panic!("unexpected initializer {:?}", other),
            },
            other => panic!("expected global, got {:?}", other),
        })
        .collect();
    assert_eq!(
        inits,
        vec![
            ("int".to_string(), NodeKind::Int("0".to_string())),
            ("float".to_string(), NodeKind::Float("0.0".to_string())),
            ("uint".to_string(), NodeKind::UInt("7".to_string())),
        ]
    );
    assert!(items.iter().all(|n| n.location.is_sentinel()));
}

#[test]
fn test_function_with_params_and_control_flow() {
    let items = project_reg(json!({
        "definitions": [{
            "kind": "function",
            "name": "clamp",
            "return_type": "int",
            "params": [{"name": "x", "type": "int"}],
            "body": [
                {"kind": "local_var", "name": "y", "type": "int", "init": sym("x")},
                {"kind": "if",
                 "cond": {"kind": "binary", "op": ">", "lhs": sym("y"), "rhs": num("10")},
                 "then": {"kind": "expr", "expr": {"kind": "assign", "target": "y", "value": num("10")}},
                 "otherwise": null},
                {"kind": "while", "cond": {"kind": "not", "operand": sym("y")},
                 "body": {"kind": "block", "body": [{"kind": "expr", "expr": {"kind": "increment", "operand": sym("y")}}]}},
                {"kind": "return", "value": sym("y")},
            ],
        }]
    }));
    let NodeKind::Function(func) = &items[0].kind else {
        panic!("expected function");
    };
    assert_eq!(func.signature.name, "clamp");
    assert_eq!(func.signature.params.len(), 1);
    assert_eq!(func.signature.params[0].name.as_deref(), Some("x"));
    assert_eq!(func.signature.params[0].ty.to_string(), "int");

    let body = func.body.as_ref().expect("definition has a body");
    assert!(matches!(body[0].kind, NodeKind::LocalVar(ref v) if v.name == "y"));
    let NodeKind::If { cond, then } = &body[1].kind else {
        panic!("expected if");
    };
    assert!(matches!(cond.kind, NodeKind::Binary { op: BinaryOp::Greater, .. }));
    assert!(matches!(then.kind, NodeKind::Assign { .. }));
    let NodeKind::While { cond, body: loop_body } = &body[2].kind else {
        panic!("expected while");
    };
    assert!(matches!(cond.kind, NodeKind::Unary { op: UnaryOp::LogicNot, .. }));
    let NodeKind::Block(inner) = &loop_body.kind else {
        panic!("expected block");
    };
    assert!(matches!(inner[0].kind, NodeKind::Unary { op: UnaryOp::PreIncrement, .. }));
    assert!(matches!(body[3].kind, NodeKind::Return(Some(_))));
}

#[test]
fn test_intrinsics() {
    let items = project_reg(json!({
        "definitions": [{
            "kind": "function",
            "name": "io",
            "return_type": "float",
            "body": [
                {"kind": "expr", "expr": {"kind": "output", "name": "led", "value": {"kind": "input", "name": "button"}}},
                {"kind": "expr", "expr": {"kind": "write_reg", "register": num("3"), "value": {"kind": "read_reg", "register": num("4")}}},
                {"kind": "return", "value": {
                    "kind": "binary_math", "func": "atan2",
                    "lhs": {"kind": "unary_math", "func": "sin", "arg": {"kind": "number_f", "value": "1.0"}},
                    "rhs": sym("x"),
                }},
            ],
        }]
    }));
    let NodeKind::Function(func) = &items[0].kind else {
        panic!("expected function");
    };
    let body = func.body.as_ref().expect("definition has a body");
    let NodeKind::Output { name, value } = &body[0].kind else {
        panic!("expected output");
    };
    assert_eq!(name, "led");
    assert_eq!(value.kind, NodeKind::Input("button".to_string()));

    let NodeKind::WriteReg { register, value } = &body[1].kind else {
        panic!("expected write_reg");
    };
    assert_eq!(register.kind, NodeKind::Int("3".to_string()));
    assert!(matches!(value.kind, NodeKind::ReadReg(_)));

    let NodeKind::Return(Some(ret)) = &body[2].kind else {
        panic!("expected return");
    };
    let NodeKind::Math { func, args } = &ret.kind else {
        panic!("expected math intrinsic");
    };
    assert_eq!(*func, MathIntrinsic::Atan2);
    assert_eq!(args.len(), func.arity());
    assert!(matches!(args[0].kind, NodeKind::Math { func: MathIntrinsic::Sin, ref args } if args.len() == 1));
}

#[test]
fn test_for_loop_and_ternary() {
    let items = project_reg(json!({
        "definitions": [{
            "kind": "function",
            "name": "count",
            "return_type": "int",
            "params": [],
            "body": [
                {"kind": "for",
                 "init": {"kind": "assign", "target": "i", "value": num("0")},
                 "cond": {"kind": "binary", "op": "<", "lhs": sym("i"), "rhs": num("8")},
                 "next": {"kind": "decrement", "operand": sym("i")},
                 "body": {"kind": "expr", "expr": {"kind": "call", "callee": "tick", "args": [sym("i")]}}},
                {"kind": "return", "value": {"kind": "ternary", "cond": sym("i"), "then": num("1"), "otherwise": {"kind": "str", "value": "no"}}},
            ],
        }]
    }));
    let NodeKind::Function(func) = &items[0].kind else {
        panic!("expected function");
    };
    let body = func.body.as_ref().expect("definition has a body");
    let NodeKind::For(stmt) = &body[0].kind else {
        panic!("expected for");
    };
    assert_eq!(stmt.init.len(), 1);
    assert!(matches!(stmt.cond.as_deref().map(|c| &c.kind), Some(NodeKind::Binary { op: BinaryOp::Less, .. })));
    assert!(matches!(stmt.body.kind, NodeKind::Call { ref callee, ref args } if callee == "tick" && args.len() == 1));
    assert!(matches!(body[1].kind, NodeKind::Return(Some(ref t)) if matches!(t.kind, NodeKind::Ternary { .. })));
}

#[test]
fn test_loader_rejects_unknown_operator() {
    let text = r#"{"definitions": [{"kind": "global_var", "name": "a", "type": "int",
        "init": {"kind": "binary", "op": "%", "lhs": {"kind": "number_i", "value": "1"}, "rhs": {"kind": "number_i", "value": "2"}}}]}"#;
    assert!(load_reg_json(text).is_err());
}
