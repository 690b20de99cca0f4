use serde_json::json;

use crate::ir::{BinaryOp, Node, NodeKind, SizeofArg, UnaryOp};
use crate::source::SourceLocation;
use crate::tests::test_utils::*;

fn loc() -> SourceLocation {
    SourceLocation::new(1, 1, "t.c")
}

fn sym(name: &str) -> Node {
    Node::new(NodeKind::Symbol(name.to_string()), loc())
}

#[test]
fn test_char_constant_becomes_codepoint() {
    let node = lower_expr(constant("char", "'A'"));
    assert_eq!(node.kind, NodeKind::Int("65".to_string()));

    let node = lower_expr(constant("char", "'é'"));
    assert_eq!(node.kind, NodeKind::Int("233".to_string()));

    let node = lower_expr(constant("char", r"'\n'"));
    assert_eq!(node.int_value(), Some(10));
}

#[test]
fn test_numeric_constants_keep_their_spelling() {
    assert_eq!(lower_expr(int("0x1F")).kind, NodeKind::Int("0x1F".to_string()));
    assert_eq!(lower_expr(constant("unsigned long int", "10UL")).kind, NodeKind::Int("10UL".to_string()));
    assert_eq!(lower_expr(constant("double", "1.5e3")).kind, NodeKind::Float("1.5e3".to_string()));
    assert_eq!(lower_expr(constant("float", "2.0f")).kind, NodeKind::Float("2.0f".to_string()));
}

#[test]
fn test_string_constant_loses_quotes() {
    let node = lower_expr(constant("string", r#""a\tb""#));
    assert_eq!(node.kind, NodeKind::Str("a\tb".to_string()));
}

#[test]
fn test_compound_assignment_expands() {
    let node = lower_expr(assign("+=", id("x"), id("y")));
    let expected = Node::assign(sym("x"), Node::binary(BinaryOp::Add, sym("x"), sym("y"), loc()), loc());
    assert_eq!(node, expected);
}

#[test]
fn test_plain_assignment() {
    let node = lower_expr(assign("=", id("x"), int("3")));
    let NodeKind::Assign { target, value } = node.kind else {
        panic!("expected assignment");
    };
    assert_eq!(target.kind, NodeKind::Symbol("x".to_string()));
    assert_eq!(value.kind, NodeKind::Int("3".to_string()));
}

#[test]
fn test_binary_operators() {
    for (symbol, op) in [("<<", BinaryOp::LShift), ("&&", BinaryOp::LogicAnd), ("!=", BinaryOp::NotEqual)] {
        let node = lower_expr(binop(symbol, id("a"), id("b")));
        assert_eq!(node, Node::binary(op, sym("a"), sym("b"), loc()));
    }
}

#[test]
fn test_unary_operators() {
    assert_eq!(lower_expr(unop("-", id("a"))), Node::unary(UnaryOp::Minus, sym("a"), loc()));
    assert_eq!(lower_expr(unop("p++", id("i"))), Node::unary(UnaryOp::PostIncrement, sym("i"), loc()));
    assert_eq!(lower_expr(unop("!", id("b"))), Node::unary(UnaryOp::LogicNot, sym("b"), loc()));
    // unary plus is dropped
    assert_eq!(lower_expr(unop("+", id("a"))), sym("a"));

    let node = lower_expr(unop("&", id("a")));
    assert_eq!(node.kind, NodeKind::Address(Box::new(sym("a"))));
    let node = lower_expr(unop("*", id("p")));
    assert_eq!(node.kind, NodeKind::Indirect(Box::new(sym("p"))));
}

#[test]
fn test_sizeof_type_and_expression() {
    let typename = json!({"_nodetype": "Typename", "name": null, "quals": [], "type": type_decl(None, "unsigned int")});
    let node = lower_expr(unop("sizeof", typename));
    let NodeKind::SizeOf(SizeofArg::Type(ty)) = node.kind else {
        panic!("expected sizeof(type)");
    };
    assert_eq!(ty.to_string(), "unsigned int");

    let node = lower_expr(unop("sizeof", id("x")));
    assert_eq!(node.kind, NodeKind::SizeOf(SizeofArg::Expr(Box::new(sym("x")))));
}

#[test]
fn test_array_subscript_is_pointer_arithmetic() {
    let node = lower_expr(json!({"_nodetype": "ArrayRef", "name": id("a"), "subscript": id("i"), "coord": COORD}));
    let sum = Node::binary(BinaryOp::Add, sym("a"), sym("i"), loc());
    assert_eq!(node.kind, NodeKind::Indirect(Box::new(sum)));
}

#[test]
fn test_field_access_notations_share_a_shape() {
    let dot = lower_expr(json!({"_nodetype": "StructRef", "name": id("a"), "type": ".", "field": id("f"), "coord": COORD}));
    let arrow = lower_expr(json!({"_nodetype": "StructRef", "name": id("p"), "type": "->", "field": id("f"), "coord": COORD}));

    let NodeKind::Indirect(dot_access) = dot.kind else {
        panic!("expected indirection around a.f");
    };
    let NodeKind::FieldAccess { base, field } = dot_access.kind else {
        panic!("expected field access");
    };
    assert_eq!(field, "f");
    assert_eq!(base.kind, NodeKind::Address(Box::new(sym("a"))));

    let NodeKind::Indirect(arrow_access) = arrow.kind else {
        panic!("expected indirection around p->f");
    };
    let NodeKind::FieldAccess { base, field } = arrow_access.kind else {
        panic!("expected field access");
    };
    assert_eq!(field, "f");
    assert_eq!(*base, sym("p"));
}

#[test]
fn test_call_arguments_in_order() {
    let call = json!({
        "_nodetype": "FuncCall",
        "name": id("f"),
        "args": {"_nodetype": "ExprList", "exprs": [int("1"), id("x")]},
        "coord": COORD,
    });
    let NodeKind::Call { callee, args } = lower_expr(call).kind else {
        panic!("expected call");
    };
    assert_eq!(callee, "f");
    assert_eq!(args.len(), 2);
    assert_eq!(args[0].kind, NodeKind::Int("1".to_string()));
    assert_eq!(args[1], sym("x"));

    let no_args = json!({"_nodetype": "FuncCall", "name": id("g"), "args": null, "coord": COORD});
    assert_eq!(
        lower_expr(no_args).kind,
        NodeKind::Call {
            callee: "g".to_string(),
            args: Vec::new()
        }
    );
}

#[test]
fn test_ternary_cast_and_comma() {
    let ternary = json!({"_nodetype": "TernaryOp", "cond": id("c"), "iftrue": int("1"), "iffalse": int("2"), "coord": COORD});
    assert!(matches!(lower_expr(ternary).kind, NodeKind::Ternary { .. }));

    let cast = json!({
        "_nodetype": "Cast",
        "to_type": {"_nodetype": "Typename", "name": null, "quals": [], "type": ptr(type_decl(None, "char"))},
        "expr": id("p"),
        "coord": COORD,
    });
    let NodeKind::Cast { ty, expr } = lower_expr(cast).kind else {
        panic!("expected cast");
    };
    assert_eq!(ty.to_string(), "char*");
    assert_eq!(*expr, sym("p"));

    let comma = json!({"_nodetype": "ExprList", "exprs": [id("a"), id("b")], "coord": COORD});
    assert_eq!(lower_expr(comma).kind, NodeKind::Sequence(vec![sym("a"), sym("b")]));
}

#[test]
fn test_raw_instruction() {
    let raw = json!({
        "_nodetype": "Raw",
        "type": {"_nodetype": "Typename", "name": null, "quals": [], "type": type_decl(None, "int")},
        "opc": "\"addi\"",
        "arg": int("4"),
        "exprs": [id("a")],
        "coord": COORD,
    });
    let NodeKind::Raw {
        ty,
        opcode,
        immediate,
        args,
    } = lower_expr(raw).kind
    else {
        panic!("expected raw instruction");
    };
    assert_eq!(ty.to_string(), "int");
    assert_eq!(opcode, "addi");
    assert_eq!(immediate, 4);
    assert_eq!(args, vec![sym("a")]);
}

#[test]
fn test_node_without_coord_gets_sentinel_location() {
    let node = lower_expr(json!({"_nodetype": "ID", "name": "x", "coord": null}));
    assert!(node.location.is_sentinel());
}
