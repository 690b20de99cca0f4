use serde_json::json;

use crate::ir::{Initializer, NodeKind};
use crate::semantic::Projected;
use crate::tests::test_utils::*;
use crate::types::{Decoration, MemberValue, StructuralHint, TypeQualifiers};

#[test]
fn test_array_of_pointers_vs_pointer_to_array() {
    // int *a[3];
    let array_of_ptrs = decl(Some("a"), array(ptr(type_decl(Some("a"), "int")), Some(int("3"))), None);
    // int (*p)[3];
    let ptr_to_array = decl(Some("p"), ptr(array(type_decl(Some("p"), "int"), Some(int("3")))), None);

    let items = project_success(file_ast(vec![array_of_ptrs, ptr_to_array]));
    let [a, p] = items.as_slice() else {
        panic!("expected two globals, got {:?}", items);
    };

    let NodeKind::GlobalVar(a) = &a.kind else {
        panic!("expected global variable");
    };
    assert_eq!(a.ty.outermost(), Some(Decoration::Array));
    assert_eq!(a.ty.pointer_depth(), 1);
    assert_eq!(a.ty.to_string(), "int*[3]");

    let NodeKind::GlobalVar(p) = &p.kind else {
        panic!("expected global variable");
    };
    assert_eq!(p.ty.outermost(), Some(Decoration::Pointer));
    assert_eq!(p.ty.pointer_depth(), 1);
    assert_eq!(p.ty.to_string(), "int (*)[3]");
    assert_ne!(a.ty.to_string(), p.ty.to_string());
}

#[test]
fn test_string_initializer_expands_to_codepoints() {
    // char s[] = "hi";
    let s = decl(Some("s"), array(type_decl(Some("s"), "char"), None), Some(constant("string", "\"hi\"")));
    let items = project_success(file_ast(vec![s]));
    let NodeKind::GlobalVar(var) = &items[0].kind else {
        panic!("expected global variable");
    };
    assert_eq!(var.ty.array_length(), None);
    let values: Vec<i64> = var
        .init
        .as_ref()
        .and_then(Initializer::as_flat_list)
        .expect("expected a flat initializer list")
        .into_iter()
        .filter_map(|n| n.int_value())
        .collect();
    assert_eq!(values, vec![104, 105, 0]);
}

#[test]
fn test_enum_values_continue_from_explicit_value() {
    // enum E { A, B = 5, C };
    let enumerators = json!({
        "_nodetype": "EnumeratorList",
        "enumerators": [
            {"_nodetype": "Enumerator", "name": "A", "value": null},
            {"_nodetype": "Enumerator", "name": "B", "value": int("5")},
            {"_nodetype": "Enumerator", "name": "C", "value": null},
        ],
    });
    let e = decl(None, json!({"_nodetype": "Enum", "name": "E", "values": enumerators}), None);
    let items = project_success(file_ast(vec![e]));

    let NodeKind::EnumDef { tag, ty } = &items[0].kind else {
        panic!("expected enum definition, got {:?}", items);
    };
    assert_eq!(tag.as_deref(), Some("E"));
    assert_eq!(ty.enumerator("A"), Some(0));
    assert_eq!(ty.enumerator("B"), Some(5));
    assert_eq!(ty.enumerator("C"), Some(6));
    let order: Vec<_> = ty.members().iter().filter_map(|m| m.name.as_deref()).collect();
    assert_eq!(order, vec!["A", "B", "C"]);
}

#[test]
fn test_enum_negative_and_char_values() {
    let enumerators = json!({
        "_nodetype": "EnumeratorList",
        "enumerators": [
            {"_nodetype": "Enumerator", "name": "NEG", "value": unop("-", int("2"))},
            {"_nodetype": "Enumerator", "name": "NEXT", "value": null},
            {"_nodetype": "Enumerator", "name": "LETTER", "value": constant("char", "'a'")},
        ],
    });
    let (result, diagnostics) = lower_at(json!({"_nodetype": "Enum", "name": null, "values": enumerators}), 0);
    assert!(diagnostics.is_empty());
    let Ok(Projected::Definition(def)) = result else {
        panic!("expected enum definition");
    };
    assert_eq!(def.hint, StructuralHint::Enum);
    let ty = def.ty.finish(None);
    assert_eq!(ty.enumerator("NEG"), Some(-2));
    assert_eq!(ty.enumerator("NEXT"), Some(-1));
    assert_eq!(ty.enumerator("LETTER"), Some(97));
}

#[test]
fn test_scope_depth_decides_global_or_local() {
    let (global, _) = lower_at(var("x", "int", None), 0);
    assert!(matches!(global, Ok(Projected::Node(ref n)) if matches!(n.kind, NodeKind::GlobalVar(_))));

    let (local, _) = lower_at(var("x", "int", None), 3);
    assert!(matches!(local, Ok(Projected::Node(ref n)) if matches!(n.kind, NodeKind::LocalVar(_))));
}

#[test]
fn test_nested_block_declaration_is_local() {
    let body = vec![compound(vec![compound(vec![var("x", "int", Some(int("1")))])])];
    let items = project_success(file_ast(vec![var("g", "int", None), func_def("main", "int", None, body)]));

    assert!(matches!(items[0].kind, NodeKind::GlobalVar(ref v) if v.name == "g"));
    let NodeKind::Function(func) = &items[1].kind else {
        panic!("expected function");
    };
    let body = func.body.as_ref().expect("definition has a body");
    let NodeKind::Block(outer) = &body[0].kind else {
        panic!("expected block");
    };
    let NodeKind::Block(inner) = &outer[0].kind else {
        panic!("expected nested block");
    };
    let NodeKind::LocalVar(x) = &inner[0].kind else {
        panic!("expected local variable");
    };
    assert_eq!(x.name, "x");
    assert_eq!(x.ty.name(), Some("x"));
}

#[test]
fn test_declaration_qualifiers_apply_to_type() {
    let mut c = var("c", "int", Some(int("1")));
    c["quals"] = json!(["const", "volatile"]);
    let items = project_success(file_ast(vec![c]));
    let NodeKind::GlobalVar(var) = &items[0].kind else {
        panic!("expected global variable");
    };
    assert_eq!(var.ty.qualifiers(), TypeQualifiers::CONST | TypeQualifiers::VOLATILE);
    assert_eq!(var.ty.to_string(), "const volatile int");
}

#[test]
fn test_function_signature_and_void_params() {
    let items = project_success(file_ast(vec![func_def("main", "int", Some(void_params()), vec![ret(Some(int("0")))])]));
    let NodeKind::Function(func) = &items[0].kind else {
        panic!("expected function");
    };
    assert_eq!(func.signature.name, "main");
    assert_eq!(func.signature.return_type.to_string(), "int");
    assert!(func.signature.params.is_empty());
    let body = func.body.as_ref().expect("definition has a body");
    assert!(matches!(body[0].kind, NodeKind::Return(Some(_))));
}

#[test]
fn test_function_declaration_with_named_params() {
    // char *copy(char *dst, const char *src);
    let mut src = decl(Some("src"), ptr(type_decl(Some("src"), "char")), None);
    src["quals"] = json!(["const"]);
    let params = json!({
        "_nodetype": "ParamList",
        "params": [decl(Some("dst"), ptr(type_decl(Some("dst"), "char")), None), src],
    });
    let func_decl = json!({"_nodetype": "FuncDecl", "args": params, "type": ptr(type_decl(Some("copy"), "char"))});
    let items = project_success(file_ast(vec![decl(Some("copy"), func_decl, None)]));

    let NodeKind::Function(func) = &items[0].kind else {
        panic!("expected function declaration");
    };
    assert!(func.body.is_none());
    assert_eq!(func.signature.return_type.to_string(), "char*");
    let params: Vec<_> = func
        .signature
        .params
        .iter()
        .map(|p| (p.name.clone().unwrap_or_default(), p.ty.to_string()))
        .collect();
    assert_eq!(
        params,
        vec![
            ("dst".to_string(), "char*".to_string()),
            ("src".to_string(), "const char*".to_string()),
        ]
    );
}

#[test]
fn test_struct_definition_members_in_order() {
    let members = json!([var("x", "int", None), decl(Some("next"), ptr(type_decl_of(Some("next"), json!({"_nodetype": "Struct", "name": "node", "decls": null}))), None)]);
    let s = decl(None, json!({"_nodetype": "Struct", "name": "node", "decls": members}), None);
    let items = project_success(file_ast(vec![s]));

    let NodeKind::StructDef { tag, ty } = &items[0].kind else {
        panic!("expected struct definition");
    };
    assert_eq!(tag.as_deref(), Some("node"));
    let fields: Vec<_> = ty
        .members()
        .iter()
        .map(|m| match &m.value {
            MemberValue::Field(t) => (m.name.clone().unwrap_or_default(), t.to_string()),
            MemberValue::Enumerator(_) => panic!("struct member is an enumerator"),
        })
        .collect();
    assert_eq!(
        fields,
        vec![("x".to_string(), "int".to_string()), ("next".to_string(), "struct node*".to_string())]
    );
}

#[test]
fn test_struct_forward_declaration_yields_nothing() {
    let s = decl(None, json!({"_nodetype": "Struct", "name": "S", "decls": null}), None);
    let items = project_success(file_ast(vec![s, var("x", "int", None)]));
    assert_eq!(items.len(), 1);
    assert!(matches!(items[0].kind, NodeKind::GlobalVar(_)));
}

#[test]
fn test_struct_variable_is_forward_reference() {
    // struct S v;
    let v = decl(Some("v"), type_decl_of(Some("v"), json!({"_nodetype": "Struct", "name": "S", "decls": null})), None);
    let items = project_success(file_ast(vec![v]));
    let NodeKind::GlobalVar(var) = &items[0].kind else {
        panic!("expected global variable");
    };
    assert!(var.ty.is_forward_reference());
    assert_eq!(var.ty.hint(), Some(StructuralHint::Struct));
    assert_eq!(var.ty.to_string(), "struct S");
}

#[test]
fn test_typedef_of_anonymous_struct_binds_its_type() {
    // typedef struct { int x; } point;
    let body = json!({"_nodetype": "Struct", "name": null, "decls": [var("x", "int", None)]});
    let td = json!({
        "_nodetype": "Typedef",
        "name": "point",
        "quals": [],
        "storage": ["typedef"],
        "type": type_decl_of(Some("point"), body),
        "coord": COORD,
    });
    let items = project_success(file_ast(vec![td]));
    let NodeKind::Typedef { name, ty } = &items[0].kind else {
        panic!("expected typedef");
    };
    assert_eq!(name, "point");
    assert_eq!(ty.name(), Some("point"));
    assert_eq!(ty.members().len(), 1);
}

#[test]
fn test_initializer_list() {
    // int v[2] = {1, 2};
    let init = json!({"_nodetype": "InitList", "exprs": [int("1"), int("2")], "coord": COORD});
    let v = decl(Some("v"), array(type_decl(Some("v"), "int"), Some(int("2"))), Some(init));
    let items = project_success(file_ast(vec![v]));
    let NodeKind::GlobalVar(var) = &items[0].kind else {
        panic!("expected global variable");
    };
    assert_eq!(var.ty.array_length().and_then(|n| n.int_value()), Some(2));
    let values: Vec<_> = var
        .init
        .as_ref()
        .and_then(Initializer::as_flat_list)
        .expect("flat list")
        .into_iter()
        .filter_map(|n| n.int_value())
        .collect();
    assert_eq!(values, vec![1, 2]);
}

#[test]
fn test_declaration_list_is_flattened() {
    let list = json!({"_nodetype": "DeclList", "decls": [var("a", "int", None), var("b", "int", None)], "coord": COORD});
    let (result, _) = lower_at(list, 1);
    let Ok(Projected::List(nodes)) = result else {
        panic!("expected a list");
    };
    assert_eq!(nodes.len(), 2);
    assert!(nodes.iter().all(|n| matches!(n.kind, NodeKind::LocalVar(_))));
}
