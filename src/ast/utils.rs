use super::{SyntaxKind, SyntaxNode};

/// Extract the declared identifier from a declarator chain (helper function)
pub fn extract_identifier(declarator: &SyntaxNode) -> Option<&str> {
    match &declarator.kind {
        SyntaxKind::TypeDecl { declname, .. } => declname.as_deref(),
        SyntaxKind::PtrDecl { ty, .. } => extract_identifier(ty),
        SyntaxKind::ArrayDecl { ty, .. } => extract_identifier(ty),
        SyntaxKind::FuncDecl { ty, .. } => extract_identifier(ty),
        _ => None,
    }
}

/// Whether this node is a `void` type specifier wrapped in an unnamed declarator.
pub fn is_bare_void(node: &SyntaxNode) -> bool {
    let inner = match &node.kind {
        SyntaxKind::Typename { name: None, quals, ty } if quals.is_empty() => ty,
        _ => return false,
    };
    match &inner.kind {
        SyntaxKind::TypeDecl { declname: None, ty, .. } => {
            matches!(&ty.kind, SyntaxKind::IdentifierType { names } if names.len() == 1 && names[0] == "void")
        }
        _ => false,
    }
}
