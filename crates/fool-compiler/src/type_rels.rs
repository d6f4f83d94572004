//! Subtyping, override compatibility and the join of two types.
//!
//! All functions are pure; class ancestry comes from a [`ClassHierarchy`].
//!
//! | sub | super | rule |
//! |-----|-------|------|
//! | `bool` | `int` | boolean widens to integer |
//! | `null` | any class | null fits every reference |
//! | `B` | `A` | `A` is `B` or one of its ancestors |
//! | `(P) -> R` | `(P') -> R'` | same arity, `R <: R'`, every `P' <: P` |

use fool_core::{ArrowType, Type};

use crate::class_table::ClassHierarchy;

/// Whether `sub` can be used where `sup` is expected.
pub fn is_subtype(sub: &Type, sup: &Type, hierarchy: &ClassHierarchy) -> bool {
    match (sub, sup) {
        (Type::Int, Type::Int) | (Type::Bool, Type::Bool) | (Type::Bool, Type::Int) => true,
        (Type::Empty, Type::Empty) | (Type::Empty, Type::Ref(_)) => true,
        (Type::Ref(a), Type::Ref(b)) => a == b || hierarchy.is_ancestor(b, a),
        (Type::Arrow(a) | Type::Method(a), Type::Arrow(b) | Type::Method(b)) => {
            is_valid_override(a, b, hierarchy)
        }
        (Type::Class(a), Type::Class(b)) => a == b,
        _ => false,
    }
}

/// Whether a routine of type `overriding` may stand in for `overridden`:
/// identical arity, covariant return, contravariant parameters.
pub fn is_valid_override(
    overriding: &ArrowType,
    overridden: &ArrowType,
    hierarchy: &ClassHierarchy,
) -> bool {
    overriding.arity() == overridden.arity()
        && is_subtype(&overriding.ret, &overridden.ret, hierarchy)
        && overridden
            .params
            .iter()
            .zip(&overriding.params)
            .all(|(base, own)| is_subtype(base, own, hierarchy))
}

/// The most specific type both `a` and `b` are subtypes of, if any.
pub fn lowest_common_ancestor(a: &Type, b: &Type, hierarchy: &ClassHierarchy) -> Option<Type> {
    if is_subtype(a, b, hierarchy) {
        return Some(b.clone());
    }
    if is_subtype(b, a, hierarchy) {
        return Some(a.clone());
    }
    let Type::Ref(class) = a else {
        return None;
    };
    if !matches!(b, Type::Ref(_)) {
        return None;
    }
    std::iter::once(class.as_str())
        .chain(hierarchy.ancestors(class))
        .map(Type::reference)
        .find(|candidate| is_subtype(b, candidate, hierarchy))
}
