//! Symbol table entries.

use crate::Type;

/// What a declaration resolved to: where it lives and what type it has.
///
/// Entries are immutable once created. When a subclass overrides an
/// inherited field or method, it gets a *new* entry that carries the
/// ancestor's offset (or dispatch slot), so address arithmetic is the same
/// across the whole hierarchy.
///
/// The meaning of `offset` depends on the kind of declaration:
///
/// | declaration | offset |
/// |-------------|--------|
/// | local var / fun / class | `-2, -3, ...` from the frame pointer |
/// | parameter | `1, 2, ...` from the frame pointer |
/// | field | `-1, -2, ...` from the object base |
/// | method | dispatch slot `0, 1, ...` |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolEntry {
    /// Lexical depth where the name was declared (0 = global).
    pub nesting_level: u32,
    /// Declared type.
    pub ty: Type,
    /// Storage offset or dispatch slot.
    pub offset: i32,
}

impl SymbolEntry {
    /// Create a new entry.
    pub fn new(nesting_level: u32, ty: Type, offset: i32) -> Self {
        Self {
            nesting_level,
            ty,
            offset,
        }
    }

    /// A new entry with a different type that keeps this entry's position.
    ///
    /// Used for overrides: the inherited slot is reused, never reallocated.
    pub fn overridden_by(&self, nesting_level: u32, ty: Type) -> Self {
        Self::new(nesting_level, ty, self.offset)
    }

    /// Whether this entry names a method.
    pub fn is_method(&self) -> bool {
        self.ty.is_method()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ArrowType;

    #[test]
    fn override_keeps_offset() {
        let inherited = SymbolEntry::new(1, Type::Int, -3);
        let overriding = inherited.overridden_by(1, Type::Bool);
        assert_eq!(overriding.offset, -3);
        assert_eq!(overriding.ty, Type::Bool);
        // The inherited entry is untouched.
        assert_eq!(inherited.ty, Type::Int);
    }

    #[test]
    fn method_entries_are_recognised() {
        let method = SymbolEntry::new(1, Type::Method(ArrowType::new(vec![], Type::Int)), 0);
        assert!(method.is_method());
        assert!(!SymbolEntry::new(0, Type::Int, -2).is_method());
    }
}
