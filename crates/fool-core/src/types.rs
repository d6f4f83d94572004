//! Type representation.
//!
//! The language has a closed set of types:
//!
//! - `int` and `bool` primitives
//! - arrow types for functions
//! - class types (the type of a class declaration itself)
//! - method types (an arrow that is dispatched through a dispatch table)
//! - reference types (values that point at an object of a named class)
//! - the empty type of the `null` literal
//! - a transient incomplete marker used while a class is still being built
//!
//! # Example
//!
//! ```
//! use fool_core::{ArrowType, Type};
//!
//! let add = ArrowType::new(vec![Type::Int, Type::Int], Type::Int);
//! assert_eq!(Type::Arrow(add).to_string(), "(int, int) -> int");
//! ```

use std::fmt::{self, Display, Formatter};

/// A function signature: parameter types and a return type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArrowType {
    /// Parameter types, in declaration order.
    pub params: Vec<Type>,
    /// Return type.
    pub ret: Box<Type>,
}

impl ArrowType {
    /// Create an arrow type.
    pub fn new(params: Vec<Type>, ret: Type) -> Self {
        Self {
            params,
            ret: Box::new(ret),
        }
    }

    /// Number of parameters.
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

/// The type of a class declaration.
///
/// Both lists are positionally addressed: `fields[i]` is the field stored
/// at offset `-(i + 1)` from the object base, and `methods[i]` is the
/// method in dispatch slot `i`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ClassType {
    /// Field types, indexed by `-(offset + 1)`.
    pub fields: Vec<Type>,
    /// Method signatures, indexed by dispatch slot.
    pub methods: Vec<ArrowType>,
}

impl ClassType {
    /// Create an empty class type.
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a field type at the position implied by its offset.
    ///
    /// An offset already present in the list (an override) replaces the
    /// inherited type; a fresh offset extends the list.
    pub fn set_field(&mut self, offset: i32, ty: Type) {
        let index = field_index(offset);
        if index < self.fields.len() {
            self.fields[index] = ty;
        } else {
            self.fields.resize(index, Type::Incomplete);
            self.fields.push(ty);
        }
    }

    /// Place a method signature at its dispatch slot.
    pub fn set_method(&mut self, slot: i32, arrow: ArrowType) {
        let index = slot.max(0) as usize;
        if index < self.methods.len() {
            self.methods[index] = arrow;
        } else {
            self.methods
                .resize(index, ArrowType::new(Vec::new(), Type::Incomplete));
            self.methods.push(arrow);
        }
    }

    /// Type of the field stored at `offset`, if any.
    pub fn field_at(&self, offset: i32) -> Option<&Type> {
        self.fields.get(field_index(offset))
    }

    /// Signature of the method in dispatch slot `slot`, if any.
    pub fn method_at(&self, slot: i32) -> Option<&ArrowType> {
        usize::try_from(slot).ok().and_then(|i| self.methods.get(i))
    }
}

fn field_index(offset: i32) -> usize {
    (-offset - 1).max(0) as usize
}

/// A type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    /// Integer.
    Int,
    /// Boolean (widens to integer).
    Bool,
    /// Free function.
    Arrow(ArrowType),
    /// Class declaration.
    Class(ClassType),
    /// Method, dispatched through the receiver's dispatch table.
    Method(ArrowType),
    /// Reference to an object of the named class.
    Ref(String),
    /// Type of `null`.
    Empty,
    /// Placeholder for a declaration whose type is not known yet.
    Incomplete,
}

impl Type {
    /// Create a reference type to the named class.
    pub fn reference(class: impl Into<String>) -> Self {
        Type::Ref(class.into())
    }

    /// The callable signature of a function or method type.
    pub fn as_arrow(&self) -> Option<&ArrowType> {
        match self {
            Type::Arrow(arrow) | Type::Method(arrow) => Some(arrow),
            _ => None,
        }
    }

    /// Whether this is a method type.
    pub fn is_method(&self) -> bool {
        matches!(self, Type::Method(_))
    }

    /// Whether this is a function or method type.
    pub fn is_callable(&self) -> bool {
        matches!(self, Type::Arrow(_) | Type::Method(_))
    }

    /// Whether this type, or any type it contains, is still incomplete.
    pub fn is_incomplete(&self) -> bool {
        match self {
            Type::Incomplete => true,
            Type::Arrow(arrow) | Type::Method(arrow) => arrow_is_incomplete(arrow),
            Type::Class(class) => {
                class.fields.iter().any(Type::is_incomplete)
                    || class.methods.iter().any(arrow_is_incomplete)
            }
            Type::Int | Type::Bool | Type::Ref(_) | Type::Empty => false,
        }
    }
}

fn arrow_is_incomplete(arrow: &ArrowType) -> bool {
    arrow.params.iter().any(Type::is_incomplete) || arrow.ret.is_incomplete()
}

impl Display for ArrowType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{param}")?;
        }
        write!(f, ") -> {}", self.ret)
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Type::Int => write!(f, "int"),
            Type::Bool => write!(f, "bool"),
            Type::Arrow(arrow) => write!(f, "{arrow}"),
            Type::Class(class) => write!(
                f,
                "class({} fields, {} methods)",
                class.fields.len(),
                class.methods.len()
            ),
            Type::Method(arrow) => write!(f, "method {arrow}"),
            Type::Ref(name) => write!(f, "{name}"),
            Type::Empty => write!(f, "null"),
            Type::Incomplete => write!(f, "<incomplete>"),
        }
    }
}
