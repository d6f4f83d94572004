//! Compilation error types.
//!
//! Every pass collects [`CompilationError`]s instead of printing them. The
//! errors fall into the categories reported by [`ErrorCategory`]:
//!
//! ```text
//! CompilationError
//! ├── Duplicate     - same name twice in one scope or class
//! ├── Unresolved    - identifier, function, class, superclass or method not found
//! ├── KindMismatch  - a name used as the wrong kind of thing
//! ├── TypeMismatch  - operand, argument, return, initializer or override type
//! ├── Arity         - wrong argument count at a call or constructor
//! └── Structural    - malformed class hierarchy
//! ```

use std::fmt;

use thiserror::Error;

use crate::Span;

/// Kind of a lexically scoped declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclKind {
    Variable,
    Function,
    Parameter,
    Class,
}

impl DeclKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeclKind::Variable => "variable",
            DeclKind::Function => "function",
            DeclKind::Parameter => "parameter",
            DeclKind::Class => "class",
        }
    }
}

impl fmt::Display for DeclKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of a class member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    Field,
    Method,
}

impl MemberKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberKind::Field => "field",
            MemberKind::Method => "method",
        }
    }
}

impl fmt::Display for MemberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What kind of name a failed lookup was looking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RefKind {
    /// A variable, parameter or field used as a value.
    Identifier,
    /// A function or method called by name.
    Function,
    /// A class named in a type annotation or `new`.
    Class,
    /// A class named after `extends`.
    Superclass,
}

impl RefKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RefKind::Identifier => "identifier",
            RefKind::Function => "function",
            RefKind::Class => "class",
            RefKind::Superclass => "superclass",
        }
    }
}

impl fmt::Display for RefKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Broad classification of a [`CompilationError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Duplicate,
    Unresolved,
    KindMismatch,
    TypeMismatch,
    Arity,
    Structural,
}

/// Errors found during scope resolution and type checking.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompilationError {
    /// A name was declared twice in the same scope.
    #[error("at {span}: {kind} '{name}' already declared")]
    DuplicateDeclaration {
        kind: DeclKind,
        name: String,
        span: Span,
    },

    /// A field or method name was declared twice in one class body.
    #[error("at {span}: {kind} '{name}' declared twice in class '{class}'")]
    DuplicateMember {
        class: String,
        kind: MemberKind,
        name: String,
        span: Span,
    },

    /// A field reuses the name of an inherited method, or vice versa.
    #[error("at {span}: {kind} '{name}' in class '{class}' already declared as {existing}")]
    MemberKindConflict {
        class: String,
        kind: MemberKind,
        existing: MemberKind,
        name: String,
        span: Span,
    },

    /// A name could not be found in any enclosing scope.
    #[error("at {span}: {kind} '{name}' not declared")]
    Unresolved {
        kind: RefKind,
        name: String,
        span: Span,
    },

    /// A qualified call names a method the receiver's class does not have.
    #[error("at {span}: object '{object}' of class '{class}' has no method '{method}'")]
    UnknownMethod {
        object: String,
        class: String,
        method: String,
        span: Span,
    },

    /// A qualified call was made on something that is not an object.
    #[error("at {span}: '{name}' is not an object")]
    NotAnObject { name: String, span: Span },

    /// A function, method or class name was used as a value.
    #[error("at {span}: wrong usage of {what} identifier '{name}'")]
    NotAValue {
        what: &'static str,
        name: String,
        span: Span,
    },

    /// Something that is not a function or method was invoked.
    #[error("at {span}: invocation of non-function '{name}'")]
    NotCallable { name: String, span: Span },

    /// A type rule was violated.
    #[error("at {span}: {message}")]
    TypeMismatch { message: String, span: Span },

    /// Wrong number of arguments at a call or constructor.
    #[error("at {span}: '{name}' expects {expected} argument(s), got {found}")]
    ArityMismatch {
        name: String,
        expected: usize,
        found: usize,
        span: Span,
    },

    /// The superclass chain would loop back onto itself.
    #[error("at {span}: circular inheritance for '{name}'")]
    CircularInheritance { name: String, span: Span },
}

impl CompilationError {
    /// Get the span where this error occurred.
    pub fn span(&self) -> Span {
        match self {
            CompilationError::DuplicateDeclaration { span, .. } => *span,
            CompilationError::DuplicateMember { span, .. } => *span,
            CompilationError::MemberKindConflict { span, .. } => *span,
            CompilationError::Unresolved { span, .. } => *span,
            CompilationError::UnknownMethod { span, .. } => *span,
            CompilationError::NotAnObject { span, .. } => *span,
            CompilationError::NotAValue { span, .. } => *span,
            CompilationError::NotCallable { span, .. } => *span,
            CompilationError::TypeMismatch { span, .. } => *span,
            CompilationError::ArityMismatch { span, .. } => *span,
            CompilationError::CircularInheritance { span, .. } => *span,
        }
    }

    /// Source line of the offending node.
    pub fn line(&self) -> u32 {
        self.span().line
    }

    /// Classify this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            CompilationError::DuplicateDeclaration { .. }
            | CompilationError::DuplicateMember { .. } => ErrorCategory::Duplicate,
            CompilationError::Unresolved { .. } | CompilationError::UnknownMethod { .. } => {
                ErrorCategory::Unresolved
            }
            CompilationError::MemberKindConflict { .. }
            | CompilationError::NotAnObject { .. }
            | CompilationError::NotAValue { .. }
            | CompilationError::NotCallable { .. } => ErrorCategory::KindMismatch,
            CompilationError::TypeMismatch { .. } => ErrorCategory::TypeMismatch,
            CompilationError::ArityMismatch { .. } => ErrorCategory::Arity,
            CompilationError::CircularInheritance { .. } => ErrorCategory::Structural,
        }
    }

    /// Shorthand for a [`CompilationError::TypeMismatch`].
    pub fn type_mismatch(message: impl Into<String>, span: Span) -> Self {
        CompilationError::TypeMismatch {
            message: message.into(),
            span,
        }
    }
}
