//! Class table and class hierarchy.
//!
//! The class table outlives scope resolution: type checking reads the
//! completed class types and virtual tables from it, and code generation
//! reads each class's global offset and method slots.
//!
//! A subclass's virtual table starts as a copy of its superclass's, so an
//! inherited member keeps the superclass's offset or dispatch slot.

use fool_core::{ClassType, CompilationError, Span, SymbolEntry, Type};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::scope::Frame;

// ============================================================================
// VirtualTable
// ============================================================================

/// Per-class mapping from member name to its entry, inherited members
/// included.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VirtualTable {
    members: FxHashMap<String, SymbolEntry>,
}

impl VirtualTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entry for `name`, field or method.
    pub fn get(&self, name: &str) -> Option<&SymbolEntry> {
        self.members.get(name)
    }

    /// Entry for `name` if it names a method.
    pub fn method(&self, name: &str) -> Option<&SymbolEntry> {
        self.get(name).filter(|entry| entry.is_method())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.members.contains_key(name)
    }

    /// Add or replace a member.
    pub fn insert(&mut self, name: impl Into<String>, entry: SymbolEntry) -> Option<SymbolEntry> {
        self.members.insert(name.into(), entry)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Fields, ordered by offset (`-1` first).
    pub fn fields(&self) -> Vec<(&str, &SymbolEntry)> {
        let mut fields: Vec<_> = self
            .members
            .iter()
            .filter(|(_, entry)| !entry.is_method())
            .map(|(name, entry)| (name.as_str(), entry))
            .collect();
        fields.sort_by(|a, b| b.1.offset.cmp(&a.1.offset));
        fields
    }

    /// Methods, ordered by dispatch slot.
    pub fn methods(&self) -> Vec<(&str, &SymbolEntry)> {
        let mut methods: Vec<_> = self
            .members
            .iter()
            .filter(|(_, entry)| entry.is_method())
            .map(|(name, entry)| (name.as_str(), entry))
            .collect();
        methods.sort_by_key(|(_, entry)| entry.offset);
        methods
    }

    /// A scope frame holding a copy of every member.
    pub fn to_frame(&self) -> Frame {
        self.members.clone()
    }
}

impl From<Frame> for VirtualTable {
    fn from(members: Frame) -> Self {
        Self { members }
    }
}

// ============================================================================
// ClassHierarchy
// ============================================================================

/// Single-inheritance superclass map.
///
/// Edges that would close a cycle are rejected, so every ancestor walk
/// terminates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassHierarchy {
    parents: FxHashMap<String, String>,
}

impl ClassHierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `child` extends `parent`.
    ///
    /// Returns [`CompilationError::CircularInheritance`] if `parent` is
    /// `child` itself or already descends from it; the edge is not added.
    pub fn set_parent(
        &mut self,
        child: &str,
        parent: &str,
        span: Span,
    ) -> Result<(), CompilationError> {
        if child == parent || self.is_ancestor(child, parent) {
            return Err(CompilationError::CircularInheritance {
                name: child.to_string(),
                span,
            });
        }
        self.parents.insert(child.to_string(), parent.to_string());
        Ok(())
    }

    /// Forget the superclass of `class`, returning it.
    pub fn remove_parent(&mut self, class: &str) -> Option<String> {
        self.parents.remove(class)
    }

    /// Direct superclass of `class`.
    pub fn parent(&self, class: &str) -> Option<&str> {
        self.parents.get(class).map(String::as_str)
    }

    /// Proper ancestors of `class`, nearest first.
    pub fn ancestors<'h>(&'h self, class: &str) -> Ancestors<'h> {
        Ancestors {
            hierarchy: self,
            next: self.parent(class),
            seen: FxHashSet::default(),
        }
    }

    /// Whether `ancestor` is a proper ancestor of `class`.
    pub fn is_ancestor(&self, ancestor: &str, class: &str) -> bool {
        self.ancestors(class).any(|a| a == ancestor)
    }
}

/// Iterator over a class's ancestors, nearest first.
pub struct Ancestors<'h> {
    hierarchy: &'h ClassHierarchy,
    next: Option<&'h str>,
    seen: FxHashSet<&'h str>,
}

impl<'h> Iterator for Ancestors<'h> {
    type Item = &'h str;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        // set_parent keeps the map acyclic; stop anyway if a loop shows up.
        if !self.seen.insert(current) {
            self.next = None;
            return None;
        }
        self.next = self.hierarchy.parent(current);
        Some(current)
    }
}

// ============================================================================
// ClassTable
// ============================================================================

/// Everything known about one class.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassInfo {
    /// The class's global entry: nesting level 0, its `Type::Class`, and the
    /// global slot holding its dispatch table address. Holds
    /// `Type::Incomplete` while the class body is being resolved.
    pub entry: SymbolEntry,
    /// Name of the direct superclass, if it resolved.
    pub superclass: Option<String>,
    /// Member name to entry, inherited members included.
    pub virtual_table: VirtualTable,
}

impl ClassInfo {
    /// The completed class type, or `None` while the class is still being
    /// resolved.
    pub fn class_type(&self) -> Option<&ClassType> {
        match &self.entry.ty {
            Type::Class(class) => Some(class),
            _ => None,
        }
    }
}

/// Class name to [`ClassInfo`], plus the hierarchy built from it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassTable {
    classes: FxHashMap<String, ClassInfo>,
    order: Vec<String>,
    hierarchy: ClassHierarchy,
}

impl ClassTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `name` known. A redeclaration replaces the earlier class.
    pub fn declare(&mut self, name: &str, info: ClassInfo) {
        if self.classes.insert(name.to_string(), info).is_none() {
            self.order.push(name.to_string());
        }
    }

    /// Store the finished entry and virtual table of `name`.
    pub fn complete(&mut self, name: &str, entry: SymbolEntry, virtual_table: VirtualTable) {
        if let Some(info) = self.classes.get_mut(name) {
            info.entry = entry;
            info.virtual_table = virtual_table;
        }
    }

    pub fn get(&self, name: &str) -> Option<&ClassInfo> {
        self.classes.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    /// Virtual table of `name`.
    pub fn virtual_table(&self, name: &str) -> Option<&VirtualTable> {
        self.get(name).map(|info| &info.virtual_table)
    }

    /// Completed class type of `name`.
    pub fn class_type(&self, name: &str) -> Option<&ClassType> {
        self.get(name).and_then(ClassInfo::class_type)
    }

    pub fn hierarchy(&self) -> &ClassHierarchy {
        &self.hierarchy
    }

    pub fn hierarchy_mut(&mut self) -> &mut ClassHierarchy {
        &mut self.hierarchy
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Classes in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ClassInfo)> {
        self.order
            .iter()
            .filter_map(|name| self.classes.get_key_value(name))
            .map(|(name, info)| (name.as_str(), info))
    }
}
