//! Lexical scope management for scope resolution.
//!
//! This module provides `ScopeStack`, the stack of frames the resolution
//! pass keeps while it walks the tree. It handles:
//! - The global frame (nesting level 0), alive for the whole pass
//! - One frame per function or method body, and one per class body
//! - Lookup from the innermost frame outwards

use fool_core::SymbolEntry;
use rustc_hash::FxHashMap;

/// One frame: names declared at a single nesting level.
pub type Frame = FxHashMap<String, SymbolEntry>;

/// Stack of frames, innermost last.
///
/// The frame at index `n` holds the names declared at nesting level `n`.
#[derive(Debug)]
pub struct ScopeStack {
    frames: Vec<Frame>,
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeStack {
    /// Create a stack holding only the global frame.
    pub fn new() -> Self {
        Self {
            frames: vec![Frame::default()],
        }
    }

    /// Current nesting level (0 = global).
    pub fn nesting_level(&self) -> u32 {
        (self.frames.len() - 1) as u32
    }

    // ==========================================================================
    // Frame Management
    // ==========================================================================

    /// Enter a new, empty frame.
    pub fn push_frame(&mut self) {
        self.frames.push(Frame::default());
    }

    /// Enter a frame pre-populated with `frame` (a class body starting from
    /// its inherited members).
    pub fn push_frame_with(&mut self, frame: Frame) {
        self.frames.push(frame);
    }

    /// Leave the innermost frame, returning it.
    ///
    /// The global frame is never popped; `None` is returned instead.
    pub fn pop_frame(&mut self) -> Option<Frame> {
        if self.frames.len() > 1 {
            self.frames.pop()
        } else {
            None
        }
    }

    // ==========================================================================
    // Declarations
    // ==========================================================================

    /// Declare `name` in the innermost frame.
    ///
    /// The new entry always wins; the entry it replaced, if any, is returned
    /// so the caller can report the duplicate.
    pub fn insert(&mut self, name: &str, entry: SymbolEntry) -> Option<SymbolEntry> {
        self.innermost_mut().insert(name.to_string(), entry)
    }

    /// Replace the global entry for `name`.
    pub fn set_global(&mut self, name: &str, entry: SymbolEntry) {
        self.frames[0].insert(name.to_string(), entry);
    }

    // ==========================================================================
    // Lookup
    // ==========================================================================

    /// Look `name` up from the innermost frame down to the global one.
    pub fn lookup(&self, name: &str) -> Option<&SymbolEntry> {
        self.frames.iter().rev().find_map(|frame| frame.get(name))
    }

    /// Look `name` up in the innermost frame only.
    pub fn lookup_local(&self, name: &str) -> Option<&SymbolEntry> {
        self.frames.last().and_then(|frame| frame.get(name))
    }

    /// Look `name` up in the frame at `level` only.
    pub fn lookup_at(&self, level: u32, name: &str) -> Option<&SymbolEntry> {
        self.frames
            .get(level as usize)
            .and_then(|frame| frame.get(name))
    }

    /// Look `name` up in the global frame.
    pub fn lookup_global(&self, name: &str) -> Option<&SymbolEntry> {
        self.frames[0].get(name)
    }

    fn innermost_mut(&mut self) -> &mut Frame {
        let last = self.frames.len() - 1;
        &mut self.frames[last]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fool_core::Type;

    #[test]
    fn starts_at_global_level() {
        let mut scopes = ScopeStack::new();
        assert_eq!(scopes.nesting_level(), 0);
        assert!(scopes.pop_frame().is_none());
        assert_eq!(scopes.nesting_level(), 0);
    }

    #[test]
    fn inner_frames_shadow_outer() {
        let mut scopes = ScopeStack::new();
        scopes.insert("x", SymbolEntry::new(0, Type::Int, -2));
        scopes.push_frame();
        scopes.insert("x", SymbolEntry::new(1, Type::Bool, 1));

        assert_eq!(scopes.lookup("x").map(|e| e.nesting_level), Some(1));
        assert_eq!(scopes.lookup_global("x").map(|e| e.offset), Some(-2));

        scopes.pop_frame();
        assert_eq!(scopes.lookup("x").map(|e| &e.ty), Some(&Type::Int));
    }

    #[test]
    fn duplicate_returns_previous_and_later_wins() {
        let mut scopes = ScopeStack::new();
        assert!(scopes.insert("f", SymbolEntry::new(0, Type::Int, -2)).is_none());
        let previous = scopes.insert("f", SymbolEntry::new(0, Type::Bool, -3));

        assert_eq!(previous.map(|e| e.offset), Some(-2));
        assert_eq!(scopes.lookup("f").map(|e| e.offset), Some(-3));
    }

    #[test]
    fn local_lookup_ignores_outer_frames() {
        let mut scopes = ScopeStack::new();
        scopes.insert("g", SymbolEntry::new(0, Type::Int, -2));
        scopes.push_frame();

        assert!(scopes.lookup_local("g").is_none());
        assert!(scopes.lookup("g").is_some());
        assert!(scopes.lookup_at(0, "g").is_some());
        assert!(scopes.lookup_at(3, "g").is_none());
    }

    #[test]
    fn pushed_frame_keeps_its_entries() {
        let mut frame = Frame::default();
        frame.insert("m".to_string(), SymbolEntry::new(1, Type::Int, -1));

        let mut scopes = ScopeStack::new();
        scopes.push_frame_with(frame);
        assert_eq!(scopes.nesting_level(), 1);
        assert!(scopes.lookup_local("m").is_some());

        let popped = scopes.pop_frame().unwrap_or_default();
        assert!(popped.contains_key("m"));
    }
}
