//! Scope stack
//!
//! Every executed block enters a fresh scope at its start and leaves it at
//! its end. A frame records the names `def` introduced while that frame was
//! the innermost, so they can be unbound when the frame is popped.

use std::collections::HashSet;

#[derive(Clone, Debug, Default)]
pub(crate) struct ScopeStack {
    frames: Vec<HashSet<String>>,
}

impl ScopeStack {
    pub fn new() -> Self {
        ScopeStack { frames: Vec::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Push an empty frame
    pub fn enter(&mut self) {
        self.frames.push(HashSet::new());
    }

    /// Pop the innermost frame, yielding the names recorded in it. The
    /// caller unbinds each one from the function table.
    pub fn pop_frame(&mut self) -> Option<HashSet<String>> {
        self.frames.pop()
    }

    /// Record `name` in the innermost frame (set semantics). No-op when no
    /// frame is open.
    pub fn record(&mut self, name: &str) {
        if let Some(frame) = self.frames.last_mut() {
            frame.insert(name.to_string());
        }
    }

    /// Was `name` introduced in the innermost frame?
    pub fn top_contains(&self, name: &str) -> bool {
        self.frames
            .last()
            .is_some_and(|frame| frame.contains(name))
    }
}
