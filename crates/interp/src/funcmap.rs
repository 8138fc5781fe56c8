//! Function table
//!
//! Maps a name to a stack of bindings in shadowing order: the most recent
//! binding is the active one, and removing it restores whatever was bound
//! before. Bodies are either host-registered callbacks or user code.

use crate::program::Program;
use crate::token::Code;
use std::collections::HashMap;
use std::sync::Arc;

/// Host-registered native operation
pub type NativeFn = Arc<dyn Fn(&mut Program) -> Result<(), String> + Send + Sync>;

/// What runs when a bound name is called
#[derive(Clone)]
pub enum FuncBody {
    Native(NativeFn),
    Code(Arc<Code>),
}

#[derive(Clone, Default)]
pub(crate) struct FuncMap {
    entries: HashMap<String, Vec<FuncBody>>,
}

impl FuncMap {
    pub fn new() -> Self {
        FuncMap {
            entries: HashMap::new(),
        }
    }

    /// Active binding for `name`, if any
    pub fn lookup(&self, name: &str) -> Option<&FuncBody> {
        self.entries.get(name).and_then(|chain| chain.last())
    }

    /// Bind `name` on top of any existing binding
    pub fn bind_shadow(&mut self, name: &str, body: FuncBody) {
        self.entries.entry(name.to_string()).or_default().push(body);
    }

    /// Remove the active binding for `name`, restoring the previous one.
    /// Returns whether a binding was removed.
    pub fn unbind_head(&mut self, name: &str) -> bool {
        let Some(chain) = self.entries.get_mut(name) else {
            return false;
        };
        let removed = chain.pop().is_some();
        if chain.is_empty() {
            self.entries.remove(name);
        }
        removed
    }
}
