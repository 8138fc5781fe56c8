//! Program state, evaluator, and embedding surface
//!
//! A `Program` owns an operand stack, a function table, a scope stack, and
//! the capture state used while a `{ ... }` block is being collected. Hosts
//! drive it through `run_source`, `register`, the stack accessors, and
//! `call_function`; everything else happens through the per-token dispatch
//! below.

use crate::builtins;
use crate::funcmap::{FuncBody, FuncMap};
use crate::scope::ScopeStack;
use crate::token::{self, Code, Token, TokenKind};
use crate::value::Value;
use std::sync::Arc;
use tracing::{debug, trace};

/// A block under construction. `depth` counts unmatched `{` since capture
/// began; the outermost one counts as 1.
pub(crate) struct Capture {
    pub code: Code,
    pub depth: usize,
}

/// One independent interpreter instance.
///
/// Programs are self-contained: two `Program` values share nothing and may
/// live on different threads. Execution is single-threaded within one
/// program and runs every operation to completion or to an error return.
pub struct Program {
    pub(crate) stack: Vec<Value>,
    pub(crate) funcs: FuncMap,
    pub(crate) scopes: ScopeStack,
    pub(crate) capture: Option<Capture>,
}

impl Program {
    /// Fresh program: empty stack, no user words, no open scopes.
    pub fn new() -> Self {
        Program {
            stack: Vec::new(),
            funcs: FuncMap::new(),
            scopes: ScopeStack::new(),
            capture: None,
        }
    }

    /// Bind `name` to a host callback, shadowing any existing binding.
    ///
    /// Native bindings follow the same shadowing discipline as `def` but
    /// are never recorded in a scope frame.
    pub fn register<F>(&mut self, name: &str, func: F)
    where
        F: Fn(&mut Program) -> Result<(), String> + Send + Sync + 'static,
    {
        debug!(word = name, "registered native function");
        self.funcs.bind_shadow(name, FuncBody::Native(Arc::new(func)));
    }

    /// Tokenize `source` and dispatch its tokens one at a time, stopping at
    /// the first error. On return the capture state is always inactive; a
    /// partial block left behind by an error is discarded.
    pub fn run_source(&mut self, source: &str) -> Result<(), String> {
        let tokens = token::tokenize(source)?;
        trace!(count = tokens.len(), "tokenized source");
        self.exec_code(&Code::from(tokens))
    }

    /// Current operand stack size.
    pub fn stack_size(&self) -> usize {
        self.stack.len()
    }

    /// Push a value onto the stack.
    ///
    /// The value is moved in; ownership transfer gives the same no-aliasing
    /// guarantee a deep copy would. Clone first to keep a copy.
    pub fn stack_push(&mut self, value: Value) {
        self.stack.push(value);
    }

    /// Push several values in order; the last one ends up on top.
    pub fn stack_pushes(&mut self, values: impl IntoIterator<Item = Value>) {
        for value in values {
            self.stack.push(value);
        }
    }

    /// Pop the top of the stack, transferring ownership to the caller.
    ///
    /// # Panics
    /// Panics when the stack is empty. Popping an empty stack is a host
    /// contract violation, not a recoverable interpreter error.
    pub fn stack_pop(&mut self) -> Value {
        match self.stack.pop() {
            Some(value) => value,
            None => panic!("stack pop on empty stack"),
        }
    }

    /// Resolve `name` the way the evaluator does - user or native binding
    /// first, then the builtin registry - and run it.
    pub fn call_function(&mut self, name: &str) -> Result<(), String> {
        if let Some(body) = self.funcs.lookup(name).cloned() {
            trace!(word = name, "calling bound function");
            return match body {
                FuncBody::Native(func) => func(self),
                FuncBody::Code(code) => self.exec_code(&code),
            };
        }
        if let Some(builtin) = builtins::lookup(name) {
            trace!(word = name, "calling builtin");
            return builtins::execute(self, name, builtin);
        }
        Err(format!("function or variable '{name}' not found"))
    }

    /// Run a token sequence through the dispatcher.
    ///
    /// An error mid-capture discards the partial block so the program is
    /// left clean; a body that opens a block and never closes it is itself
    /// an error.
    pub(crate) fn exec_code(&mut self, code: &Code) -> Result<(), String> {
        debug_assert!(self.capture.is_none());
        for token in code.tokens() {
            if let Err(err) = self.execute_token(token) {
                self.capture = None;
                return Err(err);
            }
        }
        if self.capture.take().is_some() {
            return Err("unclosed block".to_string());
        }
        Ok(())
    }

    /// Dispatch of one token: the capture pre-dispatch intercepts
    /// everything while a block is being collected; otherwise literals
    /// push themselves and names are called.
    fn execute_token(&mut self, token: &Token) -> Result<(), String> {
        if self.capture.is_some() {
            self.capture_token(token);
            return Ok(());
        }
        match token.kind {
            TokenKind::Num => {
                let value: f64 = token
                    .text
                    .parse()
                    .map_err(|_| format!("invalid number literal '{}'", token.text))?;
                self.stack.push(Value::Num(value));
                Ok(())
            }
            TokenKind::Str => {
                self.stack.push(Value::Str(token.text.clone()));
                Ok(())
            }
            TokenKind::Ppc => Err("no preprocessor commands known".to_string()),
            TokenKind::Word | TokenKind::Symbol => self.call_function(&token.text),
        }
    }

    /// Capture mode: buffer every token verbatim, tracking nested braces,
    /// until the matching `}` finalizes the block and pushes it.
    fn capture_token(&mut self, token: &Token) {
        let closing =
            token.is_symbol("}") && matches!(&self.capture, Some(capture) if capture.depth == 1);
        if closing {
            if let Some(capture) = self.capture.take() {
                let mut code = capture.code;
                code.push(Token::word(builtins::SCOPE_LEAVE));
                self.stack.push(Value::Block(code));
            }
            return;
        }
        if let Some(capture) = self.capture.as_mut() {
            if token.is_symbol("{") {
                capture.depth += 1;
            } else if token.is_symbol("}") {
                capture.depth -= 1;
            }
            capture.code.push(token.clone());
        }
    }

    /// `{`: start collecting tokens into a block. The buffer starts with a
    /// scope-enter token and the matching `}` appends the scope-leave, so
    /// every block body brackets its own scope.
    pub(crate) fn begin_capture(&mut self) {
        debug_assert!(self.capture.is_none());
        let mut code = Code::new();
        code.push(Token::word(builtins::SCOPE_ENTER));
        self.capture = Some(Capture { code, depth: 1 });
    }

    /// Pop the innermost scope frame and unbind every name recorded in it.
    pub(crate) fn leave_scope(&mut self) -> Result<(), String> {
        let Some(frame) = self.scopes.pop_frame() else {
            return Err("'scopeleave' with no open scope".to_string());
        };
        for name in frame {
            self.funcs.unbind_head(&name);
        }
        Ok(())
    }

    /// Arity check shared by the builtins.
    pub(crate) fn need(&self, n: usize, name: &str) -> Result<(), String> {
        if self.stack.len() < n {
            return Err(format!(
                "builtin '{}' needs {} argument{}, but got {}",
                name,
                n,
                if n == 1 { "" } else { "s" },
                self.stack.len()
            ));
        }
        Ok(())
    }

    /// Pop a value that must be a number.
    pub(crate) fn pop_number(&mut self, name: &str) -> Result<f64, String> {
        match self.stack_pop() {
            Value::Num(n) => Ok(n),
            other => Err(format!("cannot use a {} in '{name}'", other.type_name())),
        }
    }

    /// Pop a value that must be a block, yielding its code.
    pub(crate) fn pop_block(&mut self, name: &str) -> Result<Code, String> {
        match self.stack_pop() {
            Value::Block(code) => Ok(code),
            other => Err(format!("cannot use a {} in '{name}'", other.type_name())),
        }
    }
}

impl Default for Program {
    fn default() -> Self {
        Program::new()
    }
}
