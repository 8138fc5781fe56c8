//! Stax - an embeddable stack-oriented postfix language
//!
//! Programs are whitespace-separated tokens that push values onto an
//! operand stack or call named operations. Quoted blocks (`{ ... }`) are
//! first-class deferred code values, which gives the language its control
//! constructs (`if`, `while`, `ifelse`, `eval`) and user-defined words
//! (`def`, `gdef`).
//!
//! The crate is the embedding surface: hosts create a [`Program`], register
//! native operations, push and pop [`Value`]s, and run source text.
//!
//! ```
//! use stax::{Program, Value};
//!
//! let mut prog = Program::new();
//! prog.register("double", |prog: &mut Program| {
//!     let value = prog.stack_pop();
//!     prog.stack_push(value.clone());
//!     prog.stack_push(value);
//!     prog.call_function("+")
//! });
//! prog.run_source("20 double 2 +").unwrap();
//! assert_eq!(prog.stack_pop(), Value::Num(42.0));
//! ```

mod builtins;
mod funcmap;
pub mod program;
mod scope;
pub mod token;
pub mod value;

pub use program::Program;
pub use token::{Code, Token, TokenKind, tokenize};
pub use value::{Value, format_num};
