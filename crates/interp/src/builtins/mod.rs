//! Builtin registry
//!
//! The fixed table of primitive operations, resolved by exact name after
//! user and native bindings. The registry is process-global, built exactly
//! once, and immutable afterwards; user scopes never shadow entries here
//! because builtin lookup is the resolution fallback, not a table entry.

use crate::program::Program;
use crate::value::Value;
use std::collections::HashMap;
use std::sync::OnceLock;

mod arithmetic;
mod control;
mod io;
mod math;
mod stack_ops;

/// Synthetic word injected at the start of every captured block
pub(crate) const SCOPE_ENTER: &str = "scopeenter";
/// Synthetic word injected at the end of every captured block
pub(crate) const SCOPE_LEAVE: &str = "scopeleave";

/// The shapes a builtin comes in. The math catalogue registers as bare
/// `f64` function pointers; everything else manipulates the program
/// directly.
#[derive(Clone, Copy)]
pub(crate) enum Builtin {
    Native(fn(&mut Program) -> Result<(), String>),
    MathUnary(fn(f64) -> f64),
    MathBinary(fn(f64, f64) -> f64),
    Constant(f64),
}

static REGISTRY: OnceLock<HashMap<&'static str, Builtin>> = OnceLock::new();

pub(crate) fn lookup(name: &str) -> Option<Builtin> {
    registry().get(name).copied()
}

pub(crate) fn execute(prog: &mut Program, name: &str, builtin: Builtin) -> Result<(), String> {
    match builtin {
        Builtin::Native(func) => func(prog),
        Builtin::MathUnary(func) => {
            prog.need(1, name)?;
            let x = prog.pop_number(name)?;
            prog.stack_push(Value::Num(func(x)));
            Ok(())
        }
        Builtin::MathBinary(func) => {
            prog.need(2, name)?;
            let b = prog.pop_number(name)?;
            let a = prog.pop_number(name)?;
            prog.stack_push(Value::Num(func(a, b)));
            Ok(())
        }
        Builtin::Constant(value) => {
            prog.stack_push(Value::Num(value));
            Ok(())
        }
    }
}

fn registry() -> &'static HashMap<&'static str, Builtin> {
    REGISTRY.get_or_init(|| {
        let mut map = HashMap::new();

        // Arithmetic, comparison, logic
        map.insert("+", Builtin::Native(arithmetic::add));
        map.insert("-", Builtin::Native(arithmetic::subtract));
        map.insert("*", Builtin::Native(arithmetic::multiply));
        map.insert("/", Builtin::Native(arithmetic::divide));
        map.insert("%", Builtin::Native(arithmetic::modulo));
        map.insert("=", Builtin::Native(arithmetic::equal));
        map.insert("<", Builtin::Native(arithmetic::less));
        map.insert(">", Builtin::Native(arithmetic::greater));
        map.insert("!", Builtin::Native(arithmetic::not));

        // Output
        map.insert("print", Builtin::Native(io::print));
        map.insert("lf", Builtin::Native(io::lf));
        map.insert("stackdump", Builtin::Native(io::stackdump));

        // Blocks, definitions, control flow
        map.insert("{", Builtin::Native(control::block_open));
        map.insert("def", Builtin::Native(control::def));
        map.insert("gdef", Builtin::Native(control::gdef));
        map.insert("eval", Builtin::Native(control::eval));
        map.insert("builtin", Builtin::Native(control::builtin_call));
        map.insert("if", Builtin::Native(control::if_then));
        map.insert("ifelse", Builtin::Native(control::if_else));
        map.insert("while", Builtin::Native(control::while_loop));
        map.insert(SCOPE_ENTER, Builtin::Native(control::scope_enter));
        map.insert(SCOPE_LEAVE, Builtin::Native(control::scope_leave));

        // Stack manipulation
        map.insert("swap", Builtin::Native(stack_ops::swap));
        map.insert("dup", Builtin::Native(stack_ops::dup));
        map.insert("pop", Builtin::Native(stack_ops::pop));
        map.insert("roll", Builtin::Native(stack_ops::roll));
        map.insert("rotate", Builtin::Native(stack_ops::rotate));
        map.insert("stacksize", Builtin::Native(stack_ops::stacksize));

        // Math
        for &(name, func) in math::UNARY {
            map.insert(name, Builtin::MathUnary(func));
        }
        for &(name, func) in math::BINARY {
            map.insert(name, Builtin::MathBinary(func));
        }
        for &(name, value) in math::CONSTANTS {
            map.insert(name, Builtin::Constant(value));
        }

        map
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_contains_full_catalogue() {
        for name in [
            "+", "-", "*", "/", "%", "=", "<", ">", "!", "print", "lf", "stackdump", "{", "def",
            "gdef", "eval", "builtin", "if", "ifelse", "while", "scopeenter", "scopeleave", "swap",
            "dup", "pop", "roll", "rotate", "stacksize", "ceil", "floor", "round", "abs", "sqrt",
            "exp", "log", "sin", "cos", "tan", "asin", "acos", "atan", "min", "max", "pow",
            "atan2", "E", "PI",
        ] {
            assert!(lookup(name).is_some(), "missing builtin '{name}'");
        }
        assert!(lookup("}").is_none());
        assert!(lookup("nonesuch").is_none());
    }
}
