//! Stack manipulation builtins
//!
//! The stack lives in a `Vec` with the top at the end, so the rotations
//! reduce to slice rotations: a positive amount carries the bottom element
//! of the rotated window to the top.

use crate::program::Program;
use crate::value::{Value, format_num};

pub(crate) fn swap(prog: &mut Program) -> Result<(), String> {
    prog.need(2, "swap")?;
    let len = prog.stack.len();
    prog.stack.swap(len - 1, len - 2);
    Ok(())
}

pub(crate) fn dup(prog: &mut Program) -> Result<(), String> {
    prog.need(1, "dup")?;
    if let Some(top) = prog.stack.last().cloned() {
        prog.stack.push(top);
    }
    Ok(())
}

pub(crate) fn pop(prog: &mut Program) -> Result<(), String> {
    prog.need(1, "pop")?;
    prog.stack_pop();
    Ok(())
}

pub(crate) fn stacksize(prog: &mut Program) -> Result<(), String> {
    let size = prog.stack.len() as f64;
    prog.stack_push(Value::Num(size));
    Ok(())
}

/// Rotate the entire stack by a signed integral amount, modulo its size.
/// A stack of zero or one values is left alone.
pub(crate) fn roll(prog: &mut Program) -> Result<(), String> {
    prog.need(1, "roll")?;
    let amount = integral(prog, "roll", "amount")?;
    let len = prog.stack.len();
    if len > 1 {
        let shift = amount.rem_euclid(len as i64) as usize;
        prog.stack.rotate_left(shift);
    }
    Ok(())
}

/// Rotate only the top `length` values. The length is popped first (it
/// sits on top), then the amount; the amount is taken modulo the length.
pub(crate) fn rotate(prog: &mut Program) -> Result<(), String> {
    prog.need(2, "rotate")?;
    let length = integral(prog, "rotate", "length")?;
    let amount = integral(prog, "rotate", "amount")?;
    let len = prog.stack.len();
    if length < 0 || length as usize > len {
        return Err(format!(
            "'rotate' length {length} out of range for a stack of {len}"
        ));
    }
    let length = length as usize;
    if length > 1 {
        let shift = amount.rem_euclid(length as i64) as usize;
        let start = len - length;
        prog.stack[start..].rotate_left(shift);
    }
    Ok(())
}

fn integral(prog: &mut Program, name: &str, what: &str) -> Result<i64, String> {
    let value = prog.pop_number(name)?;
    if !value.is_finite() || value.fract() != 0.0 {
        return Err(format!(
            "'{name}' needs an integral {what}, got {}",
            format_num(value)
        ));
    }
    Ok(value as i64)
}
