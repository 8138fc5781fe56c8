//! Arithmetic, comparison, and logic builtins
//!
//! `+` is polymorphic over numbers and strings; the other binary operators
//! require two numbers and consume both operands whatever the outcome.
//! Division and modulo by zero produce NaN, not an error.

use crate::program::Program;
use crate::value::Value;

pub(crate) fn add(prog: &mut Program) -> Result<(), String> {
    prog.need(2, "+")?;
    let b = prog.stack_pop();
    let a = prog.stack_pop();
    let result = match (a, b) {
        (Value::Num(a), Value::Num(b)) => Value::Num(a + b),
        (Value::Str(a), Value::Str(b)) => Value::Str(a + &b),
        (Value::Block(_), _) | (_, Value::Block(_)) => {
            return Err("cannot use a block in '+'".to_string());
        }
        (a, b) => {
            return Err(format!(
                "cannot add a {} and a {}",
                a.type_name(),
                b.type_name()
            ));
        }
    };
    prog.stack_push(result);
    Ok(())
}

pub(crate) fn subtract(prog: &mut Program) -> Result<(), String> {
    binary_num(prog, "-", |a, b| a - b)
}

pub(crate) fn multiply(prog: &mut Program) -> Result<(), String> {
    binary_num(prog, "*", |a, b| a * b)
}

pub(crate) fn divide(prog: &mut Program) -> Result<(), String> {
    binary_num(prog, "/", |a, b| if b == 0.0 { f64::NAN } else { a / b })
}

pub(crate) fn modulo(prog: &mut Program) -> Result<(), String> {
    binary_num(prog, "%", real_modulo)
}

pub(crate) fn equal(prog: &mut Program) -> Result<(), String> {
    compare(prog, "=", |a, b| a == b)
}

pub(crate) fn less(prog: &mut Program) -> Result<(), String> {
    compare(prog, "<", |a, b| a < b)
}

pub(crate) fn greater(prog: &mut Program) -> Result<(), String> {
    compare(prog, ">", |a, b| a > b)
}

pub(crate) fn not(prog: &mut Program) -> Result<(), String> {
    prog.need(1, "!")?;
    let value = prog.stack_pop();
    let flag = if value.is_truthy() { 0.0 } else { 1.0 };
    prog.stack_push(Value::Num(flag));
    Ok(())
}

fn binary_num(prog: &mut Program, name: &str, op: fn(f64, f64) -> f64) -> Result<(), String> {
    prog.need(2, name)?;
    let b = prog.pop_number(name)?;
    let a = prog.pop_number(name)?;
    prog.stack_push(Value::Num(op(a, b)));
    Ok(())
}

fn compare(prog: &mut Program, name: &str, op: fn(f64, f64) -> bool) -> Result<(), String> {
    prog.need(2, name)?;
    let b = prog.pop_number(name)?;
    let a = prog.pop_number(name)?;
    prog.stack_push(Value::Num(if op(a, b) { 1.0 } else { 0.0 }));
    Ok(())
}

/// Signed-floor modulo: the result carries the sign of the dividend.
fn real_modulo(a: f64, b: f64) -> f64 {
    if b == 0.0 {
        return f64::NAN;
    }
    let sign = if a < 0.0 { -1.0 } else { 1.0 };
    let (a, b) = (a.abs(), b.abs());
    sign * (a - b * (a / b).floor())
}
