//! Output builtins
//!
//! `print` and `stackdump` write to the host's standard output. `print`
//! emits the display form and flushes so interleaved host output stays
//! ordered; `stackdump` shows the whole stack top to bottom with strings
//! re-quoted.

use crate::program::Program;
use crate::value::Value;
use std::io::Write;

pub(crate) fn print(prog: &mut Program) -> Result<(), String> {
    prog.need(1, "print")?;
    let value = prog.stack_pop();
    print!("{value}");
    let _ = std::io::stdout().flush();
    Ok(())
}

pub(crate) fn lf(_prog: &mut Program) -> Result<(), String> {
    println!();
    Ok(())
}

pub(crate) fn stackdump(prog: &mut Program) -> Result<(), String> {
    let line = prog
        .stack
        .iter()
        .rev()
        .map(Value::dump_form)
        .collect::<Vec<_>>()
        .join("  ");
    println!("{line}");
    Ok(())
}
