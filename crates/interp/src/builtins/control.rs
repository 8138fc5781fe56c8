//! Blocks, definitions, and control flow
//!
//! `def` binds scope-locally: a name first defined inside the current
//! scope shadows any outer binding and is unbound again when the scope
//! ends. `gdef` performs the same binding without recording it in the
//! scope frame, so it survives the block it was made in.

use crate::funcmap::FuncBody;
use crate::program::Program;
use crate::token::{Code, Token, TokenKind};
use crate::value::Value;
use std::sync::Arc;
use tracing::trace;

pub(crate) fn block_open(prog: &mut Program) -> Result<(), String> {
    prog.begin_capture();
    Ok(())
}

pub(crate) fn def(prog: &mut Program) -> Result<(), String> {
    define(prog, "def", false)
}

pub(crate) fn gdef(prog: &mut Program) -> Result<(), String> {
    define(prog, "gdef", true)
}

fn define(prog: &mut Program, name: &str, global: bool) -> Result<(), String> {
    prog.need(2, name)?;
    let word = match prog.stack_pop() {
        Value::Str(s) => s,
        other => {
            return Err(format!(
                "first argument to '{name}' must be a string, got a {}",
                other.type_name()
            ));
        }
    };
    // A number or string becomes a one-token body pushing the literal; a
    // block transfers its code into the binding.
    let body = match prog.stack_pop() {
        Value::Num(n) => {
            let mut code = Code::new();
            code.push(Token::new(TokenKind::Num, n.to_string()));
            code
        }
        Value::Str(s) => {
            let mut code = Code::new();
            code.push(Token::new(TokenKind::Str, s));
            code
        }
        Value::Block(code) => code,
    };

    let redefine_in_place = prog.scopes.is_empty() || prog.scopes.top_contains(&word);
    if redefine_in_place {
        prog.funcs.unbind_head(&word);
    } else if !global {
        prog.scopes.record(&word);
    }
    trace!(word = word.as_str(), global, "defined word");
    prog.funcs.bind_shadow(&word, FuncBody::Code(Arc::new(body)));
    Ok(())
}

pub(crate) fn eval(prog: &mut Program) -> Result<(), String> {
    prog.need(1, "eval")?;
    let code = prog.pop_block("eval")?;
    prog.exec_code(&code)
}

/// Invoke a builtin by name, bypassing user and native bindings. The brace
/// pseudo-builtins are not callable this way.
pub(crate) fn builtin_call(prog: &mut Program) -> Result<(), String> {
    prog.need(1, "builtin")?;
    let name = match prog.stack_pop() {
        Value::Str(s) => s,
        other => {
            return Err(format!(
                "cannot use a {} in 'builtin'",
                other.type_name()
            ));
        }
    };
    if name == "{" || name == "}" {
        return Err(format!("'{name}' cannot be called through 'builtin'"));
    }
    match crate::builtins::lookup(&name) {
        Some(builtin) => crate::builtins::execute(prog, &name, builtin),
        None => Err(format!("unknown builtin '{name}'")),
    }
}

pub(crate) fn if_then(prog: &mut Program) -> Result<(), String> {
    prog.need(2, "if")?;
    let body = prog.pop_block("if")?;
    let cond = prog.stack_pop();
    if cond.is_truthy() {
        prog.exec_code(&body)?;
    }
    Ok(())
}

pub(crate) fn if_else(prog: &mut Program) -> Result<(), String> {
    prog.need(3, "ifelse")?;
    let otherwise = prog.pop_block("ifelse")?;
    let then = prog.pop_block("ifelse")?;
    let cond = prog.stack_pop();
    if cond.is_truthy() {
        prog.exec_code(&then)
    } else {
        prog.exec_code(&otherwise)
    }
}

/// Pops the body block, then the condition block, both once. Each turn
/// runs the condition code, pops the value it left, and either stops or
/// runs the body.
pub(crate) fn while_loop(prog: &mut Program) -> Result<(), String> {
    prog.need(2, "while")?;
    let body = prog.pop_block("while")?;
    let cond = prog.pop_block("while")?;
    loop {
        prog.exec_code(&cond)?;
        if prog.stack_size() == 0 {
            return Err("'while' condition left no value on the stack".to_string());
        }
        let flag = prog.stack_pop();
        if !flag.is_truthy() {
            break;
        }
        prog.exec_code(&body)?;
    }
    Ok(())
}

pub(crate) fn scope_enter(prog: &mut Program) -> Result<(), String> {
    prog.scopes.enter();
    Ok(())
}

pub(crate) fn scope_leave(prog: &mut Program) -> Result<(), String> {
    prog.leave_scope()
}
