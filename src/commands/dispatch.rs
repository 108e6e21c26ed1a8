//! Resolves an argument vector against the command tree.
//!
//! Resolution descends while tokens name child commands. Wherever it stops,
//! a `-h` among the remaining tokens wins over everything else and prints
//! that node's help. Otherwise a group node reports an unknown subcommand and
//! a leaf node has its flags parsed and its handler run.

use std::collections::BTreeMap;

use super::registry::CommandNode;
use crate::constants::HELP_FLAG;
use crate::context::AppContext;
use crate::error::FlowError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlagValue {
    Present,
    Value(String),
}

/// A resolved command: its path, parsed flags and positional arguments
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Invocation {
    pub path: Vec<String>,
    pub flags: BTreeMap<char, FlagValue>,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn has(&self, letter: char) -> bool {
        self.flags.contains_key(&letter)
    }

    pub fn value(&self, letter: char) -> Option<&str> {
        match self.flags.get(&letter) {
            Some(FlagValue::Value(v)) => Some(v),
            _ => None,
        }
    }
}

pub struct Dispatcher<'a> {
    root: &'a CommandNode,
}

impl<'a> Dispatcher<'a> {
    pub fn new(root: &'a CommandNode) -> Self {
        Self { root }
    }

    /// Run `argv` (without the program name) and return the exit code
    pub fn dispatch(&self, ctx: &mut AppContext, argv: &[String]) -> i32 {
        let mut node = self.root;
        let mut path = vec![node.name];
        let mut rest = argv;

        while let Some((next, tail)) = rest.split_first() {
            match node.child(next) {
                Some(child) => {
                    node = child;
                    path.push(child.name);
                    rest = tail;
                }
                None => break,
            }
        }
        crate::debug_log!("Resolved '{}' with {:?}", path.join(" "), rest);

        if rest.iter().any(|t| t == HELP_FLAG) {
            return show_help(ctx, node, &path);
        }

        let Some(handler) = node.handler else {
            return match rest.first() {
                None => show_help(ctx, node, &path),
                Some(token) => report(
                    ctx,
                    node,
                    &path,
                    FlowError::user_input(format!("unknown subcommand '{}'", token)).into(),
                ),
            };
        };

        let invocation = match parse_flags(node, &path, rest) {
            Ok(invocation) => invocation,
            Err(e) => return report(ctx, node, &path, e.into()),
        };

        crate::debug_log!(
            "Running '{}' with flags {:?}",
            invocation.path.join(" "),
            invocation.flags
        );
        match handler(ctx, &invocation) {
            Ok(()) => 0,
            Err(e) => report(ctx, node, &path, e),
        }
    }
}

fn show_help(ctx: &mut AppContext, node: &CommandNode, path: &[&str]) -> i32 {
    ctx.console.print(&node.render_help(path));
    0
}

/// Print a failure and pick the exit code
fn report(ctx: &mut AppContext, node: &CommandNode, path: &[&str], err: anyhow::Error) -> i32 {
    let Some(flow) = err.downcast_ref::<FlowError>() else {
        ctx.console.error(&format!("{:#}", err));
        return 1;
    };

    ctx.console.error(&flow.to_string());
    if let FlowError::Precondition {
        detail: Some(detail),
        ..
    } = flow
    {
        for line in detail.lines() {
            ctx.console.raw_err(&format!("  {}", line));
        }
    }
    if flow.shows_help() {
        ctx.console.print("");
        ctx.console.print(&node.render_help(path));
    }
    flow.exit_code()
}

/// `-x` style token → `x`
fn flag_letter(token: &str) -> Option<char> {
    let mut chars = token.strip_prefix('-')?.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphabetic() => Some(c),
        _ => None,
    }
}

fn parse_flags(
    node: &CommandNode,
    path: &[&str],
    tokens: &[String],
) -> Result<Invocation, FlowError> {
    let mut invocation = Invocation {
        path: path.iter().map(|s| s.to_string()).collect(),
        ..Default::default()
    };
    let mut tokens = tokens.iter();
    let mut flags_done = false;

    while let Some(token) = tokens.next() {
        if flags_done {
            invocation.args.push(token.clone());
            continue;
        }
        if token == "--" {
            flags_done = true;
            continue;
        }

        let Some(letter) = flag_letter(token) else {
            if token.len() > 1 && token.starts_with('-') {
                return Err(FlowError::user_input(format!("unknown flag '{}'", token)));
            }
            invocation.args.push(token.clone());
            continue;
        };

        let def = node
            .flag(letter)
            .ok_or_else(|| FlowError::user_input(format!("unknown flag '{}'", token)))?;

        let value = if def.takes_argument {
            let value = tokens.next().ok_or_else(|| {
                FlowError::user_input(format!("flag '{}' requires a value", token))
            })?;
            FlagValue::Value(value.clone())
        } else {
            FlagValue::Present
        };
        invocation.flags.insert(letter, value);
    }

    Ok(invocation)
}
