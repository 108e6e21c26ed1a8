use anyhow::Result;
use once_cell::sync::Lazy;

use super::dispatch::Invocation;
use super::{config, help, pr};
use crate::context::AppContext;

pub type Handler = fn(&mut AppContext, &Invocation) -> Result<()>;

/// Produces the markup help text for a node; receives the command path
/// from the root, e.g. `["prflow", "pr", "create"]`.
pub type HelpRenderer = fn(&CommandNode, &[&str]) -> String;

/// The command tree, built on first use and never modified
pub static REGISTRY: Lazy<CommandNode> = Lazy::new(build);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagDef {
    pub letter: char,
    pub takes_argument: bool,
    pub value_name: &'static str,
    pub description: &'static str,
}

impl FlagDef {
    pub const fn switch(letter: char, description: &'static str) -> Self {
        Self {
            letter,
            takes_argument: false,
            value_name: "",
            description,
        }
    }

    pub const fn value(letter: char, value_name: &'static str, description: &'static str) -> Self {
        Self {
            letter,
            takes_argument: true,
            value_name,
            description,
        }
    }
}

/// One level of the command tree. Group nodes have children, leaf nodes
/// have a handler.
pub struct CommandNode {
    pub name: &'static str,
    pub summary: &'static str,
    /// Positional arguments shown in the usage line
    pub usage: &'static str,
    pub children: Vec<CommandNode>,
    pub flags: Vec<FlagDef>,
    pub handler: Option<Handler>,
    pub help: HelpRenderer,
}

impl CommandNode {
    pub fn group(name: &'static str, summary: &'static str, children: Vec<CommandNode>) -> Self {
        Self {
            name,
            summary,
            usage: "",
            children,
            flags: Vec::new(),
            handler: None,
            help: help::standard,
        }
    }

    pub fn leaf(name: &'static str, summary: &'static str, handler: Handler) -> Self {
        Self {
            name,
            summary,
            usage: "",
            children: Vec::new(),
            flags: Vec::new(),
            handler: Some(handler),
            help: help::standard,
        }
    }

    pub fn with_flags(mut self, flags: Vec<FlagDef>) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_usage(mut self, usage: &'static str) -> Self {
        self.usage = usage;
        self
    }

    pub fn with_help(mut self, help: HelpRenderer) -> Self {
        self.help = help;
        self
    }

    pub fn child(&self, name: &str) -> Option<&CommandNode> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn flag(&self, letter: char) -> Option<&FlagDef> {
        self.flags.iter().find(|f| f.letter == letter)
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn render_help(&self, path: &[&str]) -> String {
        (self.help)(self, path)
    }

    /// Visit every node depth-first together with its path
    #[cfg(test)]
    pub fn walk<'a>(&'a self, visit: &mut dyn FnMut(&[&'a str], &'a CommandNode)) {
        fn go<'a>(
            node: &'a CommandNode,
            path: &mut Vec<&'a str>,
            visit: &mut dyn FnMut(&[&'a str], &'a CommandNode),
        ) {
            path.push(node.name);
            visit(path, node);
            for child in &node.children {
                go(child, path, visit);
            }
            path.pop();
        }
        go(self, &mut Vec::new(), visit);
    }
}

pub fn build() -> CommandNode {
    CommandNode::group(
        crate::constants::PRFLOW_IDENTIFIER,
        "Pull-request workflows on top of git and GitHub",
        vec![
            CommandNode::group(
                "pr",
                "Create, find and edit pull requests",
                vec![
                    CommandNode::leaf(
                        "create",
                        "Commit staged changes on a new branch and open a PR",
                        pr::create,
                    )
                    .with_usage("<title...>")
                    .with_flags(vec![
                        FlagDef::value('l', "TICKET", "Ticket to reference, e.g. STA-123"),
                        FlagDef::value('r', "REVIEWER", "GitHub login to request a review from"),
                        FlagDef::value('b', "BASE", "Base branch (defaults to the primary branch)"),
                        FlagDef::switch('d', "Open as a draft; no reviewer required"),
                        FlagDef::switch('w', "Open the new PR in the browser"),
                    ]),
                    CommandNode::leaf("list", "List open pull requests", pr::list)
                        .with_flags(vec![FlagDef::switch('j', "Print JSON")]),
                    CommandNode::leaf(
                        "checkout",
                        "Pick an open pull request and check out its branch",
                        pr::checkout,
                    ),
                    CommandNode::leaf(
                        "view",
                        "Show the pull request for the current branch",
                        pr::view,
                    )
                    .with_flags(vec![FlagDef::switch('j', "Print JSON")]),
                    CommandNode::leaf(
                        "edit",
                        "Edit the current branch's PR description in your editor",
                        pr::edit,
                    ),
                    CommandNode::leaf(
                        "open",
                        "Focus or open the current branch's PR in the browser",
                        pr::open,
                    ),
                ],
            ),
            CommandNode::group(
                "config",
                "Inspect configuration",
                vec![CommandNode::leaf(
                    "show",
                    "Show the resolved configuration",
                    config::show,
                )],
            ),
        ],
    )
    .with_help(help::root)
}
