//! Help text for command nodes, written in console markup.

use super::registry::CommandNode;

/// Help for any node: summary, usage, subcommands and flags
pub fn standard(node: &CommandNode, path: &[&str]) -> String {
    let mut out = String::new();
    out.push_str(node.summary);
    out.push_str("\n\n");
    out.push_str("@b[[USAGE]]\n");
    out.push_str(&format!("  {}\n", usage_line(node, path)));

    if !node.children.is_empty() {
        let width = node.children.iter().map(|c| c.name.len()).max().unwrap_or(0);
        out.push_str("\n@b[[COMMANDS]]\n");
        for child in &node.children {
            out.push_str(&format!(
                "  @cyan[[{:<width$}]]  {}\n",
                child.name,
                child.summary,
                width = width
            ));
        }
    }

    out.push_str("\n@b[[FLAGS]]\n");
    let labels: Vec<String> = node
        .flags
        .iter()
        .map(|f| {
            if f.takes_argument {
                format!("-{} {}", f.letter, f.value_name)
            } else {
                format!("-{}", f.letter)
            }
        })
        .collect();
    let width = labels.iter().map(String::len).max().unwrap_or(0).max(2);
    for (flag, label) in node.flags.iter().zip(&labels) {
        out.push_str(&format!(
            "  @green[[{:<width$}]]  {}\n",
            label,
            flag.description,
            width = width
        ));
    }
    out.push_str(&format!(
        "  @green[[{:<width$}]]  Show this help\n",
        "-h",
        width = width
    ));

    if !node.children.is_empty() {
        out.push_str(&format!(
            "\nRun '{} <command> -h' for help on a command.\n",
            path.join(" ")
        ));
    }

    out.trim_end().to_string()
}

/// Root help: the standard layout plus where configuration lives
pub fn root(node: &CommandNode, path: &[&str]) -> String {
    format!(
        "{}\n\n@b[[CONFIGURATION]]\n  ~/.config/{}/{}, a {} file in the project, or {}_* variables.\n  GITHUB_TOKEN or GH_TOKEN authenticates API calls.",
        standard(node, path),
        crate::constants::CONFIG_DIR_NAME,
        crate::constants::CONFIG_FILE_NAME,
        crate::constants::LOCAL_CONFIG_FILE_NAME,
        crate::constants::ENV_PREFIX,
    )
}

fn usage_line(node: &CommandNode, path: &[&str]) -> String {
    let mut parts = vec![path.join(" ")];
    if !node.children.is_empty() {
        parts.push("<command>".to_string());
    }
    for flag in &node.flags {
        if flag.takes_argument {
            parts.push(format!("[-{} {}]", flag.letter, flag.value_name));
        } else {
            parts.push(format!("[-{}]", flag.letter));
        }
    }
    if !node.usage.is_empty() {
        parts.push(node.usage.to_string());
    }
    parts.join(" ")
}
