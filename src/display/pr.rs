use crate::api::models::PullRequest;
use crate::utils::formatting;
use comfy_table::{Attribute, Cell, Color};

pub fn format_pr_list(prs: &[PullRequest]) -> String {
    let headers = vec!["#", "Title", "Branch", "Author", "State"];
    let rows = prs
        .iter()
        .map(|pr| {
            let (state, color) = if pr.draft {
                ("draft", Color::Grey)
            } else {
                ("ready", Color::Green)
            };
            vec![
                Cell::new(pr.number).add_attribute(Attribute::Bold),
                Cell::new(&pr.title),
                Cell::new(&pr.head.name).fg(Color::Cyan),
                Cell::new(&pr.user.login),
                Cell::new(state).fg(color),
            ]
        })
        .collect();
    formatting::format_table(headers, rows)
}

pub fn format_pr_details(pr: &PullRequest) -> String {
    let mut details = vec![
        ("Number", format!("#{}", pr.number)),
        ("Title", pr.title.clone()),
        ("Author", pr.user.login.clone()),
        ("State", if pr.draft { "draft".to_string() } else { pr.state.clone() }),
        ("Branch", format!("{} → {}", pr.head.name, pr.base.name)),
        ("Link", pr.html_url.clone()),
    ];

    if let Some(body) = pr.body.as_deref().filter(|b| !b.trim().is_empty()) {
        details.push(("Description", body.to_string()));
    }

    formatting::format_key_value_table(details)
}

/// One line per PR for the fuzzy selector
pub fn selection_row(pr: &PullRequest) -> String {
    let draft = if pr.draft { " [draft]" } else { "" };
    format!(
        "#{:<5} {}{}  ({} by {})",
        pr.number, pr.title, draft, pr.head.name, pr.user.login
    )
}
