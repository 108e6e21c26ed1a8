use anyhow::{Context, Result};
use std::fs;

use super::dispatch::Invocation;
use crate::api::models::{NewPullRequest, PullRequest};
use crate::context::AppContext;
use crate::display::markup::{Line, StyleCode};
use crate::display::pr as pr_display;
use crate::error::FlowError;
use crate::git::RepoSlug;
use crate::utils::text;

/// `pr create`: branch, commit, push, open the PR, request review
pub fn create(ctx: &mut AppContext, inv: &Invocation) -> Result<()> {
    let title = text::normalize_title(&inv.args.join(" "));
    if title.is_empty() {
        return Err(FlowError::user_input("PR title cannot be empty").into());
    }
    if text::slugify(&title).is_empty() {
        return Err(FlowError::user_input(
            "PR title needs at least one letter to derive a branch name",
        )
        .into());
    }

    let draft = inv.has('d');
    let reviewer = inv
        .value('r')
        .map(str::to_string)
        .or_else(|| ctx.settings.default_reviewer.clone());
    if reviewer.is_none() && !draft {
        return Err(FlowError::user_input(
            "A reviewer is required: pass -r <login>, set default_reviewer, or use -d for a draft",
        )
        .into());
    }

    let ticket = inv.value('l');
    if let Some(ticket) = ticket.filter(|t| !text::is_valid_ticket(t)) {
        return Err(FlowError::user_input(format!(
            "Ticket '{}' may only contain letters, digits, '-' and '_'",
            ticket
        ))
        .into());
    }
    let branch = text::branch_name(ctx.settings.branch_prefix.as_deref(), ticket, &title);
    let repo = ctx.repo_slug()?;

    if !ctx.vcs.has_staged_changes()? {
        return Err(FlowError::precondition(
            "Nothing is staged to commit",
            Some("Stage your changes with 'git add' first".to_string()),
        )
        .into());
    }

    let base = match inv.value('b') {
        Some(base) => base.to_string(),
        None => ctx.vcs.primary_branch_name()?,
    };

    ctx.console.info(
        Line::new()
            .text("Creating branch ")
            .styled(&[StyleCode::Cyan], branch.as_str())
            .text(" from staged changes"),
    );
    ctx.vcs.create_branch(&branch)?;
    ctx.vcs.commit(&title)?;
    ctx.vcs.push(&ctx.settings.remote, &branch)?;

    let new_pr = NewPullRequest {
        title,
        head: branch,
        base,
        body: ticket.map(|t| format!("Resolves {}", t.trim().to_uppercase())),
        draft,
    };
    let pr = ctx.hosting.create_pull_request(&repo, &new_pr)?;

    if let Some(reviewer) = reviewer {
        ctx.hosting
            .request_reviewers(&repo, pr.number, std::slice::from_ref(&reviewer))?;
        ctx.console.info(
            Line::new()
                .text("Requested review from ")
                .styled(&[StyleCode::Bold], reviewer.as_str()),
        );
    }

    let kind = if pr.draft { "draft PR" } else { "PR" };
    ctx.console.success(
        Line::new()
            .text(format!("Created {} #{}: ", kind, pr.number))
            .styled(&[StyleCode::Underline], pr.html_url.as_str()),
    );

    if inv.has('w') {
        ctx.browser.open(&pr.html_url)?;
    }
    Ok(())
}

/// `pr list`
pub fn list(ctx: &mut AppContext, inv: &Invocation) -> Result<()> {
    let repo = ctx.repo_slug()?;
    let prs = ctx.hosting.list_pull_requests(&repo)?;

    if inv.has('j') {
        return ctx.console.print_json(&prs);
    }

    if prs.is_empty() {
        ctx.console
            .info(&format!("No open pull requests in {}", repo));
        return Ok(());
    }

    ctx.console.raw(&pr_display::format_pr_list(&prs));
    Ok(())
}

/// `pr checkout`: choose an open PR and switch to its branch
pub fn checkout(ctx: &mut AppContext, _inv: &Invocation) -> Result<()> {
    if !ctx.vcs.is_working_tree_clean()? {
        let status = ctx.vcs.status_summary()?;
        return Err(FlowError::precondition(
            "Working tree has uncommitted changes; commit or stash them first",
            Some(status),
        )
        .into());
    }

    let repo = ctx.repo_slug()?;
    let prs = ctx.hosting.list_pull_requests(&repo)?;
    if prs.is_empty() {
        ctx.console
            .info(&format!("No open pull requests in {}", repo));
        return Ok(());
    }

    let rows: Vec<String> = prs.iter().map(pr_display::selection_row).collect();
    let Some(index) = ctx.selector.select("Check out pull request", &rows)? else {
        ctx.console.info("No pull request selected");
        return Ok(());
    };
    let pr = prs
        .get(index)
        .context("Selection is out of range")?;

    ctx.vcs.fetch(&ctx.settings.remote)?;
    ctx.vcs.checkout(&pr.head.name)?;
    ctx.console.success(
        Line::new()
            .text("Checked out ")
            .styled(&[StyleCode::Cyan], pr.head.name.as_str())
            .text(format!(" for PR #{}", pr.number)),
    );
    Ok(())
}

/// `pr view`
pub fn view(ctx: &mut AppContext, inv: &Invocation) -> Result<()> {
    let (_, pr) = current_pull_request(ctx)?;

    if inv.has('j') {
        return ctx.console.print_json(&pr);
    }
    ctx.console.raw(&pr_display::format_pr_details(&pr));
    Ok(())
}

/// `pr edit`: round-trip the description through the user's editor.
///
/// The scratch file survives a failed update, and the next `pr edit` on the
/// same branch resumes from it instead of the PR's current body.
pub fn edit(ctx: &mut AppContext, _inv: &Invocation) -> Result<()> {
    let branch = ctx.vcs.current_branch()?;
    let (repo, pr) = current_pull_request(ctx)?;
    let original = pr.body.clone().unwrap_or_default();

    let path = ctx.settings.scratch_path(&branch);
    if path.exists() {
        ctx.console.warning(&format!(
            "Resuming unsaved description from {}",
            path.display()
        ));
    } else {
        fs::create_dir_all(&ctx.settings.temp_dir).with_context(|| {
            format!("Failed to create {}", ctx.settings.temp_dir.display())
        })?;
        fs::write(&path, &original)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    ctx.editor.edit(&path)?;

    let edited = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let edited = edited.trim_end();

    if edited == original.trim_end() {
        ctx.console.info("Description unchanged");
    } else {
        ctx.hosting
            .update_pull_request_body(&repo, pr.number, edited)?;
        ctx.console
            .success(&format!("Updated description of PR #{}", pr.number));
    }

    if let Err(e) = fs::remove_file(&path) {
        crate::debug_log!("Could not remove {}: {}", path.display(), e);
    }
    Ok(())
}

/// `pr open`
pub fn open(ctx: &mut AppContext, _inv: &Invocation) -> Result<()> {
    let (_, pr) = current_pull_request(ctx)?;
    ctx.browser.focus_or_open(&pr.html_url, &pr.html_url)?;
    ctx.console
        .success(&format!("Opened PR #{} in browser", pr.number));
    Ok(())
}

/// The open PR whose head is the current branch; missing is an error
fn current_pull_request(ctx: &AppContext) -> Result<(RepoSlug, PullRequest)> {
    let branch = ctx.vcs.current_branch()?;
    let repo = ctx.repo_slug()?;
    let pr = ctx
        .hosting
        .find_pull_request_by_branch(&repo, &branch)?
        .ok_or_else(|| {
            FlowError::NotFound(format!("No open pull request for branch '{}'", branch))
        })?;
    Ok((repo, pr))
}
