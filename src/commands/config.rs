use anyhow::Result;

use super::dispatch::Invocation;
use crate::context::AppContext;
use crate::utils::formatting;

/// `config show`: the settings every command sees, after layering
pub fn show(ctx: &mut AppContext, _inv: &Invocation) -> Result<()> {
    let s = &ctx.settings;
    let unset = || "-".to_string();

    let rows = vec![
        ("branch_prefix", s.branch_prefix.clone().unwrap_or_else(unset)),
        ("default_reviewer", s.default_reviewer.clone().unwrap_or_else(unset)),
        ("remote", s.remote.clone()),
        ("repository", s.repository.clone().unwrap_or_else(unset)),
        ("api_url", s.api_url.clone()),
        (
            "github_token",
            if s.github_token.is_some() { "set" } else { "not set" }.to_string(),
        ),
        ("editor", s.editor.clone()),
        (
            "self_repo",
            s.self_repo
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(unset),
        ),
        (
            "maintenance_interval_hours",
            (s.maintenance_interval.as_secs() / 3600).to_string(),
        ),
        ("config_dir", s.config_dir.display().to_string()),
        ("temp_dir", s.temp_dir.display().to_string()),
    ];

    let table = formatting::format_key_value_table(rows);
    ctx.console.raw(&table);
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::commands::dispatch::Dispatcher;
    use crate::commands::registry::REGISTRY;
    use crate::testing::TestBed;

    #[test]
    fn test_show_hides_token_value() {
        let mut bed = TestBed::default();
        bed.file.default_reviewer = Some("alice".to_string());
        let mut ctx = bed.context();
        ctx.settings.github_token = Some("ghp_secret".to_string());

        let argv = vec!["config".to_string(), "show".to_string()];
        let code = Dispatcher::new(&REGISTRY).dispatch(&mut ctx, &argv);

        let out = ctx.console.stdout_text();
        assert_eq!(code, 0);
        assert!(out.contains("alice"));
        assert!(out.contains("48"));
        assert!(!out.contains("ghp_secret"));
    }
}
