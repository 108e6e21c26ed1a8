use crate::constants::MAX_BRANCH_SLUG_LEN;

/// Trim a title and collapse runs of whitespace into single spaces
pub fn normalize_title(title: &str) -> String {
    title.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Turn a PR title into a branch suffix.
///
/// Only ASCII letters survive; every other run of characters becomes a
/// single hyphen. The result is lowercase, at most `MAX_BRANCH_SLUG_LEN`
/// characters, and never starts or ends with a hyphen.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;

    for ch in title.chars() {
        if ch.is_ascii_alphabetic() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    slug.truncate(MAX_BRANCH_SLUG_LEN);
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Whether a ticket id can appear in a branch name as written
pub fn is_valid_ticket(ticket: &str) -> bool {
    let ticket = ticket.trim();
    !ticket.is_empty()
        && ticket
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Lowercase ticket id with anything git would choke on folded into hyphens
fn ticket_segment(ticket: &str) -> String {
    ticket
        .split(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
        .to_ascii_lowercase()
}

/// Build the branch name for a new PR: `[prefix/][ticket-]slug`
pub fn branch_name(prefix: Option<&str>, ticket: Option<&str>, title: &str) -> String {
    let slug = slugify(title);
    let leaf = match ticket.map(ticket_segment).filter(|t| !t.is_empty()) {
        Some(ticket) => format!("{}-{}", ticket, slug),
        None => slug,
    };

    match prefix.map(|p| p.trim().trim_end_matches('/')).filter(|p| !p.is_empty()) {
        Some(prefix) => format!("{}/{}", prefix, leaf),
        None => leaf,
    }
}

/// File name for the scratch copy of a branch's PR description
pub fn scratch_file_name(branch: &str) -> String {
    format!("{}.md", branch.replace(['/', '\\'], "-"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_title() {
        assert_eq!(slugify("Fix Login Bug!!"), "fix-login-bug");
    }

    #[test]
    fn test_slugify_drops_non_letters() {
        let cases = vec![
            ("  Leading and trailing  ", "leading-and-trailing"),
            ("Upgrade to v2.0", "upgrade-to-v"),
            ("émoji ✅ café", "moji-caf"),
            ("snake_case-and-kebab", "snake-case-and-kebab"),
            ("!!!", ""),
        ];
        for (title, expected) in cases {
            assert_eq!(slugify(title), expected, "Slug mismatch for {:?}", title);
        }
    }

    #[test]
    fn test_slugify_truncates_without_trailing_hyphen() {
        // The 40th character lands on a separator
        let title = "abcdefghijklmnopqrstuvwxyzabcdefghijklm next";
        let slug = slugify(title);
        assert_eq!(slug, "abcdefghijklmnopqrstuvwxyzabcdefghijklm");
        assert!(slug.len() <= MAX_BRANCH_SLUG_LEN);

        let long = slugify("this is a rather long pull request title that keeps going");
        assert!(long.len() <= MAX_BRANCH_SLUG_LEN);
        assert!(!long.ends_with('-'));
    }

    #[test]
    fn test_branch_name() {
        assert_eq!(branch_name(None, None, "Fix Login Bug!!"), "fix-login-bug");
        assert_eq!(
            branch_name(Some("jdoe/"), Some("STA-123"), "Fix Login Bug"),
            "jdoe/sta-123-fix-login-bug"
        );
        assert_eq!(branch_name(Some(""), Some(" "), "Docs"), "docs");
    }

    #[test]
    fn test_branch_name_folds_unsafe_ticket_characters() {
        assert_eq!(
            branch_name(Some("jdoe"), Some("STA 123"), "Fix it"),
            "jdoe/sta-123-fix-it"
        );
        assert_eq!(branch_name(None, Some("~^:"), "Fix it"), "fix-it");
    }

    #[test]
    fn test_is_valid_ticket() {
        assert!(is_valid_ticket("STA-123"));
        assert!(is_valid_ticket(" ops_9 "));
        assert!(!is_valid_ticket("STA 123"));
        assert!(!is_valid_ticket("a/b"));
        assert!(!is_valid_ticket(""));
    }

    #[test]
    fn test_normalize_title() {
        assert_eq!(normalize_title("  Fix \t login\n bug "), "Fix login bug");
        assert_eq!(normalize_title("   "), "");
    }

    #[test]
    fn test_scratch_file_name() {
        assert_eq!(scratch_file_name("jdoe/sta-1-fix"), "jdoe-sta-1-fix.md");
    }
}
