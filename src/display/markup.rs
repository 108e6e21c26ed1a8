//! Inline markup for terminal output.
//!
//! A styled span is one or more `@name` prefixes followed by `[[content]]`:
//!
//! ```text
//! @red@b[[error:]] unknown subcommand @yellow[['bogus']]
//! ```
//!
//! Anything that does not form a complete span (unknown names, uppercase
//! names, a missing `]]`) is kept as literal text. Rendering never fails.

use crossterm::style::{Attribute, Color, SetAttribute, SetForegroundColor};
use once_cell::sync::Lazy;
use regex::Regex;

static SPAN_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:@(?:red|green|yellow|blue|magenta|cyan|white|reset|b|u))+\[\[([^\]]*)\]\]")
        .expect("markup span pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleCode {
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    Reset,
    Bold,
    Underline,
}

impl StyleCode {
    pub fn from_name(name: &str) -> Option<Self> {
        let code = match name {
            "red" => Self::Red,
            "green" => Self::Green,
            "yellow" => Self::Yellow,
            "blue" => Self::Blue,
            "magenta" => Self::Magenta,
            "cyan" => Self::Cyan,
            "white" => Self::White,
            "reset" => Self::Reset,
            "b" => Self::Bold,
            "u" => Self::Underline,
            _ => return None,
        };
        Some(code)
    }

    /// Terminal control sequence for this style
    pub fn ansi(self) -> String {
        match self {
            Self::Red => SetForegroundColor(Color::DarkRed).to_string(),
            Self::Green => SetForegroundColor(Color::DarkGreen).to_string(),
            Self::Yellow => SetForegroundColor(Color::DarkYellow).to_string(),
            Self::Blue => SetForegroundColor(Color::DarkBlue).to_string(),
            Self::Magenta => SetForegroundColor(Color::DarkMagenta).to_string(),
            Self::Cyan => SetForegroundColor(Color::DarkCyan).to_string(),
            Self::White => SetForegroundColor(Color::White).to_string(),
            Self::Reset => reset_sequence(),
            Self::Bold => SetAttribute(Attribute::Bold).to_string(),
            Self::Underline => SetAttribute(Attribute::Underlined).to_string(),
        }
    }
}

/// "Reset all attributes"
pub fn reset_sequence() -> String {
    SetAttribute(Attribute::Reset).to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupToken {
    Literal(String),
    Styled {
        styles: Vec<StyleCode>,
        content: String,
    },
}

/// A line built from pieces rather than parsed. Text pushed here is never
/// interpreted as markup, so branch names, user tokens and tool output
/// reach the terminal unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Line {
    tokens: Vec<MarkupToken>,
}

impl Line {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.tokens.push(MarkupToken::Literal(text.into()));
        self
    }

    pub fn styled(mut self, styles: &[StyleCode], content: impl Into<String>) -> Self {
        self.tokens.push(MarkupToken::Styled {
            styles: styles.to_vec(),
            content: content.into(),
        });
        self
    }

    /// Append every piece of `other`
    pub fn append(mut self, other: Line) -> Self {
        self.tokens.extend(other.tokens);
        self
    }

    pub fn tokens(&self) -> &[MarkupToken] {
        &self.tokens
    }
}

impl From<&str> for Line {
    fn from(text: &str) -> Self {
        Line::new().text(text)
    }
}

impl From<String> for Line {
    fn from(text: String) -> Self {
        Line::new().text(text)
    }
}

impl From<&String> for Line {
    fn from(text: &String) -> Self {
        Line::new().text(text.as_str())
    }
}

/// Split `input` into literal runs and styled spans.
pub fn tokenize(input: &str) -> Vec<MarkupToken> {
    let mut tokens = Vec::new();
    let mut last = 0;

    for caps in SPAN_PATTERN.captures_iter(input) {
        let (Some(whole), Some(content)) = (caps.get(0), caps.get(1)) else {
            continue;
        };

        if whole.start() > last {
            tokens.push(MarkupToken::Literal(input[last..whole.start()].to_string()));
        }

        let prefix = &input[whole.start()..content.start() - 2];
        let styles = prefix
            .split('@')
            .filter(|name| !name.is_empty())
            .filter_map(StyleCode::from_name)
            .collect();

        tokens.push(MarkupToken::Styled {
            styles,
            content: content.as_str().to_string(),
        });
        last = whole.end();
    }

    if last < input.len() {
        tokens.push(MarkupToken::Literal(input[last..].to_string()));
    }

    tokens
}

/// How styled spans are turned into text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Renderer {
    Ansi,
    Plain,
}

impl Renderer {
    pub fn render(self, input: &str) -> String {
        self.render_tokens(&tokenize(input))
    }

    pub fn render_tokens(self, tokens: &[MarkupToken]) -> String {
        let mut output = String::new();
        for token in tokens {
            match token {
                MarkupToken::Literal(text) => output.push_str(text),
                MarkupToken::Styled { styles, content } => {
                    if self == Self::Ansi {
                        for style in styles {
                            output.push_str(&style.ansi());
                        }
                    }
                    output.push_str(content);
                    if self == Self::Ansi {
                        output.push_str(&reset_sequence());
                    }
                }
            }
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(input: &str) -> String {
        Renderer::Ansi.render(input)
    }

    fn render_plain(input: &str) -> String {
        Renderer::Plain.render(input)
    }

    #[test]
    fn test_plain_text_is_unchanged() {
        let cases = [
            "",
            "hello world",
            "mail me @ home",
            "@red alone",
            "[[brackets]] without prefix",
            "@@@",
            "tab\tand\nnewline",
            "unicode ✅ text",
        ];
        for input in cases {
            assert_eq!(render(input), input, "Changed plain input {:?}", input);
        }
    }

    #[test]
    fn test_render_is_deterministic() {
        let input = "@green[[ok]] then @b@u[[loud]] and @nope[[x]]";
        assert_eq!(render(input), render(input));
    }

    #[test]
    fn test_unterminated_span_is_literal() {
        assert_eq!(render("@red[[unterminated"), "@red[[unterminated");
        assert_eq!(render("@red[[half]"), "@red[[half]");
    }

    #[test]
    fn test_unknown_and_uppercase_names_are_literal() {
        assert_eq!(render("@bold[[x]]"), "@bold[[x]]");
        assert_eq!(render("@RED[[x]]"), "@RED[[x]]");
        assert_eq!(render("@purple[[x]]"), "@purple[[x]]");
    }

    #[test]
    fn test_single_span() {
        let expected = format!("{}error{}", StyleCode::Red.ansi(), reset_sequence());
        assert_eq!(render("@red[[error]]"), expected);
    }

    #[test]
    fn test_modifiers_combine_with_color_in_prefix_order() {
        let expected = format!(
            "{}{}{}hi{}",
            StyleCode::Bold.ansi(),
            StyleCode::Underline.ansi(),
            StyleCode::Cyan.ansi(),
            reset_sequence()
        );
        assert_eq!(render("@b@u@cyan[[hi]]"), expected);
    }

    #[test]
    fn test_each_span_resets_independently() {
        let output = render("a @red[[one]] b @blue[[two]] c");
        assert_eq!(output.matches(&reset_sequence()).count(), 2);
        assert!(output.starts_with("a "));
        assert!(output.ends_with(" c"));
    }

    #[test]
    fn test_empty_span() {
        assert_eq!(
            render("@red[[]]"),
            format!("{}{}", StyleCode::Red.ansi(), reset_sequence())
        );
        assert_eq!(render_plain("@red[[]]"), "");
    }

    #[test]
    fn test_stray_at_before_span_stays_literal() {
        let expected = format!("@{}x{}", StyleCode::Red.ansi(), reset_sequence());
        assert_eq!(render("@@red[[x]]"), expected);
    }

    #[test]
    fn test_tokenize() {
        let tokens = tokenize("Created @green@b[[feature/x]] ok");
        assert_eq!(
            tokens,
            vec![
                MarkupToken::Literal("Created ".into()),
                MarkupToken::Styled {
                    styles: vec![StyleCode::Green, StyleCode::Bold],
                    content: "feature/x".into(),
                },
                MarkupToken::Literal(" ok".into()),
            ]
        );
    }

    #[test]
    fn test_plain_renderer_strips_styles() {
        assert_eq!(
            render_plain("@red@b[[error:]] unknown @yellow[['bogus']]"),
            "error: unknown 'bogus'"
        );
    }

    #[test]
    fn test_line_text_is_never_parsed() {
        let line = Line::new()
            .text("unknown subcommand '")
            .styled(&[StyleCode::Bold], "a]b")
            .text("' near @red[[x]]");
        assert_eq!(
            Renderer::Plain.render_tokens(line.tokens()),
            "unknown subcommand 'a]b' near @red[[x]]"
        );
        assert_eq!(
            Renderer::Ansi.render_tokens(line.tokens()),
            format!(
                "unknown subcommand '{}a]b{}' near @red[[x]]",
                StyleCode::Bold.ansi(),
                reset_sequence()
            )
        );
    }
}
