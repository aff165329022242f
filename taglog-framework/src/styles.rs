//! Colour and text-attribute helpers.
//!
//! Every helper takes anything [`Display`] and returns a `String`, so they nest:
//! `styles::bold(styles::blue("awesome "))`. When the `NO_COLOR` environment
//! variable is set to a non-empty value the helpers return the text untouched.

use crossterm::style::{Attribute, Color, StyledContent, Stylize, style};
use std::fmt::Display;

/// whether styling is currently enabled (checked on every call)
pub fn colors_enabled() -> bool {
    std::env::var_os("NO_COLOR").is_none_or(|value| value.is_empty())
}

/// remove every escape sequence, leaving the semantic text
pub fn strip_styles(text: &str) -> String {
    strip_ansi_escapes::strip_str(text)
}

pub fn fg(text: impl Display, color: Color) -> String {
    paint(text, |content| content.with(color))
}

pub fn bg(text: impl Display, color: Color) -> String {
    paint(text, |content| content.on(color))
}

fn paint(
    text: impl Display,
    apply: impl FnOnce(StyledContent<String>) -> StyledContent<String>,
) -> String {
    let text = text.to_string();
    if !colors_enabled() || text.is_empty() {
        return text;
    }
    apply(style(text)).to_string()
}

macro_rules! foreground {
    ($($name:ident => $color:expr),* $(,)?) => {
        $(
            pub fn $name(text: impl Display) -> String {
                fg(text, $color)
            }
        )*
    };
}

macro_rules! background {
    ($($name:ident => $color:expr),* $(,)?) => {
        $(
            pub fn $name(text: impl Display) -> String {
                bg(text, $color)
            }
        )*
    };
}

macro_rules! attribute {
    ($($name:ident => $attr:expr),* $(,)?) => {
        $(
            pub fn $name(text: impl Display) -> String {
                paint(text, |content| content.attribute($attr))
            }
        )*
    };
}

foreground! {
    black => Color::Black,
    red => Color::DarkRed,
    green => Color::DarkGreen,
    yellow => Color::DarkYellow,
    blue => Color::DarkBlue,
    magenta => Color::DarkMagenta,
    cyan => Color::DarkCyan,
    white => Color::Grey,
    gray => Color::DarkGrey,
}

background! {
    bg_black => Color::Black,
    bg_red => Color::DarkRed,
    bg_green => Color::DarkGreen,
    bg_yellow => Color::DarkYellow,
    bg_blue => Color::DarkBlue,
    bg_magenta => Color::DarkMagenta,
    bg_cyan => Color::DarkCyan,
    bg_white => Color::Grey,
}

attribute! {
    bold => Attribute::Bold,
    dim => Attribute::Dim,
    italic => Attribute::Italic,
    underline => Attribute::Underlined,
    inverse => Attribute::Reverse,
    strikethrough => Attribute::CrossedOut,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_removes_escape_sequences() {
        assert_eq!(strip_styles("\x1b[31mred\x1b[0m plain"), "red plain");
    }

    #[test]
    fn test_styled_text_strips_back_to_input() {
        assert_eq!(strip_styles(&bold(red("hello"))), "hello");
        assert_eq!(strip_styles(&bg_yellow("warn ")), "warn ");
    }

    #[test]
    fn test_empty_text_stays_empty() {
        assert_eq!(green(""), "");
    }
}
