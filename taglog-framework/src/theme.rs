use crossterm::style::Color;

// severity labels and the colour of their prefix
pub const LEVEL_COLORS: &[(&str, Color)] = &[
    ("debug", Color::DarkGrey),
    ("info", Color::DarkBlue),
    ("warn", Color::DarkYellow),
    ("error", Color::DarkRed),
    ("success", Color::DarkGreen),
    ("trace", Color::DarkMagenta),
];

pub fn get_level_color(level: &str) -> Color {
    for (name, color) in LEVEL_COLORS {
        if level.eq_ignore_ascii_case(name) {
            return *color;
        }
    }
    Color::Reset
}

// structural inspector palette
pub const NUMBER_COLOR: Color = Color::DarkYellow;

pub const BOOLEAN_COLOR: Color = Color::DarkYellow;

pub const STRING_COLOR: Color = Color::DarkGreen;

pub const UNDEFINED_COLOR: Color = Color::DarkGrey;

pub const REGEX_COLOR: Color = Color::DarkRed;

pub const SPECIAL_COLOR: Color = Color::DarkCyan;
