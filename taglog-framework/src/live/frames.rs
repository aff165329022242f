use crate::error::{Error, Result};
use std::time::Duration;
use unicode_width::UnicodeWidthStr;

pub const DEFAULT_FRAME_SET: &str = "line";

/// named, cyclic spinner glyph sequence
#[derive(Debug, PartialEq, Eq)]
pub struct FrameSet {
    pub name: &'static str,
    pub interval_ms: u64,
    pub frames: &'static [&'static str],
}

impl FrameSet {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    /// frame at `index`, wrapping around
    pub fn frame(&self, index: usize) -> &'static str {
        self.frames[index % self.frames.len()]
    }

    /// widest glyph in display columns
    pub fn max_frame_width(&self) -> usize {
        self.frames.iter().map(|f| f.width()).max().unwrap_or(0)
    }
}

pub static FRAME_SETS: &[FrameSet] = &[
    FrameSet {
        name: "dots",
        interval_ms: 80,
        frames: &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"],
    },
    FrameSet {
        name: "dots2",
        interval_ms: 80,
        frames: &["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"],
    },
    FrameSet {
        name: "line",
        interval_ms: 130,
        frames: &["-", "\\", "|", "/"],
    },
    FrameSet {
        name: "line2",
        interval_ms: 100,
        frames: &["⠂", "-", "–", "—", "–", "-"],
    },
    FrameSet {
        name: "pipe",
        interval_ms: 100,
        frames: &["┤", "┘", "┴", "└", "├", "┌", "┬", "┐"],
    },
    FrameSet {
        name: "simpleDots",
        interval_ms: 400,
        frames: &[".  ", ".. ", "...", "   "],
    },
    FrameSet {
        name: "star",
        interval_ms: 70,
        frames: &["✶", "✸", "✹", "✺", "✹", "✷"],
    },
    FrameSet {
        name: "arc",
        interval_ms: 100,
        frames: &["◜", "◠", "◝", "◞", "◡", "◟"],
    },
    FrameSet {
        name: "circle",
        interval_ms: 120,
        frames: &["◡", "⊙", "◠"],
    },
    FrameSet {
        name: "circleHalves",
        interval_ms: 50,
        frames: &["◐", "◓", "◑", "◒"],
    },
    FrameSet {
        name: "squareCorners",
        interval_ms: 180,
        frames: &["◰", "◳", "◲", "◱"],
    },
    FrameSet {
        name: "toggle",
        interval_ms: 250,
        frames: &["⊶", "⊷"],
    },
    FrameSet {
        name: "arrow",
        interval_ms: 100,
        frames: &["←", "↖", "↑", "↗", "→", "↘", "↓", "↙"],
    },
    FrameSet {
        name: "bouncingBar",
        interval_ms: 80,
        frames: &[
            "[    ]", "[=   ]", "[==  ]", "[=== ]", "[ ===]", "[  ==]", "[   =]", "[    ]",
            "[   =]", "[  ==]", "[ ===]", "[====]", "[=== ]", "[==  ]", "[=   ]",
        ],
    },
    FrameSet {
        name: "bouncingBall",
        interval_ms: 80,
        frames: &[
            "( ●    )", "(  ●   )", "(   ●  )", "(    ● )", "(     ●)", "(    ● )", "(   ●  )",
            "(  ●   )", "( ●    )", "(●     )",
        ],
    },
];

/// look up a frame set by name
pub fn frame_set(name: &str) -> Result<&'static FrameSet> {
    FRAME_SETS
        .iter()
        .find(|set| set.name == name)
        .ok_or_else(|| Error::UnknownFrameSet(name.to_string()))
}

pub fn frame_set_names() -> impl Iterator<Item = &'static str> {
    FRAME_SETS.iter().map(|set| set.name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        let set = frame_set("line").unwrap();
        assert_eq!(set.frames.len(), 4);
        assert_eq!(set.interval(), Duration::from_millis(130));
    }

    #[test]
    fn test_unknown_name() {
        assert!(matches!(frame_set("nope"), Err(Error::UnknownFrameSet(name)) if name == "nope"));
    }

    #[test]
    fn test_frame_wraps() {
        let set = frame_set("line").unwrap();
        assert_eq!(set.frame(0), "-");
        assert_eq!(set.frame(5), "\\");
    }

    #[test]
    fn test_max_frame_width() {
        assert_eq!(frame_set("line").unwrap().max_frame_width(), 1);
        assert_eq!(frame_set("bouncingBar").unwrap().max_frame_width(), 6);
        assert_eq!(frame_set("simpleDots").unwrap().max_frame_width(), 3);
    }

    #[test]
    fn test_default_is_registered() {
        assert!(frame_set_names().any(|name| name == DEFAULT_FRAME_SET));
        assert!(FRAME_SETS.iter().all(|set| !set.frames.is_empty() && set.interval_ms > 0));
    }
}
