// 🌓 Theme - Dark / light preference
// Persisted as a plain string, dark when missing

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

/// Colors for one theme, as RGB triples
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: (u8, u8, u8),
    pub foreground: (u8, u8, u8),
    pub accent: (u8, u8, u8),
    pub muted: (u8, u8, u8),
    pub error: (u8, u8, u8),
}

impl Theme {
    pub fn toggle(&self) -> Theme {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    /// Parse a stored preference. Absent or unrecognized values mean dark.
    pub fn from_stored(value: Option<&str>) -> Theme {
        match value.map(str::trim) {
            Some("light") => Theme::Light,
            Some("dark") | None => Theme::Dark,
            Some(other) => {
                tracing::warn!(value = other, "unknown theme preference, using dark");
                Theme::Dark
            }
        }
    }

    /// Toggle button glyph: offers the sun while dark, the moon while light
    pub fn icon(&self) -> &'static str {
        match self {
            Theme::Dark => "☀",
            Theme::Light => "☾",
        }
    }

    pub fn palette(&self) -> Palette {
        match self {
            Theme::Dark => Palette {
                background: (0x12, 0x12, 0x1c),
                foreground: (0xe6, 0xe6, 0xf0),
                accent: (0x48, 0x95, 0xef),
                muted: (0x80, 0x80, 0x90),
                error: (0xf7, 0x25, 0x85),
            },
            Theme::Light => Palette {
                background: (0xf8, 0xf9, 0xfa),
                foreground: (0x21, 0x25, 0x29),
                accent: (0x43, 0x61, 0xee),
                muted: (0x6c, 0x75, 0x7d),
                error: (0xd6, 0x28, 0x28),
            },
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
