use std::fmt;

use crate::builtin;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub const fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn parse(value: &str) -> Option<Theme> {
        match value {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn from_stored(value: Option<&str>) -> Theme {
        value.and_then(Theme::parse).unwrap_or_default()
    }

    pub const fn flipped(self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub const fn is_dark(self) -> bool {
        matches!(self, Theme::Dark)
    }

    pub const fn control_icon_class(self) -> &'static str {
        match self {
            Theme::Light => builtin::MOON_ICON_CLASS,
            Theme::Dark => builtin::SUN_ICON_CLASS,
        }
    }

    pub const fn control_label(self) -> &'static str {
        match self {
            Theme::Light => builtin::DARK_MODE_LABEL,
            Theme::Dark => builtin::LIGHT_MODE_LABEL,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
