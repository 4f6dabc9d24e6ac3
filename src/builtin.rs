pub const BUILTIN_CSS: &str = include_str!("builtin.css");

pub const DEFAULT_STORAGE_KEY: &str = "tourgenTheme";

pub const THEME_ATTR: &str = "data-theme";
pub const DARK_BODY_CLASS: &str = "dark-mode";

pub const TOGGLE_SELECTOR: &str = "[data-theme-toggle]";
pub const ICON_SELECTOR: &str = "i";
pub const LABEL_SELECTOR: &str = "[data-theme-label]";

pub const MOON_ICON_CLASS: &str = "bi bi-moon-stars";
pub const SUN_ICON_CLASS: &str = "bi bi-sun";

pub const DARK_MODE_LABEL: &str = "Dark Mode";
pub const LIGHT_MODE_LABEL: &str = "Light Mode";
