use crate::theme::Theme;

pub trait ThemeSurface {
    type Control: ToggleControl;

    fn marker(&self) -> Option<String>;

    fn set_marker(&mut self, theme: Theme);

    fn set_body_dark_class(&mut self, dark: bool);

    fn list_toggle_controls(&self) -> Vec<Self::Control>;
}

pub trait ToggleControl: Clone + PartialEq {
    fn set_icon_class(&mut self, class: &str);
    fn set_label_text(&mut self, text: &str);
}
