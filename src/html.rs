use anyhow::Context as _;
use kuchiki::traits::{NodeIterator as _, TendrilSink as _};
use kuchiki::{ElementData, NodeDataRef, NodeRef};
use maud::{DOCTYPE, Markup, PreEscaped, html};

use crate::builtin;
use crate::surface::{ThemeSurface, ToggleControl};
use crate::theme::Theme;

#[derive(Debug, Clone)]
pub struct HtmlSurface {
    document: NodeRef,
}

impl HtmlSurface {
    pub fn parse(html: &str) -> Self {
        Self {
            document: kuchiki::parse_html().one(html),
        }
    }

    pub fn serialize(&self) -> anyhow::Result<String> {
        let mut out = Vec::new();
        self.document
            .serialize(&mut out)
            .context("serialize document")?;
        String::from_utf8(out).context("document html not utf-8")
    }

    pub fn append_toggle_control(&self) -> Option<HtmlControl> {
        let body = self.document.select_first("body").ok()?;
        let fragment = kuchiki::parse_html().one(toggle_button(Theme::Light).into_string());
        let button = fragment
            .select_first(builtin::TOGGLE_SELECTOR)
            .ok()?
            .as_node()
            .clone();
        body.as_node().append(button.clone());
        Some(HtmlControl { node: button })
    }

    fn root(&self) -> Option<NodeDataRef<ElementData>> {
        self.document.select_first("html").ok()
    }
}

impl ThemeSurface for HtmlSurface {
    type Control = HtmlControl;

    fn marker(&self) -> Option<String> {
        let root = self.root()?;
        let attrs = root.attributes.borrow();
        attrs.get(builtin::THEME_ATTR).map(str::to_owned)
    }

    fn set_marker(&mut self, theme: Theme) {
        let Some(root) = self.root() else {
            tracing::debug!("document has no root element; marker not set");
            return;
        };
        root.attributes
            .borrow_mut()
            .insert(builtin::THEME_ATTR, theme.as_str().to_string());
    }

    fn set_body_dark_class(&mut self, dark: bool) {
        let Ok(body) = self.document.select_first("body") else {
            tracing::debug!("document has no body; dark class not set");
            return;
        };
        let mut attrs = body.attributes.borrow_mut();
        let present = attrs
            .get("class")
            .is_some_and(|c| c.split_whitespace().any(|c| c == builtin::DARK_BODY_CLASS));
        if present == dark {
            return;
        }
        let mut classes: Vec<String> = attrs
            .get("class")
            .unwrap_or("")
            .split_whitespace()
            .filter(|c| *c != builtin::DARK_BODY_CLASS)
            .map(str::to_owned)
            .collect();
        if dark {
            classes.push(builtin::DARK_BODY_CLASS.to_string());
        }
        if classes.is_empty() {
            attrs.remove("class");
        } else {
            attrs.insert("class", classes.join(" "));
        }
    }

    fn list_toggle_controls(&self) -> Vec<HtmlControl> {
        match self.document.select(builtin::TOGGLE_SELECTOR) {
            Ok(nodes) => nodes
                .map(|n| HtmlControl {
                    node: n.as_node().clone(),
                })
                .collect(),
            Err(()) => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HtmlControl {
    node: NodeRef,
}

impl HtmlControl {
    pub fn node(&self) -> &NodeRef {
        &self.node
    }

    fn first_descendant(&self, selector: &str) -> Option<NodeDataRef<ElementData>> {
        self.node.descendants().select(selector).ok()?.next()
    }
}

impl ToggleControl for HtmlControl {
    fn set_icon_class(&mut self, class: &str) {
        if let Some(icon) = self.first_descendant(builtin::ICON_SELECTOR) {
            icon.attributes
                .borrow_mut()
                .insert("class", class.to_string());
        }
    }

    fn set_label_text(&mut self, text: &str) {
        let Some(label) = self.first_descendant(builtin::LABEL_SELECTOR) else {
            return;
        };
        let node = label.as_node();
        let children: Vec<NodeRef> = node.children().collect();
        for child in children {
            child.detach();
        }
        node.append(NodeRef::new_text(text));
    }
}

pub fn build_demo_page(title: &str) -> String {
    let markup: Markup = html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                meta name="color-scheme" content="light dark";
                title { (title) }
                style { (PreEscaped(builtin::BUILTIN_CSS)) }
            }
            body class="tt" {
                header class="tt-topbar" {
                    h1 { (title) }
                    (toggle_button(Theme::Light))
                }
                main class="tt-main" {
                    p { "Pick the mode that is easiest on your eyes." }
                    p class="tt-muted" {
                        "Compact switch: "
                        button type="button" class="tt-btn" data-theme-toggle title="Toggle theme" {
                            i class=(Theme::Light.control_icon_class()) {}
                        }
                    }
                }
            }
        }
    };
    markup.into_string()
}

fn toggle_button(theme: Theme) -> Markup {
    html! {
        button type="button" class="tt-btn" data-theme-toggle {
            i class=(theme.control_icon_class()) {}
            " "
            span data-theme-label { (theme.control_label()) }
        }
    }
}
