use tokio::sync::mpsc;

use crate::controller::ThemeController;
use crate::store::PreferenceStore;
use crate::surface::ThemeSurface;
use crate::theme::Theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageEvent {
    Ready,
    Click(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Uninitialized,
    Ready,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

#[must_use]
#[derive(Debug)]
pub struct Registration {
    listeners: Vec<ListenerId>,
}

impl Registration {
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

struct Listener<C> {
    id: ListenerId,
    control: C,
}

pub struct Page<S: ThemeSurface, P> {
    controller: ThemeController<S, P>,
    lifecycle: Lifecycle,
    listeners: Vec<Listener<S::Control>>,
    next_listener: u64,
    registration: Option<Registration>,
}

impl<S: ThemeSurface, P: PreferenceStore> Page<S, P> {
    pub fn new(controller: ThemeController<S, P>) -> Self {
        Self {
            controller,
            lifecycle: Lifecycle::Uninitialized,
            listeners: Vec::new(),
            next_listener: 0,
            registration: None,
        }
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn controller(&self) -> &ThemeController<S, P> {
        &self.controller
    }

    pub fn into_controller(self) -> ThemeController<S, P> {
        self.controller
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn initialize(&mut self) -> Option<Registration> {
        if self.lifecycle == Lifecycle::Ready {
            tracing::debug!("page already initialized");
            return None;
        }

        let theme = self.controller.resolve_initial_theme();
        self.controller.apply_theme(theme);

        let mut wired = Vec::new();
        for control in self.controller.surface().list_toggle_controls() {
            let id = ListenerId(self.next_listener);
            self.next_listener += 1;
            self.listeners.push(Listener { id, control });
            wired.push(id);
        }
        self.lifecycle = Lifecycle::Ready;

        tracing::info!(%theme, controls = wired.len(), "page ready");
        Some(Registration { listeners: wired })
    }

    pub fn unregister(&mut self, registration: Registration) -> usize {
        let before = self.listeners.len();
        self.listeners
            .retain(|l| !registration.listeners.contains(&l.id));
        before - self.listeners.len()
    }

    pub fn teardown(&mut self) {
        if let Some(registration) = self.registration.take() {
            let removed = self.unregister(registration);
            tracing::debug!(removed, "page torn down");
        }
    }

    pub fn dispatch(&mut self, event: PageEvent) -> Option<Theme> {
        match event {
            PageEvent::Ready => {
                let registration = self.initialize()?;
                self.registration = Some(registration);
                Some(self.controller.read_displayed_theme())
            }
            PageEvent::Click(index) => self.click(index),
        }
    }

    pub async fn drive(&mut self, mut events: mpsc::UnboundedReceiver<PageEvent>) -> usize {
        let mut handled = 0usize;
        while let Some(event) = events.recv().await {
            self.dispatch(event);
            handled += 1;
        }
        handled
    }

    fn click(&mut self, index: usize) -> Option<Theme> {
        let controls = self.controller.surface().list_toggle_controls();
        let Some(control) = controls.get(index) else {
            tracing::debug!(index, present = controls.len(), "click on missing control ignored");
            return None;
        };
        if !self.listeners.iter().any(|l| l.control == *control) {
            tracing::debug!(index, "control has no click listener");
            return None;
        }
        Some(self.controller.toggle_theme())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::html::HtmlSurface;
    use crate::store::MemoryStore;

    const KEY: &str = "tourgenTheme";

    const ONE_CONTROL: &str = r#"<html><body>
  <button data-theme-toggle><i class="bi"></i><span data-theme-label>Theme</span></button>
</body></html>"#;

    fn page(html: &str, store: MemoryStore) -> (HtmlSurface, Page<HtmlSurface, MemoryStore>) {
        let surface = HtmlSurface::parse(html);
        let controller = ThemeController::new(surface.clone(), store, KEY);
        (surface, Page::new(controller))
    }

    fn rendered(surface: &HtmlSurface) -> String {
        surface.serialize().unwrap()
    }

    #[test]
    fn ready_then_click_from_empty_storage() {
        let (surface, mut page) = page(ONE_CONTROL, MemoryStore::new());

        assert_eq!(page.dispatch(PageEvent::Ready), Some(Theme::Light));
        assert_eq!(surface.marker().as_deref(), Some("light"));
        let html = rendered(&surface);
        assert!(html.contains(r#"<i class="bi bi-moon-stars">"#));
        assert!(html.contains("Dark Mode"));
        assert!(page.controller().store().get(KEY).is_none());

        assert_eq!(page.dispatch(PageEvent::Click(0)), Some(Theme::Dark));
        assert_eq!(surface.marker().as_deref(), Some("dark"));
        assert_eq!(page.controller().store().get(KEY).as_deref(), Some("dark"));
        let html = rendered(&surface);
        assert!(html.contains(r#"<i class="bi bi-sun">"#));
        assert!(html.contains("Light Mode"));
        assert!(html.contains(r#"class="dark-mode""#));
    }

    #[test]
    fn ready_applies_persisted_dark() {
        let (surface, mut page) = page(ONE_CONTROL, MemoryStore::new().with_entry(KEY, "dark"));
        assert_eq!(page.dispatch(PageEvent::Ready), Some(Theme::Dark));
        assert_eq!(surface.marker().as_deref(), Some("dark"));
        assert!(rendered(&surface).contains("Light Mode"));
    }

    #[test]
    fn clicks_before_ready_are_ignored() {
        let (surface, mut page) = page(ONE_CONTROL, MemoryStore::new());
        assert_eq!(page.dispatch(PageEvent::Click(0)), None);
        assert!(surface.marker().is_none());
        assert!(page.controller().store().get(KEY).is_none());
        assert_eq!(page.lifecycle(), Lifecycle::Uninitialized);
    }

    #[test]
    fn ready_fires_once() {
        let (surface, mut page) = page(ONE_CONTROL, MemoryStore::new());
        assert!(page.dispatch(PageEvent::Ready).is_some());
        page.dispatch(PageEvent::Click(0));

        assert_eq!(page.dispatch(PageEvent::Ready), None);
        assert_eq!(surface.marker().as_deref(), Some("dark"));
        assert_eq!(page.listener_count(), 1);
        assert!(page.initialize().is_none());
    }

    #[test]
    fn control_added_after_ready_is_not_wired() {
        let (surface, mut page) = page(ONE_CONTROL, MemoryStore::new());
        page.dispatch(PageEvent::Ready);

        surface.append_toggle_control().unwrap();
        assert_eq!(surface.list_toggle_controls().len(), 2);

        // Known limitation: the late control is rendered on apply but never toggles.
        assert_eq!(page.dispatch(PageEvent::Click(1)), None);
        assert_eq!(surface.marker().as_deref(), Some("light"));

        assert_eq!(page.dispatch(PageEvent::Click(0)), Some(Theme::Dark));
        let html = rendered(&surface);
        assert_eq!(html.matches("Light Mode").count(), 2);
    }

    #[test]
    fn click_out_of_range_is_ignored() {
        let (_surface, mut page) = page(ONE_CONTROL, MemoryStore::new());
        page.dispatch(PageEvent::Ready);
        assert_eq!(page.dispatch(PageEvent::Click(7)), None);
    }

    #[test]
    fn page_without_controls_still_initializes() {
        let (surface, mut page) = page("<html><body><p>hi</p></body></html>", MemoryStore::new());
        let registration = page.initialize().unwrap();
        assert!(registration.is_empty());
        assert_eq!(surface.marker().as_deref(), Some("light"));
        assert_eq!(page.unregister(registration), 0);
    }

    #[test]
    fn unregister_detaches_wired_controls() {
        let html = r#"<html><body>
  <button data-theme-toggle><i></i></button>
  <button data-theme-toggle><span data-theme-label></span></button>
</body></html>"#;
        let (surface, mut page) = page(html, MemoryStore::new());
        let registration = page.initialize().unwrap();
        assert_eq!(registration.len(), 2);

        assert_eq!(page.unregister(registration), 2);
        assert_eq!(page.dispatch(PageEvent::Click(0)), None);
        assert_eq!(surface.marker().as_deref(), Some("light"));
        assert_eq!(page.lifecycle(), Lifecycle::Ready);
    }

    #[test]
    fn teardown_drops_ready_listeners() {
        let (_surface, mut page) = page(ONE_CONTROL, MemoryStore::new());
        page.dispatch(PageEvent::Ready);
        page.teardown();
        assert_eq!(page.listener_count(), 0);
        assert_eq!(page.dispatch(PageEvent::Click(0)), None);
    }

    #[tokio::test]
    async fn queued_double_click_is_serialized() {
        let (surface, mut page) = page(ONE_CONTROL, MemoryStore::new());
        let (tx, rx) = mpsc::unbounded_channel();
        for event in [PageEvent::Ready, PageEvent::Click(0), PageEvent::Click(0)] {
            tx.send(event).unwrap();
        }
        drop(tx);

        assert_eq!(page.drive(rx).await, 3);
        assert_eq!(surface.marker().as_deref(), Some("light"));
        assert_eq!(page.controller().store().get(KEY).as_deref(), Some("light"));
        assert!(rendered(&surface).contains("Dark Mode"));
    }
}
