mod builtin;
mod cli;
mod controller;
mod html;
mod page;
mod store;
mod surface;
mod theme;

use std::io::Write as _;

use anyhow::Context as _;
use cli::Args;
use tokio::sync::mpsc;

pub use builtin::DEFAULT_STORAGE_KEY;
pub use cli::Args as CliArgs;
pub use controller::ThemeController;
pub use html::{HtmlControl, HtmlSurface, build_demo_page};
pub use page::{Lifecycle, Page, PageEvent, Registration};
pub use store::{FileStore, MemoryStore, PreferenceStore};
pub use surface::{ThemeSurface, ToggleControl};
pub use theme::Theme;

const DEMO_TITLE: &str = "Theme toggle";

pub async fn run(args: Args) -> anyhow::Result<()> {
    let source = match &args.input {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?
        }
        None => build_demo_page(DEMO_TITLE),
    };
    let surface = HtmlSurface::parse(&source);

    let store: Box<dyn PreferenceStore> = if args.memory_store {
        Box::new(MemoryStore::new())
    } else {
        Box::new(FileStore::open(&args.store, &args.origin))
    };

    let controller = ThemeController::new(surface.clone(), store, args.storage_key.clone());
    let mut page = Page::new(controller);

    let (tx, rx) = mpsc::unbounded_channel();
    tx.send(PageEvent::Ready).context("queue ready event")?;
    for &index in &args.clicks {
        tx.send(PageEvent::Click(index)).context("queue click event")?;
    }
    drop(tx);

    let handled = page.drive(rx).await;
    let theme = page.controller().read_displayed_theme();
    tracing::info!(events = handled, %theme, origin = %args.origin, "page settled");

    let html = surface.serialize()?;
    match &args.out {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)
                        .with_context(|| format!("create {}", parent.display()))?;
                }
            }
            std::fs::write(path, html).with_context(|| format!("write {}", path.display()))?;
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(html.as_bytes()).context("write stdout")?;
            stdout.flush().context("flush stdout")?;
        }
    }
    Ok(())
}
