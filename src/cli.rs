use std::path::PathBuf;

use clap::Parser;
use url::Url;

use crate::builtin;

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Args {
    /// HTML page to load. Defaults to the built-in demo page.
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Where to write the resulting HTML. Defaults to stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// JSON file holding persisted preferences for every origin.
    #[arg(long, default_value = "theme-prefs.json")]
    pub store: PathBuf,

    /// Keep preferences in memory only; nothing is read from or written to `--store`.
    #[arg(long)]
    pub memory_store: bool,

    /// Origin the page is served from; preferences are scoped to it.
    #[arg(long, default_value = "http://localhost/")]
    pub origin: Url,

    /// Storage key the preference is kept under.
    #[arg(long, default_value = builtin::DEFAULT_STORAGE_KEY)]
    pub storage_key: String,

    /// Click the n-th toggle control after the page is ready (repeatable, 0-based).
    #[arg(long = "click", value_name = "INDEX")]
    pub clicks: Vec<usize>,
}
