//! Binary entry point: resolve where the catalog lives, load it, and drive the
//! numbered menu on stdin/stdout until the user exits.
use std::io::{self, IsTerminal};

use anyhow::Context;
use bookshelf::{Catalog, Config, Menu};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = Config::resolve()?;
    let mut catalog = Catalog::open(&config.catalog_path).with_context(|| {
        format!(
            "failed to load catalog from {}",
            config.catalog_path.display()
        )
    })?;

    let color = io::stdout().is_terminal();
    let mut menu =
        Menu::new(&mut catalog, io::stdin().lock(), io::stdout().lock()).with_color(color);
    menu.run()
}

/// Log to stderr so diagnostics never interleave with the menu on stdout.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("bookshelf=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
