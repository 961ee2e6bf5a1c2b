use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use quickwin::cli::LaunchOptions;
use quickwin::config::ConfigStore;
use quickwin::controller::Launcher;

fn main() -> Result<()> {
    // `RUST_LOG` overrides the default filter.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("quickwin=info")),
        )
        .init();

    let opts = LaunchOptions::parse(std::env::args().skip(1));
    let store = match &opts.config {
        Some(path) => ConfigStore::new(path.clone()),
        None => ConfigStore::at_default_location(),
    };
    let config = store.load()?;
    info!(
        config = %store.path().display(),
        home = %config.home.display(),
        "QuickWin starting"
    );

    let launcher = Launcher::new(store, config, opts.folder.clone());
    quickwin::native::run(launcher, &opts)
}
