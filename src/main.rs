use clap::Parser;
use log::info;

use pillbox::{App, Cli, Config, JsonStore, ReminderStore, Result};

pub fn initialize_logger() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .format_module_path(true)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    initialize_logger();

    let cli = Cli::parse();

    let mut config = Config::load(cli.config)?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    info!("Using data directory {}", config.data_dir.display());

    let store = ReminderStore::open(JsonStore::new(config.data_dir.clone()));
    let mut app = App::new(store, config, cli.verbose);

    app.run(cli.command).await
}
