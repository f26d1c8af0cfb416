use anyhow::{Context, Result};
use roster_client::settings::Settings;
use roster_client::{cli, logging, shell};
use tokio::task::LocalSet;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    roster_client::try_or_exit(run()).await;
}

async fn run() -> Result<()> {
    let args = cli::parse_args()?;

    logging::setup(args.verbose, args.logoutput.as_deref())?;

    let settings = Settings::load(&args.config)
        .with_context(|| format!("Failed to load settings from {}", args.config.display()))?;

    log::debug!("Settings: {:?}", settings);

    LocalSet::new()
        .run_until(shell::start(&args, &settings))
        .await
}
