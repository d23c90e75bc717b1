use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use freebie_alert::{exit_code, Cli, Config, ListingFetcher, Poller, TwilioMessenger};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Load configuration
    let config = match &cli.config {
        Some(path) => match Config::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load {}: {e}", path.display());
                return ExitCode::from(exit_code(&Err(e)));
            }
        },
        None => Config::default(),
    };

    // Initialize logging
    if let Err(e) = freebie_alert::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        freebie_alert::logging::init_console_only(&config.logging.level);
    }

    let subscription = cli.subscription();
    if let Err(e) = config.validate().and_then(|_| subscription.validate()) {
        error!("{e}");
        return ExitCode::from(exit_code(&Err(e)));
    }

    let fetcher = match ListingFetcher::new(&config.forum, &config.http, &subscription.forum_name)
    {
        Ok(fetcher) => fetcher,
        Err(e) => {
            error!("{e}");
            return ExitCode::from(exit_code(&Err(e)));
        }
    };
    let messenger = match TwilioMessenger::new(
        &config.twilio,
        &config.http,
        subscription.credentials.clone(),
    ) {
        Ok(messenger) => messenger,
        Err(e) => {
            error!("{e}");
            return ExitCode::from(exit_code(&Err(e)));
        }
    };

    info!("Watching {} every {} seconds", fetcher.url(), subscription.poll_interval_secs);

    let mut poller = Poller::new(fetcher, messenger, &subscription, &config);
    let outcome = poller.run().await;
    match &outcome {
        Ok(reason) => error!("Stopped watching r/{}: {reason}", subscription.forum_name),
        Err(e) => error!("Giving up: {e}"),
    }
    ExitCode::from(exit_code(&outcome))
}
