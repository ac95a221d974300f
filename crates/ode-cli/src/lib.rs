//! Command-line interface for the ODE pipeline tool.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use once_cell::sync::OnceCell;
use tracing::{debug, error};

use ode_client::PollConfig;
use ode_core::config::{self, BuildContext, Credentials, OdeConfig};
use ode_core::error::OdeError;

mod commands;
pub mod manager;
mod output;

pub use commands::*;
pub use manager::{DeployOutcome, OdeManager};
pub use output::*;

static LOGGING: OnceCell<()> = OnceCell::new();

fn init_logging(debug: bool) {
    let _ = LOGGING.get_or_init(|| {
        let builder = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::from_default_env()
                    .add_directive(if debug {
                        tracing::Level::DEBUG.into()
                    } else {
                        tracing::Level::INFO.into()
                    })
            )
            .with_writer(std::io::stderr)
            .with_target(false);

        // Configure based on mode
        let builder = if debug {
            builder
                .with_file(true)
                .with_line_number(true)
        } else {
            builder
                .with_file(false)
                .with_line_number(false)
        };

        let _ = builder.try_init();
    });
}

/// CLI arguments parser
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Time between environment status checks (e.g. "10s")
    #[arg(long, value_name = "DURATION", value_parser = humantime::parse_duration, global = true)]
    poll_interval: Option<Duration>,

    /// Status checks before giving up on a new environment
    #[arg(long, value_name = "N", global = true)]
    max_attempts: Option<u32>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// React to the current pipeline event (default)
    Run {
        /// Event to handle instead of PIPELINES_EVENT
        #[arg(short, long)]
        event: Option<String>,
    },

    /// Create the environment for the deploy path if it does not exist
    Deploy,

    /// Delete every on-demand environment deploying the deploy path
    Delete,

    /// List the application's on-demand environments
    List,
}

impl Cli {
    fn load_config(&self) -> Result<OdeConfig> {
        let config = match &self.config {
            Some(path) => OdeConfig::from_file(path)?,
            None => OdeConfig::default(),
        };
        let mut config = config.with_env_overrides();
        if let Some(attempts) = self.max_attempts {
            config.max_poll_attempts = attempts;
        }
        config.validate()?;
        Ok(config)
    }

    fn poll_config(&self, config: &OdeConfig) -> PollConfig {
        let mut poll = PollConfig::from(config);
        if let Some(interval) = self.poll_interval {
            poll.interval = interval;
        }
        poll
    }
}

/// Run the CLI application
pub async fn run() -> Result<()> {
    run_with(Cli::parse()).await
}

/// Run the CLI application with already-parsed arguments
pub async fn run_with(cli: Cli) -> Result<()> {
    init_logging(cli.verbose || config::debug_enabled());

    // Credentials gate every API call
    let credentials = Credentials::from_env()?;
    let config = cli.load_config()?;
    let context = BuildContext::from_env()?;
    debug!("Using API at {}", config.api_url);

    let api = ode_client::create_client(&config, credentials)?;
    let manager = OdeManager::new(api, context, &config).with_poll_config(cli.poll_config(&config));

    match cli.command.unwrap_or(Commands::Run { event: None }) {
        Commands::Run { event } => commands::execute_run(&manager, event).await?,
        Commands::Deploy => commands::execute_deploy(&manager).await?,
        Commands::Delete => commands::execute_delete(&manager).await?,
        Commands::List => commands::execute_list(&manager).await?,
    }

    Ok(())
}

/// Print a failure the way pipelines expect and return the exit code
pub fn report(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<OdeError>() {
        Some(OdeError::MissingCredentials) => println!("{}", OdeError::MissingCredentials),
        Some(e) if e.is_api_failure() => println!("{}", format_api_error(&e.to_string())),
        _ => {
            error!("{:#}", err);
            println!("{}", format_error(&format!("{:#}", err)));
        }
    }
    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_defaults_to_run() {
        let cli = Cli::try_parse_from(["ode"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn test_parse_run_with_event() {
        let cli = Cli::try_parse_from(["ode", "run", "--event", "merge"]).unwrap();
        match cli.command {
            Some(Commands::Run { event }) => assert_eq!(event.as_deref(), Some("merge")),
            _ => panic!("expected run command"),
        }
    }

    #[test]
    fn test_poll_overrides() {
        let cli = Cli::try_parse_from([
            "ode",
            "deploy",
            "--poll-interval",
            "250ms",
            "--max-attempts",
            "7",
        ])
        .unwrap();

        let config = cli.load_config().unwrap();
        assert_eq!(config.max_poll_attempts, 7);

        let poll = cli.poll_config(&config);
        assert_eq!(poll.interval, Duration::from_millis(250));
        assert_eq!(poll.max_attempts, 7);
    }

    #[test]
    fn test_rejects_bad_duration() {
        assert!(Cli::try_parse_from(["ode", "--poll-interval", "soon"]).is_err());
    }

    #[test]
    fn test_config_file_is_loaded() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "default_branch = \"develop\"").unwrap();

        let path = file.path().to_string_lossy().to_string();
        let cli = Cli::try_parse_from(["ode", "--config", path.as_str(), "list"]).unwrap();
        let config = cli.load_config().unwrap();
        assert_eq!(config.default_branch, "develop");
    }

    #[test]
    fn test_report_formats_api_errors() {
        let err = anyhow::Error::from(OdeError::api(500, "boom"));
        assert_eq!(report(&err), 1);
    }
}
