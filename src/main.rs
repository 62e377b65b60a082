use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;
use what_to_wear::{App, LlamaAdvisor, WeatherClient, WearConfig, logging};

/// Suggests what to wear for the current weather using a local LLM
#[derive(Parser, Debug)]
#[command(name = "what-to-wear", version, about)]
struct Cli {
    /// Path to a TOML config file (defaults to the user config directory)
    #[arg(short, long, env = "WHATTOWEAR_CONFIG")]
    config: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match WearConfig::load_from_path(cli.config) {
        Ok(config) => config,
        Err(e) => {
            println!("{e:#}");
            return ExitCode::from(2);
        }
    };

    logging::init(&config.logging, cli.verbose);

    let app = App::new(
        WeatherClient::new(&config.weather),
        LlamaAdvisor::new(config.model.clone()),
    );

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    match app.run(stdin.lock(), &mut stdout).await {
        Ok(outcome) => {
            debug!("Run finished: {:?}", outcome);
            ExitCode::SUCCESS
        }
        Err(e) => {
            println!("{}", e.user_message());
            ExitCode::FAILURE
        }
    }
}
