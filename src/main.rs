use clap::Parser;
use sommelier::core::ConfigProvider;
use sommelier::utils::{logger, validation::Validate};
use sommelier::{AppState, CliConfig, TomlConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_logger(cli.verbose);
    }

    tracing::info!("Starting AI Sommelier");

    let config: Box<dyn ConfigProvider> = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path);
            match TomlConfig::from_file(path) {
                Ok(config) => {
                    if let Err(e) = config.validate() {
                        fail_startup(&e);
                    }
                    Box::new(config)
                }
                Err(e) => {
                    eprintln!("❌ Failed to load config file '{}': {}", path, e);
                    eprintln!("💡 Make sure the file exists and is valid TOML format");
                    std::process::exit(1);
                }
            }
        }
        None => {
            if let Err(e) = cli.validate() {
                fail_startup(&e);
            }
            Box::new(cli.clone())
        }
    };

    let state = AppState::from_config(config.as_ref())?;
    sommelier::web::serve(config.as_ref(), state).await
}

/// A missing or invalid credential stops the process before the server binds.
fn fail_startup(e: &sommelier::SommelierError) -> ! {
    tracing::error!("❌ Configuration validation failed: {}", e);
    tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(1);
}
