use std::fs::File;

use clap::{Parser, Subcommand};
use jarvis::Provider;
use jarvis::core::config;
use simplelog::{
    ColorChoice, CombinedLogger, ConfigBuilder, LevelFilter, TermLogger, TerminalMode,
    WriteLogger,
};

#[derive(Parser)]
#[command(name = "jarvis", about = "J.A.R.V.I.S. chat assistant and API proxy")]
struct Args {
    /// Where chat requests go (overrides config and JARVIS_PROVIDER)
    #[arg(short, long, value_enum, global = true)]
    provider: Option<Provider>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Open the chat client (default)
    Chat,
    /// Run the API proxy
    Serve {
        /// Port to listen on (overrides config and PORT)
        #[arg(long)]
        port: Option<u16>,
    },
}

const LOG_FILE: &str = "jarvis.log";

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    let command = args.command.unwrap_or(Command::Chat);

    match &command {
        // The terminal belongs to ratatui, so chat logs only to the file.
        Command::Chat => {
            if let Ok(log_file) = File::create(LOG_FILE) {
                let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
            }
        }
        Command::Serve { .. } => {
            let mut loggers: Vec<Box<dyn simplelog::SharedLogger>> = vec![TermLogger::new(
                LevelFilter::Info,
                log_config.clone(),
                TerminalMode::Mixed,
                ColorChoice::Auto,
            )];
            if let Ok(log_file) = File::create(LOG_FILE) {
                loggers.push(WriteLogger::new(LevelFilter::Debug, log_config, log_file));
            }
            let _ = CombinedLogger::init(loggers);
        }
    }

    let file_config = config::load_config().unwrap_or_else(|e| {
        log::warn!("{}; using defaults", e);
        config::JarvisConfig::default()
    });

    let cli_provider = args.provider.map(Provider::as_str);
    match command {
        Command::Chat => {
            let resolved = config::resolve(&file_config, cli_provider, None);
            log::info!("J.A.R.V.I.S. starting up with provider: {}", resolved.provider);
            jarvis::tui::run(resolved)
        }
        Command::Serve { port } => {
            let resolved = config::resolve(&file_config, cli_provider, port);
            log::info!("Starting API proxy on port {}", resolved.port);
            jarvis::server::serve(&resolved).await
        }
    }
}
