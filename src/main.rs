use clap::{ArgAction, Parser};
use std::path::PathBuf;
use tic_rs::constants::{DEFAULT_HOST, DEFAULT_KEEPALIVE, DEFAULT_PORT, DEFAULT_TTY};
use tic_rs::logging::{log_error, log_info};
use tic_rs::{
    close_sink, init_logger_with_verbosity, BridgeConfig, BrokerConfig, FrameReader, HomieDevice,
    MqttSink, SerialConfig, SerialLink, ShutdownSignals, TagRegistry, TicBridge, TicError,
};

#[derive(Parser)]
#[command(name = "tic-rs", version)]
#[command(about = "Publish electricity meter teleinformation to an MQTT broker")]
#[command(disable_help_flag = true)]
struct Cli {
    /// Teleinformation tty
    #[arg(short, long, default_value = DEFAULT_TTY)]
    tty: String,

    /// MQTT broker host
    #[arg(short = 'h', long, default_value = DEFAULT_HOST)]
    host: String,

    /// MQTT broker port
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// MQTT keep-alive in seconds
    #[arg(short, long, default_value_t = DEFAULT_KEEPALIVE)]
    keepalive: u64,

    /// JSON field table replacing the built-in one
    #[arg(short, long)]
    fields: Option<PathBuf>,

    /// Log every published value
    #[arg(short, long)]
    verbose: bool,

    /// Print help
    #[arg(short = 'H', long, action = ArgAction::Help)]
    help: Option<bool>,
}

impl From<Cli> for BridgeConfig {
    fn from(cli: Cli) -> Self {
        BridgeConfig {
            serial: SerialConfig {
                port_name: cli.tty,
                ..SerialConfig::default()
            },
            broker: BrokerConfig {
                host: cli.host,
                port: cli.port,
                keepalive: cli.keepalive,
                ..BrokerConfig::default()
            },
            fields_path: cli.fields,
            verbose: cli.verbose,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), TicError> {
    let config = BridgeConfig::from(Cli::parse());
    init_logger_with_verbosity(config.verbose);

    let registry = TagRegistry::new(config.field_table()?)?;
    let mut signals = ShutdownSignals::install()
        .map_err(|e| TicError::Other(format!("Cannot install signal handlers: {e}")))?;
    let mut sink =
        MqttSink::connect(&config.broker, HomieDevice::default(), registry.descriptors()).await?;

    let link = match SerialLink::open(&config.serial) {
        Ok(link) => link,
        Err(e) => {
            close_sink(&mut sink).await;
            return Err(e);
        }
    };

    let mut bridge = TicBridge::new(FrameReader::new(link), registry, sink);
    let outcome = tokio::select! {
        res = bridge.run() => res,
        name = signals.recv() => {
            log_info(&format!("Caught {name}, shutting down"));
            Ok(())
        }
    };

    match bridge.shutdown().await {
        Ok(stats) => log_info(&format!("Statistics: {}", stats.to_json())),
        Err(e) => log_error(&format!("Shutdown incomplete: {e}")),
    }

    outcome
}
