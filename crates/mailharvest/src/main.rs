//! CLI entry point for `mailharvest`.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing::{info, warn};

use mailharvest::config::{find_config, load_config};
use mailharvest::gateway::DEFAULT_CONNECT_TIMEOUT;
use mailharvest::{
    resolve_secret, ApiGateway, ExtensionSet, FileWriter, GraphMailbox, Harvester, Mailbox,
    PasswordGrantAuth, SecretSource,
};

#[derive(Clone, Copy, ValueEnum)]
enum SecretFrom {
    /// SECRET is the password
    Literal,
    /// SECRET is a path to a file holding the password
    File,
    /// SECRET is the name of an environment variable holding the password
    Env,
}

impl From<SecretFrom> for SecretSource {
    fn from(value: SecretFrom) -> Self {
        match value {
            SecretFrom::Literal => SecretSource::Literal,
            SecretFrom::File => SecretSource::File,
            SecretFrom::Env => SecretSource::Env,
        }
    }
}

#[derive(Parser)]
#[command(
    name = "mailharvest",
    version,
    about = "Download matching attachments from a mailbox and delete the processed messages"
)]
struct Cli {
    /// Account used to sign in (e.g. "john.doe@contoso.com")
    username: String,

    /// Account password, taken verbatim unless --secret-from says otherwise
    #[arg(allow_hyphen_values = true)]
    secret: String,

    /// Mailbox whose inbox is harvested; the account must have access to it
    mailbox: String,

    /// Existing directory the attachments are saved to
    destination: PathBuf,

    /// Space-separated file extensions to download (e.g. ".xls .csv .xlsx")
    extensions: String,

    /// How SECRET is interpreted
    #[arg(long, value_enum, value_name = "SOURCE", default_value = "literal")]
    secret_from: SecretFrom,

    /// Path to appsettings.json
    #[arg(long, value_name = "PATH", env = "MAILHARVEST_CONFIG")]
    config: Option<PathBuf>,

    /// Verbose logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Print the run report as JSON on stdout
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "mailharvest=info,warn",
        1 => "mailharvest=debug,info",
        _ => "trace",
    };
    setup_logging(level)?;

    info!(
        "Starting mailharvest v{} - {}",
        env!("CARGO_PKG_VERSION"),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );

    let config_path = find_config(cli.config.as_deref())?;
    let settings = load_config(&config_path)
        .with_context(|| format!("Failed to load {}", config_path.display()))?;
    let password = resolve_secret(cli.secret_from.into(), &cli.secret)
        .context("Failed to resolve the secret")?;
    let extensions = ExtensionSet::parse(&cli.extensions);

    if !cli.destination.is_dir() {
        warn!(
            "Destination {} is not an existing directory; downloads will fail",
            cli.destination.display()
        );
    }

    let auth = PasswordGrantAuth::new(
        settings.authentication.token_url(),
        settings.authentication.client_id.as_str(),
    )?;
    let token = auth
        .acquire_token(&settings.authentication.scopes, &cli.username, &password)
        .await
        .context("Failed to acquire an access token")?;

    let gateway = ApiGateway::with_timeouts(DEFAULT_CONNECT_TIMEOUT, settings.web_api.timeout())?;
    let mailbox = Mailbox::new(
        cli.mailbox.as_str(),
        &settings.web_api.microsoft_graph_base_endpoint,
    );
    let harvester = Harvester::new(
        GraphMailbox::new(gateway, mailbox, token),
        extensions,
        FileWriter::new(&cli.destination),
    );

    let report = harvester.run().await;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(())
}

/// Set up tracing on stderr, bridging `log` records from dependencies.
fn setup_logging(level: &str) -> anyhow::Result<()> {
    use tracing_subscriber::layer::SubscriberExt;

    tracing_log::LogTracer::init().context("Failed to install the log bridge")?;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer);

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to install the tracing subscriber")?;

    Ok(())
}
