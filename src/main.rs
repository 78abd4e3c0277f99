mod config;
mod download;
mod error;
mod invoice;
mod labels;
mod router;
mod session;
mod shell;

use session::FormSession;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // logs go to stderr, the form owns stdout
    tracing_subscriber::fmt()
        .with_target(true)
        .with_level(true)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let config_path =
        std::env::var("INVOICE_CONFIG").unwrap_or_else(|_| config::DEFAULT_CONFIG_PATH.to_string());
    let cfg = config::Config::load_or_default(&config_path)?;
    info!(
        ltr = %router::select_endpoint(&cfg.service, invoice::Directionality::Ltr),
        rtl = %router::select_endpoint(&cfg.service, invoice::Directionality::Rtl),
        output = %cfg.output.dir.join(&cfg.output.filename).display(),
        timeout_secs = cfg.service.timeout_secs,
        "Renderer endpoints"
    );

    let mut session = FormSession::new(&cfg);
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();

    shell::run(&mut session, stdin, &mut stdout).await?;
    Ok(())
}
