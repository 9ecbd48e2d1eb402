#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! Collect recipient addresses from an IMAPS account and check them
//! against Have I Been Pwned

use anyhow::Context;
use clap::Parser;
use hackmeck::{
    AccountScanner, AddressFilter, DEFAULT_HIBP_URL, HibpClient, HibpConfig, ImapConfig,
    Reporter, TlsVerification,
};
use std::io::IsTerminal;
use std::time::Duration;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "hackmeck", version)]
#[command(
    about = "Collect the email addresses that received mail in an IMAPS account \
             and check them against https://haveibeenpwned.com",
    long_about = "Collect the email addresses that received mail in an IMAPS account \
                  and check them against https://haveibeenpwned.com.\n\n\
                  Only addresses whose domain equals one of <DOMAINS> are checked: \
                  with \"example.com\", test@example.com is checked but \
                  test@mail.example.com and abuse@example.de are not."
)]
struct Args {
    /// Domains whose addresses are checked
    #[arg(required = true)]
    domains: Vec<String>,

    /// IMAPS host
    #[arg(long, env = "IMAP_HOST", default_value = "localhost")]
    host: String,

    /// IMAPS port
    #[arg(short, long, env = "IMAP_PORT", default_value_t = hackmeck::DEFAULT_IMAP_PORT)]
    port: u16,

    /// IMAP account username
    #[arg(short, long, env = "IMAP_USERNAME")]
    user: String,

    /// IMAP account password (prompted when omitted)
    #[arg(long, env = "IMAP_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Mailboxes that are not scanned for addresses
    #[arg(short, long = "ignore", value_name = "MAILBOX")]
    ignore: Vec<String>,

    /// Also show unverified breaches and pastes
    #[arg(short, long)]
    all: bool,

    /// Accept invalid or self-signed server certificates
    #[arg(long)]
    insecure: bool,

    /// Have I Been Pwned API key
    #[arg(long, env = "HIBP_API_KEY", hide_env_values = true)]
    hibp_api_key: Option<String>,

    /// Breach service API root
    #[arg(long, env = "HIBP_API_URL", default_value = DEFAULT_HIBP_URL, hide = true)]
    hibp_url: String,

    /// Delay between two breach service requests, in milliseconds
    #[arg(long, default_value_t = 2000)]
    delay_ms: u64,

    /// Show debug output
    #[arg(short, long, conflicts_with = "quiet")]
    debug: bool,

    /// Only show breaches and errors
    #[arg(short, long)]
    quiet: bool,
}

impl Args {
    const fn log_level(&self) -> &'static str {
        if self.debug {
            "debug"
        } else if self.quiet {
            "warn"
        } else {
            "info"
        }
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(args.log_level())),
        )
        .with_ansi(std::io::stdout().is_terminal())
        .init();

    if let Err(e) = run(args).await {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("Failed to install rustls crypto provider"))?;

    debug!(
        host = %args.host,
        port = args.port,
        user = %args.user,
        domains = ?args.domains,
        ignore = ?args.ignore,
        all = args.all,
        "Command line arguments"
    );

    let password = match args.password {
        Some(password) => password,
        None => rpassword::prompt_password("Enter Password: ")
            .context("Could not read password")?,
    };

    let imap = ImapConfig {
        host: args.host,
        port: args.port,
        username: args.user,
        password,
        tls: if args.insecure {
            TlsVerification::AcceptInvalid
        } else {
            TlsVerification::WebPki
        },
    };
    let hibp = HibpConfig {
        base_url: args.hibp_url,
        api_key: args.hibp_api_key,
        delay: Duration::from_millis(args.delay_ms),
        ..HibpConfig::default()
    };

    let filter = AddressFilter::new(&args.domains, &args.ignore);
    let lookup = HibpClient::new(&hibp)?;

    let addresses = AccountScanner::new(imap)
        .scan(&filter)
        .await
        .context("Scanning mailboxes failed")?;

    let mut reporter = Reporter::new(lookup, args.all, hibp.delay);
    let summary = reporter.run(&addresses).await;

    info!(
        checked = summary.checked,
        pwned = summary.pwned,
        breaches = summary.breaches,
        pastes = summary.pastes,
        failed = summary.failed_lookups,
        "Done!"
    );
    Ok(())
}
