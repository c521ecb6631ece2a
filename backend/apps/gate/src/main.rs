//! Gate Helper Entry Point
//!
//! Runs the second factor for one username, the way the authentication host
//! would, and exits with the host code (0 success, 1 auth error, 2 permanent
//! error). Uses `anyhow` for startup errors; gate errors are already folded
//! into the decision.

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use linkgate::presentation::host;
use linkgate::{AuthDecision, Conversation};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Out-of-band second factor for a single login attempt
#[derive(Parser, Debug)]
#[command(name = "linkgate")]
#[command(version, about, long_about = None)]
struct Cli {
    /// User to authenticate
    username: String,

    /// Module argument, repeatable (e.g. `--arg group=2fa`)
    #[arg(long = "arg", value_name = "KEY=VALUE")]
    args: Vec<String>,

    /// Print the decision as JSON on stdout
    #[arg(long)]
    json: bool,
}

/// Prompt text goes to stdout, errors to stderr
struct TerminalConversation {
    quiet: bool,
}

impl Conversation for TerminalConversation {
    fn info(&self, message: &str) {
        if !self.quiet {
            println!("{message}");
        }
    }

    fn error(&self, message: &str) {
        eprintln!("{message}");
    }
}

#[derive(Serialize)]
struct Report<'a> {
    username: &'a str,
    exit_code: u8,
    #[serde(flatten)]
    decision: &'a AuthDecision,
}

fn main() -> anyhow::Result<ExitCode> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing; stdout is reserved for the conversation
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "linkgate=info,gate=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let conversation = TerminalConversation { quiet: cli.json };

    let decision = host::authenticate(Some(cli.username.as_str()), &cli.args, &conversation);
    let code = decision.code;

    tracing::info!(
        username = %cli.username,
        code = %code,
        exempt = decision.exempt,
        reason = decision.reason.map(|r| r.as_str()),
        "Second factor finished"
    );

    if cli.json {
        let report = Report {
            username: &cli.username,
            exit_code: code.exit_code(),
            decision: &decision,
        };
        let json = serde_json::to_string(&report).context("serializing decision")?;
        println!("{json}");
    }

    Ok(ExitCode::from(code.exit_code()))
}
