//! Terminal client for the proxy-pool API, built on `console-client`.
//!
//! Exercises the same access layer the console UI uses: bearer-token
//! attachment, failure classification, and session invalidation. The
//! session token comes from a flag, the environment, or a persisted
//! session file shared with other tools.

use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde_json::Value;

use console_client::{
    ApiError, ClientConfig, FileStorage, HttpClient, Navigator, Notifier, SessionStore,
};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("request failed: {0}")]
    Api(#[from] ApiError),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "console-cli", about = "Proxy pool API client")]
struct Cli {
    /// API root; defaults to the environment-resolved endpoint.
    #[arg(long, env = "POOL_API_BASE")]
    base_url: Option<String>,

    /// Bearer token for this invocation (overrides the session file).
    #[arg(long, env = "POOL_TOKEN")]
    token: Option<String>,

    /// Persisted session file shared with other console tools.
    #[arg(long, env = "POOL_SESSION_FILE")]
    session_file: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check that the server is up.
    Ping,
    /// Show pool counts per protocol.
    Proxies,
    /// Show fetcher run status.
    Fetchers,
    /// Enable or disable one fetcher.
    FetcherEnable {
        name: String,
        #[arg(long, default_value_t = true)]
        enable: bool,
    },
    /// Manually add a proxy (JSON body, e.g. '{"fetcher_name":"manual",...}').
    AddProxy {
        #[arg(long)]
        data: String,
    },
    /// Verify the stored token against the server.
    Verify,
    /// Drop the local session.
    Logout,
}

/// Shell seams for a terminal: notifications go to stderr, "navigation"
/// is only reported, since there is no view to switch.
struct TermShell;

impl Notifier for TermShell {
    fn notify(&self, message: &str) {
        eprintln!("! {message}");
    }
}

#[async_trait::async_trait]
impl Navigator for TermShell {
    fn current_path(&self) -> String {
        "/".to_owned()
    }

    async fn navigate(&self, path: &str) {
        eprintln!("(session ended; a console would now show {path})");
    }
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let config = match &cli.base_url {
        Some(base_url) => ClientConfig::new(base_url.clone()),
        None => ClientConfig::from_env(),
    };

    let store = match &cli.session_file {
        Some(path) => Arc::new(SessionStore::new(FileStorage::open(path))),
        None => Arc::new(SessionStore::in_memory()),
    };
    if let Some(token) = &cli.token {
        store.set(token, &serde_json::json!({ "username": "cli" }));
    }

    let shell = Arc::new(TermShell);
    let client = HttpClient::new(
        &config,
        store,
        Arc::clone(&shell) as Arc<dyn Notifier>,
        shell as Arc<dyn Navigator>,
    )?;

    match cli.command {
        Command::Ping => {
            let envelope = client.get("/ping", None).await?;
            print_json(&envelope.data)?;
        }
        Command::Proxies => {
            let envelope = client.get("/proxies_status", None).await?;
            print_json(&envelope.data)?;
        }
        Command::Fetchers => {
            let envelope = client.get("/fetchers_status", None).await?;
            print_json(&envelope.data)?;
        }
        Command::FetcherEnable { name, enable } => {
            let params = serde_json::json!({
                "name": name,
                "enable": if enable { "1" } else { "0" },
            });
            client.get("/fetcher_enable", Some(&params)).await?;
            println!("ok");
        }
        Command::AddProxy { data } => {
            let body = serde_json::from_str::<Value>(&data)?;
            let envelope = client.post("/add_proxy", Some(&body), None).await?;
            print_json(&envelope.data)?;
        }
        Command::Verify => {
            let envelope = client.get("/auth/verify", None).await?;
            print_json(&envelope.data)?;
        }
        Command::Logout => {
            client.logout();
            println!("logged out");
        }
    }

    Ok(())
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
