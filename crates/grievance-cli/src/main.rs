//! Grievance CLI - Command Line Interface
//!
//! Command-line front-end for the grievance request tracker. Signs in
//! against the remote API (or the in-memory demo server), keeps the session
//! in a local file, and exposes request triage and messaging as commands.
//!
//! Key Features:
//! - Login, registration and a persisted session
//! - Request listing, detail, creation, status updates and assignment
//! - Threaded request messages with reply, forward, star and archive
//! - Request analytics and the user directory
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

mod commands;
mod output;
mod session_file;
mod transport;

use clap::{Parser, Subcommand, ValueEnum};
use commands::{Console, DEMO_LOGIN};
use grievance_client::{demo_client, ApiClient, ApiConfig, MemorySessionRepository, SessionStore};
use grievance_common::{GrievanceError, Result};
use session_file::{default_session_path, FileSessionRepository};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;
use transport::ReqwestTransport;

// =============================================================================
// CLI Arguments
// =============================================================================

#[derive(Parser)]
#[command(name = "grievance")]
#[command(author = "AutomataNexus Development Team")]
#[command(version = "0.1.0")]
#[command(about = "Grievance request tracker CLI", long_about = None)]
struct Cli {
    /// API base URL (overrides the config file and GRIEVANCE_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Where the session is kept between runs
    #[arg(long, global = true, env = "GRIEVANCE_SESSION_FILE")]
    session_file: Option<PathBuf>,

    /// Use the built-in demo server instead of the remote API
    #[arg(long, global = true)]
    demo: bool,

    /// Sign in with this email when no session is stored
    #[arg(long, global = true, env = "GRIEVANCE_EMAIL")]
    email: Option<String>,

    /// Password for --email
    #[arg(long, global = true, env = "GRIEVANCE_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn credentials(&self) -> Option<(String, String)> {
        match (&self.email, &self.password) {
            (Some(email), Some(password)) => Some((email.clone(), password.clone())),
            _ if self.demo => Some((DEMO_LOGIN.0.to_string(), DEMO_LOGIN.1.to_string())),
            _ => None,
        }
    }

    fn api_config(&self) -> Result<ApiConfig> {
        let config = match &self.config {
            Some(path) => ApiConfig::from_file(path)?,
            None => ApiConfig::from_env()?,
        };
        Ok(match &self.api_url {
            Some(url) => config.with_base_url(url.trim()),
            None => config,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FolderArg {
    Inbox,
    Starred,
    Archived,
    All,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Sign in with --email and --password and store the session
    Login,
    /// Create a customer account for --email and --password, then sign in
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        company: String,
        #[arg(long)]
        mobile: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// List requests visible to the signed-in user
    Requests {
        /// Only requests in this status (pending, active, dev, stag, uat, live, closed)
        #[arg(short, long)]
        status: Option<String>,
        #[arg(long)]
        search: Option<String>,
    },
    /// Show one request with its phases, attachments and messages
    Show { id: u64 },
    /// Submit a new request
    Create {
        #[arg(short, long)]
        subject: String,
        #[arg(short, long)]
        message: String,
        /// Request type name, e.g. SystemBug or NewFeature
        #[arg(short = 't', long = "type")]
        request_type: String,
        /// Priority name (high, medium, low) or id
        #[arg(short, long)]
        priority: String,
        /// Files to attach
        #[arg(long = "attach")]
        attachments: Vec<PathBuf>,
    },
    /// Move a request to another status
    Status {
        id: u64,
        status: String,
        #[arg(short, long)]
        remark: Option<String>,
    },
    /// Assign a request and plan its phases (dates as YYYY-MM-DD)
    Assign {
        id: u64,
        /// User id of the assignee
        #[arg(long)]
        to: u64,
        #[arg(long)]
        dev_date: Option<String>,
        #[arg(long)]
        dev_remark: Option<String>,
        #[arg(long)]
        uat_date: Option<String>,
        #[arg(long)]
        uat_remark: Option<String>,
        #[arg(long)]
        live_date: Option<String>,
        #[arg(long)]
        live_remark: Option<String>,
    },
    /// List messages
    Mails {
        #[arg(short, long, value_enum, default_value_t = FolderArg::Inbox)]
        folder: FolderArg,
        /// Only messages of this request
        #[arg(short, long)]
        request: Option<u64>,
        #[arg(long)]
        search: Option<String>,
    },
    /// Print a message with the thread it replies to
    Read { id: u64 },
    /// Send a message on a request, or reply to / forward a message
    Send {
        #[arg(long, conflicts_with_all = ["reply_to", "forward"])]
        request: Option<u64>,
        #[arg(long, conflicts_with = "forward")]
        reply_to: Option<u64>,
        /// With --reply-to, reply to every recipient
        #[arg(long, requires = "reply_to")]
        all: bool,
        #[arg(long)]
        forward: Option<u64>,
        /// Comma-separated recipients
        #[arg(long)]
        to: Option<String>,
        #[arg(long)]
        cc: Option<String>,
        #[arg(long)]
        bcc: Option<String>,
        #[arg(short, long)]
        subject: Option<String>,
        #[arg(short, long)]
        body: String,
        #[arg(long = "attach")]
        attachments: Vec<PathBuf>,
    },
    /// Toggle the star on a message
    Star { id: u64 },
    /// Archive a message
    Archive { id: u64 },
    /// Delete a message
    Delete { id: u64 },
    /// Request statistics
    Analytics,
    /// List the user directory
    Users,
}

// =============================================================================
// Main Entry Point
// =============================================================================

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<String> {
    let config = cli.api_config()?;
    let credentials = cli.credentials();

    if cli.demo {
        let session = SessionStore::new(demo_client(config), MemorySessionRepository::new());
        return Console::new(session).execute(cli.command, credentials).await;
    }

    let path = cli.session_file.clone().unwrap_or_else(default_session_path);
    let repository = FileSessionRepository::new(path, &config);
    let api = ApiClient::new(config, ReqwestTransport::new()?);
    Console::new(SessionStore::new(api, repository))
        .execute(cli.command, credentials)
        .await
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(text) => {
            print!("{}", text);
            ExitCode::SUCCESS
        }
        Err(GrievanceError::NotAuthenticated) => {
            eprintln!("Not signed in. Run `grievance login --email <EMAIL> --password <PASSWORD>`.");
            ExitCode::FAILURE
        }
        Err(e) => {
            error!(error = %e, "command failed");
            if e.requires_login() {
                eprintln!("Your session has expired. Run `grievance login` again.");
            } else {
                eprintln!("error: {}", e);
            }
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_send_reply() {
        let cli = Cli::parse_from(["grievance", "--demo", "send", "--reply-to", "3", "--all", "--body", "thanks"]);
        assert!(cli.demo);
        match cli.command {
            Commands::Send { reply_to, all, body, .. } => {
                assert_eq!(reply_to, Some(3));
                assert!(all);
                assert_eq!(body, "thanks");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_login_takes_global_credentials() {
        let cli = Cli::parse_from(["grievance", "login", "--email", "a@b.com", "--password", "pw"]);
        assert!(matches!(cli.command, Commands::Login));
        assert_eq!(cli.credentials(), Some(("a@b.com".to_string(), "pw".to_string())));
    }

    #[test]
    fn test_demo_defaults_credentials() {
        let cli = Cli::parse_from(["grievance", "--demo", "whoami"]);
        assert_eq!(cli.credentials().map(|(e, _)| e), Some(DEMO_LOGIN.0.to_string()));
    }

    #[test]
    fn test_api_url_override() {
        let cli = Cli::parse_from(["grievance", "--api-url", "http://localhost:8080/", "users"]);
        let config = cli.api_config().unwrap();
        assert_eq!(config.url("/api/users"), "http://localhost:8080/api/users");
    }
}
