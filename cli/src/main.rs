//! Enseada console CLI.
//!
//! Evaluates permissions offline against a capabilities document, or logs in
//! to a registry with a personal access token and runs the same guarded
//! operations the dashboard performs.
//!
//! Usage:
//!   enseada check users read --capabilities caps.json --user alice
//!   enseada --config enseada.toml whoami
//!   enseada --config enseada.toml can oci_repos delete
//!   enseada --config enseada.toml list users --page 2

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use enseada_authz::PermissionChecker;
use enseada_client::{Collection, ConsoleConfig, HttpClient, Registry};
use enseada_console::{ListPage, OidcEvent, SessionStore};
use enseada_contracts::{
    error::{EnseadaError, EnseadaResult},
    permission::Permission,
    user::{Capabilities, User},
};
use enseada_core::traits::Authorizer;

// ── CLI definition ────────────────────────────────────────────────────────────

/// Enseada registry console.
#[derive(Parser)]
#[command(
    name = "enseada",
    about = "Enseada registry console",
    long_about = "Checks console permissions offline, or talks to an Enseada registry\n\
                  using the access token from the config file or ENSEADA_TOKEN."
)]
struct Cli {
    /// Path to the console TOML config.
    #[arg(long, global = true, default_value = "enseada.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Evaluate a permission against a capabilities JSON file, without a server.
    Check {
        object: String,
        action: String,
        /// JSON document shaped like `users/me/capabilities`.
        #[arg(long)]
        capabilities: PathBuf,
        /// Username to evaluate as.
        #[arg(long)]
        user: String,
    },
    /// Show the logged-in user.
    Whoami,
    /// Show the logged-in user's permissions and roles.
    Capabilities,
    /// Ask whether the logged-in user may perform an action.
    Can { object: String, action: String },
    /// List a collection (users, roles, clients, pats, oci, maven).
    List {
        collection: String,
        /// 1-based page number.
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// Print the OIDC client settings derived from the config.
    OidcSettings,
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize structured logging.  Set RUST_LOG=debug for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Check {
            object,
            action,
            capabilities,
            user,
        } => run_check(&object, &action, &capabilities, &user),
        Command::Whoami => run_whoami(&cli.config).await,
        Command::Capabilities => run_capabilities(&cli.config).await,
        Command::Can { object, action } => run_can(&cli.config, &object, &action).await,
        Command::List { collection, page } => run_list(&cli.config, &collection, page).await,
        Command::OidcSettings => run_oidc_settings(&cli.config),
    };

    if let Err(e) = &result {
        eprintln!("error: {}", e);
    }
    exit_code(&result)
}

/// 0 when allowed, 1 on a clean denial, 2 on any error.
fn exit_code(result: &EnseadaResult<bool>) -> ExitCode {
    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(_) => ExitCode::from(2),
    }
}

// ── Commands ──────────────────────────────────────────────────────────────────
//
// Each command returns `Ok(false)` for a clean denial so scripts can branch on
// the exit status.

fn run_check(object: &str, action: &str, path: &Path, username: &str) -> EnseadaResult<bool> {
    let contents = std::fs::read_to_string(path).map_err(|e| EnseadaError::ConfigError {
        reason: format!("failed to read capabilities file '{}': {}", path.display(), e),
    })?;
    let caps: Capabilities = serde_json::from_str(&contents).map_err(|e| EnseadaError::Decode {
        reason: format!("'{}': {}", path.display(), e),
    })?;
    let user = User::new(username);

    let allowed = PermissionChecker::new().check(object, action, &caps.permissions, Some(&user));
    print_verdict(object, action, allowed);
    Ok(allowed)
}

async fn run_whoami(config: &Path) -> EnseadaResult<bool> {
    let (_, _, session) = login(config).await?;
    let user = session.current_user().ok_or_else(not_logged_in)?;
    println!("{}{}", user.username, if user.enabled { "" } else { " (disabled)" });
    Ok(true)
}

async fn run_capabilities(config: &Path) -> EnseadaResult<bool> {
    let (_, _, session) = login(config).await?;
    let caps = session.capabilities().ok_or_else(not_logged_in)?;
    print_json(&caps)?;
    Ok(true)
}

async fn run_can(config: &Path, object: &str, action: &str) -> EnseadaResult<bool> {
    let (_, _, session) = login(config).await?;
    let allowed = session.check(object, action);
    print_verdict(object, action, allowed);
    Ok(allowed)
}

async fn run_list(config: &Path, collection: &str, page_number: usize) -> EnseadaResult<bool> {
    let collection: Collection = collection.parse()?;
    let (config, registry, session) = login(config).await?;

    let mut page = ListPage::new(collection.name(), registry.collection(collection), item_id)
        .with_limit(config.page_limit);
    if let Some(permission) = collection.permission("read") {
        page = page.with_permission(permission);
    }

    let snapshot = session.snapshot();
    let guard = snapshot.guard(session.authorizer());
    match page.load_at(&guard, page_number).await {
        Err(EnseadaError::Forbidden { permission }) => {
            print_verdict(&permission.object, &permission.action, false);
            return Ok(false);
        }
        other => other?,
    }

    for item in page.items() {
        println!("{}", page.id_of(item));
    }
    println!("-- {} of {} (offset {})", page.count(), page.total(), page.offset());
    Ok(true)
}

fn run_oidc_settings(config: &Path) -> EnseadaResult<bool> {
    let config = ConsoleConfig::from_file(config)?;
    print_json(&config.oidc_settings())?;
    Ok(true)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

type Session = SessionStore<enseada_client::ProfileApi>;

/// Build the client from `config` and replay the login lifecycle.
async fn login(config: &Path) -> EnseadaResult<(ConsoleConfig, Registry, Session)> {
    let config = ConsoleConfig::from_file(config)?;
    let registry = Registry::new(HttpClient::from_config(&config)?);
    let session = SessionStore::new(registry.profile());
    session.handle(OidcEvent::UserLoaded).await?;
    debug!(base_url = %config.base_url, "session established");
    Ok((config, registry, session))
}

/// Best-effort display id for an untyped collection item.
fn item_id(item: &serde_json::Value) -> String {
    if let Some(s) = item.as_str() {
        return s.to_string();
    }
    for key in ["id", "username", "role", "client_id"] {
        if let Some(s) = item.get(key).and_then(|v| v.as_str()) {
            return s.to_string();
        }
    }
    let pair = |a: &str, b: &str| -> Option<String> {
        Some(format!("{}/{}", item.get(a)?.as_str()?, item.get(b)?.as_str()?))
    };
    pair("group", "name")
        .or_else(|| pair("group_id", "artifact_id"))
        .unwrap_or_else(|| item.to_string())
}

fn verdict(object: &str, action: &str, allowed: bool) -> String {
    if allowed {
        format!("allowed: {} {}", object, action)
    } else {
        EnseadaError::forbidden(object, action).to_string()
    }
}

fn print_verdict(object: &str, action: &str, allowed: bool) {
    println!("{}", verdict(object, action, allowed));
}

fn print_json<T: serde::Serialize>(value: &T) -> EnseadaResult<()> {
    let out = serde_json::to_string_pretty(value).map_err(|e| EnseadaError::Decode {
        reason: format!("failed to render JSON: {}", e),
    })?;
    println!("{}", out);
    Ok(())
}

fn not_logged_in() -> EnseadaError {
    EnseadaError::NotAuthenticated {
        reason: "session was not established".to_string(),
    }
}
