//! `logview` - terminal client for the logsys log ingestion service.
//!
//! Log in, manage projects and their API keys, and browse aggregated
//! and individual log events from the command line.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::io::{BufRead, IsTerminal, Write as _};

use clap::Parser;
use clipboard_rs::{Clipboard, ClipboardContext};
use logview_client::{ApiClient, NewProject, SavedSession, Session, SessionStore};
use tracing::debug;
use url::Url;

use logview::cli::{Cli, Command, ConfigCommand, LoginCommand, ProjectCommand};
use logview::{logs, render, Config, Error, Result};

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logview::init_logging(cli.verbosity());

    let config = Config::load_from(cli.config.clone())?;

    match cli.command {
        Command::Config(cmd) => handle_config(&config, cmd)?,
        command => run(command, &config, cli.server.as_deref()).await?,
    }

    Ok(())
}

/// Run a command that talks to the server.
async fn run(command: Command, config: &Config, server_override: Option<&str>) -> Result<()> {
    let server = resolve_server(config, server_override)?;
    let store = SessionStore::new(config.session_file_path());

    // A cookie saved for a different server is not presented to this one
    let saved = store
        .load()
        .filter(|saved| saved.server_url == server.as_str());
    if saved.is_some() {
        debug!("restoring saved session for {server}");
    }

    let client = ApiClient::with_session(
        server.clone(),
        config.timeout(),
        saved.as_ref().map(|s| s.cookie.as_str()),
    )?;
    let mut session = Session::new();

    match command {
        Command::Login(cmd) => handle_login(&client, &mut session, &store, &server, cmd).await,
        Command::Logout => handle_logout(&client, &mut session, &store).await,
        Command::Whoami => handle_whoami(&client, &mut session).await,
        Command::Project(cmd) => handle_project(&client, &mut session, cmd).await,
        Command::Logs(cmd) => {
            require_session(&client, &mut session).await?;
            logs::run(&client, &cmd).await
        }
        Command::Config(_) => unreachable!("handled before a client is built"),
    }
}

fn resolve_server(config: &Config, server_override: Option<&str>) -> Result<Url> {
    match server_override {
        Some(raw) => Url::parse(raw).map_err(|err| Error::ConfigValidation {
            message: format!("--server is not a valid URL: {err}"),
        }),
        None => config.server_url(),
    }
}

async fn handle_login(
    client: &ApiClient,
    session: &mut Session,
    store: &SessionStore,
    server: &Url,
    cmd: LoginCommand,
) -> Result<()> {
    if let Some(user) = session.current_user(client).await {
        println!("Already logged in as {}.", user.username);
        return Ok(());
    }

    let password = match cmd.password {
        Some(password) => password,
        None => read_password()?,
    };

    client.login(&cmd.username, &password).await?;

    match client.session_cookie() {
        Some(cookie) => {
            store.save(&SavedSession {
                cookie,
                server_url: server.as_str().to_string(),
            })?;
        }
        None => {
            return Err(logview_client::Error::invalid_response(
                "login succeeded but no session cookie was set",
            )
            .into());
        }
    }

    session.invalidate();
    println!("Logged in as {}.", cmd.username);
    Ok(())
}

async fn handle_logout(
    client: &ApiClient,
    session: &mut Session,
    store: &SessionStore,
) -> Result<()> {
    session.logout(client, store).await?;
    println!("Logged out.");
    Ok(())
}

async fn handle_whoami(client: &ApiClient, session: &mut Session) -> Result<()> {
    let user = require_session(client, session).await?;
    println!("{}", user.username);
    Ok(())
}

async fn handle_project(
    client: &ApiClient,
    session: &mut Session,
    cmd: ProjectCommand,
) -> Result<()> {
    require_session(client, session).await?;

    match cmd {
        ProjectCommand::List { json } => {
            let projects = client.projects().await?;
            print_projects(&projects, json)?;
        }
        ProjectCommand::Create {
            name,
            description,
            searchable_keys,
            log_ttl_seconds,
        } => {
            let project = NewProject::from_form(name, description, &searchable_keys, log_ttl_seconds);
            client.create_project(&project).await?;
            println!("Project created.");
            println!();
            let projects = client.projects().await?;
            print_projects(&projects, false)?;
        }
        ProjectCommand::ApiKey { project_id, copy } => {
            let key = client.api_key(&project_id).await?;
            println!("{}", key.api_key);
            if copy {
                copy_to_clipboard(&key.api_key)?;
                println!("Copied to clipboard.");
            }
        }
    }

    Ok(())
}

fn print_projects(projects: &[logview_client::Project], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(projects)?);
    } else if projects.is_empty() {
        println!("No projects found.");
    } else {
        print!("{}", render::projects_table(projects));
    }
    Ok(())
}

/// The logged-in user, or [`logview_client::Error::NotLoggedIn`].
async fn require_session(
    client: &ApiClient,
    session: &mut Session,
) -> Result<logview_client::User> {
    session
        .current_user(client)
        .await
        .cloned()
        .ok_or_else(|| logview_client::Error::NotLoggedIn.into())
}

/// Prompt for a password on stderr and read it with echo suppressed.
///
/// Piped stdin (scripted use) falls back to a plain line read, same as
/// `--password`.
fn read_password() -> Result<String> {
    eprint!("Password: ");
    std::io::stderr().flush()?;
    if std::io::stdin().is_terminal() {
        let password = rpassword::read_password()?;
        eprintln!();
        Ok(password)
    } else {
        read_password_from(&mut std::io::stdin().lock())
    }
}

fn read_password_from(reader: &mut impl BufRead) -> Result<String> {
    Ok(rpassword::read_password_from_bufread(reader)?)
}

fn copy_to_clipboard(text: &str) -> Result<()> {
    let ctx = ClipboardContext::new().map_err(|err| Error::clipboard(err.to_string()))?;
    ctx.set_text(text.to_string())
        .map_err(|err| Error::clipboard(err.to_string()))
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("server_url   = {}", config.api.server_url);
                println!("timeout_secs = {}", config.api.timeout_secs);
                println!("session_file = {}", config.session_file_path().display());
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let target = file.unwrap_or_else(Config::default_config_path);
            Config::load_from(Some(target.clone()))?;
            println!("{} is valid.", target.display());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_read_password_from_reader_strips_line_ending() {
        let mut input = Cursor::new(&b"hunter2\n"[..]);
        assert_eq!(read_password_from(&mut input).unwrap(), "hunter2");

        let mut input = Cursor::new(&b"hunter2\r\n"[..]);
        assert_eq!(read_password_from(&mut input).unwrap(), "hunter2");
    }
}
