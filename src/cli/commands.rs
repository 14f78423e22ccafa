//! CLI command implementations

use anyhow::{anyhow, Result};
use serde::Serialize;
use std::fs;
use std::sync::Arc;

use crate::auth::{LoginPrompt, MemoryNavigator, SessionController, SessionState};
use crate::cli::{error, format_phase, info, print_session_table, success, warn, OutputFormat, Toggle};
use crate::config::{self, Config};

/// Initialize a new authsession.toml configuration file
pub async fn init() -> Result<()> {
    let config_path = std::path::Path::new(config::loader::CONFIG_FILENAME);

    if config_path.exists() {
        warn("authsession.toml already exists");
        return Ok(());
    }

    let content = config::loader::default_config_content();
    fs::write(config_path, content)?;

    success("Created authsession.toml");
    info("Point [identity] at your API and run 'authsession login --token <token>'");

    Ok(())
}

/// Store a token and sign in with it
pub async fn login(token: &str, remember: bool) -> Result<()> {
    let (session, _) = open_session()?;

    info("Signing in");
    session.login(token, remember)?.await?;

    let state = session.state();
    if state.is_authenticated() {
        success(&format!("Signed in as {} (id {})", state.user.name, state.user.id));
        if remember {
            info("Login will be remembered");
        }
        Ok(())
    } else {
        error("Sign-in failed; the stored token was cleared");
        Err(anyhow!("identity endpoint rejected the token"))
    }
}

#[derive(Serialize)]
struct StatusReport<'a> {
    #[serde(flatten)]
    session: &'a SessionState,
    remember_me: bool,
}

/// Restore the session from the stored token and print it
pub async fn status(format: OutputFormat) -> Result<()> {
    let (session, _) = open_session()?;

    if let Some(restore) = session.mount() {
        restore.await?;
    }

    let state = session.state();
    let remember_me = session.is_remember_me_set()?;

    match format {
        OutputFormat::Table => {
            info(&format!("Session is {}", format_phase(state.phase)));
            print_session_table(&state, remember_me);
        }
        OutputFormat::Json => {
            let report = StatusReport { session: &state, remember_me };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Yaml => {
            let report = StatusReport { session: &state, remember_me };
            println!("{}", serde_yaml::to_string(&report)?);
        }
    }

    Ok(())
}

/// Sign out and forget the stored token
pub async fn logout() -> Result<()> {
    let (session, navigator) = open_session()?;

    session.signout();

    success("Signed out");
    info(&format!("Redirected to {}", navigator.current()));
    Ok(())
}

/// Show or change the remember-me flag
pub async fn remember(state: Option<Toggle>) -> Result<()> {
    let (session, _) = open_session()?;

    match state {
        Some(toggle) => {
            let on = toggle == Toggle::On;
            session.set_remember_me(on)?;
            success(&format!("Remember me {}", if on { "enabled" } else { "disabled" }));
        }
        None => {
            let on = session.is_remember_me_set()?;
            info(&format!("Remember me is {}", if on { "on" } else { "off" }));
        }
    }

    Ok(())
}

fn load_config() -> Result<Config> {
    config::load_config().map_err(|e| anyhow!("{}", e))
}

/// Build the session the way an application shell would: file storage,
/// the configured identity endpoint, and a navigator we can report from
fn open_session() -> Result<(SessionController, Arc<MemoryNavigator>)> {
    let config = load_config()?;
    let navigator = Arc::new(MemoryNavigator::new(config.routes.root.clone()));
    let prompt: Arc<dyn LoginPrompt> =
        Arc::new(|| warn("Login required: run 'authsession login --token <token>'"));

    let session = SessionController::from_config(&config, navigator.clone(), prompt)?;
    Ok((session, navigator))
}
