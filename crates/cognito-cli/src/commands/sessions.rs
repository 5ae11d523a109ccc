//! Session browsing commands.

use crate::cli::{SessionAction, SessionsArgs};
use crate::commands::open_store;
use crate::config::AppConfig;
use crate::error::CliError;
use crate::output::Formatter;
use cognito_domain::traits::SessionStore;

/// Execute a sessions subcommand.
pub fn execute_sessions(
    args: SessionsArgs,
    config: &AppConfig,
    formatter: &Formatter,
) -> anyhow::Result<()> {
    let store = open_store(config)?;
    let default_user = || config.tracker.default_user.clone();

    match args.action {
        SessionAction::List {
            user,
            limit,
            offset,
        } => {
            let user = user.unwrap_or_else(default_user);
            let sessions = store
                .list_sessions(&user, limit, offset)
                .map_err(CliError::from)?;
            println!("{}", formatter.sessions(&sessions)?);
        }
        SessionAction::Show { id } => {
            let session = store
                .get_session(&id)
                .map_err(CliError::from)?
                .ok_or_else(|| CliError::NotFound(format!("session {}", id)))?;
            println!("{}", formatter.session(&session)?);
        }
        SessionAction::Delete { id, user } => {
            let user = user.unwrap_or_else(default_user);
            if !store.delete_session(&id, &user).map_err(CliError::from)? {
                return Err(CliError::NotFound(format!("session {} for user {}", id, user)).into());
            }
            println!("{}", formatter.success(&format!("Deleted session {}", id)));
        }
        SessionAction::Save {
            session_id,
            hypothesis_id,
            notes,
            user,
        } => {
            let user = user.unwrap_or_else(default_user);
            let saved = store
                .save_hypothesis(&session_id, &hypothesis_id, &user, &notes)
                .map_err(CliError::from)?
                .ok_or_else(|| {
                    CliError::NotFound(format!(
                        "hypothesis {} in session {} for user {}",
                        hypothesis_id, session_id, user
                    ))
                })?;
            println!(
                "{}",
                formatter.success(&format!("Saved {} as {}", hypothesis_id, saved.id))
            );
        }
        SessionAction::Saved { user } => {
            let user = user.unwrap_or_else(default_user);
            let saved = store.list_saved(&user).map_err(CliError::from)?;
            println!("{}", formatter.saved_hypotheses(&saved)?);
        }
    }
    Ok(())
}
