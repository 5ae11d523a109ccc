//! Status and result commands.
//!
//! Both run in a fresh process, so the registry is empty and answers come
//! from the session store. `--user` hides tasks owned by anyone else.

use crate::cli::TaskArgs;
use crate::commands::{open_tracker, parse_task_id};
use crate::config::AppConfig;
use crate::error::CliError;
use crate::output::Formatter;
use cognito_tasks::{TaskOutcome, TaskPoll};

/// Execute the status command.
pub async fn execute_status(
    args: TaskArgs,
    config: &AppConfig,
    formatter: &Formatter,
) -> anyhow::Result<()> {
    let task_id = parse_task_id(&args.task_id)?;
    let tracker = open_tracker(config)?;

    let poll = match args.user.as_deref() {
        Some(user) => tracker.poll_for_user(task_id, user).await?,
        None => tracker.poll(task_id).await?,
    };
    match poll {
        TaskPoll::Found(snapshot) => {
            println!("{}", formatter.task_status(&snapshot)?);
            Ok(())
        }
        TaskPoll::Expired => Err(CliError::NotFound(format!(
            "task {} is unknown or has expired",
            task_id
        ))
        .into()),
    }
}

/// Execute the result command.
pub async fn execute_result(
    args: TaskArgs,
    config: &AppConfig,
    formatter: &Formatter,
) -> anyhow::Result<()> {
    let task_id = parse_task_id(&args.task_id)?;
    let tracker = open_tracker(config)?;

    let outcome = match args.user.as_deref() {
        Some(user) => tracker.result_for_user(task_id, user).await?,
        None => tracker.result(task_id).await?,
    };
    match outcome {
        TaskOutcome::Completed(output) => {
            println!("{}", formatter.synthesis_output(&output)?);
            Ok(())
        }
        TaskOutcome::Failed(error) => Err(CliError::Task(format!(
            "task {} failed: {}",
            task_id, error
        ))
        .into()),
        TaskOutcome::InProgress(snapshot) => {
            println!("{}", formatter.task_status(&snapshot)?);
            Ok(())
        }
        TaskOutcome::Expired => Err(CliError::NotFound(format!(
            "task {} is unknown or has expired",
            task_id
        ))
        .into()),
    }
}
