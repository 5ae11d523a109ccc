//! Synthesize command implementation.

use crate::cli::SynthesizeArgs;
use crate::commands::open_tracker;
use crate::config::AppConfig;
use crate::error::CliError;
use crate::output::Formatter;
use anyhow::Context;
use cognito_agents::{AgenticOrchestrator, SemanticScholarClient};
use cognito_domain::text::truncate_chars;
use cognito_domain::{Document, SessionStore, TaskId};
use cognito_llm::Provider;
use cognito_pipeline::{DeterministicPipeline, Orchestrator};
use cognito_tasks::{SubmitRequest, TaskOutcome, TaskPoll, TaskSnapshot, TaskTracker};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Characters of the first line used as a document title
const MAX_TITLE_CHARS: usize = 200;

/// Execute the synthesize command.
pub async fn execute_synthesize(
    args: SynthesizeArgs,
    config: &AppConfig,
    formatter: &Formatter,
) -> anyhow::Result<()> {
    let documents = read_documents(&args.files)?;
    let tracker = open_tracker(config)?;
    let orchestrator = build_orchestrator(config, args.agentic)?;

    let task_id = tracker.submit(
        orchestrator,
        SubmitRequest {
            documents,
            focus_area: args.focus,
            user_id: args.user,
        },
    );
    eprintln!("{}", formatter.info(&format!("Task {} submitted", task_id)));

    let interval = Duration::from_millis(config.output.poll_interval_ms.max(50));
    let finished = wait_for_task(&tracker, task_id, interval, formatter).await?;

    match tracker.result(task_id).await? {
        TaskOutcome::Completed(output) => {
            eprintln!("{}", formatter.success(&finished.message));
            println!("{}", formatter.synthesis_output(&output)?);
            Ok(())
        }
        TaskOutcome::Failed(error) => Err(CliError::Task(error).into()),
        TaskOutcome::InProgress(_) | TaskOutcome::Expired => Err(CliError::Task(format!(
            "task {} ended without a result",
            task_id
        ))
        .into()),
    }
}

fn build_orchestrator(config: &AppConfig, agentic: bool) -> anyhow::Result<Arc<dyn Orchestrator>> {
    let llm = Arc::new(Provider::from_config(&config.llm).map_err(|e| CliError::Llm(e.to_string()))?);

    if agentic {
        let search = Arc::new(SemanticScholarClient::new(&config.search));
        let agents = AgenticOrchestrator::new(
            llm,
            search,
            config.agents.clone(),
            config.extractor.clone(),
        )
        .map_err(|e| CliError::Config(e.to_string()))?;
        Ok(Arc::new(agents))
    } else {
        let pipeline = DeterministicPipeline::new(llm, config.pipeline())
            .map_err(|e| CliError::Config(e.to_string()))?;
        Ok(Arc::new(pipeline))
    }
}

/// Poll until the task finishes, echoing progress to stderr.
async fn wait_for_task<S: SessionStore + 'static>(
    tracker: &TaskTracker<S>,
    task_id: TaskId,
    interval: Duration,
    formatter: &Formatter,
) -> anyhow::Result<TaskSnapshot> {
    let mut last_line = String::new();
    loop {
        let snapshot = match tracker.poll(task_id).await? {
            TaskPoll::Found(snapshot) => snapshot,
            TaskPoll::Expired => {
                return Err(CliError::Task(format!("task {} disappeared", task_id)).into())
            }
        };

        let line = formatter.progress_line(&snapshot);
        if line != last_line {
            eprintln!("{}", line);
            last_line = line;
        }
        if snapshot.status.is_terminal() {
            return Ok(snapshot);
        }
        tokio::time::sleep(interval).await;
    }
}

/// Read plain-text papers; the file stem is the id, the first non-empty
/// line the title.
pub fn read_documents(paths: &[PathBuf]) -> anyhow::Result<Vec<Document>> {
    paths.iter().map(|path| read_document(path)).collect()
}

fn read_document(path: &Path) -> anyhow::Result<Document> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let id = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|stem| !stem.is_empty())
        .ok_or_else(|| CliError::InvalidInput(format!("{} has no file name", path.display())))?;
    let title = text
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(|line| truncate_chars(line, MAX_TITLE_CHARS).to_string())
        .unwrap_or_else(|| id.clone());

    info!("Loaded document {} ({} chars)", id, text.chars().count());
    Ok(Document::new(id, title, text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_documents_uses_stem_and_first_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("smith2021.txt");
        fs::write(&path, "\n  Sleep and Memory  \nBody text.").unwrap();

        let documents = read_documents(&[path]).unwrap();
        assert_eq!(documents[0].id, "smith2021");
        assert_eq!(documents[0].title, "Sleep and Memory");
        assert!(documents[0].text.contains("Body text."));
    }

    #[test]
    fn test_missing_file_names_the_path() {
        let err = read_documents(&[PathBuf::from("/nonexistent/paper.txt")]).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/paper.txt"));
    }

    #[test]
    fn test_empty_file_titled_by_id() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blank.txt");
        fs::write(&path, "").unwrap();

        let documents = read_documents(&[path]).unwrap();
        assert_eq!(documents[0].title, "blank");
        assert!(!documents[0].is_usable());
    }
}
