//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use cognito_domain::text::truncate_chars;
use cognito_domain::{SavedHypothesis, SessionSummary, SynthesisOutput, SynthesisSession};
use cognito_tasks::TaskSnapshot;
use colored::*;
use serde_json::json;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Characters of a hypothesis title shown in tables
const TITLE_WIDTH: usize = 70;

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format a task status.
    pub fn task_status(&self, snapshot: &TaskSnapshot) -> Result<String> {
        if self.format == OutputFormat::Json {
            let value = json!({
                "task_id": snapshot.task_id.to_string(),
                "status": snapshot.status,
                "progress": snapshot.progress,
                "current_step": snapshot.current_step,
                "message": snapshot.message,
                "session_id": snapshot.session_id,
                "error": snapshot.error,
                "recovered": snapshot.recovered,
            });
            return Ok(serde_json::to_string_pretty(&value)?);
        }

        let status = match snapshot.status.as_str() {
            "completed" => self.colorize("completed", "green"),
            "failed" => self.colorize("failed", "red"),
            other => self.colorize(other, "yellow"),
        };
        let mut lines = vec![
            format!("Task:     {}", snapshot.task_id),
            format!("Status:   {}", status),
            format!(
                "Progress: {:.0}% ({})",
                snapshot.progress * 100.0,
                snapshot.current_step
            ),
            format!("Message:  {}", snapshot.message),
            format!("Session:  {}", snapshot.session_id),
        ];
        if snapshot.recovered {
            lines.push(self.info("Recovered from the session store"));
        }
        Ok(lines.join("\n"))
    }

    /// One-line progress update while waiting.
    pub fn progress_line(&self, snapshot: &TaskSnapshot) -> String {
        format!(
            "[{:>3.0}%] {}: {}",
            snapshot.progress * 100.0,
            self.colorize(&snapshot.current_step, "cyan"),
            snapshot.message
        )
    }

    /// Format a synthesis result.
    pub fn synthesis_output(&self, output: &SynthesisOutput) -> Result<String> {
        if self.format == OutputFormat::Json {
            return Ok(serde_json::to_string_pretty(output)?);
        }

        if output.hypotheses.is_empty() {
            let mut text = self.colorize("No hypotheses generated.", "yellow");
            self.append_degradations(&mut text, output);
            return Ok(text);
        }

        let mut builder = Builder::default();
        builder.push_record(["#", "ID", "Hypothesis", "Confidence", "Status", "Citations"]);
        for (rank, hypothesis) in output.hypotheses.iter().enumerate() {
            let citations = output
                .citations
                .iter()
                .filter(|c| c.hypothesis_id == hypothesis.id)
                .count();
            builder.push_record([
                (rank + 1).to_string(),
                hypothesis.id.clone(),
                truncate_chars(&hypothesis.title, TITLE_WIDTH).to_string(),
                format!("{:.2}", hypothesis.confidence()),
                hypothesis.status.to_string(),
                citations.to_string(),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        let mut text = format!(
            "{}\n{} concepts, {} claims, {} gaps",
            table,
            output.concepts.len(),
            output.claims.len(),
            output.research_gaps.len()
        );
        if !output.agent_messages.is_empty() {
            text.push_str(&format!(
                ", {} agent messages, {} tool calls",
                output.agent_messages.len(),
                output.tool_calls.len()
            ));
        }
        self.append_degradations(&mut text, output);
        Ok(text)
    }

    fn append_degradations(&self, text: &mut String, output: &SynthesisOutput) {
        for note in &output.degradations {
            text.push('\n');
            text.push_str(&self.warning(note));
        }
    }

    /// Format a session listing.
    pub fn sessions(&self, sessions: &[SessionSummary]) -> Result<String> {
        if self.format == OutputFormat::Json {
            return Ok(serde_json::to_string_pretty(sessions)?);
        }
        if sessions.is_empty() {
            return Ok(self.colorize("No sessions found.", "yellow"));
        }

        let mut builder = Builder::default();
        builder.push_record(["Session", "Mode", "Status", "Papers", "Hypotheses", "Top hypothesis"]);
        for session in sessions {
            builder.push_record([
                session.id.clone(),
                session.mode.to_string(),
                session.status.to_string(),
                session.paper_ids.len().to_string(),
                session.hypothesis_count.to_string(),
                session
                    .top_hypothesis
                    .as_deref()
                    .map(|t| truncate_chars(t, TITLE_WIDTH).to_string())
                    .unwrap_or_default(),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        Ok(table.to_string())
    }

    /// Format a user's saved hypotheses.
    pub fn saved_hypotheses(&self, saved: &[SavedHypothesis]) -> Result<String> {
        if self.format == OutputFormat::Json {
            return Ok(serde_json::to_string_pretty(saved)?);
        }
        if saved.is_empty() {
            return Ok(self.colorize("No saved hypotheses.", "yellow"));
        }

        let mut builder = Builder::default();
        builder.push_record(["Session", "ID", "Hypothesis", "Confidence", "Notes"]);
        for entry in saved {
            builder.push_record([
                entry.session_id.clone(),
                entry.hypothesis.id.clone(),
                truncate_chars(&entry.hypothesis.title, TITLE_WIDTH).to_string(),
                format!("{:.2}", entry.hypothesis.confidence()),
                entry.notes.clone(),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        Ok(table.to_string())
    }

    /// Format one session with its result.
    pub fn session(&self, session: &SynthesisSession) -> Result<String> {
        if self.format == OutputFormat::Json {
            return Ok(serde_json::to_string_pretty(session)?);
        }

        let mut text = format!(
            "Session: {}\nMode:    {}\nStatus:  {}\nPapers:  {}",
            session.id,
            session.mode,
            session.status,
            session.paper_ids.join(", ")
        );
        if let Some(focus) = &session.focus_area {
            text.push_str(&format!("\nFocus:   {}", focus));
        }
        if let Some(error) = &session.error {
            text.push('\n');
            text.push_str(&self.error(error));
        }
        if let Some(output) = &session.output {
            text.push('\n');
            text.push_str(&self.synthesis_output(output)?);
        }
        Ok(text)
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}
