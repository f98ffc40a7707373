// SPDX-License-Identifier: Apache-2.0

//! Output rendering for CLI commands.
//!
//! Centralizes output formatting, supporting text and JSON formats.
//! Command handlers return data; this module handles presentation.

use std::io::{self, Write};

use anyhow::{Context, Result};
use comfy_table::{Table, presets::UTF8_FULL_CONDENSED};
use console::style;
use serde::Serialize;

use crate::cli::{OutputContext, OutputFormat};
use revq_core::{
    ActionResult, Classification, ConversationThread, PrReviewResult, RateLimitStatus,
    TriagedActions, format_relative_time, truncate,
};

/// Trait for types that can be rendered in multiple output formats.
pub trait Renderable: Serialize {
    /// Render as human-readable text to the given writer.
    fn render_text(&self, w: &mut dyn Write, ctx: &OutputContext) -> io::Result<()>;
}

/// Generic render function - JSON via serde, text via the trait.
pub fn render<T: Renderable>(result: &T, ctx: &OutputContext) -> Result<()> {
    match ctx.format {
        OutputFormat::Json => {
            let json =
                serde_json::to_string_pretty(result).context("Failed to serialize to JSON")?;
            println!("{json}");
        }
        OutputFormat::Text => {
            result
                .render_text(&mut io::stdout(), ctx)
                .context("Failed to render text")?;
        }
    }
    Ok(())
}

impl Renderable for Classification {
    fn render_text(&self, w: &mut dyn Write, _ctx: &OutputContext) -> io::Result<()> {
        writeln!(w, "Actor type: {:?}", self.actor_type)?;
        writeln!(w, "Reason: {}", self.reason)?;
        if let Some(rule) = &self.matched_rule {
            writeln!(w, "Matched rule: {rule}")?;
        }
        Ok(())
    }
}

impl Renderable for TriagedActions {
    fn render_text(&self, w: &mut dyn Write, _ctx: &OutputContext) -> io::Result<()> {
        if self.labels.is_empty() && self.actions.is_empty() && self.assignments.is_empty() {
            writeln!(w, "No actions suggested.")?;
            return Ok(());
        }

        if !self.labels.is_empty() {
            writeln!(w, "Labels: {}", self.labels.join(", "))?;
        }
        if !self.assignments.is_empty() {
            writeln!(w, "Assignments: {}", self.assignments.join(", "))?;
        }
        for action in &self.actions {
            let value = action.value.as_deref().unwrap_or("");
            writeln!(w, "Action: {:?} {}", action.action_type, truncate(value, 60))?;
        }
        Ok(())
    }
}

/// Wrapper for rendering an action result batch.
#[derive(Debug, Serialize)]
pub struct ActionResults(pub Vec<ActionResult>);

impl Renderable for ActionResults {
    fn render_text(&self, w: &mut dyn Write, _ctx: &OutputContext) -> io::Result<()> {
        for result in &self.0 {
            let status = if result.success { "ok" } else { "failed" };
            let detail = result
                .detail
                .as_deref()
                .map(|d| format!(" ({d})"))
                .unwrap_or_default();
            writeln!(
                w,
                "{status}: {:?}{detail}",
                result.action.action_type
            )?;
        }
        let applied = self.0.iter().filter(|r| r.success).count();
        writeln!(w, "{applied}/{} actions applied", self.0.len())?;
        Ok(())
    }
}

/// Wrapper for rendering a thread list.
#[derive(Debug, Serialize)]
pub struct ThreadList(pub Vec<ConversationThread>);

impl Renderable for ThreadList {
    fn render_text(&self, w: &mut dyn Write, ctx: &OutputContext) -> io::Result<()> {
        if self.0.is_empty() {
            writeln!(w, "No conversation threads found.")?;
            return Ok(());
        }

        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            "Location",
            "Comments",
            "Participants",
            "Last activity",
            "Needs response",
        ]);

        for thread in &self.0 {
            let participants: Vec<&str> = thread
                .participants
                .iter()
                .map(|p| p.login.as_str())
                .collect();
            table.add_row(vec![
                format!("{}:{}", thread.path, thread.line),
                thread.total_comments.to_string(),
                truncate(&participants.join(", "), 40),
                format_relative_time(&thread.last_activity),
                if thread.needs_response { "yes" } else { "no" }.to_string(),
            ]);
        }

        writeln!(w, "{table}")?;

        let needing = self.0.iter().filter(|t| t.needs_response).count();
        if needing > 0 && ctx.is_interactive() {
            writeln!(
                w,
                "{}",
                style(format!("{needing} threads need a response")).yellow()
            )?;
        } else {
            writeln!(w, "{needing} threads need a response")?;
        }
        Ok(())
    }
}

impl Renderable for PrReviewResult {
    fn render_text(&self, w: &mut dyn Write, ctx: &OutputContext) -> io::Result<()> {
        let summary = &self.summary;

        let title = format!(
            "PR #{}: {} [{}]",
            summary.pr_number, summary.title, summary.state
        );
        if ctx.is_interactive() {
            writeln!(w, "{}", style(title).bold())?;
        } else {
            writeln!(w, "{title}")?;
        }
        writeln!(w, "Author: {}", summary.author_login)?;
        writeln!(
            w,
            "Reviews: {}  Inline comments: {}  Threads: {}",
            summary.total_reviews, summary.total_inline_comments, summary.conversation_threads
        )?;
        match summary.pending_reviews {
            Some(count) => writeln!(w, "Pending reviews: {count}")?,
            None => writeln!(w, "Pending reviews: unavailable")?,
        }
        if !summary.suggested_labels.is_empty() {
            writeln!(w, "Suggested labels: {}", summary.suggested_labels.join(", "))?;
        }
        writeln!(w, "Status: {:?}", summary.status)?;
        writeln!(w)?;

        if !self.priority_actions.is_empty() {
            writeln!(w, "Suggested actions:")?;
            for action in &self.priority_actions {
                writeln!(w, "  [{:?}] {}", action.priority, action.description)?;
            }
            writeln!(w)?;
        }

        writeln!(w, "Next: {}", summary.next_action)?;
        Ok(())
    }
}

impl Renderable for RateLimitStatus {
    fn render_text(&self, w: &mut dyn Write, _ctx: &OutputContext) -> io::Result<()> {
        writeln!(w, "{}", self.message())?;
        if self.is_low() {
            writeln!(w, "Warning: rate limit is low")?;
        }
        Ok(())
    }
}
