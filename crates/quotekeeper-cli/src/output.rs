use std::io::Write;

use owo_colors::OwoColorize;
use quotekeeper_core::Quote;
use quotekeeper_core::sync::{SyncEvent, SyncOutcome};

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

pub fn print_quote(w: &mut dyn Write, quote: &Quote, color: ColorMode) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "\"{}\"", quote.text.bold())?;
        writeln!(w, "    {} {}", "--".dimmed(), quote.category.cyan())?;
    } else {
        writeln!(w, "\"{}\"", quote.text)?;
        writeln!(w, "    -- {}", quote.category)?;
    }
    Ok(())
}

/// Explicit empty state for a selection with no quotes, shown instead of
/// silently printing nothing.
pub fn print_empty_state(
    w: &mut dyn Write,
    selection: &str,
    color: ColorMode,
) -> std::io::Result<()> {
    let msg = format!("No quotes found in category '{}'.", selection);
    if color.enabled() {
        writeln!(w, "{}", msg.yellow())
    } else {
        writeln!(w, "{}", msg)
    }
}

pub fn print_quote_list(
    w: &mut dyn Write,
    quotes: &[Quote],
    color: ColorMode,
) -> std::io::Result<()> {
    for (i, quote) in quotes.iter().enumerate() {
        if color.enabled() {
            writeln!(
                w,
                "{:>3}. \"{}\" {} {}",
                i + 1,
                quote.text,
                "--".dimmed(),
                quote.category.cyan()
            )?;
        } else {
            writeln!(w, "{:>3}. \"{}\" -- {}", i + 1, quote.text, quote.category)?;
        }
    }
    Ok(())
}

pub fn print_categories(
    w: &mut dyn Write,
    categories: &[String],
    current: &str,
    color: ColorMode,
) -> std::io::Result<()> {
    for cat in categories {
        let marker = if cat == current { "*" } else { " " };
        if color.enabled() && cat == current {
            writeln!(w, "{} {}", marker, cat.green())?;
        } else {
            writeln!(w, "{} {}", marker, cat)?;
        }
    }
    Ok(())
}

pub fn print_outcome(
    w: &mut dyn Write,
    outcome: &SyncOutcome,
    color: ColorMode,
) -> std::io::Result<()> {
    match outcome {
        SyncOutcome::Merged { added: 0 } => {
            if color.enabled() {
                writeln!(w, "{}", "Already up to date.".dimmed())
            } else {
                writeln!(w, "Already up to date.")
            }
        }
        SyncOutcome::Merged { added } => {
            let msg = format!("+{} new quote(s) from the server.", added);
            if color.enabled() {
                writeln!(w, "{}", msg.green())
            } else {
                writeln!(w, "{}", msg)
            }
        }
        SyncOutcome::Replaced { total } => {
            let msg = format!(
                "Replaced local quotes with the server snapshot ({} total).",
                total
            );
            if color.enabled() {
                writeln!(w, "{}", msg.green())
            } else {
                writeln!(w, "{}", msg)
            }
        }
        SyncOutcome::Failed { error } => {
            let msg = format!("Sync failed: {} (tick skipped)", error);
            if color.enabled() {
                writeln!(w, "{}", msg.red())
            } else {
                writeln!(w, "{}", msg)
            }
        }
    }
}

pub fn print_sync_event(
    w: &mut dyn Write,
    event: &SyncEvent,
    color: ColorMode,
) -> std::io::Result<()> {
    match event {
        SyncEvent::Fetching { source } => {
            let msg = format!("syncing with {}...", source);
            if color.enabled() {
                writeln!(w, "{}", msg.dimmed())
            } else {
                writeln!(w, "{}", msg)
            }
        }
        SyncEvent::Finished { outcome, .. } => print_outcome(w, outcome, color),
    }
}
