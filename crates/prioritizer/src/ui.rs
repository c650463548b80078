//! Terminal UI helpers for ranked task display.
//!
//! This module uses println! for CLI output, which is appropriate
//! for terminal user interfaces.

#![allow(clippy::disallowed_macros)]

use colored::Colorize;
use comfy_table::{Cell, Color, ContentArrangement, Table};

use crate::entities::{ScoredTask, ScoringConfig};

/// Colour band for a priority score
pub fn score_color(score: f64) -> Color {
    if score >= 30.0 {
        Color::Red
    } else if score >= 20.0 {
        Color::Yellow
    } else if score >= 10.0 {
        Color::White
    } else {
        Color::DarkGrey
    }
}

/// Create a table for displaying a ranked list
pub fn ranked_table(tasks: &[ScoredTask]) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("#").fg(Color::Cyan),
        Cell::new("Title").fg(Color::Cyan),
        Cell::new("Due").fg(Color::Cyan),
        Cell::new("Hours").fg(Color::Cyan),
        Cell::new("Imp").fg(Color::Cyan),
        Cell::new("Score").fg(Color::Cyan),
        Cell::new("Why").fg(Color::Cyan),
    ]);

    for (rank, task) in tasks.iter().enumerate() {
        let title = if task.circular {
            format!("{} ↻", task.title)
        } else {
            task.title.clone()
        };

        table.add_row(vec![
            Cell::new(rank + 1),
            Cell::new(title),
            Cell::new(task.due_date.format("%Y-%m-%d")),
            Cell::new(task.estimated_hours),
            Cell::new(task.importance),
            Cell::new(format!("{:.2}", task.score)).fg(score_color(task.score)),
            Cell::new(&task.explanation),
        ]);
    }

    table
}

/// Print a ranked list followed by any cycle warnings
pub fn display_ranked(tasks: &[ScoredTask]) {
    println!("{}", ranked_table(tasks));

    let mut seen = Vec::new();
    for task in tasks {
        if let Some(message) = &task.circular_message {
            if !seen.contains(message) {
                print_warning(message);
                seen.push(message.clone());
            }
        }
    }
}

/// Display the effective scoring configuration
pub fn display_scoring_config(config: &ScoringConfig) {
    println!("{}", "Scoring configuration".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("  {}: {} days", "Urgency horizon".bold(), config.urgency_horizon_days);
    println!("  {}: {} days", "Due soon window".bold(), config.due_soon_days);
    println!("  {}: {}", "Per-dependent increment".bold(), config.dependent_increment);
    println!(
        "  {}: >= {} / <= {}",
        "Importance bands".bold(),
        config.high_importance,
        config.low_importance
    );
    println!("  {}: >= {}", "Quick win effort".bold(), config.quick_win_effort);
    println!("  {}: {}", "Default importance".bold(), config.default_importance);
    println!("  {}: {}", "Suggest limit".bold(), config.suggest_limit);
    println!("  {}: {}", "Holidays".bold(), config.holidays.join(", "));
}

/// Print success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Print error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Print info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Print warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_bands() {
        assert_eq!(score_color(35.0), Color::Red);
        assert_eq!(score_color(20.0), Color::Yellow);
        assert_eq!(score_color(12.5), Color::White);
        assert_eq!(score_color(0.0), Color::DarkGrey);
    }

    #[test]
    fn test_ranked_table_rows() {
        let table = ranked_table(&[]);
        assert_eq!(table.row_iter().count(), 0);
    }
}
