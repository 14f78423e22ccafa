//! CLI output formatting utilities

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};

use crate::auth::{SessionPhase, SessionState};

/// Print a success message
pub fn success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

/// Print an error message
pub fn error(message: &str) {
    eprintln!("{} {}", "✗".red(), message);
}

/// Print a warning message
pub fn warn(message: &str) {
    println!("{} {}", "⚠".yellow(), message);
}

/// Print an info message
pub fn info(message: &str) {
    println!("{} {}", "ℹ".blue(), message);
}

/// Format a session phase as a colored string
pub fn format_phase(phase: SessionPhase) -> String {
    let text = phase.to_string();
    match phase {
        SessionPhase::Authenticated => text.green().to_string(),
        SessionPhase::Pending => text.yellow().to_string(),
        SessionPhase::Anonymous => text.red().to_string(),
    }
}

/// Print the session as a two-column table
pub fn print_session_table(state: &SessionState, remember_me: bool) {
    let phase_color = match state.phase {
        SessionPhase::Authenticated => Color::Green,
        SessionPhase::Pending => Color::Yellow,
        SessionPhase::Anonymous => Color::Red,
    };

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Field").fg(Color::Cyan),
            Cell::new("Value").fg(Color::Cyan),
        ]);

    table.add_row(vec![
        Cell::new("Phase"),
        Cell::new(state.phase.to_string()).fg(phase_color),
    ]);
    table.add_row(vec![Cell::new("Remember me"), Cell::new(remember_me)]);

    if !state.user.is_anonymous() {
        let user = &state.user;
        table.add_row(vec![Cell::new("User ID"), Cell::new(user.id)]);
        table.add_row(vec![Cell::new("Name"), Cell::new(&user.name)]);
        table.add_row(vec![Cell::new("Avatar"), Cell::new(&user.avatar_url)]);
        if let Some(note) = &user.note {
            table.add_row(vec![Cell::new("Note"), Cell::new(note)]);
        }
        if let Some(intro) = &user.intro {
            table.add_row(vec![Cell::new("Intro"), Cell::new(intro)]);
        }
        if let Some(bg) = &user.background_img {
            table.add_row(vec![Cell::new("Background"), Cell::new(bg)]);
        }
    }

    if let Some(at) = state.authenticated_at {
        table.add_row(vec![
            Cell::new("Confirmed"),
            Cell::new(at.format("%Y-%m-%d %H:%M:%S").to_string()),
        ]);
    }

    println!("{table}");
}
