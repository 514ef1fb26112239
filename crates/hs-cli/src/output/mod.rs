//! Output formatting utilities for the CLI
//!
//! Functions for rendering user records and diagnostics as terminal output,
//! and for printing colored status lines.

use tabled::{settings::Style, Table, Tabled};

use hs_core::time::elapsed_secs;
use hs_core::UserRecord;

/// Format a user record as a two-column table
///
/// Shows identity, role, profile and provenance. The password hash is
/// never included.
pub fn format_user(user: &UserRecord) -> String {
    #[derive(Tabled)]
    struct FieldRow {
        #[tabled(rename = "FIELD")]
        field: &'static str,
        #[tabled(rename = "VALUE")]
        value: String,
    }

    let provenance = user.provenance();
    let rows = vec![
        FieldRow {
            field: "ID",
            value: user.id.to_string(),
        },
        FieldRow {
            field: "LOGIN",
            value: user.login.clone(),
        },
        FieldRow {
            field: "ROLE",
            value: user.role.to_string(),
        },
        FieldRow {
            field: "DISPLAY NAME",
            value: or_dash(&user.profile.display_name),
        },
        FieldRow {
            field: "EMAIL",
            value: user.email.clone(),
        },
        FieldRow {
            field: "REGISTERED",
            value: format_timestamp(user.registered_at),
        },
        FieldRow {
            field: "SSO USER",
            value: if provenance.sso_user { "yes" } else { "no" }.to_string(),
        },
        FieldRow {
            field: "SSO CREATED",
            value: provenance
                .created_at
                .map(format_timestamp)
                .unwrap_or_else(|| "-".to_string()),
        },
    ];

    Table::new(rows).with(Style::rounded()).to_string()
}

/// Format a Unix timestamp with its age
pub fn format_timestamp(secs: u64) -> String {
    format!("{} ({} ago)", secs, format_duration(elapsed_secs(secs)))
}

/// Format duration in human-readable form
fn format_duration(secs: u64) -> String {
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        let mins = secs / 60;
        let remaining_secs = secs % 60;
        format!("{}m {}s", mins, remaining_secs)
    } else if secs < 86400 {
        let hours = secs / 3600;
        let remaining_mins = (secs % 3600) / 60;
        format!("{}h {}m", hours, remaining_mins)
    } else {
        let days = secs / 86400;
        let remaining_hours = (secs % 86400) / 3600;
        format!("{}d {}h", days, remaining_hours)
    }
}

fn or_dash(s: &str) -> String {
    if s.is_empty() {
        "-".to_string()
    } else {
        s.to_string()
    }
}

/// Print a success message in green with a checkmark prefix
pub fn print_success(msg: &str) {
    use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};

    let mut stdout = std::io::stdout();
    let _ = crossterm::execute!(
        stdout,
        SetForegroundColor(Color::Green),
        Print("✓ "),
        ResetColor,
        Print(msg),
        Print("\n")
    );
}

/// Print an error message in red with an X prefix
///
/// Outputs to stderr.
pub fn print_error(msg: &str) {
    use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};

    let mut stderr = std::io::stderr();
    let _ = crossterm::execute!(
        stderr,
        SetForegroundColor(Color::Red),
        Print("✗ "),
        ResetColor,
        Print(msg),
        Print("\n")
    );
}

/// Print a warning message in yellow with a warning symbol prefix
///
/// Outputs to stderr.
pub fn print_warning(msg: &str) {
    use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};

    let mut stderr = std::io::stderr();
    let _ = crossterm::execute!(
        stderr,
        SetForegroundColor(Color::Yellow),
        Print("⚠ "),
        ResetColor,
        Print(msg),
        Print("\n")
    );
}

/// Print an informational message in cyan with an info symbol prefix
pub fn print_info(msg: &str) {
    use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};

    let mut stdout = std::io::stdout();
    let _ = crossterm::execute!(
        stdout,
        SetForegroundColor(Color::Cyan),
        Print("ℹ "),
        ResetColor,
        Print(msg),
        Print("\n")
    );
}

/// Print a section heading
pub fn print_heading(title: &str) {
    println!("\n== {} ==", title);
}
