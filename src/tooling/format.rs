//! Format install status as text.

use crate::workflow::{ArtifactStatus, StatusReport};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;

/// Section heading with bold/underline.
pub fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

fn mark(ok: bool) -> String {
    if ok {
        format!("{}", "yes".green())
    } else {
        format!("{}", "no".red())
    }
}

fn add_rows(table: &mut Table, entries: &[ArtifactStatus]) {
    for entry in entries {
        let executable = match entry.executable {
            Some(flag) => mark(flag),
            None => "-".to_string(),
        };
        table.add_row(vec![
            entry.name.to_string(),
            entry.path.display().to_string(),
            mark(entry.present),
            executable,
            entry.modified.clone().unwrap_or_else(|| "-".to_string()),
        ]);
    }
}

/// Human-readable status of a workspace.
pub fn format_status_text(report: &StatusReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n\n", format_section_heading("Install Status")));
    out.push_str(&format!("  Workspace: {}\n\n", report.workspace.display()));

    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Artifact", "Path", "Present", "Executable", "Modified"]);
    add_rows(&mut table, &report.artifacts);
    add_rows(&mut table, &report.library_dirs);
    out.push_str(&format!("{}\n\n", table));

    out.push_str(&format!("{}\n\n", format_section_heading("Engine directory")));
    if report.engine_dir_problems.is_empty() {
        out.push_str("  One binary, one config, one model\n");
    } else {
        for problem in &report.engine_dir_problems {
            out.push_str(&format!("  {}\n", problem));
        }
    }
    out.push('\n');
    if report.is_complete() {
        out.push_str("Ready to run.");
    } else {
        out.push_str("Not installed. Run `ogsbot install` to fetch everything.");
    }
    out
}
