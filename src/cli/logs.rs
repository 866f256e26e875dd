use super::ui;
use crate::core::diagnostics::{EntryKind, LogEntry};
use comfy_table::Cell;

pub fn display_entries(entries: &[LogEntry]) {
    if entries.is_empty() {
        println!("No diagnostic entries recorded.");
        return;
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Time"),
        ui::header_cell("Kind"),
        ui::header_cell("Message"),
    ]);
    for entry in entries {
        let style = match entry.kind {
            EntryKind::ApiError | EntryKind::GlobalError => ui::StyleType::Error,
            EntryKind::Warning => ui::StyleType::Warning,
            EntryKind::Success => ui::StyleType::Success,
            EntryKind::Info => ui::StyleType::Subtle,
        };
        table.add_row(vec![
            Cell::new(entry.timestamp.format("%Y-%m-%d %H:%M:%S").to_string()),
            Cell::new(ui::style_text(&entry.kind.to_string(), style)),
            Cell::new(&entry.message),
        ]);
    }
    println!("{table}");
    println!(
        "{}",
        ui::style_text(
            &format!("{} entries (most recent last)", entries.len()),
            ui::StyleType::Subtle
        )
    );
}
