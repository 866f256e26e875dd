//! Writes calculation reports and the diagnostics log to JSON or CSV files.

use crate::core::diagnostics::LogEntry;
use crate::core::report::CalculationReport;
use anyhow::{Context, Result, bail};
use std::fs;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
            .as_deref()
        {
            Some("json") => Ok(ExportFormat::Json),
            Some("csv") => Ok(ExportFormat::Csv),
            _ => bail!(
                "Unsupported export format for {}. Use a .json or .csv file",
                path.display()
            ),
        }
    }
}

pub fn export_report(report: &CalculationReport, path: &Path) -> Result<()> {
    let contents = match ExportFormat::from_path(path)? {
        ExportFormat::Json => serde_json::to_string_pretty(report)?,
        ExportFormat::Csv => {
            let rows = report
                .rows()
                .into_iter()
                .map(|(section, name, value)| [section.to_string(), name, value]);
            to_csv(["section", "name", "value"], rows)?
        }
    };
    write_file(path, contents)?;

    info!("Exported {} report to {}", report.calculator, path.display());
    Ok(())
}

/// Writes diagnostics entries, oldest first.
pub fn export_logs(entries: &[LogEntry], path: &Path) -> Result<()> {
    let contents = match ExportFormat::from_path(path)? {
        ExportFormat::Json => serde_json::to_string_pretty(entries)?,
        ExportFormat::Csv => {
            let rows = entries.iter().map(|entry| {
                [
                    entry.timestamp.to_rfc3339(),
                    entry.kind.to_string(),
                    entry.message.clone(),
                ]
            });
            to_csv(["timestamp", "kind", "message"], rows)?
        }
    };
    write_file(path, contents)?;

    info!("Exported {} log entries to {}", entries.len(), path.display());
    Ok(())
}

fn write_file(path: &Path, contents: String) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Creating export dir: {}", parent.display()))?;
    }
    fs::write(path, contents).with_context(|| format!("Writing export file: {}", path.display()))
}

fn to_csv(header: [&str; 3], rows: impl Iterator<Item = [String; 3]>) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(header)?;
    for row in rows {
        writer.write_record(&row)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush CSV: {}", e))?;
    Ok(String::from_utf8(bytes)?)
}
