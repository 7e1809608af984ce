use anyhow::{Context, Result};
use clap::ValueEnum;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::config::{Settings, FILE_DATETIME_FORMAT};
use crate::parsers::Mode;
use crate::results::ResultTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    /// Bordered console table
    Pretty,
    /// CSV file in the results directory
    File,
    /// JSON array of rows on stdout
    Json,
}

/// Hand `table` to the selected renderer. Without a mode, rows are printed space-separated.
pub fn control_output(
    table: &ResultTable,
    output: Option<OutputMode>,
    mode: Mode,
    settings: &Settings,
) -> Result<()> {
    match output {
        Some(OutputMode::Pretty) => print!("{}", pretty_table(table)),
        Some(OutputMode::File) => {
            file_output(table, mode, &settings.results_dir())?;
        }
        Some(OutputMode::Json) => println!("{}", json_output(table)?),
        None => print!("{}", plain_lines(table)),
    }
    Ok(())
}

pub fn plain_lines(table: &ResultTable) -> String {
    table
        .rows()
        .iter()
        .map(|row| format!("{}\n", row.join(" ")))
        .collect()
}

pub fn pretty_table(table: &ResultTable) -> String {
    let columns = table.rows().iter().map(Vec::len).max().unwrap_or(0);
    let mut widths = vec![0; columns];
    for row in table.rows() {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let border: String = widths
        .iter()
        .map(|w| format!("+{}", "-".repeat(w + 2)))
        .collect::<String>()
        + "+\n";

    let line = |row: &[String]| -> String {
        let mut out = String::new();
        for (i, width) in widths.iter().enumerate() {
            let cell = row.get(i).map(String::as_str).unwrap_or("");
            let pad = width - cell.chars().count();
            out.push_str(&format!("| {}{} ", cell, " ".repeat(pad)));
        }
        out.push_str("|\n");
        out
    };

    let mut out = border.clone();
    out.push_str(&line(table.header()));
    out.push_str(&border);
    for row in table.records() {
        out.push_str(&line(row.as_slice()));
    }
    if !table.is_empty() {
        out.push_str(&border);
    }
    out
}

fn needs_quotes(field: &str) -> bool {
    field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r')
}

/// Write a single CSV row to any writer.
pub fn write_row<W: Write>(mut w: W, row: &[String]) -> io::Result<()> {
    let mut first = true;
    for cell in row {
        if !first {
            write!(w, ",")?;
        } else {
            first = false;
        }
        if needs_quotes(cell) {
            write!(w, "\"{}\"", cell.replace('"', "\"\""))?;
        } else {
            write!(w, "{}", cell)?;
        }
    }
    writeln!(w)
}

pub fn to_csv(table: &ResultTable) -> io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    for row in table.rows() {
        write_row(&mut buf, row)?;
    }
    Ok(buf)
}

pub fn json_output(table: &ResultTable) -> Result<String> {
    serde_json::to_string_pretty(table.rows()).context("Failed to serialize results")
}

/// Save `table` as `<dir>/<mode>_<timestamp>.csv`.
pub fn file_output(table: &ResultTable, mode: Mode, dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create results directory {}", dir.display()))?;

    let timestamp = chrono::Local::now().format(FILE_DATETIME_FORMAT);
    let path = dir.join(format!("{}_{}.csv", mode.name(), timestamp));
    std::fs::write(&path, to_csv(table)?)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    log::info!("Results file saved: {}", path.display());
    Ok(path)
}
