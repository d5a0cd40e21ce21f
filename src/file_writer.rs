//! File writing utilities for lead export.
//!
//! This module writes a list of leads to a file as plain text call cards, CSV
//! or a JSON array.

use crate::error::Result;
use crate::models::{Lead, OutputFormat};
use csv::Writer;
use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write leads to a file in the specified format.
///
/// # Arguments
///
/// * `leads` - Leads to write, in output order
/// * `format` - Output format (TXT, CSV, or JSON)
/// * `file_path` - Path to the output file; missing parent directories are created
///
/// # Errors
///
/// Returns an error if file creation or writing fails.
pub fn write_leads_to_file(leads: &[&Lead], format: OutputFormat, file_path: &Path) -> Result<()> {
    if let Some(parent) = file_path.parent() {
        if !parent.as_os_str().is_empty() {
            create_dir_all(parent)?;
        }
    }

    match format {
        OutputFormat::Txt => write_txt_file(leads, file_path),
        OutputFormat::Csv => write_csv_file(leads, file_path),
        OutputFormat::Json => write_json_file(leads, file_path),
    }
}

/// Write leads to a text file, one card per lead with a blank line between cards.
fn write_txt_file(leads: &[&Lead], file_path: &Path) -> Result<()> {
    let file = File::create(file_path)?;
    let mut writer = BufWriter::new(file);

    for lead in leads {
        writeln!(writer, "{} [{}]", lead.display_title(), lead.status)?;
        if let Some(city) = &lead.city {
            writeln!(writer, "  City: {city}")?;
        }
        if let Some(phone) = &lead.phone {
            writeln!(writer, "  Phone: {phone}")?;
        }
        if let Some(day) = lead.next_call_date {
            writeln!(writer, "  Call back: {}", day.format("%Y-%m-%d"))?;
        }
        if !lead.notes.is_empty() {
            writeln!(writer, "  Notes: {}", lead.notes)?;
        }
        writeln!(writer)?; // Add blank line between leads
    }

    writer.flush()?;
    Ok(())
}

/// Write leads to a CSV file with a header row.
fn write_csv_file(leads: &[&Lead], file_path: &Path) -> Result<()> {
    let file = File::create(file_path)?;
    let mut writer = Writer::from_writer(file);

    writer.write_record([
        "ID",
        "Title",
        "City",
        "Phone",
        "Website",
        "Rating",
        "Reviews",
        "Status",
        "Last call",
        "Next call",
        "Notes",
    ])?;

    for lead in leads {
        let rating = lead.total_score.map(|s| format!("{s:.1}")).unwrap_or_default();
        let reviews = lead.reviews_count.to_string();
        let last_call = lead.last_call_date.map(|d| d.to_rfc3339()).unwrap_or_default();
        let next_call = lead.next_call_date.map(|d| d.to_string()).unwrap_or_default();

        writer.write_record([
            lead.id.as_str(),
            lead.display_title(),
            lead.city.as_deref().unwrap_or_default(),
            lead.phone.as_deref().unwrap_or_default(),
            lead.website.as_deref().unwrap_or_default(),
            rating.as_str(),
            reviews.as_str(),
            lead.status.as_str(),
            last_call.as_str(),
            next_call.as_str(),
            lead.notes.as_str(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// Write leads to a JSON file as an array of lead records.
fn write_json_file(leads: &[&Lead], file_path: &Path) -> Result<()> {
    let file = File::create(file_path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, leads)?;
    writer.flush()?;
    Ok(())
}
