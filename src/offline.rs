use std::io;
use std::path::Path;

use anyhow::Context;
use serde::Serialize;

use crate::models::{Outcome, StudentRecord};

#[derive(Debug, Serialize)]
struct OutcomeRow<'a> {
    student: String,
    status: &'a str,
    final_exam_score: i64,
}

/// Reads a roster export with a `student,absences,grade1,grade2,grade3` header.
pub fn read_roster_csv(path: &Path) -> anyhow::Result<Vec<Vec<String>>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.with_context(|| format!("failed to read {}", path.display()))?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(rows)
}

pub fn write_outcomes_csv<W: io::Write>(
    writer: W,
    records: &[StudentRecord],
    outcomes: &[Outcome],
) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_writer(writer);

    for (position, (record, outcome)) in records.iter().zip(outcomes).enumerate() {
        writer.serialize(OutcomeRow {
            student: record.display_name(position),
            status: outcome.status.label(),
            final_exam_score: outcome.final_exam_score,
        })?;
    }

    writer.flush()?;
    Ok(())
}
