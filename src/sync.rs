use anyhow::Context;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::config::SheetConfig;
use crate::grading;
use crate::models::{CourseConfig, Outcome, StudentRecord};
use crate::roster;
use crate::sheets::{TabularService, WriteAck};

/// Roster read from the sheet together with its computed outcomes.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub course: CourseConfig,
    pub records: Vec<StudentRecord>,
    pub outcomes: Vec<Outcome>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    NoData,
    Written { rows: usize, ack: WriteAck },
}

/// Reads the roster and class count and evaluates every student.
/// Returns `None` when the roster range is empty.
pub async fn evaluate_sheet<S>(service: &S, config: &SheetConfig) -> anyhow::Result<Option<Evaluation>>
where
    S: TabularService + ?Sized,
{
    let roster_range = config.roster_a1();
    let rows = service
        .read(&roster_range)
        .await
        .with_context(|| format!("failed to read roster range {roster_range}"))?;

    if rows.is_empty() {
        info!(range = %roster_range, "No data found.");
        return Ok(None);
    }

    let records = roster::parse_records(&rows, config.layout)
        .with_context(|| format!("invalid roster data in {roster_range}"))?;
    let course = read_course(service, config).await?;

    let outcomes = grading::evaluate(&records, course);
    info!(
        students = records.len(),
        total_classes = course.total_classes,
        "evaluated roster"
    );

    Ok(Some(Evaluation {
        course,
        records,
        outcomes,
    }))
}

async fn read_course<S>(service: &S, config: &SheetConfig) -> anyhow::Result<CourseConfig>
where
    S: TabularService + ?Sized,
{
    let cell_range = config.total_classes_a1();
    let rows = service
        .read(&cell_range)
        .await
        .with_context(|| format!("failed to read total classes cell {cell_range}"))?;
    let cell = rows
        .first()
        .and_then(|row| row.first())
        .map(String::as_str)
        .unwrap_or_default();

    roster::parse_total_classes(cell, config.total_classes_label_len)
        .with_context(|| format!("invalid total classes cell {cell_range}"))
}

/// Full pipeline: read, evaluate, overwrite the output range.
pub async fn run_sync<S>(service: &S, config: &SheetConfig) -> anyhow::Result<SyncOutcome>
where
    S: TabularService + ?Sized,
{
    let Some(evaluation) = evaluate_sheet(service, config).await? else {
        return Ok(SyncOutcome::NoData);
    };

    let output_range = config.output_a1();
    let rows = outcome_rows(&evaluation.outcomes);
    let row_count = rows.len();
    let ack = service
        .write(&output_range, rows)
        .await
        .with_context(|| format!("failed to write outcomes to {output_range}"))?;

    if ack.updated_rows != 0 && ack.updated_rows != row_count {
        warn!(
            expected = row_count,
            updated = ack.updated_rows,
            "sheet acknowledged a different row count"
        );
    }
    info!(
        range = %output_range,
        rows = row_count,
        cells = ack.updated_cells,
        "outcomes written"
    );

    Ok(SyncOutcome::Written {
        rows: row_count,
        ack,
    })
}

/// `[status label, final exam score]` per outcome, in roster order.
pub fn outcome_rows(outcomes: &[Outcome]) -> Vec<Vec<Value>> {
    outcomes
        .iter()
        .map(|outcome| vec![json!(outcome.status.label()), json!(outcome.final_exam_score)])
        .collect()
}
