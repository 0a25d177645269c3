use std::fmt::Write;

use chrono::{DateTime, Utc};

use crate::grading;
use crate::models::{CourseConfig, Outcome, Status, StatusSummary, StudentRecord};

pub fn summarize_by_status(outcomes: &[Outcome]) -> Vec<StatusSummary> {
    let mut summaries: Vec<StatusSummary> = Status::ALL
        .iter()
        .map(|status| StatusSummary {
            status: *status,
            count: outcomes
                .iter()
                .filter(|outcome| outcome.status == *status)
                .count(),
        })
        .filter(|summary| summary.count > 0)
        .collect();

    summaries.sort_by(|a, b| b.count.cmp(&a.count));
    summaries
}

pub fn build_report(
    sheet_label: &str,
    generated_at: DateTime<Utc>,
    course: CourseConfig,
    records: &[StudentRecord],
    outcomes: &[Outcome],
) -> String {
    let summaries = summarize_by_status(outcomes);
    let limit = grading::absence_limit(course.total_classes);

    let mut output = String::new();

    let _ = writeln!(output, "# Class Outcome Report");
    let _ = writeln!(
        output,
        "Generated for {} on {} ({} students, {} classes, absence limit {:.2})",
        sheet_label,
        generated_at.format("%Y-%m-%d %H:%M UTC"),
        records.len(),
        course.total_classes,
        limit
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Outcome Mix");

    if summaries.is_empty() {
        let _ = writeln!(output, "No students on the roster.");
    } else {
        for summary in summaries.iter() {
            let _ = writeln!(output, "- {}: {} students", summary.status, summary.count);
        }
    }

    let mut exams: Vec<(String, &StudentRecord, &Outcome)> = records
        .iter()
        .zip(outcomes)
        .enumerate()
        .filter(|(_, (_, outcome))| outcome.status == Status::ExameFinal)
        .map(|(position, (record, outcome))| (record.display_name(position), record, outcome))
        .collect();
    exams.sort_by(|a, b| b.2.final_exam_score.cmp(&a.2.final_exam_score));

    let _ = writeln!(output);
    let _ = writeln!(output, "## Final Exam Candidates");

    if exams.is_empty() {
        let _ = writeln!(output, "No students need the final exam.");
    } else {
        for (name, record, outcome) in exams.iter() {
            let _ = writeln!(
                output,
                "- {} (average {:.2}) needs {} on the final exam",
                name,
                record.average(),
                outcome.final_exam_score
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Attendance Failures");

    let mut any_failures = false;
    for (position, (record, outcome)) in records.iter().zip(outcomes).enumerate() {
        if outcome.status != Status::ReprovadoPorFalta {
            continue;
        }
        any_failures = true;
        let _ = writeln!(
            output,
            "- {}: {} absences (limit {:.2})",
            record.display_name(position),
            record.absences,
            limit
        );
    }

    if !any_failures {
        let _ = writeln!(output, "No attendance failures.");
    }

    output
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn record(name: &str, absences: u32, grades: [i32; 3]) -> StudentRecord {
        StudentRecord {
            student: Some(name.to_string()),
            absences,
            grades,
        }
    }

    #[test]
    fn summary_counts_each_status() {
        let outcomes = vec![
            Outcome::without_exam(Status::Aprovado),
            Outcome::without_exam(Status::Aprovado),
            Outcome {
                status: Status::ExameFinal,
                final_exam_score: 35,
            },
        ];
        let summaries = summarize_by_status(&outcomes);
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].status, Status::Aprovado);
        assert_eq!(summaries[0].count, 2);
        assert_eq!(summaries[1].count, 1);
    }

    #[test]
    fn report_lists_exams_and_attendance_failures() {
        let course = CourseConfig { total_classes: 40 };
        let records = vec![
            record("Ana", 0, [80, 80, 80]),
            record("Bia", 12, [90, 90, 90]),
            record("Caio", 0, [60, 60, 60]),
            record("Duda", 0, [50, 50, 50]),
        ];
        let outcomes = grading::evaluate(&records, course);
        let generated_at = Utc.with_ymd_and_hms(2026, 3, 2, 14, 30, 0).unwrap();

        let report = build_report("turma!B4:F27", generated_at, course, &records, &outcomes);

        assert!(report.contains("Generated for turma!B4:F27 on 2026-03-02 14:30 UTC"));
        assert!(report.contains("- Exame Final: 2 students"));
        assert!(report.contains("- Duda (average 50.00) needs 50 on the final exam"));
        assert!(report.contains("- Bia: 12 absences (limit 10.00)"));
        let duda = report.find("Duda").unwrap();
        let caio = report.find("Caio").unwrap();
        assert!(duda < caio);
    }

    #[test]
    fn report_handles_empty_roster() {
        let generated_at = Utc.with_ymd_and_hms(2026, 3, 2, 0, 0, 0).unwrap();
        let report = build_report("turma", generated_at, CourseConfig { total_classes: 40 }, &[], &[]);
        assert!(report.contains("No students on the roster."));
        assert!(report.contains("No students need the final exam."));
        assert!(report.contains("No attendance failures."));
    }
}
