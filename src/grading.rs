use crate::models::{CourseConfig, Outcome, Status, StudentRecord};

const ABSENCE_RATIO_LIMIT: f64 = 0.25;
const PASSING_AVERAGE: f64 = 70.0;
const EXAM_AVERAGE: f64 = 50.0;
const EXAM_TARGET: f64 = 100.0;

/// Evaluates every record against the course, keeping positional order.
pub fn evaluate(records: &[StudentRecord], course: CourseConfig) -> Vec<Outcome> {
    records
        .iter()
        .map(|record| evaluate_record(record, course))
        .collect()
}

pub fn evaluate_record(record: &StudentRecord, course: CourseConfig) -> Outcome {
    // Attendance is checked before grades.
    if f64::from(record.absences) > absence_limit(course.total_classes) {
        return Outcome::without_exam(Status::ReprovadoPorFalta);
    }

    let average = record.average();
    if average < EXAM_AVERAGE {
        Outcome::without_exam(Status::ReprovadoPorNota)
    } else if average < PASSING_AVERAGE {
        Outcome {
            status: Status::ExameFinal,
            final_exam_score: final_exam_score(average),
        }
    } else {
        Outcome::without_exam(Status::Aprovado)
    }
}

pub fn absence_limit(total_classes: u32) -> f64 {
    ABSENCE_RATIO_LIMIT * f64::from(total_classes)
}

/// Score needed on the final exam. Ties round to even.
pub fn final_exam_score(average: f64) -> i64 {
    (EXAM_TARGET - average).round_ties_even() as i64
}
