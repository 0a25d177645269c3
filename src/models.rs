use std::fmt;

/// One roster row after parsing. Only lives for a single evaluation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentRecord {
    pub student: Option<String>,
    pub absences: u32,
    pub grades: [i32; 3],
}

impl StudentRecord {
    pub fn average(&self) -> f64 {
        let total: i64 = self.grades.iter().map(|grade| i64::from(*grade)).sum();
        total as f64 / 3.0
    }

    pub fn display_name(&self, position: usize) -> String {
        match &self.student {
            Some(name) => name.clone(),
            None => format!("row {}", position + 1),
        }
    }
}

/// Course-wide settings read from the sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CourseConfig {
    pub total_classes: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Aprovado,
    ExameFinal,
    ReprovadoPorNota,
    ReprovadoPorFalta,
}

impl Status {
    pub const ALL: [Status; 4] = [
        Status::Aprovado,
        Status::ExameFinal,
        Status::ReprovadoPorNota,
        Status::ReprovadoPorFalta,
    ];

    /// Label written into the status column of the sheet.
    pub fn label(self) -> &'static str {
        match self {
            Status::Aprovado => "Aprovado",
            Status::ExameFinal => "Exame Final",
            Status::ReprovadoPorNota => "Reprovado por Nota",
            Status::ReprovadoPorFalta => "Reprovado por Falta",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub status: Status,
    pub final_exam_score: i64,
}

impl Outcome {
    pub fn without_exam(status: Status) -> Self {
        Self {
            status,
            final_exam_score: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct StatusSummary {
    pub status: Status,
    pub count: usize,
}
