use anyhow::Context;

use crate::roster::RosterLayout;

pub const DEFAULT_API_BASE: &str = "https://sheets.googleapis.com/v4";
pub const DEFAULT_SHEET_NAME: &str = "engenharia_de_software";
pub const DEFAULT_ROSTER_RANGE: &str = "B4:F27";
pub const DEFAULT_TOTAL_CLASSES_CELL: &str = "A2";
pub const DEFAULT_OUTPUT_RANGE: &str = "G4:H27";

/// Length of the `Total de aulas no semestre:` label in front of the count.
pub const TOTAL_CLASSES_LABEL_LEN: usize = 27;

/// Where the roster lives and where outcomes are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetConfig {
    pub api_base: String,
    pub spreadsheet_id: String,
    pub sheet_name: String,
    pub roster_range: String,
    pub total_classes_cell: String,
    pub output_range: String,
    pub total_classes_label_len: usize,
    pub layout: RosterLayout,
}

impl SheetConfig {
    pub fn new(spreadsheet_id: impl Into<String>) -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            spreadsheet_id: spreadsheet_id.into(),
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
            roster_range: DEFAULT_ROSTER_RANGE.to_string(),
            total_classes_cell: DEFAULT_TOTAL_CLASSES_CELL.to_string(),
            output_range: DEFAULT_OUTPUT_RANGE.to_string(),
            total_classes_label_len: TOTAL_CLASSES_LABEL_LEN,
            layout: RosterLayout::default(),
        }
    }

    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let spreadsheet_id = lookup("SHEETS_SPREADSHEET_ID")
            .filter(|value| !value.trim().is_empty())
            .context("SHEETS_SPREADSHEET_ID must be set to the roster spreadsheet id")?;

        let mut config = Self::new(spreadsheet_id);
        if let Some(value) = lookup("SHEETS_API_BASE") {
            config.api_base = value.trim_end_matches('/').to_string();
        }
        if let Some(value) = lookup("SHEETS_SHEET_NAME") {
            config.sheet_name = value;
        }
        if let Some(value) = lookup("SHEETS_ROSTER_RANGE") {
            config.roster_range = value;
        }
        if let Some(value) = lookup("SHEETS_TOTAL_CLASSES_CELL") {
            config.total_classes_cell = value;
        }
        if let Some(value) = lookup("SHEETS_OUTPUT_RANGE") {
            config.output_range = value;
        }

        Ok(config)
    }

    pub fn roster_a1(&self) -> String {
        self.qualify(&self.roster_range)
    }

    pub fn total_classes_a1(&self) -> String {
        self.qualify(&self.total_classes_cell)
    }

    pub fn output_a1(&self) -> String {
        self.qualify(&self.output_range)
    }

    fn qualify(&self, range: &str) -> String {
        if range.contains('!') {
            range.to_string()
        } else {
            format!("{}!{}", self.sheet_name, range)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn spreadsheet_id_is_required() {
        let err = SheetConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(err.to_string().contains("SHEETS_SPREADSHEET_ID"));
    }

    #[test]
    fn defaults_are_qualified_with_sheet_name() {
        let config = SheetConfig::from_lookup(lookup_from(&[("SHEETS_SPREADSHEET_ID", "abc")])).unwrap();
        assert_eq!(config.roster_a1(), "engenharia_de_software!B4:F27");
        assert_eq!(config.total_classes_a1(), "engenharia_de_software!A2");
        assert_eq!(config.output_a1(), "engenharia_de_software!G4:H27");
        assert_eq!(config.api_base, DEFAULT_API_BASE);
    }

    #[test]
    fn overrides_apply() {
        let config = SheetConfig::from_lookup(lookup_from(&[
            ("SHEETS_SPREADSHEET_ID", "abc"),
            ("SHEETS_SHEET_NAME", "turma_b"),
            ("SHEETS_OUTPUT_RANGE", "Notas!J4:K30"),
            ("SHEETS_API_BASE", "http://localhost:8080/v4/"),
        ]))
        .unwrap();
        assert_eq!(config.roster_a1(), "turma_b!B4:F27");
        assert_eq!(config.output_a1(), "Notas!J4:K30");
        assert_eq!(config.api_base, "http://localhost:8080/v4");
    }
}
