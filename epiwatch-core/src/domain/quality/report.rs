// epiwatch-core/src/domain/quality/report.rs

use serde::{Deserialize, Serialize};

/// Whether a failing rule affects the overall verdict.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Blocking,
    Advisory,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Blocking => "blocking",
            Self::Advisory => "advisory",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ValidationRule {
    pub name: String,
    pub passed: bool,
    pub affected_row_count: usize,
    pub notes: String,
    pub severity: Severity,
}

/// Ordered rule results. `passed` is the AND of every blocking rule.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ValidationReport {
    pub rules: Vec<ValidationRule>,
    pub passed: bool,
}

impl ValidationReport {
    pub fn blocking_failures(&self) -> impl Iterator<Item = &ValidationRule> {
        self.rules
            .iter()
            .filter(|r| r.severity == Severity::Blocking && !r.passed)
    }

    pub fn advisory_failures(&self) -> impl Iterator<Item = &ValidationRule> {
        self.rules
            .iter()
            .filter(|r| r.severity == Severity::Advisory && !r.passed)
    }

    pub fn rule(&self, name: &str) -> Option<&ValidationRule> {
        self.rules.iter().find(|r| r.name == name)
    }
}

/// Accumulates rule outcomes in evaluation order.
#[derive(Debug, Default)]
pub struct RuleCollector {
    rules: Vec<ValidationRule>,
}

impl RuleCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(
        &mut self,
        name: impl Into<String>,
        passed: bool,
        affected_row_count: usize,
        notes: impl Into<String>,
        severity: Severity,
    ) -> &mut Self {
        self.rules.push(ValidationRule {
            name: name.into(),
            passed,
            affected_row_count,
            notes: notes.into(),
            severity,
        });
        self
    }

    pub fn blocking(
        &mut self,
        name: impl Into<String>,
        passed: bool,
        affected_row_count: usize,
        notes: impl Into<String>,
    ) -> &mut Self {
        self.add(name, passed, affected_row_count, notes, Severity::Blocking)
    }

    pub fn advisory(
        &mut self,
        name: impl Into<String>,
        passed: bool,
        affected_row_count: usize,
        notes: impl Into<String>,
    ) -> &mut Self {
        self.add(name, passed, affected_row_count, notes, Severity::Advisory)
    }

    pub fn finish(self) -> ValidationReport {
        let passed = self
            .rules
            .iter()
            .filter(|r| r.severity == Severity::Blocking)
            .all(|r| r.passed);
        ValidationReport {
            rules: self.rules,
            passed,
        }
    }
}
