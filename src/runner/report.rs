use std::fmt;
use tracing::warn;

/// One step of the diagnostic sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Endpoint,
    Probe,
    IndexExists,
    CreateIndex,
    IndexDocument(String),
    FetchDocument(String),
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Endpoint => write!(f, "endpoint"),
            Step::Probe => write!(f, "probe"),
            Step::IndexExists => write!(f, "index exists"),
            Step::CreateIndex => write!(f, "create index"),
            Step::IndexDocument(id) => write!(f, "index document {id}"),
            Step::FetchDocument(id) => write!(f, "get document {id}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Succeeded(String),
    Skipped(String),
    Failed(String),
}

impl Outcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }

    fn text(&self) -> &str {
        match self {
            Outcome::Succeeded(text) | Outcome::Skipped(text) | Outcome::Failed(text) => text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome {
    pub step: Step,
    pub outcome: Outcome,
}

impl fmt::Display for StepOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            Outcome::Skipped(text) => write!(f, "{}: skipped, {}", self.step, text),
            outcome => write!(f, "{}: {}", self.step, outcome.text()),
        }
    }
}

/// Ordered outcomes of a diagnostic run
#[derive(Debug, Clone, Default)]
pub struct DiagnosticReport {
    /// Set when the run could not start (binding or client failure)
    pub setup_error: Option<String>,
    pub steps: Vec<StepOutcome>,
}

impl DiagnosticReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn setup_failed(error: impl fmt::Display) -> Self {
        Self {
            setup_error: Some(error.to_string()),
            steps: Vec::new(),
        }
    }

    pub fn succeeded(&mut self, step: Step, message: impl Into<String>) {
        self.push(step, Outcome::Succeeded(message.into()));
    }

    pub fn skipped(&mut self, step: Step, reason: impl Into<String>) {
        self.push(step, Outcome::Skipped(reason.into()));
    }

    pub fn failed(&mut self, step: Step, error: impl fmt::Display) {
        let error = error.to_string();
        warn!(step = %step, error = %error, "Diagnostic step failed");
        self.push(step, Outcome::Failed(error));
    }

    fn push(&mut self, step: Step, outcome: Outcome) {
        self.steps.push(StepOutcome { step, outcome });
    }

    #[cfg(test)]
    pub fn outcome(&self, step: &Step) -> Option<&Outcome> {
        self.steps
            .iter()
            .find(|s| &s.step == step)
            .map(|s| &s.outcome)
    }

    pub fn errors(&self) -> impl Iterator<Item = &StepOutcome> {
        self.steps.iter().filter(|s| s.outcome.is_failure())
    }

    pub fn messages(&self) -> impl Iterator<Item = &StepOutcome> {
        self.steps.iter().filter(|s| !s.outcome.is_failure())
    }

    pub fn failure_count(&self) -> usize {
        self.errors().count()
    }

    /// Plain-text body: setup error, step errors, raw binding variable,
    /// step messages, then the (always empty) values list.
    pub fn render(&self, env_var: &str, raw_binding: Option<&str>) -> String {
        let mut out = String::new();

        out.push_str("binding error = ");
        out.push_str(self.setup_error.as_deref().unwrap_or("none"));
        out.push('\n');

        out.push_str("errors =\n");
        for step in self.errors() {
            out.push_str(&step.to_string());
            out.push('\n');
        }

        out.push_str(&format!("env {env_var}: {}\n", raw_binding.unwrap_or("")));

        out.push_str("messages =\n");
        for step in self.messages() {
            out.push_str(&step.to_string());
            out.push('\n');
        }

        let values: Vec<i64> = Vec::new();
        out.push_str(&format!("values = {values:?}"));
        out
    }
}
