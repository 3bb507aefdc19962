use crate::output::OutputWriter;
use serde::Serialize;

/// Pipeline step `index` would run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    GenerateEmbeddings,
    CreateIndex,
    UpsertDocuments,
    RefreshIndex,
}

impl ActionType {
    fn label(&self) -> &'static str {
        match self {
            ActionType::GenerateEmbeddings => "embed",
            ActionType::CreateIndex => "create index",
            ActionType::UpsertDocuments => "upsert",
            ActionType::RefreshIndex => "refresh",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PlannedAction {
    pub action_type: ActionType,
    pub description: String,
    pub details: Vec<String>,
}

impl PlannedAction {
    pub fn new(action_type: ActionType, description: impl Into<String>) -> Self {
        Self { action_type, description: description.into(), details: Vec::new() }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.details.push(detail.into());
        self
    }
}

/// What `index --dry-run` reports instead of touching the backend
#[derive(Debug, Serialize)]
pub struct DryRunPlan {
    pub dry_run: bool,
    pub index: String,
    pub rows: usize,
    pub planned_actions: Vec<PlannedAction>,
}

impl DryRunPlan {
    pub fn new(index: impl Into<String>, rows: usize, planned_actions: Vec<PlannedAction>) -> Self {
        Self { dry_run: true, index: index.into(), rows, planned_actions }
    }

    pub fn display(&self, output: &OutputWriter) -> anyhow::Result<()> {
        if output.is_json() {
            return output.result(self);
        }

        output.section(format!("Dry run: {} rows into '{}'", self.rows, self.index));
        for (step, action) in self.planned_actions.iter().enumerate() {
            output.info(format!("[{}] {:<12} {}", step + 1, action.action_type.label(), action.description));
            for detail in &action.details {
                output.info(format!("      {}", detail));
            }
        }
        output.info("Nothing was embedded or written; drop --dry-run to index.");
        Ok(())
    }
}
