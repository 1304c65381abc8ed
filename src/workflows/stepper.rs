use super::state::WorkflowState;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Completed,
    Current,
    Pending,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Step {
    pub state: WorkflowState,
    pub status: StepStatus,
}

/// Derive the progress stepper from the server's ordered state list.
///
/// Entries before the current state are completed, the current state is
/// current, and the rest are pending. A current state missing from the list
/// leaves every entry pending.
pub fn compute_steps(states: &[WorkflowState], current: &WorkflowState) -> Vec<Step> {
    let current_index = states.iter().position(|state| state == current);

    states
        .iter()
        .enumerate()
        .map(|(index, state)| {
            let status = match current_index {
                Some(current_index) if index < current_index => StepStatus::Completed,
                Some(current_index) if index == current_index => StepStatus::Current,
                _ => StepStatus::Pending,
            };
            Step {
                state: state.clone(),
                status,
            }
        })
        .collect()
}

pub fn render_steps(steps: &[Step]) -> String {
    steps
        .iter()
        .enumerate()
        .map(|(index, step)| {
            let marker = match step.status {
                StepStatus::Completed => "✅",
                StepStatus::Current => "▶️ ",
                StepStatus::Pending => "⏳",
            };
            format!("  {marker} {}. {}", index + 1, step.state)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
