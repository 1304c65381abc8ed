pub mod permissions;
pub mod resubmit;
pub mod state;
pub mod stepper;
pub mod view;

pub use permissions::can_edit;
pub use resubmit::{ResubmissionForm, ResubmitPayload};
pub use state::{Action, WorkflowState, DRAFT_STATE};
pub use stepper::{compute_steps, Step, StepStatus};
pub use view::{ActionMenu, ActionPrompt, ApplyOutcome, WorkflowError, WorkflowView};
