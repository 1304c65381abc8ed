// masar - submittal workflow client
// Exposes the API client and workflow views for the CLI and for integration tests

pub mod api;
pub mod cli;
pub mod config;
pub mod http;
pub mod observability;
pub mod telemetry;
pub mod workflows;

// Re-export key types for easy access
pub use api::{ApiError, MasarClient, WorkflowBackend};
pub use config::MasarConfig;
pub use http::RateLimitedHttpClient;
pub use observability::{ApiMetrics, OperationTimer};
pub use telemetry::{generate_correlation_id, init_telemetry};
pub use workflows::{
    can_edit, compute_steps, Action, ActionMenu, ActionPrompt, ResubmissionForm, StepStatus,
    WorkflowError, WorkflowState, WorkflowView,
};
