pub mod client;
pub mod documents;
pub mod errors;
pub mod projects;
pub mod types;
pub mod workflow;

pub use client::{MasarClient, WorkflowBackend};
pub use errors::ApiError;
