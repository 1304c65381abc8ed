use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;

#[derive(Parser)]
#[command(name = "masar")]
#[command(about = "Submittal workflow client for the Masar document-management backend")]
#[command(long_about = "masar drives construction submittals through their approval workflow: \
                       inspect a document's progress and history, apply the actions the server \
                       offers, and resubmit rejected documents. Start with 'masar show <DOCUMENT>'.")]
pub struct Cli {
    /// Configuration file (defaults to masar.toml / .masar-rc in the working directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in with the configured credentials and show the session user
    Login,
    /// Show the user owning the current session
    Whoami,
    /// Show a document with its progress, available actions and history
    Show {
        /// Document code, e.g. DCS-GEN-036
        name: String,
    },
    /// List the workflow actions available on a document
    Actions {
        name: String,
    },
    /// Apply a workflow action to a document
    Apply {
        name: String,
        /// Action name exactly as offered by the server, e.g. "Approve With Notes"
        action: String,
        /// Notes sent with the action (required for "Approve With Notes")
        #[arg(long)]
        notes: Option<String>,
    },
    /// Show the workflow history of a document
    History {
        name: String,
    },
    /// List every workflow state in order
    States,
    /// Create a re-submittal of a previous document
    Resubmit {
        /// Code of the document being resubmitted
        previous: String,
        /// Description of the new submittal (the only editable field)
        #[arg(long)]
        description: String,
    },
    /// Check whether the session user may edit a document
    CanEdit {
        name: String,
    },
    /// Update fields of a draft document owned by the session user
    Update {
        name: String,
        /// Field assignment, repeatable: --set room=204
        #[arg(long = "set", value_parser = parse_key_val, required = true)]
        fields: Vec<(String, String)>,
    },
    /// List documents with optional filters
    Documents {
        #[arg(long)]
        project: Option<String>,
        /// Mechanical, Civil, Architectural, Electrical, ...
        #[arg(long)]
        discipline: Option<String>,
        /// Exact workflow state
        #[arg(long)]
        state: Option<String>,
        #[arg(long, default_value = "1")]
        page: u32,
        #[arg(long, default_value = "20")]
        page_size: u32,
    },
    /// List projects, or show one project
    Projects {
        #[arg(long)]
        name: Option<String>,
    },
    /// Create a project from field assignments
    CreateProject {
        #[arg(long = "set", value_parser = parse_key_val, required = true)]
        fields: Vec<(String, String)>,
    },
    /// List parties (Consultant, Owner, Contractor), optionally for one project
    Parties {
        #[arg(long)]
        project: Option<String>,
    },
    /// Manage the local configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Write a starter configuration file
    Init {
        #[arg(long, default_value = "masar.toml")]
        path: PathBuf,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn parse_key_val(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got '{raw}'")),
    }
}
