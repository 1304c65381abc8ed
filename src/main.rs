use anyhow::Result;
use clap::Parser;
use tracing::Instrument;

use masar::api::types::DocumentFilters;
use masar::cli::commands::actions::{ActionsCommand, ApplyCommand};
use masar::cli::commands::config::ConfigInitCommand;
use masar::cli::commands::documents::{CanEditCommand, DocumentsCommand, UpdateCommand};
use masar::cli::commands::history::{HistoryCommand, StatesCommand};
use masar::cli::commands::projects::{CreateProjectCommand, PartiesCommand, ProjectsCommand};
use masar::cli::commands::resubmit::ResubmitCommand;
use masar::cli::commands::session::{LoginCommand, WhoamiCommand};
use masar::cli::commands::show::ShowCommand;
use masar::cli::commands::show_how_to_get_started;
use masar::cli::{Cli, Commands, ConfigCommands};
use masar::config::MasarConfig;
use masar::telemetry::{create_command_span, generate_correlation_id, init_telemetry};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let command = match cli.command {
        None => return show_how_to_get_started(),
        // Writing a starter file must work before any configuration exists
        Some(Commands::Config {
            command: ConfigCommands::Init { path, force },
        }) => return ConfigInitCommand { path, force }.execute(),
        Some(command) => command,
    };

    let _ = MasarConfig::load_env_file();
    let config = MasarConfig::load(cli.config.as_deref())?;
    init_telemetry(&config.observability)?;

    // Checked before a runtime or client exists so nothing reaches the network
    if let Commands::Apply { name, action, notes } = &command {
        ApplyCommand {
            name: name.clone(),
            action: action.clone(),
            notes: notes.clone(),
        }
        .validate()?;
    }

    let correlation_id = generate_correlation_id();
    let span = create_command_span(command_name(&command), document_name(&command), &correlation_id);

    tokio::runtime::Runtime::new()?.block_on(run(command, &config).instrument(span))
}

async fn run(command: Commands, config: &MasarConfig) -> Result<()> {
    match command {
        Commands::Login => LoginCommand.execute(config).await,
        Commands::Whoami => WhoamiCommand.execute(config).await,
        Commands::Show { name } => ShowCommand::new(name).execute(config).await,
        Commands::Actions { name } => ActionsCommand { name }.execute(config).await,
        Commands::Apply { name, action, notes } => {
            ApplyCommand { name, action, notes }.execute(config).await
        }
        Commands::History { name } => HistoryCommand { name }.execute(config).await,
        Commands::States => StatesCommand.execute(config).await,
        Commands::Resubmit { previous, description } => {
            ResubmitCommand { previous, description }.execute(config).await
        }
        Commands::CanEdit { name } => CanEditCommand { name }.execute(config).await,
        Commands::Update { name, fields } => UpdateCommand { name, fields }.execute(config).await,
        Commands::Documents {
            project,
            discipline,
            state,
            page,
            page_size,
        } => {
            let filters = DocumentFilters {
                project,
                discipline,
                workflow_state: state,
                page,
                page_size,
            };
            DocumentsCommand { filters }.execute(config).await
        }
        Commands::Projects { name } => ProjectsCommand { name }.execute(config).await,
        Commands::CreateProject { fields } => CreateProjectCommand { fields }.execute(config).await,
        Commands::Parties { project } => PartiesCommand { project }.execute(config).await,
        Commands::Config {
            command: ConfigCommands::Init { path, force },
        } => ConfigInitCommand { path, force }.execute(),
    }
}

fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Login => "login",
        Commands::Whoami => "whoami",
        Commands::Show { .. } => "show",
        Commands::Actions { .. } => "actions",
        Commands::Apply { .. } => "apply",
        Commands::History { .. } => "history",
        Commands::States => "states",
        Commands::Resubmit { .. } => "resubmit",
        Commands::CanEdit { .. } => "can-edit",
        Commands::Update { .. } => "update",
        Commands::Documents { .. } => "documents",
        Commands::Projects { .. } => "projects",
        Commands::CreateProject { .. } => "create-project",
        Commands::Parties { .. } => "parties",
        Commands::Config { .. } => "config",
    }
}

fn document_name(command: &Commands) -> Option<&str> {
    match command {
        Commands::Show { name }
        | Commands::Actions { name }
        | Commands::Apply { name, .. }
        | Commands::History { name }
        | Commands::CanEdit { name }
        | Commands::Update { name, .. } => Some(name),
        Commands::Resubmit { previous, .. } => Some(previous),
        _ => None,
    }
}
