use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use ptracker::config::Config;
use ptracker::tracker::{
    format_tracker_error, ActivityQuery, DeliveryOutcome, ProjectClient, StoriesQuery, Story,
    StoryState, StoryType, TrackerClient, TrackerError,
};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Command line client for Tracker projects
#[derive(Parser, Debug)]
#[command(name = "ptracker", version, about, long_about = None)]
struct Args {
    /// Project to operate on
    #[arg(
        short,
        long,
        global = true,
        env = "TRACKER_PROJECT_ID",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    project: Option<u64>,

    /// API token (falls back to the config file)
    #[arg(long, global = true, env = "TRACKER_API_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// API root, for proxies or self-hosted mirrors
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off", global = true)]
    log_level: LogLevel,

    /// Output format for results
    #[arg(short, long, value_enum, default_value = "json", global = true)]
    output: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    #[command(flatten)]
    Project(ProjectCommand),
    /// Persist defaults
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ProjectCommand {
    /// List stories
    Stories {
        #[arg(long)]
        state: Option<StoryState>,
        #[arg(long)]
        label: Option<String>,
        /// Search terms, e.g. owner:JD
        #[arg(long)]
        filter: Vec<String>,
        #[arg(long, default_value_t = 0)]
        limit: u32,
        #[arg(long, default_value_t = 0)]
        offset: u32,
    },
    /// List labels with usage counts
    Labels,
    /// Show the activity of a story
    Activity {
        story_id: u64,
        #[arg(long, default_value_t = 0)]
        limit: u32,
        #[arg(long, default_value_t = 0)]
        offset: u32,
        #[arg(long, default_value_t = 0)]
        since_version: u64,
    },
    /// Deliver a story, optionally leaving a comment
    Deliver {
        story_id: u64,
        #[arg(short, long)]
        comment: Option<String>,
    },
    /// Create a story
    Create {
        name: String,
        #[arg(long = "type")]
        story_type: Option<StoryType>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a story
    DeleteStory { story_id: u64 },
    /// Delete a label from the project
    DeleteLabel { label_id: u64 },
    /// Attach a label to a story
    AddLabel { story_id: u64, label: String },
    /// Detach a label from a story
    RemoveLabel { story_id: u64, label_id: u64 },
    /// Change the type of a story
    SetType { story_id: u64, story_type: StoryType },
    /// Rename a story
    SetName { story_id: u64, name: String },
    /// Move a story back to the icebox
    Unschedule { story_id: u64 },
    /// List project members
    Members,
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Show the effective configuration
    Show,
    SetProject {
        #[arg(value_parser = clap::value_parser!(u64).range(1..))]
        project_id: u64,
    },
    SetToken { token: String },
    SetBaseUrl { base_url: String },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
}

fn setup_logging(level: LogLevel) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let tracing_level = level.to_tracing_level()?;

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Warning: cannot open log file {:?}: {}", log_path, e);
            return None;
        }
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("ptracker started with log level: {:?}", level);
    tracing::info!("Log file: {:?}", log_path);

    Some(guard)
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = ptracker::tracker::auth::get_config_dir() {
        return config_dir.join("ptracker.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".ptracker").join("ptracker.log");
    }
    PathBuf::from("ptracker.log")
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("Command failed: {:?}", err);
            match err.downcast_ref::<TrackerError>() {
                Some(tracker_err) => eprintln!("Error: {}", format_tracker_error(tracker_err)),
                None => eprintln!("Error: {err:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let mut config = Config::load();

    match args.command {
        Command::Config { action } => run_config(&mut config, &action, args.output),
        Command::Project(command) => {
            let project = connect(args.project, args.token, args.base_url, &config)?;
            tracing::info!("Using project: {}", project.id());
            run_command(&project, command, args.output).await
        }
    }
}

/// Resolve credentials (CLI/environment > config) and scope a client
fn connect(
    project: Option<u64>,
    token: Option<String>,
    base_url: Option<String>,
    config: &Config,
) -> Result<ProjectClient> {
    let project_id = project
        .or_else(|| config.effective_project())
        .context("No project configured. Set TRACKER_PROJECT_ID or use --project")?;

    let token = token
        .or_else(|| config.effective_token())
        .context("No API token configured. Set TRACKER_API_TOKEN or use --token")?;

    let base_url = base_url.unwrap_or_else(|| config.effective_base_url());

    let client = TrackerClient::with_base_url(&token, &base_url)
        .context("Failed to create Tracker client")?;

    Ok(client.in_project(project_id))
}

async fn run_command(
    project: &ProjectClient,
    command: ProjectCommand,
    output: OutputFormat,
) -> Result<()> {
    match command {
        ProjectCommand::Stories { state, label, filter, limit, offset } => {
            let query = StoriesQuery {
                state,
                label,
                filter,
                limit,
                offset,
            };
            let (stories, pagination) = project.stories(&query).await?;
            print(&stories, output)?;
            if pagination.total > 0 {
                eprintln!(
                    "Showing {} of {} stories (offset {})",
                    pagination.returned, pagination.total, pagination.offset
                );
            }
        }
        ProjectCommand::Labels => print(&project.labels().await?, output)?,
        ProjectCommand::Activity { story_id, limit, offset, since_version } => {
            let query = ActivityQuery::new()
                .with_limit(limit)
                .with_offset(offset)
                .since_version(since_version);
            print(&project.story_activity(story_id, &query).await?, output)?;
        }
        ProjectCommand::Deliver { story_id, comment: None } => {
            print(&project.deliver_story(story_id).await?, output)?;
        }
        ProjectCommand::Deliver { story_id, comment: Some(comment) } => {
            match project
                .deliver_story_with_comment_outcome(story_id, &comment)
                .await?
            {
                DeliveryOutcome::Commented(story) => print(&story, output)?,
                DeliveryOutcome::CommentFailed { story, error } => {
                    print(&story, output)?;
                    eprintln!(
                        "Story {} was delivered, but the comment was not added.",
                        story_id
                    );
                    return Err(error.into());
                }
            }
        }
        ProjectCommand::Create { name, story_type, description } => {
            let mut story = Story::named(name);
            story.story_type = story_type;
            story.description = description;
            print(&project.create_story(&story).await?, output)?;
        }
        ProjectCommand::DeleteStory { story_id } => {
            project.delete_story(story_id).await?;
            eprintln!("Deleted story {}", story_id);
        }
        ProjectCommand::DeleteLabel { label_id } => {
            project.delete_label(label_id).await?;
            eprintln!("Deleted label {}", label_id);
        }
        ProjectCommand::AddLabel { story_id, label } => {
            print(&project.add_story_label(story_id, &label).await?, output)?;
        }
        ProjectCommand::RemoveLabel { story_id, label_id } => {
            project.remove_story_label(story_id, label_id).await?;
            eprintln!("Removed label {} from story {}", label_id, story_id);
        }
        ProjectCommand::SetType { story_id, story_type } => {
            print(&project.set_story_type(story_id, story_type).await?, output)?;
        }
        ProjectCommand::SetName { story_id, name } => {
            print(&project.set_story_name(story_id, &name).await?, output)?;
        }
        ProjectCommand::Unschedule { story_id } => {
            print(&project.unschedule_story(story_id).await?, output)?;
        }
        ProjectCommand::Members => print(&project.project_memberships().await?, output)?,
    }

    Ok(())
}

fn run_config(config: &mut Config, action: &ConfigAction, output: OutputFormat) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let mut shown = config.clone();
            if shown.api_token.is_some() {
                shown.api_token = Some("********".to_string());
            }
            print(&shown, output)?;
        }
        ConfigAction::SetProject { project_id } => config.set_project(*project_id)?,
        ConfigAction::SetToken { token } => config.set_token(token)?,
        ConfigAction::SetBaseUrl { base_url } => config.set_base_url(base_url)?,
    }
    Ok(())
}

fn print<T: Serialize>(value: &T, output: OutputFormat) -> Result<()> {
    let rendered = match output {
        OutputFormat::Json => serde_json::to_string_pretty(value)?,
        OutputFormat::Yaml => serde_yaml::to_string(value)?,
    };
    println!("{}", rendered.trim_end());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_project_zero_is_rejected() {
        assert!(Args::try_parse_from(["ptracker", "--project", "0", "labels"]).is_err());
        assert!(Args::try_parse_from(["ptracker", "config", "set-project", "0"]).is_err());
    }

    #[test]
    fn test_project_id_is_parsed() {
        let args = Args::try_parse_from(["ptracker", "--project", "99", "labels"]).unwrap();
        assert_eq!(args.project, Some(99));
        assert!(matches!(args.command, Command::Project(ProjectCommand::Labels)));

        let args = Args::try_parse_from(["ptracker", "config", "set-project", "99"]).unwrap();
        assert!(matches!(
            args.command,
            Command::Config { action: ConfigAction::SetProject { project_id: 99 } }
        ));
    }
}
