use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use futures::future::join_all;
use kontent_provider::kontent::ApiKey;
use kontent_provider::resource::RESOURCE_TYPE;
use kontent_provider::{
    provider, Config, KontentClient, Operation, Outcome, ProviderConfig, ResourceData,
};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Manage Kontent content types declaratively
#[derive(Parser, Debug)]
#[command(name = "kontent-provider", version, about, long_about = None)]
struct Args {
    /// Project (environment) to manage
    #[arg(short, long, global = true)]
    project: Option<String>,

    /// Management API key (prefer the KONTENT_API_KEY environment variable)
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Management API endpoint
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Remember --project for later runs
    #[arg(long, global = true)]
    save_project: bool,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    #[command(flatten)]
    Resource(ResourceCommand),
    /// Print the provider schema
    Schema,
}

/// Commands that talk to the management API
#[derive(Subcommand, Debug)]
enum ResourceCommand {
    /// List all content types in the project
    List,
    /// Show the recorded state of one or more content types
    Show {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Create a content type from a YAML declaration
    Create {
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Replace a content type with a YAML declaration
    Update {
        id: String,
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Delete a content type
    Delete { id: String },
    /// Check whether a content type exists
    Exists { id: String },
    /// Adopt an existing content type and print its state
    Import { id: String },
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

fn setup_logging(level: LogLevel) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let Some(tracing_level) = level.to_tracing_level() else {
        return Ok(None);
    };

    let log_path = get_log_path();
    let file = open_log_file(&log_path)?;

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

    tracing::info!("kontent-provider started with log level: {:?}", level);
    tracing::info!("Log file: {:?}", log_path);

    Ok(Some(guard))
}

fn open_log_file(log_path: &Path) -> Result<std::fs::File> {
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory {:?}", parent))?;
    }

    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .with_context(|| format!("Failed to open log file {:?}", log_path))
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("kontent-provider").join("kontent-provider.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".kontent-provider").join("kontent-provider.log");
    }
    PathBuf::from("kontent-provider.log")
}

/// Read a YAML resource declaration (`name`, `codename`, `elements`)
fn load_declaration(path: &Path) -> Result<Map<String, Value>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read declaration {:?}", path))?;
    let value: Value = serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse declaration {:?}", path))?;

    match value {
        Value::Object(map) => Ok(map),
        _ => bail!("Declaration {:?} must be a mapping", path),
    }
}

fn print_yaml<T: serde::Serialize>(value: &T) -> Result<()> {
    print!("{}", serde_yaml::to_string(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level)?;

    let mut file_config = Config::load();
    if args.save_project {
        if let Some(project) = args.project.as_deref() {
            file_config.set_project(project)?;
        }
    }

    let command = match args.command {
        Command::Resource(command) => command,
        Command::Schema => {
            println!("{}", serde_json::to_string_pretty(&provider())?);
            return Ok(());
        }
    };

    let explicit = ProviderConfig {
        api_key: args.api_key.clone().map(ApiKey::new),
        project_id: args.project.clone(),
        base_url: args.base_url.clone(),
    };
    let settings = ProviderConfig::resolve(explicit, &file_config);
    let client = provider().configure(&settings)?;

    let result = run(&client, command).await;
    if let Err(err) = &result {
        tracing::error!("Command failed: {:#}", err);
    }
    result
}

async fn run(client: &KontentClient, command: ResourceCommand) -> Result<()> {
    let provider = provider();

    match command {
        ResourceCommand::List => {
            let types = client.list_content_types().await?;
            print_yaml(&types)?;
        }
        ResourceCommand::Show { ids } => {
            // Independent resources are fetched concurrently
            let reads = ids.iter().map(|id| {
                let provider = &provider;
                async move {
                    let mut d = ResourceData::new();
                    provider
                        .dispatch(RESOURCE_TYPE, Operation::Import(id.clone()), client, &mut d)
                        .await?;
                    provider
                        .dispatch(RESOURCE_TYPE, Operation::Read, client, &mut d)
                        .await?;
                    Ok::<_, anyhow::Error>((id.clone(), d))
                }
            });

            for result in join_all(reads).await {
                let (id, d) = result?;
                if d.id().is_empty() {
                    eprintln!("{}: not found", id);
                } else {
                    print_yaml(&d.to_state())?;
                }
            }
        }
        ResourceCommand::Create { file } => {
            let mut d = ResourceData::from_config(load_declaration(&file)?);
            provider
                .dispatch(RESOURCE_TYPE, Operation::Create, client, &mut d)
                .await?;
            println!("{}", d.id());
        }
        ResourceCommand::Update { id, file } => {
            let mut d = ResourceData::new();
            provider
                .dispatch(RESOURCE_TYPE, Operation::Import(id.clone()), client, &mut d)
                .await?;
            provider
                .dispatch(RESOURCE_TYPE, Operation::Read, client, &mut d)
                .await?;
            if d.id().is_empty() {
                bail!("Content type {} not found", id);
            }

            d.plan_all(load_declaration(&file)?);
            provider
                .dispatch(RESOURCE_TYPE, Operation::Update, client, &mut d)
                .await?;
            println!("{}", d.id());
        }
        ResourceCommand::Delete { id } => {
            let mut d = ResourceData::new();
            d.set_id(id);
            provider
                .dispatch(RESOURCE_TYPE, Operation::Delete, client, &mut d)
                .await?;
        }
        ResourceCommand::Exists { id } => {
            let mut d = ResourceData::new();
            d.set_id(id);
            if let Outcome::Exists(exists) = provider
                .dispatch(RESOURCE_TYPE, Operation::Exists, client, &mut d)
                .await?
            {
                println!("{}", exists);
            }
        }
        ResourceCommand::Import { id } => {
            let mut d = ResourceData::new();
            provider
                .dispatch(RESOURCE_TYPE, Operation::Import(id.clone()), client, &mut d)
                .await?;
            provider
                .dispatch(RESOURCE_TYPE, Operation::Read, client, &mut d)
                .await?;
            if d.id().is_empty() {
                bail!("Content type {} not found", id);
            }
            print_yaml(&d.to_state())?;
        }
    }

    Ok(())
}
