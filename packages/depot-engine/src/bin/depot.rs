//! Depot CLI
//!
//! # Usage
//!
//! ```bash
//! # Validate a repository configuration (members resolve, no cycles)
//! depot validate --config depot.yaml
//!
//! # Flattened members of a group
//! depot members --config depot.yaml --storage storage0 --repository public --traverse
//!
//! # Is an artifact present anywhere below a group?
//! depot exists --config depot.yaml --root /var/depot --storage storage0 \
//!     --repository public --path org/example/a/1.0/a-1.0.jar
//!
//! # Probe a remote like the status checker does
//! depot check-remote --url https://repo.maven.apache.org/maven2/
//! ```

use clap::{Parser, Subcommand};
use depot_engine::features::proxy::HttpRemoteResolver;
use depot_engine::{DepotEngine, EngineConfig, RemoteRepositoryStatusChecker, RemoteRepositoryStatusRegistry};
use depot_storage::infrastructure::FsRepositoryFiles;
use depot_storage::{Configuration, ConfigurationManager, RepositoryPath};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "depot")]
#[command(about = "Group/proxy repository resolution tools", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load and validate a repository configuration
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },

    /// List the members of a group repository
    Members {
        #[arg(short, long)]
        config: PathBuf,

        #[arg(short, long)]
        storage: String,

        #[arg(short, long)]
        repository: String,

        /// Expand nested groups down to their leaves
        #[arg(long)]
        traverse: bool,
    },

    /// Check whether an artifact exists in a repository's subtree
    Exists {
        #[arg(short, long)]
        config: PathBuf,

        /// Storage root directory
        #[arg(long)]
        root: PathBuf,

        #[arg(short, long)]
        storage: String,

        #[arg(short, long)]
        repository: String,

        /// Layout-relative artifact path
        #[arg(short, long)]
        path: String,
    },

    /// Probe a remote URL with the configured retry policy
    CheckRemote {
        #[arg(short, long)]
        url: String,

        /// Engine settings (defaults when omitted)
        #[arg(long)]
        engine_config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { config } => {
            let configuration = Configuration::from_yaml_file(&config)?;
            println!(
                "{}: {} storages, {} repositories, {} routing rules",
                config.display(),
                configuration.storages().count(),
                configuration.repositories().count(),
                configuration.routing_rules().len()
            );
        }
        Commands::Members {
            config,
            storage,
            repository,
            traverse,
        } => {
            let engine = load_engine(&config, PathBuf::from("."))?;
            let group = engine.configuration.snapshot().repository(&storage, &repository)?.clone();
            for member in engine.collector.collect(&group, traverse)? {
                println!("{}\t{}", member.key(), member.repository_type);
            }
        }
        Commands::Exists {
            config,
            root,
            storage,
            repository,
            path,
        } => {
            let engine = load_engine(&config, root)?;
            let target = engine.configuration.snapshot().repository(&storage, &repository)?.clone();
            let found = if target.is_group() {
                engine.existence.artifact_exists_in_group_subtree(&target, &path)?
            } else {
                let layout = engine.layouts.for_repository(&target)?;
                layout.artifact_exists(engine.files.as_ref(), &RepositoryPath::of(&target, &path))?
            };
            println!("{}", if found { "found" } else { "not found" });
            if !found {
                std::process::exit(1);
            }
        }
        Commands::CheckRemote { url, engine_config } => {
            let config = match engine_config {
                Some(path) => EngineConfig::from_yaml(path)?,
                None => EngineConfig::default(),
            };
            let resolver = HttpRemoteResolver::new(&config.remote, Arc::new(FsRepositoryFiles::new(".")))?;
            let checker = RemoteRepositoryStatusChecker::new(
                Arc::new(RemoteRepositoryStatusRegistry::new()),
                Arc::new(resolver),
                config.remote,
            );
            let online = checker.check_remote(&url).await;
            println!("{}\t{}", url, checker.status(&url));
            if !online {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

fn load_engine(config: &Path, root: PathBuf) -> Result<DepotEngine, Box<dyn std::error::Error>> {
    let configuration = Arc::new(ConfigurationManager::load(config)?);
    let files = Arc::new(FsRepositoryFiles::new(root));
    Ok(DepotEngine::new(EngineConfig::default(), configuration, files)?)
}
