use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cropscan_application::AppContext;
use cropscan_core::config::RootConfig;
use cropscan_infrastructure::{ConfigService, CropScanPaths};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "cropscan")]
#[command(about = "CropScan AI - plant disease dashboard client", long_about = None)]
struct Cli {
    /// Backend base URL (wins over config.toml and CROPSCAN_API_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    /// Directory holding config.toml and the cached store files
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and remember the token
    Login {
        username: String,
        #[arg(long, env = "CROPSCAN_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account and sign in
    Signup {
        username: String,
        email: String,
        #[arg(long, env = "CROPSCAN_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the token
    Logout,
    /// Show the current session
    Whoami,
    /// Manage the disease catalog
    Diseases {
        #[command(subcommand)]
        action: DiseaseAction,
    },
    /// Browse submitted plant records
    Plants {
        #[command(subcommand)]
        action: PlantAction,
    },
    /// Inspect configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum DiseaseAction {
    /// Fetch and print the catalog
    List {
        #[arg(long)]
        search: Option<String>,
    },
    /// Ask the backend to seed sample diseases
    Populate,
    /// Replace the treatment solution of one disease
    Update { id: i64, solution: String },
    /// Delete one disease
    Delete { id: i64 },
    /// Delete every disease
    Clear,
}

#[derive(Subcommand)]
enum PlantAction {
    /// Fetch and print plant records with their disease names
    List {
        #[arg(long)]
        search: Option<String>,
    },
    /// Summary counts for the dashboard
    Stats,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
}

impl Cli {
    /// Flags win over the file and the environment.
    fn apply_overrides(&self, mut config: RootConfig) -> Result<RootConfig> {
        if let Some(base_url) = &self.base_url {
            config.api.base_url = base_url.clone();
        }
        if let Some(timeout_secs) = self.timeout_secs {
            config.api.timeout_secs = timeout_secs;
        }
        config.api.validate()?;
        Ok(config)
    }
}

fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = CropScanPaths::new(cli.data_dir.as_deref());
    let config_service = ConfigService::new(&paths)?;
    let config = config_service
        .effective_config()
        .with_context(|| format!("Failed to load {}", config_service.path().display()))?;
    let config = cli.apply_overrides(config)?;

    init_tracing(&config.log_level);

    let ctx = AppContext::bootstrap(config, &paths)
        .await
        .context("Failed to start CropScan client")?;
    ctx.auth.initialize_auth().await;

    match cli.command {
        Commands::Login { username, password } => {
            commands::auth::login(&ctx, username, password).await?
        }
        Commands::Signup {
            username,
            email,
            password,
        } => commands::auth::signup(&ctx, username, email, password).await?,
        Commands::Logout => commands::auth::logout(&ctx).await,
        Commands::Whoami => commands::auth::whoami(&ctx).await,
        Commands::Diseases { action } => match action {
            DiseaseAction::List { search } => {
                commands::diseases::list(&ctx, search.as_deref()).await?
            }
            DiseaseAction::Populate => commands::diseases::populate(&ctx).await?,
            DiseaseAction::Update { id, solution } => {
                commands::diseases::update(&ctx, id, &solution).await?
            }
            DiseaseAction::Delete { id } => commands::diseases::delete(&ctx, id).await?,
            DiseaseAction::Clear => commands::diseases::clear(&ctx).await?,
        },
        Commands::Plants { action } => match action {
            PlantAction::List { search } => commands::plants::list(&ctx, search.as_deref()).await?,
            PlantAction::Stats => commands::plants::stats(&ctx).await?,
        },
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::show(&ctx, &config_service)?,
        },
    }

    Ok(())
}
