//! Command line arguments and dispatch.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use client::ClientConfig;
use dashboard::{ApiVersion, Client};
use tracing::debug;

use crate::output::Output;

/// Manage applications and instances on a BigBoat dashboard
#[derive(Debug, Parser)]
#[command(
    name = "bigboat",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Log requests and responses to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args)]
pub struct ConnectionArgs {
    /// Dashboard URL
    #[arg(long, global = true, env = client::ENV_URL)]
    pub url: Option<String>,

    /// Dashboard API generation (v1 or v2)
    #[arg(long, global = true, env = client::ENV_API_VERSION, default_value = "v2")]
    pub api_version: ApiVersion,

    /// API key (v2 only)
    #[arg(long, global = true, env = client::ENV_API_KEY, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true, env = client::ENV_TIMEOUT_SECS, default_value_t = 30)]
    pub timeout: u64,
}

impl ConnectionArgs {
    fn config(&self) -> Result<ClientConfig> {
        let url = self
            .url
            .clone()
            .ok_or_else(|| anyhow!("no dashboard URL; pass --url or set {}", client::ENV_URL))?;
        let mut config = ClientConfig::new(url)
            .with_api_version(self.api_version)
            .with_timeout_secs(self.timeout);
        if let Some(key) = &self.api_key {
            config = config.with_api_key(key.clone());
        }
        Ok(config)
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List application definitions
    Apps,

    /// Show one application definition
    App(AppArgs),

    /// Remove an application definition
    DeleteApp(AppArgs),

    /// List instances
    Instances,

    /// Show one instance
    Instance {
        name: String,
    },

    /// Start an instance of an application
    Start {
        /// Application name
        app: String,
        /// Application version
        #[arg(id = "app_version", value_name = "VERSION")]
        version: String,
        /// Instance name (default: the application name)
        #[arg(long)]
        instance: Option<String>,
    },

    /// Stop an instance
    Stop {
        name: String,
    },

    /// Show dashboard health checks
    Statuses,

    /// Read or write manifest files of an application
    #[command(subcommand)]
    Compose(ComposeCommand),
}

#[derive(Debug, Args)]
pub struct AppArgs {
    pub name: String,
    #[arg(id = "app_version", value_name = "VERSION")]
    pub version: String,
}

#[derive(Debug, Subcommand)]
pub enum ComposeCommand {
    /// Print a manifest file
    Get {
        #[command(flatten)]
        app: AppArgs,
        /// dockerCompose or bigboatCompose
        #[arg(long = "type", default_value = "bigboatCompose")]
        file_type: String,
    },

    /// Replace a manifest file
    Put {
        #[command(flatten)]
        app: AppArgs,
        /// dockerCompose or bigboatCompose
        #[arg(long = "type", default_value = "bigboatCompose")]
        file_type: String,
        /// File to upload; `-` reads standard input
        #[arg(long)]
        file: PathBuf,
    },
}

impl Cli {
    /// Executes the selected command against the configured dashboard.
    pub async fn run(self) -> Result<()> {
        let Cli {
            connection,
            json,
            command,
            ..
        } = self;
        let config = connection.config()?;
        let client = client::connect(&config).context("cannot set up dashboard client")?;
        debug!(?command, api = %config.api_version, "running command");
        let out = Output::new(json);
        execute(&client, command, &out).await
    }
}

async fn execute(client: &Client, command: Command, out: &Output) -> Result<()> {
    match command {
        Command::Apps => out.apps(&client.apps().await?),
        Command::App(AppArgs { name, version }) => match client.get_app(&name, &version).await? {
            Some(app) => out.app(&app),
            None => bail!("application {name}:{version} not found"),
        },
        Command::DeleteApp(AppArgs { name, version }) => {
            if !client.delete_app(&name, &version).await? {
                bail!("application {name}:{version} was not deleted");
            }
            out.done(&format!("deleted {name}:{version}"))
        }
        Command::Instances => out.instances(&client.instances().await?),
        Command::Instance { name } => match client.get_instance(&name).await? {
            Some(instance) => out.instance(&instance),
            None => bail!("instance {name} not found"),
        },
        Command::Start {
            app,
            version,
            instance,
        } => {
            let name = instance.unwrap_or_else(|| app.clone());
            match client
                .update_instance(&name, &app, &version, None, None)
                .await?
            {
                Some(instance) => out.instance(&instance),
                None => bail!("instance {name} was not started"),
            }
        }
        Command::Stop { name } => match client.delete_instance(&name).await? {
            Some(instance) => out.instance(&instance),
            None => bail!("instance {name} not found"),
        },
        Command::Statuses => out.statuses(&client.statuses().await?),
        Command::Compose(ComposeCommand::Get { app, file_type }) => {
            match client.get_compose(&app.name, &app.version, &file_type).await? {
                Some(content) => out.text(&content),
                None => bail!("{file_type} of {}:{} not found", app.name, app.version),
            }
        }
        Command::Compose(ComposeCommand::Put {
            app,
            file_type,
            file,
        }) => {
            let content = read_input(&file)?;
            if !client
                .update_compose(&app.name, &app.version, &file_type, &content)
                .await?
            {
                bail!("{file_type} of {}:{} was not updated", app.name, app.version);
            }
            out.done(&format!("updated {file_type} of {}:{}", app.name, app.version))
        }
    }
}

fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        return std::io::read_to_string(std::io::stdin()).context("cannot read standard input");
    }
    std::fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))
}
