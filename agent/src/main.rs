use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};

use command_agent::config::{AgentConfig, ConfigOverrides};
use command_agent::telemetry::init_tracing;
use command_agent::{web, AgentClient};

#[derive(Parser)]
#[command(name = "command-agent")]
#[command(about = "Run shell commands on this host for the management panel")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbosity (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the agent HTTP server
    Serve {
        /// Path to a TOML config file
        #[arg(long, env = "COMMAND_AGENT_CONFIG")]
        config: Option<PathBuf>,

        /// Address to listen on (default 0.0.0.0:6969)
        #[arg(long, env = "COMMAND_AGENT_LISTEN")]
        listen: Option<SocketAddr>,

        /// Shared secret expected in the Senha header
        #[arg(long, env = "COMMAND_AGENT_SECRET", hide_env_values = true)]
        secret: Option<String>,

        /// Shell used to interpret commands (default bash)
        #[arg(long)]
        shell: Option<String>,
    },
    /// Send a command to a running agent and print its output
    Exec {
        /// Agent URL, e.g. http://10.0.0.5:6969
        #[arg(long, default_value = "http://127.0.0.1:6969")]
        url: String,

        /// Shared secret for the Senha header
        #[arg(long, env = "COMMAND_AGENT_SECRET", hide_env_values = true)]
        secret: String,

        /// Stop waiting after this many seconds
        #[arg(long)]
        timeout_secs: Option<u64>,

        /// Command line to run on the agent
        command: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Serve {
            config,
            listen,
            secret,
            shell,
        } => {
            let config = AgentConfig::resolve(ConfigOverrides {
                config_path: config,
                listen,
                shared_secret: secret,
                shell,
            })?;
            web::serve(config).await?;
        }
        Commands::Exec {
            url,
            secret,
            timeout_secs,
            command,
        } => {
            let mut client = AgentClient::new(url, secret);
            if let Some(secs) = timeout_secs {
                client = client.with_timeout(Duration::from_secs(secs));
            }

            let response = client.execute(&command).await?;
            if response.success {
                print!("{}", response.data.unwrap_or_default());
            } else {
                eprintln!("{}", response.message);
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
