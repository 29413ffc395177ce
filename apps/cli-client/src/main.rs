use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_sdk::{ClientConfig, Dashboard, MemoryView, UserForm};
use tracing_subscriber::EnvFilter;

mod terminal;
mod web;

use terminal::TerminalView;

#[derive(Debug, Parser)]
#[command(name = "faultline")]
#[command(about = "Demo client for the faultline users API and its crash endpoint")]
struct Cli {
    #[arg(long, env = "FAULTLINE_API_BASE", default_value = client_sdk::config::DEFAULT_API_BASE)]
    api_base: String,
    #[arg(long, env = "FAULTLINE_HEALTH_INTERVAL_SECS", default_value_t = 30)]
    health_interval_secs: u64,
    #[arg(long, env = "FAULTLINE_CRASH_RECHECK_MILLIS", default_value_t = 1000)]
    crash_recheck_millis: u64,
    #[arg(long, env = "FAULTLINE_REQUEST_TIMEOUT_SECS", default_value_t = 10)]
    request_timeout_secs: u64,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run one health check.
    Health,
    /// Load and print all users.
    Users,
    /// Print a single user as JSON.
    User { id: common::UserId },
    /// Create a user, then reload the list.
    AddUser {
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        email: String,
    },
    /// Ask the backend to divide by zero.
    Crash,
    /// Ask the backend for 100 / 5.
    Calc,
    /// Poll health and print activity until Ctrl-C.
    Watch,
    /// Serve the browser dashboard.
    ServeWeb {
        #[arg(long, default_value = "127.0.0.1:8081")]
        bind: String,
    },
}

impl Cli {
    fn client_config(&self) -> Result<ClientConfig> {
        Ok(ClientConfig::new(&self.api_base)?
            .with_health_interval(Duration::from_secs(self.health_interval_secs.max(1)))
            .with_crash_recheck_delay(Duration::from_millis(self.crash_recheck_millis))
            .with_request_timeout(Duration::from_secs(self.request_timeout_secs.max(1))))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.command);
    let config = cli.client_config()?;

    match cli.command {
        Commands::Health => {
            terminal_dashboard(config, UserForm::default())?
                .check_health()
                .await;
        }
        Commands::Users => {
            terminal_dashboard(config, UserForm::default())?
                .load_users()
                .await;
        }
        Commands::User { id } => {
            let dashboard = terminal_dashboard(config, UserForm::default())?;
            let user = dashboard
                .api()
                .get_user(id)
                .await
                .with_context(|| format!("failed to fetch user id={id}"))?;
            println!("{}", serde_json::to_string_pretty(&user)?);
        }
        Commands::AddUser { name, email } => {
            terminal_dashboard(config, UserForm::new(name, email))?
                .add_user()
                .await;
        }
        Commands::Crash => {
            let dashboard = terminal_dashboard(config, UserForm::default())?;
            if let Some(recheck) = dashboard.trigger_crash().await {
                recheck.await.context("health re-check task failed")?;
            }
        }
        Commands::Calc => {
            terminal_dashboard(config, UserForm::default())?
                .safe_calculation()
                .await;
        }
        Commands::Watch => {
            let dashboard = terminal_dashboard(config, UserForm::default())?;
            let poller = dashboard.start().await;
            tokio::signal::ctrl_c()
                .await
                .context("failed to listen for Ctrl-C")?;
            poller.stop().await;
        }
        Commands::ServeWeb { bind } => {
            let bind_addr: SocketAddr = bind
                .parse()
                .with_context(|| format!("invalid bind address {bind}"))?;
            let dashboard = Dashboard::new(config, Arc::new(MemoryView::new()))?;
            web::serve(dashboard, bind_addr).await?;
        }
    }

    Ok(())
}

fn terminal_dashboard(config: ClientConfig, form: UserForm) -> Result<Dashboard<TerminalView>> {
    Ok(Dashboard::new(
        config,
        Arc::new(TerminalView::with_form(form)),
    )?)
}

// Terminal commands already print every log line, so only the web server
// logs at info by default.
fn init_tracing(command: &Commands) {
    let default_level = match command {
        Commands::ServeWeb { .. } => "info",
        _ => "error",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
