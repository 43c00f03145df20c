use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use runtime::{AppConfig, CliArgs};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

use users_dashboard::domain::ids::OriginPolicy;
use users_dashboard::infra::HttpUserService;
use users_dashboard::{UserListView, UserStore, UsersDashboardConfig};

mod console;

use console::{parse_command, render_field_errors, render_screen, Command, ConsoleNotifier};

/// Key of the dashboard section under `modules:`
const MODULE_NAME: &str = "users_dashboard";

/// Users Dashboard - manage a remote user directory from the terminal
#[derive(Parser)]
#[command(name = "users-dashboard")]
#[command(about = "Users Dashboard - manage a remote user directory from the terminal")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Collection URL of the user service (overrides config)
    #[arg(long)]
    api_url: Option<String>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive dashboard
    Run,
    /// Check configuration
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        print_config: cli.print_config,
        verbose: cli.verbose,
    };

    // Load configuration (normalized home_dir is applied inside)
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;

    config.apply_cli_overrides(&args);
    if let Some(api_url) = &cli.api_url {
        config.set_module_value(MODULE_NAME, "api_url", api_url.clone().into());
    }

    let logging_config = config.logging.as_ref().cloned().unwrap_or_default();
    runtime::logging::init_logging_from_config(&logging_config, Path::new(&config.home_dir));
    tracing::debug!("Users Dashboard starting");

    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    let module_config: UsersDashboardConfig = config.module_config(MODULE_NAME)?;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_dashboard(module_config).await,
        Commands::Check => check_config(&config, &module_config),
    }
}

fn check_config(config: &AppConfig, module_config: &UsersDashboardConfig) -> Result<()> {
    tracing::info!("Checking configuration...");

    HttpUserService::from_config(module_config).context("Invalid users_dashboard configuration")?;

    tracing::info!("Configuration is valid");
    println!("Configuration check passed");
    println!("{}", config.to_yaml()?);
    println!(
        "{MODULE_NAME}: {}",
        serde_json::to_string_pretty(module_config)?
    );
    Ok(())
}

async fn run_dashboard(module_config: UsersDashboardConfig) -> Result<()> {
    let remote = HttpUserService::from_config(&module_config)
        .context("Failed to build the user service client")?;
    tracing::info!(api_url = %remote.base_url(), "Connecting to user service");

    let store = Arc::new(UserStore::new(
        Arc::new(remote),
        Arc::new(ConsoleNotifier::default()),
        OriginPolicy::new(module_config.local_id_threshold),
    ));
    let mut view = UserListView::new(store, module_config.page_size);

    view.mount().await;
    print!("{}", render_screen(&view.render()));
    println!("Type 'help' for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };

        match command {
            Command::Quit => break,
            Command::Help => {
                println!("{}", console::HELP);
                continue;
            }
            Command::List => {}
            Command::Next => view.next_page(),
            Command::Prev => view.prev_page(),
            Command::Add => view.click_add(),
            Command::Edit(id) => {
                if !view.click_edit(id) {
                    println!("No user with id {id}");
                }
            }
            Command::Save(input) => {
                if !view.form().is_open() {
                    println!("No form is open, use 'add' or 'edit <id>' first");
                    continue;
                }
                if let Err(errors) = view.submit_form(input).await {
                    println!("Please fix the form:\n{}", render_field_errors(&errors));
                    continue;
                }
            }
            Command::Cancel => view.cancel_form(),
            Command::Delete(id) => view.click_delete(id).await,
            Command::Reload => {
                let _ = view.store().load().await;
            }
        }

        print!("{}", render_screen(&view.render()));
    }

    tracing::debug!("Users Dashboard exiting");
    Ok(())
}
