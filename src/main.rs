use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod shell;

use commands::{
    AdCommand, BrandCommand, CategoryCommand, ConfigCommand, DishCommand, MenuCommand,
    PreviewCommand, RestaurantCommand,
};
use config::Config;
use menuboard_core::{ApiClient, MenuStore};

#[derive(Parser)]
#[command(name = "menuboard")]
#[command(version)]
#[command(about = "Manage restaurant menus, dishes and brand ads", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage restaurants and cafes
    Restaurant(RestaurantCommand),

    /// Manage the menus of a restaurant
    Menu(MenuCommand),

    /// Manage the categories of a menu
    Category(CategoryCommand),

    /// Manage the dishes of a category
    Dish(DishCommand),

    /// Preview a menu and get its QR code
    Preview(PreviewCommand),

    /// Manage brands
    Brand(BrandCommand),

    /// Manage ads
    Ad(AdCommand),

    /// Manage configuration
    Config(ConfigCommand),

    /// Start the interactive menu editor
    Shell,
}

impl Commands {
    /// Commands that work against the shared restaurant list.
    fn needs_restaurants(&self) -> bool {
        matches!(
            self,
            Commands::Restaurant(_)
                | Commands::Menu(_)
                | Commands::Category(_)
                | Commands::Dish(_)
                | Commands::Preview(_)
        )
    }
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.clone())?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter.value.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let command = match cli.command {
        Some(command) => command,
        None => {
            println!("Use --help to see available commands");
            return Ok(());
        }
    };

    if let Commands::Config(cmd) = &command {
        return cmd.run(&config, cli.config);
    }

    let api = ApiClient::with_timeout(config.api_url.value.clone(), config.request_timeout())?;
    tracing::debug!("Using backend at {}", config.api_url.value);
    let mut store = MenuStore::new(api);

    if command.needs_restaurants() {
        store.fetch_all().await?;
    }

    match command {
        Commands::Restaurant(cmd) => cmd.run(&mut store).await?,
        Commands::Menu(cmd) => cmd.run(&mut store).await?,
        Commands::Category(cmd) => cmd.run(&mut store).await?,
        Commands::Dish(cmd) => cmd.run(&mut store).await?,
        Commands::Preview(cmd) => cmd.run(&mut store).await?,
        Commands::Brand(cmd) => cmd.run(store.api()).await?,
        Commands::Ad(cmd) => cmd.run(store.api()).await?,
        Commands::Shell => {
            let stdin = std::io::stdin();
            let mut stdout = std::io::stdout();
            shell::Shell::new(&mut store)
                .run(stdin.lock(), &mut stdout)
                .await?;
        }
        Commands::Config(_) => {}
    }

    Ok(())
}
