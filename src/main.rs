use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod commands;
mod config;
mod db;
mod favorites;
mod models;
mod session;

use api::RecipeClient;
use commands::{
    CategoriesCommand, CategoryCommand, ConfigCommand, FavoriteCommand, HomeCommand, LoginCommand,
    LogoutCommand, RandomCommand, SearchCommand, ShowCommand, WhoamiCommand,
};
use config::Config;
use db::{init_db, KvStore};
use favorites::FavoritesStore;
use session::SessionStore;

#[derive(Parser)]
#[command(name = "cook")]
#[command(version)]
#[command(about = "A recipe browsing CLI application", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in with an email address
    Login(LoginCommand),

    /// Clear the stored session
    Logout(LogoutCommand),

    /// Show the logged-in user
    Whoami(WhoamiCommand),

    /// Show the home feed (categories and random picks)
    Home(HomeCommand),

    /// List all meal categories
    Categories(CategoriesCommand),

    /// List meals in a category
    Category(CategoryCommand),

    /// Show one random meal
    Random(RandomCommand),

    /// Show a meal's details
    Show(ShowCommand),

    /// Search meals by name
    Search(SearchCommand),

    /// Manage the favorites list
    Favorite(FavoriteCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config)?;

    match cli.command {
        Some(Commands::Login(cmd)) => {
            let sessions = SessionStore::new(open_kv(&config).await?);
            cmd.run(&sessions).await?;
        }
        Some(Commands::Logout(cmd)) => {
            let sessions = SessionStore::new(open_kv(&config).await?);
            cmd.run(&sessions).await?;
        }
        Some(Commands::Whoami(cmd)) => {
            let sessions = SessionStore::new(open_kv(&config).await?);
            cmd.run(&sessions).await?;
        }
        Some(Commands::Home(cmd)) => {
            let sessions = SessionStore::new(open_kv(&config).await?);
            cmd.run(&recipe_client(&config)?, &sessions).await?;
        }
        Some(Commands::Categories(cmd)) => {
            cmd.run(&recipe_client(&config)?).await?;
        }
        Some(Commands::Category(cmd)) => {
            cmd.run(&recipe_client(&config)?).await?;
        }
        Some(Commands::Random(cmd)) => {
            cmd.run(&recipe_client(&config)?).await?;
        }
        Some(Commands::Show(cmd)) => {
            let favorites = FavoritesStore::new(open_kv(&config).await?);
            cmd.run(&recipe_client(&config)?, &favorites).await?;
        }
        Some(Commands::Search(cmd)) => {
            cmd.run(&recipe_client(&config)?).await?;
        }
        Some(Commands::Favorite(cmd)) => {
            let favorites = FavoritesStore::new(open_kv(&config).await?);
            cmd.run(&favorites, &recipe_client(&config)?).await?;
        }
        Some(Commands::Config(cmd)) => {
            cmd.run(&config)?;
        }
        None => {
            println!("Use --help to see available commands");
        }
    }

    Ok(())
}

async fn open_kv(config: &Config) -> Result<KvStore, Box<dyn std::error::Error>> {
    let pool = init_db(config.database_path.value.clone()).await?;
    Ok(KvStore::new(pool))
}

fn recipe_client(config: &Config) -> Result<RecipeClient, api::ApiError> {
    RecipeClient::new(config.api_url.value.clone(), config.http_timeout())
}
