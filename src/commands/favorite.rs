use clap::{Args, Subcommand};

use super::OutputFormat;
use crate::api::RecipeClient;
use crate::favorites::FavoritesStore;
use crate::models::Meal;

#[derive(Args)]
pub struct FavoriteCommand {
    #[command(subcommand)]
    pub command: FavoriteSubcommand,
}

#[derive(Subcommand)]
pub enum FavoriteSubcommand {
    /// List saved favorites
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Save a meal to favorites
    Add {
        /// Meal identifier
        id: String,
    },

    /// Remove a meal from favorites
    Remove {
        /// Meal identifier
        id: String,
    },

    /// Flip a meal's favorite state
    Toggle {
        /// Meal identifier
        id: String,
    },
}

impl FavoriteCommand {
    pub async fn run(
        &self,
        favorites: &FavoritesStore,
        api: &RecipeClient,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            FavoriteSubcommand::List { format } => {
                let meals = favorites.list().await;

                if meals.is_empty() {
                    println!("No favorites yet");
                    return Ok(());
                }

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&meals)?);
                    }
                    OutputFormat::Text => {
                        println!("Favorites");
                        println!("{}", "-".repeat(40));
                        for meal in &meals {
                            println!("  {:<8}  {}", meal.id, meal.name);
                        }
                        println!("\nTotal: {} favorite(s)", meals.len());
                    }
                }
                Ok(())
            }

            FavoriteSubcommand::Add { id } => {
                let id = require_id(id)?;
                let meal = fetch_meal(api, id).await?;

                if favorites.add(&meal).await? {
                    println!("Added '{}' to favorites", meal.name);
                } else {
                    println!("'{}' is already a favorite", meal.name);
                }
                Ok(())
            }

            FavoriteSubcommand::Remove { id } => {
                let id = require_id(id)?;

                if favorites.remove(id).await? {
                    println!("Removed {} from favorites", id);
                } else {
                    println!("{} is not in favorites", id);
                }
                Ok(())
            }

            FavoriteSubcommand::Toggle { id } => {
                let id = require_id(id)?;

                // Reuse the stored snapshot when one exists so toggling a
                // favorite off works without a network round-trip.
                let meal = match favorites.list().await.into_iter().find(|m| m.id == id) {
                    Some(meal) => meal,
                    None => fetch_meal(api, id).await?,
                };

                if favorites.toggle(&meal).await? {
                    println!("'{}' is now a favorite", meal.name);
                } else {
                    println!("'{}' removed from favorites", meal.name);
                }
                Ok(())
            }
        }
    }
}

fn require_id(id: &str) -> Result<&str, Box<dyn std::error::Error>> {
    let id = id.trim();
    if id.is_empty() {
        return Err("Meal id cannot be empty".into());
    }
    Ok(id)
}

async fn fetch_meal(api: &RecipeClient, id: &str) -> Result<Meal, Box<dyn std::error::Error>> {
    api.lookup(id)
        .await?
        .ok_or_else(|| format!("Meal not found: {}", id).into())
}
