use clap::Args;

use super::OutputFormat;
use crate::api::RecipeClient;
use crate::favorites::FavoritesStore;

#[derive(Args)]
pub struct RandomCommand {
    /// Output format
    #[arg(long, short, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

impl RandomCommand {
    pub async fn run(&self, api: &RecipeClient) -> Result<(), Box<dyn std::error::Error>> {
        let meal = api.random_meal().await?;

        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&meal)?);
            }
            OutputFormat::Text => {
                println!("{}", meal);
            }
        }
        Ok(())
    }
}

#[derive(Args)]
pub struct ShowCommand {
    /// Meal identifier
    pub id: String,

    /// Output format
    #[arg(long, short, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

impl ShowCommand {
    pub async fn run(
        &self,
        api: &RecipeClient,
        favorites: &FavoritesStore,
    ) -> Result<(), Box<dyn std::error::Error>> {
        if self.id.trim().is_empty() {
            return Err("Meal id cannot be empty".into());
        }

        let Some(meal) = api.lookup(self.id.trim()).await? else {
            println!("Meal not found: {}", self.id);
            return Ok(());
        };

        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&meal)?);
            }
            OutputFormat::Text => {
                println!("{}", meal);
                let marker = if favorites.is_favorite(&meal.id).await {
                    "yes"
                } else {
                    "no"
                };
                println!("Favorite: {}", marker);
            }
        }
        Ok(())
    }
}

#[derive(Args)]
pub struct SearchCommand {
    /// Search term matched against meal names
    pub term: String,

    /// Output format
    #[arg(long, short, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

impl SearchCommand {
    pub async fn run(&self, api: &RecipeClient) -> Result<(), Box<dyn std::error::Error>> {
        if self.term.trim().is_empty() {
            return Err("Search term cannot be empty".into());
        }

        let meals = api.search(self.term.trim()).await?;

        if meals.is_empty() {
            println!("No meals found for '{}'", self.term);
            return Ok(());
        }

        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&meals)?);
            }
            OutputFormat::Text => {
                println!("Search results for '{}'", self.term);
                println!("{}", "-".repeat(40));
                for meal in &meals {
                    let area = meal.area.as_deref().unwrap_or("-");
                    println!("  {:<8}  {:<40}  {}", meal.id, meal.name, area);
                }
                println!("\nTotal: {} meal(s)", meals.len());
            }
        }
        Ok(())
    }
}
