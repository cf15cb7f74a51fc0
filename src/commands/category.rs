use clap::Args;

use super::OutputFormat;
use crate::api::RecipeClient;

#[derive(Args)]
pub struct CategoriesCommand {
    /// Output format
    #[arg(long, short, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

impl CategoriesCommand {
    pub async fn run(&self, api: &RecipeClient) -> Result<(), Box<dyn std::error::Error>> {
        let categories = api.categories().await?;

        if categories.is_empty() {
            println!("No categories found");
            return Ok(());
        }

        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&categories)?);
            }
            OutputFormat::Text => {
                println!("{:<4}  NAME", "ID");
                println!("{}", "-".repeat(30));
                for category in &categories {
                    println!("{:<4}  {}", category.id, category.name);
                }
                println!("\nTotal: {} category(ies)", categories.len());
            }
        }
        Ok(())
    }
}

#[derive(Args)]
pub struct CategoryCommand {
    /// Category name, e.g. "Seafood"
    pub name: String,

    /// Output format
    #[arg(long, short, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

impl CategoryCommand {
    pub async fn run(&self, api: &RecipeClient) -> Result<(), Box<dyn std::error::Error>> {
        if self.name.trim().is_empty() {
            return Err("Category name cannot be empty".into());
        }

        let meals = api.by_category(self.name.trim()).await?;

        if meals.is_empty() {
            println!("No meals found in category '{}'", self.name);
            return Ok(());
        }

        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&meals)?);
            }
            OutputFormat::Text => {
                println!("Meals in {}", self.name);
                println!("{}", "-".repeat(40));
                for meal in &meals {
                    println!("  {:<8}  {}", meal.id, meal.name);
                }
                println!("\nTotal: {} meal(s)", meals.len());
            }
        }
        Ok(())
    }
}
