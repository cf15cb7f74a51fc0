use clap::Args;

use crate::api::RecipeClient;
use crate::session::SessionStore;

#[derive(Args)]
pub struct HomeCommand {
    /// Number of random picks to show
    #[arg(long, default_value_t = 10)]
    pub count: usize,
}

impl HomeCommand {
    pub async fn run(
        &self,
        api: &RecipeClient,
        sessions: &SessionStore,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match sessions.current().await {
            Some(user) => println!("Welcome back, {}!", user.email),
            None => println!("Welcome! Log in with: cook login <email> --password <password>"),
        }
        println!();

        let categories = api.categories().await?;
        if !categories.is_empty() {
            let names: Vec<&str> = categories.iter().map(|c| c.name.as_str()).collect();
            println!("Categories: {}", names.join(", "));
            println!();
        }

        println!("Today's picks");
        println!("{}", "-".repeat(13));
        for _ in 0..self.count {
            let meal = api.random_meal().await?;
            println!("  {:<8}  {}", meal.id, meal.name);
        }
        println!();
        println!("Show a meal with: cook show <id>");

        Ok(())
    }
}
