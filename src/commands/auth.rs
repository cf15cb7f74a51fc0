use clap::Args;

use crate::session::SessionStore;

#[derive(Args)]
pub struct LoginCommand {
    /// Email address to log in with
    pub email: String,

    /// Password (checked for presence only, never stored)
    #[arg(long, short)]
    pub password: String,
}

impl LoginCommand {
    pub async fn run(&self, sessions: &SessionStore) -> Result<(), Box<dyn std::error::Error>> {
        if self.email.trim().is_empty() || self.password.trim().is_empty() {
            return Err("Email and password are both required".into());
        }

        let user = sessions.login(self.email.trim()).await?;
        println!("Logged in as {}", user.email);
        Ok(())
    }
}

#[derive(Args)]
pub struct LogoutCommand {}

impl LogoutCommand {
    pub async fn run(&self, sessions: &SessionStore) -> Result<(), Box<dyn std::error::Error>> {
        match sessions.current().await {
            Some(user) => {
                sessions.logout().await?;
                println!("Logged out {}", user.email);
            }
            None => {
                println!("Not logged in");
            }
        }
        Ok(())
    }
}

#[derive(Args)]
pub struct WhoamiCommand {}

impl WhoamiCommand {
    pub async fn run(&self, sessions: &SessionStore) -> Result<(), Box<dyn std::error::Error>> {
        match sessions.current().await {
            Some(user) => {
                println!(
                    "Logged in as {} (since {})",
                    user.email,
                    user.logged_in_at.format("%Y-%m-%d %H:%M")
                );
            }
            None => {
                println!("Not logged in");
            }
        }
        Ok(())
    }
}
