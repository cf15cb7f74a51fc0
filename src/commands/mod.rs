mod auth;
mod category;
mod config_cmd;
mod favorite;
mod home;
mod meal;

pub use auth::{LoginCommand, LogoutCommand, WhoamiCommand};
pub use category::{CategoriesCommand, CategoryCommand};
pub use config_cmd::ConfigCommand;
pub use favorite::FavoriteCommand;
pub use home::HomeCommand;
pub use meal::{RandomCommand, SearchCommand, ShowCommand};

use clap::ValueEnum;

/// Output format shared by the listing commands.
#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}
