mod brand;
mod category;
mod config_cmd;
mod dish;
mod menu;
mod preview;
mod restaurant;

use clap::ValueEnum;
use std::io::{self, Write};

pub use brand::{AdCommand, BrandCommand};
pub use category::CategoryCommand;
pub use config_cmd::ConfigCommand;
pub use dish::DishCommand;
pub use menu::MenuCommand;
pub use preview::PreviewCommand;
pub use restaurant::RestaurantCommand;

pub type CommandResult = Result<(), Box<dyn std::error::Error>>;

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Asks a yes/no question on stdin. Anything but "y" means no.
pub fn confirm(prompt: &str) -> io::Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().eq_ignore_ascii_case("y"))
}

/// Converts a 1-based position typed by the user to an index.
pub fn to_index(position: usize) -> Result<usize, String> {
    position
        .checked_sub(1)
        .ok_or_else(|| "Positions start at 1".to_string())
}
