use clap::{Args, Subcommand};

use menuboard_core::screens::RestaurantSelectionScreen;
use menuboard_core::{MenuStore, RestaurantDraft};

use super::{CommandResult, OutputFormat};

#[derive(Args)]
pub struct RestaurantCommand {
    #[command(subcommand)]
    pub command: RestaurantSubcommand,
}

#[derive(Subcommand)]
pub enum RestaurantSubcommand {
    /// List all restaurants and cafes
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Add a restaurant or cafe
    Add {
        /// Name of the restaurant
        name: String,

        /// Where it is
        #[arg(long)]
        location: String,
    },

    /// Rename a restaurant
    Rename {
        /// Restaurant ID
        id: String,

        /// New name
        name: String,

        /// New location
        #[arg(long)]
        location: Option<String>,
    },

    /// Show a restaurant and its menus
    Show {
        /// Restaurant ID
        id: String,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

impl RestaurantCommand {
    pub async fn run(&self, store: &mut MenuStore) -> CommandResult {
        match &self.command {
            RestaurantSubcommand::List { format } => {
                let restaurants = store.restaurants();
                if restaurants.is_empty() {
                    println!("No restaurants found");
                    return Ok(());
                }

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(restaurants)?);
                    }
                    OutputFormat::Text => {
                        println!("{:<26}  {:<30}  {:<24}  MENUS", "ID", "NAME", "LOCATION");
                        println!("{}", "-".repeat(90));
                        for r in restaurants {
                            println!(
                                "{:<26}  {:<30}  {:<24}  {}",
                                r.id,
                                truncate(&r.name, 30),
                                truncate(&r.location, 24),
                                r.menus.len()
                            );
                        }
                        println!("\nTotal: {} restaurant(s)", restaurants.len());
                    }
                }
                Ok(())
            }

            RestaurantSubcommand::Add { name, location } => {
                let mut screen = RestaurantSelectionScreen::new();
                screen.set_name(name.as_str());
                screen.set_location(location.as_str());
                let created = screen.add_restaurant(store).await?;
                println!("Created restaurant:");
                println!("{}", created);
                Ok(())
            }

            RestaurantSubcommand::Rename { id, name, location } => {
                let current = store
                    .restaurant(id)
                    .ok_or_else(|| format!("Restaurant not found: {}", id))?;
                let draft = RestaurantDraft::new(
                    name.as_str(),
                    location.clone().unwrap_or_else(|| current.location.clone()),
                );
                store.update_restaurant(id, &draft).await?;
                println!("Renamed restaurant {} to '{}'", id, draft.name);
                Ok(())
            }

            RestaurantSubcommand::Show { id, format } => {
                let restaurant = store.fetch_one(id).await?;
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&restaurant)?);
                    }
                    OutputFormat::Text => {
                        print!("{}", restaurant);
                    }
                }
                Ok(())
            }
        }
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() > width {
        let cut: String = text.chars().take(width - 3).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}
