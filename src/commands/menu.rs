use clap::{Args, Subcommand};

use menuboard_core::screens::{MenuEditorScreen, MenuManagementScreen};
use menuboard_core::{MenuStore, Route};

use super::{confirm, CommandResult, OutputFormat};

#[derive(Args)]
pub struct MenuCommand {
    #[command(subcommand)]
    pub command: MenuSubcommand,
}

#[derive(Subcommand)]
pub enum MenuSubcommand {
    /// List the menus of a restaurant
    List {
        /// Restaurant ID
        restaurant: String,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show a menu with its categories and dishes
    Show {
        /// Restaurant ID
        restaurant: String,

        /// Menu ID
        menu: String,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Create a menu
    Add {
        /// Restaurant ID
        restaurant: String,

        /// Name of the menu
        name: String,
    },

    /// Change a menu's name or welcome text
    Update {
        /// Restaurant ID
        restaurant: String,

        /// Menu ID
        menu: String,

        /// New name
        #[arg(long)]
        name: Option<String>,

        /// Welcome text shown above the menu (empty clears it)
        #[arg(long)]
        welcome: Option<String>,
    },

    /// Delete a menu
    Remove {
        /// Restaurant ID
        restaurant: String,

        /// Menu ID
        menu: String,

        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

impl MenuCommand {
    pub async fn run(&self, store: &mut MenuStore) -> CommandResult {
        match &self.command {
            MenuSubcommand::List { restaurant, format } => {
                let restaurant = store
                    .restaurant(restaurant)
                    .ok_or_else(|| format!("Restaurant not found: {}", restaurant))?;

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&restaurant.menus)?);
                    }
                    OutputFormat::Text => {
                        if restaurant.menus.is_empty() {
                            println!("No menus available");
                            return Ok(());
                        }
                        println!("{:<26}  {:<30}  {:>10}  {:>6}", "ID", "NAME", "CATEGORIES", "DISHES");
                        println!("{}", "-".repeat(78));
                        for menu in &restaurant.menus {
                            println!(
                                "{:<26}  {:<30}  {:>10}  {:>6}",
                                menu.id,
                                menu.name,
                                menu.categories.len(),
                                menu.dish_count()
                            );
                        }
                        println!("\nTotal: {} menu(s)", restaurant.menus.len());
                    }
                }
                Ok(())
            }

            MenuSubcommand::Show {
                restaurant,
                menu,
                format,
            } => {
                let found = store
                    .menu(restaurant, menu)
                    .ok_or_else(|| format!("Menu not found: {}", menu))?;
                match format {
                    OutputFormat::Json => println!("{}", serde_json::to_string_pretty(found)?),
                    OutputFormat::Text => print!("{}", found),
                }
                Ok(())
            }

            MenuSubcommand::Add { restaurant, name } => {
                let mut screen = MenuManagementScreen::new(restaurant.as_str());
                screen.load(store).await?;
                screen.open_create_menu();
                screen.set_new_menu_name(name.as_str());

                match screen.create_menu(store).await? {
                    Some(Route::AddEditMenu { menu_id, .. }) => {
                        println!("Created menu '{}' ({})", name.trim(), menu_id);
                        Ok(())
                    }
                    _ => Err("Menu name cannot be empty".into()),
                }
            }

            MenuSubcommand::Update {
                restaurant,
                menu,
                name,
                welcome,
            } => {
                if name.is_none() && welcome.is_none() {
                    return Err("Nothing to update. Provide --name or --welcome.".into());
                }

                let mut screen = MenuEditorScreen::new(restaurant.as_str(), menu.as_str());
                screen.load(store).await?;
                if screen.is_missing() {
                    return Err(format!("Menu not found: {}", menu).into());
                }

                screen.begin_edit_details();
                if let Some(name) = name {
                    screen.set_name(name.as_str());
                }
                if let Some(welcome) = welcome {
                    screen.set_welcome_text(welcome.as_str());
                }
                screen.save_details(store).await?;
                println!("Updated menu '{}'", screen.details().saved().name);
                Ok(())
            }

            MenuSubcommand::Remove {
                restaurant,
                menu,
                force,
            } => {
                let name = store
                    .menu(restaurant, menu)
                    .map(|m| m.name.clone())
                    .ok_or_else(|| format!("Menu not found: {}", menu))?;

                if !force && !confirm(&format!("Delete menu '{}'?", name))? {
                    println!("Deletion cancelled.");
                    return Ok(());
                }

                let mut screen = MenuManagementScreen::new(restaurant.as_str());
                screen.remove_menu(store, menu).await?;
                println!("Deleted menu: {}", name);
                Ok(())
            }
        }
    }
}
