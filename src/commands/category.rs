use clap::{Args, Subcommand};

use menuboard_core::screens::CategoryEditor;
use menuboard_core::{EntityKey, MenuStore};

use super::{confirm, to_index, CommandResult};

#[derive(Args)]
pub struct CategoryCommand {
    #[command(subcommand)]
    pub command: CategorySubcommand,
}

#[derive(Subcommand)]
pub enum CategorySubcommand {
    /// Add a category to a menu
    Add {
        /// Restaurant ID
        restaurant: String,

        /// Menu ID
        menu: String,

        /// Category name (unique within the menu)
        name: String,
    },

    /// Rename a category
    Rename {
        /// Restaurant ID
        restaurant: String,

        /// Menu ID
        menu: String,

        /// Position of the category, starting at 1
        position: usize,

        /// New name
        name: String,
    },

    /// Delete a category and all of its dishes
    Remove {
        /// Restaurant ID
        restaurant: String,

        /// Menu ID
        menu: String,

        /// Position of the category, starting at 1
        position: usize,

        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

impl CategoryCommand {
    pub async fn run(&self, store: &mut MenuStore) -> CommandResult {
        match &self.command {
            CategorySubcommand::Add {
                restaurant,
                menu,
                name,
            } => {
                let mut editor = CategoryEditor::new(restaurant.as_str(), menu.as_str());
                editor.set_new_category_name(name.as_str());
                let category = editor.add_category(store).await?;
                println!("Added category '{}'", category.name);
                Ok(())
            }

            CategorySubcommand::Rename {
                restaurant,
                menu,
                position,
                name,
            } => {
                let key = category_at(store, restaurant, menu, *position)?;
                let mut editor = CategoryEditor::new(restaurant.as_str(), menu.as_str());
                editor.begin_rename(store, key)?;
                editor.set_rename(name.as_str());
                editor.save_rename(store).await?;
                println!("Renamed category {} to '{}'", position, name.trim());
                Ok(())
            }

            CategorySubcommand::Remove {
                restaurant,
                menu,
                position,
                force,
            } => {
                let key = category_at(store, restaurant, menu, *position)?;
                let (name, dishes) = store
                    .category(restaurant, menu, key)
                    .map(|c| (c.name.clone(), c.dishes.len()))
                    .unwrap_or_default();

                if !force
                    && !confirm(&format!(
                        "Delete category '{}' and its {} dish(es)?",
                        name, dishes
                    ))?
                {
                    println!("Deletion cancelled.");
                    return Ok(());
                }

                let mut editor = CategoryEditor::new(restaurant.as_str(), menu.as_str());
                let removed = editor.remove_category(store, key).await?;
                println!("Deleted category: {}", removed.name);
                Ok(())
            }
        }
    }
}

/// Key of the category shown at `position` (1-based).
fn category_at(
    store: &MenuStore,
    restaurant: &str,
    menu: &str,
    position: usize,
) -> Result<EntityKey, String> {
    let index = to_index(position)?;
    let menu = store
        .menu(restaurant, menu)
        .ok_or_else(|| format!("Menu not found: {}", menu))?;
    menu.categories
        .get(index)
        .map(|c| c.key)
        .ok_or_else(|| format!("No category at position {}", position))
}
