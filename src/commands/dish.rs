use clap::{Args, Subcommand};

use menuboard_core::screens::{CategoryEditor, DishForm};
use menuboard_core::{Dish, MenuStore};

use super::{confirm, to_index, CommandResult};

#[derive(Args)]
pub struct DishCommand {
    #[command(subcommand)]
    pub command: DishSubcommand,
}

#[derive(Subcommand)]
pub enum DishSubcommand {
    /// Add a dish to a category
    Add {
        /// Restaurant ID
        restaurant: String,

        /// Menu ID
        menu: String,

        /// Category name
        category: String,

        /// Name of the dish
        #[arg(long)]
        name: String,

        /// Price, e.g. 4.50
        #[arg(long)]
        price: String,
    },

    /// Update a dish
    Update {
        /// Restaurant ID
        restaurant: String,

        /// Menu ID
        menu: String,

        /// Category name
        category: String,

        /// Position of the dish in the category, starting at 1
        position: usize,

        /// New name
        #[arg(long)]
        name: Option<String>,

        /// New price
        #[arg(long)]
        price: Option<String>,
    },

    /// Delete a dish
    Remove {
        /// Restaurant ID
        restaurant: String,

        /// Menu ID
        menu: String,

        /// Category name
        category: String,

        /// Position of the dish in the category, starting at 1
        position: usize,

        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

impl DishCommand {
    pub async fn run(&self, store: &mut MenuStore) -> CommandResult {
        match &self.command {
            DishSubcommand::Add {
                restaurant,
                menu,
                category,
                name,
                price,
            } => {
                let key = store
                    .menu(restaurant, menu)
                    .and_then(|m| m.category_by_name(category))
                    .map(|c| c.key)
                    .ok_or_else(|| format!("Category not found: {}", category))?;

                let mut editor = CategoryEditor::new(restaurant.as_str(), menu.as_str());
                let form = editor.new_dish_form(store, key)?;
                form.set_name(name.as_str());
                form.set_price(price.as_str());
                let dish = form.add(store).await?;
                println!("Added dish to '{}':", category);
                println!("  {}", dish);
                Ok(())
            }

            DishSubcommand::Update {
                restaurant,
                menu,
                category,
                position,
                name,
                price,
            } => {
                if name.is_none() && price.is_none() {
                    return Err("Nothing to update. Provide --name or --price.".into());
                }

                let dish = dish_at(store, restaurant, menu, category, *position)?;
                let mut form =
                    DishForm::existing(restaurant.as_str(), menu.as_str(), category.as_str(), &dish);
                form.begin_edit();
                if let Some(name) = name {
                    form.set_name(name.as_str());
                }
                if let Some(price) = price {
                    form.set_price(price.as_str());
                }
                let updated = form.save(store).await?;
                println!("Updated dish:");
                println!("  {}", updated);
                Ok(())
            }

            DishSubcommand::Remove {
                restaurant,
                menu,
                category,
                position,
                force,
            } => {
                let dish = dish_at(store, restaurant, menu, category, *position)?;

                if !force && !confirm(&format!("Delete dish '{}'?", dish.name))? {
                    println!("Deletion cancelled.");
                    return Ok(());
                }

                let mut form =
                    DishForm::existing(restaurant.as_str(), menu.as_str(), category.as_str(), &dish);
                form.delete(store).await?;
                println!("Deleted dish: {}", dish.name);
                Ok(())
            }
        }
    }
}

fn dish_at(
    store: &MenuStore,
    restaurant: &str,
    menu: &str,
    category: &str,
    position: usize,
) -> Result<Dish, String> {
    let index = to_index(position)?;
    let category_ref = store
        .menu(restaurant, menu)
        .ok_or_else(|| format!("Menu not found: {}", menu))?
        .category_by_name(category)
        .ok_or_else(|| format!("Category not found: {}", category))?;
    category_ref
        .dishes
        .get(index)
        .cloned()
        .ok_or_else(|| format!("No dish at position {} in '{}'", position, category))
}
