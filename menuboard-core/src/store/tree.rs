//! Local edits of the restaurant → menu → category → dish tree.
//!
//! Each function resolves one branch by restaurant id, menu id and category
//! name, changes only that branch and leaves every sibling untouched. The
//! store applies these after the backend accepted the matching write.

use std::collections::HashSet;

use super::error::{StoreError, StoreResult};
use crate::models::{Category, Dish, EntityKey, Menu, Restaurant};

pub fn restaurant_mut<'a>(
    restaurants: &'a mut [Restaurant],
    restaurant_id: &str,
) -> StoreResult<&'a mut Restaurant> {
    restaurants
        .iter_mut()
        .find(|r| r.id == restaurant_id)
        .ok_or_else(|| StoreError::RestaurantNotFound(restaurant_id.to_string()))
}

pub fn menu_mut<'a>(
    restaurants: &'a mut [Restaurant],
    restaurant_id: &str,
    menu_id: &str,
) -> StoreResult<&'a mut Menu> {
    restaurant_mut(restaurants, restaurant_id)?
        .menus
        .iter_mut()
        .find(|m| m.id == menu_id)
        .ok_or_else(|| StoreError::MenuNotFound(menu_id.to_string()))
}

pub fn category_mut<'a>(
    restaurants: &'a mut [Restaurant],
    restaurant_id: &str,
    menu_id: &str,
    category_name: &str,
) -> StoreResult<&'a mut Category> {
    menu_mut(restaurants, restaurant_id, menu_id)?
        .categories
        .iter_mut()
        .find(|c| c.name == category_name)
        .ok_or_else(|| StoreError::CategoryNotFound(category_name.to_string()))
}

// ----------------------------------------------------------------------
// Menus
// ----------------------------------------------------------------------

pub fn insert_menu(
    restaurants: &mut [Restaurant],
    restaurant_id: &str,
    menu: Menu,
) -> StoreResult<()> {
    restaurant_mut(restaurants, restaurant_id)?.menus.push(menu);
    Ok(())
}

/// Drops a placeholder menu. Returns whether one was removed.
pub fn discard_menu(restaurants: &mut [Restaurant], restaurant_id: &str, menu_id: &str) -> bool {
    match restaurant_mut(restaurants, restaurant_id) {
        Ok(restaurant) => {
            let before = restaurant.menus.len();
            restaurant.menus.retain(|m| m.id != menu_id);
            restaurant.menus.len() != before
        }
        Err(_) => false,
    }
}

/// Gives a placeholder the id the backend assigned and clears its pending flag.
pub fn confirm_menu(
    restaurants: &mut [Restaurant],
    restaurant_id: &str,
    temp_id: &str,
    menu_id: &str,
) -> StoreResult<()> {
    let menu = menu_mut(restaurants, restaurant_id, temp_id)?;
    menu.id = menu_id.to_string();
    menu.pending = false;
    Ok(())
}

pub fn rename_menu(
    restaurants: &mut [Restaurant],
    restaurant_id: &str,
    menu_id: &str,
    name: &str,
    welcome_text: Option<&str>,
) -> StoreResult<()> {
    let menu = menu_mut(restaurants, restaurant_id, menu_id)?;
    menu.name = name.to_string();
    menu.welcome_text = welcome_text.map(str::to_string);
    Ok(())
}

pub fn remove_menu(
    restaurants: &mut [Restaurant],
    restaurant_id: &str,
    menu_id: &str,
) -> StoreResult<Menu> {
    let restaurant = restaurant_mut(restaurants, restaurant_id)?;
    let index = restaurant
        .menus
        .iter()
        .position(|m| m.id == menu_id)
        .ok_or_else(|| StoreError::MenuNotFound(menu_id.to_string()))?;
    Ok(restaurant.menus.remove(index))
}

// ----------------------------------------------------------------------
// Categories
// ----------------------------------------------------------------------

pub fn append_category(
    restaurants: &mut [Restaurant],
    restaurant_id: &str,
    menu_id: &str,
    category: Category,
) -> StoreResult<()> {
    menu_mut(restaurants, restaurant_id, menu_id)?
        .categories
        .push(category);
    Ok(())
}

pub fn rename_category(
    restaurants: &mut [Restaurant],
    restaurant_id: &str,
    menu_id: &str,
    index: usize,
    name: &str,
) -> StoreResult<()> {
    let category = menu_mut(restaurants, restaurant_id, menu_id)?
        .categories
        .get_mut(index)
        .ok_or(StoreError::CategoryIndex(index))?;
    category.name = name.to_string();
    Ok(())
}

/// Removes the category at `index`; later categories move up one place.
pub fn remove_category(
    restaurants: &mut [Restaurant],
    restaurant_id: &str,
    menu_id: &str,
    index: usize,
) -> StoreResult<Category> {
    let menu = menu_mut(restaurants, restaurant_id, menu_id)?;
    if index >= menu.categories.len() {
        return Err(StoreError::CategoryIndex(index));
    }
    Ok(menu.categories.remove(index))
}

// ----------------------------------------------------------------------
// Dishes
// ----------------------------------------------------------------------

pub fn append_dish(
    restaurants: &mut [Restaurant],
    restaurant_id: &str,
    menu_id: &str,
    category_name: &str,
    dish: Dish,
) -> StoreResult<()> {
    category_mut(restaurants, restaurant_id, menu_id, category_name)?
        .dishes
        .push(dish);
    Ok(())
}

/// Replaces the dish at `index`, keeping its local key.
pub fn replace_dish(
    restaurants: &mut [Restaurant],
    restaurant_id: &str,
    menu_id: &str,
    category_name: &str,
    index: usize,
    mut dish: Dish,
) -> StoreResult<Dish> {
    let slot = category_mut(restaurants, restaurant_id, menu_id, category_name)?
        .dishes
        .get_mut(index)
        .ok_or_else(|| StoreError::DishIndex {
            category: category_name.to_string(),
            index,
        })?;
    dish.key = slot.key;
    *slot = dish.clone();
    Ok(dish)
}

pub fn remove_dish(
    restaurants: &mut [Restaurant],
    restaurant_id: &str,
    menu_id: &str,
    category_name: &str,
    index: usize,
) -> StoreResult<Dish> {
    let category = category_mut(restaurants, restaurant_id, menu_id, category_name)?;
    if index >= category.dishes.len() {
        return Err(StoreError::DishIndex {
            category: category_name.to_string(),
            index,
        });
    }
    Ok(category.dishes.remove(index))
}

// ----------------------------------------------------------------------
// Refresh
// ----------------------------------------------------------------------

/// Carries local keys from `previous` into a freshly fetched tree.
///
/// Categories are matched by name and dishes by position plus name, within
/// the same restaurant and menu. Anything unmatched keeps its new key.
pub fn adopt_keys(previous: &[Restaurant], fresh: &mut [Restaurant]) {
    for restaurant in fresh.iter_mut() {
        let Some(old_restaurant) = previous.iter().find(|r| r.id == restaurant.id) else {
            continue;
        };
        for menu in restaurant.menus.iter_mut() {
            let Some(old_menu) = old_restaurant.menus.iter().find(|m| m.id == menu.id) else {
                continue;
            };
            let mut used: HashSet<EntityKey> = HashSet::new();
            for category in menu.categories.iter_mut() {
                let Some(old_category) = old_menu
                    .categories
                    .iter()
                    .find(|c| c.name == category.name && !used.contains(&c.key))
                else {
                    continue;
                };
                used.insert(old_category.key);
                category.key = old_category.key;

                for (index, dish) in category.dishes.iter_mut().enumerate() {
                    if let Some(old_dish) = old_category.dishes.get(index) {
                        if old_dish.name == dish.name {
                            dish.key = old_dish.key;
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dish(name: &str, price: &str) -> Dish {
        Dish::new(name, price.parse().unwrap())
    }

    fn sample() -> Vec<Restaurant> {
        let lunch = Menu::new("m1", "Lunch").with_categories(vec![
            Category::new("Starters").with_dishes(vec![dish("Soup", "5")]),
            Category::new("Mains").with_dishes(vec![dish("Steak", "20"), dish("Fish", "18")]),
            Category::new("Drinks").with_dishes(vec![dish("Tea", "3")]),
        ]);
        let dinner = Menu::new("m2", "Dinner")
            .with_categories(vec![Category::new("Drinks").with_dishes(vec![dish("Wine", "9")])]);
        vec![
            Restaurant::new("r1", "Cafe A", "Main St").with_menus(vec![lunch, dinner]),
            Restaurant::new("r2", "Cafe B", "High St"),
        ]
    }

    #[test]
    fn test_append_dish_touches_only_target_category() {
        let mut tree = sample();
        let before = tree.clone();

        append_dish(&mut tree, "r1", "m1", "Drinks", dish("Coffee", "4")).unwrap();

        let lunch = &tree[0].menus[0];
        let drinks = lunch.category_by_name("Drinks").unwrap();
        assert_eq!(drinks.dishes.len(), 2);
        assert_eq!(
            drinks.dishes.iter().filter(|d| d.name == "Coffee").count(),
            1
        );
        // Other categories, the other menu's "Drinks" and the other restaurant are unchanged.
        assert_eq!(lunch.categories[0], before[0].menus[0].categories[0]);
        assert_eq!(lunch.categories[1], before[0].menus[0].categories[1]);
        assert_eq!(tree[0].menus[1], before[0].menus[1]);
        assert_eq!(tree[1], before[1]);
    }

    #[test]
    fn test_remove_category_shifts_following() {
        let mut tree = sample();
        let before = tree[0].menus[0].categories.clone();

        let removed = remove_category(&mut tree, "r1", "m1", 1).unwrap();

        assert_eq!(removed.name, "Mains");
        let after = &tree[0].menus[0].categories;
        assert_eq!(after.len(), 2);
        assert_eq!(after[0], before[0]);
        assert_eq!(after[1], before[2]);
    }

    #[test]
    fn test_remove_category_out_of_range() {
        let mut tree = sample();
        let before = tree.clone();
        assert!(matches!(
            remove_category(&mut tree, "r1", "m1", 3),
            Err(StoreError::CategoryIndex(3))
        ));
        assert_eq!(tree, before);
    }

    #[test]
    fn test_rename_category() {
        let mut tree = sample();
        rename_category(&mut tree, "r1", "m1", 0, "Small Plates").unwrap();
        assert_eq!(tree[0].menus[0].categories[0].name, "Small Plates");
        assert!(matches!(
            rename_category(&mut tree, "r1", "m1", 9, "x"),
            Err(StoreError::CategoryIndex(9))
        ));
    }

    #[test]
    fn test_replace_then_remove_dish() {
        let mut tree = sample();
        let key = tree[0].menus[0].categories[2].dishes[0].key;

        let replaced = replace_dish(&mut tree, "r1", "m1", "Drinks", 0, dish("Green Tea", "3.5"))
            .unwrap();
        assert_eq!(replaced.key, key);
        assert_eq!(tree[0].menus[0].categories[2].dishes[0].name, "Green Tea");

        remove_dish(&mut tree, "r1", "m1", "Drinks", 0).unwrap();
        assert!(tree[0].menus[0].categories[2].dishes.is_empty());
        assert!(matches!(
            remove_dish(&mut tree, "r1", "m1", "Drinks", 0),
            Err(StoreError::DishIndex { index: 0, .. })
        ));
    }

    #[test]
    fn test_missing_branches_are_reported() {
        let mut tree = sample();
        assert!(matches!(
            append_dish(&mut tree, "nope", "m1", "Drinks", dish("x", "1")),
            Err(StoreError::RestaurantNotFound(_))
        ));
        assert!(matches!(
            append_dish(&mut tree, "r1", "nope", "Drinks", dish("x", "1")),
            Err(StoreError::MenuNotFound(_))
        ));
        assert!(matches!(
            append_dish(&mut tree, "r1", "m1", "Desserts", dish("x", "1")),
            Err(StoreError::CategoryNotFound(_))
        ));
    }

    #[test]
    fn test_placeholder_confirm_and_discard() {
        let mut tree = sample();
        let placeholder = Menu::placeholder("Brunch");
        let temp_id = placeholder.id.clone();
        insert_menu(&mut tree, "r2", placeholder).unwrap();

        confirm_menu(&mut tree, "r2", &temp_id, "m3").unwrap();
        assert_eq!(tree[1].menus[0].id, "m3");
        assert!(!tree[1].menus[0].pending);

        assert!(discard_menu(&mut tree, "r2", "m3"));
        assert!(!discard_menu(&mut tree, "r2", "m3"));
        assert!(tree[1].menus.is_empty());
    }

    #[test]
    fn test_rename_and_remove_menu() {
        let mut tree = sample();
        rename_menu(&mut tree, "r1", "m2", "Supper", Some("Welcome")).unwrap();
        assert_eq!(tree[0].menus[1].name, "Supper");
        assert_eq!(tree[0].menus[1].welcome_text.as_deref(), Some("Welcome"));

        let removed = remove_menu(&mut tree, "r1", "m1").unwrap();
        assert_eq!(removed.name, "Lunch");
        assert_eq!(tree[0].menus.len(), 1);
    }

    #[test]
    fn test_adopt_keys_matches_by_name_and_position() {
        let previous = sample();
        let mut fresh = sample();
        // Fresh tree has new keys everywhere; the server also reordered categories
        // and renamed the first main course.
        fresh[0].menus[0].categories.swap(0, 2);
        fresh[0].menus[0].categories[1].dishes[0].name = "Ribeye".to_string();

        adopt_keys(&previous, &mut fresh);

        let old = &previous[0].menus[0];
        let new = &fresh[0].menus[0];
        assert_eq!(new.categories[0].key, old.categories[2].key); // Drinks
        assert_eq!(new.categories[2].key, old.categories[0].key); // Starters
        let old_mains = &old.categories[1];
        let new_mains = &new.categories[1];
        assert_eq!(new_mains.key, old_mains.key);
        assert_ne!(new_mains.dishes[0].key, old_mains.dishes[0].key);
        assert_eq!(new_mains.dishes[1].key, old_mains.dishes[1].key);
        // The other menu with a "Drinks" category keeps its own key.
        assert_eq!(
            fresh[0].menus[1].categories[0].key,
            previous[0].menus[1].categories[0].key
        );
    }

    #[test]
    fn test_adopt_keys_makes_refresh_stable() {
        let previous = sample();
        let mut fresh = sample();
        adopt_keys(&previous, &mut fresh);
        assert_eq!(fresh, previous);
    }
}
