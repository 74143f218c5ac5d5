//! Interactive front-end: one screen at a time, walked through the navigator.

use std::io::{BufRead, Write};

use menuboard_core::screens::{
    AdForm, AdFormFields, MenuEditorScreen, MenuManagementScreen, Notice, OnboardBrandForm,
    RestaurantSelectionScreen,
};
use menuboard_core::{EntityKey, MenuStore, Navigator, Route};

type ShellResult<T> = Result<T, Box<dyn std::error::Error>>;

enum Screen {
    Restaurants(RestaurantSelectionScreen),
    Menus(MenuManagementScreen),
    Editor(Box<MenuEditorScreen>),
    Onboard(OnboardBrandForm),
    Ad(AdForm),
}

#[derive(Debug, PartialEq)]
enum Flow {
    Continue,
    Quit,
}

pub struct Shell<'a> {
    store: &'a mut MenuStore,
    nav: Navigator,
    screen: Screen,
}

impl<'a> Shell<'a> {
    pub fn new(store: &'a mut MenuStore) -> Self {
        Self {
            store,
            nav: Navigator::new(),
            screen: Screen::Restaurants(RestaurantSelectionScreen::new()),
        }
    }

    pub async fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> ShellResult<()> {
        writeln!(out, "menuboard {} - type 'help' for commands", menuboard_core::version())?;
        self.enter(out).await?;

        let mut lines = input.lines();
        loop {
            write!(out, "{}> ", self.nav.current().title())?;
            out.flush()?;

            let line = match lines.next() {
                Some(line) => line?,
                None => break,
            };
            let args = match split_args(&line) {
                Ok(args) if args.is_empty() => continue,
                Ok(args) => args,
                Err(e) => {
                    writeln!(out, "Error: {}", e)?;
                    continue;
                }
            };

            match self.dispatch(&args, out).await {
                Ok(Flow::Quit) => break,
                Ok(Flow::Continue) => {}
                Err(e) => writeln!(out, "{}", describe(e.as_ref()))?,
            }
            self.poll_background(out)?;
        }
        Ok(())
    }

    async fn dispatch<W: Write>(&mut self, args: &[String], out: &mut W) -> ShellResult<Flow> {
        let rest = &args[1..];
        match args[0].as_str() {
            "quit" | "exit" => return Ok(Flow::Quit),
            "help" => self.help(out)?,
            "show" => self.render(out)?,
            "back" => {
                if self.nav.back() {
                    self.enter(out).await?;
                } else {
                    writeln!(out, "Already at the first screen")?;
                }
            }
            "home" => {
                self.nav.reset();
                self.enter(out).await?;
            }
            "brand" => self.go(Route::OnboardBrand, out).await?,
            "ads" => self.go(Route::AddAd { brand_id: None }, out).await?,
            _ => {
                if let Some(route) = self.screen_command(args[0].as_str(), rest, out).await? {
                    self.go(route, out).await?;
                }
            }
        }
        Ok(Flow::Continue)
    }

    /// Commands that depend on the current screen. Returns a route to follow.
    async fn screen_command<W: Write>(
        &mut self,
        command: &str,
        args: &[String],
        out: &mut W,
    ) -> ShellResult<Option<Route>> {
        let store = &mut *self.store;
        match &mut self.screen {
            Screen::Restaurants(screen) => match (command, args) {
                ("add", [name, location]) => {
                    screen.set_name(name.as_str());
                    screen.set_location(location.as_str());
                    let created = screen.add_restaurant(store).await?;
                    writeln!(out, "Added '{}' [{}]", created.name, created.id)?;
                }
                ("rename", [id, name]) => {
                    screen.begin_rename(store, id)?;
                    screen.set_rename(name.as_str());
                    screen.save_rename(store).await?;
                    write!(out, "{}", screen.render(store))?;
                }
                ("open", [id]) => return Ok(Some(screen.select(store, id)?)),
                ("refresh", []) => {
                    screen.load(store).await?;
                    write!(out, "{}", screen.render(store))?;
                }
                _ => unknown(command, out)?,
            },

            Screen::Menus(screen) => match (command, args) {
                ("new", [name]) => {
                    screen.open_create_menu();
                    screen.set_new_menu_name(name.as_str());
                    return Ok(screen.create_menu(store).await?);
                }
                ("edit", [menu_id]) => return Ok(Some(screen.edit_menu(menu_id))),
                ("remove", [menu_id]) => {
                    screen.remove_menu(store, menu_id).await?;
                    write!(out, "{}", screen.render())?;
                }
                _ => unknown(command, out)?,
            },

            Screen::Editor(screen) => {
                if screen.is_missing() {
                    writeln!(out, "This menu does not exist. Use 'back'.")?;
                    return Ok(None);
                }
                match (command, args) {
                    ("rename", [name]) => {
                        screen.begin_edit_details();
                        screen.set_name(name.as_str());
                        if let Err(notice) = screen.save_details(store).await {
                            screen.cancel_details();
                            return Err(notice.into());
                        }
                    }
                    ("welcome", [text]) => {
                        screen.begin_edit_details();
                        screen.set_welcome_text(text.as_str());
                        if let Err(notice) = screen.save_details(store).await {
                            screen.cancel_details();
                            return Err(notice.into());
                        }
                    }
                    ("category", [action, params @ ..]) => {
                        category_command(screen, store, action, params).await?;
                    }
                    ("dish", [action, params @ ..]) => {
                        dish_command(screen, store, action, params).await?;
                    }
                    ("qr", []) => {
                        screen.preview_mut().request_qr(store.api());
                        writeln!(out, "Generating QR code...")?;
                        return Ok(None);
                    }
                    ("qr", [wait]) if wait == "wait" => {
                        let qr = screen.preview_mut().wait_qr().await?;
                        writeln!(out, "Scan to View the PDF: {}", qr.qr_code_url)?;
                        return Ok(None);
                    }
                    ("pdf", []) => {
                        let url = screen
                            .preview()
                            .pdf_url()
                            .ok_or("Generate a QR code first with 'qr'")?;
                        if open::that(url).is_err() {
                            writeln!(out, "View PDF of the Menu: {}", url)?;
                        }
                        return Ok(None);
                    }
                    _ => {
                        unknown(command, out)?;
                        return Ok(None);
                    }
                }
                write!(out, "{}", screen.render(store))?;
            }

            Screen::Onboard(form) => match (command, args) {
                ("submit", [name, metadata @ ..]) if metadata.len() <= 1 => {
                    form.brand_name = name.clone();
                    form.metadata = metadata.first().cloned().unwrap_or_default();
                    let (brand, route) = form.submit(store.api()).await?;
                    writeln!(out, "Brand onboarded: {}", brand)?;
                    return Ok(Some(route));
                }
                _ => unknown(command, out)?,
            },

            Screen::Ad(form) => match (command, args) {
                ("search", [query]) => {
                    form.set_search(query.as_str());
                    write!(out, "{}", form.render())?;
                }
                ("select", [brand_id]) => {
                    form.select_brand(brand_id)?;
                    write!(out, "{}", form.render())?;
                }
                ("submit", [name, bid, image, ttl @ ..]) if ttl.len() <= 1 => {
                    form.fields = AdFormFields {
                        ad_name: name.clone(),
                        bid_price: bid.clone(),
                        ad_image_url: image.clone(),
                        ttl: ttl.first().cloned().unwrap_or_default(),
                    };
                    form.submit(store.api()).await?;
                    writeln!(out, "Ad added")?;
                }
                _ => unknown(command, out)?,
            },
        }
        Ok(None)
    }

    async fn go<W: Write>(&mut self, route: Route, out: &mut W) -> ShellResult<()> {
        self.nav.navigate(route);
        self.enter(out).await
    }

    /// Builds and loads the screen for the current route. The previous screen
    /// is dropped, which cancels anything it still had running.
    async fn enter<W: Write>(&mut self, out: &mut W) -> ShellResult<()> {
        let route = self.nav.current().clone();
        writeln!(out, "\n== {} ==", route.title())?;

        let loaded = match &route {
            Route::RestaurantSelection => {
                let mut screen = RestaurantSelectionScreen::new();
                let result = screen.load(self.store).await;
                self.screen = Screen::Restaurants(screen);
                result
            }
            Route::MenuManagement { restaurant_id } => {
                let mut screen = MenuManagementScreen::new(restaurant_id.as_str());
                let result = screen.load(self.store).await;
                self.screen = Screen::Menus(screen);
                result
            }
            Route::AddEditMenu {
                restaurant_id,
                menu_id,
            } => {
                let mut screen = MenuEditorScreen::new(restaurant_id.as_str(), menu_id.as_str());
                let result = screen.load(self.store).await;
                self.screen = Screen::Editor(Box::new(screen));
                result
            }
            Route::OnboardBrand => {
                self.screen = Screen::Onboard(OnboardBrandForm::new());
                Ok(())
            }
            Route::AddAd { brand_id } => {
                let mut form = AdForm::new(brand_id.clone());
                let result = form.load(self.store.api()).await;
                self.screen = Screen::Ad(form);
                result
            }
        };

        if let Err(notice) = loaded {
            writeln!(out, "{}", notice)?;
        }
        self.render(out)
    }

    fn render<W: Write>(&self, out: &mut W) -> ShellResult<()> {
        let text = match &self.screen {
            Screen::Restaurants(screen) => screen.render(&*self.store),
            Screen::Menus(screen) => screen.render(),
            Screen::Editor(screen) => screen.render(&*self.store),
            Screen::Onboard(form) => format!(
                "Brand name: {}\nMetadata: {}\n",
                form.brand_name, form.metadata
            ),
            Screen::Ad(form) => form.render(),
        };
        write!(out, "{}", text)?;
        Ok(())
    }

    /// Reports a QR code that finished in the background.
    fn poll_background<W: Write>(&mut self, out: &mut W) -> ShellResult<()> {
        if let Screen::Editor(screen) = &mut self.screen {
            match screen.preview_mut().poll_qr() {
                Some(Ok(qr)) => writeln!(out, "QR code ready: {}", qr.qr_code_url)?,
                Some(Err(notice)) => writeln!(out, "{}", notice)?,
                None => {}
            }
        }
        Ok(())
    }

    fn help<W: Write>(&self, out: &mut W) -> ShellResult<()> {
        writeln!(out, "Anywhere: help, show, back, home, brand, ads, quit")?;
        let specific = match self.nav.current() {
            Route::RestaurantSelection => {
                "add <name> <location>\nrename <id> <name>\nopen <id>\nrefresh"
            }
            Route::MenuManagement { .. } => "new <menu name>\nedit <menu id>\nremove <menu id>",
            Route::AddEditMenu { .. } => {
                "rename <menu name>\nwelcome <text>\n\
                 category add <name>\ncategory rename <position> <name>\ncategory remove <position>\n\
                 dish add <category> <name> <price>\ndish edit <category> <position> <name> <price>\n\
                 dish remove <category> <position>\nqr [wait]\npdf"
            }
            Route::OnboardBrand => "submit <brand name> [metadata json]",
            Route::AddAd { .. } => {
                "search <text>\nselect <brand id>\nsubmit <ad name> <bid price> <image url> [ttl]"
            }
        };
        writeln!(out, "{}", specific)?;
        Ok(())
    }
}

async fn category_command(
    screen: &mut MenuEditorScreen,
    store: &mut MenuStore,
    action: &str,
    params: &[String],
) -> ShellResult<()> {
    let (restaurant_id, menu_id) = (screen.restaurant_id().to_string(), screen.menu_id().to_string());
    let categories = screen.categories_mut();
    match (action, params) {
        ("add", [name]) => {
            categories.set_new_category_name(name.as_str());
            categories.add_category(store).await?;
        }
        ("rename", [position, name]) => {
            let key = category_key(store, &restaurant_id, &menu_id, position)?;
            categories.begin_rename(store, key)?;
            categories.set_rename(name.as_str());
            if let Err(notice) = categories.save_rename(store).await {
                categories.cancel_rename();
                return Err(notice.into());
            }
        }
        ("remove", [position]) => {
            let key = category_key(store, &restaurant_id, &menu_id, position)?;
            categories.remove_category(store, key).await?;
        }
        _ => return Err(format!("Unknown category command: {}", action).into()),
    }
    Ok(())
}

async fn dish_command(
    screen: &mut MenuEditorScreen,
    store: &mut MenuStore,
    action: &str,
    params: &[String],
) -> ShellResult<()> {
    let (restaurant_id, menu_id) = (screen.restaurant_id().to_string(), screen.menu_id().to_string());
    let categories = screen.categories_mut();
    match (action, params) {
        ("add", [category, name, price]) => {
            let key = store
                .menu(&restaurant_id, &menu_id)
                .and_then(|m| m.category_by_name(category))
                .map(|c| c.key)
                .ok_or_else(|| format!("Category not found: {}", category))?;
            let form = categories.new_dish_form(store, key)?;
            form.set_name(name.as_str());
            form.set_price(price.as_str());
            form.add(store).await?;
        }
        ("edit", [category, position, name, price]) => {
            let key = dish_key(store, &restaurant_id, &menu_id, category, position)?;
            let form = categories.dish_form(store, key)?;
            form.begin_edit();
            form.set_name(name.as_str());
            form.set_price(price.as_str());
            if let Err(notice) = form.save(store).await {
                form.cancel();
                return Err(notice.into());
            }
        }
        ("remove", [category, position]) => {
            let key = dish_key(store, &restaurant_id, &menu_id, category, position)?;
            let form = categories.dish_form(store, key)?;
            form.delete(store).await?;
            categories.sync(store);
        }
        _ => return Err(format!("Unknown dish command: {}", action).into()),
    }
    Ok(())
}

/// Positions on the command line are 1-based.
fn parse_position(text: &str) -> ShellResult<usize> {
    let position: usize = text
        .parse()
        .map_err(|_| format!("Not a position: {}", text))?;
    Ok(crate::commands::to_index(position)?)
}

fn category_key(
    store: &MenuStore,
    restaurant_id: &str,
    menu_id: &str,
    position: &str,
) -> ShellResult<EntityKey> {
    let index = parse_position(position)?;
    store
        .menu(restaurant_id, menu_id)
        .and_then(|m| m.categories.get(index))
        .map(|c| c.key)
        .ok_or_else(|| format!("No category at position {}", position).into())
}

fn dish_key(
    store: &MenuStore,
    restaurant_id: &str,
    menu_id: &str,
    category: &str,
    position: &str,
) -> ShellResult<EntityKey> {
    let index = parse_position(position)?;
    store
        .menu(restaurant_id, menu_id)
        .and_then(|m| m.category_by_name(category))
        .and_then(|c| c.dishes.get(index))
        .map(|d| d.key)
        .ok_or_else(|| format!("No dish at position {} in '{}'", position, category).into())
}

fn unknown<W: Write>(command: &str, out: &mut W) -> std::io::Result<()> {
    writeln!(out, "Unknown command '{}'. Type 'help'.", command)
}

/// Notices already carry their own prefix.
fn describe(err: &(dyn std::error::Error + 'static)) -> String {
    match err.downcast_ref::<Notice>() {
        Some(notice) => notice.to_string(),
        None => format!("Error: {}", err),
    }
}

/// Splits a command line on whitespace, keeping quoted text together.
pub fn split_args(line: &str) -> Result<Vec<String>, String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut in_word = false;

    for c in line.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                in_word = true;
            }
            None if c.is_whitespace() => {
                if in_word {
                    args.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            None => {
                current.push(c);
                in_word = true;
            }
        }
    }
    if quote.is_some() {
        return Err("Unterminated quote".to_string());
    }
    if in_word {
        args.push(current);
    }
    Ok(args)
}
