use clap::Args;

use menuboard_core::screens::PreviewScreen;
use menuboard_core::MenuStore;

use super::CommandResult;

/// Show a menu the way customers see it
#[derive(Args)]
pub struct PreviewCommand {
    /// Restaurant ID
    pub restaurant: String,

    /// Menu ID
    pub menu: String,

    /// Generate a QR code linking to the menu PDF
    #[arg(long)]
    pub qr: bool,

    /// Open the generated PDF in the default viewer (implies --qr)
    #[arg(long)]
    pub open: bool,
}

impl PreviewCommand {
    pub async fn run(&self, store: &mut MenuStore) -> CommandResult {
        if store.menu(&self.restaurant, &self.menu).is_none() {
            return Err(format!("Menu not found: {}", self.menu).into());
        }

        let mut preview = PreviewScreen::new(self.restaurant.as_str(), self.menu.as_str());
        if self.qr || self.open {
            preview.generate_qr(store.api()).await?;
        }
        print!("{}", preview.render(store));

        if self.open {
            match preview.pdf_url() {
                Some(url) => {
                    if let Err(e) = open::that(url) {
                        tracing::warn!("Could not open {}: {}", url, e);
                        println!("\nOpen the PDF manually: {}", url);
                    }
                }
                None => println!("\nNo PDF link was returned."),
            }
        }
        Ok(())
    }
}
