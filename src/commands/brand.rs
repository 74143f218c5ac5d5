use clap::{Args, Subcommand};

use menuboard_core::screens::{AdForm, AdFormFields, OnboardBrandForm};
use menuboard_core::ApiClient;

use super::{CommandResult, OutputFormat};

#[derive(Args)]
pub struct BrandCommand {
    #[command(subcommand)]
    pub command: BrandSubcommand,
}

#[derive(Subcommand)]
pub enum BrandSubcommand {
    /// List brands
    List {
        /// Only brands whose name contains this text (case-insensitive)
        #[arg(long, short)]
        search: Option<String>,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Onboard a new brand
    Onboard {
        /// Brand name
        name: String,

        /// Extra brand data as JSON
        #[arg(long)]
        metadata: Option<String>,
    },
}

impl BrandCommand {
    pub async fn run(&self, api: &ApiClient) -> CommandResult {
        match &self.command {
            BrandSubcommand::List { search, format } => {
                let mut form = AdForm::new(None);
                form.load(api).await?;
                if let Some(search) = search {
                    form.set_search(search.as_str());
                }
                let brands = form.filtered_brands();

                if brands.is_empty() {
                    println!("No brands found");
                    return Ok(());
                }
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&brands)?);
                    }
                    OutputFormat::Text => {
                        println!("{:<26}  NAME", "ID");
                        println!("{}", "-".repeat(60));
                        for brand in &brands {
                            println!("{:<26}  {}", brand.id, brand.brand_name);
                        }
                        println!("\nTotal: {} brand(s)", brands.len());
                    }
                }
                Ok(())
            }

            BrandSubcommand::Onboard { name, metadata } => {
                let mut form = OnboardBrandForm::new();
                form.brand_name = name.clone();
                form.metadata = metadata.clone().unwrap_or_default();
                let (brand, _) = form.submit(api).await?;
                println!("Onboarded brand: {}", brand);
                println!("Add its first ad with: menuboard ad add --brand {} ...", brand.id);
                Ok(())
            }
        }
    }
}

#[derive(Args)]
pub struct AdCommand {
    #[command(subcommand)]
    pub command: AdSubcommand,
}

#[derive(Subcommand)]
pub enum AdSubcommand {
    /// Place an ad for a brand
    Add {
        /// Brand ID
        #[arg(long)]
        brand: String,

        /// Ad name
        #[arg(long)]
        name: String,

        /// Bid price
        #[arg(long)]
        bid_price: String,

        /// Image URL
        #[arg(long)]
        image_url: String,

        /// Time to live in seconds
        #[arg(long)]
        ttl: Option<String>,
    },
}

impl AdCommand {
    pub async fn run(&self, api: &ApiClient) -> CommandResult {
        match &self.command {
            AdSubcommand::Add {
                brand,
                name,
                bid_price,
                image_url,
                ttl,
            } => {
                let mut form = AdForm::new(Some(brand.clone()));
                form.fields = AdFormFields {
                    ad_name: name.clone(),
                    bid_price: bid_price.clone(),
                    ad_image_url: image_url.clone(),
                    ttl: ttl.clone().unwrap_or_default(),
                };
                let ad = form.submit(api).await?;
                match &ad.id {
                    Some(id) => println!("Added ad '{}' ({})", name, id),
                    None => println!("Added ad '{}'", name),
                }
                Ok(())
            }
        }
    }
}
