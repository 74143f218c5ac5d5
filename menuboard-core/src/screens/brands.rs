//! Brand onboarding and ad placement. These screens talk to the backend
//! directly; brands are not part of the restaurant tree.

use std::fmt::Write as _;

use super::{Notice, ScreenResult};
use crate::api::ApiClient;
use crate::models::{Ad, AdDraft, Brand, BrandDraft};
use crate::navigation::Route;

#[derive(Debug, Clone, Default)]
pub struct OnboardBrandForm {
    pub brand_name: String,
    /// Optional JSON text.
    pub metadata: String,
    busy: bool,
}

impl OnboardBrandForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Registers the brand and leads on to adding its first ad.
    pub async fn submit(&mut self, api: &ApiClient) -> ScreenResult<(Brand, Route)> {
        let draft = BrandDraft::parse(&self.brand_name, &self.metadata).map_err(Notice::Validation)?;

        self.busy = true;
        let result = api.onboard_brand(&draft).await;
        self.busy = false;

        let brand = result.map_err(|e| {
            tracing::warn!("Error onboarding brand: {}", e);
            Notice::Failure("Failed to onboard brand.".to_string())
        })?;
        tracing::info!("Brand onboarded: {}", brand);
        let route = Route::AddAd {
            brand_id: Some(brand.id.clone()),
        };
        Ok((brand, route))
    }
}

/// Raw ad inputs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdFormFields {
    pub ad_name: String,
    pub bid_price: String,
    pub ad_image_url: String,
    /// Seconds; blank means no expiry.
    pub ttl: String,
}

pub const AD_FIELDS_REQUIRED: &str = "Please fill all fields or select a brand";

impl AdFormFields {
    pub fn parse(&self) -> Result<AdDraft, String> {
        let ad_name = self.ad_name.trim();
        let bid_price = self.bid_price.trim();
        let ad_image_url = self.ad_image_url.trim();
        if ad_name.is_empty() || bid_price.is_empty() || ad_image_url.is_empty() {
            return Err(AD_FIELDS_REQUIRED.to_string());
        }
        let bid_price: f64 = bid_price
            .parse()
            .map_err(|_| format!("Bid price must be a number, got '{}'", bid_price))?;
        let ttl = match self.ttl.trim() {
            "" => None,
            t => Some(
                t.parse::<i64>()
                    .map_err(|_| format!("TTL must be a whole number of seconds, got '{}'", t))?,
            ),
        };
        Ok(AdDraft {
            ad_name: ad_name.to_string(),
            bid_price,
            ad_image_url: ad_image_url.to_string(),
            ttl,
        })
    }
}

/// "Add New Ad". Opened with a brand id after onboarding, or without one, in
/// which case the user picks a brand from the searchable list.
#[derive(Debug, Clone)]
pub struct AdForm {
    brand_id: Option<String>,
    brands: Vec<Brand>,
    search: String,
    selected: Option<String>,
    pub fields: AdFormFields,
    busy: bool,
}

impl AdForm {
    pub fn new(brand_id: Option<String>) -> Self {
        Self {
            brand_id,
            brands: Vec::new(),
            search: String::new(),
            selected: None,
            fields: AdFormFields::default(),
            busy: false,
        }
    }

    pub fn needs_brand_choice(&self) -> bool {
        self.brand_id.is_none()
    }

    /// Loads the brand list when no brand was given.
    pub async fn load(&mut self, api: &ApiClient) -> ScreenResult<()> {
        if !self.needs_brand_choice() {
            return Ok(());
        }
        self.brands = api.list_brands().await.map_err(|e| {
            tracing::warn!("Error fetching brands: {}", e);
            Notice::Failure("Failed to load brands.".to_string())
        })?;
        Ok(())
    }

    pub fn set_search(&mut self, query: impl Into<String>) {
        self.search = query.into();
    }

    /// Brands whose name contains the search text, ignoring case.
    pub fn filtered_brands(&self) -> Vec<&Brand> {
        let query = self.search.to_lowercase();
        self.brands
            .iter()
            .filter(|b| b.brand_name.to_lowercase().contains(&query))
            .collect()
    }

    pub fn select_brand(&mut self, brand_id: &str) -> ScreenResult<()> {
        if !self.brands.iter().any(|b| b.id == brand_id) {
            return Err(Notice::Validation(format!("Unknown brand: {}", brand_id)));
        }
        self.selected = Some(brand_id.to_string());
        Ok(())
    }

    /// The brand the ad will be placed for.
    pub fn brand_id(&self) -> Option<&str> {
        self.selected.as_deref().or(self.brand_id.as_deref())
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub async fn submit(&mut self, api: &ApiClient) -> ScreenResult<Ad> {
        let brand_id = self
            .brand_id()
            .ok_or_else(|| Notice::Validation(AD_FIELDS_REQUIRED.to_string()))?
            .to_string();
        let draft = self.fields.parse().map_err(Notice::Validation)?;

        self.busy = true;
        let result = api.create_ad(&brand_id, &draft).await;
        self.busy = false;

        let ad = result.map_err(|e| {
            tracing::warn!("Error adding ad: {}", e);
            Notice::Failure("Failed to add ad.".to_string())
        })?;
        tracing::info!("Ad '{}' added for brand {}", draft.ad_name, brand_id);
        self.fields = AdFormFields::default();
        Ok(ad)
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        if self.needs_brand_choice() {
            let _ = writeln!(out, "Search: {}", self.search);
            let brands = self.filtered_brands();
            if brands.is_empty() {
                let _ = writeln!(out, "  No brands found");
            }
            for brand in brands {
                let marker = if self.selected.as_deref() == Some(brand.id.as_str()) {
                    "*"
                } else {
                    " "
                };
                let _ = writeln!(out, " {} {}", marker, brand);
            }
        } else if let Some(id) = &self.brand_id {
            let _ = writeln!(out, "Brand: {}", id);
        }
        let _ = writeln!(out, "Ad name: {}", self.fields.ad_name);
        let _ = writeln!(out, "Bid price: {}", self.fields.bid_price);
        let _ = writeln!(out, "Ad image URL: {}", self.fields.ad_image_url);
        let _ = writeln!(out, "TTL (seconds): {}", self.fields.ttl);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn filled() -> AdFormFields {
        AdFormFields {
            ad_name: "Summer".to_string(),
            bid_price: "1.5".to_string(),
            ad_image_url: "http://cdn/ad.png".to_string(),
            ttl: "3600".to_string(),
        }
    }

    #[test]
    fn test_ad_fields_parse() {
        let draft = filled().parse().unwrap();
        assert_eq!(draft.bid_price, 1.5);
        assert_eq!(draft.ttl, Some(3600));

        let mut no_ttl = filled();
        no_ttl.ttl.clear();
        assert_eq!(no_ttl.parse().unwrap().ttl, None);

        let mut missing = filled();
        missing.ad_image_url = " ".to_string();
        assert_eq!(missing.parse(), Err(AD_FIELDS_REQUIRED.to_string()));

        let mut bad = filled();
        bad.bid_price = "cheap".to_string();
        assert!(bad.parse().is_err());
    }

    #[tokio::test]
    async fn test_onboard_then_add_ad() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/brands/onBoardBrand"))
            .and(body_json(json!({"brand_name": "Acme", "metadata": {"tier": 1}})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "_id": "b1", "brand_name": "Acme", "metadata": {"tier": 1}
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/brands/b1/ads"))
            .and(body_json(json!({
                "ad_name": "Summer", "bid_price": 1.5,
                "ad_image_url": "http://cdn/ad.png", "ttl": 3600
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"_id": "a1", "ad_name": "Summer"})))
            .expect(1)
            .mount(&server)
            .await;
        let api = ApiClient::new(server.uri());

        let mut onboard = OnboardBrandForm::new();
        onboard.brand_name = "Acme".to_string();
        onboard.metadata = r#"{"tier": 1}"#.to_string();
        let (_, route) = onboard.submit(&api).await.unwrap();

        let brand_id = match route {
            Route::AddAd { brand_id } => brand_id,
            other => panic!("unexpected route {:?}", other),
        };
        let mut form = AdForm::new(brand_id);
        form.load(&api).await.unwrap();
        form.fields = filled();
        let ad = form.submit(&api).await.unwrap();

        assert_eq!(ad.id.as_deref(), Some("a1"));
        assert_eq!(form.fields, AdFormFields::default());
    }

    #[tokio::test]
    async fn test_bad_metadata_makes_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&server)
            .await;

        let mut onboard = OnboardBrandForm::new();
        onboard.brand_name = "Acme".to_string();
        onboard.metadata = "{not json".to_string();
        let notice = onboard.submit(&ApiClient::new(server.uri())).await.unwrap_err();

        assert!(notice.is_validation());
    }

    #[tokio::test]
    async fn test_brandless_flow_filters_and_requires_choice() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/brands/getAllBrands"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"_id": "b1", "brand_name": "Acme Foods"},
                {"_id": "b2", "brand_name": "Bistro Supply"}
            ])))
            .mount(&server)
            .await;
        let api = ApiClient::new(server.uri());

        let mut form = AdForm::new(None);
        form.load(&api).await.unwrap();
        form.set_search("ACME");
        let names: Vec<&str> = form
            .filtered_brands()
            .into_iter()
            .map(|b| b.brand_name.as_str())
            .collect();
        assert_eq!(names, vec!["Acme Foods"]);

        form.fields = filled();
        let notice = form.submit(&api).await.unwrap_err();
        assert_eq!(notice, Notice::Validation(AD_FIELDS_REQUIRED.to_string()));

        assert!(form.select_brand("b9").is_err());
        form.select_brand("b2").unwrap();
        assert_eq!(form.brand_id(), Some("b2"));
    }
}
