use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// An advertiser that can place ads alongside menus.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "BrandRecord")]
pub struct Brand {
    #[serde(rename = "_id")]
    pub id: String,
    pub brand_name: String,
    pub metadata: Value,
}

#[derive(Deserialize)]
struct BrandRecord {
    #[serde(rename = "_id", default)]
    mongo_id: Option<String>,
    #[serde(default)]
    id: Option<String>,
    brand_name: String,
    #[serde(default)]
    metadata: Value,
}

impl TryFrom<BrandRecord> for Brand {
    type Error = String;

    fn try_from(record: BrandRecord) -> Result<Self, Self::Error> {
        let id = record
            .mongo_id
            .or(record.id)
            .ok_or_else(|| "missing field `_id`".to_string())?;
        Ok(Brand {
            id,
            brand_name: record.brand_name,
            metadata: record.metadata,
        })
    }
}

impl fmt::Display for Brand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.brand_name, self.id)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BrandDraft {
    pub brand_name: String,
    pub metadata: Value,
}

impl BrandDraft {
    /// Metadata text is optional; when present it must be valid JSON.
    pub fn parse(brand_name: &str, metadata: &str) -> Result<Self, String> {
        let brand_name = brand_name.trim();
        if brand_name.is_empty() {
            return Err("Please enter a brand name.".to_string());
        }
        let metadata = if metadata.trim().is_empty() {
            Value::Object(Default::default())
        } else {
            serde_json::from_str(metadata.trim())
                .map_err(|e| format!("Metadata must be valid JSON: {}", e))?
        };
        Ok(Self {
            brand_name: brand_name.to_string(),
            metadata,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdDraft {
    pub ad_name: String,
    pub bid_price: f64,
    pub ad_image_url: String,
    /// Expiry in seconds.
    pub ttl: Option<i64>,
}

/// Ad record as echoed back by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "AdRecord")]
pub struct Ad {
    #[serde(rename = "_id")]
    pub id: Option<String>,
    pub ad_name: String,
    pub bid_price: Option<f64>,
    pub ad_image_url: Option<String>,
    pub ttl: Option<i64>,
}

#[derive(Deserialize)]
struct AdRecord {
    #[serde(rename = "_id", default)]
    mongo_id: Option<String>,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    ad_name: String,
    #[serde(default)]
    bid_price: Option<f64>,
    #[serde(default)]
    ad_image_url: Option<String>,
    #[serde(default)]
    ttl: Option<i64>,
}

impl From<AdRecord> for Ad {
    fn from(record: AdRecord) -> Self {
        Ad {
            id: record.mongo_id.or(record.id),
            ad_name: record.ad_name,
            bid_price: record.bid_price,
            ad_image_url: record.ad_image_url,
            ttl: record.ttl,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_brand_draft_empty_metadata_is_object() {
        let draft = BrandDraft::parse("Acme", "").unwrap();
        assert_eq!(draft.metadata, json!({}));
    }

    #[test]
    fn test_brand_draft_parses_metadata() {
        let draft = BrandDraft::parse(" Acme ", r#"{"tier": "gold"}"#).unwrap();
        assert_eq!(draft.brand_name, "Acme");
        assert_eq!(draft.metadata["tier"], "gold");
    }

    #[test]
    fn test_brand_draft_rejects_bad_input() {
        assert!(BrandDraft::parse("", "").is_err());
        let err = BrandDraft::parse("Acme", "{not json").unwrap_err();
        assert!(err.contains("valid JSON"));
    }

    #[test]
    fn test_ad_draft_payload() {
        let draft = AdDraft {
            ad_name: "Summer".into(),
            bid_price: 1.5,
            ad_image_url: "http://img".into(),
            ttl: None,
        };
        let value = serde_json::to_value(&draft).unwrap();
        assert_eq!(value["bid_price"], 1.5);
        assert!(value["ttl"].is_null());
    }

    #[test]
    fn test_ad_lenient_response() {
        let ad: Ad = serde_json::from_str(r#"{"ad_name":"Summer"}"#).unwrap();
        assert_eq!(ad.ad_name, "Summer");
        assert!(ad.id.is_none());
    }

    #[test]
    fn test_brand_accepts_either_or_both_ids() {
        let both: Brand =
            serde_json::from_str(r#"{"_id":"b1","id":"b1","brand_name":"Acme"}"#).unwrap();
        let plain: Brand = serde_json::from_str(r#"{"id":"b2","brand_name":"Acme"}"#).unwrap();
        assert_eq!(both.id, "b1");
        assert_eq!(plain.id, "b2");
        assert_eq!(plain.metadata, Value::Null);
    }

    #[test]
    fn test_ad_with_both_ids() {
        let ad: Ad = serde_json::from_str(r#"{"_id":"a1","id":"a1","ad_name":"Summer"}"#).unwrap();
        assert_eq!(ad.id.as_deref(), Some("a1"));
    }
}
