use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Source storefront. Serialized as the lowercase tag stored with every product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Department-store marketplace, scraped from rendered search pages.
    Momo,
    /// Big-box retailer, scraped from its JSON search endpoint.
    Pchome,
}

impl Platform {
    pub const ALL: [Platform; 2] = [Platform::Momo, Platform::Pchome];

    pub fn tag(&self) -> &'static str {
        match self {
            Self::Momo => "momo",
            Self::Pchome => "pchome",
        }
    }

    /// File the CLI writes a run to when no `--out` is given.
    pub fn default_output(&self) -> &'static str {
        match self {
            Self::Momo => "momo_products.json",
            Self::Pchome => "pchome_products.json",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "momo" => Ok(Self::Momo),
            "pchome" => Ok(Self::Pchome),
            other => Err(format!("unknown platform '{other}' (expected momo or pchome)")),
        }
    }
}

/// One admitted listing.
///
/// `title`, `price` and `detail_url` are guaranteed present: anything missing
/// one of them never becomes an `ExtractedProduct`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedProduct {
    /// 1-based position within a single run; regenerated every run.
    pub sequence_id: u32,
    pub title: String,
    /// Whole currency units (NT$), always > 0.
    pub price: u64,
    /// Absolute URL, or empty when no image could be resolved.
    pub image_url: String,
    pub detail_url: String,
    pub platform: Platform,
    /// Site-native identifier; may be empty.
    pub sku: String,
    /// Search keyword label attached by the caller before export.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
}

/// Whether a keyword has enough results on one platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductCount {
    pub platform: Platform,
    pub keyword: String,
    pub actual_count: u64,
    pub has_enough: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProductCount {
    pub fn found(platform: Platform, keyword: &str, actual_count: u64, target: u64) -> Self {
        Self {
            platform,
            keyword: keyword.to_string(),
            actual_count,
            has_enough: actual_count >= target,
            error: None,
        }
    }

    pub fn failed(platform: Platform, keyword: &str, error: impl fmt::Display) -> Self {
        Self {
            platform,
            keyword: keyword.to_string(),
            actual_count: 0,
            has_enough: false,
            error: Some(error.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountCheck {
    pub keyword: String,
    pub target_count: u64,
    pub momo: ProductCount,
    pub pchome: ProductCount,
    pub both_have_enough: bool,
}

impl CountCheck {
    pub fn new(keyword: &str, target_count: u64, momo: ProductCount, pchome: ProductCount) -> Self {
        let both_have_enough = momo.has_enough && pchome.has_enough;
        Self {
            keyword: keyword.to_string(),
            target_count,
            momo,
            pchome,
            both_have_enough,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}
impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error: None,
        }
    }
    pub fn err(msg: impl Into<String>) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}
