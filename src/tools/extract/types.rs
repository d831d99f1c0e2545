use crate::types::{ExtractedProduct, Platform};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which part of a matched element holds the field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Read {
    Text,
    Attr(&'static str),
    /// First of these attributes with a non-empty value.
    FirstAttr(&'static [&'static str]),
}

/// Fields gathered from one listing before the admission gate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawCandidate {
    pub title: Option<String>,
    pub price: Option<u64>,
    pub detail_url: Option<String>,
    pub image_url: Option<String>,
    pub sku: String,
}

/// A listing that passed the admission gate but has no sequence id yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub title: String,
    pub price: u64,
    pub detail_url: String,
    pub image_url: String,
    pub sku: String,
}

/// Why a listing was dropped at the admission gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionIncomplete {
    MissingTitle,
    MissingPrice,
    MissingUrl,
    /// The record itself could not be read.
    Undecodable,
}

impl fmt::Display for ExtractionIncomplete {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::MissingTitle => "missing title",
            Self::MissingPrice => "missing price",
            Self::MissingUrl => "missing detail url",
            Self::Undecodable => "undecodable record",
        })
    }
}

impl RawCandidate {
    /// Admission gate: non-empty title, positive price, non-empty detail URL.
    pub fn admit(self) -> Result<Candidate, ExtractionIncomplete> {
        let title = self
            .title
            .filter(|t| !t.trim().is_empty())
            .ok_or(ExtractionIncomplete::MissingTitle)?;
        let price = self
            .price
            .filter(|p| *p > 0)
            .ok_or(ExtractionIncomplete::MissingPrice)?;
        let detail_url = self
            .detail_url
            .filter(|u| !u.is_empty())
            .ok_or(ExtractionIncomplete::MissingUrl)?;
        Ok(Candidate {
            title,
            price,
            detail_url,
            image_url: self.image_url.unwrap_or_default(),
            sku: self.sku,
        })
    }
}

impl Candidate {
    pub fn into_product(self, platform: Platform, sequence_id: u32) -> ExtractedProduct {
        ExtractedProduct {
            sequence_id,
            title: self.title,
            price: self.price,
            image_url: self.image_url,
            detail_url: self.detail_url,
            platform,
            sku: self.sku,
            query: None,
        }
    }
}
