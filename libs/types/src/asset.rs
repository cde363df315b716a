//! Asset records
//!
//! An asset is valued by its confidentiality/integrity/availability triad.

use crate::errors::ValidationError;
use crate::ids::AssetId;
use crate::scale::{self, NAME_MAX_LEN};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Asset category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetCategory {
    Hardware,
    Software,
    Data,
    Service,
    Person,
}

impl fmt::Display for AssetCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AssetCategory::Hardware => "Hardware",
            AssetCategory::Software => "Software",
            AssetCategory::Data => "Data",
            AssetCategory::Service => "Service",
            AssetCategory::Person => "Person",
        };
        f.write_str(label)
    }
}

/// Confidentiality/integrity/availability ratings, each 1-3
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CidRatings {
    pub confidentiality: u8,
    pub integrity: u8,
    pub availability: u8,
}

impl CidRatings {
    pub fn new(confidentiality: u8, integrity: u8, availability: u8) -> Self {
        Self {
            confidentiality,
            integrity,
            availability,
        }
    }

    /// Check every component against the 1-3 scale
    pub fn validate(&self) -> Result<(), ValidationError> {
        scale::validate_cid("confidentiality", self.confidentiality)?;
        scale::validate_cid("integrity", self.integrity)?;
        scale::validate_cid("availability", self.availability)?;
        Ok(())
    }
}

impl Default for CidRatings {
    fn default() -> Self {
        Self::new(scale::CID_MIN, scale::CID_MIN, scale::CID_MIN)
    }
}

/// Organizational resource under assessment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub asset_id: AssetId,
    pub name: String,
    pub category: AssetCategory,
    pub process: Option<String>,
    pub owner: Option<String>,
    pub description: Option<String>,
    pub ratings: CidRatings,
    pub created_at: i64, // Unix nanos
}

impl Asset {
    /// Create a new asset with default (1,1,1) ratings
    pub fn new(name: impl Into<String>, category: AssetCategory, timestamp: i64) -> Self {
        Self {
            asset_id: AssetId::new(),
            name: name.into(),
            category,
            process: None,
            owner: None,
            description: None,
            ratings: CidRatings::default(),
            created_at: timestamp,
        }
    }

    pub fn with_ratings(mut self, ratings: CidRatings) -> Self {
        self.ratings = ratings;
        self
    }

    pub fn with_owner(mut self, process: Option<&str>, owner: Option<&str>) -> Self {
        self.process = process.map(str::to_string);
        self.owner = owner.map(str::to_string);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Validate stored fields before the record is written
    pub fn validate(&self) -> Result<(), ValidationError> {
        scale::validate_required_text("name", &self.name, NAME_MAX_LEN)?;
        scale::validate_length("process", self.process.as_deref(), NAME_MAX_LEN)?;
        scale::validate_length("owner", self.owner.as_deref(), NAME_MAX_LEN)?;
        self.ratings.validate()
    }
}
