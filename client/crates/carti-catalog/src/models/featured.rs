use crate::CatalogError;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Curated product id lists of a tab.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Featured {
    #[serde(default)]
    pub new_arrivals: Vec<String>,
    #[serde(default)]
    pub best_sellers: Vec<String>,
    #[serde(default)]
    pub deals: Vec<String>,
}

impl Featured {
    pub fn ids(&self, list: FeaturedList) -> &[String] {
        match list {
            FeaturedList::NewArrivals => &self.new_arrivals,
            FeaturedList::BestSellers => &self.best_sellers,
            FeaturedList::Deals => &self.deals,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeaturedList {
    NewArrivals,
    BestSellers,
    Deals,
}

impl FeaturedList {
    pub const ALL: [Self; 3] = [Self::NewArrivals, Self::BestSellers, Self::Deals];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::NewArrivals => "new-arrivals",
            Self::BestSellers => "best-sellers",
            Self::Deals => "deals",
        }
    }
}

impl fmt::Display for FeaturedList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeaturedList {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "new-arrivals" | "newarrivals" => Ok(Self::NewArrivals),
            "best-sellers" | "bestsellers" => Ok(Self::BestSellers),
            "deals" => Ok(Self::Deals),
            _ => Err(CatalogError::unknown_featured_list(s)),
        }
    }
}
