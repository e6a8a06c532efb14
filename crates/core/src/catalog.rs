//! Derived views over a product snapshot: search, category filter, sort and summary figures.
//!
//! Everything here is pure and works on borrowed slices so the same rules back the terminal
//! client and the server-rendered storefront page.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::product::{Product, UNCATEGORIZED};

pub const ALL_CATEGORIES: &str = "all";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Named(String),
}

impl CategoryFilter {
    pub fn matches(&self, product: &Product) -> bool {
        match self {
            Self::All => true,
            Self::Named(label) => product.category_label() == label,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::All => ALL_CATEGORIES,
            Self::Named(label) => label,
        }
    }
}

impl From<&str> for CategoryFilter {
    fn from(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(ALL_CATEGORIES) {
            Self::All
        } else if trimmed.eq_ignore_ascii_case(UNCATEGORIZED) {
            Self::Named(UNCATEGORIZED.to_string())
        } else {
            Self::Named(trimmed.to_string())
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    #[default]
    NameAsc,
    NameDesc,
    PriceAsc,
    PriceDesc,
}

impl SortOrder {
    pub const ALL: [SortOrder; 4] =
        [SortOrder::NameAsc, SortOrder::NameDesc, SortOrder::PriceAsc, SortOrder::PriceDesc];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::NameAsc => "name-asc",
            Self::NameDesc => "name-desc",
            Self::PriceAsc => "price-asc",
            Self::PriceDesc => "price-desc",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::NameAsc => "Name (A-Z)",
            Self::NameDesc => "Name (Z-A)",
            Self::PriceAsc => "Price (Low-High)",
            Self::PriceDesc => "Price (High-Low)",
        }
    }

    fn compare(self, a: &Product, b: &Product) -> Ordering {
        match self {
            Self::NameAsc => name_key(a).cmp(&name_key(b)),
            Self::NameDesc => name_key(b).cmp(&name_key(a)),
            Self::PriceAsc => a.price.cmp(&b.price),
            Self::PriceDesc => b.price.cmp(&a.price),
        }
    }
}

fn name_key(product: &Product) -> String {
    product.name.to_lowercase()
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "name-asc" => Ok(Self::NameAsc),
            "name-desc" => Ok(Self::NameDesc),
            "price-asc" => Ok(Self::PriceAsc),
            "price-desc" => Ok(Self::PriceDesc),
            other => Err(format!(
                "unsupported sort `{other}` (expected name-asc|name-desc|price-asc|price-desc)"
            )),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    #[default]
    Grid,
    List,
}

impl FromStr for Layout {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "grid" => Ok(Self::Grid),
            "list" => Ok(Self::List),
            other => Err(format!("unsupported layout `{other}` (expected grid|list)")),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CatalogQuery {
    pub search: String,
    pub category: CategoryFilter,
    pub sort: SortOrder,
}

impl CatalogQuery {
    pub fn is_filtered(&self) -> bool {
        !self.search.is_empty() || self.category != CategoryFilter::All
    }

    /// Drops search text and category, keeps the sort order.
    pub fn clear_filters(&mut self) {
        self.search.clear();
        self.category = CategoryFilter::All;
    }

    pub fn matches(&self, product: &Product) -> bool {
        let needle = self.search.to_lowercase();
        (needle.is_empty() || product.name.to_lowercase().contains(&needle))
            && self.category.matches(product)
    }
}

/// Filters then sorts. Products with equal sort keys keep their snapshot order.
pub fn apply<'a>(products: &'a [Product], query: &CatalogQuery) -> Vec<&'a Product> {
    let mut visible: Vec<&Product> =
        products.iter().filter(|product| query.matches(product)).collect();
    visible.sort_by(|a, b| query.sort.compare(a, b));
    visible
}

/// `all` followed by each distinct category label, in first-seen order.
pub fn categories(products: &[Product]) -> Vec<String> {
    let mut labels = vec![ALL_CATEGORIES.to_string()];
    for product in products {
        let label = product.category_label();
        if !labels.iter().any(|existing| existing == label) {
            labels.push(label.to_string());
        }
    }
    labels
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CatalogStats {
    pub count: usize,
    pub total_value: Decimal,
    pub average_price: Decimal,
}

impl CatalogStats {
    /// A total past the `Decimal` range is reported as `Decimal::MAX`; the average is then
    /// taken per product so it stays exact enough to show.
    pub fn from_products(products: &[Product]) -> Self {
        let count = products.len();
        if count == 0 {
            return Self { count, total_value: Decimal::ZERO, average_price: Decimal::ZERO };
        }

        let divisor = Decimal::from(count);
        let total = products
            .iter()
            .try_fold(Decimal::ZERO, |sum, product| sum.checked_add(product.price.amount()));
        let (total_value, average) = match total {
            Some(total) => (total, total / divisor),
            None => {
                let average = products.iter().fold(Decimal::ZERO, |sum, product| {
                    sum.checked_add(product.price.amount() / divisor).unwrap_or(Decimal::MAX)
                });
                (Decimal::MAX, average)
            }
        };
        Self { count, total_value, average_price: average.round_dp(2) }
    }
}
