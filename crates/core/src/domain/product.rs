use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use crate::errors::{CatalogError, FieldError, ValidationError};

/// Display label for products stored without a category.
pub const UNCATEGORIZED: &str = "Uncategorized";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub Uuid);

impl ProductId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Rejects anything that is not a hyphenated UUID before it reaches storage.
    pub fn parse(raw: &str) -> Result<Self, CatalogError> {
        let trimmed = raw.trim();
        if trimmed.len() != 36 {
            return Err(CatalogError::MalformedId(raw.to_string()));
        }
        Uuid::parse_str(trimmed).map(Self).map_err(|_| CatalogError::MalformedId(raw.to_string()))
    }
}

impl Default for ProductId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for ProductId {
    type Err = CatalogError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Price(Decimal);

impl Price {
    pub fn new(amount: Decimal) -> Result<Self, FieldError> {
        if amount <= Decimal::ZERO {
            return Err(FieldError::new("price", "price must be a positive number"));
        }
        Ok(Self(amount.normalize()))
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }

    /// Parses a stored or typed amount. Accepts plain and scientific notation.
    pub fn parse_amount(raw: &str) -> Option<Decimal> {
        let trimmed = raw.trim();
        Decimal::from_str(trimmed).or_else(|_| Decimal::from_scientific(trimmed)).ok()
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0.to_f64() {
            Some(value) => serializer.serialize_f64(value),
            None => serializer.serialize_str(&self.0.to_string()),
        }
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let input = PriceInput::deserialize(deserializer)?;
        let amount = input.amount().ok_or_else(|| {
            serde::de::Error::custom(format!("price `{input}` is not a number"))
        })?;
        // Stored records are trusted; only the sign is enforced here.
        if amount < Decimal::ZERO {
            return Err(serde::de::Error::custom("price must not be negative"));
        }
        Ok(Self(amount))
    }
}

/// Price as it arrives over the wire: a JSON number or a string holding one.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PriceInput {
    Number(f64),
    Text(String),
}

impl PriceInput {
    fn is_blank(&self) -> bool {
        matches!(self, Self::Text(text) if text.trim().is_empty())
    }

    fn amount(&self) -> Option<Decimal> {
        match self {
            Self::Number(value) if value.is_finite() => Price::parse_amount(&value.to_string()),
            Self::Number(_) => None,
            Self::Text(text) => Price::parse_amount(text),
        }
    }

    pub fn to_price(&self) -> Result<Price, FieldError> {
        if self.is_blank() {
            return Err(FieldError::new("price", "price is required"));
        }
        let amount = self
            .amount()
            .ok_or_else(|| FieldError::new("price", "price must be a positive number"))?;
        Price::new(amount)
    }
}

impl fmt::Display for PriceInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

impl From<Price> for PriceInput {
    fn from(price: Price) -> Self {
        price.0.to_f64().map(Self::Number).unwrap_or_else(|| Self::Text(price.0.to_string()))
    }
}

/// Normalizes a category: blank text and the `Uncategorized` label both mean "no category".
pub fn normalize_category(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(UNCATEGORIZED) {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn create(new_product: NewProduct, now: DateTime<Utc>) -> Self {
        Self {
            id: ProductId::new(),
            name: new_product.name,
            price: new_product.price,
            image: new_product.image,
            category: new_product.category,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn category_label(&self) -> &str {
        self.category.as_deref().unwrap_or(UNCATEGORIZED)
    }

    /// Merges `patch` and moves `updated_at` strictly past its previous value.
    pub fn apply(mut self, patch: ProductPatch, now: DateTime<Utc>) -> Self {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(image) = patch.image {
            self.image = image;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        self.updated_at = next_timestamp(self.updated_at, now);
        self
    }
}

fn next_timestamp(previous: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}

/// Request body for create and update. Server-owned fields (`id`, timestamps) are not part of
/// it and are dropped during deserialization.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<PriceInput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewProduct {
    pub name: String,
    pub price: Price,
    pub image: String,
    pub category: Option<String>,
}

impl TryFrom<ProductInput> for NewProduct {
    type Error = ValidationError;

    fn try_from(input: ProductInput) -> Result<Self, Self::Error> {
        let mut errors = ValidationError::default();

        let name = required_text(input.name.as_deref(), "name", "name is required", &mut errors);
        let price = match &input.price {
            Some(price) => price.to_price().map_err(|error| errors.push(error)).ok(),
            None => {
                errors.push(FieldError::new("price", "price is required"));
                None
            }
        };
        let image = required_text(input.image.as_deref(), "image", "image is required", &mut errors);
        let category = input.category.as_deref().and_then(normalize_category);

        match (name, price, image) {
            (Some(name), Some(price), Some(image)) if errors.is_empty() => {
                Ok(Self { name, price, image, category })
            }
            _ => Err(errors),
        }
    }
}

/// Partial update. `category: Some(None)` clears the category.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub price: Option<Price>,
    pub image: Option<String>,
    pub category: Option<Option<String>>,
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.price.is_none() && self.image.is_none() && self.category.is_none()
    }
}

impl TryFrom<ProductInput> for ProductPatch {
    type Error = ValidationError;

    fn try_from(input: ProductInput) -> Result<Self, Self::Error> {
        let mut errors = ValidationError::default();

        let name = input.name.as_deref().and_then(|name| {
            required_text(Some(name), "name", "name must not be empty", &mut errors)
        });
        let price = input
            .price
            .as_ref()
            .and_then(|price| price.to_price().map_err(|error| errors.push(error)).ok());
        let image = input.image.as_deref().and_then(|image| {
            required_text(Some(image), "image", "image must not be empty", &mut errors)
        });
        let category = input.category.as_deref().map(normalize_category);

        if errors.is_empty() {
            Ok(Self { name, price, image, category })
        } else {
            Err(errors)
        }
    }
}

fn required_text(
    value: Option<&str>,
    field: &'static str,
    message: &'static str,
    errors: &mut ValidationError,
) -> Option<String> {
    match value.map(str::trim) {
        Some(text) if !text.is_empty() => Some(text.to_string()),
        _ => {
            errors.push(FieldError::new(field, message));
            None
        }
    }
}
