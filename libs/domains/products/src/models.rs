use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Longest accepted product name, in characters
pub const MAX_NAME_CHARS: u64 = 191;

/// Brands offered by the catalog form. Advisory: `brand` is free text.
pub const KNOWN_BRANDS: &[&str] = &[
    "Xerox",
    "Panasonic",
    "Toshiba",
    "Sony",
    "Samsung",
    "Apple",
    "Dell",
    "LG",
    "Asus",
    "Canon",
    "Bose",
    "Xiaomi",
    "HP",
    "Google",
    "Lenovo",
    "JBL",
    "DJI",
    "Razer",
    "Logitech",
    "Microsoft",
    "Anker",
    "Philips",
    "GoPro",
];

fn validate_finite(price: f64) -> Result<(), validator::ValidationError> {
    if !price.is_finite() {
        return Err(validator::ValidationError::new("not_finite"));
    }
    Ok(())
}

/// Catalog product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Database generated identifier
    pub id: i32,
    pub name: String,
    pub price: f64,
    pub brand: Option<String>,
    /// Public path of the stored image, empty when none was uploaded
    pub image: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated name, price and brand shared by create and update
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct ProductInput {
    #[validate(length(min = 1, max = MAX_NAME_CHARS))]
    pub name: String,
    #[validate(custom(function = "validate_finite"))]
    pub price: f64,
    pub brand: Option<String>,
}

impl ProductInput {
    pub fn into_create(self, image: Option<String>) -> CreateProduct {
        CreateProduct {
            name: self.name,
            price: self.price,
            brand: self.brand,
            image: image.unwrap_or_default(),
        }
    }

    pub fn into_update(self, image: Option<String>) -> UpdateProduct {
        UpdateProduct {
            name: self.name,
            price: self.price,
            brand: self.brand,
            image,
        }
    }
}

/// Row to insert
#[derive(Debug, Clone, PartialEq)]
pub struct CreateProduct {
    pub name: String,
    pub price: f64,
    pub brand: Option<String>,
    pub image: String,
}

/// Full overwrite of name, price and brand; `image` only when `Some`
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateProduct {
    pub name: String,
    pub price: f64,
    pub brand: Option<String>,
    pub image: Option<String>,
}

impl Product {
    pub fn new(id: i32, input: CreateProduct) -> Self {
        let now = Utc::now();
        Self {
            id,
            name: input.name,
            price: input.price,
            brand: input.brand,
            image: input.image,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply_update(&mut self, update: UpdateProduct) {
        self.name = update.name;
        self.price = update.price;
        self.brand = update.brand;
        if let Some(image) = update.image {
            self.image = image;
        }
        self.updated_at = Utc::now();
    }
}

/// Acknowledgement returned by delete
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeleteResponse {
    pub message: String,
}

impl DeleteResponse {
    pub fn for_product(id: i32) -> Self {
        Self {
            message: format!("Product {} deleted", id),
        }
    }
}
