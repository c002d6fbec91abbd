use axum::extract::Multipart;
use utoipa::ToSchema;
use validator::Validate;

use crate::error::{ProductError, ProductResult};
use crate::models::ProductInput;
use crate::storage::ImageUpload;

/// Fields of the create/update form as submitted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductForm {
    pub name: Option<String>,
    pub price: Option<String>,
    pub brand: Option<String>,
    pub image: Option<ImageUpload>,
}

impl ProductForm {
    /// Collect the known parts of a multipart body; other parts are skipped.
    pub async fn from_multipart(mut multipart: Multipart) -> ProductResult<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ProductError::Multipart(e.body_text()))?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            match name.as_str() {
                "name" | "price" | "brand" => {
                    let value = field
                        .text()
                        .await
                        .map_err(|e| ProductError::Multipart(e.body_text()))?;
                    match name.as_str() {
                        "name" => form.name = Some(value),
                        "price" => form.price = Some(value),
                        _ => form.brand = Some(value),
                    }
                }
                "image" => {
                    let file_name = field.file_name().unwrap_or_default().to_string();
                    let content_type = field.content_type().map(str::to_string);
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|e| ProductError::Multipart(e.body_text()))?;

                    let upload = ImageUpload {
                        file_name,
                        content_type,
                        bytes,
                    };
                    form.image = (!upload.is_empty_selection()).then_some(upload);
                }
                _ => {}
            }
        }

        Ok(form)
    }

    /// Validate the text fields and split off the image.
    pub fn into_parts(self) -> ProductResult<(ProductInput, Option<ImageUpload>)> {
        let name = self
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .ok_or_else(|| ProductError::Validation("name is required".to_string()))?;

        let raw_price = self
            .price
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .ok_or_else(|| ProductError::Validation("price is required".to_string()))?;
        let price = raw_price.parse::<f64>().map_err(|_| {
            ProductError::Validation(format!("price must be a number, got '{raw_price}'"))
        })?;

        let brand = self
            .brand
            .map(|b| b.trim().to_string())
            .filter(|b| !b.is_empty());

        let input = ProductInput { name, price, brand };
        input
            .validate()
            .map_err(|e| ProductError::Validation(e.to_string()))?;

        Ok((input, self.image))
    }
}

/// Multipart body accepted by create and update
#[derive(ToSchema)]
pub struct ProductMultipart {
    /// 1 to 191 characters
    pub name: String,
    /// Decimal price
    #[schema(example = "129.99")]
    pub price: String,
    pub brand: Option<String>,
    /// Image file, at most 2 MiB with an `image/*` content type
    #[schema(value_type = Option<String>, format = Binary)]
    pub image: Option<Vec<u8>>,
}
