//! HTTP handlers for Products API

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, Query, State},
    http::HeaderMap,
    routing::get,
};
use axum_helpers::{
    AuditEvent, AuditOutcome, IdPath,
    errors::responses::{
        BadRequestIdResponse, BadRequestValidationResponse, InternalServerErrorResponse,
        NotFoundResponse,
    },
};
use core_config::uploads::UploadConfig;
use serde_json::json;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::ProductResult;
use crate::filter::{AppliedFilters, ListProductsParams, ProductPage};
use crate::form::{ProductForm, ProductMultipart};
use crate::models::{DeleteResponse, Product};
use crate::repository::ProductRepository;
use crate::service::ProductService;
use crate::storage::ImageStore;

/// Room for the text fields next to the image part
const FORM_FIELDS_ALLOWANCE: usize = 64 * 1024;

/// OpenAPI documentation for Products API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_products,
        create_product,
        list_brands,
        get_product,
        update_product,
        delete_product,
    ),
    components(
        schemas(Product, ProductPage, AppliedFilters, ProductMultipart, DeleteResponse),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestIdResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Products", description = "Product catalog endpoints")
    )
)]
pub struct ApiDoc;

type SharedService<R, S> = Arc<ProductService<R, S>>;

/// Create the products router
///
/// The body limit is raised so an image of `uploads.max_bytes` fits alongside
/// the text fields; the image store enforces the exact limit.
pub fn router<R, S>(service: ProductService<R, S>, uploads: &UploadConfig) -> Router
where
    R: ProductRepository + 'static,
    S: ImageStore + 'static,
{
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/brands", get(list_brands))
        .route(
            "/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .layer(DefaultBodyLimit::max(
            uploads.max_bytes.saturating_add(FORM_FIELDS_ALLOWANCE),
        ))
        .with_state(shared_service)
}

/// List products, filtered and paginated
#[utoipa::path(
    get,
    path = "",
    tag = "Products",
    params(ListProductsParams),
    responses(
        (status = 200, description = "One page of products", body = ProductPage),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_products<R: ProductRepository, S: ImageStore>(
    State(service): State<SharedService<R, S>>,
    Query(params): Query<ListProductsParams>,
) -> ProductResult<Json<ProductPage>> {
    let page = service.list_products(params).await?;
    Ok(Json(page))
}

/// Create a product from a multipart form
#[utoipa::path(
    post,
    path = "",
    tag = "Products",
    request_body(content = ProductMultipart, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Product created", body = Product),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_product<R: ProductRepository, S: ImageStore>(
    State(service): State<SharedService<R, S>>,
    headers: HeaderMap,
    multipart: Multipart,
) -> ProductResult<Json<Product>> {
    let result = match ProductForm::from_multipart(multipart).await {
        Ok(form) => service.create_product(form).await,
        Err(e) => Err(e),
    };

    match &result {
        Ok(product) => AuditEvent::new(
            "product.create",
            Some(format!("product:{}", product.id)),
            AuditOutcome::Success,
        )
        .with_request_headers(&headers)
        .with_details(json!({ "name": product.name, "image": product.image }))
        .log(),
        Err(e) => AuditEvent::new("product.create", None, AuditOutcome::Failure)
            .with_request_headers(&headers)
            .with_details(json!({ "error": e.to_string() }))
            .log(),
    }

    Ok(Json(result?))
}

/// Known brand names for the product form
#[utoipa::path(
    get,
    path = "/brands",
    tag = "Products",
    responses(
        (status = 200, description = "Advisory brand list", body = Vec<String>)
    )
)]
async fn list_brands<R: ProductRepository, S: ImageStore>(
    State(service): State<SharedService<R, S>>,
) -> Json<Vec<String>> {
    Json(service.known_brands())
}

/// Get a product by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = i32, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product found", body = Product),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_product<R: ProductRepository, S: ImageStore>(
    State(service): State<SharedService<R, S>>,
    IdPath(id): IdPath,
) -> ProductResult<Json<Product>> {
    let product = service.get_product(id).await?;
    Ok(Json(product))
}

/// Update a product; the image is replaced only when a new file is sent
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = i32, Path, description = "Product ID")
    ),
    request_body(content = ProductMultipart, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Product updated", body = Product),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_product<R: ProductRepository, S: ImageStore>(
    State(service): State<SharedService<R, S>>,
    IdPath(id): IdPath,
    headers: HeaderMap,
    multipart: Multipart,
) -> ProductResult<Json<Product>> {
    let result = match ProductForm::from_multipart(multipart).await {
        Ok(form) => service.update_product(id, form).await,
        Err(e) => Err(e),
    };

    let outcome = if result.is_ok() {
        AuditOutcome::Success
    } else {
        AuditOutcome::Failure
    };
    let details = match &result {
        Ok(product) => json!({ "name": product.name, "image": product.image }),
        Err(e) => json!({ "error": e.to_string() }),
    };
    AuditEvent::new("product.update", Some(format!("product:{id}")), outcome)
        .with_request_headers(&headers)
        .with_details(details)
        .log();

    Ok(Json(result?))
}

/// Delete a product; succeeds whether or not it existed
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = i32, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Delete acknowledged", body = DeleteResponse),
        (status = 400, response = BadRequestIdResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_product<R: ProductRepository, S: ImageStore>(
    State(service): State<SharedService<R, S>>,
    IdPath(id): IdPath,
    headers: HeaderMap,
) -> ProductResult<Json<DeleteResponse>> {
    let deleted = service.delete_product(id).await?;

    AuditEvent::new("product.delete", Some(format!("product:{id}")), AuditOutcome::Success)
        .with_request_headers(&headers)
        .with_details(json!({ "existed": deleted }))
        .log();

    Ok(Json(DeleteResponse::for_product(id)))
}
