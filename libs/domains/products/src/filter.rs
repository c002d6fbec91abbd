//! List query parsing: raw query string parameters into a predicate and a
//! pagination window.

use sea_orm::sea_query::{Expr, ExprTrait, Func, LikeExpr};
use sea_orm::{ColumnTrait, Condition};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::entity::Column;
use crate::error::{ProductError, ProductResult};
use crate::models::Product;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 5;
pub const DEFAULT_MIN_PRICE: f64 = 0.0;

/// Largest row offset Postgres accepts for `OFFSET` (a `bigint`)
const MAX_OFFSET: u64 = i64::MAX as u64;

const LIKE_ESCAPE: char = '\\';

/// Query string of `GET /products`, kept as raw strings so that an empty
/// value reads as absent and a malformed one can be reported by name.
#[derive(Debug, Default, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListProductsParams {
    /// 1-based page number (default 1)
    pub page: Option<String>,
    /// Page size (default 5)
    pub limit: Option<String>,
    /// Inclusive lower price bound (default 0)
    pub min_price: Option<String>,
    /// Inclusive upper price bound, only applied when given
    pub max_price: Option<String>,
    /// Case-insensitive substring of the brand
    pub brand: Option<String>,
    /// Case-insensitive substring of the name
    pub search: Option<String>,
}

/// Conjunction of the active list predicates.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductFilter {
    pub min_price: f64,
    pub max_price: Option<f64>,
    pub brand: Option<String>,
    pub search: Option<String>,
}

impl Default for ProductFilter {
    fn default() -> Self {
        Self {
            min_price: DEFAULT_MIN_PRICE,
            max_price: None,
            brand: None,
            search: None,
        }
    }
}

impl ProductFilter {
    /// The filter as a SeaORM condition.
    pub fn condition(&self) -> Condition {
        let mut condition = Condition::all().add(Column::Price.gte(self.min_price));

        if let Some(max_price) = self.max_price {
            condition = condition.add(Column::Price.lte(max_price));
        }
        if let Some(brand) = &self.brand {
            condition = condition.add(contains_ignore_case(Column::Brand, brand));
        }
        if let Some(search) = &self.search {
            condition = condition.add(contains_ignore_case(Column::Name, search));
        }

        condition
    }

    /// Same predicate evaluated in memory.
    pub fn matches(&self, product: &Product) -> bool {
        if product.price < self.min_price {
            return false;
        }
        if let Some(max_price) = self.max_price {
            if product.price > max_price {
                return false;
            }
        }
        if let Some(brand) = &self.brand {
            match &product.brand {
                Some(value) if contains_lowercase(value, brand) => {}
                _ => return false,
            }
        }
        if let Some(search) = &self.search {
            if !contains_lowercase(&product.name, search) {
                return false;
            }
        }
        true
    }
}

fn contains_ignore_case(column: Column, needle: &str) -> Expr {
    let pattern = format!("%{}%", escape_like(&needle.to_lowercase()));
    Expr::expr(Func::lower(Expr::col(column))).like(LikeExpr::new(pattern).escape(LIKE_ESCAPE))
}

fn contains_lowercase(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Escape `%`, `_` and the escape character itself so user input matches literally.
fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '%' | '_') || c == LIKE_ESCAPE {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl Pagination {
    /// Rows before this page, clamped to the largest bindable offset.
    pub fn skip(&self) -> u64 {
        Ord::min(
            self.page.saturating_sub(1).saturating_mul(self.limit),
            MAX_OFFSET,
        )
    }

    pub fn take(&self) -> u64 {
        self.limit
    }
}

/// Parsed list request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductQuery {
    pub filter: ProductFilter,
    pub pagination: Pagination,
}

impl TryFrom<ListProductsParams> for ProductQuery {
    type Error = ProductError;

    fn try_from(params: ListProductsParams) -> ProductResult<Self> {
        let page = parse_positive("page", params.page.as_deref())?.unwrap_or(DEFAULT_PAGE);
        let limit = parse_positive("limit", params.limit.as_deref())?.unwrap_or(DEFAULT_LIMIT);
        let min_price =
            parse_price("minPrice", params.min_price.as_deref())?.unwrap_or(DEFAULT_MIN_PRICE);
        let max_price = parse_price("maxPrice", params.max_price.as_deref())?;

        if (page - 1)
            .checked_mul(limit)
            .is_none_or(|skip| skip > MAX_OFFSET)
        {
            return Err(ProductError::Validation(format!(
                "page {page} with limit {limit} is beyond the last addressable row"
            )));
        }

        Ok(Self {
            filter: ProductFilter {
                min_price,
                max_price,
                brand: non_blank(params.brand.as_deref()),
                search: non_blank(params.search.as_deref()),
            },
            pagination: Pagination { page, limit },
        })
    }
}

/// `None` for a missing or empty value.
fn present(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

fn non_blank(raw: Option<&str>) -> Option<String> {
    present(raw).map(str::to_string)
}

fn parse_positive(name: &str, raw: Option<&str>) -> ProductResult<Option<u64>> {
    let Some(raw) = present(raw) else {
        return Ok(None);
    };
    match raw.parse::<i64>() {
        Ok(value) if value >= 1 => Ok(Some(value as u64)),
        Ok(_) => Err(ProductError::Validation(format!("{name} must be at least 1"))),
        Err(_) => Err(ProductError::Validation(format!(
            "{name} must be an integer, got '{raw}'"
        ))),
    }
}

fn parse_price(name: &str, raw: Option<&str>) -> ProductResult<Option<f64>> {
    let Some(raw) = present(raw) else {
        return Ok(None);
    };
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(Some(value)),
        _ => Err(ProductError::Validation(format!(
            "{name} must be a finite number, got '{raw}'"
        ))),
    }
}

/// `ceil(total_count / limit)`; zero rows give zero pages.
pub fn total_pages(total_count: u64, limit: u64) -> u64 {
    if limit == 0 {
        return 0;
    }
    total_count.div_ceil(limit)
}

/// Effective filter values echoed back with a page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppliedFilters {
    pub min_price: f64,
    pub max_price: Option<f64>,
    pub brand: String,
    pub search: String,
}

impl From<&ProductFilter> for AppliedFilters {
    fn from(filter: &ProductFilter) -> Self {
        Self {
            min_price: filter.min_price,
            max_price: filter.max_price,
            brand: filter.brand.clone().unwrap_or_default(),
            search: filter.search.clone().unwrap_or_default(),
        }
    }
}

/// One page of the product list
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductPage {
    pub data: Vec<Product>,
    pub total_pages: u64,
    pub total_count: u64,
    pub filters: AppliedFilters,
}
