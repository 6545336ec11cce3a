//! The artwork catalog.
//!
//! The catalog is a fixed, ordered list of products compiled into the binary
//! from `content/catalog.json`. It is validated once at startup and never
//! mutated afterwards; everything else in the storefront only reads from it.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use atelier_core::{CurrencyCode, Price, ProductId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Catalog data shipped with the binary.
const BUILTIN_CATALOG: &str = include_str!("../content/catalog.json");

/// Number of products shown on the home page.
pub const FEATURED_COUNT: usize = 3;

/// Label of the catch-all gallery filter.
pub const ALL_CATEGORIES: &str = "All";

/// Errors found while loading the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("product has an empty id")]
    EmptyId,
    #[error("duplicate product id: {0}")]
    DuplicateId(ProductId),
    #[error("product {0} must have a positive price")]
    NonPositivePrice(ProductId),
    #[error("product {0} has an original price below its price")]
    OriginalBelowPrice(ProductId),
}

/// An artwork for sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub artist: String,
    pub price: Price,
    /// Pre-discount price, always at least `price` when present.
    pub original_price: Option<Price>,
    pub image: String,
    pub description: String,
    pub dimensions: String,
    pub medium: String,
    pub year: String,
    pub edition: String,
    pub category: String,
}

impl Product {
    /// Discount badge value, 0 when the work is not reduced.
    #[must_use]
    pub fn discount_percent(&self) -> u32 {
        self.original_price
            .as_ref()
            .map_or(0, |original| self.price.percent_off(original))
    }
}

/// Shape of one record in `catalog.json`.
#[derive(Debug, Deserialize)]
struct ProductRecord {
    id: String,
    title: String,
    artist: String,
    price: Decimal,
    original_price: Option<Decimal>,
    image: String,
    description: String,
    dimensions: String,
    medium: String,
    year: String,
    edition: String,
    category: String,
}

impl From<ProductRecord> for Product {
    fn from(record: ProductRecord) -> Self {
        Self {
            id: ProductId::new(record.id),
            title: record.title,
            artist: record.artist,
            price: Price::new(record.price, CurrencyCode::EUR),
            original_price: record
                .original_price
                .map(|amount| Price::new(amount, CurrencyCode::EUR)),
            image: record.image,
            description: record.description,
            dimensions: record.dimensions,
            medium: record.medium,
            year: record.year,
            edition: record.edition,
            category: record.category,
        }
    }
}

/// Gallery filter selection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Category {
    /// No filtering.
    #[default]
    All,
    /// Only products whose category label matches exactly.
    Named(String),
}

impl Category {
    /// Interpret an optional filter value. Missing, blank or `"All"` means no filter.
    #[must_use]
    pub fn from_query(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("" | ALL_CATEGORIES) => Self::All,
            Some(name) => Self::Named(name.to_owned()),
        }
    }

    /// Label shown on the filter button.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::All => ALL_CATEGORIES,
            Self::Named(name) => name,
        }
    }

    /// Whether a product passes this filter.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        match self {
            Self::All => true,
            Self::Named(name) => product.category == *name,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Category {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// The immutable, ordered product list.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Arc<Product>>,
    categories: Vec<Category>,
}

impl Catalog {
    /// Load the catalog compiled into the binary.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the bundled data is malformed or violates a
    /// product invariant.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    /// Parse and validate a catalog from JSON.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the JSON is malformed or a product is invalid.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let records: Vec<ProductRecord> = serde_json::from_str(json)?;
        Self::from_products(records.into_iter().map(Product::from).collect())
    }

    /// Build a catalog from products, keeping their order.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` on an empty or duplicate id, a non-positive
    /// price, or an original price below the price.
    pub fn from_products(products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(products.len());
        for product in &products {
            if product.id.is_empty() {
                return Err(CatalogError::EmptyId);
            }
            if !seen.insert(product.id.clone()) {
                return Err(CatalogError::DuplicateId(product.id.clone()));
            }
            if !product.price.is_positive() {
                return Err(CatalogError::NonPositivePrice(product.id.clone()));
            }
            if product
                .original_price
                .is_some_and(|original| original.amount < product.price.amount)
            {
                return Err(CatalogError::OriginalBelowPrice(product.id.clone()));
            }
        }

        // "All" first, then each category in order of first appearance.
        let mut categories = vec![Category::All];
        for product in &products {
            let category = Category::Named(product.category.clone());
            if !categories.contains(&category) {
                categories.push(category);
            }
        }

        Ok(Self {
            products: products.into_iter().map(Arc::new).collect(),
            categories,
        })
    }

    /// All products in catalog order.
    #[must_use]
    pub fn products(&self) -> &[Arc<Product>] {
        &self.products
    }

    /// Look up a product by id.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&Arc<Product>> {
        self.products.iter().find(|p| p.id == *id)
    }

    /// The products highlighted on the home page.
    #[must_use]
    pub fn featured(&self) -> &[Arc<Product>] {
        let end = FEATURED_COUNT.min(self.products.len());
        self.products.get(..end).unwrap_or_default()
    }

    /// Available gallery filters, `All` first.
    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Products passing the given filter, in catalog order.
    pub fn filter<'a>(&'a self, category: &'a Category) -> impl Iterator<Item = &'a Arc<Product>> {
        self.products.iter().filter(move |p| category.matches(p))
    }

    /// Number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog has no products.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
