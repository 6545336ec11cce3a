//! Screen view models.
//!
//! Every navigation produces a [`Page`]: the resolved route, the cart badge
//! count and one [`Screen`] carrying the props that screen needs. View models
//! are read-only snapshots built from the catalog, cart and checkout; screens
//! never hold references back into session state.

use atelier_core::{CheckoutId, CheckoutStatus, ProductId};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::cart::{Cart, CartEntry};
use crate::catalog::{Catalog, Category, Product};
use crate::checkout::{Checkout, REQUIRED_FIELDS};
use crate::router::Route;

/// Message shown by the cart screen when there is nothing in it.
pub const EMPTY_CART_MESSAGE: &str = "Your cart is empty";

/// A fully resolved screen.
#[derive(Debug, Clone, Serialize)]
pub struct Page {
    pub route: Route,
    /// Badge value: total units in the cart.
    pub cart_item_count: u64,
    #[serde(flatten)]
    pub screen: Screen,
    /// One-shot message from the last intent, e.g. "Added Fluid Dreams to cart".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

/// Screen identity plus its props.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "screen", content = "props", rename_all = "snake_case")]
pub enum Screen {
    Home(HomeView),
    Gallery(GalleryView),
    About(StudioView),
    Product(ProductView),
    Cart(CartView),
    Checkout(CheckoutView),
}

// =============================================================================
// Products
// =============================================================================

/// A product as shown on cards and the detail screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductView {
    pub id: ProductId,
    pub path: String,
    pub title: String,
    pub artist: String,
    pub price: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_price: Option<String>,
    /// Badge value, absent when the work is not reduced.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_percent: Option<u32>,
    pub image: String,
    pub description: String,
    pub dimensions: String,
    pub medium: String,
    pub year: String,
    pub edition: String,
    pub category: String,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        let discount = product.discount_percent();
        Self {
            id: product.id.clone(),
            path: Route::Product(product.id.clone()).path(),
            title: product.title.clone(),
            artist: product.artist.clone(),
            price: product.price.display(),
            original_price: product.original_price.map(|p| p.display()),
            discount_percent: (discount > 0).then_some(discount),
            image: product.image.clone(),
            description: product.description.clone(),
            dimensions: product.dimensions.clone(),
            medium: product.medium.clone(),
            year: product.year.clone(),
            edition: product.edition.clone(),
            category: product.category.clone(),
        }
    }
}

/// Landing page.
#[derive(Debug, Clone, Serialize)]
pub struct HomeView {
    pub eyebrow: &'static str,
    pub headline: &'static str,
    pub tagline: &'static str,
    pub featured: Vec<ProductView>,
}

impl HomeView {
    #[must_use]
    pub fn new(catalog: &Catalog) -> Self {
        Self {
            eyebrow: "Limited Edition Collection 2024",
            headline: "Original Artworks by Elena Virtanen",
            tagline: "Discover unique contemporary pieces that transform your space. \
                      Each artwork is an original creation, signed and authenticated.",
            featured: catalog
                .featured()
                .iter()
                .map(|p| ProductView::from(p.as_ref()))
                .collect(),
        }
    }
}

/// One filter button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryOption {
    pub label: String,
    pub path: String,
    pub selected: bool,
}

/// Filterable product grid.
#[derive(Debug, Clone, Serialize)]
pub struct GalleryView {
    pub categories: Vec<CategoryOption>,
    pub selected: Category,
    pub products: Vec<ProductView>,
    pub count: usize,
    /// "6 works", "1 work", "0 works".
    pub count_label: String,
}

impl GalleryView {
    /// Project the catalog through `selected`.
    ///
    /// A category with no products yields an empty grid, not an error.
    #[must_use]
    pub fn new(catalog: &Catalog, selected: &Category) -> Self {
        let categories = catalog
            .categories()
            .iter()
            .map(|category| CategoryOption {
                label: category.label().to_owned(),
                path: Route::Gallery {
                    category: category.clone(),
                }
                .path(),
                selected: category == selected,
            })
            .collect();

        let products: Vec<ProductView> = catalog
            .filter(selected)
            .map(|p| ProductView::from(p.as_ref()))
            .collect();
        let count = products.len();

        Self {
            categories,
            selected: selected.clone(),
            products,
            count,
            count_label: match count {
                1 => "1 work".to_owned(),
                n => format!("{n} works"),
            },
        }
    }
}

// =============================================================================
// Studio
// =============================================================================

/// A recognition line on the about screen.
#[derive(Debug, Clone, Serialize)]
pub struct Highlight {
    pub title: &'static str,
    pub detail: &'static str,
}

/// Static studio information for the about screen.
#[derive(Debug, Clone, Serialize)]
pub struct StudioView {
    pub name: &'static str,
    pub artist: &'static str,
    pub location: &'static str,
    pub email: &'static str,
    pub phone: &'static str,
    pub bio: Vec<&'static str>,
    pub highlights: Vec<Highlight>,
    pub philosophy: &'static str,
}

impl Default for StudioView {
    fn default() -> Self {
        Self {
            name: "Elena Virtanen Studio",
            artist: "Elena Virtanen",
            location: "Helsinki, Finland",
            email: "info@elenavirtanen.art",
            phone: "+358 40 123 4567",
            bio: vec![
                "Born in Helsinki, Finland, Elena Virtanen has been creating art for over a \
                 decade, developing a distinctive style that merges contemporary abstract \
                 expressionism with Nordic minimalism.",
                "Her work is characterized by bold use of color, dynamic compositions, and a \
                 deep exploration of emotional resonance through visual form.",
                "Elena's paintings are held in private collections across Europe, North \
                 America, and Asia. She works exclusively with premium archival materials.",
            ],
            highlights: vec![
                Highlight {
                    title: "Featured Artist",
                    detail: "Nordic Contemporary Art Fair 2023",
                },
                Highlight {
                    title: "Solo Exhibition",
                    detail: "Gallery Musta, Helsinki 2022",
                },
                Highlight {
                    title: "International Recognition",
                    detail: "Works in collections across 15+ countries",
                },
            ],
            philosophy: "Art should not merely decorate walls, but transform spaces and evoke \
                         emotions.",
        }
    }
}

// =============================================================================
// Cart
// =============================================================================

/// One cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartItemView {
    pub product_id: ProductId,
    pub path: String,
    pub title: String,
    pub artist: String,
    pub image: String,
    pub unit_price: String,
    pub quantity: u32,
    pub line_total: String,
}

impl From<&CartEntry> for CartItemView {
    fn from(entry: &CartEntry) -> Self {
        let product = &entry.product;
        Self {
            product_id: product.id.clone(),
            path: Route::Product(product.id.clone()).path(),
            title: product.title.clone(),
            artist: product.artist.clone(),
            image: product.image.clone(),
            unit_price: product.price.display(),
            quantity: entry.quantity.get(),
            line_total: entry.line_total().display(),
        }
    }
}

/// Cart contents and totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub item_count: u64,
    pub subtotal: String,
    /// "Free" when no shipping is charged.
    pub shipping: String,
    pub total: String,
    /// Set instead of an empty item list rendering as a blank screen.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_message: Option<&'static str>,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        let shipping = cart.shipping();
        Self {
            items: cart.entries().iter().map(CartItemView::from).collect(),
            item_count: cart.total_item_count(),
            subtotal: cart.subtotal().display(),
            shipping: if shipping.is_zero() {
                "Free".to_owned()
            } else {
                shipping.display()
            },
            total: cart.total().display(),
            empty_message: cart.is_empty().then_some(EMPTY_CART_MESSAGE),
        }
    }
}

// =============================================================================
// Checkout
// =============================================================================

/// Shown once settlement has completed.
#[derive(Debug, Clone, Serialize)]
pub struct ConfirmationView {
    pub title: &'static str,
    pub message: &'static str,
    pub email: String,
    pub submitted_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// The checkout screen in any of its three states.
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutView {
    pub checkout_id: CheckoutId,
    pub status: CheckoutStatus,
    pub required_fields: &'static [&'static str],
    /// While `Idle` this is the live cart; afterwards, what was ordered.
    pub summary: CartView,
    /// Mirrors the disabled submit button.
    pub can_submit: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmation: Option<ConfirmationView>,
}

impl CheckoutView {
    #[must_use]
    pub fn new(checkout: &Checkout, cart: &Cart) -> Self {
        let summary = checkout
            .order()
            .map_or_else(|| CartView::from(cart), |order| CartView::from(&order.cart));
        let confirmation = match (checkout.status(), checkout.order()) {
            (CheckoutStatus::Complete, Some(order)) => Some(ConfirmationView {
                title: "Order Confirmed!",
                message: "Thank you for your purchase. You will receive a confirmation \
                          email shortly with tracking information.",
                email: order.email.clone(),
                submitted_at: order.submitted_at,
                completed_at: order.completed_at,
            }),
            _ => None,
        };

        Self {
            checkout_id: checkout.id(),
            status: checkout.status(),
            required_fields: REQUIRED_FIELDS,
            summary,
            can_submit: checkout.status() == CheckoutStatus::Idle && !cart.is_empty(),
            confirmation,
        }
    }
}
