//! View router.
//!
//! Turns a navigation request (a path plus an optional gallery filter) into a
//! [`Route`], and a route plus a read-only view of the shopper's state into a
//! [`Page`]. Resolution never mutates the cart or catalog; the only state it
//! reads from the cart is what the screens display.
//!
//! # Paths
//!
//! | Path                          | Route                 |
//! |-------------------------------|-----------------------|
//! | `/`                           | `Home`                |
//! | `/gallery`                    | `Gallery` (All)       |
//! | `/gallery?category=Abstract`  | `Gallery` (Abstract)  |
//! | `/about`                      | `About`               |
//! | `/product/{id}`               | `Product`             |
//! | `/cart`                       | `Cart`                |
//! | `/checkout`                   | `Checkout`            |
//!
//! Anything else resolves to `Home`.

use std::fmt;

use atelier_core::{CheckoutStatus, ProductId};
use serde::Serialize;

use crate::cart::Cart;
use crate::catalog::{Catalog, Category};
use crate::checkout::Checkout;
use crate::screens::{
    CartView, CheckoutView, GalleryView, HomeView, Page, ProductView, Screen, StudioView,
};

/// A navigation destination.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    Home,
    Gallery {
        category: Category,
    },
    About,
    Product(ProductId),
    Cart,
    Checkout,
}

impl Route {
    /// Parse a navigation path, falling back to `Home` for anything unknown.
    #[must_use]
    pub fn parse(path: &str, category: Option<&str>) -> Self {
        Self::try_parse(path, category).unwrap_or_default()
    }

    /// Parse a navigation path. Trailing slashes are ignored.
    #[must_use]
    pub fn try_parse(path: &str, category: Option<&str>) -> Option<Self> {
        let trimmed = path.trim_matches('/');
        let mut segments = trimmed.split('/');

        let route = match (segments.next(), segments.next(), segments.next()) {
            (Some(""), None, None) => Self::Home,
            (Some("gallery"), None, None) => Self::Gallery {
                category: Category::from_query(category),
            },
            (Some("about"), None, None) => Self::About,
            (Some("product"), Some(id), None) if !id.is_empty() => {
                Self::Product(ProductId::from(id))
            }
            (Some("cart"), None, None) => Self::Cart,
            (Some("checkout"), None, None) => Self::Checkout,
            _ => return None,
        };
        Some(route)
    }

    /// Canonical path for this route.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Home => "/".to_owned(),
            Self::Gallery {
                category: Category::All,
            } => "/gallery".to_owned(),
            Self::Gallery {
                category: Category::Named(name),
            } => {
                let query = url::form_urlencoded::Serializer::new(String::new())
                    .append_pair("category", name)
                    .finish();
                format!("/gallery?{query}")
            }
            Self::About => "/about".to_owned(),
            Self::Product(id) => format!("/product/{id}"),
            Self::Cart => "/cart".to_owned(),
            Self::Checkout => "/checkout".to_owned(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

impl Serialize for Route {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.path())
    }
}

/// Outcome of resolving a route.
#[derive(Debug)]
pub enum Resolved {
    /// Show this page.
    Render(Box<Page>),
    /// The requested screen cannot be shown; go here instead.
    Redirect(Route),
}

/// What the router may read from the shopper's state.
#[derive(Debug, Clone, Copy)]
pub struct ShopperView<'a> {
    pub cart: &'a Cart,
    pub checkout: Option<&'a Checkout>,
}

/// Resolve `route` into a page.
///
/// - A product id not in the catalog redirects to the gallery.
/// - Checkout redirects to the cart unless there is a live checkout to show.
///   An `Idle` instance with an emptied cart is not live.
#[must_use]
pub fn resolve(route: &Route, catalog: &Catalog, shopper: ShopperView<'_>) -> Resolved {
    let screen = match route {
        Route::Home => Screen::Home(HomeView::new(catalog)),
        Route::Gallery { category } => Screen::Gallery(GalleryView::new(catalog, category)),
        Route::About => Screen::About(StudioView::default()),
        Route::Product(id) => match catalog.get(id) {
            Some(product) => Screen::Product(ProductView::from(product.as_ref())),
            None => {
                return Resolved::Redirect(Route::Gallery {
                    category: Category::All,
                });
            }
        },
        Route::Cart => Screen::Cart(CartView::from(shopper.cart)),
        Route::Checkout => match shopper.checkout {
            Some(checkout)
                if checkout.status() == CheckoutStatus::Idle && shopper.cart.is_empty() =>
            {
                return Resolved::Redirect(Route::Cart);
            }
            Some(checkout) => Screen::Checkout(CheckoutView::new(checkout, shopper.cart)),
            None => return Resolved::Redirect(Route::Cart),
        },
    };

    Resolved::Render(Box::new(Page {
        route: route.clone(),
        cart_item_count: shopper.cart.total_item_count(),
        screen,
        notice: None,
    }))
}
