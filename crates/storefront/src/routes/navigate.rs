//! Navigation handlers.
//!
//! Every `GET` that is not an API endpoint is a navigation request: the path
//! is parsed into a [`Route`] and resolved against the shopper's session.

use axum::{
    extract::{
        Path, Query, State,
        rejection::{PathRejection, QueryRejection},
    },
    http::Uri,
    response::Response,
};
use serde::Deserialize;
use tracing::instrument;

use super::render;
use crate::error::Result;
use crate::middleware::Shopper;
use crate::router::Route;
use crate::state::AppState;

/// Query parameters accepted on navigation.
#[derive(Debug, Default, Deserialize)]
pub struct NavigateQuery {
    /// Gallery filter; ignored on other screens.
    pub category: Option<String>,
}

impl NavigateQuery {
    /// Lenient reading of a query string the extractor refused, e.g. one with
    /// a repeated `category`. The first value wins.
    fn lenient(query: Option<&str>) -> Self {
        let category = query.and_then(|q| {
            url::form_urlencoded::parse(q.as_bytes())
                .find(|(key, _)| key == "category")
                .map(|(_, value)| value.into_owned())
        });
        Self { category }
    }
}

/// `GET /`
#[instrument(skip(state, session), fields(shopper_id = %session.id()))]
pub async fn home(State(state): State<AppState>, Shopper(session): Shopper) -> Result<Response> {
    render(&state, &session, &Route::Home).await
}

/// `GET /checkout`
#[instrument(skip(state, session), fields(shopper_id = %session.id()))]
pub async fn checkout(
    State(state): State<AppState>,
    Shopper(session): Shopper,
) -> Result<Response> {
    render(&state, &session, &Route::Checkout).await
}

/// `GET /{*path}`: any other path, unknown ones rendering home.
///
/// Also mounted as the `GET` handler of the POST-only cart endpoints. A path
/// or query the extractors refuse (invalid UTF-8, repeated keys) is read from
/// the raw URI instead, so it still falls back to home or the gallery.
#[instrument(skip(state, session, path, query), fields(shopper_id = %session.id()))]
pub async fn navigate(
    State(state): State<AppState>,
    Shopper(session): Shopper,
    uri: Uri,
    path: std::result::Result<Path<String>, PathRejection>,
    query: std::result::Result<Query<NavigateQuery>, QueryRejection>,
) -> Result<Response> {
    let path = match path {
        Ok(Path(path)) => path,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Unreadable path, using raw URI");
            uri.path().to_owned()
        }
    };
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Unreadable query, using first values");
            NavigateQuery::lenient(uri.query())
        }
    };

    let route = Route::try_parse(&path, query.category.as_deref()).unwrap_or_else(|| {
        tracing::debug!(path = %path, "Unknown path, showing home");
        Route::Home
    });

    render(&state, &session, &route).await
}
