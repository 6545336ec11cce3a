//! Integration tests for the cart endpoints.

#![allow(clippy::unwrap_used)]

use atelier_integration_tests::TestShopper;
use axum::http::StatusCode;

async fn count(shopper: &mut TestShopper) -> u64 {
    shopper.get("/cart/count").await.json["count"].as_u64().unwrap()
}

#[tokio::test]
async fn test_one_of_product_one_and_two_of_product_four() {
    let mut shopper = TestShopper::new();
    shopper.post("/cart/add", &[("product_id", "1")]).await;
    shopper.post("/cart/add", &[("product_id", "4")]).await;
    let page = shopper.post("/cart/add", &[("product_id", "4")]).await;

    assert_eq!(page.status, StatusCode::OK);
    assert_eq!(page.json["screen"], "cart");
    assert_eq!(page.json["cart_item_count"], 3);

    let props = &page.json["props"];
    assert_eq!(props["items"].as_array().unwrap().len(), 2);
    assert_eq!(props["items"][0]["product_id"], "1");
    assert_eq!(props["items"][1]["quantity"], 2);
    assert_eq!(props["subtotal"], "€3,497");
    assert_eq!(props["shipping"], "Free");
    assert_eq!(props["total"], "€3,497");
}

#[tokio::test]
async fn test_add_returns_cart_with_notice() {
    let mut shopper = TestShopper::new();
    let page = shopper.post("/cart/add", &[("product_id", "6")]).await;
    assert_eq!(page.json["notice"], "Added Fluid Dreams to cart");

    // One-shot
    let page = shopper.get("/cart").await;
    assert!(page.json.get("notice").is_none());
}

#[tokio::test]
async fn test_update_quantity() {
    let mut shopper = TestShopper::new();
    shopper.post("/cart/add", &[("product_id", "2")]).await;

    let page = shopper
        .post("/cart/update", &[("product_id", "2"), ("quantity", "5")])
        .await;
    assert_eq!(page.json["props"]["items"][0]["quantity"], 5);
    assert_eq!(page.json["props"]["subtotal"], "€4,495");
}

#[tokio::test]
async fn test_update_to_zero_removes_line() {
    let mut shopper = TestShopper::new();
    shopper.post("/cart/add", &[("product_id", "2")]).await;
    shopper.post("/cart/add", &[("product_id", "3")]).await;

    let page = shopper
        .post("/cart/update", &[("product_id", "2"), ("quantity", "0")])
        .await;
    assert_eq!(page.json["props"]["items"].as_array().unwrap().len(), 1);
    assert_eq!(page.json["notice"], "Removed Minimalist Serenity from cart");
    assert_eq!(count(&mut shopper).await, 1);
}

#[tokio::test]
async fn test_non_integer_quantity_is_ignored() {
    let mut shopper = TestShopper::new();
    shopper.post("/cart/add", &[("product_id", "5")]).await;

    for quantity in ["1.5", "lots", ""] {
        let page = shopper
            .post("/cart/update", &[("product_id", "5"), ("quantity", quantity)])
            .await;
        assert_eq!(page.status, StatusCode::OK);
        assert_eq!(page.json["props"]["items"][0]["quantity"], 1, "{quantity}");
    }
}

#[tokio::test]
async fn test_remove_is_idempotent() {
    let mut shopper = TestShopper::new();
    shopper.post("/cart/add", &[("product_id", "1")]).await;

    let first = shopper.post("/cart/remove", &[("product_id", "1")]).await;
    let second = shopper.post("/cart/remove", &[("product_id", "1")]).await;
    assert_eq!(first.json["props"], second.json["props"]);
    assert_eq!(second.json["props"]["empty_message"], "Your cart is empty");
}

#[tokio::test]
async fn test_unknown_product_is_not_found() {
    let mut shopper = TestShopper::new();
    let response = shopper.post("/cart/add", &[("product_id", "42")]).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(count(&mut shopper).await, 0);
}

#[tokio::test]
async fn test_badge_count_on_every_screen() {
    let mut shopper = TestShopper::new();
    shopper.post("/cart/add", &[("product_id", "3")]).await;
    shopper.post("/cart/add", &[("product_id", "3")]).await;

    for uri in ["/", "/gallery", "/about", "/product/1", "/cart"] {
        let page = shopper.get(uri).await;
        assert_eq!(page.json["cart_item_count"], 2, "{uri}");
    }
}

#[tokio::test]
async fn test_shoppers_have_separate_carts() {
    let mut alice = TestShopper::new();
    let mut bob = alice.another();

    alice.post("/cart/add", &[("product_id", "1")]).await;
    assert_eq!(count(&mut alice).await, 1);
    assert_eq!(count(&mut bob).await, 0);
}
