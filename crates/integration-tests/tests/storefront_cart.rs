//! Cart flows driven through the real storefront router over HTTP.

use brightbasket_integration_tests::{client, location, spawn_storefront, stub};

#[tokio::test]
async fn add_update_remove_round_trip() {
    let stub = stub::spawn().await;
    let base = spawn_storefront(stub.addr).await;
    let http = client();

    // Add two cutting boards.
    let response = http
        .post(format!("{base}/cart/add"))
        .form(&[("product_id", "p1"), ("quantity", "2")])
        .send()
        .await
        .expect("cart add");
    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/cart");

    // The cart page shows the line, the add-time price, and the totals.
    let page = http
        .get(format!("{base}/cart"))
        .send()
        .await
        .expect("cart page")
        .text()
        .await
        .expect("cart body");
    assert!(page.contains("Walnut Cutting Board"));
    assert!(page.contains("$49.99"));
    assert!(page.contains("$99.98"));
    assert!(page.contains("added to cart"), "flash should surface");

    // Subtotal is above the free-shipping threshold.
    assert!(page.contains("FREE"));

    // Count badge sums quantities.
    let count = http
        .get(format!("{base}/cart/count"))
        .send()
        .await
        .expect("count")
        .text()
        .await
        .expect("count body");
    assert!(count.contains(">2<"), "badge should show 2, got: {count}");

    // Adding the same product again increments, never duplicates.
    http.post(format!("{base}/cart/add"))
        .form(&[("product_id", "p1"), ("quantity", "3")])
        .send()
        .await
        .expect("cart add again");
    let count = http
        .get(format!("{base}/cart/count"))
        .send()
        .await
        .expect("count")
        .text()
        .await
        .expect("count body");
    assert!(count.contains(">5<"), "badge should show 5, got: {count}");

    // Dropping the quantity to one brings the flat shipping fee back.
    http.post(format!("{base}/cart/update"))
        .form(&[("product_id", "p1"), ("quantity", "1")])
        .send()
        .await
        .expect("cart update");
    let page = http
        .get(format!("{base}/cart"))
        .send()
        .await
        .expect("cart page")
        .text()
        .await
        .expect("cart body");
    assert!(page.contains("$5.99"));
    assert!(page.contains("$55.98"));

    // Quantity zero removes the line.
    http.post(format!("{base}/cart/update"))
        .form(&[("product_id", "p1"), ("quantity", "0")])
        .send()
        .await
        .expect("cart update to zero");
    let page = http
        .get(format!("{base}/cart"))
        .send()
        .await
        .expect("cart page")
        .text()
        .await
        .expect("cart body");
    assert!(page.contains("Your cart is empty"));
}

#[tokio::test]
async fn cart_survives_navigation_and_clear_drops_it() {
    let stub = stub::spawn().await;
    let base = spawn_storefront(stub.addr).await;
    let http = client();

    http.post(format!("{base}/cart/add"))
        .form(&[("product_id", "p2"), ("quantity", "1")])
        .send()
        .await
        .expect("cart add");

    // A different page, then back: the session slot restores the cart.
    http.get(format!("{base}/products"))
        .send()
        .await
        .expect("products page");
    let page = http
        .get(format!("{base}/cart"))
        .send()
        .await
        .expect("cart page")
        .text()
        .await
        .expect("cart body");
    assert!(page.contains("Stoneware Mug"));

    http.post(format!("{base}/cart/clear"))
        .send()
        .await
        .expect("cart clear");
    let count = http
        .get(format!("{base}/cart/count"))
        .send()
        .await
        .expect("count")
        .text()
        .await
        .expect("count body");
    assert!(count.contains(">0<"));
}

#[tokio::test]
async fn removing_absent_product_is_a_noop() {
    let stub = stub::spawn().await;
    let base = spawn_storefront(stub.addr).await;
    let http = client();

    http.post(format!("{base}/cart/add"))
        .form(&[("product_id", "p1"), ("quantity", "1")])
        .send()
        .await
        .expect("cart add");

    let response = http
        .post(format!("{base}/cart/remove"))
        .form(&[("product_id", "ghost")])
        .send()
        .await
        .expect("cart remove");
    assert!(response.status().is_redirection());

    let count = http
        .get(format!("{base}/cart/count"))
        .send()
        .await
        .expect("count")
        .text()
        .await
        .expect("count body");
    assert!(count.contains(">1<"));
}

#[tokio::test]
async fn unknown_product_add_surfaces_error_and_leaves_cart_alone() {
    let stub = stub::spawn().await;
    let base = spawn_storefront(stub.addr).await;
    let http = client();

    let response = http
        .post(format!("{base}/cart/add"))
        .form(&[("product_id", "ghost"), ("quantity", "1")])
        .send()
        .await
        .expect("cart add");
    assert!(response.status().is_redirection());

    let page = http
        .get(format!("{base}/cart"))
        .send()
        .await
        .expect("cart page")
        .text()
        .await
        .expect("cart body");
    assert!(page.contains("Your cart is empty"));
    assert!(page.contains("Could not add that item"));
}
