//! Checkout guards and the full payment round trip.

use brightbasket_core::OrderStatus;
use brightbasket_integration_tests::{
    CHECKOUT_URL, CUSTOMER_TOKEN, client, location, sign_in, spawn_storefront, stub,
};

const ADDRESS: &[(&str, &str)] = &[
    ("first_name", "Riley"),
    ("last_name", "Okafor"),
    ("address1", "12 Orchard Lane"),
    ("address2", ""),
    ("city", "Portland"),
    ("state", "OR"),
    ("zip_code", "97201"),
    ("country", "United States"),
];

#[tokio::test]
async fn unauthenticated_checkout_is_redirected_to_sign_in() {
    let stub = stub::spawn().await;
    let base = spawn_storefront(stub.addr).await;
    let http = client();

    let response = http
        .post(format!("{base}/checkout"))
        .form(ADDRESS)
        .send()
        .await
        .expect("checkout");
    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/auth/sign-in");
    assert_eq!(stub.state.lock().expect("lock").checkout_calls, 0);
}

#[tokio::test]
async fn empty_cart_checkout_is_rejected_before_any_network_call() {
    let stub = stub::spawn().await;
    let base = spawn_storefront(stub.addr).await;
    let http = client();
    sign_in(&http, &base, CUSTOMER_TOKEN).await;

    let response = http
        .post(format!("{base}/checkout"))
        .form(ADDRESS)
        .send()
        .await
        .expect("checkout");
    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/cart");

    // The rejection happened before the commerce API was touched.
    assert_eq!(stub.state.lock().expect("lock").checkout_calls, 0);

    let page = http
        .get(format!("{base}/cart"))
        .send()
        .await
        .expect("cart page")
        .text()
        .await
        .expect("body");
    assert!(page.contains("Your cart is empty!"));
}

#[tokio::test]
async fn incomplete_address_is_rejected_before_any_network_call() {
    let stub = stub::spawn().await;
    let base = spawn_storefront(stub.addr).await;
    let http = client();
    sign_in(&http, &base, CUSTOMER_TOKEN).await;

    http.post(format!("{base}/cart/add"))
        .form(&[("product_id", "p2"), ("quantity", "1")])
        .send()
        .await
        .expect("cart add");

    let response = http
        .post(format!("{base}/checkout"))
        .form(&[
            ("first_name", "Riley"),
            ("last_name", "Okafor"),
            ("address1", "12 Orchard Lane"),
            ("city", ""),
            ("state", "OR"),
            ("zip_code", ""),
            ("country", "United States"),
        ])
        .send()
        .await
        .expect("checkout");
    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/checkout");
    assert_eq!(stub.state.lock().expect("lock").checkout_calls, 0);

    let page = http
        .get(format!("{base}/checkout"))
        .send()
        .await
        .expect("checkout page")
        .text()
        .await
        .expect("body");
    assert!(page.contains("Please fill in: city, ZIP code"));
}

#[tokio::test]
async fn full_checkout_records_the_order_and_clears_the_slots() {
    let stub = stub::spawn().await;
    let base = spawn_storefront(stub.addr).await;
    let http = client();
    sign_in(&http, &base, CUSTOMER_TOKEN).await;

    http.post(format!("{base}/cart/add"))
        .form(&[("product_id", "p2"), ("quantity", "2")])
        .send()
        .await
        .expect("cart add");

    // Checkout redirects to the gateway's hosted page for the session.
    let response = http
        .post(format!("{base}/checkout"))
        .form(ADDRESS)
        .send()
        .await
        .expect("checkout");
    assert!(response.status().is_redirection());
    assert_eq!(location(&response), format!("{CHECKOUT_URL}/cs_test_1"));
    assert_eq!(stub.state.lock().expect("lock").checkout_calls, 1);

    // The gateway bounces back with the session id; the order is recorded.
    let page = http
        .get(format!("{base}/checkout/success?session_id=cs_test_1"))
        .send()
        .await
        .expect("success page")
        .text()
        .await
        .expect("body");
    assert!(page.contains("Payment Successful"));
    assert!(page.contains("12 Orchard Lane"));

    {
        let state = stub.state.lock().expect("lock");
        assert_eq!(state.orders.len(), 1);
        let order = state.orders.first().expect("order");
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.total, rust_decimal::Decimal::new(1798, 2));
        assert_eq!(order.user_id.as_str(), "user_1");
        assert_eq!(order.items.len(), 1);
        assert!(order.shipping_address.is_some());
    }

    // Cart and address slots are gone.
    let count = http
        .get(format!("{base}/cart/count"))
        .send()
        .await
        .expect("count")
        .text()
        .await
        .expect("body");
    assert!(count.contains(">0<"));

    // A reload does not create a second order.
    http.get(format!("{base}/checkout/success?session_id=cs_test_1"))
        .send()
        .await
        .expect("success reload");
    assert_eq!(stub.state.lock().expect("lock").orders.len(), 1);
}

#[tokio::test]
async fn success_without_session_id_goes_home() {
    let stub = stub::spawn().await;
    let base = spawn_storefront(stub.addr).await;
    let http = client();
    sign_in(&http, &base, CUSTOMER_TOKEN).await;

    let response = http
        .get(format!("{base}/checkout/success"))
        .send()
        .await
        .expect("success page");
    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/");
    assert!(stub.state.lock().expect("lock").orders.is_empty());
}

#[tokio::test]
async fn customer_can_view_and_cancel_a_pending_order() {
    let stub = stub::spawn().await;
    let base = spawn_storefront(stub.addr).await;
    let http = client();
    sign_in(&http, &base, CUSTOMER_TOKEN).await;

    let order_id = stub.state.lock().expect("lock").seed_order(
        "user_1",
        rust_decimal::Decimal::new(1000, 2),
        OrderStatus::Pending,
    );

    let page = http
        .get(format!("{base}/orders"))
        .send()
        .await
        .expect("orders page")
        .text()
        .await
        .expect("body");
    assert!(page.contains(order_id.as_str()));

    let page = http
        .get(format!("{base}/orders/{order_id}"))
        .send()
        .await
        .expect("order page")
        .text()
        .await
        .expect("body");
    assert!(page.contains("PENDING"));
    assert!(page.contains("Cancel Order"));

    let response = http
        .post(format!("{base}/orders/{order_id}/cancel"))
        .send()
        .await
        .expect("cancel");
    assert!(response.status().is_redirection());

    let state = stub.state.lock().expect("lock");
    assert_eq!(
        state.orders.first().expect("order").status,
        OrderStatus::Cancelled
    );
}

#[tokio::test]
async fn delivered_orders_offer_no_cancel_action() {
    let stub = stub::spawn().await;
    let base = spawn_storefront(stub.addr).await;
    let http = client();
    sign_in(&http, &base, CUSTOMER_TOKEN).await;

    let order_id = stub.state.lock().expect("lock").seed_order(
        "user_1",
        rust_decimal::Decimal::new(1000, 2),
        OrderStatus::Delivered,
    );

    let page = http
        .get(format!("{base}/orders/{order_id}"))
        .send()
        .await
        .expect("order page")
        .text()
        .await
        .expect("body");
    assert!(page.contains("DELIVERED"));
    assert!(!page.contains("Cancel Order"));

    // A hand-crafted cancel post is refused locally; the order is untouched.
    http.post(format!("{base}/orders/{order_id}/cancel"))
        .send()
        .await
        .expect("cancel");
    let state = stub.state.lock().expect("lock");
    assert_eq!(
        state.orders.first().expect("order").status,
        OrderStatus::Delivered
    );
}

#[tokio::test]
async fn orders_belonging_to_someone_else_are_hidden() {
    let stub = stub::spawn().await;
    let base = spawn_storefront(stub.addr).await;
    let http = client();
    sign_in(&http, &base, CUSTOMER_TOKEN).await;

    let order_id = stub.state.lock().expect("lock").seed_order(
        "someone_else",
        rust_decimal::Decimal::new(1000, 2),
        OrderStatus::Pending,
    );

    let response = http
        .get(format!("{base}/orders/{order_id}"))
        .send()
        .await
        .expect("order page");
    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
}
