//! Admin console flows: role gating, order management, catalog CRUD.

use brightbasket_core::OrderStatus;
use brightbasket_integration_tests::{
    ADMIN_TOKEN, CUSTOMER_TOKEN, client, location, sign_in, spawn_admin, stub,
};
use rust_decimal::Decimal;

#[tokio::test]
async fn anonymous_visitors_are_redirected_to_sign_in() {
    let stub = stub::spawn().await;
    let base = spawn_admin(stub.addr).await;
    let http = client();

    let response = http.get(&base).send().await.expect("dashboard");
    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/auth/sign-in");
}

#[tokio::test]
async fn customers_without_the_admin_claim_are_denied() {
    let stub = stub::spawn().await;
    let base = spawn_admin(stub.addr).await;
    let http = client();

    let response = http
        .get(format!("{base}/auth/callback?session_token={CUSTOMER_TOKEN}"))
        .send()
        .await
        .expect("callback");
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let page = response.text().await.expect("body");
    assert!(page.contains("does not have admin access"));

    // Still no console session.
    let response = http.get(format!("{base}/orders")).send().await.expect("orders");
    assert!(response.status().is_redirection());
}

#[tokio::test]
async fn dashboard_summarizes_orders_and_stock() {
    let stub = stub::spawn().await;
    {
        let mut state = stub.state.lock().expect("lock");
        state.seed_order("user_1", Decimal::new(4000, 2), OrderStatus::Delivered);
        state.seed_order("user_2", Decimal::new(2500, 2), OrderStatus::Cancelled);
    }
    let base = spawn_admin(stub.addr).await;
    let http = client();
    sign_in(&http, &base, ADMIN_TOKEN).await;

    let page = http
        .get(&base)
        .send()
        .await
        .expect("dashboard")
        .text()
        .await
        .expect("body");

    // Revenue excludes the cancelled order.
    assert!(page.contains("$40.00"));
    // The mug (stock 3) is flagged as low stock.
    assert!(page.contains("Stoneware Mug"));
    assert!(page.contains("3 left"));
}

#[tokio::test]
async fn order_transitions_are_validated_and_read_back() {
    let stub = stub::spawn().await;
    let order_id = stub.state.lock().expect("lock").seed_order(
        "user_1",
        Decimal::new(1000, 2),
        OrderStatus::Pending,
    );
    let base = spawn_admin(stub.addr).await;
    let http = client();
    sign_in(&http, &base, ADMIN_TOKEN).await;

    // The table offers the pending order's transitions.
    let page = http
        .get(format!("{base}/orders"))
        .send()
        .await
        .expect("orders")
        .text()
        .await
        .expect("body");
    assert!(page.contains(order_id.as_str()));
    assert!(page.contains("PROCESSING"));
    assert!(page.contains("CANCELLED"));

    // A legal transition lands and the accepted value is rendered.
    let response = http
        .post(format!("{base}/orders/{order_id}/status"))
        .form(&[("status", "PROCESSING")])
        .send()
        .await
        .expect("transition");
    assert!(response.status().is_redirection());
    assert_eq!(
        stub.state.lock().expect("lock").orders[0].status,
        OrderStatus::Processing
    );

    let page = http
        .get(format!("{base}/orders"))
        .send()
        .await
        .expect("orders")
        .text()
        .await
        .expect("body");
    assert!(page.contains("is now PROCESSING"));

    // An illegal jump is refused before it reaches the commerce API.
    http.post(format!("{base}/orders/{order_id}/status"))
        .form(&[("status", "DELIVERED")])
        .send()
        .await
        .expect("bad transition");
    assert_eq!(
        stub.state.lock().expect("lock").orders[0].status,
        OrderStatus::Processing
    );

    // Garbage statuses are refused too.
    http.post(format!("{base}/orders/{order_id}/status"))
        .form(&[("status", "completed")])
        .send()
        .await
        .expect("bad status");
    assert_eq!(
        stub.state.lock().expect("lock").orders[0].status,
        OrderStatus::Processing
    );
}

#[tokio::test]
async fn orders_can_be_filtered_and_deleted() {
    let stub = stub::spawn().await;
    let (keep, drop) = {
        let mut state = stub.state.lock().expect("lock");
        (
            state.seed_order("user_1", Decimal::new(1000, 2), OrderStatus::Shipped),
            state.seed_order("user_2", Decimal::new(2000, 2), OrderStatus::Pending),
        )
    };
    let base = spawn_admin(stub.addr).await;
    let http = client();
    sign_in(&http, &base, ADMIN_TOKEN).await;

    // Status filter matches case-insensitively.
    let page = http
        .get(format!("{base}/orders?q=shipped"))
        .send()
        .await
        .expect("orders")
        .text()
        .await
        .expect("body");
    assert!(page.contains(keep.as_str()));
    assert!(!page.contains(drop.as_str()));

    let response = http
        .post(format!("{base}/orders/{drop}/delete"))
        .send()
        .await
        .expect("delete");
    assert!(response.status().is_redirection());

    let state = stub.state.lock().expect("lock");
    assert_eq!(state.orders.len(), 1);
    assert_eq!(state.orders[0].id, keep);
}

#[tokio::test]
async fn product_crud_round_trip() {
    let stub = stub::spawn().await;
    let base = spawn_admin(stub.addr).await;
    let http = client();
    sign_in(&http, &base, ADMIN_TOKEN).await;

    // Create.
    let response = http
        .post(format!("{base}/products"))
        .form(&[
            ("name", "Oak Serving Tray"),
            ("description", "Solid oak, hand finished"),
            ("price", "24.00"),
            ("stock", "6"),
            ("image", "https://img.example/tray.jpg"),
            ("category_id", "c1"),
        ])
        .send()
        .await
        .expect("create");
    assert!(response.status().is_redirection());
    {
        let state = stub.state.lock().expect("lock");
        assert!(state.products.iter().any(|p| p.name == "Oak Serving Tray"));
    }

    // A bad price never reaches the commerce API.
    http.post(format!("{base}/products"))
        .form(&[("name", "Broken"), ("price", "not-a-number"), ("stock", "1")])
        .send()
        .await
        .expect("create invalid");
    assert!(
        !stub
            .state
            .lock()
            .expect("lock")
            .products
            .iter()
            .any(|p| p.name == "Broken")
    );

    // Update an existing product.
    let response = http
        .post(format!("{base}/products/p1"))
        .form(&[
            ("name", "Walnut Cutting Board XL"),
            ("description", "Bigger board"),
            ("price", "59.99"),
            ("stock", "4"),
            ("image", ""),
            ("category_id", "c1"),
        ])
        .send()
        .await
        .expect("update");
    assert!(response.status().is_redirection());
    {
        let state = stub.state.lock().expect("lock");
        let p1 = state
            .products
            .iter()
            .find(|p| p.id.as_str() == "p1")
            .expect("p1");
        assert_eq!(p1.name, "Walnut Cutting Board XL");
        assert_eq!(p1.price, Decimal::new(5999, 2));
    }

    // Delete.
    http.post(format!("{base}/products/p3/delete"))
        .send()
        .await
        .expect("delete");
    assert!(
        !stub
            .state
            .lock()
            .expect("lock")
            .products
            .iter()
            .any(|p| p.id.as_str() == "p3")
    );
}

#[tokio::test]
async fn category_crud_round_trip() {
    let stub = stub::spawn().await;
    let base = spawn_admin(stub.addr).await;
    let http = client();
    sign_in(&http, &base, ADMIN_TOKEN).await;

    let response = http
        .post(format!("{base}/categories"))
        .form(&[("name", "Lighting"), ("description", "Lamps and shades")])
        .send()
        .await
        .expect("create");
    assert!(response.status().is_redirection());
    {
        let state = stub.state.lock().expect("lock");
        assert!(state.categories.iter().any(|c| c.name == "Lighting"));
    }

    http.post(format!("{base}/categories/c2"))
        .form(&[("name", "Linens"), ("description", ""), ("image", "")])
        .send()
        .await
        .expect("update");
    {
        let state = stub.state.lock().expect("lock");
        let c2 = state
            .categories
            .iter()
            .find(|c| c.id.as_str() == "c2")
            .expect("c2");
        assert_eq!(c2.name, "Linens");
        assert!(c2.description.is_none());
    }

    http.post(format!("{base}/categories/c2/delete"))
        .send()
        .await
        .expect("delete");
    assert!(
        !stub
            .state
            .lock()
            .expect("lock")
            .categories
            .iter()
            .any(|c| c.id.as_str() == "c2")
    );
}
