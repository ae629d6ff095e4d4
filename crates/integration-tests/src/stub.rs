//! In-memory stub of the commerce API and the identity provider.
//!
//! Mirrors the wire shapes the real services use: catalog endpoints wrap
//! payloads in the `{success, data}` envelope, order endpoints return bare
//! JSON, and `PUT /api/order/{id}` returns no body (clients must read back).

use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;

use brightbasket_core::{
    ApiEnvelope, CartLine, Category, CategoryId, Order, OrderId, OrderItem, OrderStatus, Product,
    ProductId, ShippingAddress, UserId,
};

/// Mutable stub state shared with the test body.
pub struct StubState {
    pub products: Vec<Product>,
    pub categories: Vec<Category>,
    pub orders: Vec<Order>,
    /// Number of `POST /api/checkout` calls observed.
    pub checkout_calls: usize,
    next_order: usize,
}

pub type SharedState = Arc<Mutex<StubState>>;

/// Spawned stub: its state handle plus the routers' shared address.
pub struct Stub {
    pub state: SharedState,
    pub addr: std::net::SocketAddr,
}

/// Build and serve the stub, seeded with the standard catalog fixture.
pub async fn spawn() -> Stub {
    let state = Arc::new(Mutex::new(StubState::with_fixtures()));
    let addr = crate::serve(router(Arc::clone(&state))).await;
    Stub { state, addr }
}

impl StubState {
    fn with_fixtures() -> Self {
        let categories = vec![
            category("c1", "Kitchen"),
            category("c2", "Textiles"),
        ];
        let products = vec![
            product("p1", "Walnut Cutting Board", Decimal::new(4999, 2), 12, "c1"),
            product("p2", "Stoneware Mug", Decimal::new(899, 2), 3, "c1"),
            product("p3", "Linen Apron", Decimal::new(3200, 2), 0, "c2"),
        ];

        Self {
            products,
            categories,
            orders: Vec::new(),
            checkout_calls: 0,
            next_order: 1,
        }
    }

    /// Seed an order directly, bypassing checkout.
    pub fn seed_order(&mut self, user_id: &str, total: Decimal, status: OrderStatus) -> OrderId {
        let id = OrderId::new(format!("ord_{}", self.next_order));
        self.next_order += 1;
        self.orders.push(Order {
            id: id.clone(),
            user_id: UserId::new(user_id),
            user_name: "Riley".to_string(),
            total,
            status,
            shipping_address: None,
            items: Vec::new(),
            created_at: Some(chrono::Utc::now()),
            updated_at: None,
        });
        id
    }
}

fn category(id: &str, name: &str) -> Category {
    Category {
        id: CategoryId::new(id),
        name: name.to_string(),
        image: None,
        description: Some(format!("{name} goods")),
        created_at: None,
        updated_at: None,
    }
}

fn product(id: &str, name: &str, price: Decimal, stock: u32, category_id: &str) -> Product {
    Product {
        id: ProductId::new(id),
        name: name.to_string(),
        description: format!("{name} from the Brightbasket catalog"),
        price,
        rating: 4.5,
        image: format!("https://img.example/{id}.jpg"),
        stock,
        category_id: Some(CategoryId::new(category_id)),
        category: None,
        created_at: None,
        updated_at: None,
    }
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({"error": "not found"}))).into_response()
}

fn envelope<T>(data: T) -> Json<ApiEnvelope<T>> {
    Json(ApiEnvelope {
        success: true,
        message: None,
        data,
    })
}

/// The stub's full route table: commerce API plus the identity provider's
/// verification endpoint.
pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route(
            "/products/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/categories", get(list_categories).post(create_category))
        .route(
            "/categories/{id}",
            axum::routing::put(update_category).delete(delete_category),
        )
        .route("/categorybyproduct/{id}", get(category_with_products))
        .route("/api/checkout", axum::routing::post(create_checkout))
        .route("/api/order", get(list_orders).post(create_order))
        .route(
            "/api/order/{id}",
            get(get_order).put(update_order).delete(delete_order),
        )
        .route("/api/order/user/{user_id}", get(orders_for_user))
        .route("/sessions/verify", axum::routing::post(verify_session))
        .with_state(state)
}

// =============================================================================
// Catalog
// =============================================================================

#[derive(Deserialize)]
struct SearchQuery {
    search: Option<String>,
}

async fn list_products(
    State(state): State<SharedState>,
    Query(query): Query<SearchQuery>,
) -> Json<ApiEnvelope<Vec<Product>>> {
    let state = state.lock().expect("stub lock");
    let needle = query.search.unwrap_or_default().to_lowercase();
    let products = state
        .products
        .iter()
        .filter(|p| needle.is_empty() || p.name.to_lowercase().contains(&needle))
        .cloned()
        .collect();
    envelope(products)
}

async fn get_product(State(state): State<SharedState>, Path(id): Path<String>) -> Response {
    let state = state.lock().expect("stub lock");
    let id = ProductId::new(id);
    state.products.iter().find(|p| p.id == id).map_or_else(
        not_found,
        |product| envelope(product.clone()).into_response(),
    )
}

async fn list_categories(State(state): State<SharedState>) -> Json<ApiEnvelope<Vec<Category>>> {
    let state = state.lock().expect("stub lock");
    envelope(state.categories.clone())
}

async fn category_with_products(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Response {
    let state = state.lock().expect("stub lock");
    let id = CategoryId::new(id);
    let Some(category) = state.categories.iter().find(|c| c.id == id) else {
        return not_found();
    };
    let products: Vec<&Product> = state
        .products
        .iter()
        .filter(|p| p.category_id.as_ref() == Some(&id))
        .collect();
    Json(json!({"category": category, "products": products})).into_response()
}

// =============================================================================
// Admin catalog writes
// =============================================================================

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductBody {
    name: String,
    #[serde(default)]
    description: String,
    price: Decimal,
    #[serde(default)]
    stock: u32,
    #[serde(default)]
    image: String,
    #[serde(default)]
    category_id: Option<CategoryId>,
    #[serde(default)]
    rating: f64,
}

async fn create_product(
    State(state): State<SharedState>,
    Json(body): Json<ProductBody>,
) -> Response {
    let mut state = state.lock().expect("stub lock");
    let id = format!("p{}", state.products.len() + 1);
    let created = Product {
        id: ProductId::new(id),
        name: body.name,
        description: body.description,
        price: body.price,
        rating: body.rating,
        image: body.image,
        stock: body.stock,
        category_id: body.category_id,
        category: None,
        created_at: Some(chrono::Utc::now()),
        updated_at: None,
    };
    state.products.push(created.clone());
    envelope(created).into_response()
}

async fn update_product(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Json(body): Json<ProductBody>,
) -> Response {
    let mut state = state.lock().expect("stub lock");
    let id = ProductId::new(id);
    let Some(product) = state.products.iter_mut().find(|p| p.id == id) else {
        return not_found();
    };
    product.name = body.name;
    product.description = body.description;
    product.price = body.price;
    product.stock = body.stock;
    product.image = body.image;
    product.category_id = body.category_id;
    envelope(product.clone()).into_response()
}

async fn delete_product(State(state): State<SharedState>, Path(id): Path<String>) -> Response {
    let mut state = state.lock().expect("stub lock");
    let id = ProductId::new(id);
    let before = state.products.len();
    state.products.retain(|p| p.id != id);
    if state.products.len() == before {
        return not_found();
    }
    StatusCode::OK.into_response()
}

#[derive(Deserialize)]
struct CategoryBody {
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    image: Option<String>,
}

async fn create_category(
    State(state): State<SharedState>,
    Json(body): Json<CategoryBody>,
) -> Response {
    let mut state = state.lock().expect("stub lock");
    let id = format!("c{}", state.categories.len() + 1);
    let created = Category {
        id: CategoryId::new(id),
        name: body.name,
        image: body.image,
        description: body.description,
        created_at: Some(chrono::Utc::now()),
        updated_at: None,
    };
    state.categories.push(created.clone());
    envelope(created).into_response()
}

async fn update_category(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Json(body): Json<CategoryBody>,
) -> Response {
    let mut state = state.lock().expect("stub lock");
    let id = CategoryId::new(id);
    let Some(existing) = state.categories.iter_mut().find(|c| c.id == id) else {
        return not_found();
    };
    existing.name = body.name;
    existing.description = body.description;
    existing.image = body.image;
    envelope(existing.clone()).into_response()
}

async fn delete_category(State(state): State<SharedState>, Path(id): Path<String>) -> Response {
    let mut state = state.lock().expect("stub lock");
    let id = CategoryId::new(id);
    let before = state.categories.len();
    state.categories.retain(|c| c.id != id);
    if state.categories.len() == before {
        return not_found();
    }
    StatusCode::OK.into_response()
}

// =============================================================================
// Checkout and orders
// =============================================================================

async fn create_checkout(State(state): State<SharedState>) -> Json<serde_json::Value> {
    let mut state = state.lock().expect("stub lock");
    state.checkout_calls += 1;
    Json(json!({"sessionId": format!("cs_test_{}", state.checkout_calls)}))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrderBody {
    items: Vec<CartLine>,
    total: Decimal,
    user_id: UserId,
    user_name: String,
    #[allow(dead_code)]
    session_id: String,
    shipping_address: ShippingAddress,
    status: OrderStatus,
}

async fn create_order(State(state): State<SharedState>, Json(body): Json<OrderBody>) -> Response {
    let mut state = state.lock().expect("stub lock");
    let id = OrderId::new(format!("ord_{}", state.next_order));
    state.next_order += 1;

    let order = Order {
        id,
        user_id: body.user_id,
        user_name: body.user_name,
        total: body.total,
        status: body.status,
        shipping_address: Some(body.shipping_address),
        items: body
            .items
            .iter()
            .map(|line| OrderItem {
                id: None,
                product_id: line.id.clone(),
                name: line.name.clone(),
                image: line.image.clone(),
                price: line.price,
                quantity: line.quantity,
            })
            .collect(),
        created_at: Some(chrono::Utc::now()),
        updated_at: None,
    };
    state.orders.push(order.clone());
    Json(order).into_response()
}

async fn list_orders(State(state): State<SharedState>) -> Json<Vec<Order>> {
    let state = state.lock().expect("stub lock");
    Json(state.orders.clone())
}

async fn get_order(State(state): State<SharedState>, Path(id): Path<String>) -> Response {
    let state = state.lock().expect("stub lock");
    let id = OrderId::new(id);
    state
        .orders
        .iter()
        .find(|o| o.id == id)
        .map_or_else(not_found, |order| Json(order.clone()).into_response())
}

#[derive(Deserialize)]
struct StatusBody {
    status: OrderStatus,
}

async fn update_order(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Json(body): Json<StatusBody>,
) -> Response {
    let mut state = state.lock().expect("stub lock");
    let id = OrderId::new(id);
    let Some(order) = state.orders.iter_mut().find(|o| o.id == id) else {
        return not_found();
    };
    order.status = body.status;
    order.updated_at = Some(chrono::Utc::now());
    // The real API returns no body on update; clients must read back.
    StatusCode::OK.into_response()
}

async fn delete_order(State(state): State<SharedState>, Path(id): Path<String>) -> Response {
    let mut state = state.lock().expect("stub lock");
    let id = OrderId::new(id);
    let before = state.orders.len();
    state.orders.retain(|o| o.id != id);
    if state.orders.len() == before {
        return not_found();
    }
    StatusCode::OK.into_response()
}

async fn orders_for_user(
    State(state): State<SharedState>,
    Path(user_id): Path<String>,
) -> Json<Vec<Order>> {
    let state = state.lock().expect("stub lock");
    let user_id = UserId::new(user_id);
    Json(
        state
            .orders
            .iter()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect(),
    )
}

// =============================================================================
// Identity provider
// =============================================================================

#[derive(Deserialize)]
struct VerifyBody {
    token: String,
}

async fn verify_session(Json(body): Json<VerifyBody>) -> Response {
    match body.token.as_str() {
        crate::CUSTOMER_TOKEN => Json(json!({
            "id": "user_1",
            "email": "shopper@example.com",
            "firstName": "Riley",
            "lastName": "Okafor",
            "role": "customer",
        }))
        .into_response(),
        crate::ADMIN_TOKEN => Json(json!({
            "id": "admin_1",
            "email": "admin@example.com",
            "firstName": "Sam",
            "lastName": "Field",
            "role": "admin",
        }))
        .into_response(),
        _ => StatusCode::UNAUTHORIZED.into_response(),
    }
}
