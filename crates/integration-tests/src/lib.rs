//! Shared harness for Brightbasket integration tests.
//!
//! Tests boot the real storefront and admin routers against a stub commerce
//! API (and stub identity endpoint) bound to an ephemeral local port, then
//! drive them over HTTP with a cookie-carrying client. No external service
//! is contacted.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod stub;

use std::net::SocketAddr;

use secrecy::SecretString;

use brightbasket_admin::config::{AdminConfig, IdentityConfig as AdminIdentityConfig};
use brightbasket_storefront::config::{
    IdentityConfig, PaymentConfig, StorefrontConfig,
};

/// Hosted checkout base used in test configuration; tests assert redirect
/// targets against it without ever connecting to it.
pub const CHECKOUT_URL: &str = "https://checkout.gateway.test/c/pay";

/// Identity tokens the stub accepts.
pub const CUSTOMER_TOKEN: &str = "tok_customer";
pub const ADMIN_TOKEN: &str = "tok_admin";

/// Serve a router on an ephemeral local port, returning its address.
pub async fn serve(router: axum::Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("server error");
    });
    addr
}

/// Storefront configuration pointing at the stub.
#[must_use]
pub fn storefront_config(stub: SocketAddr) -> StorefrontConfig {
    let stub_url = format!("http://{stub}");
    StorefrontConfig {
        host: "127.0.0.1".parse().expect("ip"),
        port: 0,
        base_url: "http://storefront.test".to_string(),
        session_secret: SecretString::from("k4GpB7vR2nXw9QjT5mZc8LhD3fYsE6aU".to_string()),
        commerce_api_url: stub_url.clone(),
        payment: PaymentConfig {
            public_key: "pk_test_brightbasket".to_string(),
            checkout_url: CHECKOUT_URL.to_string(),
        },
        identity: IdentityConfig {
            api_url: stub_url,
            secret_key: SecretString::from("sk_test_9fQ2mX7vL4pR8wZc".to_string()),
            sign_in_url: "https://id.gateway.test/sign-in".to_string(),
        },
        sentry_dsn: None,
        sentry_environment: None,
    }
}

/// Admin configuration pointing at the stub.
#[must_use]
pub fn admin_config(stub: SocketAddr) -> AdminConfig {
    let stub_url = format!("http://{stub}");
    AdminConfig {
        host: "127.0.0.1".parse().expect("ip"),
        port: 0,
        base_url: "http://admin.test".to_string(),
        session_secret: SecretString::from("t8WnE3xK6bJq1VzM4cPh7RdG2yAu5sLf".to_string()),
        commerce_api_url: stub_url.clone(),
        identity: AdminIdentityConfig {
            api_url: stub_url,
            secret_key: SecretString::from("sk_test_9fQ2mX7vL4pR8wZc".to_string()),
            sign_in_url: "https://id.gateway.test/sign-in".to_string(),
        },
        sentry_dsn: None,
        sentry_environment: None,
    }
}

/// Boot a storefront instance against the stub; returns its base URL.
pub async fn spawn_storefront(stub: SocketAddr) -> String {
    let state = brightbasket_storefront::state::AppState::new(storefront_config(stub));
    let addr = serve(brightbasket_storefront::app(state)).await;
    format!("http://{addr}")
}

/// Boot an admin instance against the stub; returns its base URL.
pub async fn spawn_admin(stub: SocketAddr) -> String {
    let state = brightbasket_admin::state::AppState::new(admin_config(stub));
    let addr = serve(brightbasket_admin::app(state)).await;
    format!("http://{addr}")
}

/// HTTP client for tests: keeps cookies, never follows redirects, so each
/// hop's status and Location can be asserted.
#[must_use]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("build client")
}

/// Sign a client in through the auth callback with the given stub token.
pub async fn sign_in(client: &reqwest::Client, base_url: &str, token: &str) {
    let response = client
        .get(format!("{base_url}/auth/callback?session_token={token}"))
        .send()
        .await
        .expect("auth callback");
    assert!(
        response.status().is_redirection(),
        "sign-in should redirect, got {}",
        response.status()
    );
}

/// The Location header of a redirect response.
#[must_use]
pub fn location(response: &reqwest::Response) -> String {
    response
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}
