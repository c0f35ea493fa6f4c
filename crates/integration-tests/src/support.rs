//! Shared helpers for driving routers in-process and faking platform
//! payloads.
//!
//! Helpers panic on failure; they only ever run inside tests.

#![allow(clippy::missing_panics_doc)]

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::response::Parts;
use axum::http::{Request, header};
use serde_json::{Value, json};
use tower::ServiceExt;

/// Send one request through the router and collect the response body.
pub async fn send(app: &Router, request: Request<Body>) -> (Parts, String) {
    let response = app.clone().oneshot(request).await.expect("response");
    let (parts, body) = response.into_parts();
    let bytes = to_bytes(body, usize::MAX).await.expect("body bytes");
    (parts, String::from_utf8(bytes.to_vec()).expect("utf8 body"))
}

/// Build a GET request, optionally carrying a session cookie.
pub fn get_request(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).expect("request")
}

/// Build a form POST request, optionally carrying a session cookie.
pub fn form_request(uri: &str, cookie: Option<&str>, form: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(form.to_string())).expect("request")
}

/// Extract the session cookie pair from a response, if one was set.
pub fn session_cookie(parts: &Parts) -> Option<String> {
    let raw = parts.headers.get(header::SET_COOKIE)?.to_str().ok()?;
    raw.split(';').next().map(str::to_string)
}

/// A `/cart.js` payload with one discount-eligible line item.
#[must_use]
pub fn cart_body(attribute: Option<&str>) -> Value {
    let attributes = attribute.map_or_else(
        || json!({}),
        |value| json!({ "eco_packaging": value }),
    );
    json!({
        "token": "cart-token-1",
        "attributes": attributes,
        "item_count": 2,
        "total_price": 24_900,
        "currency": "DKK",
        "items": [
            {
                "key": "1001:default",
                "title": "Beeswax candle",
                "quantity": 2,
                "product_type": "Home",
                "variant_title": "Large",
                "properties": {}
            }
        ]
    })
}

/// A `/cart.js` payload for an empty cart with no attributes.
#[must_use]
pub fn empty_cart_body() -> Value {
    json!({
        "token": "cart-token-1",
        "attributes": {},
        "item_count": 0,
        "total_price": 0,
        "currency": "DKK",
        "items": []
    })
}

/// One Admin GraphQL order node.
///
/// Eco orders carry the legacy `eco_packaging: yes` order attribute the
/// classifier matches exactly.
#[must_use]
pub fn order_node(name: &str, eco: bool, quantity: u32, subtotal: &str) -> Value {
    let attributes = if eco {
        json!([{ "key": "eco_packaging", "value": "yes" }])
    } else {
        json!([])
    };
    json!({
        "id": format!("gid://shopify/Order/{}", name.trim_start_matches('#')),
        "name": name,
        "createdAt": "2026-08-20T10:30:00Z",
        "customer": {
            "firstName": "Mette",
            "lastName": "Jensen",
            "email": "mette@example.com"
        },
        "lineItems": {
            "edges": [{ "node": { "quantity": quantity, "title": "Beeswax candle" } }]
        },
        "note": null,
        "customAttributes": attributes,
        "subtotalPriceSet": {
            "shopMoney": { "amount": subtotal, "currencyCode": "DKK" }
        },
        "totalDiscountsSet": { "shopMoney": { "amount": "0.00" } }
    })
}

/// Wrap order nodes in the Admin GraphQL response envelope.
#[must_use]
pub fn orders_body(nodes: &[Value]) -> Value {
    let edges: Vec<Value> = nodes.iter().map(|node| json!({ "node": node })).collect();
    json!({ "data": { "orders": { "edges": edges } } })
}
