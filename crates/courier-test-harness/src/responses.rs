//! Canned response templates.

use std::io::Write;
use std::time::Duration;

use flate2::write::{GzEncoder, ZlibEncoder};
use flate2::Compression;
use serde::Serialize;
use wiremock::ResponseTemplate;

pub fn ok_json<T: Serialize>(body: &T) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(body)
}

pub fn no_content() -> ResponseTemplate {
    ResponseTemplate::new(204)
}

/// Response with an arbitrary status and plain-text body.
pub fn status(code: u16, body: &str) -> ResponseTemplate {
    ResponseTemplate::new(code).set_body_string(body)
}

pub fn unauthorized() -> ResponseTemplate {
    ResponseTemplate::new(401).set_body_json(serde_json::json!({ "error": "Unauthorized" }))
}

pub fn not_found() -> ResponseTemplate {
    ResponseTemplate::new(404).set_body_json(serde_json::json!({ "error": "Not found" }))
}

pub fn rate_limited(retry_after: u32) -> ResponseTemplate {
    ResponseTemplate::new(429)
        .insert_header("Retry-After", retry_after.to_string().as_str())
        .set_body_json(serde_json::json!({ "error": "Rate limited" }))
}

pub fn server_error() -> ResponseTemplate {
    ResponseTemplate::new(500)
        .set_body_json(serde_json::json!({ "error": "Internal server error" }))
}

/// 200 that only arrives after `delay`.
pub fn slow(delay: Duration) -> ResponseTemplate {
    ResponseTemplate::new(200).set_delay(delay)
}

/// 200 with `body` as JSON, zlib-compressed and labelled `Content-Encoding: deflate`.
pub fn deflated_json<T: Serialize>(body: &T) -> ResponseTemplate {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(&json_bytes(body))
        .expect("in-memory compression");
    encoded(encoder.finish().expect("in-memory compression"), "deflate")
}

/// 200 with `body` as gzip-compressed JSON.
pub fn gzipped_json<T: Serialize>(body: &T) -> ResponseTemplate {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(&json_bytes(body))
        .expect("in-memory compression");
    encoded(encoder.finish().expect("in-memory compression"), "gzip")
}

fn json_bytes<T: Serialize>(body: &T) -> Vec<u8> {
    serde_json::to_vec(body).expect("serializable response body")
}

fn encoded(bytes: Vec<u8>, encoding: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("Content-Type", "application/json")
        .insert_header("Content-Encoding", encoding)
        .set_body_bytes(bytes)
}
