//! Response compression.
//!
//! Negotiation against `Accept-Encoding` (quality values, `q=0`, `*`) is
//! handled by tower-http; this module only fixes which encodings the
//! service offers.

use tower_http::compression::CompressionLayer;

/// Compression for plain HTTP responses: brotli, gzip and deflate.
///
/// Bodies under 32 bytes, images and event streams are left alone. Apply
/// it to HTTP routes only, never to the WebSocket upgrade route.
#[must_use]
pub fn compression_layer() -> CompressionLayer {
    CompressionLayer::new().br(true).gzip(true).deflate(true)
}
