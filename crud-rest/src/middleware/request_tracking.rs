//! Request tracking middleware
//!
//! Request ID generation and propagation, correlation header propagation, and
//! masking of credentials in logged headers.

use axum::Router;
use http::header::{self, HeaderName};
use tower_http::{
    propagate_header::PropagateHeaderLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    sensitive_headers::SetSensitiveRequestHeadersLayer,
};

use crate::config::RequestTrackingConfig;
use crate::ids::MakeTypedRequestId;

/// Correlation headers copied from the request onto the response
pub const PROPAGATE_HEADERS: &[&str] = &["x-correlation-id", "x-trace-id", "x-span-id"];

/// Headers masked in logs
pub const SENSITIVE_HEADERS: [HeaderName; 5] = [
    header::AUTHORIZATION,
    header::COOKIE,
    header::SET_COOKIE,
    HeaderName::from_static("x-api-key"),
    HeaderName::from_static("x-auth-token"),
];

/// Set `x-request-id` to a fresh [`RequestId`](crate::ids::RequestId) when absent
pub fn request_id_layer() -> SetRequestIdLayer<MakeTypedRequestId> {
    SetRequestIdLayer::x_request_id(MakeTypedRequestId)
}

/// Copy `x-request-id` onto the response
pub fn request_id_propagation_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::x_request_id()
}

/// Mark [`SENSITIVE_HEADERS`] as sensitive so trace output hides them
pub fn sensitive_headers_layer() -> SetSensitiveRequestHeadersLayer {
    SetSensitiveRequestHeadersLayer::new(SENSITIVE_HEADERS)
}

/// Wrap a router with the request tracking layers enabled in `config`
///
/// The request id is set before anything inside the router runs, so spans and
/// handlers can read it.
pub fn request_tracking(router: Router, config: &RequestTrackingConfig) -> Router {
    let mut router = router;

    if config.mask_sensitive_headers {
        router = router.layer(sensitive_headers_layer());
    }

    if config.propagate_headers {
        for &name in PROPAGATE_HEADERS {
            router = router.layer(PropagateHeaderLayer::new(HeaderName::from_static(name)));
        }
    }

    if config.request_id_enabled {
        router = router
            .layer(request_id_propagation_layer())
            .layer(request_id_layer());
    }

    router
}
