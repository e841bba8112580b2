//! HTTP middleware applied by the server

pub mod request_tracking;

pub use request_tracking::{
    request_id_layer, request_id_propagation_layer, request_tracking, sensitive_headers_layer,
    PROPAGATE_HEADERS, SENSITIVE_HEADERS,
};
