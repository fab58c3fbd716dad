//! Static HTTP header reference data, exposed for display only.

pub mod headers;

pub use headers::{filter, find, request_headers, response_headers, HeaderCategory, HeaderInfo};
