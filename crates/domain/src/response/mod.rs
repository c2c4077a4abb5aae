//! Response model: status, headers, decoded payloads and HTTP errors.

mod headers;
mod http_error;
pub mod payload;
mod spec;
mod status;

pub use headers::ResponseHeaders;
pub use http_error::HttpError;
pub use spec::Response;
pub use status::HttpStatus;
