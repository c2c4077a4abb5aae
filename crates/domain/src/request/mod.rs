//! Request description types

mod header;
mod method;
mod query;
mod spec;

pub use header::{
    ACCEPT, APPLICATION_JSON, CONTENT_ENCODING, CONTENT_TYPE, HeaderFields, USER_AGENT,
};
pub use method::HttpMethod;
pub use query::{QueryParam, QueryParams};
pub use spec::{BodyShape, DEFAULT_TIMEOUT, Request};
