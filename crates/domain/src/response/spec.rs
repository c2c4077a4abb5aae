//! Decoded response

use super::{HttpStatus, ResponseHeaders};

/// A successful response: the decoded payload plus status and headers.
#[derive(Debug, Clone, PartialEq)]
pub struct Response<T> {
    /// The decoded payload.
    pub data: T,
    /// Response headers.
    pub header_fields: ResponseHeaders,
    /// Response status.
    pub status: HttpStatus,
}

impl<T> Response<T> {
    /// Creates a response.
    #[must_use]
    pub const fn new(data: T, header_fields: ResponseHeaders, status: HttpStatus) -> Self {
        Self {
            data,
            header_fields,
            status,
        }
    }

    /// Replaces the payload, keeping status and headers.
    #[must_use]
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Response<U> {
        Response {
            data: f(self.data),
            header_fields: self.header_fields,
            status: self.status,
        }
    }

    /// Fallible [`Response::map`].
    ///
    /// # Errors
    ///
    /// Returns whatever `f` returns.
    pub fn try_map<U, E>(self, f: impl FnOnce(T) -> Result<U, E>) -> Result<Response<U>, E> {
        Ok(Response {
            data: f(self.data)?,
            header_fields: self.header_fields,
            status: self.status,
        })
    }

    /// Consumes the response, returning its payload.
    pub fn into_data(self) -> T {
        self.data
    }
}
