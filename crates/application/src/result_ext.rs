//! Result alias and combinators for finished requests.

use relay_domain::response::{HttpError, Response};

use crate::error::WebserviceError;

/// The single terminal outcome of a request.
pub type ResponseResult<T> = Result<Response<T>, WebserviceError>;

/// Convenience combinators on [`ResponseResult`].
pub trait ResponseResultExt<T>: Sized {
    /// Drops status and headers, keeping only the payload.
    ///
    /// # Errors
    ///
    /// Returns the request's error unchanged.
    fn data(self) -> Result<T, WebserviceError>;

    /// Transforms the payload, keeping status and headers. A failing
    /// transform turns the whole result into an error.
    ///
    /// # Errors
    ///
    /// Returns the request's error, or the transform's error converted.
    fn map_data<U, E>(self, f: impl FnOnce(T) -> Result<U, E>) -> ResponseResult<U>
    where
        E: Into<WebserviceError>;

    /// Rewrites `Http` errors only; other outcomes pass through.
    ///
    /// # Errors
    ///
    /// Returns the rewritten or original error.
    fn map_http_error(self, f: impl FnOnce(HttpError) -> WebserviceError) -> ResponseResult<T>;
}

impl<T> ResponseResultExt<T> for ResponseResult<T> {
    fn data(self) -> Result<T, WebserviceError> {
        self.map(Response::into_data)
    }

    fn map_data<U, E>(self, f: impl FnOnce(T) -> Result<U, E>) -> ResponseResult<U>
    where
        E: Into<WebserviceError>,
    {
        self?.try_map(|data| f(data).map_err(Into::into))
    }

    fn map_http_error(self, f: impl FnOnce(HttpError) -> WebserviceError) -> ResponseResult<T> {
        self.map_err(|err| match err {
            WebserviceError::Http(http) => f(http),
            other => other,
        })
    }
}
