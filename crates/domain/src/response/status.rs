//! HTTP status catalogue

use std::fmt;

macro_rules! http_statuses {
    ($($variant:ident = $code:literal => $phrase:literal,)*) => {
        /// The closed set of statuses a response is classified into.
        ///
        /// Codes outside the catalogue map to [`HttpStatus::Unknown`], which is
        /// never a success.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum HttpStatus {
            $(
                #[doc = concat!("`", stringify!($code), " ", $phrase, "`")]
                $variant,
            )*
            /// A code outside the catalogue.
            Unknown(u16),
        }

        impl HttpStatus {
            /// Classifies a numeric code.
            #[must_use]
            pub const fn from_code(code: u16) -> Self {
                match code {
                    $($code => Self::$variant,)*
                    other => Self::Unknown(other),
                }
            }

            /// Returns the numeric code.
            #[must_use]
            pub const fn code(self) -> u16 {
                match self {
                    $(Self::$variant => $code,)*
                    Self::Unknown(code) => code,
                }
            }

            /// Returns the reason phrase.
            #[must_use]
            pub const fn reason_phrase(self) -> &'static str {
                match self {
                    $(Self::$variant => $phrase,)*
                    Self::Unknown(_) => "Unknown Error",
                }
            }
        }
    };
}

http_statuses! {
    Continue = 100 => "Continue",
    SwitchingProtocols = 101 => "Switching Protocols",
    Processing = 102 => "Processing",
    Ok = 200 => "OK",
    Created = 201 => "Created",
    Accepted = 202 => "Accepted",
    NonAuthoritativeInformation = 203 => "Non-Authoritative Information",
    NoContent = 204 => "No Content",
    ResetContent = 205 => "Reset Content",
    PartialContent = 206 => "Partial Content",
    MultiStatus = 207 => "Multi-Status",
    AlreadyReported = 208 => "Already Reported",
    ImUsed = 209 => "IM Used",
    MultipleChoices = 300 => "Multiple Choices",
    MovedPermanently = 301 => "Moved Permanently",
    Found = 302 => "Found",
    SeeOther = 303 => "See Other",
    NotModified = 304 => "Not Modified",
    UseProxy = 305 => "Use Proxy",
    SwitchProxy = 306 => "Switch Proxy",
    TemporaryRedirect = 307 => "Temporary Redirect",
    PermanentRedirect = 308 => "Permanent Redirect",
    BadRequest = 400 => "Bad Request",
    Unauthorized = 401 => "Unauthorized",
    PaymentRequired = 402 => "Payment Required",
    Forbidden = 403 => "Forbidden",
    NotFound = 404 => "Not Found",
    MethodNotAllowed = 405 => "Method Not Allowed",
    NotAcceptable = 406 => "Not Acceptable",
    ProxyAuthenticationRequired = 407 => "Proxy Authentication Required",
    RequestTimeout = 408 => "Request Timeout",
    Conflict = 409 => "Conflict",
    Gone = 410 => "Gone",
    LengthRequired = 411 => "Length Required",
    PreconditionFailed = 412 => "Precondition Failed",
    PayloadTooLarge = 413 => "Payload Too Large",
    UriTooLong = 414 => "URI Too Long",
    UnsupportedMediaType = 415 => "Unsupported Media Type",
    RangeNotSatisfiable = 416 => "Range Not Satisfiable",
    ExpectationFailed = 417 => "Expectation Failed",
    ImATeapot = 418 => "I'm a teapot",
    MisdirectedRequest = 421 => "Misdirected Request",
    UnprocessableEntity = 422 => "Unprocessable Entity",
    Locked = 423 => "Locked",
    FailedDependency = 424 => "Failed Dependency",
    UpgradeRequired = 426 => "Upgrade Required",
    PreconditionRequired = 428 => "Precondition Required",
    TooManyRequests = 429 => "Too Many Requests",
    RequestHeaderFieldsTooLarge = 431 => "Request Header Fields Too Large",
    UnavailableForLegalReasons = 451 => "Unavailable For Legal Reasons",
    InternalServerError = 500 => "Internal Server Error",
    NotImplemented = 501 => "Not Implemented",
    BadGateway = 502 => "Bad Gateway",
    ServiceUnavailable = 503 => "Service Unavailable",
    GatewayTimeout = 504 => "Gateway Timeout",
    HttpVersionNotSupported = 505 => "HTTP Version Not Supported",
    VariantAlsoNegotiates = 506 => "Variant Also Negotiates",
    InsufficientStorage = 507 => "Insufficient Storage",
    LoopDetected = 508 => "Loop Detected",
    NotExtended = 510 => "Not Extended",
    NetworkAuthenticationRequired = 511 => "Network Authentication Required",
}

impl HttpStatus {
    /// Returns true for catalogued codes below 300.
    #[must_use]
    pub const fn is_success(self) -> bool {
        !matches!(self, Self::Unknown(_)) && self.code() < 300
    }

    /// Returns true for anything that is not a success.
    #[must_use]
    pub const fn is_error(self) -> bool {
        !self.is_success()
    }
}

impl fmt::Display for HttpStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.code(), self.reason_phrase())
    }
}

impl From<u16> for HttpStatus {
    fn from(code: u16) -> Self {
        Self::from_code(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_catalogued_codes_round_trip() {
        for code in [100, 200, 209, 304, 404, 418, 451, 511] {
            let status = HttpStatus::from_code(code);
            assert!(!matches!(status, HttpStatus::Unknown(_)), "{code}");
            assert_eq!(status.code(), code);
        }
    }

    #[test]
    fn test_success_boundary() {
        assert!(HttpStatus::Ok.is_success());
        assert!(HttpStatus::PermanentRedirect.is_error());
        assert!(HttpStatus::Continue.is_success());
        assert!(HttpStatus::NotFound.is_error());
    }

    #[test]
    fn test_unknown_is_never_success() {
        let status = HttpStatus::from_code(299);
        assert_eq!(status, HttpStatus::Unknown(299));
        assert!(status.is_error());
        assert_eq!(status.code(), 299);
    }

    #[test]
    fn test_display() {
        assert_eq!(HttpStatus::NotFound.to_string(), "404 (Not Found)");
        assert_eq!(HttpStatus::from(999).to_string(), "999 (Unknown Error)");
    }
}
