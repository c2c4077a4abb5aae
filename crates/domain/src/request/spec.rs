//! Typed request description
//!
//! A [`Request`] only describes intent. Rendering it into something a
//! transport can send happens in the application layer and never mutates
//! the request, so the same value can be rendered any number of times.

use std::any::Any;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

use super::{HeaderFields, HttpMethod, QueryParam, QueryParams};
use crate::coding::{Convertible, WireScalar};
use crate::error::EncodeResult;
use crate::transform::{Iso8601DateTimeTransformer, ValueTransformer};
use crate::wire::WireValue;

/// Per-request timeout used unless overridden.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// How a request's data is written to the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyShape {
    /// The request never carries data.
    None,
    /// A single JSON scalar.
    Fragment,
    /// A JSON object or array.
    Document,
}

type BodyEncoder<T> = fn(&T) -> EncodeResult<WireValue>;

/// One desired call: method, path relative to the session's base URL,
/// ordered query items, extra headers, a timeout and optional typed data.
///
/// `T` is the type of the data sent. The body strategy is fixed by the
/// constructor used: `post`/`put` for [`Convertible`] documents,
/// `post_value`/`put_value` for bare scalars, `post_items`/`put_items` for
/// arrays.
#[derive(Debug, Clone)]
pub struct Request<T> {
    method: HttpMethod,
    path: String,
    data: Option<T>,
    parameters: QueryParams,
    header_fields: HeaderFields,
    timeout: Duration,
    body_shape: BodyShape,
    body_encoder: BodyEncoder<T>,
    decode_context: Option<Arc<dyn Any + Send + Sync>>,
}

fn no_body<T>(_: &T) -> EncodeResult<WireValue> {
    Ok(WireValue::Null)
}

fn document_body<T: Convertible>(value: &T) -> EncodeResult<WireValue> {
    value.to_fields().map(WireValue::Object)
}

fn fragment_body<T: WireScalar>(value: &T) -> EncodeResult<WireValue> {
    Ok(value.to_wire())
}

#[allow(clippy::ptr_arg)]
fn items_body<T: Convertible>(values: &Vec<T>) -> EncodeResult<WireValue> {
    values
        .iter()
        .map(document_body)
        .collect::<EncodeResult<_>>()
        .map(WireValue::Array)
}

fn timestamp_body(value: &DateTime<Utc>) -> EncodeResult<WireValue> {
    Ok(Iso8601DateTimeTransformer.reverse_transformed_value(value).to_wire())
}

impl<T> Request<T> {
    fn build(
        method: HttpMethod,
        path: impl Into<String>,
        data: Option<T>,
        body_shape: BodyShape,
        body_encoder: BodyEncoder<T>,
    ) -> Self {
        Self {
            method,
            path: path.into(),
            data,
            parameters: QueryParams::new(),
            header_fields: HeaderFields::new(),
            timeout: DEFAULT_TIMEOUT,
            body_shape,
            body_encoder,
            decode_context: None,
        }
    }

    /// Appends query items, keeping their order.
    #[must_use]
    pub fn with_parameters<K, V>(mut self, parameters: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        for (key, value) in parameters {
            self.parameters.add(QueryParam::new(key, value));
        }
        self
    }

    /// Appends a single query item.
    #[must_use]
    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.add(QueryParam::new(key, value));
        self
    }

    /// Sets a header. Pipeline-managed headers still win at render time.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.header_fields.set(name, value);
        self
    }

    /// Overrides the timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Attaches a value handed to every decoder of the response.
    #[must_use]
    pub fn with_decode_context<C: Any + Send + Sync>(mut self, context: C) -> Self {
        self.decode_context = Some(Arc::new(context));
        self
    }

    /// Returns the method.
    #[must_use]
    pub const fn method(&self) -> HttpMethod {
        self.method
    }

    /// Returns the path relative to the base URL.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the data to send, if any.
    #[must_use]
    pub const fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    /// Returns the query items.
    #[must_use]
    pub const fn parameters(&self) -> &QueryParams {
        &self.parameters
    }

    /// Returns the extra headers.
    #[must_use]
    pub const fn header_fields(&self) -> &HeaderFields {
        &self.header_fields
    }

    /// Returns the timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns how the data is written.
    #[must_use]
    pub const fn body_shape(&self) -> BodyShape {
        self.body_shape
    }

    /// Returns the decode context, if one was attached.
    #[must_use]
    pub fn decode_context(&self) -> Option<&(dyn Any + Send + Sync + 'static)> {
        self.decode_context.as_deref()
    }

    /// Encodes the data into its wire form. `None` means no body.
    ///
    /// # Errors
    ///
    /// Propagates the data's encoder error.
    pub fn encode_body(&self) -> EncodeResult<Option<WireValue>> {
        if !self.method.has_body() {
            return Ok(None);
        }
        self.data.as_ref().map(self.body_encoder).transpose()
    }
}

impl Request<()> {
    /// A `GET` without data.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::build(HttpMethod::Get, path, None, BodyShape::None, no_body)
    }

    /// A `DELETE` without data.
    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::build(HttpMethod::Delete, path, None, BodyShape::None, no_body)
    }

    /// A `POST` without data.
    #[must_use]
    pub fn post_empty(path: impl Into<String>) -> Self {
        Self::build(HttpMethod::Post, path, None, BodyShape::None, no_body)
    }

    /// A `PUT` without data.
    #[must_use]
    pub fn put_empty(path: impl Into<String>) -> Self {
        Self::build(HttpMethod::Put, path, None, BodyShape::None, no_body)
    }
}

impl<T: Convertible> Request<T> {
    /// A `POST` whose body is `data` rendered as a JSON object.
    #[must_use]
    pub fn post(path: impl Into<String>, data: T) -> Self {
        Self::build(HttpMethod::Post, path, Some(data), BodyShape::Document, document_body)
    }

    /// A `PUT` whose body is `data` rendered as a JSON object.
    #[must_use]
    pub fn put(path: impl Into<String>, data: T) -> Self {
        Self::build(HttpMethod::Put, path, Some(data), BodyShape::Document, document_body)
    }
}

impl<T: WireScalar> Request<T> {
    /// A `POST` whose body is a single JSON scalar.
    #[must_use]
    pub fn post_value(path: impl Into<String>, value: T) -> Self {
        Self::build(HttpMethod::Post, path, Some(value), BodyShape::Fragment, fragment_body)
    }

    /// A `PUT` whose body is a single JSON scalar.
    #[must_use]
    pub fn put_value(path: impl Into<String>, value: T) -> Self {
        Self::build(HttpMethod::Put, path, Some(value), BodyShape::Fragment, fragment_body)
    }
}

impl<T: Convertible> Request<Vec<T>> {
    /// A `POST` whose body is a JSON array of objects.
    #[must_use]
    pub fn post_items(path: impl Into<String>, items: Vec<T>) -> Self {
        Self::build(HttpMethod::Post, path, Some(items), BodyShape::Document, items_body)
    }

    /// A `PUT` whose body is a JSON array of objects.
    #[must_use]
    pub fn put_items(path: impl Into<String>, items: Vec<T>) -> Self {
        Self::build(HttpMethod::Put, path, Some(items), BodyShape::Document, items_body)
    }
}

impl Request<DateTime<Utc>> {
    /// A `POST` whose body is the timestamp as an ISO 8601 string fragment.
    #[must_use]
    pub fn post_timestamp(path: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self::build(HttpMethod::Post, path, Some(at), BodyShape::Fragment, timestamp_body)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::coding::{DecodeContext, EncodeContext};
    use crate::error::DecodeResult;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    #[derive(Debug, Clone, PartialEq)]
    struct Note {
        text: String,
    }

    impl Convertible for Note {
        const TYPE_NAME: &'static str = "Note";

        fn decode(ctx: &DecodeContext<'_>) -> DecodeResult<Self> {
            Ok(Self {
                text: ctx.decode("text")?,
            })
        }

        fn encode(&self, ctx: &mut EncodeContext) -> EncodeResult<()> {
            ctx.encode("text", &self.text);
            Ok(())
        }
    }

    #[test]
    fn test_get_has_no_body_and_default_timeout() {
        let request = Request::get("hello").with_parameters([("a", "1"), ("b", "2")]);

        assert_eq!(request.method(), HttpMethod::Get);
        assert_eq!(request.path(), "hello");
        assert_eq!(request.parameters().len(), 2);
        assert_eq!(request.timeout(), DEFAULT_TIMEOUT);
        assert_eq!(request.body_shape(), BodyShape::None);
        assert_eq!(request.encode_body().unwrap(), None);
    }

    #[test]
    fn test_post_document_body() {
        let request = Request::post("notes", Note { text: "hi".into() });

        let body = request.encode_body().unwrap().unwrap();

        assert_eq!(request.body_shape(), BodyShape::Document);
        assert_eq!(body.to_json_vec().unwrap(), br#"{"text":"hi"}"#.to_vec());
    }

    #[test]
    fn test_post_value_renders_fragment() {
        let request = Request::post_value("greeting", String::from("Hello World"));

        let body = request.encode_body().unwrap().unwrap();

        assert_eq!(request.body_shape(), BodyShape::Fragment);
        assert_eq!(body, WireValue::String("Hello World".into()));
    }

    #[test]
    fn test_post_items_renders_array() {
        let request = Request::put_items(
            "notes",
            vec![Note { text: "a".into() }, Note { text: "b".into() }],
        );

        let body = request.encode_body().unwrap().unwrap();

        assert_eq!(body.to_json_vec().unwrap(), br#"[{"text":"a"},{"text":"b"}]"#.to_vec());
    }

    #[test]
    fn test_post_timestamp_uses_iso8601() {
        let at = Utc.with_ymd_and_hms(2016, 12, 24, 20, 15, 30).unwrap();

        let body = Request::post_timestamp("at", at).encode_body().unwrap();

        assert_eq!(body, Some(WireValue::String("2016-12-24T20:15:30.000Z".into())));
    }

    #[test]
    fn test_builders() {
        let request = Request::delete("items/1")
            .with_header("X-Trace", "abc")
            .with_parameter("force", "true")
            .with_timeout(Duration::from_secs(5))
            .with_decode_context(7_u32);

        assert_eq!(request.header_fields().get("x-trace"), Some("abc"));
        assert_eq!(request.parameters().get("force"), Some("true"));
        assert_eq!(request.timeout(), Duration::from_secs(5));
        assert_eq!(
            request.decode_context().and_then(|c| c.downcast_ref::<u32>()),
            Some(&7)
        );
    }

    #[test]
    fn test_rendering_is_repeatable() {
        let request = Request::post("notes", Note { text: "same".into() });
        assert_eq!(request.encode_body().unwrap(), request.encode_body().unwrap());
    }
}
