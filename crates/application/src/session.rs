//! Session pipeline
//!
//! A [`Session`] renders typed requests, hands them to the transport,
//! classifies the status and parses the body. Every request runs on its
//! own task and reports exactly one outcome through its [`RequestHandle`].

use std::fmt;
use std::sync::Arc;

use relay_domain::coding::{AnyConvertible, Convertible, TypeRegistry, WireScalar};
use relay_domain::config::SessionConfig;
use relay_domain::request::{HeaderFields, Request, USER_AGENT};
use relay_domain::response::{HttpError, HttpStatus, Response, ResponseHeaders};
use relay_domain::wire::WireValue;
use tracing::{Instrument, debug, debug_span, warn};
use url::Url;
use uuid::Uuid;

use crate::cancellation::{CancellationReceiver, CancellationToken};
use crate::error::{RenderError, SessionBuildError};
use crate::handle::RequestHandle;
use crate::parser::{self, ParseInput, Parser};
use crate::ports::{BodyCompressor, HttpTransport, TransportError, TransportRequest};
use crate::render::render_request;
use crate::result_ext::ResponseResult;

/// Entry point for issuing requests against one base URL.
///
/// Cloning is cheap; clones share the transport, registry and headers.
#[derive(Clone)]
pub struct Session {
    base_url: Url,
    transport: Arc<dyn HttpTransport>,
    compressor: Option<Arc<dyn BodyCompressor>>,
    registry: Arc<TypeRegistry>,
    default_headers: Arc<HeaderFields>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("base_url", &self.base_url.as_str())
            .field("compressor", &self.compressor)
            .field("registry", &self.registry)
            .field("default_headers", &self.default_headers)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Starts building a session.
    #[must_use]
    pub fn builder() -> SessionBuilder {
        SessionBuilder::default()
    }

    /// The base every request path is appended to.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Types available to polymorphic decoding.
    #[must_use]
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Headers sent with every request.
    #[must_use]
    pub fn default_headers(&self) -> &HeaderFields {
        &self.default_headers
    }

    /// Renders `request` exactly as the pipeline would, without sending it.
    ///
    /// # Errors
    ///
    /// See [`render_request`].
    pub fn render<T>(&self, request: &Request<T>) -> Result<TransportRequest, RenderError> {
        render_request(
            request,
            &self.base_url,
            &self.default_headers,
            self.compressor.as_deref(),
        )
    }

    /// Sends a request whose response body is ignored.
    pub fn send<T>(&self, request: Request<T>) -> RequestHandle<()>
    where
        T: Send + 'static,
    {
        self.dispatch(request, parser::unit)
    }

    /// Sends a request expecting a single JSON scalar back.
    pub fn fetch_value<T, R>(&self, request: Request<T>) -> RequestHandle<R>
    where
        T: Send + 'static,
        R: WireScalar + Send + 'static,
    {
        self.dispatch(request, parser::fragment::<R>)
    }

    /// Sends a request expecting one JSON object back.
    pub fn fetch<T, R>(&self, request: Request<T>) -> RequestHandle<R>
    where
        T: Send + 'static,
        R: Convertible + Send + 'static,
    {
        self.dispatch(request, parser::object::<R>)
    }

    /// Sends a request expecting a JSON array of objects back.
    pub fn fetch_collection<T, R>(&self, request: Request<T>) -> RequestHandle<Vec<R>>
    where
        T: Send + 'static,
        R: Convertible + Send + 'static,
    {
        self.dispatch(request, parser::collection::<R>)
    }

    /// Sends a request expecting a discriminated object back.
    pub fn fetch_polymorphic<T>(&self, request: Request<T>) -> RequestHandle<Box<dyn AnyConvertible>>
    where
        T: Send + 'static,
    {
        self.dispatch(request, parser::polymorphic)
    }

    /// Sends a request expecting an array of discriminated objects back.
    pub fn fetch_polymorphic_collection<T>(
        &self,
        request: Request<T>,
    ) -> RequestHandle<Vec<Box<dyn AnyConvertible>>>
    where
        T: Send + 'static,
    {
        self.dispatch(request, parser::polymorphic_collection)
    }

    /// Sends a request and returns the body as an untyped JSON value.
    pub fn fetch_json<T>(&self, request: Request<T>) -> RequestHandle<WireValue>
    where
        T: Send + 'static,
    {
        self.dispatch(request, parser::json)
    }

    /// Spawns the pipeline for one request.
    ///
    /// Must be called from within a Tokio runtime.
    fn dispatch<T, O>(&self, request: Request<T>, parse: Parser<O>) -> RequestHandle<O>
    where
        T: Send + 'static,
        O: Send + 'static,
    {
        let (token, cancel) = CancellationToken::new();
        let request_id = Uuid::now_v7();
        let span = debug_span!(
            "request",
            %request_id,
            method = %request.method(),
            path = request.path()
        );

        let session = self.clone();
        let task = tokio::spawn(
            async move { session.run(request, parse, cancel).await }.instrument(span),
        );
        RequestHandle::new(task, token)
    }

    async fn run<T, O>(
        self,
        request: Request<T>,
        parse: Parser<O>,
        mut cancel: CancellationReceiver,
    ) -> ResponseResult<O> {
        if cancel.is_cancelled() {
            return Err(TransportError::Cancelled.into());
        }

        let rendered = self.render(&request)?;
        debug!(
            url = %rendered.url,
            body_bytes = rendered.body.as_ref().map_or(0, Vec::len),
            "Sending request"
        );

        let received = tokio::select! {
            biased;
            () = cancel.cancelled() => {
                debug!("Request cancelled");
                return Err(TransportError::Cancelled.into());
            }
            result = self.transport.send(rendered) => result,
        };
        let received = received.inspect_err(|e| warn!(error = %e, "Transport failed"))?;

        let status = HttpStatus::from_code(received.status);
        let headers: ResponseHeaders = received.headers.into_iter().collect();
        debug!(
            %status,
            body_bytes = received.body.as_ref().map_or(0, Vec::len),
            "Response received"
        );

        if !status.is_success() {
            return Err(HttpError::new(status, headers, received.body).into());
        }

        let data = parse(ParseInput {
            body: received.body.as_deref(),
            registry: &self.registry,
            context: request.decode_context(),
        })?;

        Ok(Response::new(data, headers, status))
    }
}

/// Builder for [`Session`].
#[derive(Default)]
pub struct SessionBuilder {
    base_url: Option<Url>,
    transport: Option<Arc<dyn HttpTransport>>,
    compressor: Option<Arc<dyn BodyCompressor>>,
    registry: TypeRegistry,
    default_headers: HeaderFields,
}

impl fmt::Debug for SessionBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionBuilder")
            .field("base_url", &self.base_url)
            .field("has_transport", &self.transport.is_some())
            .field("compressor", &self.compressor)
            .field("registry", &self.registry)
            .field("default_headers", &self.default_headers)
            .finish()
    }
}

impl SessionBuilder {
    /// Seeds base URL and headers from a configuration.
    ///
    /// The transport and compressor are still up to the caller.
    ///
    /// # Errors
    ///
    /// Returns [`SessionBuildError::InvalidConfig`] if the base URL is invalid.
    pub fn from_config(config: &SessionConfig) -> Result<Self, SessionBuildError> {
        let mut builder = Self {
            base_url: Some(config.base_url()?),
            default_headers: config.header_fields(),
            ..Self::default()
        };
        if let Some(agent) = &config.user_agent {
            builder.default_headers.set(USER_AGENT, agent.as_str());
        }
        Ok(builder)
    }

    /// Sets the base URL.
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the transport.
    #[must_use]
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Compresses every request body with `compressor`.
    #[must_use]
    pub fn compressor(mut self, compressor: Arc<dyn BodyCompressor>) -> Self {
        self.compressor = Some(compressor);
        self
    }

    /// Replaces the type registry.
    #[must_use]
    pub fn registry(mut self, registry: TypeRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Registers one polymorphic type.
    #[must_use]
    pub fn register<T: Convertible + AnyConvertible>(mut self) -> Self {
        self.registry.register::<T>();
        self
    }

    /// Adds a header sent with every request.
    #[must_use]
    pub fn default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.set(name, value);
        self
    }

    /// Builds the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL or transport is missing.
    pub fn build(self) -> Result<Session, SessionBuildError> {
        let base_url = self.base_url.ok_or(SessionBuildError::MissingBaseUrl)?;
        if base_url.cannot_be_a_base() {
            return Err(relay_domain::DomainError::InvalidUrl(base_url.to_string()).into());
        }
        Ok(Session {
            base_url,
            transport: self.transport.ok_or(SessionBuildError::MissingTransport)?,
            compressor: self.compressor,
            registry: Arc::new(self.registry),
            default_headers: Arc::new(self.default_headers),
        })
    }
}
