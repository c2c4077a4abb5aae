//! Request rendering
//!
//! Turns a typed [`Request`] into a [`TransportRequest`]. Rendering reads
//! the request only, so rendering the same request twice yields the same
//! transport request.

use relay_domain::request::{
    ACCEPT, APPLICATION_JSON, CONTENT_ENCODING, CONTENT_TYPE, HeaderFields, Request,
};
use url::Url;

use crate::error::RenderError;
use crate::ports::{BodyCompressor, TransportRequest};

/// Renders `request` against `base_url`.
///
/// Header precedence, lowest first: `default_headers`, the request's own
/// headers, then `Accept`, `Content-Type` and `Content-Encoding` which are
/// always set by the pipeline.
///
/// # Errors
///
/// Returns a [`RenderError`] if the URL cannot be built (including a path
/// with `.` or `..` segments), the data cannot be encoded or the compressor
/// fails.
pub fn render_request<T>(
    request: &Request<T>,
    base_url: &Url,
    default_headers: &HeaderFields,
    compressor: Option<&dyn BodyCompressor>,
) -> Result<TransportRequest, RenderError> {
    let url = build_url(request, base_url)?;

    let mut headers = default_headers.clone();
    headers.merge(request.header_fields());
    headers.set(ACCEPT, APPLICATION_JSON);

    let body = match request.encode_body()? {
        Some(value) => {
            let json = value.to_json_vec()?;
            headers.set(CONTENT_TYPE, APPLICATION_JSON);
            Some(match compressor {
                Some(compressor) => {
                    let compressed = compressor
                        .compress(&json)
                        .map_err(|e| RenderError::Compression(e.to_string()))?;
                    headers.set(CONTENT_ENCODING, compressor.content_encoding());
                    compressed
                }
                None => json,
            })
        }
        None => None,
    };

    Ok(TransportRequest {
        method: request.method(),
        url,
        headers,
        body,
        timeout: request.timeout(),
    })
}

fn build_url<T>(request: &Request<T>, base_url: &Url) -> Result<Url, RenderError> {
    let segments: Vec<&str> = request.path().split('/').filter(|s| !s.is_empty()).collect();
    // dot segments would climb out of the base path
    if segments.iter().any(|s| matches!(*s, "." | "..")) {
        return Err(RenderError::InvalidPath(request.path().to_string()));
    }

    let mut url = base_url.clone();
    {
        let mut path = url
            .path_segments_mut()
            .map_err(|()| RenderError::InvalidBaseUrl(base_url.to_string()))?;
        path.pop_if_empty();
        path.extend(segments);
    }

    if !request.parameters().is_empty() {
        url.query_pairs_mut().extend_pairs(
            request
                .parameters()
                .iter()
                .map(|p| (p.key.as_str(), p.value.as_str())),
        );
    }

    Ok(url)
}
