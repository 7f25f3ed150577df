//! In-process request/response abstraction.
//!
//! Views are plain Rust callables taking an [`http::Request`] and returning an
//! [`http::Response`] whose body is either raw bytes or a deferred template.
//! Nothing here touches a socket: the exporter builds requests with
//! [`get`], calls the view directly and reads the body with [`content`].
//!
//! Route paths are arbitrary strings, so [`get`] percent-encodes each
//! segment before building the URI. Views read the decoded path back with
//! [`request_path`].
//!
//! Deferred bodies mirror template responses of server frameworks: the view
//! decides *what* to render, the caller decides *when*. A response with a
//! [`Body::Template`] body must go through [`render`] before its bytes are
//! available.

use http::header::{CONTENT_TYPE, HOST};
use http::{HeaderValue, StatusCode};
use maud::Markup;
use std::borrow::Cow;
use std::fmt;
use thiserror::Error;

pub type Request = http::Request<()>;
pub type Response = http::Response<Body>;

/// Host header carried by synthetic requests.
pub const SYNTHETIC_HOST: &str = "testserver";

const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

#[derive(Error, Debug)]
pub enum ViewError {
    #[error("invalid request: {0}")]
    InvalidRequest(#[from] http::Error),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("template error: {0}")]
    Template(String),
    #[error("response for {0} was not rendered")]
    NotRendered(String),
}

type Deferred = Box<dyn FnOnce() -> Result<Markup, ViewError>>;

/// Response body.
pub enum Body {
    Bytes(Vec<u8>),
    /// A template not yet materialized.
    Template(Deferred),
}

impl Body {
    pub fn is_rendered(&self) -> bool {
        matches!(self, Body::Bytes(_))
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Body::Bytes(b) => f.debug_tuple("Bytes").field(&b.len()).finish(),
            Body::Template(_) => f.write_str("Template(..)"),
        }
    }
}

/// A request handler.
pub trait View {
    fn handle(&self, request: &Request) -> Result<Response, ViewError>;
}

impl<F> View for F
where
    F: Fn(&Request) -> Result<Response, ViewError>,
{
    fn handle(&self, request: &Request) -> Result<Response, ViewError> {
        self(request)
    }
}

/// Build a minimal synthetic `GET` request for `path`.
pub fn get(path: &str) -> Result<Request, ViewError> {
    Ok(Request::get(encode_path(path))
        .header(HOST, HeaderValue::from_static(SYNTHETIC_HOST))
        .body(())?)
}

/// `/mix tapes/` -> `/mix%20tapes/`
fn encode_path(path: &str) -> String {
    path.split('/')
        .map(urlencoding::encode)
        .collect::<Vec<_>>()
        .join("/")
}

/// Decoded path of `request`, as the route table spells it.
pub fn request_path(request: &Request) -> String {
    let raw = request.uri().path();
    urlencoding::decode(raw)
        .map(Cow::into_owned)
        .unwrap_or_else(|_| raw.to_string())
}

/// An already-rendered HTML response.
pub fn html(markup: Markup) -> Response {
    with_html_type(Response::new(Body::Bytes(markup.into_string().into_bytes())))
}

/// An HTML response whose template runs on [`render`].
pub fn template<F>(deferred: F) -> Response
where
    F: FnOnce() -> Result<Markup, ViewError> + 'static,
{
    with_html_type(Response::new(Body::Template(Box::new(deferred))))
}

/// A plain 404 response.
pub fn not_found() -> Response {
    let mut response = Response::new(Body::Bytes(b"Not Found".to_vec()));
    *response.status_mut() = StatusCode::NOT_FOUND;
    response
}

/// Materialize a deferred template body. Rendered responses pass through.
pub fn render(response: Response) -> Result<Response, ViewError> {
    let (parts, body) = response.into_parts();
    let body = match body {
        Body::Template(deferred) => Body::Bytes(deferred()?.into_string().into_bytes()),
        rendered => rendered,
    };
    Ok(Response::from_parts(parts, body))
}

/// Raw body bytes of a rendered response.
pub fn content(response: Response, path: &str) -> Result<Vec<u8>, ViewError> {
    match response.into_body() {
        Body::Bytes(bytes) => Ok(bytes),
        Body::Template(_) => Err(ViewError::NotRendered(path.to_string())),
    }
}

fn with_html_type(mut response: Response) -> Response {
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(HTML_CONTENT_TYPE));
    response
}
