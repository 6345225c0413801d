use axum::http::header;
use axum::response::{IntoResponse, Response};
use bytes::Bytes;

/// Rendered template output ready to be returned from an axum handler.
///
/// Responds with `200 OK`, the rendered bytes as the body and a content
/// type matching the engine's configured template mode.
#[derive(Clone, Debug)]
pub struct RenderedTemplate {
    body: Bytes,
    content_type: &'static str,
}

impl RenderedTemplate {
    pub(crate) fn new(body: Bytes, content_type: &'static str) -> Self {
        RenderedTemplate { body, content_type }
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn content_type(&self) -> &'static str {
        self.content_type
    }
}

impl IntoResponse for RenderedTemplate {
    fn into_response(self) -> Response {
        ([(header::CONTENT_TYPE, self.content_type)], self.body).into_response()
    }
}
