//! Idempotency key header extractor.

use axum::{
    extract::FromRequestParts,
    http::{header::HeaderName, request::Parts, StatusCode},
};

/// The header name for idempotency keys.
pub const IDEMPOTENCY_KEY_HEADER: &str = "idempotency-key";

/// Optional idempotency key extracted from request headers.
/// Returns `None` if the header is absent or empty.
#[derive(Debug, Clone)]
pub struct OptionalIdempotencyKey(pub Option<String>);

impl<S> FromRequestParts<S> for OptionalIdempotencyKey
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut Parts,
        _state: &'life1 S,
    ) -> ::core::pin::Pin<
        Box<
            dyn ::core::future::Future<Output = Result<Self, Self::Rejection>>
                + ::core::marker::Send
                + 'async_trait,
        >,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            let header_name = HeaderName::from_static(IDEMPOTENCY_KEY_HEADER);

            let key = parts
                .headers
                .get(&header_name)
                .and_then(|value| value.to_str().ok())
                .filter(|s| !s.is_empty())
                .map(|s| s.to_string());

            Ok(OptionalIdempotencyKey(key))
        })
    }
}
