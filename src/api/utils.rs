//! Request body helpers shared by the admin handlers

use axum::body::Body;
use bytes::Bytes;
use http_body_util::{BodyExt, LengthLimitError, Limited};

use crate::api::error::ApiError;

/// Accepts `application/json` with optional parameters such as a charset.
/// Rejects look-alikes (`application/jsonp`, `text/json`) and garbage.
pub fn parse_content_type(content_type: &str) -> Result<mime::Mime, ApiError> {
    let media_type: mime::Mime = content_type.parse().map_err(|_| {
        ApiError::InvalidPayload(format!("invalid Content-Type: {content_type}"))
    })?;

    if media_type.type_() != mime::APPLICATION || media_type.subtype() != mime::JSON {
        return Err(ApiError::InvalidPayload(format!(
            "Content-Type must be application/json, got: {}/{}",
            media_type.type_(),
            media_type.subtype()
        )));
    }

    Ok(media_type)
}

/// Collects at most `limit` bytes of `body`.
pub async fn read_limited(body: Body, limit: usize) -> Result<Bytes, ApiError> {
    match Limited::new(body, limit).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(err) if err.downcast_ref::<LengthLimitError>().is_some() => {
            Err(ApiError::PayloadTooLarge(limit))
        }
        Err(err) => Err(ApiError::InvalidPayload(format!("failed to read body: {err}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_content_type_valid() {
        assert!(parse_content_type("application/json").is_ok());
        assert!(parse_content_type("application/json; charset=utf-8").is_ok());
    }

    #[test]
    fn test_parse_content_type_invalid() {
        for content_type in ["application/jsonp", "text/json", "text/plain", "invalid", ""] {
            assert!(
                parse_content_type(content_type).is_err(),
                "{content_type} should be rejected"
            );
        }
    }

    #[tokio::test]
    async fn test_read_limited_within_limit() {
        let bytes = read_limited(Body::from("{\"sections\":{}}"), 64).await.unwrap();
        assert_eq!(&bytes[..], b"{\"sections\":{}}");
    }

    #[tokio::test]
    async fn test_read_limited_too_large() {
        let result = read_limited(Body::from(vec![b'a'; 100]), 10).await;
        assert!(matches!(result, Err(ApiError::PayloadTooLarge(10))));
    }
}
