//! Request body decoding

use http_body_util::{BodyExt, LengthLimitError, Limited};
use hyper::body::Body;
use serde::de::DeserializeOwned;

use super::error::ApiError;
use crate::logger;

/// Collect at most `max_body_size` bytes and decode them as JSON
///
/// Oversized bodies map to `PayloadTooLarge`. Unreadable or undecodable bodies
/// map to the generic bad request.
pub async fn read_json<T, B>(body: B, max_body_size: u64) -> Result<T, ApiError>
where
    T: DeserializeOwned,
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let limit = usize::try_from(max_body_size).unwrap_or(usize::MAX);
    let bytes = match Limited::new(body, limit).collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => {
            logger::log_warning(&format!("Request body exceeds {max_body_size} bytes"));
            return Err(ApiError::PayloadTooLarge);
        }
        Err(e) => {
            logger::log_warning(&format!("Failed to read request body: {e}"));
            return Err(ApiError::malformed_body());
        }
    };

    serde_json::from_slice(&bytes).map_err(|e| {
        logger::log_debug(&format!("Rejected request body: {e}"));
        ApiError::malformed_body()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ItemData;
    use http_body_util::Full;
    use hyper::body::Bytes;

    fn body(text: &'static str) -> Full<Bytes> {
        Full::new(Bytes::from_static(text.as_bytes()))
    }

    #[tokio::test]
    async fn test_reads_item_data() {
        let data: ItemData = read_json(body(r#"{"name":"a","description":"b"}"#), 1024)
            .await
            .unwrap();
        assert_eq!(data, ItemData::new("a", "b"));
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        for text in ["", "{", r#"{"name":1}"#, "null", "[]", r#"["a","b"]"#] {
            let err = read_json::<ItemData, _>(body(text), 1024).await.unwrap_err();
            assert_eq!(err, ApiError::malformed_body(), "body: {text:?}");
        }
    }

    #[tokio::test]
    async fn test_oversized_body() {
        let err = read_json::<ItemData, _>(body(r#"{"name":"abcdefghij"}"#), 8)
            .await
            .unwrap_err();
        assert_eq!(err, ApiError::PayloadTooLarge);
    }
}
