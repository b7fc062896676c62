//! Item identifier validation
//!
//! Runs before every item-scoped handler. A failure ends the request here:
//! the verb handler never sees an invalid id and no store call is made.

use crate::http::ApiError;
use crate::models::ItemId;

pub const MSG_ID_REQUIRED: &str = "item ID is required";
pub const MSG_ID_INVALID: &str = "invalid item ID";

/// Parse the `{itemId}` path segment into an `ItemId`
///
/// Only plain ASCII digits are accepted, so signs, whitespace and values
/// beyond `i64::MAX` are rejected.
pub fn item_context(raw: &str) -> Result<ItemId, ApiError> {
    if raw.is_empty() {
        return Err(ApiError::BadRequest(MSG_ID_REQUIRED.to_string()));
    }
    if !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ApiError::BadRequest(MSG_ID_INVALID.to_string()));
    }
    raw.parse::<i64>()
        .map(ItemId::new)
        .map_err(|_| ApiError::BadRequest(MSG_ID_INVALID.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("0", 0)]
    #[case("7", 7)]
    #[case("0042", 42)]
    #[case("9223372036854775807", i64::MAX)]
    fn test_valid_ids(#[case] raw: &str, #[case] expected: i64) {
        assert_eq!(item_context(raw), Ok(ItemId::new(expected)));
    }

    #[test]
    fn test_empty_id() {
        assert_eq!(
            item_context(""),
            Err(ApiError::BadRequest("item ID is required".to_string()))
        );
    }

    #[rstest]
    #[case("abc")]
    #[case("-1")]
    #[case("+1")]
    #[case("1.5")]
    #[case(" 1")]
    #[case("1a")]
    #[case("9223372036854775808")]
    fn test_invalid_ids(#[case] raw: &str) {
        assert_eq!(
            item_context(raw),
            Err(ApiError::BadRequest("invalid item ID".to_string()))
        );
    }
}
