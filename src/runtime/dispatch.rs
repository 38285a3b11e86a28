//! Body decoding used by generated response dispatchers

use serde::de::DeserializeOwned;

use crate::runtime::defaults::InternalError;

/// Decode a success body and wrap it in its output variant
///
/// A decode failure becomes the shared [`InternalError`] carrying the
/// decoder's message.
pub fn success<T, O>(body: &[u8], wrap: impl FnOnce(T) -> O) -> Result<O, InternalError>
where
    T: DeserializeOwned,
{
    serde_json::from_slice::<T>(body)
        .map(wrap)
        .map_err(|e| InternalError::new(e.to_string()))
}

/// Decode an error body into its error variant
///
/// A decode failure is promoted to the operation's `InternalError` variant.
pub fn error<T, E>(
    body: &[u8],
    wrap: impl FnOnce(T) -> E,
    internal: impl FnOnce(InternalError) -> E,
) -> E
where
    T: DeserializeOwned,
{
    match serde_json::from_slice::<T>(body) {
        Ok(value) => wrap(value),
        Err(e) => internal(InternalError::new(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::defaults::BadRequest;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        id: u32,
    }

    #[derive(Debug, PartialEq)]
    enum Outcome {
        Found(Item),
        Internal(InternalError),
    }

    #[test]
    fn test_success_decodes_and_wraps() {
        let outcome = success(br#"{"id":7}"#, Outcome::Found).unwrap();
        assert_eq!(outcome, Outcome::Found(Item { id: 7 }));
    }

    #[test]
    fn test_success_decode_failure_is_internal_error() {
        let err = success::<Item, _>(b"not json", Outcome::Found).unwrap_err();
        assert!(err.message.contains("expected"));
    }

    #[test]
    fn test_error_decode_failure_promotes_to_internal() {
        let outcome = error::<Item, _>(br#"{"wrong":true}"#, Outcome::Found, Outcome::Internal);
        match outcome {
            Outcome::Internal(e) => assert!(e.message.contains("missing field `id`")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[derive(Debug, PartialEq)]
    enum ShowError {
        BadRequest(BadRequest),
        InternalError(InternalError),
    }

    #[test]
    fn test_non_json_bad_request_becomes_internal_error() {
        let err = error(b"<html>oops</html>", ShowError::BadRequest, ShowError::InternalError);
        match err {
            ShowError::InternalError(e) => {
                assert!(e.message.contains("expected value"), "{}", e.message);
                assert!(!e.message.contains("oops"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_non_json_internal_error_keeps_decode_message() {
        let err = error(b"<html>oops</html>", ShowError::InternalError, ShowError::InternalError);
        match err {
            ShowError::InternalError(e) => assert!(e.message.contains("expected value")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_json_bad_request_decodes() {
        let err = error(br#"{"message":"name too long"}"#, ShowError::BadRequest, ShowError::InternalError);
        assert_eq!(err, ShowError::BadRequest(BadRequest::new("name too long")));
    }
}
