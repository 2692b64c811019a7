//! Extractors that reject bad input with a structured `ApiError` instead of
//! axum's plain-text rejections.

use crate::error::{ApiError, ApiResult};
use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
    Json,
};
use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use std::num::IntErrorKind;
use tracing::warn;
use validator::Validate;

/// JSON body that has been deserialized and then checked with `validator`.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(ValidatedJson(value))
    }
}

/// Path parameters; a segment that does not parse (e.g. `/users/abc`) is a
/// malformed request.
#[derive(Debug)]
pub struct ApiPath<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state).await?;
        Ok(ApiPath(value))
    }
}

/// Numeric row id taken from a path segment.
///
/// Any integer is accepted. One that does not fit a primary key can never
/// have been issued, so it is kept as `None` and answered like an unknown id.
/// Non-integer segments fail to deserialize and are malformed requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowId(Option<i32>);

impl RowId {
    pub fn parse(raw: &str) -> Result<Self, String> {
        match raw.parse::<i32>() {
            Ok(id) => Ok(RowId(Some(id))),
            Err(e) if matches!(e.kind(), IntErrorKind::PosOverflow | IntErrorKind::NegOverflow) => {
                Ok(RowId(None))
            }
            Err(_) => Err(format!("'{}' is not an integer id", raw)),
        }
    }

    pub fn get(self) -> Option<i32> {
        self.0
    }

    /// The id, or a 404 for `entity` when it is out of key range
    pub fn or_not_found(self, entity: &str) -> ApiResult<i32> {
        self.0.ok_or_else(|| {
            warn!("{} id is outside the key range", entity);
            ApiError::not_found(entity)
        })
    }
}

impl<'de> Deserialize<'de> for RowId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        RowId::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_row_id_in_range() {
        assert_eq!(RowId::parse("42").unwrap().get(), Some(42));
        assert_eq!(RowId::parse("-7").unwrap().get(), Some(-7));
        assert_eq!(RowId::parse("2147483647").unwrap().get(), Some(i32::MAX));
    }

    #[test]
    fn test_row_id_out_of_range_is_not_found() {
        for raw in ["2147483648", "-2147483649", "99999999999999999999999"] {
            let id = RowId::parse(raw).unwrap();
            assert_eq!(id.get(), None);
            let error = id.or_not_found("User").unwrap_err();
            assert_eq!(error.status_code(), StatusCode::NOT_FOUND);
        }
    }

    #[test]
    fn test_row_id_rejects_non_integers() {
        for raw in ["abc", "", "1.5", "12a"] {
            assert!(RowId::parse(raw).is_err(), "{} should be rejected", raw);
        }
    }
}
