//! Path and query extractors for the pageview routes
//!
//! Path segments arrive as strings so that non-numeric values are reported as
//! an invalid date rather than an axum path rejection.

use axum::extract::{FromRequestParts, Path, Query};
use axum::http::request::Parts;
use chrono::NaiveDate;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::types::ApiError;
use crate::domain::pageviews::{DateRange, InputError, parse_date};

#[derive(Debug, Deserialize)]
struct DatePathRaw {
    year: String,
    month: String,
    day: String,
}

#[derive(Debug, Deserialize)]
struct MonthPathRaw {
    year: String,
    month: String,
}

/// Decimal path segment; signs, spaces and empty strings are rejected
fn parse_segment<T: std::str::FromStr>(raw: &str) -> Result<T, InputError> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(InputError::InvalidDate);
    }
    raw.parse().map_err(|_| InputError::InvalidDate)
}

/// Validated `/{year}/{month}/{day}` start date
#[derive(Debug, Clone, Copy)]
pub struct DatePath(pub NaiveDate);

impl<S> FromRequestParts<S> for DatePath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<DatePathRaw>::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::from(InputError::InvalidDate))?;

        let date = parse_date(
            parse_segment(&raw.year)?,
            parse_segment(&raw.month)?,
            parse_segment(&raw.day)?,
        )?;
        Ok(Self(date))
    }
}

/// Validated `/{year}/{month}` resolved to the whole calendar month
#[derive(Debug, Clone, Copy)]
pub struct MonthPath(pub DateRange);

impl<S> FromRequestParts<S> for MonthPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<MonthPathRaw>::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::from(InputError::InvalidDate))?;

        let range = DateRange::calendar_month(
            parse_segment(&raw.year)?,
            parse_segment(&raw.month)?,
        )?;
        Ok(Self(range))
    }
}

/// Query extractor that reports malformed query strings as a JSON 400
#[derive(Debug)]
pub struct ApiQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
        Ok(Self(value))
    }
}
