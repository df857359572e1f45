//! Errors raised while constructing the middleware.
//!
//! Request handling itself never fails; every error here surfaces before the first request is
//! served.

use std::{error::Error as StdError, fmt};

use crate::header::InvalidHeaderValue;

/// An error constructing an [`HstsLayer`](crate::HstsLayer) or a [`Config`](crate::Config).
#[derive(Debug)]
#[non_exhaustive]
pub enum Error {
    /// [`Builder::build`](crate::Builder::build) was called without a [`Config`](crate::Config).
    MissingConfig,

    /// A `max-age` given as signed seconds was negative.
    NegativeMaxAge(i64),

    /// The rendered header value was rejected by [`HeaderValue`](crate::header::HeaderValue).
    InvalidHeaderValue(InvalidHeaderValue),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingConfig => write!(f, "no HSTS configuration was provided"),
            Self::NegativeMaxAge(secs) => {
                write!(f, "HSTS max-age must not be negative, got {} seconds", secs)
            }
            Self::InvalidHeaderValue(error) => {
                write!(f, "invalid Strict-Transport-Security value: {}", error)
            }
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::InvalidHeaderValue(error) => Some(error),
            Self::MissingConfig | Self::NegativeMaxAge(_) => None,
        }
    }
}

impl From<InvalidHeaderValue> for Error {
    fn from(error: InvalidHeaderValue) -> Self {
        Self::InvalidHeaderValue(error)
    }
}

pub type Result<T = ()> = std::result::Result<T, Error>;
