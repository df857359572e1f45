//! HSTS configuration.

use std::{convert::TryFrom, time::Duration};

use serde::Deserialize;

use crate::{
    errors::{Error, Result},
    Hsts, HstsLayer,
};

/// One year, the minimum `max-age` accepted by browser preload lists.
pub(crate) const ONE_YEAR: Duration = Duration::from_secs(31_536_000);

/// Represents configuration for the `Strict-Transport-Security` header.
///
/// A `Config` is immutable once it is turned into a layer, and is shared read-only by every
/// request.
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use hsts::Config;
///
/// let config = Config::new()
///     // Remember the policy for two years.
///     .max_age(Duration::from_secs(2 * 31_536_000))
///     // Cover every subdomain.
///     .include_subdomains()
///     // Ask to be included in browser preload lists.
///     .preload();
///
/// let layer = config.layer();
/// ```
///
/// A `Config` may also be deserialized from whatever format the host application loads:
///
/// ```
/// # use hsts::Config;
/// let config: Config = serde_json::from_str(r#"{ "max_age_secs": 60 }"#).unwrap();
/// assert_eq!(config, Config::new().max_age(std::time::Duration::from_secs(60)));
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawConfig")]
pub struct Config {
    pub(crate) max_age: Duration,
    pub(crate) include_subdomains: bool,
    pub(crate) preload: bool,
    pub(crate) enable_for_localhost: bool,
}

impl Config {
    /// Creates a new configuration.
    ///
    /// By default, this uses a max age of one year, no extra directives, and skips requests to
    /// `localhost`.
    pub fn new() -> Self {
        Self {
            max_age: ONE_YEAR,
            include_subdomains: false,
            preload: false,
            enable_for_localhost: false,
        }
    }

    /// Sets the time that browsers should remember the policy.
    ///
    /// Only the whole seconds of the [`Duration`] are used.
    pub fn max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }

    /// Sets the max age from signed seconds.
    ///
    /// # Errors
    ///
    /// Returns an error if `secs` is negative.
    ///
    /// # Example
    ///
    /// ```
    /// # use hsts::Config;
    /// assert!(Config::new().try_max_age_secs(86_400).is_ok());
    /// assert!(Config::new().try_max_age_secs(-1).is_err());
    /// ```
    pub fn try_max_age_secs(self, secs: i64) -> Result<Self> {
        let secs = u64::try_from(secs).map_err(|_| Error::NegativeMaxAge(secs))?;
        Ok(self.max_age(Duration::from_secs(secs)))
    }

    /// Adds the `includeSubDomains` directive.
    pub fn include_subdomains(mut self) -> Self {
        self.include_subdomains = true;
        self
    }

    /// Adds the `preload` directive.
    ///
    /// See <https://hstspreload.org/>
    pub fn preload(mut self) -> Self {
        self.preload = true;
        self
    }

    /// Also sends the header to requests for `localhost`.
    ///
    /// These are skipped by default so that local development over plaintext or self-signed
    /// certificates keeps working.
    pub fn enable_for_localhost(mut self) -> Self {
        self.enable_for_localhost = true;
        self
    }

    /// Creates a [`HstsLayer`] from this configuration, reporting decisions through
    /// [`tracing`].
    ///
    /// # Panics
    ///
    /// Panics if the header value could not be rendered. Use [`Builder`](crate::Builder) to handle
    /// this as an error instead.
    pub fn layer(self) -> HstsLayer {
        HstsLayer::builder()
            .config(self)
            .build()
            .unwrap_or_else(|error| panic!("{}", error))
    }

    /// Wraps the next handler `inner` with this configuration.
    ///
    /// # Panics
    ///
    /// Panics under the same conditions as [`layer`](Self::layer).
    pub fn apply<S>(self, inner: S) -> Hsts<S> {
        self.layer().wrap(inner)
    }

    /// Logs when the configuration would be rejected by browser preload lists.
    pub(crate) fn check_preload(&self) {
        if !self.preload {
            return;
        }
        if self.max_age < ONE_YEAR {
            tracing::warn!("HSTS preload was specified but the max-age was less than one year");
        }
        if !self.include_subdomains {
            tracing::warn!("HSTS preload was specified without includeSubDomains");
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawConfig {
    max_age_secs: i64,
    include_subdomains: bool,
    preload: bool,
    enable_for_localhost: bool,
}

impl Default for RawConfig {
    fn default() -> Self {
        let config = Config::new();
        Self {
            max_age_secs: config.max_age.as_secs() as i64,
            include_subdomains: config.include_subdomains,
            preload: config.preload,
            enable_for_localhost: config.enable_for_localhost,
        }
    }
}

impl TryFrom<RawConfig> for Config {
    type Error = Error;

    fn try_from(raw: RawConfig) -> Result<Self> {
        let mut config = Config::new().try_max_age_secs(raw.max_age_secs)?;
        config.include_subdomains = raw.include_subdomains;
        config.preload = raw.preload;
        config.enable_for_localhost = raw.enable_for_localhost;
        Ok(config)
    }
}
