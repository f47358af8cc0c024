//! Typed lookups of environment variables.

use std::fmt;
use std::str::FromStr;

use crate::env::TargetEnv;
use crate::error::{BoxError, Error};

/// Read `key` from the process environment.
pub fn getenv(key: &str) -> Result<String, Error> {
    Var::new(key).get()
}

/// Read `key` from the process environment and parse it with [`FromStr`].
pub fn getenv_parsed<T>(key: &str) -> Result<T, Error>
where
    T: FromStr,
    T::Err: Into<BoxError>,
{
    Var::parsed(key).get()
}

/// Read and parse `key`, returning `default` unconverted when it is absent.
pub fn getenv_or<T>(key: &str, default: T) -> Result<T, Error>
where
    T: FromStr,
    T::Err: Into<BoxError>,
{
    Var::parsed(key).default(default).get()
}

/// Value used by [`Var`] when its key is absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fallback<T> {
    /// Raw text, converted like a value found in the environment.
    Raw(String),
    /// A typed value, returned as is.
    Value(T),
}

type Converter<'a, T> = Box<dyn FnOnce(&str) -> Result<T, BoxError> + 'a>;

/// A lookup of a single variable with an optional default and conversion.
///
/// ```
/// use minenv::{TargetEnv, Var};
///
/// let env = TargetEnv::memory();
/// let port: u16 = Var::parsed("PORT").default(8080).get_in(&env)?;
/// assert_eq!(port, 8080);
/// # Ok::<(), minenv::Error>(())
/// ```
pub struct Var<'a, T> {
    key: &'a str,
    fallback: Option<Fallback<T>>,
    into: Converter<'a, T>,
}

impl<'a> Var<'a, String> {
    /// Look up `key` as a plain string.
    pub fn new(key: &'a str) -> Self {
        Self::with(key, |raw| Ok::<_, std::convert::Infallible>(raw.to_owned()))
    }
}

impl<'a, T> Var<'a, T> {
    /// Look up `key` and parse it with [`FromStr`].
    pub fn parsed(key: &'a str) -> Self
    where
        T: FromStr,
        T::Err: Into<BoxError>,
    {
        Self::with(key, |raw| raw.parse::<T>())
    }

    /// Look up `key` and convert it with `into`.
    pub fn with<F, E>(key: &'a str, into: F) -> Self
    where
        F: FnOnce(&str) -> Result<T, E> + 'a,
        E: Into<BoxError>,
    {
        Self {
            key,
            fallback: None,
            into: Box::new(move |raw| into(raw).map_err(Into::into)),
        }
    }

    /// Return `value` unconverted when the key is absent.
    pub fn default(mut self, value: T) -> Self {
        self.fallback = Some(Fallback::Value(value));
        self
    }

    /// Convert `raw` when the key is absent, as if it had been set.
    pub fn default_raw(mut self, raw: impl Into<String>) -> Self {
        self.fallback = Some(Fallback::Raw(raw.into()));
        self
    }

    pub fn fallback(mut self, fallback: Fallback<T>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    /// Resolve against the process environment.
    pub fn get(self) -> Result<T, Error> {
        // SAFETY: the target is only read from, never written.
        let env = unsafe { TargetEnv::process() };
        self.get_in(&env)
    }

    /// Resolve against `env`.
    pub fn get_in(self, env: &TargetEnv) -> Result<T, Error> {
        if self.key.is_empty() {
            return Err(Error::EmptyKey);
        }

        let raw = match (env.get(self.key)?, self.fallback) {
            (Some(raw), _) => raw,
            (None, Some(Fallback::Raw(raw))) => raw,
            (None, Some(Fallback::Value(value))) => return Ok(value),
            (None, None) => {
                return Err(Error::MissingKey {
                    key: self.key.to_owned(),
                });
            }
        };

        (self.into)(&raw).map_err(|source| Error::Conversion {
            key: self.key.to_owned(),
            source,
        })
    }
}

impl<T: fmt::Debug> fmt::Debug for Var<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Var")
            .field("key", &self.key)
            .field("fallback", &self.fallback)
            .finish_non_exhaustive()
    }
}
