//! Server configuration loaded from the environment.

use thiserror::Error;

/// The address to listen on when `ADDRESS` isn't set.
const DEFAULT_ADDRESS: &str = "0.0.0.0:8000";

/// The upload size limit in bytes when `MAX_UPLOAD_SIZE` isn't set.
pub(crate) const DEFAULT_MAX_UPLOAD_SIZE: usize = 10 * 1024 * 1024;

/// Settings for the server process.
#[derive(Clone, PartialEq, Eq, Debug)]
pub(crate) struct Config {
    /// The socket address the server listens on.
    pub(crate) address: String,

    /// The maximum size of a request body in bytes.
    pub(crate) max_upload_size: usize,
}

/// An error reading [`Config`] from the environment.
#[derive(Error, Debug)]
#[non_exhaustive]
pub(crate) enum Error {
    /// An environment variable was set but couldn't be read (e.g. it isn't valid Unicode).
    #[error("environment variable `{name}` couldn't be read: {source}")]
    Var {
        /// The name of the environment variable.
        name: &'static str,

        /// The underlying error.
        source: dotenvy::Error,
    },

    /// `MAX_UPLOAD_SIZE` wasn't a nonnegative integer.
    #[error("environment variable `MAX_UPLOAD_SIZE` should be a number of bytes, found {0:?}")]
    MaxUploadSize(String),
}

impl Config {
    /// Reads the configuration from environment variables (and a `.env` file, if present),
    /// falling back to defaults for unset variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set to an invalid value.
    pub(crate) fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|name| match dotenvy::var(name) {
            Ok(value) => Ok(Some(value)),
            Err(dotenvy::Error::EnvVar(std::env::VarError::NotPresent)) => Ok(None),
            Err(source) => Err(Error::Var { name, source }),
        })
    }

    /// Builds the configuration from a function that looks up variables by name.
    fn from_lookup<F>(mut lookup: F) -> Result<Self, Error>
    where
        F: FnMut(&'static str) -> Result<Option<String>, Error>,
    {
        let address = lookup("ADDRESS")?.unwrap_or_else(|| DEFAULT_ADDRESS.into());

        let max_upload_size = match lookup("MAX_UPLOAD_SIZE")? {
            Some(value) => value
                .trim()
                .parse()
                .map_err(|_| Error::MaxUploadSize(value))?,
            None => DEFAULT_MAX_UPLOAD_SIZE,
        };

        Ok(Self {
            address,
            max_upload_size,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS.into(),
            max_upload_size: DEFAULT_MAX_UPLOAD_SIZE,
        }
    }
}
