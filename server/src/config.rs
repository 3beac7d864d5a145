use std::{env, io, num::NonZeroUsize, str::FromStr};

use model::Init;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8090;
pub const DEFAULT_MAX_WORKERS: NonZeroUsize = NonZeroUsize::new(10).unwrap();

/// Immutable settings for a server instance.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_workers: NonZeroUsize,
    pub init: Init,
    pub seed: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            max_workers: DEFAULT_MAX_WORKERS,
            init: Init::default(),
            seed: None,
        }
    }
}

impl ServerConfig {
    /// Reads the configuration from the process environment.
    ///
    /// Recognizes `HOST`, `PORT`, `FCNN_MAX_WORKERS`, `FCNN_SEED` and `FCNN_INIT`,
    /// unset variables keep their default value.
    ///
    /// # Errors
    /// Returns an `InvalidInput` io error if any variable holds an invalid value.
    pub fn from_env() -> io::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration out of an arbitrary variable source.
    ///
    /// # Arguments
    /// * `lookup` - Returns the value of a variable, if set.
    pub fn from_lookup<F>(lookup: F) -> io::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Ok(Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse(&lookup, "PORT")?.unwrap_or(defaults.port),
            max_workers: parse(&lookup, "FCNN_MAX_WORKERS")?.unwrap_or(defaults.max_workers),
            init: parse(&lookup, "FCNN_INIT")?.unwrap_or(defaults.init),
            seed: parse(&lookup, "FCNN_SEED")?,
        })
    }

    /// The address to bind to.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse<T, F>(lookup: &F, key: &str) -> io::Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };

    raw.trim().parse().map(Some).map_err(|e| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("invalid value {raw:?} for {key}: {e}"),
        )
    })
}
