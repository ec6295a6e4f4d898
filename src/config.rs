//! Configuration for the thank-you client

use std::path::Path;
use std::time::Duration;
use serde::{Deserialize, Serialize};
use log::debug;

/// Dev-server origin; it proxies `/api` to the backend
pub const DEFAULT_API_BASE: &str
  = "http://localhost:5173";

/// Seconds between AI Config status refreshes
pub const DEFAULT_STATUS_POLL_SECS: u64 = 30;

/// Client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig
{   /// Origin serving the `/api` routes
    pub api_base: String
  , /// Request timeout in seconds, none means no timeout
    pub timeout_secs: Option<u64>
  , /// Status widget refresh period in seconds
    pub status_poll_secs: u64
  , /// Enable detailed logging
    pub verbose: bool
}

impl Default for ClientConfig
{   fn default() -> Self
    {   ClientConfig
        {   api_base: DEFAULT_API_BASE.to_string()
          , timeout_secs: None
          , status_poll_secs: DEFAULT_STATUS_POLL_SECS
          , verbose: false
        }
    }
}

impl ClientConfig
{   /// Config pointing at a specific origin, defaults elsewhere
    pub fn with_api_base(api_base: impl Into<String>) -> Self
    {   ClientConfig
        {   api_base: api_base.into()
          , ..ClientConfig::default()
        }
    }

    /// Load a config from a JSON file; missing keys take defaults
    pub fn from_file(path: impl AsRef<Path>)
      -> Result<Self, crate::error::Error>
    {   let path = path.as_ref();
        debug!("Loading config from {}", path.display());
        let raw = std::fs::read_to_string(path)
          .map_err(|e| {
            crate::error::Error::InvalidConfiguration(
              format!("{}: {}", path.display(), e)
            )
          })?;
        let config: ClientConfig = serde_json::from_str(&raw)
          .map_err(|e| {
            crate::error::Error::InvalidConfiguration(
              format!("{}: {}", path.display(), e)
            )
          })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the client cannot run with
    pub fn validate(&self) -> Result<(), crate::error::Error>
    {   let base = self.api_base.trim();
        if !(base.starts_with("http://")
          || base.starts_with("https://"))
        {   return Err(crate::error::Error::InvalidConfiguration(
              format!("api_base must be an http(s) URL: {}", base)
            ));
        }
        if self.status_poll_secs == 0
        {   return Err(crate::error::Error::InvalidConfiguration(
              "status_poll_secs must be at least 1".to_string()
            ));
        }
        if self.timeout_secs == Some(0)
        {   return Err(crate::error::Error::InvalidConfiguration(
              "timeout_secs must be at least 1".to_string()
            ));
        }
        Ok(())
    }

    /// Apply command-line overrides on top of this config, then
    /// validate the result
    pub fn with_overrides(
      mut self
    , api_base: Option<String>
    , timeout_secs: Option<u64>
    ) -> Result<Self, crate::error::Error>
    {   if let Some(api_base) = api_base
        {   debug!("Overriding api_base with {}", api_base);
            self.api_base = api_base;
        }
        if timeout_secs.is_some()
        {   self.timeout_secs = timeout_secs;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn status_poll_interval(&self) -> Duration
    {   Duration::from_secs(self.status_poll_secs)
    }

    pub fn timeout(&self) -> Option<Duration>
    {   self.timeout_secs.map(Duration::from_secs)
    }
}
