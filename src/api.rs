//! HTTP client for the thank-you backend routes

use serde::de::DeserializeOwned;
use log::{debug, trace, error, warn};

use crate::request::{
  AIConfigStatus
, AdvancedOptionsStatus
, HealthStatus
, ThankYouRequest
, ThankYouResponse
};

pub const GENERATE_PATH: &str = "/api/generate";
pub const AI_CONFIG_STATUS_PATH: &str = "/api/ai-config/status";
pub const ADVANCED_OPTIONS_PATH: &str
  = "/api/feature-flags/advanced-options";
pub const HEALTH_PATH: &str = "/api/health";

/// Thin typed wrapper over the backend's REST surface.
/// Cloning shares the underlying connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient
{   api_base: String
  , http_client: reqwest::Client
}

impl ApiClient
{   pub fn new(config: &crate::config::ClientConfig)
      -> Result<Self, crate::error::Error>
    {   config.validate()?;
        debug!("Creating ApiClient for {}", config.api_base);
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout()
        {   builder = builder.timeout(timeout);
        }
        let http_client = builder.build()
          .map_err(|e| {
            error!("Failed to build HTTP client: {}", e);
            crate::error::Error::InvalidConfiguration(e.to_string())
          })?;
        Ok(ApiClient
        {   api_base: config.api_base
              .trim()
              .trim_end_matches('/')
              .to_string()
          , http_client
        })
    }

    pub fn api_base(&self) -> &str
    {   &self.api_base
    }

    fn url(&self, path: &str) -> String
    {   format!("{}{}", self.api_base, path)
    }

    /// `POST /api/generate`; any non-2xx status is a failure
    pub async fn generate(
      &self
    , request: &ThankYouRequest
    ) -> Result<ThankYouResponse, crate::error::Error>
    {   debug!(
          "Generating note for giver: {}",
          request.gift_giver_name
        );
        trace!("Generate request: {:?}", request);

        let response = self.http_client
          .post(self.url(GENERATE_PATH))
          .json(request)
          .send()
          .await
          .map_err(|e| {
            error!("HTTP error: {}", e);
            crate::error::Error::from(e)
          })?;

        let status = response.status();
        trace!("Generate response status: {}", status);

        if !status.is_success()
        {   let error_text = response.text().await
              .unwrap_or_else(|_|
                "Unknown error".to_string()
              );
            error!("Generate failed ({}): {}", status, error_text);
            return Err(crate::error::Error::ApiError
            {   status: status.as_u16()
              , body: error_text
            });
        }

        read_json(response).await
    }

    /// `GET /api/ai-config/status`.
    /// The backend reports its own failures in the body, so the
    /// body is decoded whatever the status code.
    pub async fn ai_config_status(&self)
      -> Result<AIConfigStatus, crate::error::Error>
    {   debug!("Fetching AI config status");
        self.get_json(AI_CONFIG_STATUS_PATH).await
    }

    /// `GET /api/feature-flags/advanced-options`
    pub async fn advanced_options(&self)
      -> Result<AdvancedOptionsStatus, crate::error::Error>
    {   debug!("Fetching advanced options flag");
        self.get_json(ADVANCED_OPTIONS_PATH).await
    }

    /// `GET /api/health`
    pub async fn health(&self)
      -> Result<HealthStatus, crate::error::Error>
    {   debug!("Fetching backend health");
        let response = self.http_client
          .get(self.url(HEALTH_PATH))
          .send()
          .await
          .map_err(|e| {
            error!("Health check failed: {}", e);
            crate::error::Error::from(e)
          })?;

        let status = response.status();
        if !status.is_success()
        {   let error_text = response.text().await
              .unwrap_or_default();
            return Err(crate::error::Error::ApiError
            {   status: status.as_u16()
              , body: error_text
            });
        }

        read_json(response).await
    }

    async fn get_json<T: DeserializeOwned>(
      &self
    , path: &str
    ) -> Result<T, crate::error::Error>
    {   let response = self.http_client
          .get(self.url(path))
          .send()
          .await
          .map_err(|e| {
            error!("Failed to fetch {}: {}", path, e);
            crate::error::Error::from(e)
          })?;

        let status = response.status();
        trace!("{} response status: {}", path, status);
        if !status.is_success()
        {   warn!("{} answered {}, decoding body anyway", path, status);
        }

        read_json(response).await
    }
}

async fn read_json<T: DeserializeOwned>(
  response: reqwest::Response
) -> Result<T, crate::error::Error>
{   let body = response.text().await
      .map_err(|e| {
        error!("Failed to read body: {}", e);
        crate::error::Error::from(e)
      })?;
    trace!("Response body: {}", body);
    serde_json::from_str(&body).map_err(|e| {
      error!("Parse error: {}", e);
      crate::error::Error::ParseError(e.to_string())
    })
}
