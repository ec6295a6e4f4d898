//! Request and response records exchanged with the backend

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};

/// Message shown when the status endpoint cannot be read
pub const STATUS_FETCH_FAILED: &str
  = "Failed to fetch AI config status";

/// How the couple knows the gift giver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Relationship
{   Family
  , #[default]
    Friend
  , Colleague
  , #[serde(rename = "family friend")]
    FamilyFriend
}

impl Relationship
{   pub const ALL: [Relationship; 4] = [
      Relationship::Family
    , Relationship::Friend
    , Relationship::Colleague
    , Relationship::FamilyFriend
    ];

    /// Value sent over the wire
    pub fn as_str(&self) -> &'static str
    {   match self
        {   Relationship::Family => "family"
          , Relationship::Friend => "friend"
          , Relationship::Colleague => "colleague"
          , Relationship::FamilyFriend => "family friend"
        }
    }

    /// Human-readable label for the select box
    pub fn label(&self) -> &'static str
    {   match self
        {   Relationship::Family => "Family"
          , Relationship::Friend => "Friend"
          , Relationship::Colleague => "Colleague"
          , Relationship::FamilyFriend => "Family Friend"
        }
    }
}

impl fmt::Display for Relationship
{   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {   f.write_str(self.as_str())
    }
}

impl FromStr for Relationship
{   type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {   let normalized = s.trim().to_lowercase()
          .replace(['-', '_'], " ");
        match normalized.as_str()
        {   "family" => Ok(Relationship::Family)
          , "friend" => Ok(Relationship::Friend)
          , "colleague" => Ok(Relationship::Colleague)
          , "family friend" => Ok(Relationship::FamilyFriend)
          , _ => Err(crate::error::Error::Validation(
              format!("unknown relationship: {}", s)
            ))
        }
    }
}

/// Gift details submitted for generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThankYouRequest
{   pub gift_giver_name: String
  , pub gift_description: String
  , pub relationship: Relationship
  , /// Any special memories, how the gift will be used
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_notes: Option<String>
  , /// When the couple expects to see the giver next
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_meeting: Option<String>
}

impl ThankYouRequest
{   pub fn new(
      gift_giver_name: impl Into<String>
    , gift_description: impl Into<String>
    , relationship: Relationship
    ) -> Self
    {   ThankYouRequest
        {   gift_giver_name: gift_giver_name.into()
          , gift_description: gift_description.into()
          , relationship
          , additional_notes: None
          , next_meeting: None
        }
    }

    pub fn with_additional_notes(
      mut self
    , notes: impl Into<String>
    ) -> Self
    {   self.additional_notes = Some(notes.into());
        self
    }

    pub fn with_next_meeting(
      mut self
    , next_meeting: impl Into<String>
    ) -> Self
    {   self.next_meeting = Some(next_meeting.into());
        self
    }

    /// Giver name and description must be non-blank
    pub fn validate(&self) -> Result<(), crate::error::Error>
    {   if self.gift_giver_name.trim().is_empty()
          || self.gift_description.trim().is_empty()
        {   return Err(crate::error::Error::Validation(
              "gift giver name and gift description are required"
                .to_string()
            ));
        }
        Ok(())
    }
}

/// Details about how a note was produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationMetadata
{   pub provider: String
  , #[serde(default)]
    pub model_parameters: HashMap<String, serde_json::Value>
  , #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_template: Option<String>
  , #[serde(default)]
    pub ai_config_key: String
  , /// AI Config variation that served the request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variation_name: Option<String>
  , #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_enabled: Option<bool>
}

/// Generated note returned by `POST /api/generate`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThankYouResponse
{   pub thank_you_note: String
  , pub ai_model_used: String
  , pub prompt_strategy: String
  , pub generation_metadata: GenerationMetadata
}

/// Overall AI Config state as reported by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigState
{   Active
  , Disabled
  , #[serde(other)]
    Error
}

/// Response of `GET /api/ai-config/status`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AIConfigStatus
{   pub status: ConfigState
  , #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_provider: Option<String>
  , #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_model: Option<String>
  , #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_strategy: Option<String>
  , #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_config_key: Option<String>
  , #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advanced_options_enabled: Option<bool>
  , #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>
}

impl AIConfigStatus
{   /// Error status carrying the given message
    pub fn error(message: impl Into<String>) -> Self
    {   AIConfigStatus
        {   status: ConfigState::Error
          , current_provider: None
          , current_model: None
          , prompt_strategy: None
          , ai_config_key: None
          , advanced_options_enabled: None
          , error: Some(message.into())
        }
    }

    /// Status used when the endpoint could not be reached or read
    pub fn fetch_failed() -> Self
    {   AIConfigStatus::error(STATUS_FETCH_FAILED)
    }

    pub fn is_error(&self) -> bool
    {   self.status == ConfigState::Error
    }
}

/// Response of `GET /api/feature-flags/advanced-options`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvancedOptionsStatus
{   #[serde(default)]
    pub flag_key: String
  , #[serde(default)]
    pub enabled: bool
  , #[serde(default)]
    pub description: String
  , #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>
}

/// Response of `GET /api/health`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus
{   pub status: String
  , #[serde(default)]
    pub ai_config_enabled: bool
}
