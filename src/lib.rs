pub mod error;
pub mod config;
pub mod request;
pub mod api;
pub mod app;
pub mod form;
pub mod status;
pub mod view;

pub use error::Error;
pub use config::ClientConfig;
pub use request::{
  AIConfigStatus
, AdvancedOptionsStatus
, ConfigState
, GenerationMetadata
, HealthStatus
, Relationship
, ThankYouRequest
, ThankYouResponse
};
pub use api::ApiClient;
pub use app::{App, AppState};
pub use form::{FormField, ThankYouForm, Toast};
pub use status::{StatusView, StatusWidget};

/*

thankyou: async client for the Wedding Thank You Generator.
Gift details go in, an AI-written thank you note comes out;
model choice and prompt strategy live behind the backend's
AI Config and are only observed here.

thankyou/
├── Cargo.toml
├── src/
│   ├── lib.rs          # Re-exports and the app command surface
│   ├── error.rs        # Error type shared by every component
│   ├── config.rs       # Client configuration
│   ├── request.rs      # Wire records for the backend routes
│   ├── api.rs          # HTTP client for the backend routes
│   ├── app.rs          # Root orchestrator task (note + generating flag)
│   ├── form.rs         # Gift form state, validation, toasts
│   ├── status.rs       # Polling AI Config status widget
│   ├── view.rs         # Text rendering of every component
│   └── main.rs         # Terminal front end
└── tests/

*/

/// APP API INTERFACE:

// ===== Generate =====

pub type GenerateReply
  = Result<ThankYouResponse, crate::error::Error>;
pub type GenerateReplySender
  = tokio::sync::mpsc::UnboundedSender<GenerateReply>;

pub struct GenerateArgs
{   pub request: ThankYouRequest
  , pub reply: GenerateReplySender
}

// ===== Reset =====

pub type ResetReply = Result<(), crate::error::Error>;
pub type ResetReplySender
  = tokio::sync::mpsc::UnboundedSender<ResetReply>;

pub struct ResetArgs
{   pub reply: ResetReplySender
}

// ===== KillProcess =====

pub type KillProcessReply = Result<(), crate::error::Error>;
pub type KillProcessReplySender
  = tokio::sync::mpsc::UnboundedSender<KillProcessReply>;

pub struct KillProcessArgs
{   pub reply: KillProcessReplySender
}

// ===== AppHand (sender side) =====

pub struct AppHand
{   pub generate_tx
      : tokio::sync::mpsc::UnboundedSender<GenerateArgs>
  , pub reset_tx
      : tokio::sync::mpsc::UnboundedSender<ResetArgs>
  , pub kill_process_tx
      : tokio::sync::mpsc::UnboundedSender<KillProcessArgs>
}

// ===== AppFoot (receiver side) =====

pub struct AppFoot
{   pub generate_rx
      : tokio::sync::mpsc::UnboundedReceiver<GenerateArgs>
  , pub reset_rx
      : tokio::sync::mpsc::UnboundedReceiver<ResetArgs>
  , pub kill_process_rx
      : tokio::sync::mpsc::UnboundedReceiver<KillProcessArgs>
}
