use tokio::sync::{mpsc, watch};
use log::{debug, trace, error, info};
use crate::AppFoot;
use crate::request::{ThankYouRequest, ThankYouResponse};

/// Text shown to the user whenever generation fails
pub const GENERATE_FAILED: &str
  = "Failed to generate thank you note. Please try again.";

/// Top-level view state, published to observers on every change
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState
{   /// Most recent note, `None` shows the placeholder
    pub generated_note: Option<ThankYouResponse>
  , /// True while a generate request is in flight
    pub is_generating: bool
  , /// User-facing message for the last failed generation
    pub last_error: Option<String>
}

/// Generation currently awaiting the backend
struct InFlight
{   reply: crate::GenerateReplySender
  , task: tokio::task::JoinHandle<()>
}

/// Public API for the root orchestrator - owns the task
pub struct App
{   hand: crate::AppHand
  , state_rx: watch::Receiver<AppState>
  , _task_handle: tokio::task::JoinHandle<()>
}

impl App
{   /// Create and spawn the orchestrator
    /// Returns immediately - spawns background task
    pub fn new(api: crate::api::ApiClient) -> Self
    {   debug!("Creating App with task ownership");

        let (generate_tx, generate_rx)
          = mpsc::unbounded_channel();
        let (reset_tx, reset_rx)
          = mpsc::unbounded_channel();
        let (kill_process_tx, kill_process_rx)
          = mpsc::unbounded_channel();
        let (state_tx, state_rx)
          = watch::channel(AppState::default());

        let hand = crate::AppHand
        {   generate_tx
          , reset_tx
          , kill_process_tx
        };

        let foot = crate::AppFoot
        {   generate_rx
          , reset_rx
          , kill_process_rx
        };

        let _task_handle = tokio::spawn(async move {
          run_app_loop(foot, api, state_tx).await
        });

        App
        {   hand
          , state_rx
          , _task_handle
        }
    }

    /// Snapshot of the current state
    pub fn state(&self) -> AppState
    {   self.state_rx.borrow().clone()
    }

    /// Receiver that sees every state change
    pub fn subscribe(&self) -> watch::Receiver<AppState>
    {   self.state_rx.clone()
    }

    pub fn is_generating(&self) -> bool
    {   self.state_rx.borrow().is_generating
    }

    /// Queue a generation - returns almost immediately
    pub fn queue_generate(
      &self
    , request: ThankYouRequest
    ) -> Result<
        mpsc::UnboundedReceiver<crate::GenerateReply>,
        crate::error::Error
      >
    {   debug!(
          "queue_generate for giver: {}",
          request.gift_giver_name
        );
        let (reply_tx, reply_rx)
          = mpsc::unbounded_channel();

        let cmd = crate::GenerateArgs
        {   request
          , reply: reply_tx
        };

        self.hand.generate_tx
          .send(cmd)
          .map_err(|_| {
            error!("App channel closed");
            crate::error::Error::Other(
              "App disconnected".to_string()
            )
          })?;

        Ok(reply_rx)
    }

    /// Generate a note and wait for the outcome
    pub async fn generate(
      &self
    , request: ThankYouRequest
    ) -> crate::GenerateReply
    {   let mut reply_rx = self.queue_generate(request)?;
        reply_rx.recv().await
          .unwrap_or_else(|| {
            error!("App dropped generate reply");
            Err(crate::error::Error::Other(
              "App disconnected".to_string()
            ))
          })
    }

    /// Clear the stored note
    pub async fn reset(&self) -> crate::ResetReply
    {   debug!("reset queuing command");
        let (reply_tx, mut reply_rx)
          = mpsc::unbounded_channel();

        self.hand.reset_tx
          .send(crate::ResetArgs { reply: reply_tx })
          .map_err(|_| {
            error!("App channel closed");
            crate::error::Error::Other(
              "App disconnected".to_string()
            )
          })?;

        reply_rx.recv().await
          .unwrap_or_else(|| {
            Err(crate::error::Error::Other(
              "App disconnected".to_string()
            ))
          })
    }

    /// Gracefully shutdown the orchestrator
    pub async fn shutdown(self)
      -> Result<(), crate::error::Error>
    {   debug!("Shutting down App");
        let (reply_tx, mut reply_rx)
          = mpsc::unbounded_channel();

        let cmd = crate::KillProcessArgs
        {   reply: reply_tx
        };

        self.hand.kill_process_tx
          .send(cmd)
          .map_err(|_| {
            error!("App channel already closed");
            crate::error::Error::Other(
              "App already shutdown".to_string()
            )
          })?;

        if let Some(result) = reply_rx.recv().await
        {   debug!("App shutdown confirmed");
            result
        } else
        {   error!("App shutdown timeout");
            Err(crate::error::Error::Timeout)
        }
    }
}

/// Main orchestrator event loop
///
/// The HTTP call runs on its own task so resets and a second
/// submit are answered while a generation is in flight.
async fn run_app_loop(
  foot: crate::AppFoot
, api: crate::api::ApiClient
, state_tx: watch::Sender<AppState>
)
{   debug!("Starting App event loop");
    let AppFoot
    {   mut generate_rx
      , mut reset_rx
      , mut kill_process_rx
    } = foot;

    let (done_tx, mut done_rx)
      = mpsc::unbounded_channel::<crate::GenerateReply>();
    let mut in_flight: Option<InFlight> = None;

    loop
    { tokio::select!
      { Some(cmd) = generate_rx.recv() => {
          if in_flight.is_some()
          {   debug!("Generate rejected, request already in flight");
              let _ = cmd.reply.send(
                Err(crate::error::Error::Busy)
              );
              continue;
          }
          if let Err(e) = cmd.request.validate()
          {   debug!("Generate rejected: {}", e);
              let _ = cmd.reply.send(Err(e));
              continue;
          }

          state_tx.send_modify(|s| {
            s.is_generating = true;
            s.last_error = None;
          });

          let api = api.clone();
          let done_tx = done_tx.clone();
          let request = cmd.request;
          let task = tokio::spawn(async move {
            let result = api.generate(&request).await;
            let _ = done_tx.send(result);
          });
          in_flight = Some(InFlight
          {   reply: cmd.reply
            , task
          });
        }
      , Some(result) = done_rx.recv() => {
          let Some(finished) = in_flight.take() else
          {   trace!("Generation result with nothing in flight");
              continue;
          };
          match &result
          {   Ok(note) => {
                info!(
                  "Thank you note generated by {}",
                  note.ai_model_used
                );
                let note = note.clone();
                state_tx.send_modify(|s| {
                  s.generated_note = Some(note);
                  s.is_generating = false;
                });
              }
            , Err(e) => {
                error!("Error generating thank you note: {}", e);
                state_tx.send_modify(|s| {
                  s.is_generating = false;
                  s.last_error = Some(GENERATE_FAILED.to_string());
                });
              }
          }
          let _ = finished.reply.send(result);
        }
      , Some(cmd) = reset_rx.recv() => {
          debug!("Received Reset");
          state_tx.send_modify(|s| {
            s.generated_note = None;
            s.last_error = None;
          });
          let _ = cmd.reply.send(Ok(()));
        }
      , cmd = kill_process_rx.recv() => {
          if let Some(cmd) = cmd
          {   debug!("Received KillProcess");
              let _ = cmd.reply.send(Ok(()));
          } else
          {   debug!("App handle dropped");
          }
          if let Some(pending) = in_flight.take()
          {   pending.task.abort();
              let _ = pending.reply.send(
                Err(crate::error::Error::Other(
                  "App shut down".to_string()
                ))
              );
          }
          state_tx.send_modify(|s| s.is_generating = false);
          info!("App shutting down");
          break;
        }
      }
    }
}
