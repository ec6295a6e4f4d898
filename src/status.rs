//! AI Config status widget: fetches on start, then on every
//! poll tick or manual refresh, until dropped

use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::MissedTickBehavior;
use log::{debug, error, info};

use crate::request::AIConfigStatus;

#[derive(Debug, Clone, PartialEq)]
pub enum StatusView
{   Loading
  , Loaded(AIConfigStatus)
}

impl StatusView
{   pub fn is_loading(&self) -> bool
    {   matches!(self, StatusView::Loading)
    }

    pub fn status(&self) -> Option<&AIConfigStatus>
    {   match self
        {   StatusView::Loading => None
          , StatusView::Loaded(status) => Some(status)
        }
    }
}

/// Fetch once; transport or decode failures become the fixed
/// error status
pub async fn fetch_status(api: &crate::api::ApiClient)
  -> AIConfigStatus
{   match api.ai_config_status().await
    {   Ok(status) => status
      , Err(e) => {
          error!("AI config status fetch failed: {}", e);
          AIConfigStatus::fetch_failed()
        }
    }
}

/// Polling widget; the task is cancelled when this is dropped
pub struct StatusWidget
{   refresh_tx: mpsc::UnboundedSender<()>
  , view_rx: watch::Receiver<StatusView>
  , task: tokio::task::JoinHandle<()>
}

impl StatusWidget
{   /// Spawn the poller with the given period
    pub fn start(
      api: crate::api::ApiClient
    , period: Duration
    ) -> Self
    {   debug!("Starting StatusWidget, period {:?}", period);
        let (refresh_tx, refresh_rx) = mpsc::unbounded_channel();
        let (view_tx, view_rx) = watch::channel(StatusView::Loading);

        let task = tokio::spawn(async move {
          run_status_loop(api, period, refresh_rx, view_tx).await
        });

        StatusWidget
        {   refresh_tx
          , view_rx
          , task
        }
    }

    /// Spawn the poller using the configured period
    pub fn from_config(
      api: crate::api::ApiClient
    , config: &crate::config::ClientConfig
    ) -> Self
    {   StatusWidget::start(api, config.status_poll_interval())
    }

    pub fn view(&self) -> StatusView
    {   self.view_rx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<StatusView>
    {   self.view_rx.clone()
    }

    /// Fetch now instead of waiting for the next tick
    pub fn refresh(&self) -> Result<(), crate::error::Error>
    {   debug!("Manual status refresh");
        self.refresh_tx.send(()).map_err(|_| {
          crate::error::Error::Other(
            "Status widget stopped".to_string()
          )
        })
    }

    /// Wait for the first fetch to resolve
    pub async fn loaded(&self)
      -> Result<AIConfigStatus, crate::error::Error>
    {   let mut rx = self.view_rx.clone();
        loop
        {   if let StatusView::Loaded(status) = &*rx.borrow_and_update()
            {   return Ok(status.clone());
            }
            rx.changed().await.map_err(|_| {
              crate::error::Error::Other(
                "Status widget stopped".to_string()
              )
            })?;
        }
    }

    pub fn stop(self)
    {   drop(self);
    }
}

impl Drop for StatusWidget
{   fn drop(&mut self)
    {   debug!("Stopping StatusWidget");
        self.task.abort();
    }
}

async fn run_status_loop(
  api: crate::api::ApiClient
, period: Duration
, mut refresh_rx: mpsc::UnboundedReceiver<()>
, view_tx: watch::Sender<StatusView>
)
{   let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop
    { tokio::select!
      { _ = ticker.tick() => {
          debug!("Status poll tick");
        }
      , cmd = refresh_rx.recv() => {
          if cmd.is_none()
          {   info!("Status widget shutting down");
              break;
          }
        }
      }

      let status = fetch_status(&api).await;
      debug!("AI config status: {:?}", status.status);
      view_tx.send_replace(StatusView::Loaded(status));
    }
}
