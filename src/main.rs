use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::{debug, error};

use thankyou::form::FormField;
use thankyou::{
  ApiClient
, App
, ClientConfig
, Relationship
, StatusWidget
, ThankYouForm
, Toast
};

#[derive(Parser, Debug)]
#[command(name = "thankyou", about = "Wedding thank you note generator")]
struct Cli
{   /// Origin serving the /api routes
    #[arg(long, env = "THANKYOU_API_BASE", global = true)]
    api_base: Option<String>
  , /// JSON config file
    #[arg(long, global = true)]
    config: Option<String>
  , /// Per-request timeout in seconds
    #[arg(long, global = true)]
    timeout_secs: Option<u64>
  , #[command(subcommand)]
    command: Command
}

#[derive(Subcommand, Debug)]
enum Command
{   /// Generate a thank you note for one gift
    Generate
    {   #[arg(long)]
        giver: String
      , #[arg(long)]
        gift: String
      , #[arg(long, default_value_t = Relationship::Friend)]
        relationship: Relationship
      , /// Only used when advanced options are enabled
        #[arg(long)]
        notes: Option<String>
      , /// Only used when advanced options are enabled
        #[arg(long)]
        next_meeting: Option<String>
    }
  , /// Show the AI Config status
    Status
    {   /// Keep polling until interrupted
        #[arg(long)]
        watch: bool
    }
  , /// Check backend health
    Health
}

fn load_config(cli: &Cli) -> Result<ClientConfig, thankyou::Error>
{   let config = match &cli.config
    {   Some(path) => ClientConfig::from_file(path)?
      , None => ClientConfig::default()
    };
    config.with_overrides(cli.api_base.clone(), cli.timeout_secs)
}

async fn run(cli: Cli, config: ClientConfig)
  -> Result<ExitCode, thankyou::Error>
{   debug!("Using config: {:?}", config);
    let api = ApiClient::new(&config)?;

    match cli.command
    {   Command::Generate {
          giver, gift, relationship, notes, next_meeting
        } => {
          let status = StatusWidget::from_config(api.clone(), &config);
          let app = App::new(api.clone());

          let mut form = ThankYouForm::new();
          form.load_flags(&api).await;
          form.set_field(FormField::GiftGiverName, &giver)?;
          form.set_field(FormField::GiftDescription, &gift)?;
          form.relationship = relationship;
          if let Some(notes) = notes
          {   form.set_field(FormField::AdditionalNotes, &notes)?;
          }
          if let Some(next_meeting) = next_meeting
          {   form.set_field(FormField::NextMeeting, &next_meeting)?;
          }

          if let Err(e) = status.loaded().await
          {   debug!("Status not loaded before submit: {}", e);
          }
          let toast = form.submit(&app).await;
          println!(
            "{}",
            thankyou::view::render_page(
              &status.view(), &form, &app.state()
            )
          );
          print_toast(&toast);

          status.stop();
          app.shutdown().await?;
          Ok(if toast.is_success()
          {   ExitCode::SUCCESS
          } else
          {   ExitCode::FAILURE
          })
        }
      , Command::Status { watch } => {
          let status = StatusWidget::from_config(api, &config);
          let mut rx = status.subscribe();
          let first = rx.borrow_and_update().clone();
          print!("{}", thankyou::view::render_status(&first));
          let mut done = !watch && !first.is_loading();
          while !done
          { tokio::select!
            { changed = rx.changed() => {
                if changed.is_err()
                {   break;
                }
                let view = rx.borrow_and_update().clone();
                print!("{}", thankyou::view::render_status(&view));
                done = !watch && !view.is_loading();
              }
            , _ = tokio::signal::ctrl_c() => {
                done = true;
              }
            }
          }
          status.stop();
          Ok(ExitCode::SUCCESS)
        }
      , Command::Health => {
          let health = api.health().await?;
          println!(
            "{} (AI Config enabled: {})",
            health.status, health.ai_config_enabled
          );
          Ok(ExitCode::SUCCESS)
        }
    }
}

fn print_toast(toast: &Toast)
{   match toast
    {   Toast::Success(msg) => eprintln!("✓ {}", msg)
      , Toast::Error(msg) => eprintln!("✗ {}", msg)
    }
}

#[tokio::main]
async fn main() -> ExitCode
{   let cli = Cli::parse();
    let config = match load_config(&cli)
    {   Ok(config) => config
      , Err(e) => {
          eprintln!("{}", e);
          return ExitCode::FAILURE;
        }
    };

    let default_level = if config.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(
      env_logger::Env::default().default_filter_or(default_level)
    ).init();

    match run(cli, config).await
    {   Ok(code) => code
      , Err(e) => {
          error!("{}", e);
          eprintln!("{}", e);
          ExitCode::FAILURE
        }
    }
}
