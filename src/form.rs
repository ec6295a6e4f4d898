//! Gift details form: input state, flag-gated optional fields,
//! client-side validation and the toast shown after each action

use log::{debug, error, warn};
use crate::request::{Relationship, ThankYouRequest};

pub const MISSING_REQUIRED: &str
  = "Please fill in the gift giver name and gift description";
pub const GENERATE_SUCCEEDED: &str
  = "Thank you note generated successfully!";
pub const FORM_RESET: &str = "Form reset";

/// Transient notification raised by a form action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Toast
{   Success(String)
  , Error(String)
}

impl Toast
{   pub fn is_success(&self) -> bool
    {   matches!(self, Toast::Success(_))
    }

    pub fn message(&self) -> &str
    {   match self
        {   Toast::Success(msg) | Toast::Error(msg) => msg
        }
    }
}

/// Editable inputs of the form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField
{   GiftGiverName
  , GiftDescription
  , Relationship
  , AdditionalNotes
  , NextMeeting
}

impl FormField
{   /// Fields only rendered when advanced options are on
    pub fn is_advanced(&self) -> bool
    {   matches!(self, FormField::AdditionalNotes | FormField::NextMeeting)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ThankYouForm
{   pub gift_giver_name: String
  , pub gift_description: String
  , pub relationship: Relationship
  , pub additional_notes: String
  , pub next_meeting: String
  , /// Advanced options flag result, hidden until proven on
    pub show_advanced: bool
  , /// True until the flag check resolves
    pub loading_flags: bool
}

impl Default for ThankYouForm
{   fn default() -> Self
    {   ThankYouForm
        {   gift_giver_name: String::new()
          , gift_description: String::new()
          , relationship: Relationship::default()
          , additional_notes: String::new()
          , next_meeting: String::new()
          , show_advanced: false
          , loading_flags: true
        }
    }
}

impl ThankYouForm
{   pub fn new() -> Self
    {   ThankYouForm::default()
    }

    /// Check the advanced options flag once; any failure hides
    /// the optional fields
    pub async fn load_flags(&mut self, api: &crate::api::ApiClient)
    {   self.show_advanced = match api.advanced_options().await
        {   Ok(flag) => {
              if let Some(e) = &flag.error
              {   warn!("Advanced options flag reported: {}", e);
              }
              debug!("Advanced options enabled: {}", flag.enabled);
              flag.enabled
            }
          , Err(e) => {
              error!("Failed to check advanced options flag: {}", e);
              false
            }
        };
        self.loading_flags = false;
    }

    pub fn set_field(
      &mut self
    , field: FormField
    , value: &str
    ) -> Result<(), crate::error::Error>
    {   match field
        {   FormField::GiftGiverName => {
              self.gift_giver_name = value.to_string();
            }
          , FormField::GiftDescription => {
              self.gift_description = value.to_string();
            }
          , FormField::Relationship => {
              self.relationship = value.parse()?;
            }
          , FormField::AdditionalNotes => {
              self.additional_notes = value.to_string();
            }
          , FormField::NextMeeting => {
              self.next_meeting = value.to_string();
            }
        }
        Ok(())
    }

    /// Fields currently shown, in display order
    pub fn visible_fields(&self) -> Vec<FormField>
    {   let mut fields = vec![
          FormField::GiftGiverName
        , FormField::GiftDescription
        , FormField::Relationship
        ];
        if self.show_advanced
        {   fields.push(FormField::NextMeeting);
            fields.push(FormField::AdditionalNotes);
        }
        fields
    }

    /// Payload for submission; hidden or blank optional fields
    /// are left out
    pub fn build_request(&self)
      -> Result<ThankYouRequest, crate::error::Error>
    {   let mut request = ThankYouRequest::new(
          self.gift_giver_name.clone()
        , self.gift_description.clone()
        , self.relationship
        );
        request.validate()?;

        if self.show_advanced
        {   request.additional_notes
              = non_blank(&self.additional_notes);
            request.next_meeting = non_blank(&self.next_meeting);
        }
        Ok(request)
    }

    /// Validate, then hand the payload to the orchestrator
    pub async fn submit(&self, app: &crate::app::App) -> Toast
    {   let request = match self.build_request()
        {   Ok(request) => request
          , Err(e) => {
              debug!("Submit blocked: {}", e);
              return Toast::Error(MISSING_REQUIRED.to_string());
            }
        };

        match app.generate(request).await
        {   Ok(_) => Toast::Success(GENERATE_SUCCEEDED.to_string())
          , Err(e) => {
              error!("Submit failed: {}", e);
              Toast::Error(crate::app::GENERATE_FAILED.to_string())
            }
        }
    }

    /// Clear every input and the orchestrator's note.
    /// The flag result survives; it is only fetched once.
    pub async fn reset(&mut self, app: &crate::app::App) -> Toast
    {   self.gift_giver_name.clear();
        self.gift_description.clear();
        self.relationship = Relationship::default();
        self.additional_notes.clear();
        self.next_meeting.clear();
        if let Err(e) = app.reset().await
        {   error!("Failed to reset app: {}", e);
        }
        Toast::Success(FORM_RESET.to_string())
    }
}

fn non_blank(value: &str) -> Option<String>
{   let trimmed = value.trim();
    if trimmed.is_empty()
    {   None
    } else
    {   Some(trimmed.to_string())
    }
}
