//! Plain-text rendering of the page and its components

use std::fmt::Write;

use crate::app::AppState;
use crate::form::{FormField, ThankYouForm};
use crate::request::{ConfigState, Relationship, ThankYouResponse};
use crate::status::StatusView;

pub const TITLE: &str = "Wedding Thank You Generator";
pub const PLACEHOLDER: &str
  = "Your personalized thank you note will appear here";
pub const PLACEHOLDER_HINT: &str = "Fill out the form to get started";
pub const SUBMIT_LABEL: &str = "Generate Thank You Note";
pub const GENERATING_LABEL: &str = "Generating...";
pub const STATUS_LOADING: &str = "Loading AI Config status...";

/// The submit control is disabled while a note is generating
pub fn submit_enabled(state: &AppState) -> bool
{   !state.is_generating
}

pub fn field_label(field: FormField) -> &'static str
{   match field
    {   FormField::GiftGiverName => "Gift Giver's Name *"
      , FormField::GiftDescription => "Gift Description *"
      , FormField::Relationship => "Relationship"
      , FormField::NextMeeting => "When will you see them next?"
      , FormField::AdditionalNotes => "Additional Notes (Optional)"
    }
}

pub fn field_placeholder(field: FormField) -> &'static str
{   match field
    {   FormField::GiftGiverName => "e.g., Aunt Sarah, John and Mary Smith"
      , FormField::GiftDescription => {
          "e.g., beautiful crystal vase, kitchen knife set, $100 gift card"
        }
      , FormField::Relationship => ""
      , FormField::NextMeeting => {
          "e.g., 'at Christmas dinner', 'next summer', 'soon'"
        }
      , FormField::AdditionalNotes => {
          "Any special memories, how you'll use the gift, etc."
        }
    }
}

/// Status card: spinner while loading, then either the active
/// details or the error message
pub fn render_status(view: &StatusView) -> String
{   let status = match view
    {   StatusView::Loading => {
          return format!("⟳ {}\n", STATUS_LOADING);
        }
      , StatusView::Loaded(status) => status
    };

    let mut out = String::new();
    let (icon, badge) = match status.status
    {   ConfigState::Active => ("✓", "Active")
      , ConfigState::Disabled => ("✓", "Disabled")
      , ConfigState::Error => ("⚠", "Error")
    };
    let _ = writeln!(out, "{} LaunchDarkly AI Config [{}]", icon, badge);

    if status.is_error()
    {   let message = status.error.as_deref()
          .unwrap_or(crate::request::STATUS_FETCH_FAILED);
        let _ = writeln!(out, "  {}", message);
    } else if let Some(provider) = &status.current_provider
    {   let _ = writeln!(
          out,
          "  Provider: {}  Model: {}  Strategy: {}",
          provider,
          status.current_model.as_deref().unwrap_or("unknown"),
          status.prompt_strategy.as_deref().unwrap_or("unknown")
        );
    }
    out
}

/// Form fields in display order, then the buttons
pub fn render_form(form: &ThankYouForm, state: &AppState) -> String
{   let mut out = String::from("Gift Details\n");

    for field in form.visible_fields()
    {   let _ = writeln!(out, "{}", field_label(field));
        match field
        {   FormField::Relationship => {
              for option in Relationship::ALL
              {   let marker = if option == form.relationship
                  {   "(•)"
                  } else
                  {   "( )"
                  };
                  let _ = writeln!(out, "  {} {}", marker, option.label());
              }
            }
          , _ => {
              let value = field_value(form, field);
              if value.is_empty()
              {   let _ = writeln!(out, "  [{}]", field_placeholder(field));
              } else
              {   let _ = writeln!(out, "  {}", value);
              }
            }
        }
    }

    if submit_enabled(state)
    {   let _ = write!(out, "[ + {} ]", SUBMIT_LABEL);
    } else
    {   let _ = write!(out, "[ ⟳ {} ] (disabled)", GENERATING_LABEL);
    }
    if state.generated_note.is_some()
    {   out.push_str("  [ Reset ]");
    }
    out.push('\n');
    out
}

/// Result area: the note when one is held, otherwise the placeholder
pub fn render_result(state: &AppState) -> String
{   let mut out = String::new();
    if let Some(message) = &state.last_error
    {   let _ = writeln!(out, "⚠ {}", message);
    }
    match &state.generated_note
    {   Some(note) => out.push_str(&render_note(note))
      , None => {
          let _ = writeln!(out, "{}", PLACEHOLDER);
          let _ = writeln!(out, "{}", PLACEHOLDER_HINT);
        }
    }
    out
}

pub fn render_note(note: &ThankYouResponse) -> String
{   let mut out = String::from("Your Thank You Note\n\n");
    let _ = writeln!(out, "{}\n", note.thank_you_note.trim());
    let _ = writeln!(out, "Model: {}", note.ai_model_used);
    let _ = writeln!(out, "Strategy: {}", note.prompt_strategy);

    let meta = &note.generation_metadata;
    let _ = writeln!(out, "Provider: {}", meta.provider);
    if !meta.ai_config_key.is_empty()
    {   let _ = writeln!(out, "AI Config: {}", meta.ai_config_key);
    }
    if let Some(template) = &meta.prompt_template
    {   let _ = writeln!(out, "Prompt template: {}", template);
    }
    if !meta.model_parameters.is_empty()
    {   let mut keys: Vec<&String> = meta.model_parameters.keys().collect();
        keys.sort();
        let params: Vec<String> = keys.into_iter()
          .map(|k| format!("{}={}", k, meta.model_parameters[k]))
          .collect();
        let _ = writeln!(out, "Parameters: {}", params.join(", "));
    }
    out
}

/// Whole page: header, status card, form, result, footer
pub fn render_page(
  status: &StatusView
, form: &ThankYouForm
, state: &AppState
) -> String
{   let mut out = String::new();
    let _ = writeln!(out, "♥ {} ✦\n", TITLE);
    out.push_str(&render_status(status));
    out.push('\n');
    out.push_str(&render_form(form, state));
    out.push('\n');
    out.push_str(&render_result(state));
    out.push_str("\nPowered by LaunchDarkly AI Config\n");
    out
}

fn field_value(form: &ThankYouForm, field: FormField) -> &str
{   match field
    {   FormField::GiftGiverName => &form.gift_giver_name
      , FormField::GiftDescription => &form.gift_description
      , FormField::Relationship => form.relationship.label()
      , FormField::AdditionalNotes => &form.additional_notes
      , FormField::NextMeeting => &form.next_meeting
    }
}
