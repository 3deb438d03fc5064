//! Campaign lifecycle state machine, generation parameters, and
//! submission validation.
//!
//! The status transition rules here are the single authority on what the
//! orchestrator may do to a campaign. Persistence lives in `promogen-db`;
//! dispatch lives in `promogen-orchestrator`.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Field bounds
// ---------------------------------------------------------------------------

/// Maximum length of a campaign name.
pub const MAX_NAME_LEN: usize = 255;
/// Maximum length of a prompt (and of a negative prompt).
pub const MAX_PROMPT_LEN: usize = 1000;
/// Minimum width/height of a generated image in pixels.
pub const MIN_DIMENSION: u32 = 256;
/// Maximum width/height of a generated image in pixels.
pub const MAX_DIMENSION: u32 = 1024;
/// Minimum number of samples per image generation.
pub const MIN_SAMPLES: u32 = 1;
/// Maximum number of samples per image generation.
pub const MAX_SAMPLES: u32 = 4;

// ---------------------------------------------------------------------------
// Campaign type
// ---------------------------------------------------------------------------

/// What kind of artifact a campaign produces. Fixed at creation; drives
/// the dispatch path (text is synchronous, image completes via webhook).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CampaignType {
    Text,
    Image,
}

impl CampaignType {
    pub fn as_str(self) -> &'static str {
        match self {
            CampaignType::Text => "text",
            CampaignType::Image => "image",
        }
    }
}

impl std::str::FromStr for CampaignType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(CampaignType::Text),
            "image" => Ok(CampaignType::Image),
            other => Err(CoreError::Validation(format!(
                "Invalid campaign type '{other}'. Must be one of: text, image"
            ))),
        }
    }
}

impl TryFrom<String> for CampaignType {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl std::fmt::Display for CampaignType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Campaign status
// ---------------------------------------------------------------------------

/// Lifecycle status of a campaign.
///
/// `Completed` is terminal. `Failed` is terminal but may be reset to
/// `Pending` by an explicit retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CampaignStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl CampaignStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CampaignStatus::Pending => "pending",
            CampaignStatus::Processing => "processing",
            CampaignStatus::Completed => "completed",
            CampaignStatus::Failed => "failed",
        }
    }

    /// Whether this status accepts no further provider-driven transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, CampaignStatus::Completed | CampaignStatus::Failed)
    }

    /// Whether a transition from `self` to `next` is permitted.
    ///
    /// Transitions are monotonic: `pending -> processing`,
    /// `processing -> completed | failed`, and the single retry edge
    /// `failed -> pending`. Everything else is rejected.
    pub fn can_transition_to(self, next: CampaignStatus) -> bool {
        use CampaignStatus::*;
        matches!(
            (self, next),
            (Pending, Processing) | (Processing, Completed) | (Processing, Failed) | (Failed, Pending)
        )
    }
}

impl std::str::FromStr for CampaignStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(CampaignStatus::Pending),
            "processing" => Ok(CampaignStatus::Processing),
            "completed" => Ok(CampaignStatus::Completed),
            "failed" => Ok(CampaignStatus::Failed),
            other => Err(CoreError::Validation(format!(
                "Invalid campaign status '{other}'. Must be one of: pending, processing, completed, failed"
            ))),
        }
    }
}

impl TryFrom<String> for CampaignStatus {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl std::fmt::Display for CampaignStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Generation parameters
// ---------------------------------------------------------------------------

/// Image-specific generation parameters.
///
/// Persisted in full on the campaign row so a retry re-dispatches with
/// exactly the parameters the campaign was created with.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    pub negative_prompt: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub samples: Option<u32>,
    pub safety_checker: Option<bool>,
    pub seed: Option<i64>,
    pub base64: Option<bool>,
    pub enhance_prompt: Option<bool>,
}

impl GenerationParams {
    /// Whether no parameter was supplied at all. Create requests carry
    /// these fields flattened, so an absent block deserializes to all-`None`.
    pub fn is_empty(&self) -> bool {
        *self == GenerationParams::default()
    }
}

// ---------------------------------------------------------------------------
// Webhook outcome
// ---------------------------------------------------------------------------

/// Outcome of an asynchronous image generation, as reported by the
/// provider's webhook callback.
///
/// Built by the webhook receiver after boundary validation; the
/// orchestrator's reconcile path only ever sees well-formed outcomes.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationOutcome {
    /// Generation succeeded; `output` holds at least one artifact reference.
    Success { output: Vec<String> },
    /// Generation failed with a provider-supplied message.
    Error { message: String },
}

// ---------------------------------------------------------------------------
// Submission validation
// ---------------------------------------------------------------------------

/// Validate a campaign name, when present.
pub fn validate_name(name: Option<&str>) -> Result<(), CoreError> {
    if let Some(name) = name {
        if name.chars().count() > MAX_NAME_LEN {
            return Err(CoreError::Validation(format!(
                "name must be at most {MAX_NAME_LEN} characters"
            )));
        }
    }
    Ok(())
}

/// Validate a prompt: required, non-empty, bounded length.
pub fn validate_prompt(prompt: &str) -> Result<(), CoreError> {
    if prompt.trim().is_empty() {
        return Err(CoreError::Validation("prompt must not be empty".into()));
    }
    if prompt.chars().count() > MAX_PROMPT_LEN {
        return Err(CoreError::Validation(format!(
            "prompt must be at most {MAX_PROMPT_LEN} characters"
        )));
    }
    Ok(())
}

/// Validate image generation parameters against their field bounds.
pub fn validate_generation_params(params: &GenerationParams) -> Result<(), CoreError> {
    if let Some(ref negative) = params.negative_prompt {
        if negative.chars().count() > MAX_PROMPT_LEN {
            return Err(CoreError::Validation(format!(
                "negative_prompt must be at most {MAX_PROMPT_LEN} characters"
            )));
        }
    }
    for (field, value) in [("width", params.width), ("height", params.height)] {
        if let Some(value) = value {
            if !(MIN_DIMENSION..=MAX_DIMENSION).contains(&value) {
                return Err(CoreError::Validation(format!(
                    "{field} must be between {MIN_DIMENSION} and {MAX_DIMENSION}, got {value}"
                )));
            }
        }
    }
    if let Some(samples) = params.samples {
        if !(MIN_SAMPLES..=MAX_SAMPLES).contains(&samples) {
            return Err(CoreError::Validation(format!(
                "samples must be between {MIN_SAMPLES} and {MAX_SAMPLES}, got {samples}"
            )));
        }
    }
    Ok(())
}

/// Validate a full submission before anything is persisted.
///
/// Generation parameters only make sense for image campaigns; supplying
/// them on a text campaign is rejected rather than silently dropped.
pub fn validate_submission(
    name: Option<&str>,
    prompt: &str,
    campaign_type: CampaignType,
    params: Option<&GenerationParams>,
) -> Result<(), CoreError> {
    validate_name(name)?;
    validate_prompt(prompt)?;
    match (campaign_type, params) {
        (CampaignType::Image, Some(params)) => validate_generation_params(params),
        (CampaignType::Image, None) => Ok(()),
        (CampaignType::Text, None) => Ok(()),
        (CampaignType::Text, Some(_)) => Err(CoreError::Validation(
            "generation parameters are only valid for image campaigns".into(),
        )),
    }
}
