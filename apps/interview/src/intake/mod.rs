//! Candidate intake — turns a free-text self-introduction (or an already
//! structured candidate object) into a `CandidateProfile`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::errors::AppError;
use crate::intake::prompts::{PROFILE_EXTRACT_PROMPT_TEMPLATE, PROFILE_EXTRACT_SYSTEM};
use crate::llm_client::sanitize::sanitize_and_parse;
use crate::llm_client::CompletionService;

pub mod prompts;

/// Structured candidate profile. Immutable after construction; shared
/// read-only by the observer and the interviewer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub name: Option<String>,
    pub position: String,
    /// Open set: junior / middle / senior / lead, or empty when unknown.
    pub grade: String,
    /// Years of experience, when stated.
    pub experience: Option<u32>,
    pub skills: Vec<String>,
    pub summary: String,
}

impl CandidateProfile {
    /// Maps a parsed JSON object to a profile, defaulting anything missing.
    /// Tolerates the usual model quirks: `experience` as a number or a
    /// numeric string, `null` anywhere, skills as a single string.
    pub fn from_value(value: &Map<String, Value>) -> Self {
        CandidateProfile {
            name: str_field(value, "name"),
            position: str_field(value, "position").unwrap_or_default(),
            grade: str_field(value, "grade").unwrap_or_default(),
            experience: experience_field(value.get("experience")),
            skills: skills_field(value.get("skills")),
            summary: str_field(value, "summary").unwrap_or_default(),
        }
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("the candidate")
    }
}

/// Builds a profile from whatever the caller has: a structured object, a
/// free-text introduction, or (an error) neither.
///
/// The structured path is offline. The free-text path makes exactly one
/// completion-service call.
pub async fn build_profile(
    structured: Option<&Map<String, Value>>,
    intro_text: Option<&str>,
    llm: &dyn CompletionService,
) -> Result<CandidateProfile, AppError> {
    match (structured, intro_text) {
        (Some(value), _) => Ok(CandidateProfile::from_value(value)),
        (None, Some(text)) => extract_profile(text, llm).await,
        (None, None) => Err(AppError::Input(
            "either a structured candidate object or an introduction text is required".to_string(),
        )),
    }
}

/// Extracts a profile from free text via one LLM call.
async fn extract_profile(
    intro_text: &str,
    llm: &dyn CompletionService,
) -> Result<CandidateProfile, AppError> {
    let prompt = PROFILE_EXTRACT_PROMPT_TEMPLATE.replace("{intro_text}", intro_text);
    let raw = llm.complete(&prompt, PROFILE_EXTRACT_SYSTEM).await?;

    let parsed = sanitize_and_parse(&raw);
    if parsed.is_empty() {
        warn!("profile extraction produced no structured data, falling back to empty profile");
    } else {
        debug!("profile extracted: {} fields", parsed.len());
    }

    Ok(CandidateProfile::from_value(&parsed))
}

fn str_field(value: &Map<String, Value>, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn experience_field(value: Option<&Value>) -> Option<u32> {
    match value? {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    }
}

fn skills_field(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        // Some models return a single skill as a bare string.
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s.trim().to_string()],
        _ => Vec::new(),
    }
}
