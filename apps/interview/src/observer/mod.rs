//! Observer — the evaluating role behind the interviewer.
//!
//! Proposes the next question, scores answers, and synthesizes the final
//! hiring report. Modeled as a capability trait (`EvaluatorRole`) so the
//! orchestrator can run against a scripted double in tests; the production
//! implementation (`Observer`) makes exactly one completion-service call per
//! method.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::errors::AppError;
use crate::intake::CandidateProfile;
use crate::interviewer::Speaker;
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::sanitize::sanitize_and_parse;
use crate::llm_client::CompletionService;
use crate::observer::prompts::{
    FINAL_REPORT_TEMPLATE, INTERVIEWER_PERSONA, OBSERVER_SYSTEM, PROPOSE_QUESTION_TEMPLATE,
    SCORE_ANSWER_TEMPLATE,
};
use crate::session::{Role, SessionLog};

pub mod prompts;

/// A proposed question plus the reasoning that produced it.
///
/// An empty `question` means "no question available" (the model's response
/// was unrecoverable); callers decide what to do with it, the observer never
/// errors on malformed content.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProposedQuestion {
    pub question: String,
    pub internal_thoughts: Vec<String>,
}

/// Scores for one answer. Each axis is 0-10; malformed or missing fields
/// default to 0 rather than erroring.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub correctness: u8,
    pub completeness: u8,
    pub relevance: u8,
    pub recommendations: String,
}

/// The evaluating role's capability set.
#[async_trait]
pub trait EvaluatorRole: Send + Sync {
    /// Proposes the next question given the conversation so far.
    async fn propose_question(
        &self,
        history: &[(Speaker, String)],
    ) -> Result<ProposedQuestion, AppError>;

    /// Scores one answer against its question. Appends a score summary to the
    /// session log's internal dialog.
    async fn score_answer(
        &self,
        question: &str,
        answer: &str,
        log: &mut SessionLog,
    ) -> Result<Evaluation, AppError>;

    /// Synthesizes the final hiring report over the whole history.
    /// The result is opaque text: displayed and persisted verbatim.
    async fn final_report(&self, history: &[(Speaker, String)]) -> Result<String, AppError>;
}

/// LLM-backed observer.
pub struct Observer {
    llm: Arc<dyn CompletionService>,
    profile: Arc<CandidateProfile>,
}

impl Observer {
    pub fn new(llm: Arc<dyn CompletionService>, profile: Arc<CandidateProfile>) -> Self {
        Observer { llm, profile }
    }

    fn fill_profile(&self, template: &str) -> String {
        template
            .replace("{position}", &self.profile.position)
            .replace(
                "{grade}",
                if self.profile.grade.is_empty() {
                    "unknown"
                } else {
                    &self.profile.grade
                },
            )
            .replace(
                "{experience}",
                &self
                    .profile
                    .experience
                    .map(|y| y.to_string())
                    .unwrap_or_else(|| "0".to_string()),
            )
    }
}

#[async_trait]
impl EvaluatorRole for Observer {
    async fn propose_question(
        &self,
        history: &[(Speaker, String)],
    ) -> Result<ProposedQuestion, AppError> {
        let prompt = self
            .fill_profile(PROPOSE_QUESTION_TEMPLATE)
            .replace("{skills}", &self.profile.skills.join(", "))
            .replace("{persona}", INTERVIEWER_PERSONA)
            .replace("{history}", &render_history(history));

        let system = format!("{OBSERVER_SYSTEM}\n{JSON_ONLY_SYSTEM}");
        let raw = self.llm.complete(&prompt, &system).await?;
        let parsed = sanitize_and_parse(&raw);
        if parsed.is_empty() {
            warn!("question proposal was unrecoverable, returning empty question");
        }

        Ok(ProposedQuestion {
            question: str_field(&parsed, "question"),
            internal_thoughts: string_list_field(&parsed, "internal_thoughts"),
        })
    }

    async fn score_answer(
        &self,
        question: &str,
        answer: &str,
        log: &mut SessionLog,
    ) -> Result<Evaluation, AppError> {
        let prompt = self
            .fill_profile(SCORE_ANSWER_TEMPLATE)
            .replace("{question}", question)
            .replace("{answer}", answer);

        let system = format!("{OBSERVER_SYSTEM}\n{JSON_ONLY_SYSTEM}");
        let raw = self.llm.complete(&prompt, &system).await?;
        let parsed = sanitize_and_parse(&raw);
        if parsed.is_empty() {
            warn!("answer evaluation was unrecoverable, scoring neutral");
        }

        let evaluation = Evaluation {
            correctness: score_field(&parsed, "correctness"),
            completeness: score_field(&parsed, "completeness"),
            relevance: score_field(&parsed, "relevance"),
            recommendations: str_field(&parsed, "recommendations"),
        };
        debug!(
            "answer scored: correctness={} completeness={} relevance={}",
            evaluation.correctness, evaluation.completeness, evaluation.relevance
        );

        log.record_internal(
            Role::Observer,
            Role::Interviewer,
            format!("Evaluated answer to: {}", truncate(question, 50)),
            Some(format!("Score: {}/10", evaluation.correctness)),
        );

        Ok(evaluation)
    }

    async fn final_report(&self, history: &[(Speaker, String)]) -> Result<String, AppError> {
        let prompt = self
            .fill_profile(FINAL_REPORT_TEMPLATE)
            .replace("{history}", &render_history(history));

        // Deliberately no parsing here: the report is an opaque blob for
        // display and storage, even though the prompt requests JSON.
        let raw = self.llm.complete(&prompt, OBSERVER_SYSTEM).await?;
        Ok(raw)
    }
}

/// Renders the conversation history as alternating speaker-prefixed lines.
fn render_history(history: &[(Speaker, String)]) -> String {
    if history.is_empty() {
        return "(no questions asked yet)".to_string();
    }
    history
        .iter()
        .map(|(speaker, text)| format!("{speaker}: {text}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn str_field(value: &Map<String, Value>, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn string_list_field(value: &Map<String, Value>, key: &str) -> Vec<String> {
    match value.get(key) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        // A single thought sometimes arrives as a bare string.
        Some(Value::String(s)) if !s.is_empty() => vec![s.clone()],
        _ => Vec::new(),
    }
}

/// Extracts a 0-10 score, clamping out-of-range values and tolerating
/// numeric strings. Anything else scores 0.
fn score_field(value: &Map<String, Value>, key: &str) -> u8 {
    let n = match value.get(key) {
        Some(Value::Number(n)) => n.as_i64().unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse::<i64>().unwrap_or(0),
        _ => 0,
    };
    n.clamp(0, 10) as u8
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max_chars).collect();
        format!("{cut}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::LlmError;
    use serde_json::json;

    struct CannedService(String);

    #[async_trait]
    impl CompletionService for CannedService {
        async fn complete(&self, _prompt: &str, _system: &str) -> Result<String, LlmError> {
            Ok(self.0.clone())
        }
    }

    fn observer(response: &str) -> Observer {
        let profile = CandidateProfile {
            name: Some("Alex".to_string()),
            position: "Backend Developer".to_string(),
            grade: "middle".to_string(),
            experience: Some(3),
            skills: vec!["Python".to_string(), "PostgreSQL".to_string()],
            summary: "Backend developer".to_string(),
        };
        Observer::new(
            Arc::new(CannedService(response.to_string())),
            Arc::new(profile),
        )
    }

    #[tokio::test]
    async fn test_propose_question_parses_thoughts_and_question() {
        let response = json!({
            "internal_thoughts": ["candidate claims SQL depth", "probe indexing"],
            "question": "How does PostgreSQL pick an index for a query?"
        })
        .to_string();
        let proposed = observer(&response).propose_question(&[]).await.unwrap();
        assert_eq!(
            proposed.question,
            "How does PostgreSQL pick an index for a query?"
        );
        assert_eq!(proposed.internal_thoughts.len(), 2);
    }

    #[tokio::test]
    async fn test_propose_question_degrades_to_empty_on_prose() {
        let proposed = observer("I'm sorry, I can't help with that.")
            .propose_question(&[])
            .await
            .unwrap();
        assert_eq!(proposed, ProposedQuestion::default());
    }

    #[tokio::test]
    async fn test_score_answer_maps_fields_and_logs_summary() {
        let response = json!({
            "correctness": 8,
            "completeness": 6,
            "relevance": 9,
            "recommendations": "push on transaction isolation next"
        })
        .to_string();
        let mut log = SessionLog::new("Alex");
        let evaluation = observer(&response)
            .score_answer("What is MVCC?", "It lets readers not block writers", &mut log)
            .await
            .unwrap();
        assert_eq!(evaluation.correctness, 8);
        assert_eq!(evaluation.completeness, 6);
        assert_eq!(evaluation.relevance, 9);

        let record = log.export();
        assert_eq!(record.internal_dialogs.len(), 1);
        assert_eq!(record.internal_dialogs[0].from_role, Role::Observer);
        assert_eq!(
            record.internal_dialogs[0].response.as_deref(),
            Some("Score: 8/10")
        );
    }

    #[tokio::test]
    async fn test_score_answer_defaults_and_clamps_malformed_fields() {
        let response = json!({
            "correctness": 15,
            "completeness": -3,
            "relevance": "7"
        })
        .to_string();
        let mut log = SessionLog::new("Alex");
        let evaluation = observer(&response)
            .score_answer("q", "a", &mut log)
            .await
            .unwrap();
        assert_eq!(evaluation.correctness, 10);
        assert_eq!(evaluation.completeness, 0);
        assert_eq!(evaluation.relevance, 7);
        assert_eq!(evaluation.recommendations, "");
    }

    #[tokio::test]
    async fn test_score_answer_survives_truncated_response() {
        // Token-limit cutoff mid-recommendations.
        let response = r#"{"correctness": 5, "completeness": 4, "relevance": 6, "recommendations": "ask about"#;
        let mut log = SessionLog::new("Alex");
        let evaluation = observer(response)
            .score_answer("q", "a", &mut log)
            .await
            .unwrap();
        assert_eq!(evaluation.correctness, 5);
        assert_eq!(evaluation.recommendations, "ask about");
    }

    #[tokio::test]
    async fn test_final_report_returns_raw_text_verbatim() {
        let raw = "```json\n{\"verdict\": {\"grade\": \"Middle\"}}\n```";
        let report = observer(raw).final_report(&[]).await.unwrap();
        assert_eq!(report, raw);
    }

    #[test]
    fn test_render_history_prefixes_speakers() {
        let history = vec![
            (Speaker::Interviewer, "What is a deadlock?".to_string()),
            (Speaker::Candidate, "Two locks waiting on each other".to_string()),
        ];
        let rendered = render_history(&history);
        assert!(rendered.starts_with("interviewer: What is a deadlock?"));
        assert!(rendered.contains("candidate: Two locks"));
    }
}
