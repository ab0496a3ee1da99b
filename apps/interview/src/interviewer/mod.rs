//! Interviewer — the orchestrating role that drives the turn loop.
//!
//! Owns the conversation history and the session log; the observer only ever
//! sees read-only views (plus the log, briefly, to record score summaries).
//! The loop itself has no end condition: termination is signaled by whoever
//! drives it (the CLI loop here, or a test).

#![allow(dead_code)]

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info};

use crate::errors::AppError;
use crate::observer::{EvaluatorRole, Evaluation};
use crate::session::{Role, SessionLog};

/// Who said a line of the visible conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    Interviewer,
    Candidate,
}

impl fmt::Display for Speaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Speaker::Interviewer => write!(f, "interviewer"),
            Speaker::Candidate => write!(f, "candidate"),
        }
    }
}

/// Where the state machine currently is.
///
/// `Idle → AwaitingAnswer → Evaluated → AwaitingAnswer → … → Terminated`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    AwaitingAnswer,
    Evaluated,
    Terminated,
}

/// Drives the question/answer protocol against the evaluating role.
pub struct Interviewer {
    evaluator: Arc<dyn EvaluatorRole>,
    log: SessionLog,
    history: Vec<(Speaker, String)>,
    phase: Phase,
    current_question: String,
    /// Thoughts from the proposal that produced the currently open turn;
    /// moved onto the turn when the answer closes it.
    pending_thoughts: Vec<String>,
}

impl Interviewer {
    pub fn new(evaluator: Arc<dyn EvaluatorRole>, log: SessionLog) -> Self {
        Interviewer {
            evaluator,
            log,
            history: Vec::new(),
            phase: Phase::Idle,
            current_question: String::new(),
            pending_thoughts: Vec::new(),
        }
    }

    /// Asks the next question: consults the observer, records the visible turn
    /// and the coordination exchange, and returns the question text.
    ///
    /// The coordination entry is logged after the turn opens, so it carries the
    /// id of the turn it produced. An empty proposed question is still recorded
    /// and returned; deciding what to do with it is the caller's job.
    pub async fn ask_question(&mut self) -> Result<String, AppError> {
        match self.phase {
            Phase::Idle | Phase::Evaluated => {}
            Phase::AwaitingAnswer => {
                return Err(AppError::Protocol(
                    "cannot ask a question while one is awaiting an answer".to_string(),
                ))
            }
            Phase::Terminated => {
                return Err(AppError::Protocol(
                    "cannot ask a question after the session has terminated".to_string(),
                ))
            }
        }

        let proposed = self.evaluator.propose_question(&self.history).await?;
        if proposed.question.is_empty() {
            debug!("observer proposed an empty question");
        }

        self.history
            .push((Speaker::Interviewer, proposed.question.clone()));
        let turn_id = self.log.open_turn(proposed.question.as_str())?;
        self.log.record_internal(
            Role::Interviewer,
            Role::Observer,
            "Requested a recommendation for the next question",
            Some(format!(
                "Proposed question: {}",
                truncate(&proposed.question, 50)
            )),
        );

        self.current_question = proposed.question.clone();
        self.pending_thoughts = proposed.internal_thoughts;
        self.phase = Phase::AwaitingAnswer;
        debug!("asked question for turn {turn_id}");

        Ok(proposed.question)
    }

    /// Processes the candidate's answer: closes the open turn with the answer
    /// and the stashed thoughts, then forwards it to the observer for scoring.
    pub async fn process_answer(&mut self, answer: &str) -> Result<Evaluation, AppError> {
        if self.phase != Phase::AwaitingAnswer {
            return Err(AppError::Protocol(
                "no question is awaiting an answer".to_string(),
            ));
        }

        self.history.push((Speaker::Candidate, answer.to_string()));
        self.log.close_turn(
            self.log.current_turn_id(),
            answer,
            std::mem::take(&mut self.pending_thoughts),
        )?;

        let evaluation = self
            .evaluator
            .score_answer(&self.current_question, answer, &mut self.log)
            .await?;

        self.phase = Phase::Evaluated;
        Ok(evaluation)
    }

    /// Ends the session: synthesizes the final report over the full history,
    /// finalizes the log, and moves to `Terminated`. No turns may follow.
    pub async fn conclude(&mut self) -> Result<String, AppError> {
        if self.phase == Phase::Terminated {
            return Err(AppError::Protocol(
                "the session has already terminated".to_string(),
            ));
        }

        let report = self.evaluator.final_report(&self.history).await?;
        self.log.finalize(report.as_str());
        self.phase = Phase::Terminated;
        info!("interview concluded after {} exchanges", self.history.len());
        Ok(report)
    }

    /// Read access to the session log (for export/save by the driver).
    pub fn log(&self) -> &SessionLog {
        &self.log
    }

    pub fn history(&self) -> &[(Speaker, String)] {
        &self.history
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max_chars).collect();
        format!("{cut}...")
    }
}
