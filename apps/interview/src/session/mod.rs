//! Session log — the append-only record of everything that happened in one
//! interview: visible question/answer turns plus the internal coordination
//! messages between the interviewer and the observer.
//!
//! The log is the single source of truth for the session. Turn ids are dense,
//! increasing from 1, with no gaps or reuse, and at most one turn is open
//! (answer still empty) at any time. Violating either invariant is a caller
//! bug and surfaces as `AppError::Protocol`.

use std::path::Path;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::AppError;

/// A participant role in the coordination protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Interviewer,
    Observer,
}

/// One question/answer exchange, uniquely numbered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub turn_id: u32,
    pub visible_question: String,
    /// Empty until the answer arrives.
    pub user_answer: String,
    /// Why this question was chosen. Filled at answer time with the thoughts
    /// from the proposal that produced this turn's question.
    pub internal_thoughts: Vec<String>,
}

/// An audit record of a coordination message between roles, never shown to
/// the answering party.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InternalDialogEntry {
    /// Seconds since session start. Monotonically non-decreasing.
    pub timestamp: f64,
    pub from_role: Role,
    pub to_role: Role,
    pub message: String,
    pub response: Option<String>,
    /// The turn considered current at the moment of logging.
    pub associated_turn_id: u32,
}

/// Serializable snapshot of a full session. Field names are part of the wire
/// contract with downstream log consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub participant_name: String,
    pub turns: Vec<Turn>,
    pub internal_dialogs: Vec<InternalDialogEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_feedback: Option<String>,
}

/// Append-only session log. Owned and mutated by the orchestrator only;
/// the observer gets it just long enough to record score summaries.
pub struct SessionLog {
    participant_name: String,
    turns: Vec<Turn>,
    internal_dialogs: Vec<InternalDialogEntry>,
    current_turn_id: u32,
    /// True while the most recent turn still awaits its answer. Tracked
    /// explicitly so an empty answer still counts as closing the turn.
    awaiting_answer: bool,
    started: Instant,
    final_feedback: Option<String>,
}

impl SessionLog {
    pub fn new(participant_name: impl Into<String>) -> Self {
        SessionLog {
            participant_name: participant_name.into(),
            turns: Vec::new(),
            internal_dialogs: Vec::new(),
            current_turn_id: 0,
            awaiting_answer: false,
            started: Instant::now(),
            final_feedback: None,
        }
    }

    /// Opens a new turn for a just-asked question and returns its id.
    /// Ids are assigned densely starting at 1.
    pub fn open_turn(&mut self, visible_question: impl Into<String>) -> Result<u32, AppError> {
        if self.awaiting_answer {
            return Err(AppError::Protocol(format!(
                "cannot open a new turn while turn {} is still awaiting an answer",
                self.current_turn_id
            )));
        }

        self.current_turn_id += 1;
        self.awaiting_answer = true;
        self.turns.push(Turn {
            turn_id: self.current_turn_id,
            visible_question: visible_question.into(),
            user_answer: String::new(),
            internal_thoughts: Vec::new(),
        });
        debug!("opened turn {}", self.current_turn_id);
        Ok(self.current_turn_id)
    }

    /// Appends a coordination message, stamped with the current turn id and
    /// the elapsed time since session start.
    pub fn record_internal(
        &mut self,
        from_role: Role,
        to_role: Role,
        message: impl Into<String>,
        response: Option<String>,
    ) {
        self.internal_dialogs.push(InternalDialogEntry {
            timestamp: self.started.elapsed().as_secs_f64(),
            from_role,
            to_role,
            message: message.into(),
            response,
            associated_turn_id: self.current_turn_id,
        });
    }

    /// Fills in the answer and thoughts on the most recently opened turn.
    /// A stale or unknown id is a protocol violation: the log has no notion
    /// of out-of-order turn completion.
    pub fn close_turn(
        &mut self,
        turn_id: u32,
        answer: impl Into<String>,
        internal_thoughts: Vec<String>,
    ) -> Result<(), AppError> {
        let Some(last) = self.turns.last_mut() else {
            return Err(AppError::Protocol(format!(
                "cannot close turn {turn_id}: no turn has been opened"
            )));
        };
        if last.turn_id != turn_id {
            return Err(AppError::Protocol(format!(
                "cannot close turn {turn_id}: current turn is {}",
                last.turn_id
            )));
        }
        if !self.awaiting_answer {
            return Err(AppError::Protocol(format!(
                "turn {turn_id} is already closed"
            )));
        }

        last.user_answer = answer.into();
        last.internal_thoughts = internal_thoughts;
        self.awaiting_answer = false;
        debug!("closed turn {turn_id}");
        Ok(())
    }

    /// Attaches the final report. Called once, at session end.
    pub fn finalize(&mut self, feedback: impl Into<String>) {
        self.final_feedback = Some(feedback.into());
        info!(
            "session finalized: {} turns, {} internal dialogs",
            self.turns.len(),
            self.internal_dialogs.len()
        );
    }

    /// The id of the most recently opened turn (0 before the first).
    pub fn current_turn_id(&self) -> u32 {
        self.current_turn_id
    }

    /// Read-only snapshot for serialization.
    pub fn export(&self) -> SessionRecord {
        SessionRecord {
            participant_name: self.participant_name.clone(),
            turns: self.turns.clone(),
            internal_dialogs: self.internal_dialogs.clone(),
            final_feedback: self.final_feedback.clone(),
        }
    }

    /// Writes the exported record to disk as pretty JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), AppError> {
        let record = self.export();
        let json = serde_json::to_string_pretty(&record)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path.as_ref(), json)?;
        info!("session log saved to {}", path.as_ref().display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log_with_closed_turns(n: u32) -> SessionLog {
        let mut log = SessionLog::new("Test Candidate");
        for i in 1..=n {
            let id = log.open_turn(format!("question {i}")).unwrap();
            log.close_turn(id, format!("answer {i}"), vec![format!("thought {i}")])
                .unwrap();
        }
        log
    }

    #[test]
    fn test_turn_ids_are_dense_from_one() {
        let log = log_with_closed_turns(5);
        let record = log.export();
        let ids: Vec<u32> = record.turns.iter().map(|t| t.turn_id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_open_turn_while_open_is_a_protocol_violation() {
        let mut log = SessionLog::new("Test Candidate");
        log.open_turn("first").unwrap();
        let err = log.open_turn("second").unwrap_err();
        assert!(matches!(err, AppError::Protocol(_)));
    }

    #[test]
    fn test_close_turn_with_stale_id_is_a_protocol_violation() {
        let mut log = log_with_closed_turns(1);
        log.open_turn("second question").unwrap();
        let err = log.close_turn(1, "late answer", vec![]).unwrap_err();
        assert!(matches!(err, AppError::Protocol(_)));
    }

    #[test]
    fn test_close_turn_with_unknown_id_is_a_protocol_violation() {
        let mut log = SessionLog::new("Test Candidate");
        assert!(matches!(
            log.close_turn(1, "answer", vec![]),
            Err(AppError::Protocol(_))
        ));

        log.open_turn("question").unwrap();
        assert!(matches!(
            log.close_turn(7, "answer", vec![]),
            Err(AppError::Protocol(_))
        ));
    }

    #[test]
    fn test_double_close_is_a_protocol_violation() {
        let mut log = SessionLog::new("Test Candidate");
        let id = log.open_turn("question").unwrap();
        log.close_turn(id, "answer", vec![]).unwrap();
        assert!(matches!(
            log.close_turn(id, "answer again", vec![]),
            Err(AppError::Protocol(_))
        ));
    }

    #[test]
    fn test_internal_entries_carry_current_turn_id_and_monotone_timestamps() {
        let mut log = SessionLog::new("Test Candidate");
        log.record_internal(Role::Interviewer, Role::Observer, "before any turn", None);

        let id = log.open_turn("question").unwrap();
        log.record_internal(
            Role::Observer,
            Role::Interviewer,
            "score summary",
            Some("7/10".to_string()),
        );

        let record = log.export();
        assert_eq!(record.internal_dialogs[0].associated_turn_id, 0);
        assert_eq!(record.internal_dialogs[1].associated_turn_id, id);
        assert!(record.internal_dialogs[0].timestamp <= record.internal_dialogs[1].timestamp);
    }

    #[test]
    fn test_thoughts_are_stored_on_the_turn_they_belong_to() {
        let mut log = SessionLog::new("Test Candidate");
        let id1 = log.open_turn("q1").unwrap();
        log.close_turn(id1, "a1", vec!["thought for q1".to_string()])
            .unwrap();
        let id2 = log.open_turn("q2").unwrap();
        log.close_turn(id2, "a2", vec!["thought for q2".to_string()])
            .unwrap();

        let record = log.export();
        assert_eq!(record.turns[0].internal_thoughts, vec!["thought for q1"]);
        assert_eq!(record.turns[1].internal_thoughts, vec!["thought for q2"]);
    }

    #[test]
    fn test_empty_answer_still_closes_the_turn() {
        let mut log = SessionLog::new("Test Candidate");
        let id = log.open_turn("question").unwrap();
        log.close_turn(id, "", vec![]).unwrap();
        // Openness is tracked explicitly, not inferred from answer emptiness.
        assert_eq!(log.open_turn("next question").unwrap(), id + 1);
    }

    #[test]
    fn test_final_feedback_absent_until_finalized() {
        let mut log = log_with_closed_turns(1);
        let json = serde_json::to_string(&log.export()).unwrap();
        assert!(!json.contains("final_feedback"));

        log.finalize("strong hire");
        let record = log.export();
        assert_eq!(record.final_feedback.as_deref(), Some("strong hire"));
    }

    #[test]
    fn test_wire_field_names_are_stable() {
        let mut log = SessionLog::new("Test Candidate");
        let id = log.open_turn("q").unwrap();
        log.record_internal(Role::Interviewer, Role::Observer, "m", None);
        log.close_turn(id, "a", vec![]).unwrap();
        log.finalize("fb");

        let value: serde_json::Value = serde_json::to_value(log.export()).unwrap();
        assert!(value.get("participant_name").is_some());
        assert!(value.get("turns").is_some());
        assert!(value.get("internal_dialogs").is_some());
        assert!(value.get("final_feedback").is_some());

        let turn = &value["turns"][0];
        for key in ["turn_id", "visible_question", "user_answer", "internal_thoughts"] {
            assert!(turn.get(key).is_some(), "missing turn field {key}");
        }
        let dialog = &value["internal_dialogs"][0];
        for key in [
            "timestamp",
            "from_role",
            "to_role",
            "message",
            "response",
            "associated_turn_id",
        ] {
            assert!(dialog.get(key).is_some(), "missing dialog field {key}");
        }
        assert_eq!(dialog["from_role"], "interviewer");
        assert_eq!(dialog["to_role"], "observer");
    }

    #[test]
    fn test_save_round_trips_through_disk() {
        let log = log_with_closed_turns(3);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("interview_log.json");
        log.save(&path).unwrap();

        let loaded: SessionRecord =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded, log.export());
        assert_eq!(loaded.turns.len(), 3);
    }
}
