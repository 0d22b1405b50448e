use chrono::{NaiveDateTime, Timelike};
use serde::Serialize;

use super::classifier::classify;
use super::domain::{AssessmentOutcome, QuestionGroup, TranscriptEntry};
use super::question_bank::QuestionBank;

const WELCOME: &str = "আমি BRAC IED থেকে বলছি। আপনার মানসিক স্বাস্থ্য মূল্যায়নে আপনাকে স্বাগতম।";

/// Salutation for a local wall-clock hour: morning from 5, afternoon from 12, evening from 17.
pub fn time_greeting(hour: u32) -> &'static str {
    match hour {
        5..=11 => "Good morning",
        12..=16 => "Good afternoon",
        _ => "Good evening",
    }
}

pub fn greeting_message(now: NaiveDateTime) -> String {
    format!("{}! {}", time_greeting(now.hour()), WELCOME)
}

/// Where a session sits in the questionnaire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "index", rename_all = "snake_case")]
pub enum SessionStatus {
    NotStarted,
    AwaitingAnswer(usize),
    Complete,
}

impl SessionStatus {
    pub fn label(&self) -> &'static str {
        match self {
            SessionStatus::NotStarted => "not_started",
            SessionStatus::AwaitingAnswer(_) => "awaiting_answer",
            SessionStatus::Complete => "complete",
        }
    }
}

/// Result of a successful [`AssessmentSession::submit_answer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerProgress {
    Advanced { next_index: usize },
    Completed(AssessmentOutcome),
}

/// Failures raised by the state machine. None of them change session state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssessmentError {
    #[error("'{label}' is not an option for question {step}")]
    InvalidOptionSelected { step: usize, label: String },
    #[error("question index {index} is outside the {count} question bank")]
    OutOfRangeIndex { index: usize, count: usize },
    #[error("assessment has not started")]
    NotStarted,
    #[error("assessment is already complete")]
    AlreadyComplete,
}

/// One respondent's walk through the question bank.
///
/// The value is owned by whoever hosts the session; every operation takes it
/// explicitly and there is no way to revisit an answered question.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AssessmentSession {
    current_index: usize,
    transcript: Vec<TranscriptEntry>,
    score_distress: u32,
    score_coping: u32,
    started: bool,
}

impl AssessmentSession {
    /// A session that has already rendered its greeting and awaits the first answer.
    pub fn begin(now: NaiveDateTime) -> Self {
        let mut session = Self::default();
        session.start(now);
        session
    }

    /// `NOT_STARTED -> AWAITING_ANSWER(0)`. A no-op once started.
    pub fn start(&mut self, now: NaiveDateTime) {
        if self.started {
            return;
        }
        self.started = true;
        self.transcript
            .push(TranscriptEntry::system(greeting_message(now)));
    }

    pub fn status(&self, bank: &QuestionBank) -> SessionStatus {
        if self.current_index >= bank.count() {
            SessionStatus::Complete
        } else if !self.started {
            SessionStatus::NotStarted
        } else {
            SessionStatus::AwaitingAnswer(self.current_index)
        }
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn transcript(&self) -> &[TranscriptEntry] {
        &self.transcript
    }

    pub fn score_distress(&self) -> u32 {
        self.score_distress
    }

    pub fn score_coping(&self) -> u32 {
        self.score_coping
    }

    pub fn total(&self) -> u32 {
        self.score_distress + self.score_coping
    }

    /// Final scores, available only once every question is answered.
    pub fn outcome(&self, bank: &QuestionBank) -> Option<AssessmentOutcome> {
        if self.current_index != bank.count() {
            return None;
        }
        let total = self.total();
        Some(AssessmentOutcome {
            score_distress: self.score_distress,
            score_coping: self.score_coping,
            total,
            level: classify(i64::from(total)),
        })
    }

    /// Record the answer to the current question and advance by exactly one.
    pub fn submit_answer(
        &mut self,
        bank: &QuestionBank,
        label: &str,
    ) -> Result<AnswerProgress, AssessmentError> {
        let count = bank.count();
        if self.current_index > count {
            return Err(AssessmentError::OutOfRangeIndex {
                index: self.current_index,
                count,
            });
        }
        if self.current_index == count {
            return Err(AssessmentError::AlreadyComplete);
        }
        if !self.started {
            return Err(AssessmentError::NotStarted);
        }

        let question = bank.get(self.current_index);
        let option = question
            .option(label)
            .ok_or_else(|| AssessmentError::InvalidOptionSelected {
                step: self.current_index,
                label: label.to_string(),
            })?;

        self.transcript
            .push(TranscriptEntry::system(question.prompt));
        self.transcript
            .push(TranscriptEntry::respondent(option.label));
        match question.group {
            QuestionGroup::Distress => self.score_distress += u32::from(option.points),
            QuestionGroup::Coping => self.score_coping += u32::from(option.points),
        }
        self.current_index += 1;

        match self.outcome(bank) {
            Some(outcome) => Ok(AnswerProgress::Completed(outcome)),
            None => Ok(AnswerProgress::Advanced {
                next_index: self.current_index,
            }),
        }
    }

    /// Discard everything and return to `NOT_STARTED`. Persisted records are untouched.
    pub fn restart(&mut self) {
        *self = Self::default();
    }
}
