//! Conversational stress self-assessment: question bank, scoring, the
//! per-respondent state machine, and persistence of completed results.

pub mod classifier;
pub mod domain;
pub mod question_bank;
pub mod repository;
pub mod router;
pub mod service;
pub mod session;
pub mod store;
pub mod view;

#[cfg(test)]
mod tests;

pub use classifier::classify;
pub use domain::{
    AnswerOption, AssessmentOutcome, Question, QuestionGroup, SessionId, Speaker, StressLevel,
    TranscriptEntry,
};
pub use question_bank::QuestionBank;
pub use repository::{
    AlertError, AlertPublisher, OperatorAlert, SessionRepository, SessionRepositoryError,
};
pub use router::{assessment_router, AnswerRequest, Surface, SurfaceQuery};
pub use service::{AssessmentService, AssessmentServiceError, PERSISTENCE_FAILURE};
pub use session::{AnswerProgress, AssessmentError, AssessmentSession, SessionStatus};
pub use store::{CsvResponseStore, ResponseRecord, ResponseStore, StoreError};
pub use view::{QuestionView, ResultView, SessionView};
