use serde::Serialize;

use super::domain::{QuestionGroup, SessionId, StressLevel, TranscriptEntry};
use super::question_bank::QuestionBank;
use super::session::{AssessmentSession, SessionStatus};

/// Everything a client needs to render the current step.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub session_id: SessionId,
    pub status: &'static str,
    pub step: usize,
    pub total_questions: usize,
    pub transcript: Vec<TranscriptEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<QuestionView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<ResultView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionView {
    pub prompt: &'static str,
    pub group: QuestionGroup,
    pub options: Vec<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResultView {
    pub score: u32,
    pub score_distress: u32,
    pub score_coping: u32,
    pub level: StressLevel,
    pub headline: &'static str,
    pub description: &'static str,
}

impl SessionView {
    pub fn render(id: &SessionId, session: &AssessmentSession, bank: &QuestionBank) -> Self {
        let status = session.status(bank);
        let (banner, question) = match status {
            SessionStatus::AwaitingAnswer(index) => {
                let question = bank.get(index);
                (
                    bank.banner(index),
                    Some(QuestionView {
                        prompt: question.prompt,
                        group: question.group,
                        options: question.labels(),
                    }),
                )
            }
            SessionStatus::NotStarted | SessionStatus::Complete => (None, None),
        };
        let result = session.outcome(bank).map(|outcome| ResultView {
            score: outcome.total,
            score_distress: outcome.score_distress,
            score_coping: outcome.score_coping,
            level: outcome.level,
            headline: outcome.level.headline(),
            description: outcome.level.description(),
        });

        Self {
            session_id: id.clone(),
            status: status.label(),
            step: session.current_index(),
            total_questions: bank.count(),
            transcript: session.transcript().to_vec(),
            banner,
            question,
            result,
        }
    }
}
