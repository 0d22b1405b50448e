use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifier handed to the hosting layer for a respondent's session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Question subsets. Distress items score ascending, coping items descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionGroup {
    Distress,
    Coping,
}

/// One selectable answer and the points it contributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerOption {
    pub label: &'static str,
    pub points: u8,
}

/// Immutable questionnaire item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Question {
    pub prompt: &'static str,
    pub options: &'static [AnswerOption; 5],
    pub group: QuestionGroup,
}

impl Question {
    pub fn option(&self, label: &str) -> Option<&AnswerOption> {
        self.options.iter().find(|option| option.label == label)
    }

    pub fn labels(&self) -> Vec<&'static str> {
        self.options.iter().map(|option| option.label).collect()
    }
}

/// Qualitative stress bucket derived from the total score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StressLevel {
    Low,
    Moderate,
    High,
}

impl StressLevel {
    pub const ALL: [StressLevel; 3] = [StressLevel::Low, StressLevel::Moderate, StressLevel::High];

    /// Persisted spelling in the `level` column.
    pub fn label(&self) -> &'static str {
        match self {
            StressLevel::Low => "Low",
            StressLevel::Moderate => "Moderate",
            StressLevel::High => "High",
        }
    }

    pub fn headline(&self) -> &'static str {
        match self {
            StressLevel::Low => "LOW STRESS",
            StressLevel::Moderate => "MODERATE STRESS",
            StressLevel::High => "HIGH STRESS",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            StressLevel::Low => "আপনার মানসিক চাপের মাত্রা বর্তমানে বেশ কম।",
            StressLevel::Moderate => {
                "আপনি বর্তমানে মাঝারি মাত্রার মানসিক চাপের মধ্য দিয়ে যাচ্ছেন।"
            }
            StressLevel::High => "আপনার মানসিক চাপের মাত্রা বর্তমানে উচ্চ।",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "Low" => Some(StressLevel::Low),
            "Moderate" => Some(StressLevel::Moderate),
            "High" => Some(StressLevel::High),
            _ => None,
        }
    }
}

impl fmt::Display for StressLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Who authored a transcript line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    System,
    Respondent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub speaker: Speaker,
    pub text: String,
}

impl TranscriptEntry {
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::System,
            text: text.into(),
        }
    }

    pub fn respondent(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Respondent,
            text: text.into(),
        }
    }
}

/// Scores captured at the moment a session completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AssessmentOutcome {
    pub score_distress: u32,
    pub score_coping: u32,
    pub total: u32,
    pub level: StressLevel,
}
