use std::collections::BTreeMap;

use serde::Serialize;

use crate::workflows::assessment::{ResponseRecord, StressLevel};

pub const EMPTY_MESSAGE: &str = "No participants yet.";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelCount {
    pub level: StressLevel,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreBucket {
    pub score: u32,
    pub count: usize,
}

/// Dashboard figures over the full `responses` table.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsSummary {
    pub total_participants: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_score: Option<u32>,
    pub level_distribution: Vec<LevelCount>,
    pub score_spread: Vec<ScoreBucket>,
    /// Newest first.
    pub responses: Vec<ResponseRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

impl AnalyticsSummary {
    pub fn from_records(records: &[ResponseRecord]) -> Self {
        let total_participants = records.len();
        let average_score = if records.is_empty() {
            None
        } else {
            let sum: u64 = records.iter().map(|record| u64::from(record.score)).sum();
            let mean = sum as f64 / total_participants as f64;
            Some((mean * 10.0).round() / 10.0)
        };
        let max_score = records.iter().map(|record| record.score).max();

        let level_distribution = StressLevel::ALL
            .iter()
            .map(|level| LevelCount {
                level: *level,
                count: records.iter().filter(|record| record.level == *level).count(),
            })
            .collect();

        let mut spread: BTreeMap<u32, usize> = BTreeMap::new();
        for record in records {
            *spread.entry(record.score).or_default() += 1;
        }
        let score_spread = spread
            .into_iter()
            .map(|(score, count)| ScoreBucket { score, count })
            .collect();

        let mut responses = records.to_vec();
        responses.sort_by(|a, b| b.id.cmp(&a.id));

        Self {
            total_participants,
            average_score,
            max_score,
            level_distribution,
            score_spread,
            responses,
            message: records.is_empty().then_some(EMPTY_MESSAGE),
        }
    }
}
