use serde::{Deserialize, Serialize};

use super::band::Band;
use crate::quiz::{parse_answer_index, questions, AnswerSet};

/// Population constants for the 25-item test (50% baseline correctness).
pub const MEAN_RAW: f64 = 12.5;
pub const SD_RAW: f64 = 4.0;

/// Target IQ scale.
pub const IQ_MEAN: f64 = 100.0;
pub const IQ_SD: f64 = 15.0;

pub const IQ_MIN: u32 = 70;
pub const IQ_MAX: u32 = 145;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    pub raw_score: u32,
    pub iq_score: u32,
    pub percentile: u32,
    pub band: Band,
    pub interpretation: String,
}

impl ScoreResult {
    /// Build the full result for a raw score.
    pub fn from_raw(raw_score: u32) -> Self {
        let iq_score = iq_from_raw(raw_score);
        let band = Band::from_iq(iq_score);
        Self {
            raw_score,
            iq_score,
            percentile: band.percentile(),
            band,
            interpretation: band.interpretation().to_string(),
        }
    }
}

/// Score an answer set.
///
/// Total over any input: missing, unknown, or malformed answers simply count
/// as incorrect. Callers that need to reject incomplete submissions must run
/// [`validate_answers`](super::validate_answers) first.
pub fn score_answers(answers: &AnswerSet) -> ScoreResult {
    ScoreResult::from_raw(raw_score(answers))
}

/// Count of catalog questions answered correctly.
pub fn raw_score(answers: &AnswerSet) -> u32 {
    questions()
        .iter()
        .filter(|q| {
            answers
                .get(q.id)
                .and_then(|a| parse_answer_index(a))
                .is_some_and(|idx| idx == q.correct_answer)
        })
        .count() as u32
}

/// Map a raw score onto the IQ scale. Rounds first, then clamps.
pub fn iq_from_raw(raw_score: u32) -> u32 {
    let z_score = (raw_score as f64 - MEAN_RAW) / SD_RAW;
    let iq = (IQ_MEAN + z_score * IQ_SD).round();
    iq.clamp(IQ_MIN as f64, IQ_MAX as f64) as u32
}
