pub mod band;
pub mod engine;
pub mod validation;

pub use band::Band;
pub use engine::{iq_from_raw, raw_score, score_answers, ScoreResult, IQ_MAX, IQ_MIN};
pub use validation::{check_answers, validate_answers};
