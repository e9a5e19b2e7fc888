use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification band for a clamped IQ score, lowest first.
///
/// Ranges (inclusive): `<85`, `85-99`, `100-114`, `115-129`, `>=130`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Band {
    #[serde(rename = "Below Average")]
    BelowAverage,
    #[serde(rename = "Average")]
    Average,
    #[serde(rename = "Above Average")]
    AboveAverage,
    #[serde(rename = "Superior")]
    Superior,
    #[serde(rename = "Very Superior")]
    VerySuperior,
}

impl Band {
    pub const ALL: [Band; 5] = [
        Band::BelowAverage,
        Band::Average,
        Band::AboveAverage,
        Band::Superior,
        Band::VerySuperior,
    ];

    /// Classify an IQ score into exactly one band.
    pub fn from_iq(iq_score: u32) -> Self {
        match iq_score {
            0..=84 => Band::BelowAverage,
            85..=99 => Band::Average,
            100..=114 => Band::AboveAverage,
            115..=129 => Band::Superior,
            _ => Band::VerySuperior,
        }
    }

    /// Parse a human-readable label back into a band (exact match).
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.label() == label)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Band::BelowAverage => "Below Average",
            Band::Average => "Average",
            Band::AboveAverage => "Above Average",
            Band::Superior => "Superior",
            Band::VerySuperior => "Very Superior",
        }
    }

    /// Fixed illustrative percentile for the band (not derived from a distribution)
    pub fn percentile(&self) -> u32 {
        match self {
            Band::BelowAverage => 16,
            Band::Average => 42,
            Band::AboveAverage => 75,
            Band::Superior => 90,
            Band::VerySuperior => 98,
        }
    }

    pub fn interpretation(&self) -> &'static str {
        match self {
            Band::BelowAverage => "Your score suggests you have solid foundational reasoning skills. With practice and focus, you can continue to develop your cognitive abilities.",
            Band::Average => "Your score falls in the average range, shared by nearly half of all test-takers. You have good problem-solving abilities and practical intelligence.",
            Band::AboveAverage => "Your score is above average! You demonstrate strong reasoning and analytical skills. You likely excel in learning new concepts and solving complex problems.",
            Band::Superior => "Excellent work! Your score places you in the superior range. You have exceptional cognitive abilities and likely thrive in intellectually demanding environments.",
            Band::VerySuperior => "Outstanding! Your score is in the very superior range, placing you among the top 2% of test-takers. You have remarkable intellectual capacity.",
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_edges() {
        assert_eq!(Band::from_iq(70), Band::BelowAverage);
        assert_eq!(Band::from_iq(84), Band::BelowAverage);
        assert_eq!(Band::from_iq(85), Band::Average);
        assert_eq!(Band::from_iq(99), Band::Average);
        assert_eq!(Band::from_iq(100), Band::AboveAverage);
        assert_eq!(Band::from_iq(114), Band::AboveAverage);
        assert_eq!(Band::from_iq(115), Band::Superior);
        assert_eq!(Band::from_iq(129), Band::Superior);
        assert_eq!(Band::from_iq(130), Band::VerySuperior);
        assert_eq!(Band::from_iq(145), Band::VerySuperior);
    }

    #[test]
    fn test_percentiles() {
        let percentiles: Vec<u32> = Band::ALL.iter().map(|b| b.percentile()).collect();
        assert_eq!(percentiles, vec![16, 42, 75, 90, 98]);
    }

    #[test]
    fn test_bands_are_ordered() {
        assert!(Band::BelowAverage < Band::Average);
        assert!(Band::Superior < Band::VerySuperior);
        let mut sorted = Band::ALL;
        sorted.sort();
        assert_eq!(sorted, Band::ALL);
    }

    #[test]
    fn test_label_roundtrip() {
        for band in Band::ALL {
            assert_eq!(Band::from_label(band.label()), Some(band));
        }
        assert_eq!(Band::from_label("average"), None);
        assert_eq!(Band::from_label("Genius"), None);
    }

    #[test]
    fn test_interpretations_are_distinct() {
        let mut seen = std::collections::HashSet::new();
        for band in Band::ALL {
            assert!(seen.insert(band.interpretation()));
        }
    }

    #[test]
    fn test_serializes_as_label() {
        let json = serde_json::to_string(&Band::AboveAverage).unwrap();
        assert_eq!(json, "\"Above Average\"");
    }
}
