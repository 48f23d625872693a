//! Turning a probability vector into a verdict.

use serde::Serialize;

use crate::error::{Error, Result};

use super::class::{Emphasis, TissueClass, UNKNOWN_RESULT};

/// Confidences below this percentage are treated as not a lung scan.
pub const INVALID_BELOW: f32 = 95.0;

/// Confidences above this percentage are reported without a caution.
pub const CONFIDENT_ABOVE: f32 = 97.0;

const INVALID_HEADLINE: &str = "Invalid Image: This image does not appear to be a valid lung scan.";
const INVALID_DESCRIPTION: &str = "Please upload a proper lung scan image for accurate results.";
const UNCERTAIN_SUFFIX: &str =
    "There is some uncertainty in this result. Please consult a specialist.";
const CONFIRMATION_SENTENCE: &str = "Please consult a specialist for confirmation.";

/// Confidence range that decides the verdict wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceBand {
    /// Below 95%: the image is rejected and the label withheld.
    Invalid,
    /// 95% to 97% inclusive: label shown with a caution.
    Uncertain,
    /// Above 97%.
    Confident,
}

impl ConfidenceBand {
    /// Band for a confidence percentage.
    ///
    /// Both ends of the uncertain band are inclusive. NaN is invalid.
    #[must_use]
    pub fn from_confidence(confidence: f32) -> Self {
        if confidence.is_nan() || confidence < INVALID_BELOW {
            Self::Invalid
        } else if confidence <= CONFIDENT_ABOVE {
            Self::Uncertain
        } else {
            Self::Confident
        }
    }
}

/// Outcome of classifying one scan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verdict {
    /// Highest scoring class.
    pub class: TissueClass,
    /// Top score times 100. Not clamped.
    pub confidence: f32,
    pub band: ConfidenceBand,
    /// One line result.
    pub headline: String,
    /// Longer advisory text.
    pub description: String,
    pub emphasis: Emphasis,
}

impl Verdict {
    /// Label to show the user; `None` when the band withholds it.
    #[must_use]
    pub fn surfaced_label(&self) -> Option<&'static str> {
        match self.band {
            ConfidenceBand::Invalid => None,
            ConfidenceBand::Uncertain | ConfidenceBand::Confident => Some(self.class.label()),
        }
    }
}

/// Index of the largest score; the first one wins on ties.
///
/// Returns `None` for an empty slice.
#[must_use]
pub fn argmax(scores: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (index, &score) in scores.iter().enumerate() {
        match best {
            Some((_, top)) if score <= top || score.is_nan() => {}
            _ => best = Some((index, score)),
        }
    }
    best.map(|(index, _)| index)
}

/// Description text for a label in a band.
///
/// Labels outside the tissue table yield [`UNKNOWN_RESULT`].
#[must_use]
pub fn describe_label(label: &str, band: ConfidenceBand) -> String {
    let class = TissueClass::from_label(label);
    match band {
        ConfidenceBand::Invalid => INVALID_DESCRIPTION.to_string(),
        ConfidenceBand::Uncertain => {
            let base = class.map_or(UNKNOWN_RESULT, TissueClass::base_description);
            format!("{base} {CONFIRMATION_SENTENCE}")
        }
        ConfidenceBand::Confident => class
            .map_or(UNKNOWN_RESULT, TissueClass::confident_description)
            .to_string(),
    }
}

/// Percentage with two decimals, ties rounded away from zero.
///
/// `f32 * 100` is exact in `f64`, so the tie test sees the true value.
fn format_percent(confidence: f32) -> String {
    let hundredths = (f64::from(confidence) * 100.0).round();
    format!("{:.2}", hundredths / 100.0)
}

fn headline(class: TissueClass, confidence: f32, band: ConfidenceBand) -> String {
    match band {
        ConfidenceBand::Invalid => INVALID_HEADLINE.to_string(),
        ConfidenceBand::Uncertain => format!(
            "Prediction: {class} (Confidence: {}%) - {UNCERTAIN_SUFFIX}",
            format_percent(confidence)
        ),
        ConfidenceBand::Confident => format!(
            "Prediction: {class} (Confidence: {}%)",
            format_percent(confidence)
        ),
    }
}

/// Resolve a model probability vector into a verdict.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] unless there is exactly one score per
/// [`TissueClass`].
pub fn resolve(probabilities: &[f32]) -> Result<Verdict> {
    if probabilities.len() != TissueClass::COUNT {
        return Err(Error::InvalidInput {
            expected: TissueClass::COUNT,
            actual: probabilities.len(),
        });
    }

    // A NaN-only vector has no maximum; fall back to the first class.
    let index = argmax(probabilities).unwrap_or(0);
    let class = TissueClass::ALL[index];
    let confidence = probabilities[index] * 100.0;
    let band = ConfidenceBand::from_confidence(confidence);

    let emphasis = match band {
        ConfidenceBand::Invalid => Emphasis::Neutral,
        ConfidenceBand::Uncertain | ConfidenceBand::Confident => class.emphasis(),
    };

    let verdict = Verdict {
        class,
        confidence,
        band,
        headline: headline(class, confidence, band),
        description: describe_label(class.label(), band),
        emphasis,
    };

    tracing::debug!(
        class = %verdict.class,
        confidence = verdict.confidence,
        band = ?verdict.band,
        "Resolved verdict"
    );

    Ok(verdict)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_band() {
        let verdict = resolve(&[0.40, 0.30, 0.30]).unwrap();

        assert_eq!(verdict.band, ConfidenceBand::Invalid);
        assert!((verdict.confidence - 40.0).abs() < 1e-4);
        assert_eq!(verdict.class, TissueClass::Adenocarcinoma);
        assert_eq!(verdict.headline, INVALID_HEADLINE);
        assert_eq!(verdict.description, INVALID_DESCRIPTION);
        assert!(!verdict.headline.contains("Lung_adenocarcinoma"));
        assert_eq!(verdict.surfaced_label(), None);
        assert_eq!(verdict.emphasis, Emphasis::Neutral);
    }

    #[test]
    fn test_uncertain_band() {
        let verdict = resolve(&[0.961, 0.02, 0.019]).unwrap();

        assert_eq!(verdict.band, ConfidenceBand::Uncertain);
        assert_eq!(verdict.class, TissueClass::Adenocarcinoma);
        assert_eq!(
            verdict.headline,
            "Prediction: Lung_adenocarcinoma (Confidence: 96.10%) - \
             There is some uncertainty in this result. Please consult a specialist."
        );
        assert_eq!(
            verdict.description,
            "This may indicate Lung adenocarcinoma, a type of lung cancer. \
             Please consult a specialist for confirmation."
        );
        assert_eq!(verdict.emphasis, Emphasis::Danger);
    }

    #[test]
    fn test_confident_malignant() {
        let verdict = resolve(&[0.99, 0.005, 0.005]).unwrap();

        assert_eq!(verdict.band, ConfidenceBand::Confident);
        assert_eq!(verdict.class, TissueClass::Adenocarcinoma);
        assert_eq!(
            verdict.headline,
            "Prediction: Lung_adenocarcinoma (Confidence: 99.00%)"
        );
        assert!(verdict.description.ends_with("Please consult a doctor."));
        assert_eq!(verdict.surfaced_label(), Some("Lung_adenocarcinoma"));
    }

    #[test]
    fn test_confident_benign() {
        let verdict = resolve(&[0.02, 0.98, 0.00]).unwrap();

        assert_eq!(verdict.band, ConfidenceBand::Confident);
        assert_eq!(verdict.class, TissueClass::BenignTissue);
        assert!(verdict.headline.contains("98.00%"));
        assert_eq!(
            verdict.description,
            "This indicates a benign lung tissue. However, regular checkups are recommended."
        );
        assert_eq!(verdict.emphasis, Emphasis::Safe);
    }

    #[test]
    fn test_confident_squamous() {
        let verdict = resolve(&[0.0, 0.01, 0.99]).unwrap();

        assert_eq!(verdict.class, TissueClass::SquamousCellCarcinoma);
        assert!(verdict
            .headline
            .starts_with("Prediction: Lung squamous_cell_carcinoma"));
        assert!(verdict.description.contains("squamous cell carcinoma"));
        assert_eq!(verdict.emphasis, Emphasis::Danger);
    }

    #[test]
    fn test_tie_takes_first() {
        assert_eq!(argmax(&[0.5, 0.5, 0.0]), Some(0));
        assert_eq!(argmax(&[0.1, 0.7, 0.7]), Some(1));

        let verdict = resolve(&[0.5, 0.5, 0.0]).unwrap();
        assert_eq!(verdict.class, TissueClass::Adenocarcinoma);
    }

    #[test]
    fn test_argmax_empty() {
        assert_eq!(argmax(&[]), None);
    }

    #[test]
    fn test_band_boundaries() {
        assert_eq!(ConfidenceBand::from_confidence(95.0), ConfidenceBand::Uncertain);
        assert_eq!(ConfidenceBand::from_confidence(97.0), ConfidenceBand::Uncertain);
        assert_eq!(ConfidenceBand::from_confidence(94.999), ConfidenceBand::Invalid);
        assert_eq!(ConfidenceBand::from_confidence(97.0001), ConfidenceBand::Confident);
        assert_eq!(ConfidenceBand::from_confidence(f32::NAN), ConfidenceBand::Invalid);
    }

    #[test]
    fn test_percent_ties_round_up() {
        let verdict = resolve(&[0.96125, 0.02, 0.01875]).unwrap();
        assert_eq!(verdict.band, ConfidenceBand::Uncertain);
        assert!(verdict.headline.contains("(Confidence: 96.13%)"));

        let verdict = resolve(&[0.98125, 0.01, 0.00875]).unwrap();
        assert_eq!(verdict.band, ConfidenceBand::Confident);
        assert_eq!(
            verdict.headline,
            "Prediction: Lung_adenocarcinoma (Confidence: 98.13%)"
        );

        assert_eq!(format_percent(99.125), "99.13");
        assert_eq!(format_percent(97.625), "97.63");
        assert_eq!(format_percent(96.1), "96.10");
    }

    #[test]
    fn test_band_edges_through_resolve() {
        let verdict = resolve(&[0.95, 0.05, 0.0]).unwrap();
        assert_eq!(verdict.band, ConfidenceBand::Uncertain);
        assert!(verdict.headline.contains("95.00%"));

        let verdict = resolve(&[0.03, 0.97, 0.0]).unwrap();
        assert_eq!(verdict.band, ConfidenceBand::Uncertain);
        assert_eq!(verdict.class, TissueClass::BenignTissue);

        let verdict = resolve(&[0.97, 0.03, 0.0]).unwrap();
        assert_eq!(verdict.band, ConfidenceBand::Uncertain);
        assert!(verdict.headline.contains("97.00%"));
    }

    #[test]
    fn test_confidence_not_clamped() {
        let verdict = resolve(&[1.5, 0.0, 0.0]).unwrap();

        assert_eq!(verdict.band, ConfidenceBand::Confident);
        assert!((verdict.confidence - 150.0).abs() < 1e-4);
        assert!(verdict.headline.contains("150.00%"));
    }

    #[test]
    fn test_wrong_length() {
        for scores in [&[][..], &[1.0, 0.0][..], &[0.25, 0.25, 0.25, 0.25][..]] {
            let err = resolve(scores).unwrap_err();
            assert!(matches!(
                err,
                Error::InvalidInput { expected: 3, actual } if actual == scores.len()
            ));
        }
    }

    #[test]
    fn test_unknown_label_description() {
        assert_eq!(describe_label("lung_n", ConfidenceBand::Confident), UNKNOWN_RESULT);
        assert_eq!(
            describe_label("lung_n", ConfidenceBand::Uncertain),
            "Unknown result. Please consult a specialist for confirmation."
        );
        assert_eq!(
            describe_label("lung_n", ConfidenceBand::Invalid),
            INVALID_DESCRIPTION
        );
    }
}
