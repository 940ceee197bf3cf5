use crate::Verdict;

/// Scores at or above this are classified as misinformation.
pub const DEFAULT_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClassifyError {
    #[error("classification threshold {threshold} is not within (0, 1]")]
    InvalidThreshold { threshold: f64 },
    #[error("prediction score {score} is outside the [0, 1] range")]
    ScoreOutOfRange { score: f64 },
}

/// Binary classification of a prediction score against the threshold.
pub fn classify(score: f64, threshold: f64) -> Result<Verdict, ClassifyError> {
    validate_threshold(threshold)?;
    validate_score(score)?;
    if score >= threshold {
        Ok(Verdict::Misinformation)
    } else {
        Ok(Verdict::Neutral)
    }
}

/// Confidence percentage of a classification: the score's distance from the
/// threshold, scaled by the threshold. Scores near the threshold mean the
/// model was uncertain either way.
pub fn confidence(score: f64, threshold: f64) -> Result<u32, ClassifyError> {
    validate_threshold(threshold)?;
    validate_score(score)?;
    let distance = if score >= threshold {
        score - threshold
    } else {
        threshold - score
    };
    Ok((distance / threshold * 100.0).round() as u32)
}

fn validate_threshold(threshold: f64) -> Result<(), ClassifyError> {
    if !threshold.is_finite() || threshold <= 0.0 || threshold > 1.0 {
        return Err(ClassifyError::InvalidThreshold { threshold });
    }
    Ok(())
}

fn validate_score(score: f64) -> Result<(), ClassifyError> {
    if !(0.0..=1.0).contains(&score) {
        return Err(ClassifyError::ScoreOutOfRange { score });
    }
    Ok(())
}
