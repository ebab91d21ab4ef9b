//! Population statistics over amounts and degrees

use crate::error::{PatternError, PatternResult};

pub(crate) fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population variance (divides by `n`)
pub(crate) fn variance(values: &[f64]) -> Option<f64> {
    let mean = mean(values)?;
    let squares: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    Some(squares / values.len() as f64)
}

pub(crate) fn std_dev(values: &[f64]) -> Option<f64> {
    variance(values).map(f64::sqrt)
}

/// Reject statistics that overflowed
pub(crate) fn finite(analyzer: &'static str, what: &str, value: f64) -> PatternResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(PatternError::analyzer(analyzer, format!("{what} is not finite")))
    }
}

/// `part / whole` as a rounded percentage capped at 100; 0 when `whole` is 0
pub(crate) fn percentage(part: usize, whole: usize) -> u8 {
    if whole == 0 {
        return 0;
    }
    capped((part as f64 / whole as f64) * 100.0)
}

/// Round and cap a score at 100
pub(crate) fn capped(value: f64) -> u8 {
    if !value.is_finite() {
        return 0;
    }
    value.min(100.0).max(0.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_population_statistics() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_eq!(mean(&values), Some(5.0));
        assert_eq!(variance(&values), Some(4.0));
        assert_eq!(std_dev(&values), Some(2.0));
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn test_percentage() {
        assert_eq!(percentage(1, 11), 9);
        assert_eq!(percentage(1, 200), 1);
        assert_eq!(percentage(3, 2), 100);
        assert_eq!(percentage(0, 0), 0);
    }

    #[test]
    fn test_finite_rejects_overflow() {
        assert!(finite("anomaly", "mean", f64::INFINITY).is_err());
        assert_eq!(finite("anomaly", "mean", 1.5).unwrap(), 1.5);
    }
}
