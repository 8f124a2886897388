// Small numeric helpers shared by the description and identification
// engines. Two std flavors exist on purpose: the minimal-std column
// selection and the within-cluster stability test use the sample std
// (n-1 denominator), while std_zscore_threshold_filter uses the
// population std (n denominator). Callers pick explicitly.

/// Arithmetic mean. Returns 0.0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n-1 denominator).
/// Returns 0.0 when fewer than two values are present.
pub fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let mu = mean(values);
    let ss: f64 = values.iter().map(|v| (v - mu) * (v - mu)).sum();
    (ss / (values.len() - 1) as f64).sqrt()
}

/// Population standard deviation (n denominator).
/// Returns 0.0 for an empty slice.
pub fn population_std(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mu = mean(values);
    let ss: f64 = values.iter().map(|v| (v - mu) * (v - mu)).sum();
    (ss / values.len() as f64).sqrt()
}

/// Round to two decimal places (density values are reported at this
/// precision).
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_empty() {
        assert_eq!(mean(&[]), 0.0);
    }

    #[test]
    fn test_sample_vs_population_std() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        // Population std of this classic example is exactly 2.0
        assert!((population_std(&values) - 2.0).abs() < 1e-12);
        // Sample std uses n-1 and is strictly larger
        assert!(sample_std(&values) > population_std(&values));
    }

    #[test]
    fn test_std_single_value() {
        assert_eq!(sample_std(&[3.0]), 0.0);
        assert_eq!(population_std(&[3.0]), 0.0);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(0.6666666), 0.67);
        assert_eq!(round2(1.0), 1.0);
        assert_eq!(round2(0.005), 0.01);
    }
}
