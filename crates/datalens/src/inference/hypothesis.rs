//! Classical hypothesis tests over numeric samples: t-tests and one-way ANOVA.
//!
//! p-values are two-sided for the t-tests. Confidence intervals bound the
//! mean difference at the `1 - alpha` level.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, FisherSnedecor, StudentsT};

use crate::error::{DatalensError, Result};

use super::stats;

/// |effect| below this reads as small.
const SMALL_EFFECT: f64 = 0.2;
/// |effect| below this reads as medium; anything larger is large.
const MEDIUM_EFFECT: f64 = 0.8;

/// Outcome of a hypothesis test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HypothesisTestResult {
    pub test_name: String,
    /// t for the t-tests, F for ANOVA.
    pub statistic: f64,
    /// Degrees of freedom; the between-groups value for ANOVA.
    pub degrees_of_freedom: f64,
    /// Within-groups degrees of freedom, ANOVA only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub denominator_degrees_of_freedom: Option<f64>,
    pub p_value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence_interval_lower: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence_interval_upper: Option<f64>,
    /// Cohen's d for the t-tests, eta squared for ANOVA.
    pub effect_size: f64,
    pub interpretation: String,
    pub sample_size: usize,
    /// Descriptive statistics, keyed like `group_<name>_mean`.
    pub group_statistics: IndexMap<String, f64>,
}

impl HypothesisTestResult {
    /// Whether the null hypothesis is rejected at `alpha`.
    pub fn is_significant(&self, alpha: f64) -> bool {
        self.p_value < alpha
    }
}

/// Compare a sample mean against `test_value`.
pub fn one_sample_ttest(values: &[f64], test_value: f64, alpha: f64) -> Result<HypothesisTestResult> {
    validate_alpha(alpha)?;
    let sample = Sample::new("sample", values)?.with_spread("sample")?;
    let n = values.len() as f64;
    let dof = n - 1.0;

    let mean_diff = sample.mean - test_value;
    let se = sample.std / n.sqrt();
    let t = mean_diff / se;
    let (p_value, margin) = t_test_tail(t, dof, se, alpha)?;
    let effect_size = mean_diff / sample.std;

    let mut group_statistics = IndexMap::new();
    group_statistics.insert("sample_mean".to_string(), sample.mean);
    group_statistics.insert("sample_std".to_string(), sample.std);
    group_statistics.insert("test_value".to_string(), test_value);

    Ok(HypothesisTestResult {
        test_name: "One-Sample t-Test".to_string(),
        statistic: t,
        degrees_of_freedom: dof,
        denominator_degrees_of_freedom: None,
        p_value,
        confidence_interval_lower: Some(mean_diff - margin),
        confidence_interval_upper: Some(mean_diff + margin),
        effect_size,
        interpretation: interpret(p_value, alpha, "one-sample t-test", "d", effect_size),
        sample_size: values.len(),
        group_statistics,
    })
}

/// Student's t-test for two independent groups, assuming equal variances.
pub fn independent_ttest(
    first: (&str, &[f64]),
    second: (&str, &[f64]),
    alpha: f64,
) -> Result<HypothesisTestResult> {
    validate_alpha(alpha)?;
    let a = Sample::new(&format!("group '{}'", first.0), first.1)?;
    let b = Sample::new(&format!("group '{}'", second.0), second.1)?;
    let (n1, n2) = (first.1.len() as f64, second.1.len() as f64);
    let dof = n1 + n2 - 2.0;

    let pooled_var = ((n1 - 1.0) * a.std.powi(2) + (n2 - 1.0) * b.std.powi(2)) / dof;
    if pooled_var <= 0.0 {
        return Err(zero_variance("both groups"));
    }
    let mean_diff = a.mean - b.mean;
    let se = (pooled_var * (1.0 / n1 + 1.0 / n2)).sqrt();
    let t = mean_diff / se;
    let (p_value, margin) = t_test_tail(t, dof, se, alpha)?;
    let effect_size = mean_diff / pooled_var.sqrt();

    let mut group_statistics = IndexMap::new();
    for (name, sample, n) in [(first.0, &a, n1), (second.0, &b, n2)] {
        group_statistics.insert(format!("group_{}_mean", name), sample.mean);
        group_statistics.insert(format!("group_{}_std", name), sample.std);
        group_statistics.insert(format!("group_{}_n", name), n);
    }

    Ok(HypothesisTestResult {
        test_name: "Independent Samples t-Test".to_string(),
        statistic: t,
        degrees_of_freedom: dof,
        denominator_degrees_of_freedom: None,
        p_value,
        confidence_interval_lower: Some(mean_diff - margin),
        confidence_interval_upper: Some(mean_diff + margin),
        effect_size,
        interpretation: interpret(p_value, alpha, "independent samples t-test", "d", effect_size),
        sample_size: first.1.len() + second.1.len(),
        group_statistics,
    })
}

/// t-test on the differences of paired observations `(first, second)`.
pub fn paired_ttest(
    names: (&str, &str),
    pairs: &[(f64, f64)],
    alpha: f64,
) -> Result<HypothesisTestResult> {
    validate_alpha(alpha)?;
    if pairs.len() < 2 {
        return Err(DatalensError::Config(format!(
            "paired t-test needs at least 2 complete pairs, got {}",
            pairs.len()
        )));
    }

    let first: Vec<f64> = pairs.iter().map(|(a, _)| *a).collect();
    let second: Vec<f64> = pairs.iter().map(|(_, b)| *b).collect();
    let differences: Vec<f64> = pairs.iter().map(|(a, b)| a - b).collect();
    let a = Sample::describe(&first);
    let b = Sample::describe(&second);
    let diff = Sample::new("difference", &differences)?.with_spread("difference")?;

    let n = pairs.len() as f64;
    let dof = n - 1.0;
    let se = diff.std / n.sqrt();
    let t = diff.mean / se;
    let (p_value, margin) = t_test_tail(t, dof, se, alpha)?;
    let effect_size = diff.mean / diff.std;

    let mut group_statistics = IndexMap::new();
    group_statistics.insert(format!("{}_mean", names.0), a.mean);
    group_statistics.insert(format!("{}_std", names.0), a.std);
    group_statistics.insert(format!("{}_mean", names.1), b.mean);
    group_statistics.insert(format!("{}_std", names.1), b.std);
    group_statistics.insert("difference_mean".to_string(), diff.mean);
    group_statistics.insert("difference_std".to_string(), diff.std);

    Ok(HypothesisTestResult {
        test_name: "Paired Samples t-Test".to_string(),
        statistic: t,
        degrees_of_freedom: dof,
        denominator_degrees_of_freedom: None,
        p_value,
        confidence_interval_lower: Some(diff.mean - margin),
        confidence_interval_upper: Some(diff.mean + margin),
        effect_size,
        interpretation: interpret(p_value, alpha, "paired samples t-test", "d", effect_size),
        sample_size: pairs.len(),
        group_statistics,
    })
}

/// One-way ANOVA across two or more named groups, with eta squared as effect size.
pub fn one_way_anova(groups: &[(String, Vec<f64>)], alpha: f64) -> Result<HypothesisTestResult> {
    validate_alpha(alpha)?;
    if groups.len() < 2 {
        return Err(DatalensError::Config(format!(
            "ANOVA needs at least 2 groups, found {}",
            groups.len()
        )));
    }

    let mut group_statistics = IndexMap::new();
    let mut samples = Vec::with_capacity(groups.len());
    for (name, values) in groups {
        let sample = Sample::new(&format!("group '{}'", name), values)?;
        group_statistics.insert(format!("group_{}_mean", name), sample.mean);
        group_statistics.insert(format!("group_{}_std", name), sample.std);
        group_statistics.insert(format!("group_{}_n", name), values.len() as f64);
        samples.push((values.as_slice(), sample.mean));
    }

    let all: Vec<f64> = groups.iter().flat_map(|(_, v)| v.iter().copied()).collect();
    let total = all.len();
    let grand_mean = stats::mean(&all).unwrap_or(0.0);

    let ss_between: f64 = samples
        .iter()
        .map(|(values, m)| values.len() as f64 * (m - grand_mean).powi(2))
        .sum();
    let ss_within: f64 = samples
        .iter()
        .map(|(values, m)| values.iter().map(|v| (v - m).powi(2)).sum::<f64>())
        .sum();
    if ss_within <= 0.0 {
        return Err(zero_variance("every group"));
    }

    let df_between = (groups.len() - 1) as f64;
    let df_within = (total - groups.len()) as f64;
    let f = (ss_between / df_between) / (ss_within / df_within);
    let p_value = FisherSnedecor::new(df_between, df_within)
        .map_err(|e| DatalensError::Config(format!("invalid F distribution: {}", e)))?
        .sf(f);
    let eta_squared = ss_between / (ss_between + ss_within);

    Ok(HypothesisTestResult {
        test_name: "One-Way ANOVA".to_string(),
        statistic: f,
        degrees_of_freedom: df_between,
        denominator_degrees_of_freedom: Some(df_within),
        p_value,
        confidence_interval_lower: None,
        confidence_interval_upper: None,
        effect_size: eta_squared,
        interpretation: interpret(p_value, alpha, "one-way ANOVA", "η²", eta_squared),
        sample_size: total,
        group_statistics,
    })
}

/// Mean and sample standard deviation of one group.
struct Sample {
    mean: f64,
    std: f64,
}

impl Sample {
    /// Describe a group of at least two values.
    fn new(name: &str, values: &[f64]) -> Result<Self> {
        if values.len() < 2 {
            return Err(DatalensError::Config(format!(
                "{} needs at least 2 values, got {}",
                name,
                values.len()
            )));
        }
        Ok(Self::describe(values))
    }

    /// Reject a sample whose spread would divide the t statistic by zero.
    fn with_spread(self, name: &str) -> Result<Self> {
        if self.std > 0.0 {
            Ok(self)
        } else {
            Err(zero_variance(name))
        }
    }

    fn describe(values: &[f64]) -> Self {
        let mean = stats::mean(values).unwrap_or(0.0);
        let std = stats::sample_std(values, mean).unwrap_or(0.0);
        Self { mean, std }
    }
}

fn validate_alpha(alpha: f64) -> Result<()> {
    if alpha > 0.0 && alpha < 1.0 {
        Ok(())
    } else {
        Err(DatalensError::Config(format!(
            "significance level must be in (0, 1), got {}",
            alpha
        )))
    }
}

fn zero_variance(what: &str) -> DatalensError {
    DatalensError::Config(format!("{} has zero variance", what))
}

/// Two-sided p-value for `t` and the confidence margin `t_crit * se`.
fn t_test_tail(t: f64, dof: f64, se: f64, alpha: f64) -> Result<(f64, f64)> {
    let dist = StudentsT::new(0.0, 1.0, dof)
        .map_err(|e| DatalensError::Config(format!("invalid t distribution: {}", e)))?;
    let p_value = (2.0 * dist.sf(t.abs())).min(1.0);
    let t_crit = dist.inverse_cdf(1.0 - alpha / 2.0);
    Ok((p_value, t_crit * se))
}

/// Plain-language reading of a test outcome.
fn interpret(p_value: f64, alpha: f64, test: &str, effect_label: &str, effect: f64) -> String {
    let significant = p_value < alpha;
    let mut text = format!(
        "The {} {} statistically significant at the α = {} level (p = {:.4}).",
        test,
        if significant { "is" } else { "is not" },
        alpha,
        p_value
    );

    if significant {
        let magnitude = match effect.abs() {
            e if e < SMALL_EFFECT => "small",
            e if e < MEDIUM_EFFECT => "medium",
            _ => "large",
        };
        text.push_str(&format!(
            " We reject the null hypothesis. The effect size is {} ({} = {:.3}).",
            magnitude, effect_label, effect
        ));
    } else {
        text.push_str(" We fail to reject the null hypothesis.");
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-5,
            "expected {}, got {}",
            expected,
            actual
        );
    }

    #[test]
    fn test_one_sample() {
        let values = [5.1, 4.9, 5.6, 5.8, 6.0, 5.5, 5.3];
        let result = one_sample_ttest(&values, 5.0, 0.05).unwrap();

        close(result.statistic, 3.127849);
        assert_eq!(result.degrees_of_freedom, 6.0);
        close(result.p_value, 0.0203803);
        close(result.effect_size, 1.182216);
        close(result.confidence_interval_lower.unwrap(), 0.099521);
        close(result.confidence_interval_upper.unwrap(), 0.814765);
        assert_eq!(result.sample_size, 7);
        assert_eq!(result.group_statistics["test_value"], 5.0);
        assert_eq!(
            result.interpretation,
            "The one-sample t-test is statistically significant at the α = 0.05 level \
             (p = 0.0204). We reject the null hypothesis. The effect size is large (d = 1.182)."
        );
    }

    #[test]
    fn test_one_sample_not_significant() {
        let values = [5.1, 4.9, 5.6, 5.8, 6.0, 5.5, 5.3];
        let result = one_sample_ttest(&values, 5.0, 0.01).unwrap();
        assert!(!result.is_significant(0.01));
        assert!(result.interpretation.contains("is not statistically significant"));
        assert!(result.interpretation.ends_with("We fail to reject the null hypothesis."));

        // A smaller alpha widens the interval
        let wide = result.confidence_interval_upper.unwrap() - result.confidence_interval_lower.unwrap();
        assert!(wide > 0.814765 - 0.099521);
    }

    #[test]
    fn test_independent() {
        let a: &[f64] = &[1.0, 2.0, 3.0, 4.0, 5.0];
        let b: &[f64] = &[6.0, 7.0, 8.0, 9.0, 10.0];
        let result = independent_ttest(("a", a), ("b", b), 0.05).unwrap();

        close(result.statistic, -5.0);
        assert_eq!(result.degrees_of_freedom, 8.0);
        close(result.p_value, 0.00105283);
        close(result.effect_size, -3.162278);
        close(result.confidence_interval_lower.unwrap(), -7.306004);
        close(result.confidence_interval_upper.unwrap(), -2.693996);
        assert_eq!(result.sample_size, 10);
        assert_eq!(result.group_statistics["group_a_mean"], 3.0);
        assert_eq!(result.group_statistics["group_b_n"], 5.0);
    }

    #[test]
    fn test_paired() {
        let pairs = [(10.0, 12.0), (12.0, 13.0), (9.0, 10.0), (14.0, 16.0), (11.0, 11.0)];
        let result = paired_ttest(("before", "after"), &pairs, 0.05).unwrap();

        close(result.statistic, -3.207135);
        assert_eq!(result.degrees_of_freedom, 4.0);
        close(result.p_value, 0.0326779);
        close(result.effect_size, -1.434274);
        close(result.group_statistics["difference_mean"], -1.2);
        assert_eq!(result.group_statistics["before_mean"], 11.2);
        assert!(result.confidence_interval_upper.unwrap() < 0.0);
    }

    #[test]
    fn test_anova() {
        let groups = vec![
            ("low".to_string(), vec![1.0, 2.0, 3.0]),
            ("mid".to_string(), vec![4.0, 5.0, 6.0]),
            ("high".to_string(), vec![7.0, 8.0, 9.0]),
        ];
        let result = one_way_anova(&groups, 0.05).unwrap();

        close(result.statistic, 27.0);
        assert_eq!(result.degrees_of_freedom, 2.0);
        assert_eq!(result.denominator_degrees_of_freedom, Some(6.0));
        close(result.p_value, 0.001);
        close(result.effect_size, 0.9);
        assert!(result.confidence_interval_lower.is_none());
        assert!(result.interpretation.ends_with("The effect size is large (η² = 0.900)."));
        assert_eq!(result.group_statistics.len(), 9);
    }

    #[test]
    fn test_rejects_degenerate_input() {
        assert!(matches!(
            one_sample_ttest(&[4.0], 1.0, 0.05),
            Err(DatalensError::Config(_))
        ));
        assert!(matches!(
            one_sample_ttest(&[4.0, 4.0, 4.0], 1.0, 0.05),
            Err(DatalensError::Config(_))
        ));
        assert!(matches!(
            one_sample_ttest(&[1.0, 2.0], 1.0, 1.5),
            Err(DatalensError::Config(_))
        ));
        assert!(matches!(
            paired_ttest(("x", "y"), &[(1.0, 2.0)], 0.05),
            Err(DatalensError::Config(_))
        ));
        let single = vec![("only".to_string(), vec![1.0, 2.0])];
        assert!(matches!(one_way_anova(&single, 0.05), Err(DatalensError::Config(_))));
        let short = vec![
            ("a".to_string(), vec![1.0, 2.0]),
            ("b".to_string(), vec![3.0]),
        ];
        assert!(matches!(one_way_anova(&short, 0.05), Err(DatalensError::Config(_))));
        let flat = vec![
            ("a".to_string(), vec![2.0, 2.0]),
            ("b".to_string(), vec![3.0, 3.0]),
        ];
        assert!(matches!(one_way_anova(&flat, 0.05), Err(DatalensError::Config(_))));
    }

    #[test]
    fn test_independent_allows_one_constant_group() {
        let flat: &[f64] = &[5.0, 5.0, 5.0];
        let spread: &[f64] = &[1.0, 2.0, 3.0];
        let result = independent_ttest(("a", flat), ("b", spread), 0.05).unwrap();
        assert!(result.statistic > 0.0);

        let other_flat: &[f64] = &[1.0, 1.0, 1.0];
        assert!(matches!(
            independent_ttest(("a", flat), ("b", other_flat), 0.05),
            Err(DatalensError::Config(_))
        ));
    }
}
