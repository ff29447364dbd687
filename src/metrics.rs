//! Institutional Metrics
//!
//! Aggregate views over persisted analyses for committee reporting:
//! risk-rate distributions, per-role and per-type breakdowns, temporal
//! evolution and period comparison. Everything here is a pure
//! computation over records the registry queries return - no storage
//! access, no side effects.

use std::collections::BTreeMap;

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::engine::types::RiskLevel;
use crate::store::AnalysisRecord;

// ============================================================================
// RISK RATES
// ============================================================================

/// Share of analyses per risk level, as percentages
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RiskRates {
    pub low: f64,
    pub medium: f64,
    pub high: f64,
}

/// Percentage distribution by level. Empty input yields all zeros.
pub fn risk_rates(records: &[AnalysisRecord]) -> RiskRates {
    if records.is_empty() {
        return RiskRates::default();
    }
    let total = records.len() as f64;
    let count = |level: RiskLevel| {
        records.iter().filter(|r| r.level == level).count() as f64 / total * 100.0
    };
    RiskRates {
        low: count(RiskLevel::Low),
        medium: count(RiskLevel::Medium),
        high: count(RiskLevel::High),
    }
}

// ============================================================================
// GROUP BREAKDOWNS
// ============================================================================

/// Metrics for one role or document-type group
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupBreakdown {
    pub key: String,
    pub total: u64,
    pub high_risk: u64,
    /// Percentage of the group's analyses that scored High
    pub high_risk_rate: f64,
    pub mean_score: f64,
}

fn breakdown_by<F>(records: &[AnalysisRecord], key_of: F) -> Vec<GroupBreakdown>
where
    F: Fn(&AnalysisRecord) -> &str,
{
    let mut groups: BTreeMap<&str, Vec<&AnalysisRecord>> = BTreeMap::new();
    for record in records {
        groups.entry(key_of(record)).or_default().push(record);
    }

    groups
        .into_iter()
        .map(|(key, members)| {
            let total = members.len() as u64;
            let high_risk = members
                .iter()
                .filter(|r| r.level == RiskLevel::High)
                .count() as u64;
            let mean_score = members
                .iter()
                .map(|r| r.overall_score as f64)
                .sum::<f64>()
                / members.len() as f64;
            GroupBreakdown {
                key: key.to_string(),
                total,
                high_risk,
                high_risk_rate: high_risk as f64 / total as f64 * 100.0,
                mean_score,
            }
        })
        .collect()
}

/// Breakdown by submitting role, keys sorted
pub fn breakdown_by_role(records: &[AnalysisRecord]) -> Vec<GroupBreakdown> {
    breakdown_by(records, |r| r.role.as_str())
}

/// Breakdown by document type, keys sorted
pub fn breakdown_by_document_type(records: &[AnalysisRecord]) -> Vec<GroupBreakdown> {
    breakdown_by(records, |r| r.document_type.as_str())
}

// ============================================================================
// TEMPORAL EVOLUTION
// ============================================================================

/// Bucketing granularity for evolution views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    Daily,
    Weekly,
    Monthly,
}

/// Metrics for one time bucket
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodMetrics {
    /// Bucket label, e.g. "2026-08-06", "2026-W32" or "2026-08"
    pub period: String,
    pub total: u64,
    pub mean_score: f64,
    pub high_risk: u64,
    pub high_risk_rate: f64,
}

fn bucket_key(record: &AnalysisRecord, bucket: Bucket) -> String {
    let ts = record.created_at;
    match bucket {
        Bucket::Daily => ts.date_naive().to_string(),
        Bucket::Weekly => {
            let week = ts.iso_week();
            format!("{}-W{:02}", week.year(), week.week())
        }
        Bucket::Monthly => format!("{:04}-{:02}", ts.year(), ts.month()),
    }
}

/// Group analyses into time buckets, oldest first
pub fn temporal_evolution(records: &[AnalysisRecord], bucket: Bucket) -> Vec<PeriodMetrics> {
    let mut periods: BTreeMap<String, Vec<&AnalysisRecord>> = BTreeMap::new();
    for record in records {
        periods
            .entry(bucket_key(record, bucket))
            .or_default()
            .push(record);
    }

    periods
        .into_iter()
        .map(|(period, members)| {
            let total = members.len() as u64;
            let high_risk = members
                .iter()
                .filter(|r| r.level == RiskLevel::High)
                .count() as u64;
            PeriodMetrics {
                period,
                total,
                mean_score: members
                    .iter()
                    .map(|r| r.overall_score as f64)
                    .sum::<f64>()
                    / members.len() as f64,
                high_risk,
                high_risk_rate: high_risk as f64 / total as f64 * 100.0,
            }
        })
        .collect()
}

// ============================================================================
// OUTLIERS
// ============================================================================

/// Analyses scoring more than two standard deviations above the mean.
/// Needs at least two records to be meaningful; fewer yields none.
pub fn score_outliers(records: &[AnalysisRecord]) -> Vec<&AnalysisRecord> {
    if records.len() < 2 {
        return Vec::new();
    }
    let scores: Vec<f64> = records.iter().map(|r| r.overall_score as f64).collect();
    let mean = scores.iter().sum::<f64>() / scores.len() as f64;
    let variance = scores.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / scores.len() as f64;
    let threshold = mean + 2.0 * variance.sqrt();

    records
        .iter()
        .filter(|r| (r.overall_score as f64) > threshold)
        .collect()
}

// ============================================================================
// PERIOD COMPARISON
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendDirection {
    Improving,
    Worsening,
    Stable,
}

/// Mean-score movement between two periods
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodComparison {
    pub first_mean: f64,
    pub second_mean: f64,
    pub change: f64,
    pub change_pct: f64,
    pub trend: TrendDirection,
}

/// Compare mean risk between two sets of analyses, e.g. before and
/// after an intervention.
pub fn compare_periods(
    first: &[AnalysisRecord],
    second: &[AnalysisRecord],
) -> PeriodComparison {
    let mean = |records: &[AnalysisRecord]| {
        if records.is_empty() {
            0.0
        } else {
            records.iter().map(|r| r.overall_score as f64).sum::<f64>() / records.len() as f64
        }
    };

    let first_mean = mean(first);
    let second_mean = mean(second);
    let change = second_mean - first_mean;
    let change_pct = if first_mean != 0.0 {
        change / first_mean * 100.0
    } else {
        0.0
    };
    let trend = if change > 0.0 {
        TrendDirection::Worsening
    } else if change < 0.0 {
        TrendDirection::Improving
    } else {
        TrendDirection::Stable
    };

    PeriodComparison {
        first_mean,
        second_mean,
        change,
        change_pct,
        trend,
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn record(level: RiskLevel, score: u8, role: &str, doc: &str, days_ago: i64) -> AnalysisRecord {
        AnalysisRecord {
            id: 0,
            fingerprint: format!("fp-{}-{}", score, days_ago),
            actor: "reviewer_a".to_string(),
            role: role.to_string(),
            document_type: doc.to_string(),
            overall_score: score,
            level,
            confidence: 0.8,
            dimension_scores: Vec::new(),
            critical_dimensions: Vec::new(),
            recommendations: Vec::new(),
            model_version: "2.2".to_string(),
            duration_ms: 1,
            created_at: Utc::now() - Duration::days(days_ago),
        }
    }

    #[test]
    fn test_risk_rates_empty_and_mixed() {
        assert_eq!(risk_rates(&[]).high, 0.0);

        let records = vec![
            record(RiskLevel::High, 85, "Student", "Thesis", 0),
            record(RiskLevel::Medium, 50, "Student", "Essay", 0),
            record(RiskLevel::Low, 20, "Faculty Researcher", "Journal Article", 0),
            record(RiskLevel::Low, 10, "Student", "Essay", 0),
        ];
        let rates = risk_rates(&records);
        assert_eq!(rates.high, 25.0);
        assert_eq!(rates.medium, 25.0);
        assert_eq!(rates.low, 50.0);
    }

    #[test]
    fn test_breakdown_by_role() {
        let records = vec![
            record(RiskLevel::High, 80, "Student", "Thesis", 0),
            record(RiskLevel::Low, 20, "Student", "Essay", 0),
            record(RiskLevel::Low, 10, "Faculty Researcher", "Journal Article", 0),
        ];
        let breakdown = breakdown_by_role(&records);
        assert_eq!(breakdown.len(), 2);

        let students = breakdown.iter().find(|g| g.key == "Student").unwrap();
        assert_eq!(students.total, 2);
        assert_eq!(students.high_risk, 1);
        assert_eq!(students.high_risk_rate, 50.0);
        assert_eq!(students.mean_score, 50.0);
    }

    #[test]
    fn test_temporal_evolution_orders_oldest_first() {
        let records = vec![
            record(RiskLevel::Low, 10, "Student", "Essay", 0),
            record(RiskLevel::High, 90, "Student", "Thesis", 40),
            record(RiskLevel::Low, 30, "Student", "Essay", 40),
        ];
        let evolution = temporal_evolution(&records, Bucket::Monthly);
        assert_eq!(evolution.len(), 2);
        assert!(evolution[0].period < evolution[1].period);
        assert_eq!(evolution[0].total, 2);
        assert_eq!(evolution[0].mean_score, 60.0);
        assert_eq!(evolution[1].total, 1);
    }

    #[test]
    fn test_outliers_need_real_spread() {
        // Tight cluster, no outlier even with one higher value
        let tight: Vec<_> = (0..6)
            .map(|i| record(RiskLevel::Low, 20 + i, "Student", "Essay", 0))
            .collect();
        assert!(score_outliers(&tight).is_empty());

        // One score far above an otherwise flat set
        let mut skewed: Vec<_> = (0..8)
            .map(|_| record(RiskLevel::Low, 10, "Student", "Essay", 0))
            .collect();
        skewed.push(record(RiskLevel::High, 95, "Student", "Thesis", 0));
        let outliers = score_outliers(&skewed);
        assert_eq!(outliers.len(), 1);
        assert_eq!(outliers[0].overall_score, 95);
    }

    #[test]
    fn test_compare_periods_trend() {
        let before = vec![
            record(RiskLevel::High, 80, "Student", "Thesis", 60),
            record(RiskLevel::Medium, 60, "Student", "Essay", 60),
        ];
        let after = vec![
            record(RiskLevel::Low, 20, "Student", "Essay", 1),
            record(RiskLevel::Low, 30, "Student", "Essay", 1),
        ];

        let comparison = compare_periods(&before, &after);
        assert_eq!(comparison.first_mean, 70.0);
        assert_eq!(comparison.second_mean, 25.0);
        assert_eq!(comparison.trend, TrendDirection::Improving);

        let flat = compare_periods(&after, &after);
        assert_eq!(flat.trend, TrendDirection::Stable);
        assert_eq!(flat.change_pct, 0.0);
    }
}
