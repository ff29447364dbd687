//! Evidence Normalizer
//!
//! Turns a raw, partial indicator mapping into a complete
//! EvidenceRecord. Pure and total: missing indicators default to
//! absent, unknown keys are silently dropped, no error path exists.

use std::collections::HashMap;

use super::types::{EvidenceRecord, Indicator};

/// Normalize a raw submission.
///
/// Values are the 0/1 markings from the assessment form; any nonzero
/// value marks the indicator present.
pub fn normalize(raw: &HashMap<String, f64>) -> EvidenceRecord {
    let mut record = EvidenceRecord::default();
    for (key, value) in raw {
        if let Some(indicator) = Indicator::from_key(key) {
            record.set(indicator, *value != 0.0);
        }
    }
    record
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(pairs: &[(&str, f64)]) -> HashMap<String, f64> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_empty_input_yields_all_absent() {
        let record = normalize(&HashMap::new());
        assert_eq!(record, EvidenceRecord::default());
        assert_eq!(record.true_count(), 0);
    }

    #[test]
    fn test_known_indicators_are_set() {
        let record = normalize(&raw(&[
            ("style_mismatch", 1.0),
            ("inconsistent_data", 1.0),
            ("no_drafts", 0.0),
        ]));
        assert!(record.style_mismatch);
        assert!(record.inconsistent_data);
        assert!(!record.no_drafts);
        assert_eq!(record.true_count(), 2);
    }

    #[test]
    fn test_unknown_keys_are_dropped() {
        let record = normalize(&raw(&[
            ("ghost_written", 1.0),
            ("weak_defense", 1.0),
            ("", 1.0),
        ]));
        assert!(record.weak_defense);
        assert_eq!(record.true_count(), 1);
    }

    #[test]
    fn test_every_closed_set_key_round_trips() {
        for indicator in Indicator::ALL {
            let record = normalize(&raw(&[(indicator.key(), 1.0)]));
            assert!(record.is_set(indicator), "{} not set", indicator.key());
            assert_eq!(record.true_count(), 1);
        }
    }
}
