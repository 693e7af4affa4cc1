use crate::types::{FrequencyEntry, Value};
use std::collections::HashMap;

/// Plain string form of a value, used as the report key. Strings keep their
/// content unquoted; everything else renders the way it prints.
fn value_key(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Occurrences per distinct value. Identity is value equality: `Int(2021)`
/// and `String("2021")` are different values and count separately.
pub fn value_counts(values: &[Value]) -> HashMap<Value, u64> {
    let mut counts = HashMap::new();
    for value in values {
        *counts.entry(value.clone()).or_insert(0) += 1;
    }
    counts
}

/// Counts occurrences per distinct value and attaches each count's share of
/// the population, rounded to one decimal place, e.g. 2 of 3 -> "66.7%".
pub fn frequency_report(values: &[Value]) -> HashMap<String, FrequencyEntry> {
    let total = values.len();
    // Distinct values can share a rendered key (2021 vs "2021"); those
    // counts merge under the shared key when the report is built.
    let mut rendered: HashMap<String, u64> = HashMap::new();
    for (value, count) in value_counts(values) {
        *rendered.entry(value_key(&value)).or_insert(0) += count;
    }

    rendered
        .into_iter()
        .map(|(key, frequency)| {
            let percentage = (frequency as f64 / total as f64 * 1000.0).round() / 10.0;
            (
                key,
                FrequencyEntry {
                    frequency,
                    percentage: format!("{:.1}%", percentage),
                },
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_and_percentages_to_one_decimal() {
        let values = vec![Value::from(2021), Value::from(2021), Value::from(2022)];
        let report = frequency_report(&values);
        assert_eq!(report.len(), 2);
        assert_eq!(
            report.get("2021"),
            Some(&FrequencyEntry {
                frequency: 2,
                percentage: "66.7%".to_string()
            })
        );
        assert_eq!(
            report.get("2022"),
            Some(&FrequencyEntry {
                frequency: 1,
                percentage: "33.3%".to_string()
            })
        );
    }

    #[test]
    fn single_value_is_one_hundred_percent() {
        let values = vec![Value::from("Hanover")];
        let report = frequency_report(&values);
        assert_eq!(
            report.get("Hanover"),
            Some(&FrequencyEntry {
                frequency: 1,
                percentage: "100.0%".to_string()
            })
        );
    }

    #[test]
    fn counting_identity_is_value_equality() {
        let values = vec![
            Value::from(2021),
            Value::from(2021),
            Value::from("2021"),
        ];
        let counts = value_counts(&values);
        assert_eq!(counts.len(), 2);
        assert_eq!(counts.get(&Value::from(2021)), Some(&2));
        assert_eq!(counts.get(&Value::from("2021")), Some(&1));
    }

    #[test]
    fn distinct_values_counted_separately() {
        let values = vec![
            Value::from(5),
            Value::from(5),
            Value::from(5),
            Value::from(7),
        ];
        let report = frequency_report(&values);
        assert_eq!(report.get("5").unwrap().frequency, 3);
        assert_eq!(report.get("5").unwrap().percentage, "75.0%");
        assert_eq!(report.get("7").unwrap().frequency, 1);
        assert_eq!(report.get("7").unwrap().percentage, "25.0%");
    }
}
