use crate::error::{Result, RosterError};
use crate::types::{Record, Value};
use std::collections::HashMap;

/// The five fields a basic view always selects.
pub const BASIC_FIELDS: [&str; 5] = ["name", "year", "picture", "gender", "home"];

/// Canonical ethnicity categories, in report order. The ethnicity view walks
/// this list, never the record's own field order.
pub const ETHNICITY_FIELDS: [&str; 7] = [
    "American Indian or Alaska Native",
    "Asian",
    "Black or African American",
    "Hispanic or Latino",
    "Middle Eastern",
    "Native Hawaiian or Other Pacific Islander",
    "White",
];

/// Degree components, in report order.
pub const DEGREE_FIELDS: [&str; 3] = ["major", "minor", "modification"];

/// Result of a specific-field lookup. "ethnicity" and "degree" are composite
/// fields assembled from several record fields; everything else is the raw
/// stored value.
#[derive(Debug, Clone, PartialEq)]
pub enum Projection {
    /// Category names the record has filled in, canonical order.
    Ethnicity(Vec<String>),
    /// The non-empty components of (major, minor, modification).
    Degree(Vec<(String, Value)>),
    Raw(Value),
}

/// Reduces a record to its essential profile fields: name, year, picture,
/// gender, home. Fields the record lacks are simply absent from the view.
pub fn basic_view(record: &Record) -> HashMap<String, Value> {
    let mut view = HashMap::new();
    for field in BASIC_FIELDS {
        if let Some(value) = record.get(field) {
            view.insert(field.to_string(), value.clone());
        }
    }
    view
}

/// Looks up one field of a record, expanding the composite "ethnicity" and
/// "degree" fields.
pub fn specific_view(record: &Record, field: &str) -> Result<Projection> {
    if field.is_empty() {
        return Err(RosterError::InvalidField);
    }

    match field {
        "ethnicity" => {
            let categories = ETHNICITY_FIELDS
                .iter()
                .filter(|category| record.has_nonempty(category))
                .map(|category| category.to_string())
                .collect();
            Ok(Projection::Ethnicity(categories))
        }
        "degree" => {
            let components = DEGREE_FIELDS
                .iter()
                .filter(|component| record.has_nonempty(component))
                .map(|component| {
                    (
                        component.to_string(),
                        record.get(component).cloned().unwrap_or(Value::Null),
                    )
                })
                .collect();
            Ok(Projection::Degree(components))
        }
        _ => match record.get(field) {
            Some(value) => Ok(Projection::Raw(value.clone())),
            None => Err(RosterError::FieldNotFound(field.to_string())),
        },
    }
}
