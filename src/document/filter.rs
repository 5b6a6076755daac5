//! Query predicates over JSON documents.
//!
//! Filters are plain values so that stores can compose them (the tenant
//! narrowing in particular) before handing them to a backend. Field names use
//! dot notation for nested objects; numeric segments index into arrays.

use serde_json::Value;

/// A predicate over a stored document.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Matches every document.
    All,
    /// The field equals the value exactly.
    Eq { field: String, value: Value },
    /// Every inner filter matches.
    And(Vec<Filter>),
    /// The field is an array with at least one element matching the inner filter.
    ElemMatch { field: String, filter: Box<Filter> },
    /// The field is an array containing the value.
    AnyEq { field: String, value: Value },
}

impl Filter {
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Eq {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn elem_match(field: impl Into<String>, filter: Filter) -> Self {
        Filter::ElemMatch {
            field: field.into(),
            filter: Box::new(filter),
        }
    }

    pub fn any_eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::AnyEq {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Conjunction of `self` and `other`, flattening nested `And`s.
    pub fn and(self, other: Filter) -> Self {
        match (self, other) {
            (Filter::All, other) => other,
            (this, Filter::All) => this,
            (Filter::And(mut left), Filter::And(right)) => {
                left.extend(right);
                Filter::And(left)
            }
            (Filter::And(mut left), other) => {
                left.push(other);
                Filter::And(left)
            }
            (this, Filter::And(mut right)) => {
                right.insert(0, this);
                Filter::And(right)
            }
            (this, other) => Filter::And(vec![this, other]),
        }
    }

    /// Evaluate the filter against a document.
    pub fn matches(&self, document: &Value) -> bool {
        match self {
            Filter::All => true,
            Filter::Eq { field, value } => lookup(document, field) == Some(value),
            Filter::And(filters) => filters.iter().all(|f| f.matches(document)),
            Filter::ElemMatch { field, filter } => match lookup(document, field) {
                Some(Value::Array(items)) => items.iter().any(|item| filter.matches(item)),
                _ => false,
            },
            Filter::AnyEq { field, value } => match lookup(document, field) {
                Some(Value::Array(items)) => items.contains(value),
                _ => false,
            },
        }
    }
}

fn lookup<'a>(document: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = document;

    for part in path.split('.') {
        current = match current {
            Value::Array(items) => items.get(part.parse::<usize>().ok()?)?,
            other => other.get(part)?,
        };
    }

    Some(current)
}
