//! Shared identifier and result types

use article_reco_core::{RecoError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// User identifier after ingestion
pub type UserId = i64;

/// Item (article) identifier after ingestion
pub type ItemId = i64;

/// Identifier as it arrives from an upstream table
///
/// Tables produced by export tooling carry ids as integers, integral floats
/// (`3.0`) or numeric strings. Coercion to an integer happens once, when a
/// store is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Int(i64),
    Float(f64),
    Text(String),
}

impl RawId {
    /// Coerce to an integer identifier
    pub fn to_id(&self) -> Result<i64> {
        match self {
            RawId::Int(v) => Ok(*v),
            RawId::Float(v) => {
                if v.is_finite() && v.fract() == 0.0 && v.abs() < i64::MAX as f64 {
                    Ok(*v as i64)
                } else {
                    Err(RecoError::InvalidIdentifier {
                        value: v.to_string(),
                    })
                }
            }
            RawId::Text(s) => s
                .trim()
                .parse::<i64>()
                .map_err(|_| RecoError::InvalidIdentifier { value: s.clone() }),
        }
    }
}

impl From<i64> for RawId {
    fn from(v: i64) -> Self {
        RawId::Int(v)
    }
}

/// Outcome of a recommendation call
///
/// `UserNotFound` is only produced by the collaborative path and is a normal
/// value, not a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecommendOutcome {
    Items(Vec<ItemId>),
    UserNotFound(UserId),
}

impl RecommendOutcome {
    pub fn items(&self) -> Option<&[ItemId]> {
        match self {
            RecommendOutcome::Items(items) => Some(items),
            RecommendOutcome::UserNotFound(_) => None,
        }
    }

    pub fn into_items(self) -> Option<Vec<ItemId>> {
        match self {
            RecommendOutcome::Items(items) => Some(items),
            RecommendOutcome::UserNotFound(_) => None,
        }
    }

    pub fn is_user_not_found(&self) -> bool {
        matches!(self, RecommendOutcome::UserNotFound(_))
    }
}

impl From<Vec<ItemId>> for RecommendOutcome {
    fn from(items: Vec<ItemId>) -> Self {
        RecommendOutcome::Items(items)
    }
}

impl fmt::Display for RecommendOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecommendOutcome::Items(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            RecommendOutcome::UserNotFound(user_id) => {
                write!(f, "Error: User ID {} not found in clicks data.", user_id)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_id_coercion() {
        assert_eq!(RawId::Int(7).to_id().unwrap(), 7);
        assert_eq!(RawId::Float(3.0).to_id().unwrap(), 3);
        assert_eq!(RawId::Text(" 12 ".to_string()).to_id().unwrap(), 12);
        assert!(RawId::Float(3.5).to_id().is_err());
        assert!(RawId::Float(f64::NAN).to_id().is_err());
        assert!(RawId::Text("abc".to_string()).to_id().is_err());
    }

    #[test]
    fn test_raw_id_deserialize() {
        let ids: Vec<RawId> = serde_json::from_str(r#"[1, 2.0, "3"]"#).unwrap();
        let coerced: Vec<i64> = ids.iter().map(|id| id.to_id().unwrap()).collect();
        assert_eq!(coerced, vec![1, 2, 3]);
    }

    #[test]
    fn test_outcome_rendering() {
        assert_eq!(RecommendOutcome::Items(vec![3, 1, 2]).to_string(), "[3, 1, 2]");
        assert_eq!(RecommendOutcome::Items(vec![]).to_string(), "[]");
        assert_eq!(
            RecommendOutcome::UserNotFound(99).to_string(),
            "Error: User ID 99 not found in clicks data."
        );
    }

    #[test]
    fn test_outcome_accessors() {
        let found = RecommendOutcome::from(vec![1, 2]);
        assert_eq!(found.items(), Some(&[1, 2][..]));
        assert!(!found.is_user_not_found());

        let missing = RecommendOutcome::UserNotFound(5);
        assert!(missing.items().is_none());
        assert!(missing.into_items().is_none());
    }
}
