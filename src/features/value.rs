use serde::{Deserialize, Serialize};

/// A computed feature value: a scalar or an ordered list of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureData {
    Flag(bool),
    Number(i64),
    Text(String),
    List(Vec<String>),
}

impl FeatureData {
    pub fn text(value: impl Into<String>) -> Self {
        FeatureData::Text(value.into())
    }

    pub fn number(value: usize) -> Self {
        FeatureData::Number(i64::try_from(value).unwrap_or(i64::MAX))
    }

    pub fn list<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FeatureData::List(values.into_iter().map(Into::into).collect())
    }

    /// Empty string or empty list. Flags and numbers are never empty.
    pub fn is_empty(&self) -> bool {
        match self {
            FeatureData::Text(value) => value.is_empty(),
            FeatureData::List(values) => values.is_empty(),
            FeatureData::Flag(_) | FeatureData::Number(_) => false,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FeatureData::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            FeatureData::Flag(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<i64> {
        match self {
            FeatureData::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FeatureData::List(values) => Some(values),
            _ => None,
        }
    }
}

impl From<bool> for FeatureData {
    fn from(value: bool) -> Self {
        FeatureData::Flag(value)
    }
}

impl From<String> for FeatureData {
    fn from(value: String) -> Self {
        FeatureData::Text(value)
    }
}

impl From<&str> for FeatureData {
    fn from(value: &str) -> Self {
        FeatureData::Text(value.to_string())
    }
}

impl From<Vec<String>> for FeatureData {
    fn from(values: Vec<String>) -> Self {
        FeatureData::List(values)
    }
}

/// One named feature of one entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureValue {
    pub name: String,
    pub value: FeatureData,
}
