//! Filters and node shapes of the AMS connections used across the platform.
//!
//! Field names follow the AMS schema; every filter field is optional and left out of the
//! query when unset.
use serde::{Deserialize, Serialize};

pub mod catalog;
pub mod classes;
pub mod organizations;
pub mod programs;
pub mod roles;
pub mod schools;
pub mod users;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Active,
    Inactive,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum StringOperator {
    Contains,
    Eq,
    Neq,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum UuidOperator {
    Eq,
    Neq,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum UuidExclusiveOperator {
    Eq,
    Neq,
    IsNull,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum BooleanOperator {
    Eq,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StringFilter {
    pub operator: StringOperator,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case_insensitive: Option<bool>,
}

impl StringFilter {
    pub fn eq(value: impl Into<String>) -> Self {
        Self {
            operator: StringOperator::Eq,
            value: value.into(),
            case_insensitive: None,
        }
    }

    pub fn contains(value: impl Into<String>) -> Self {
        Self {
            operator: StringOperator::Contains,
            value: value.into(),
            case_insensitive: Some(true),
        }
    }

    /// Status filters are plain string filters in the AMS schema.
    pub fn status(status: Status) -> Self {
        Self::eq(match status {
            Status::Active => "active",
            Status::Inactive => "inactive",
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UuidFilter {
    pub operator: UuidOperator,
    pub value: String,
}

impl UuidFilter {
    pub fn eq(value: impl Into<String>) -> Self {
        Self {
            operator: UuidOperator::Eq,
            value: value.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UuidExclusiveFilter {
    pub operator: UuidExclusiveOperator,
    pub value: Option<String>,
}

impl UuidExclusiveFilter {
    pub fn eq(value: impl Into<String>) -> Self {
        Self {
            operator: UuidExclusiveOperator::Eq,
            value: Some(value.into()),
        }
    }

    pub fn is_null() -> Self {
        Self {
            operator: UuidExclusiveOperator::IsNull,
            value: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BooleanFilter {
    pub operator: BooleanOperator,
    pub value: bool,
}

impl BooleanFilter {
    pub fn eq(value: bool) -> Self {
        Self {
            operator: BooleanOperator::Eq,
            value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::encode_literal;

    #[derive(Serialize)]
    struct Probe {
        name: Option<StringFilter>,
        school_id: Option<UuidExclusiveFilter>,
        system: Option<BooleanFilter>,
    }

    #[test]
    fn scalar_filters_render_bare_operators() {
        let probe = Probe {
            name: Some(StringFilter::contains("Math")),
            school_id: Some(UuidExclusiveFilter::is_null()),
            system: Some(BooleanFilter::eq(false)),
        };

        assert_eq!(
            encode_literal(&probe).unwrap(),
            r#"{name:{operator:contains,value:"Math",caseInsensitive:true},school_id:{operator:isNull},system:{operator:eq,value:false}}"#
        );
    }

    #[test]
    fn status_filter_uses_lowercase_values() {
        assert_eq!(StringFilter::status(Status::Inactive), StringFilter::eq("inactive"));
    }
}
