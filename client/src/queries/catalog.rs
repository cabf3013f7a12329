//! Age ranges, grades, categories and subjects: the system-wide and organization-owned
//! vocabularies content is tagged with.
use serde::{Deserialize, Serialize};

use super::{BooleanFilter, Status, StringFilter, UuidExclusiveFilter, UuidFilter};
use crate::connection::ConnectionFilter;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgeRangeUnit {
    Month,
    Year,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgeRangeFilter {
    pub id: Option<UuidFilter>,
    pub name: Option<StringFilter>,
    pub status: Option<StringFilter>,
    pub system: Option<BooleanFilter>,
    pub organization_id: Option<UuidExclusiveFilter>,
    pub program_id: Option<UuidFilter>,
    #[serde(rename = "AND")]
    pub and: Option<Vec<AgeRangeFilter>>,
    #[serde(rename = "OR")]
    pub or: Option<Vec<AgeRangeFilter>>,
}

impl ConnectionFilter for AgeRangeFilter {
    const FILTER_TYPE: &'static str = "AgeRangeFilter";
    const CONNECTION_NAME: &'static str = "ageRangesConnection";
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgeRangeNode {
    pub id: String,
    pub name: String,
    pub status: Status,
    pub system: bool,
    pub low_value: i32,
    pub high_value: i32,
    pub low_value_unit: AgeRangeUnit,
    pub high_value_unit: AgeRangeUnit,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeFilter {
    pub id: Option<UuidFilter>,
    pub name: Option<StringFilter>,
    pub status: Option<StringFilter>,
    pub system: Option<BooleanFilter>,
    pub organization_id: Option<UuidExclusiveFilter>,
    pub program_id: Option<UuidFilter>,
    #[serde(rename = "AND")]
    pub and: Option<Vec<GradeFilter>>,
    #[serde(rename = "OR")]
    pub or: Option<Vec<GradeFilter>>,
}

impl ConnectionFilter for GradeFilter {
    const FILTER_TYPE: &'static str = "GradeFilter";
    const CONNECTION_NAME: &'static str = "gradesConnection";
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeNode {
    pub id: String,
    pub name: String,
    pub status: Status,
    pub system: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryFilter {
    pub id: Option<UuidFilter>,
    pub name: Option<StringFilter>,
    pub status: Option<StringFilter>,
    pub system: Option<BooleanFilter>,
    pub organization_id: Option<UuidExclusiveFilter>,
    pub subject_id: Option<UuidFilter>,
    #[serde(rename = "AND")]
    pub and: Option<Vec<CategoryFilter>>,
    #[serde(rename = "OR")]
    pub or: Option<Vec<CategoryFilter>>,
}

impl ConnectionFilter for CategoryFilter {
    const FILTER_TYPE: &'static str = "CategoryFilter";
    const CONNECTION_NAME: &'static str = "categoriesConnection";
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryNode {
    pub id: String,
    pub name: String,
    pub status: Status,
    pub system: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectFilter {
    pub id: Option<UuidFilter>,
    pub name: Option<StringFilter>,
    pub status: Option<StringFilter>,
    pub system: Option<BooleanFilter>,
    pub organization_id: Option<UuidExclusiveFilter>,
    pub program_id: Option<UuidFilter>,
    pub category_id: Option<UuidFilter>,
    #[serde(rename = "AND")]
    pub and: Option<Vec<SubjectFilter>>,
    #[serde(rename = "OR")]
    pub or: Option<Vec<SubjectFilter>>,
}

impl ConnectionFilter for SubjectFilter {
    const FILTER_TYPE: &'static str = "SubjectFilter";
    const CONNECTION_NAME: &'static str = "subjectsConnection";
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectNode {
    pub id: String,
    pub name: String,
    pub status: Status,
    pub system: bool,
}
