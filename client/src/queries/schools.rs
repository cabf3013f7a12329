use serde::{Deserialize, Serialize};

use super::{Status, StringFilter, UuidFilter};
use crate::connection::{ConnectionFilter, NestedConnection};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchoolFilter {
    pub school_id: Option<UuidFilter>,
    pub name: Option<StringFilter>,
    pub short_code: Option<StringFilter>,
    pub status: Option<StringFilter>,
    pub organization_id: Option<UuidFilter>,
    pub user_id: Option<UuidFilter>,
    pub program_id: Option<UuidFilter>,
    #[serde(rename = "AND")]
    pub and: Option<Vec<SchoolFilter>>,
    #[serde(rename = "OR")]
    pub or: Option<Vec<SchoolFilter>>,
}

impl ConnectionFilter for SchoolFilter {
    const FILTER_TYPE: &'static str = "SchoolFilter";
    const CONNECTION_NAME: &'static str = "schoolsConnection";
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchoolNode {
    pub id: String,
    pub name: String,
    pub status: Status,
    pub short_code: Option<String>,
    pub organization_id: String,
}

pub const SCHOOL_NODE_FIELD: &str = "schoolNode";

/// Classes of a school, filtered with a [`ClassFilter`](super::classes::ClassFilter).
pub const SCHOOL_CLASSES: NestedConnection = NestedConnection {
    parent_field: SCHOOL_NODE_FIELD,
    connection_name: "classesConnection",
};
