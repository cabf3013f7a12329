use serde::{Deserialize, Serialize};

use super::{Status, StringFilter, UuidExclusiveFilter, UuidFilter};
use crate::connection::{ConnectionFilter, NestedConnection};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassFilter {
    pub id: Option<UuidFilter>,
    pub name: Option<StringFilter>,
    pub status: Option<StringFilter>,
    pub organization_id: Option<UuidFilter>,
    pub school_id: Option<UuidExclusiveFilter>,
    pub teacher_id: Option<UuidFilter>,
    pub student_id: Option<UuidFilter>,
    pub program_id: Option<UuidFilter>,
    #[serde(rename = "AND")]
    pub and: Option<Vec<ClassFilter>>,
    #[serde(rename = "OR")]
    pub or: Option<Vec<ClassFilter>>,
}

impl ConnectionFilter for ClassFilter {
    const FILTER_TYPE: &'static str = "ClassFilter";
    const CONNECTION_NAME: &'static str = "classesConnection";
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassNode {
    pub id: String,
    pub name: String,
    pub status: Status,
    pub short_code: Option<String>,
}

pub const CLASS_NODE_FIELD: &str = "classNode";

/// Students of a class, filtered with a [`UserFilter`](super::users::UserFilter).
pub const CLASS_STUDENTS: NestedConnection = NestedConnection {
    parent_field: CLASS_NODE_FIELD,
    connection_name: "studentsConnection",
};

/// Teachers of a class, filtered with a [`UserFilter`](super::users::UserFilter).
pub const CLASS_TEACHERS: NestedConnection = NestedConnection {
    parent_field: CLASS_NODE_FIELD,
    connection_name: "teachersConnection",
};
