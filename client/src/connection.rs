//! Relay-style connection types and the GraphQL documents used to page through them.
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::errors::ErrorKind;

/// Largest page the AMS hands out, requests asking for more are clamped.
pub const MAX_PAGE_SIZE: usize = 50;

/// Fixed tie-break that keeps page boundaries stable between walks with the same filter.
const SORT_BY_ID: &str = "sort:{field:id,order:ASC}";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionPageInfo {
    pub has_next_page: bool,
    pub has_previous_page: bool,
    #[serde(default)]
    pub start_cursor: Option<String>,
    #[serde(default)]
    pub end_cursor: Option<String>,
}

impl ConnectionPageInfo {
    pub fn has_next(&self, direction: Direction) -> bool {
        match direction {
            Direction::Forward => self.has_next_page,
            Direction::Backward => self.has_previous_page,
        }
    }

    /// Cursor to continue from when paging in `direction`.
    pub fn cursor(&self, direction: Direction) -> &str {
        match direction {
            Direction::Forward => self.end_cursor.as_deref(),
            Direction::Backward => self.start_cursor.as_deref(),
        }
        .unwrap_or_default()
    }
}

/// Whether another page should be requested. Nothing fetched yet always means yes.
pub fn has_more(page_info: Option<&ConnectionPageInfo>, direction: Direction) -> bool {
    page_info.is_none_or(|info| info.has_next(direction))
}

/// Fails when the server claims another page but hands back the cursor it was given.
pub(crate) fn ensure_progress(
    previous: Option<&ConnectionPageInfo>,
    current: &ConnectionPageInfo,
    direction: Direction,
) -> Result<(), ErrorKind> {
    match previous {
        Some(previous) if current.has_next(direction) && previous.cursor(direction) == current.cursor(direction) => {
            Err(ErrorKind::StalledCursor(current.cursor(direction).to_owned()))
        }
        _ => Ok(()),
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge<N> {
    #[serde(default)]
    pub cursor: Option<String>,
    pub node: N,
}

/// One fetched page of a connection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", bound(deserialize = "N: Deserialize<'de>"))]
pub struct ConnectionPage<N> {
    #[serde(default)]
    pub total_count: Option<i64>,
    pub page_info: ConnectionPageInfo,
    #[serde(default)]
    pub edges: Vec<Edge<N>>,
}

impl<N> ConnectionPage<N> {
    pub fn into_nodes(self) -> impl Iterator<Item = N> {
        self.edges.into_iter().map(|edge| edge.node)
    }
}

/// Response shape of a single connection page.
///
/// The selection set sent to the AMS is derived from the implementor's `Deserialize` impl,
/// so it must contain a `pageInfo` field.
pub trait ConnectionResponse: DeserializeOwned {
    fn page_info(&self) -> &ConnectionPageInfo;
}

impl<N: DeserializeOwned> ConnectionResponse for ConnectionPage<N> {
    fn page_info(&self) -> &ConnectionPageInfo {
        &self.page_info
    }
}

/// Filter accepted by a root connection field of the AMS schema.
pub trait ConnectionFilter: Serialize {
    /// GraphQL input type of the filter, e.g. `ProgramFilter`.
    const FILTER_TYPE: &'static str;
    /// Root connection field the filter applies to, e.g. `programsConnection`.
    const CONNECTION_NAME: &'static str;
}

/// Connection reachable from a node looked up by id, e.g. the students of a class.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NestedConnection {
    /// Single-node lookup field of the parent, e.g. `classNode`.
    pub parent_field: &'static str,
    /// Connection field on the parent node, e.g. `studentsConnection`.
    pub connection_name: &'static str,
}

/// Pager arguments for the next request, derived from the previous page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PagerArgs {
    pub direction: Direction,
    pub cursor: String,
    pub count: usize,
}

impl PagerArgs {
    /// `count` of zero means the largest page; anything above [`MAX_PAGE_SIZE`] is clamped.
    pub fn next(page_info: Option<&ConnectionPageInfo>, direction: Direction, count: usize) -> Self {
        let count = if count == 0 { MAX_PAGE_SIZE } else { count.min(MAX_PAGE_SIZE) };
        Self {
            direction,
            cursor: page_info.map(|info| info.cursor(direction).to_owned()).unwrap_or_default(),
            count,
        }
    }
}

pub(crate) fn alias(index: usize) -> String {
    format!("q{index}")
}

fn filter_clause(filter_literal: &str) -> String {
    if filter_literal.is_empty() {
        String::new()
    } else {
        format!("filter:{filter_literal}, ")
    }
}

/// Assembles the paged query for a root connection.
///
/// Variables: `$direction`, `$cursor` and `$count`. The filter clause is left out when
/// the literal is empty.
pub fn connection_query(connection_name: &str, filter_literal: &str, selection: &str) -> String {
    format!(
        "query($direction:ConnectionDirection!, $cursor:String!, $count:PageSize){{\n  \
         {connection_name}(direction:$direction, directionArgs:{{cursor:$cursor count:$count}}, {filter}{SORT_BY_ID}) {{\n\
         {selection}  }}\n}}",
        filter = filter_clause(filter_literal),
    )
}

/// Assembles one aliased `node_field(id:$idN)` lookup per id, aliases `q0..qN`.
pub fn batch_query(node_field: &str, id_count: usize, selection: &str) -> String {
    let params = (0..id_count).map(|i| format!("$id{i}:ID!")).collect::<Vec<_>>().join(", ");

    let mut query = format!("query({params}){{\n");
    for i in 0..id_count {
        query.push_str(&format!(
            "  {alias}: {node_field}(id:$id{i}) {{\n{selection}  }}\n",
            alias = alias(i)
        ));
    }
    query.push('}');
    query
}

/// Assembles a query paging a connection nested in each listed parent node.
///
/// Parent `i` is aliased `q<i>` and reads variables `$id<i>` and `$cursor<i>`, so aliases stay
/// stable while parents drop out between rounds.
pub fn sub_page_query(
    parent_field: &str,
    connection_name: &str,
    filter_literal: &str,
    selection: &str,
    parents: &[usize],
) -> String {
    let mut params = vec!["$direction:ConnectionDirection!".to_string(), "$count:PageSize".to_string()];
    for i in parents {
        params.push(format!("$id{i}:ID!"));
        params.push(format!("$cursor{i}:String!"));
    }

    let filter = filter_clause(filter_literal);
    let mut query = format!("query({}){{\n", params.join(", "));
    for &i in parents {
        query.push_str(&format!(
            "  {alias}: {parent_field}(id:$id{i}) {{\n    \
             {connection_name}(direction:$direction, directionArgs:{{cursor:$cursor{i} count:$count}}, {filter}{SORT_BY_ID}) {{\n\
             {selection}    }}\n  }}\n",
            alias = alias(i)
        ));
    }
    query.push('}');
    query
}
