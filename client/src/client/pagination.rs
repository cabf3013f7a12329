use std::collections::HashMap;

use serde::{Deserialize, de::DeserializeOwned};

use super::{AmsClient, GraphQlRequest};
use crate::{
    connection::{
        ConnectionFilter, ConnectionPage, ConnectionPageInfo, ConnectionResponse, Direction, PagerArgs,
        connection_query, ensure_progress, has_more,
    },
    encoding::{encode_literal, encode_selection},
    errors::{ErrorKind, Result},
    operator::Operator,
};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TotalCount {
    #[serde(default)]
    total_count: Option<i64>,
}

impl AmsClient {
    /// Fetches every page of the connection selected by `filter`, following cursors forward.
    ///
    /// Pages come back in fetch order. Any failure aborts the walk and pages fetched so far
    /// are dropped.
    pub async fn walk<F, R>(&self, operator: &Operator, filter: &F) -> Result<Vec<R>>
    where
        F: ConnectionFilter,
        R: ConnectionResponse,
    {
        self.query_connection(operator, filter, Direction::Forward).await
    }

    /// Like [`AmsClient::walk`] but pages in the given `direction`.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(connection = F::CONNECTION_NAME, direction = ?direction, user_id = %operator.user_id, org_id = %operator.org_id)
    )]
    pub async fn query_connection<F, R>(&self, operator: &Operator, filter: &F, direction: Direction) -> Result<Vec<R>>
    where
        F: ConnectionFilter,
        R: ConnectionResponse,
    {
        let filter_literal = encode_literal(filter).inspect_err(|error| {
            tracing::error!(%error, filter = F::FILTER_TYPE, "failed to encode connection filter");
        })?;
        let selection = encode_selection::<R>()?;
        let query = connection_query(F::CONNECTION_NAME, &filter_literal, &selection);

        let mut pages = Vec::new();
        let mut page_info: Option<ConnectionPageInfo> = None;
        while has_more(page_info.as_ref(), direction) {
            let args = PagerArgs::next(page_info.as_ref(), direction, self.cfg.page_size);
            let request = GraphQlRequest::new(query.as_str()).pager(&args)?;

            let mut data: HashMap<String, R> = self.execute(operator, F::CONNECTION_NAME, request).await?;
            let page = data.remove(F::CONNECTION_NAME).ok_or(ErrorKind::NoData)?;
            ensure_progress(page_info.as_ref(), page.page_info(), direction)?;

            tracing::debug!(
                page = pages.len(),
                cursor = %args.cursor,
                has_next = page.page_info().has_next(direction),
                "fetched connection page"
            );
            page_info = Some(page.page_info().clone());
            pages.push(page);
        }

        tracing::debug!(pages = pages.len(), "connection walk finished");
        Ok(pages)
    }

    /// Walks the connection and returns its nodes in order.
    pub async fn query_all_nodes<F, N>(&self, operator: &Operator, filter: &F) -> Result<Vec<N>>
    where
        F: ConnectionFilter,
        N: DeserializeOwned,
    {
        let pages: Vec<ConnectionPage<N>> = self.walk(operator, filter).await?;
        Ok(pages.into_iter().flat_map(ConnectionPage::into_nodes).collect())
    }

    /// Returns the `totalCount` the AMS reports for the connection, fetching no nodes.
    #[tracing::instrument(level = "debug", skip_all, fields(connection = F::CONNECTION_NAME, user_id = %operator.user_id))]
    pub async fn count_connection<F: ConnectionFilter>(&self, operator: &Operator, filter: &F) -> Result<i64> {
        let filter_literal = encode_literal(filter)?;
        let selection = encode_selection::<TotalCount>()?;
        let query = connection_query(F::CONNECTION_NAME, &filter_literal, &selection);
        let request = GraphQlRequest::new(query).pager(&PagerArgs::next(None, Direction::Forward, 1))?;

        let mut data: HashMap<String, TotalCount> = self.execute(operator, F::CONNECTION_NAME, request).await?;
        data.remove(F::CONNECTION_NAME)
            .and_then(|count| count.total_count)
            .ok_or_else(|| ErrorKind::NoData.into())
    }
}
