mod batch;
mod pagination;
mod sub_page;

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use reqwest::{
    StatusCode,
    header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue},
    redirect::Policy as RedirectPolicy,
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use validator::Validate;

use crate::{
    connection::{MAX_PAGE_SIZE, PagerArgs},
    errors::{ErrorKind, Result},
    operator::Operator,
    stopwatch::{NoopStopwatch, Stopwatch},
};

const REDIRECT_LIMIT: usize = 3;

fn default_endpoint() -> url::Url {
    "http://localhost:8080/user/".parse().unwrap()
}

fn default_timeout() -> Duration {
    Duration::from_secs(60)
}

fn default_page_size() -> usize {
    MAX_PAGE_SIZE
}

/// Configuration for the [`AmsClient`].
#[serde_with::serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, smart_default::SmartDefault, Validate)]
pub struct AmsClientConfig {
    /// GraphQL endpoint of the AMS.
    #[default(_code = "default_endpoint()")]
    #[serde(default = "default_endpoint")]
    pub endpoint: url::Url,
    /// Timeout applied to every request.
    #[serde_as(as = "serde_with::DurationSeconds<u64>")]
    #[default(_code = "default_timeout()")]
    #[serde(default = "default_timeout")]
    pub timeout: Duration,
    /// Service key sent when the operator carries no token.
    #[serde(default)]
    pub authorized_key: Option<String>,
    /// Requested page size for connection walks.
    #[validate(range(min = 1, max = 50))]
    #[default(_code = "default_page_size()")]
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl AmsClientConfig {
    /// Parses and validates a YAML configuration document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let cfg: Self = serde_yaml::from_str(yaml).map_err(|e| ErrorKind::Config(e.to_string()))?;
        cfg.validate().map_err(|e| ErrorKind::Config(e.to_string()))?;
        Ok(cfg)
    }
}

/// A GraphQL document with its variables and any extra headers.
#[derive(Clone, Debug, Serialize)]
pub struct GraphQlRequest {
    pub query: String,
    pub variables: serde_json::Map<String, serde_json::Value>,
    #[serde(skip)]
    pub headers: HeaderMap,
}

impl GraphQlRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            variables: Default::default(),
            headers: Default::default(),
        }
    }

    pub fn variable(mut self, name: impl Into<String>, value: impl Serialize) -> std::result::Result<Self, ErrorKind> {
        self.variables.insert(name.into(), serde_json::to_value(value)?);
        Ok(self)
    }

    /// Sets `$direction`, `$cursor` and `$count`.
    pub fn pager(self, args: &PagerArgs) -> std::result::Result<Self, ErrorKind> {
        self.variable("direction", args.direction)?
            .variable("cursor", &args.cursor)?
            .variable("count", args.count)
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

/// Decoded response envelope together with the HTTP status it arrived with.
#[derive(Debug)]
pub struct GraphQlReply<T> {
    pub status: StatusCode,
    pub response: cynic::GraphQlResponse<T>,
}

/// Client of the Academic Management Service GraphQL API.
///
/// Cloning is cheap and clones share the underlying connection pool, so one instance can be
/// built at startup and handed to every service that talks to the AMS.
#[derive(Clone, Debug)]
pub struct AmsClient {
    cfg: AmsClientConfig,
    http: reqwest::Client,
    stopwatch: Arc<dyn Stopwatch>,
}

impl AmsClient {
    pub fn new(cfg: AmsClientConfig) -> Result<Self> {
        cfg.validate().map_err(|e| ErrorKind::Config(e.to_string()))?;

        let http = reqwest::Client::builder()
            .timeout(cfg.timeout)
            .gzip(true)
            .user_agent(format!("ams-client/{}", env!("CARGO_PKG_VERSION")))
            .redirect(RedirectPolicy::limited(REDIRECT_LIMIT))
            .build()
            .map_err(ErrorKind::from)?;

        Ok(Self {
            cfg,
            http,
            stopwatch: Arc::new(NoopStopwatch),
        })
    }

    /// Replaces the hook that receives call timings.
    pub fn with_stopwatch(mut self, stopwatch: Arc<dyn Stopwatch>) -> Self {
        self.stopwatch = stopwatch;
        self
    }

    pub fn config(&self) -> &AmsClientConfig {
        &self.cfg
    }

    /// Posts `request` and decodes the response envelope.
    ///
    /// Non-2xx statuses fail with [`ErrorKind::Status`]. A body that cannot be decoded fails
    /// with [`ErrorKind::Decode`], which still carries the status. GraphQL-level errors are
    /// left in the returned envelope.
    #[tracing::instrument(level = "debug", skip_all, fields(endpoint = %self.cfg.endpoint))]
    pub async fn run<T: DeserializeOwned>(&self, request: &GraphQlRequest) -> Result<GraphQlReply<T>> {
        tracing::debug!(query = %request.query, variables = ?request.variables, "sending AMS query");
        let started = Instant::now();

        let resp = self
            .http
            .post(self.cfg.endpoint.clone())
            .headers(request_headers(&request.headers))
            .body(serde_json::to_vec(request).map_err(ErrorKind::from)?)
            .send()
            .await
            .map_err(ErrorKind::from)?;

        let status = resp.status();
        let body = resp.bytes().await.map_err(ErrorKind::from)?;
        let elapsed = started.elapsed();
        tracing::trace!(body = %String::from_utf8_lossy(body.as_ref()), "received AMS response");

        if !status.is_success() {
            tracing::error!(%status, ?elapsed, "AMS responded with an error status");
            return Err(ErrorKind::Status {
                status,
                body: String::from_utf8_lossy(body.as_ref()).into_owned(),
            }
            .into());
        }

        let response = serde_json::from_slice::<cynic::GraphQlResponse<T>>(&body)
            .map_err(|source| ErrorKind::Decode { status, source })?;
        tracing::debug!(%status, ?elapsed, "decoded AMS response");

        Ok(GraphQlReply { status, response })
    }

    /// Authenticates `request` as `operator`, runs it and unwraps the response data.
    ///
    /// `label` names the call towards the stopwatch.
    pub(crate) async fn execute<T: DeserializeOwned>(
        &self,
        operator: &Operator,
        label: &str,
        request: GraphQlRequest,
    ) -> Result<T> {
        let mut request = request;
        request
            .headers
            .extend(operator.auth_headers(self.cfg.authorized_key.as_deref())?);

        let started = Instant::now();
        let result = self
            .run::<T>(&request)
            .await
            .and_then(|reply| response_to_data(reply.response));
        self.stopwatch.record(label, started.elapsed());

        if let Err(error) = &result {
            tracing::error!(
                %error,
                label,
                query = %request.query,
                variables = ?request.variables,
                user_id = %operator.user_id,
                org_id = %operator.org_id,
                "AMS query failed"
            );
        }
        result
    }
}

/// Caller headers with `Content-Type` and `Accept` forced to JSON.
fn request_headers(headers: &HeaderMap) -> HeaderMap {
    let mut headers = headers.clone();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers
}

/// GraphQL errors fail the call even when partial data came along.
pub(crate) fn response_to_data<T>(response: cynic::GraphQlResponse<T>) -> Result<T> {
    match (response.data, response.errors) {
        (_, Some(errors)) if !errors.is_empty() => Err(ErrorKind::GraphQl(errors).into()),
        (Some(data), _) => Ok(data),
        (None, _) => Err(ErrorKind::NoData.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = AmsClientConfig::default();

        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.timeout, Duration::from_secs(60));
        assert_eq!(cfg.page_size, MAX_PAGE_SIZE);
        assert!(cfg.authorized_key.is_none());
    }

    #[test]
    fn config_is_read_from_yaml() -> anyhow::Result<()> {
        let cfg = AmsClientConfig::from_yaml_str(
            r#"
            endpoint: "https://ams.example.net/user/"
            timeout: 5
            authorized_key: "service-key"
            page_size: 20
            "#,
        )?;

        assert_eq!(cfg.endpoint.as_str(), "https://ams.example.net/user/");
        assert_eq!(cfg.timeout, Duration::from_secs(5));
        assert_eq!(cfg.authorized_key.as_deref(), Some("service-key"));
        assert_eq!(cfg.page_size, 20);
        Ok(())
    }

    #[test]
    fn oversized_page_is_rejected() {
        let err = AmsClientConfig::from_yaml_str("page_size: 500").unwrap_err();

        assert!(matches!(err.kind(), ErrorKind::Config(_)));
        assert!(AmsClient::new(AmsClientConfig {
            page_size: 0,
            ..Default::default()
        })
        .is_err());
    }

    #[test]
    fn request_body_carries_query_and_variables_only() -> anyhow::Result<()> {
        let request = GraphQlRequest::new("query { me { id } }")
            .variable("id0", "abc")?
            .header(HeaderName::from_static("x-trace"), HeaderValue::from_static("1"));

        assert_eq!(
            serde_json::to_value(&request)?,
            serde_json::json!({ "query": "query { me { id } }", "variables": { "id0": "abc" } })
        );
        Ok(())
    }

    #[test]
    fn json_headers_replace_caller_values() {
        let mut caller = HeaderMap::new();
        caller.insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        caller.append(ACCEPT, HeaderValue::from_static("text/html"));
        caller.append(ACCEPT, HeaderValue::from_static("*/*"));
        caller.insert(HeaderName::from_static("x-trace"), HeaderValue::from_static("1"));

        let headers = request_headers(&caller);

        assert_eq!(headers.get_all(CONTENT_TYPE).iter().collect::<Vec<_>>(), vec!["application/json"]);
        assert_eq!(headers.get_all(ACCEPT).iter().collect::<Vec<_>>(), vec!["application/json"]);
        assert_eq!(headers.get("x-trace").unwrap(), "1");
    }

    #[test]
    fn graphql_errors_win_over_partial_data() {
        let response: cynic::GraphQlResponse<serde_json::Value> = serde_json::from_value(serde_json::json!({
            "data": { "programsConnection": null },
            "errors": [{ "message": "forbidden" }]
        }))
        .unwrap();

        let err = response_to_data(response).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::GraphQl(errors) if errors[0].message == "forbidden"));
    }

    #[test]
    fn missing_data_is_reported() {
        let response: cynic::GraphQlResponse<serde_json::Value> =
            serde_json::from_value(serde_json::json!({ "errors": [] })).unwrap();

        assert!(matches!(response_to_data(response).unwrap_err().kind(), ErrorKind::NoData));
    }
}
