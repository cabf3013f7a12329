use std::sync::Arc;

use ams_client::{AmsClient, AmsClientConfig, Operator, stopwatch::RecordingStopwatch};

pub const AMS_PATH: &str = "/user/";

#[derive(Clone, PartialEq, Eq, Debug, serde::Deserialize, serde::Serialize)]
pub struct RecordedRequest {
    pub query: String,
    pub variables: serde_json::Value,
    pub cookie: Option<String>,
    pub authorization: Option<String>,
}

impl From<&mockito::Request> for RecordedRequest {
    fn from(value: &mockito::Request) -> Self {
        let body = request_json(value);
        let header = |name: &str| {
            value
                .header(name)
                .first()
                .map(|h| h.to_str().unwrap().to_string())
        };

        Self {
            query: body["query"].as_str().unwrap_or_default().to_string(),
            variables: body["variables"].clone(),
            cookie: header("cookie"),
            authorization: header("authorization"),
        }
    }
}

#[derive(Default)]
pub struct RequestRecorder {
    requests: Arc<parking_lot::Mutex<Vec<RecordedRequest>>>,
}

impl std::fmt::Debug for RequestRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestRecorder")
            .field("requests", &self.requests.lock())
            .finish()
    }
}

impl RequestRecorder {
    pub fn as_matcher(&self) -> impl Fn(&mockito::Request) -> bool + use<> {
        let requests = self.requests.clone();
        move |req| {
            requests.lock().push(RecordedRequest::from(req));
            true
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }
}

pub fn request_json(req: &mockito::Request) -> serde_json::Value {
    serde_json::from_slice(req.body().unwrap()).unwrap()
}

pub fn operator() -> Operator {
    Operator::new("user-1", "org-1", "token-1")
}

pub fn client(server: &mockito::Server) -> anyhow::Result<(AmsClient, RecordingStopwatch)> {
    let stopwatch = RecordingStopwatch::default();
    let cfg = AmsClientConfig {
        endpoint: format!("{}{AMS_PATH}", server.url()).parse()?,
        ..Default::default()
    };

    Ok((AmsClient::new(cfg)?.with_stopwatch(Arc::new(stopwatch.clone())), stopwatch))
}

/// One connection page holding `nodes`, continuing at `end_cursor` when `has_next_page`.
pub fn page(nodes: Vec<serde_json::Value>, end_cursor: &str, has_next_page: bool) -> serde_json::Value {
    let edges = nodes
        .into_iter()
        .map(|node| serde_json::json!({ "cursor": node["id"].clone(), "node": node }))
        .collect::<Vec<_>>();

    serde_json::json!({
        "totalCount": edges.len(),
        "pageInfo": {
            "hasNextPage": has_next_page,
            "hasPreviousPage": false,
            "startCursor": null,
            "endCursor": end_cursor,
        },
        "edges": edges,
    })
}

pub fn data(data: serde_json::Value) -> Vec<u8> {
    serde_json::to_vec(&serde_json::json!({ "data": data })).unwrap()
}
