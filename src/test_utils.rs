// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Test utilities for mocking Kubernetes API responses.

use crate::kubernetes::client::{ClientSet, DynamicClient};
use http::{Request, Response};
use http_body_util::BodyExt;
use kube::client::Body;
use kube::Client;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use tower::Service;

const SERVER_URL: &str = "https://kubernetes.default.svc";

/// A request seen by [`MockService`]
#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub body: Option<serde_json::Value>,
}

/// A mock HTTP service that answers from per-(method, path) response queues.
///
/// The last queued response for a route is sticky, so repeated discovery calls keep working.
/// Unmatched requests get a 404 Status. Watch requests (`?watch=true`) are routed under the
/// `WATCH` method; an unanswered watch never completes, like an idle watch on a real server.
#[derive(Clone, Default)]
pub struct MockService {
    responses: Arc<Mutex<HashMap<(String, String), VecDeque<(u16, String)>>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(self, method: &str, path: &str, status: u16, body: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .entry((method.to_string(), path.to_string()))
            .or_default()
            .push_back((status, body.to_string()));
        self
    }

    pub fn on_get(self, path: &str, status: u16, body: &str) -> Self {
        self.on("GET", path, status, body)
    }

    pub fn on_post(self, path: &str, status: u16, body: &str) -> Self {
        self.on("POST", path, status, body)
    }

    pub fn on_put(self, path: &str, status: u16, body: &str) -> Self {
        self.on("PUT", path, status, body)
    }

    pub fn on_delete(self, path: &str, status: u16, body: &str) -> Self {
        self.on("DELETE", path, status, body)
    }

    /// Answer watches on `path` with the given newline-delimited events
    pub fn on_watch(self, path: &str, events: &[String]) -> Self {
        let body = events.iter().map(|e| format!("{}\n", e)).collect::<String>();
        self.on("WATCH", path, 200, &body)
    }

    /// Serve a small discovery document: core/v1 namespaces, services and configmaps, apps/v1 deployments
    pub fn with_discovery(self) -> Self {
        self.on_get("/api", 200, &api_versions_json())
            .on_get("/api/v1", 200, &core_v1_resources_json())
            .on_get("/apis", 200, &api_groups_json())
            .on_get("/apis/apps/v1", 200, &apps_v1_resources_json())
    }

    /// Build a kube Client from this mock service; clones share the recorded state
    pub fn into_client(self) -> Client {
        Client::new(self, "default")
    }

    /// Build a client set whose typed and dynamic clients both talk to this mock
    pub fn into_client_set(self) -> ClientSet {
        let client = self.into_client();
        ClientSet {
            dynamic: DynamicClient::new(client.clone()),
            client,
            config: kube::Config::new(SERVER_URL.parse().unwrap()),
            in_cluster: false,
            namespace: "default".to_string(),
        }
    }

    /// All requests received so far, in order
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Requests with the given method, excluding discovery reads
    pub fn requests_for(&self, method: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && !is_discovery_path(&r.path))
            .collect()
    }

    fn next_response(&self, method: &str, path: &str) -> Option<(u16, String)> {
        let mut responses = self.responses.lock().unwrap();
        let queue = responses.get_mut(&(method.to_string(), path.to_string()))?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

fn is_discovery_path(path: &str) -> bool {
    matches!(path, "/api" | "/api/v1" | "/apis" | "/apis/apps/v1")
}

impl Service<Request<Body>> for MockService {
    type Response = Response<Body>;
    type Error = tower::BoxError;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let this = self.clone();

        Box::pin(async move {
            let watch = req
                .uri()
                .query()
                .is_some_and(|q| q.split('&').any(|p| p == "watch=true"));
            let method = if watch {
                "WATCH".to_string()
            } else {
                req.method().to_string()
            };
            let path = req.uri().path().to_string();
            let bytes = req.into_body().collect().await?.to_bytes();
            let body = serde_json::from_slice(&bytes).ok();

            this.requests.lock().unwrap().push(RecordedRequest {
                method: method.clone(),
                path: path.clone(),
                body,
            });

            let response = this.next_response(&method, &path);
            if watch && response.is_none() {
                std::future::pending::<()>().await;
            }
            let (status, body) =
                response.unwrap_or_else(|| (404, not_found_json("resource", &path)));

            Ok::<_, tower::BoxError>(
                Response::builder()
                    .status(status)
                    .header("content-type", "application/json")
                    .body(Body::from(body.into_bytes()))?,
            )
        })
    }
}

fn api_versions_json() -> String {
    serde_json::json!({
        "kind": "APIVersions",
        "versions": ["v1"],
        "serverAddressByClientCIDRs": []
    })
    .to_string()
}

fn api_groups_json() -> String {
    serde_json::json!({
        "kind": "APIGroupList",
        "apiVersion": "v1",
        "groups": [{
            "name": "apps",
            "versions": [{ "groupVersion": "apps/v1", "version": "v1" }],
            "preferredVersion": { "groupVersion": "apps/v1", "version": "v1" }
        }]
    })
    .to_string()
}

fn api_resource(name: &str, singular: &str, kind: &str, namespaced: bool) -> serde_json::Value {
    serde_json::json!({
        "name": name,
        "singularName": singular,
        "namespaced": namespaced,
        "kind": kind,
        "verbs": ["create", "delete", "get", "list", "patch", "update", "watch"]
    })
}

fn core_v1_resources_json() -> String {
    serde_json::json!({
        "kind": "APIResourceList",
        "groupVersion": "v1",
        "resources": [
            api_resource("namespaces", "namespace", "Namespace", false),
            api_resource("services", "service", "Service", true),
            api_resource("configmaps", "configmap", "ConfigMap", true),
        ]
    })
    .to_string()
}

fn apps_v1_resources_json() -> String {
    serde_json::json!({
        "kind": "APIResourceList",
        "apiVersion": "v1",
        "groupVersion": "apps/v1",
        "resources": [api_resource("deployments", "deployment", "Deployment", true)]
    })
    .to_string()
}

/// Create a mock object JSON response as the server would return it
pub fn object_json(
    api_version: &str,
    kind: &str,
    namespace: Option<&str>,
    name: &str,
    resource_version: &str,
) -> String {
    let mut metadata = serde_json::json!({
        "name": name,
        "uid": format!("uid-{}", name),
        "resourceVersion": resource_version
    });
    if let Some(namespace) = namespace {
        metadata["namespace"] = namespace.into();
    }

    serde_json::json!({
        "apiVersion": api_version,
        "kind": kind,
        "metadata": metadata
    })
    .to_string()
}

/// Create a list response holding the given object JSON documents
pub fn list_json(api_version: &str, kind: &str, items: &[String]) -> String {
    let items = items
        .iter()
        .map(|item| serde_json::from_str::<serde_json::Value>(item).unwrap())
        .collect::<Vec<_>>();

    serde_json::json!({
        "apiVersion": api_version,
        "kind": kind,
        "metadata": { "resourceVersion": "100" },
        "items": items
    })
    .to_string()
}

/// Create a watch event line for the given object JSON
pub fn watch_event_json(event: &str, object: &str) -> String {
    serde_json::json!({
        "type": event,
        "object": serde_json::from_str::<serde_json::Value>(object).unwrap()
    })
    .to_string()
}

/// Create a failure Status response
pub fn status_json(code: u16, reason: &str, message: &str) -> String {
    serde_json::json!({
        "kind": "Status",
        "apiVersion": "v1",
        "status": "Failure",
        "message": message,
        "reason": reason,
        "code": code
    })
    .to_string()
}

/// Create a 404 not found response
pub fn not_found_json(resource: &str, name: &str) -> String {
    status_json(
        404,
        "NotFound",
        &format!("{} \"{}\" not found", resource, name),
    )
}
