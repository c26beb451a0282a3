// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Typed and dynamic client construction

use crate::config::Config;
use crate::error::{ClientError, Result};
use crate::kubernetes::environment::{self, Connection, Environment, HostEnvironment};
use crate::types::ResourceEndpoint;
use kube::{api::ApiResource, Client};
use tracing::{info, instrument};

/// Schema-agnostic client that can address any resource kind the cluster serves
#[derive(Clone)]
pub struct DynamicClient {
    client: Client,
}

impl DynamicClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Endpoint for `resource` across the whole cluster
    pub fn resource(&self, resource: &ApiResource) -> ResourceEndpoint {
        ResourceEndpoint::cluster(self.client.clone(), resource)
    }

    /// Endpoint for `resource` within `namespace`
    pub fn namespaced_resource(&self, resource: &ApiResource, namespace: &str) -> ResourceEndpoint {
        ResourceEndpoint::namespaced(self.client.clone(), resource, namespace)
    }
}

/// Typed client, dynamic client and the connection facts they were built from
#[derive(Clone)]
pub struct ClientSet {
    /// Typed client, also used for API discovery
    pub client: Client,
    pub dynamic: DynamicClient,
    pub config: kube::Config,
    pub in_cluster: bool,
    /// Pod namespace in-cluster, current context namespace otherwise (`default` when the context sets none)
    pub namespace: String,
}

impl ClientSet {
    /// Build clients from the ambient environment, in-cluster or from `~/.kube/config`
    pub async fn new() -> Result<Self> {
        Self::with_environment(&Config::from_env(), &HostEnvironment).await
    }

    #[instrument(skip(config, env))]
    pub async fn with_environment(config: &Config, env: &impl Environment) -> Result<Self> {
        let connection = environment::resolve(config, env).await?;
        Self::from_connection(connection)
    }

    /// Build both clients from one connection config; fails if either construction fails.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn from_connection(connection: Connection) -> Result<Self> {
        let typed = Client::try_from(connection.config.clone());
        let dynamic = Client::try_from(connection.config.clone());

        let client = typed.map_err(|source| ClientError::ClientConstruction {
            client: "typed",
            source,
        })?;
        let dynamic = dynamic.map_err(|source| ClientError::ClientConstruction {
            client: "dynamic",
            source,
        })?;

        info!(
            "Created k8s clients (in_cluster={}, namespace={})",
            connection.in_cluster, connection.namespace
        );
        Ok(ClientSet {
            client,
            dynamic: DynamicClient::new(dynamic),
            config: connection.config,
            in_cluster: connection.in_cluster,
            namespace: connection.namespace,
        })
    }
}

impl std::fmt::Debug for ClientSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientSet")
            .field("cluster_url", &self.config.cluster_url)
            .field("in_cluster", &self.in_cluster)
            .field("namespace", &self.namespace)
            .finish()
    }
}
