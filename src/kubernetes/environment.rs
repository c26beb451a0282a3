// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! In-cluster vs. workstation detection and connection config resolution

use crate::config::Config;
use crate::constants::{DEFAULT_NAMESPACE, KUBECONFIG_PATH};
use crate::error::{ClientError, Result};
use kube::config::{KubeConfigOptions, Kubeconfig};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// The slice of the host the resolver is allowed to look at
pub trait Environment {
    fn exists(&self, path: &Path) -> bool;
    fn read_to_string(&self, path: &Path) -> io::Result<String>;
    fn home_dir(&self) -> Option<PathBuf>;
    /// Load a kubeconfig file, resolving relative credential paths against its directory
    fn kubeconfig(&self, path: &Path) -> Result<Kubeconfig>;
}

/// The real filesystem and home directory
#[derive(Debug, Clone, Copy, Default)]
pub struct HostEnvironment;

impl Environment for HostEnvironment {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn home_dir(&self) -> Option<PathBuf> {
        home::home_dir()
    }

    fn kubeconfig(&self, path: &Path) -> Result<Kubeconfig> {
        Kubeconfig::read_from(path).map_err(|e| {
            ClientError::Kubeconfig(format!("Failed loading {}: {}", path.display(), e))
        })
    }
}

/// Where we run, and what that tells us about credentials
#[derive(Debug, Clone)]
pub enum Placement {
    /// Inside a pod; credentials come from the mounted service account
    InCluster { namespace: String },
    /// On a workstation; credentials come from a kubeconfig file
    External {
        path: PathBuf,
        kubeconfig: Kubeconfig,
        namespace: String,
    },
}

impl Placement {
    pub fn in_cluster(&self) -> bool {
        matches!(self, Placement::InCluster { .. })
    }

    pub fn namespace(&self) -> &str {
        match self {
            Placement::InCluster { namespace } => namespace,
            Placement::External { namespace, .. } => namespace,
        }
    }
}

/// A ready connection configuration plus the facts gathered while building it
#[derive(Debug, Clone)]
pub struct Connection {
    pub config: kube::Config,
    pub in_cluster: bool,
    pub namespace: String,
}

/// Decide between in-cluster and kubeconfig credentials without contacting the cluster
pub fn detect(config: &Config, env: &impl Environment) -> Result<Placement> {
    if env.exists(&config.namespace_file) {
        let namespace = env
            .read_to_string(&config.namespace_file)
            .map_err(|source| ClientError::ReadFile {
                path: config.namespace_file.clone(),
                source,
            })?
            .trim()
            .to_string();

        debug!("Found in-pod namespace file, namespace={}", namespace);
        return Ok(Placement::InCluster { namespace });
    }

    let path = kubeconfig_path(config, env)?;
    if !env.exists(&path) {
        return Err(ClientError::MissingKubeconfig(path));
    }

    let kubeconfig = env.kubeconfig(&path)?;
    let namespace = current_namespace(&kubeconfig)?;

    debug!(
        "Using kubeconfig {}, namespace={}",
        path.display(),
        namespace
    );
    Ok(Placement::External {
        path,
        kubeconfig,
        namespace,
    })
}

/// Detect the placement and build the matching `kube::Config`
#[instrument(skip(config, env))]
pub async fn resolve(config: &Config, env: &impl Environment) -> Result<Connection> {
    let placement = detect(config, env)?;
    let in_cluster = placement.in_cluster();

    let (client_config, namespace) = match placement {
        Placement::InCluster { namespace } => (kube::Config::incluster()?, namespace),
        Placement::External {
            path,
            kubeconfig,
            namespace,
        } => {
            let client_config =
                kube::Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default())
                    .await
                    .map_err(|e| {
                        ClientError::Kubeconfig(format!(
                            "Failed creating default kubernetes client config from {}: {}",
                            path.display(),
                            e
                        ))
                    })?;
            (client_config, namespace)
        }
    };

    info!(
        "Resolved connection to {} (in_cluster={}, namespace={})",
        client_config.cluster_url, in_cluster, namespace
    );
    Ok(Connection {
        config: client_config,
        in_cluster,
        namespace,
    })
}

fn kubeconfig_path(config: &Config, env: &impl Environment) -> Result<PathBuf> {
    if let Some(path) = &config.kubeconfig {
        return Ok(path.clone());
    }

    env.home_dir()
        .map(|home| home.join(KUBECONFIG_PATH))
        .ok_or_else(|| ClientError::MissingKubeconfig(PathBuf::from("~").join(KUBECONFIG_PATH)))
}

fn current_namespace(kubeconfig: &Kubeconfig) -> Result<String> {
    let Some(current) = kubeconfig.current_context.as_deref() else {
        return Err(ClientError::Kubeconfig(
            "current-context is not set".to_string(),
        ));
    };

    let Some(context) = kubeconfig.contexts.iter().find(|c| c.name == current) else {
        return Err(ClientError::Kubeconfig(format!(
            "current-context {} does not match any context",
            current
        )));
    };

    Ok(context
        .context
        .as_ref()
        .and_then(|c| c.namespace.clone())
        .filter(|ns| !ns.is_empty())
        .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string()))
}
