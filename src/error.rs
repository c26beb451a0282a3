// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// The cluster operation that failed on a single resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Get,
    Create,
    Update,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::Get => "getting",
            Operation::Create => "creating",
            Operation::Update => "updating",
            Operation::Delete => "deleting",
        })
    }
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("k8s config file {} does not exist. Cannot continue", .0.display())]
    MissingKubeconfig(PathBuf),

    #[error("Failed reading file {}: {source}", path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse kubeconfig: {0}")]
    Kubeconfig(String),

    #[error("Failed creating in-cluster k8s client config: {0}")]
    InCluster(#[from] kube::config::InClusterError),

    #[error("Failed creating k8s {client} client: {source}")]
    ClientConstruction {
        client: &'static str,
        #[source]
        source: kube::Error,
    },

    #[error("Failed decoding resource file: {0}")]
    Decode(String),

    #[error("Failed getting api group resources: {0}")]
    Discovery(#[source] kube::Error),

    #[error("Failed creating rest mapping: no resource found for {0}")]
    Mapping(String),

    #[error("Failed {operation} {name} kind {kind}: {source}")]
    Operation {
        operation: Operation,
        name: String,
        kind: String,
        #[source]
        source: kube::Error,
    },

    #[error("Resource endpoints ({endpoints}) and objects ({objects}) are not aligned")]
    Misaligned { endpoints: usize, objects: usize },

    #[error("Failed waiting for resource deletion: {0}")]
    Wait(#[from] kube::runtime::wait::Error),

    #[error("Timed out after {timeout:?} waiting for {kind} {name} to be deleted")]
    DeletionTimeout {
        name: String,
        kind: String,
        timeout: Duration,
    },
}

pub type Result<T> = std::result::Result<T, ClientError>;
