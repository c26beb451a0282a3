// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// Only present inside a pod; its content is the pod's namespace
pub const IN_POD_NAMESPACE_FILE: &str = "/var/run/secrets/kubernetes.io/serviceaccount/namespace";

/// Namespace used when neither the manifest nor the kubeconfig context names one
pub const DEFAULT_NAMESPACE: &str = "default";

/// Kubeconfig location relative to the user's home directory
pub const KUBECONFIG_PATH: &str = ".kube/config";

/// Environment variables read by [`crate::config::Config::from_env`]
pub mod env {
    /// Overrides the kubeconfig location; only the first entry of the list is used
    pub const KUBECONFIG: &str = "KUBECONFIG";
}
