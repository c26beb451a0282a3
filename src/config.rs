// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::{self, IN_POD_NAMESPACE_FILE};
use std::env;
use std::ffi::OsStr;
use std::path::PathBuf;

/// Client configuration loaded from environment variables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Marker file whose presence means we run inside a pod
    pub namespace_file: PathBuf,
    /// Explicit kubeconfig location, replaces `~/.kube/config` when set
    pub kubeconfig: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_kubeconfig_var(env::var_os(constants::env::KUBECONFIG).as_deref())
    }

    fn from_kubeconfig_var(value: Option<&OsStr>) -> Self {
        let kubeconfig = value
            .and_then(|paths| env::split_paths(paths).find(|p| !p.as_os_str().is_empty()));

        Config {
            namespace_file: PathBuf::from(IN_POD_NAMESPACE_FILE),
            kubeconfig,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_kubeconfig_var(None)
    }
}
