// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Manifest decoding and REST mapping through API discovery

use crate::constants::DEFAULT_NAMESPACE;
use crate::error::{ClientError, Result};
use crate::kubernetes::client::ClientSet;
use crate::types::ResourceEndpoint;
use kube::{
    api::DynamicObject,
    core::{GroupVersionKind, TypeMeta},
    discovery::{Discovery, Scope},
};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, instrument};

/// Split a YAML or JSON byte stream into its non-empty documents.
///
/// A stream starting with `{` is read as concatenated JSON values, anything else as
/// `---`-separated YAML. Empty and comment-only YAML documents are skipped.
pub fn decode_documents(bytes: &[u8]) -> Result<Vec<serde_json::Value>> {
    if looks_like_json(bytes) {
        return serde_json::Deserializer::from_slice(bytes)
            .into_iter::<serde_json::Value>()
            .collect::<std::result::Result<_, _>>()
            .map_err(|e| ClientError::Decode(format!("invalid JSON document: {}", e)));
    }

    let mut docs = vec![];
    for de in serde_yaml::Deserializer::from_slice(bytes) {
        let mut value = serde_yaml::Value::deserialize(de)
            .map_err(|e| ClientError::Decode(format!("invalid YAML document: {}", e)))?;
        if value.is_null() {
            continue;
        }
        value
            .apply_merge()
            .map_err(|e| ClientError::Decode(format!("invalid YAML merge key: {}", e)))?;
        docs.push(
            serde_json::to_value(value)
                .map_err(|e| ClientError::Decode(format!("document is not JSON compatible: {}", e)))?,
        );
    }
    Ok(docs)
}

fn looks_like_json(bytes: &[u8]) -> bool {
    bytes
        .iter()
        .find(|b| !b.is_ascii_whitespace())
        .is_some_and(|b| *b == b'{')
}

/// Group, version and kind named by a manifest's `apiVersion` and `kind`
pub fn group_version_kind(types: &TypeMeta) -> Result<GroupVersionKind> {
    let (group, version) = match types.api_version.split_once('/') {
        Some((group, version)) => (group, version),
        None => ("", types.api_version.as_str()),
    };

    if version.is_empty() || types.kind.is_empty() {
        return Err(ClientError::Decode(format!(
            "incomplete type information: apiVersion={:?} kind={:?}",
            types.api_version, types.kind
        )));
    }

    Ok(GroupVersionKind::gvk(group, version, &types.kind))
}

fn to_object(doc: serde_json::Value) -> Result<(GroupVersionKind, DynamicObject)> {
    let types: TypeMeta = serde_json::from_value(doc.clone())
        .map_err(|e| ClientError::Decode(format!("missing apiVersion or kind: {}", e)))?;
    let gvk = group_version_kind(&types)?;

    let obj: DynamicObject = serde_json::from_value(doc)
        .map_err(|e| ClientError::Decode(format!("failed converting object unstructured: {}", e)))?;

    Ok((gvk, obj))
}

fn describe(gvk: &GroupVersionKind) -> String {
    if gvk.group.is_empty() {
        format!("{}/{}", gvk.version, gvk.kind)
    } else {
        format!("{}/{}/{}", gvk.group, gvk.version, gvk.kind)
    }
}

impl ClientSet {
    /// Read a manifest file and resolve it like [`ClientSet::resources_and_objects_from_bytes`]
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub async fn resources_and_objects_from_file(
        &self,
        path: impl AsRef<Path>,
    ) -> Result<(Vec<ResourceEndpoint>, Vec<DynamicObject>)> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| ClientError::ReadFile {
                path: path.to_path_buf(),
                source,
            })?;

        self.resources_and_objects_from_bytes(&bytes).await
    }

    /// Decode every document and map it to the endpoint that serves its kind.
    ///
    /// `endpoints[i]` addresses `objects[i]`. Namespaced objects without a namespace are
    /// placed in `default`. Any failure discards the documents resolved so far.
    #[instrument(skip(self, bytes), fields(len = bytes.len()))]
    pub async fn resources_and_objects_from_bytes(
        &self,
        bytes: &[u8],
    ) -> Result<(Vec<ResourceEndpoint>, Vec<DynamicObject>)> {
        let docs = decode_documents(bytes)?;
        let mut endpoints = Vec::with_capacity(docs.len());
        let mut objects = Vec::with_capacity(docs.len());

        for doc in docs {
            let (gvk, mut obj) = to_object(doc)?;

            // Fresh discovery per document; nothing is cached across iterations
            let discovery = Discovery::new(self.client.clone())
                .run()
                .await
                .map_err(ClientError::Discovery)?;
            let (resource, caps) = discovery
                .resolve_gvk(&gvk)
                .ok_or_else(|| ClientError::Mapping(describe(&gvk)))?;

            let endpoint = match caps.scope {
                Scope::Namespaced => {
                    let namespace = match obj.metadata.namespace.as_deref() {
                        Some(ns) if !ns.is_empty() => ns.to_string(),
                        _ => DEFAULT_NAMESPACE.to_string(),
                    };
                    obj.metadata.namespace = Some(namespace.clone());
                    self.dynamic.namespaced_resource(&resource, &namespace)
                }
                Scope::Cluster => self.dynamic.resource(&resource),
            };

            debug!(
                "Resolved {} {:?} to {}",
                describe(&gvk),
                obj.metadata.name,
                endpoint.url_path()
            );
            endpoints.push(endpoint);
            objects.push(obj);
        }

        Ok((endpoints, objects))
    }
}
