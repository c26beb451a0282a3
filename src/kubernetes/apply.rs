// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Create-or-update and foreground deletion of resolved manifests

use crate::error::{ClientError, Operation, Result};
use crate::kubernetes::client::ClientSet;
use crate::types::ResourceEndpoint;
use kube::{
    api::{DeleteParams, DynamicObject},
    runtime::wait::{await_condition, conditions},
    ResourceExt,
};
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Reject endpoint and object slices that cannot be paired index by index
pub fn check_aligned(endpoints: &[ResourceEndpoint], objects: &[DynamicObject]) -> Result<()> {
    if endpoints.len() != objects.len() {
        return Err(ClientError::Misaligned {
            endpoints: endpoints.len(),
            objects: objects.len(),
        });
    }
    Ok(())
}

fn kind_of(obj: &DynamicObject) -> String {
    obj.types
        .as_ref()
        .map(|t| t.kind.clone())
        .unwrap_or_default()
}

fn failed<'a>(
    operation: Operation,
    name: &'a str,
    kind: &'a str,
) -> impl FnOnce(kube::Error) -> ClientError + 'a {
    move |source| ClientError::Operation {
        operation,
        name: name.to_string(),
        kind: kind.to_string(),
        source,
    }
}

impl ClientSet {
    /// Create each object, or update it when it already exists.
    ///
    /// Existing objects get the server's resourceVersion copied onto `objects[i]` before the
    /// update. Processing stops at the first failure; earlier resources stay applied.
    #[instrument(skip_all, fields(count = objects.len()))]
    pub async fn apply_resources(
        &self,
        endpoints: &[ResourceEndpoint],
        objects: &mut [DynamicObject],
    ) -> Result<()> {
        check_aligned(endpoints, objects)?;

        for (endpoint, obj) in endpoints.iter().zip(objects.iter_mut()) {
            let name = obj.name_any();
            let kind = kind_of(obj);

            let existing = endpoint
                .get_opt(&name)
                .await
                .map_err(failed(Operation::Get, &name, &kind))?;

            match existing {
                Some(existing) => {
                    obj.metadata.resource_version = existing.metadata.resource_version;
                    endpoint
                        .replace(&name, obj)
                        .await
                        .map_err(failed(Operation::Update, &name, &kind))?;
                    info!("Updated {} {}", kind, name);
                }
                None => {
                    endpoint
                        .create(obj)
                        .await
                        .map_err(failed(Operation::Create, &name, &kind))?;
                    info!("Created {} {}", kind, name);
                }
            }
        }

        Ok(())
    }

    /// Delete each object with foreground propagation, stopping at the first failure
    #[instrument(skip_all, fields(count = objects.len()))]
    pub async fn delete_resources(
        &self,
        endpoints: &[ResourceEndpoint],
        objects: &[DynamicObject],
    ) -> Result<()> {
        check_aligned(endpoints, objects)?;

        let dp = DeleteParams::foreground();
        for (endpoint, obj) in endpoints.iter().zip(objects) {
            let name = obj.name_any();
            let kind = kind_of(obj);

            info!("Deleting {} {}", kind, name);
            endpoint
                .delete(&name, &dp)
                .await
                .map_err(failed(Operation::Delete, &name, &kind))?;
        }

        Ok(())
    }

    /// Wait until every object is gone from the cluster, each bounded by `timeout`
    #[instrument(skip_all, fields(count = objects.len()))]
    pub async fn wait_for_deletion(
        &self,
        endpoints: &[ResourceEndpoint],
        objects: &[DynamicObject],
        timeout: Duration,
    ) -> Result<()> {
        check_aligned(endpoints, objects)?;

        for (endpoint, obj) in endpoints.iter().zip(objects) {
            let name = obj.name_any();
            let kind = kind_of(obj);

            let Some(current) = endpoint
                .get_opt(&name)
                .await
                .map_err(failed(Operation::Get, &name, &kind))?
            else {
                debug!("{} {} is already gone", kind, name);
                continue;
            };
            let uid = current.uid().unwrap_or_default();

            let deleted =
                await_condition(endpoint.api().clone(), &name, conditions::is_deleted(&uid));
            tokio::time::timeout(timeout, deleted)
                .await
                .map_err(|_| ClientError::DeletionTimeout {
                    name: name.clone(),
                    kind: kind.clone(),
                    timeout,
                })??;
            debug!("{} {} deleted", kind, name);
        }

        Ok(())
    }
}
