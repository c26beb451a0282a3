// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use kube::{
    api::{ApiResource, DeleteParams, DynamicObject, PostParams},
    Api, Client, Resource,
};

/// Addressable handle for one resource kind, bound to a namespace when the kind is namespaced.
///
/// Produced by manifest resolution and paired with the object it operates on.
#[derive(Clone)]
pub struct ResourceEndpoint {
    api: Api<DynamicObject>,
    resource: ApiResource,
    namespace: Option<String>,
}

impl ResourceEndpoint {
    /// Endpoint for a cluster-scoped kind
    pub fn cluster(client: Client, resource: &ApiResource) -> Self {
        Self {
            api: Api::all_with(client, resource),
            resource: resource.clone(),
            namespace: None,
        }
    }

    /// Endpoint for a namespaced kind within `namespace`
    pub fn namespaced(client: Client, resource: &ApiResource, namespace: &str) -> Self {
        Self {
            api: Api::namespaced_with(client, namespace, resource),
            resource: resource.clone(),
            namespace: Some(namespace.to_string()),
        }
    }

    pub fn resource(&self) -> &ApiResource {
        &self.resource
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn api(&self) -> &Api<DynamicObject> {
        &self.api
    }

    /// Collection path this endpoint issues requests against
    pub fn url_path(&self) -> String {
        DynamicObject::url_path(&self.resource, self.namespace.as_deref())
    }

    pub async fn get(&self, name: &str) -> kube::Result<DynamicObject> {
        self.api.get(name).await
    }

    /// Fetch by name, `None` when the server answers NotFound
    pub async fn get_opt(&self, name: &str) -> kube::Result<Option<DynamicObject>> {
        self.api.get_opt(name).await
    }

    pub async fn create(&self, obj: &DynamicObject) -> kube::Result<DynamicObject> {
        self.api.create(&PostParams::default(), obj).await
    }

    /// Replace the object named by `obj`; its resourceVersion must match the server's
    pub async fn replace(&self, name: &str, obj: &DynamicObject) -> kube::Result<DynamicObject> {
        self.api.replace(name, &PostParams::default(), obj).await
    }

    /// Request deletion; yields the object when the server reports it as still terminating
    pub async fn delete(
        &self,
        name: &str,
        dp: &DeleteParams,
    ) -> kube::Result<Option<DynamicObject>> {
        Ok(self.api.delete(name, dp).await?.left())
    }
}

impl std::fmt::Debug for ResourceEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceEndpoint")
            .field("kind", &self.resource.kind)
            .field("plural", &self.resource.plural)
            .field("namespace", &self.namespace)
            .finish()
    }
}
