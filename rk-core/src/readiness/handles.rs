use std::time::Duration;

use async_trait::async_trait;
use tracing::*;

use super::remote;
use super::{
    Readiness,
    ReadinessError,
    ResourceHandle,
    ResourceKind,
    StatusQuery,
    resource_key,
};
use crate::prelude::*;

pub type PodResource = ManagedResource<corev1::Pod>;
pub type JobResource = ManagedResource<batchv1::Job>;
pub type ReplicaSetResource = ManagedResource<appsv1::ReplicaSet>;

pub type ExistingPod = ExistingResource<corev1::Pod>;
pub type ExistingJob = ExistingResource<batchv1::Job>;
pub type ExistingReplicaSet = ExistingResource<appsv1::ReplicaSet>;

/// A resource this system owns: it holds the desired object and creates it
/// remotely if nothing with that name exists yet.
pub struct ManagedResource<K: ResourceKind> {
    obj: K,
    api: kube::Api<K>,
    deadline: Duration,
}

impl<K: ResourceKind> ManagedResource<K> {
    pub fn new(obj: K, api: kube::Api<K>) -> ManagedResource<K> {
        ManagedResource { obj, api, deadline: remote::default_deadline() }
    }

    /// Bound every remote call this handle makes; on expiry the call fails
    /// with a `RemoteCallTimedOut` lookup error.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    /// The desired object; after a successful create this reflects what the
    /// store returned, server-assigned fields included.
    pub fn object(&self) -> &K {
        &self.obj
    }

    fn name(&self) -> String {
        self.obj.name_any()
    }
}

#[async_trait]
impl<K: ResourceKind> ResourceHandle for ManagedResource<K> {
    fn key(&self) -> String {
        resource_key(K::KIND_LABEL, &self.name())
    }

    async fn create(&mut self) -> EmptyResult {
        let key = self.key();
        debug!("looking for {key}");
        if let Some(found) = remote::get_opt(&self.api, &key, &self.name(), self.deadline).await? {
            info!("found {key}, status: {}; skipping creation", found.classify());
            return Ok(());
        }

        info!("creating {key}");
        self.obj = remote::create(&self.api, &key, &self.obj, self.deadline).await?;
        Ok(())
    }

    async fn status(&self, _query: &StatusQuery) -> anyhow::Result<Readiness> {
        let obj = remote::get(&self.api, &self.key(), &self.name(), self.deadline).await?;
        Ok(obj.classify())
    }
}

/// A pre-provisioned dependency: observed only, never created.  An absent
/// resource here is unrecoverable and is surfaced to the caller as a typed
/// `MissingDependency` error; whether to halt the process is the caller's
/// decision, not this handle's.
///
/// Only confirmed absence maps to `MissingDependency`: a transport-level
/// lookup fault (unreachable apiserver, permission failure, expired deadline)
/// propagates as an ordinary lookup error, since it says nothing about
/// whether the dependency exists.
pub struct ExistingResource<K: ResourceKind> {
    name: String,
    api: kube::Api<K>,
    deadline: Duration,
}

impl<K: ResourceKind> ExistingResource<K> {
    pub fn new(name: impl Into<String>, api: kube::Api<K>) -> ExistingResource<K> {
        ExistingResource {
            name: name.into(),
            api,
            deadline: remote::default_deadline(),
        }
    }

    /// Bound every remote call this handle makes; on expiry the call fails
    /// with a `RemoteCallTimedOut` lookup error.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }
}

#[async_trait]
impl<K: ResourceKind> ResourceHandle for ExistingResource<K> {
    fn key(&self) -> String {
        resource_key(K::KIND_LABEL, &self.name)
    }

    async fn create(&mut self) -> EmptyResult {
        let key = self.key();
        debug!("looking for {key}");
        match remote::get_opt(&self.api, &key, &self.name, self.deadline).await? {
            Some(found) => {
                info!("found {key}, status: {}", found.classify());
                Ok(())
            },
            None => Err(ReadinessError::missing_dependency(&key)),
        }
    }

    async fn status(&self, _query: &StatusQuery) -> anyhow::Result<Readiness> {
        let obj = remote::get(&self.api, &self.key(), &self.name, self.deadline).await?;
        Ok(obj.classify())
    }
}
