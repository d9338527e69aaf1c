use std::time::Duration;

use async_trait::async_trait;
use kube::api::ListParams;
use serde::de::DeserializeOwned;
use tracing::*;

use super::remote;
use super::{
    ExistingResource,
    Readiness,
    ReadinessError,
    ResourceHandle,
    ResourceKind,
    StatusQuery,
    resource_key,
};
use crate::prelude::*;

/// Derives a service's readiness from the readiness of everything its
/// selector matches.
///
/// Dependents are evaluated in a fixed order -- pods, then jobs, then replica
/// sets, lexicographic by name within each kind -- and evaluation
/// short-circuits on the first dependent that is not ready or whose lookup
/// fails, so a given selector result always reports the same blocking
/// resource.  A selector matching nothing (or a service with no selector at
/// all) is vacuously ready.
pub struct ServiceResource {
    svc: corev1::Service,
    client: kube::Client,
    namespace: String,
    deadline: Duration,
}

impl ServiceResource {
    pub fn new(svc: corev1::Service, client: kube::Client) -> ServiceResource {
        let namespace = svc.namespace().unwrap_or_else(|| "default".into());
        ServiceResource {
            svc,
            client,
            namespace,
            deadline: remote::default_deadline(),
        }
    }

    /// Bound every remote call the aggregation makes, dependent lookups
    /// included; on expiry the call fails with a `RemoteCallTimedOut` lookup
    /// error.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    fn name(&self) -> String {
        self.svc.name_any()
    }

    fn api(&self) -> kube::Api<corev1::Service> {
        kube::Api::namespaced(self.client.clone(), &self.namespace)
    }

    async fn resolve_dependents(&self, svc: &corev1::Service) -> anyhow::Result<Vec<Box<dyn ResourceHandle>>> {
        let Some(selector) = svc.spec.as_ref().and_then(|spec| spec.selector.as_ref()) else {
            return Ok(vec![]);
        };
        if selector.is_empty() {
            return Ok(vec![]);
        }

        // selector is a BTreeMap, so the rendered query is deterministic too
        let labels = selector
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(",");
        let lp = ListParams::default().labels(&labels);

        let mut dependents: Vec<Box<dyn ResourceHandle>> = vec![];
        self.push_matches::<corev1::Pod>(&mut dependents, &lp).await?;
        self.push_matches::<batchv1::Job>(&mut dependents, &lp).await?;
        self.push_matches::<appsv1::ReplicaSet>(&mut dependents, &lp).await?;
        Ok(dependents)
    }

    async fn push_matches<K>(&self, dependents: &mut Vec<Box<dyn ResourceHandle>>, lp: &ListParams) -> EmptyResult
    where
        K: ResourceKind + DeserializeOwned + 'static,
        K: kube::Resource<Scope = k8s_openapi::NamespaceResourceScope>,
    {
        let api = kube::Api::<K>::namespaced(self.client.clone(), &self.namespace);
        let mut names: Vec<_> = remote::list(&api, &self.key(), lp, self.deadline)
            .await?
            .items
            .iter()
            .map(|obj| obj.name_any())
            .collect();
        names.sort();

        dependents.extend(names.into_iter().map(|name| {
            Box::new(ExistingResource::new(name, api.clone()).with_deadline(self.deadline)) as Box<dyn ResourceHandle>
        }));
        Ok(())
    }
}

#[async_trait]
impl ResourceHandle for ServiceResource {
    fn key(&self) -> String {
        resource_key(SERVICE_KIND_LABEL, &self.name())
    }

    async fn create(&mut self) -> EmptyResult {
        let key = self.key();
        debug!("looking for {key}");
        if remote::get_opt(&self.api(), &key, &self.name(), self.deadline).await?.is_some() {
            info!("found {key}; skipping creation");
            return Ok(());
        }

        info!("creating {key}");
        self.svc = remote::create(&self.api(), &key, &self.svc, self.deadline).await?;
        Ok(())
    }

    async fn status(&self, query: &StatusQuery) -> anyhow::Result<Readiness> {
        let svc = remote::get(&self.api(), &self.key(), &self.name(), self.deadline).await?;

        for dep in self.resolve_dependents(&svc).await? {
            let dep_key = dep.key();
            match dep.status(query).await {
                Ok(readiness) if readiness.is_ready() => debug!("{dep_key} is ready"),
                Ok(_) => return Err(ReadinessError::not_ready(&dep_key)),
                // keep the lookup fault on the chain; the message callers see
                // still names the blocking dependent
                Err(err) => return Err(err.context(format!("Resource {dep_key} is not ready"))),
            }
        }

        Ok(Readiness::Ready)
    }
}
