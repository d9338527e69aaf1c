use std::fmt::Debug;

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::Readiness;
use crate::prelude::*;

/// A Kubernetes kind that can classify its own snapshot as ready or not.
/// Classification is total: every snapshot maps to exactly one answer, and
/// lookup faults are the caller's problem, never the classifier's.
pub trait ResourceKind:
    kube::Resource<DynamicType = ()> + Clone + DeserializeOwned + Serialize + Debug + Send + Sync
{
    const KIND_LABEL: &'static str;

    fn classify(&self) -> Readiness;
}

pub fn resource_key(kind_label: &str, name: &str) -> String {
    format!("{kind_label}/{name}")
}

impl ResourceKind for corev1::Pod {
    const KIND_LABEL: &'static str = POD_KIND_LABEL;

    // A pod that ran to completion counts as ready; a running pod only counts
    // once the kubelet has posted the Ready condition.
    fn classify(&self) -> Readiness {
        let Some(status) = self.status.as_ref() else {
            return Readiness::NotReady;
        };

        match status.phase.as_deref() {
            Some(POD_PHASE_SUCCEEDED) => Readiness::Ready,
            Some(POD_PHASE_RUNNING) if has_ready_condition(status) => Readiness::Ready,
            _ => Readiness::NotReady,
        }
    }
}

fn has_ready_condition(status: &corev1::PodStatus) -> bool {
    status
        .conditions
        .iter()
        .flatten()
        .any(|cond| cond.type_ == POD_CONDITION_READY && cond.status == CONDITION_STATUS_TRUE)
}

impl ResourceKind for batchv1::Job {
    const KIND_LABEL: &'static str = JOB_KIND_LABEL;

    fn classify(&self) -> Readiness {
        let complete = self
            .status
            .as_ref()
            .and_then(|status| status.conditions.as_ref())
            .is_some_and(|conds| {
                conds
                    .iter()
                    .any(|cond| cond.type_ == JOB_CONDITION_COMPLETE && cond.status == CONDITION_STATUS_TRUE)
            });

        if complete { Readiness::Ready } else { Readiness::NotReady }
    }
}

impl ResourceKind for appsv1::ReplicaSet {
    const KIND_LABEL: &'static str = REPLICASET_KIND_LABEL;

    fn classify(&self) -> Readiness {
        // the apiserver defaults spec.replicas to 1 when it's unset
        let desired = self.spec.as_ref().and_then(|spec| spec.replicas).unwrap_or(1);
        let ready = self.status.as_ref().and_then(|status| status.ready_replicas).unwrap_or(0);

        if ready >= desired { Readiness::Ready } else { Readiness::NotReady }
    }
}
