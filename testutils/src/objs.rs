use std::collections::BTreeMap;

use rstest::fixture;
use rk_core::prelude::*;
use serde_json::json;

use crate::constants::*;

fn test_meta(name: &str) -> metav1::ObjectMeta {
    metav1::ObjectMeta {
        name: Some(name.into()),
        namespace: Some(TEST_NAMESPACE.into()),
        labels: Some(BTreeMap::from([(TEST_SELECTOR_KEY.into(), TEST_SELECTOR_VALUE.into())])),
        ..Default::default()
    }
}

pub fn make_pod(name: &str, phase: &str, conditions: &[(&str, &str)]) -> corev1::Pod {
    corev1::Pod {
        metadata: test_meta(name),
        status: Some(corev1::PodStatus {
            phase: Some(phase.into()),
            conditions: Some(
                conditions
                    .iter()
                    .map(|(type_, status)| corev1::PodCondition {
                        type_: (*type_).into(),
                        status: (*status).into(),
                        ..Default::default()
                    })
                    .collect(),
            ),
            ..Default::default()
        }),
        ..Default::default()
    }
}

pub fn make_job(name: &str, conditions: &[(&str, &str)]) -> batchv1::Job {
    batchv1::Job {
        metadata: test_meta(name),
        status: Some(batchv1::JobStatus {
            conditions: Some(
                conditions
                    .iter()
                    .map(|(type_, status)| batchv1::JobCondition {
                        type_: (*type_).into(),
                        status: (*status).into(),
                        ..Default::default()
                    })
                    .collect(),
            ),
            ..Default::default()
        }),
        ..Default::default()
    }
}

pub fn make_replicaset(name: &str, desired: Option<i32>, ready: Option<i32>) -> appsv1::ReplicaSet {
    appsv1::ReplicaSet {
        metadata: test_meta(name),
        spec: Some(appsv1::ReplicaSetSpec {
            replicas: desired,
            ..Default::default()
        }),
        status: Some(appsv1::ReplicaSetStatus {
            replicas: ready.unwrap_or_default(),
            ready_replicas: ready,
            ..Default::default()
        }),
        ..Default::default()
    }
}

pub fn make_service(name: &str, selector: &[(&str, &str)]) -> corev1::Service {
    corev1::Service {
        metadata: test_meta(name),
        spec: Some(corev1::ServiceSpec {
            selector: if selector.is_empty() {
                None
            } else {
                Some(selector.iter().map(|(k, v)| ((*k).into(), (*v).into())).collect())
            },
            ..Default::default()
        }),
        ..Default::default()
    }
}

// List responses the way the apiserver writes them; `kind` is the list kind,
// e.g. "PodList"
pub fn obj_list<K: serde::Serialize>(kind: &str, items: &[K]) -> serde_json::Value {
    json!({
        "kind": kind,
        "apiVersion": "v1",
        "metadata": {},
        "items": items,
    })
}

#[fixture]
pub fn test_pod(#[default(TEST_POD)] name: &str) -> corev1::Pod {
    make_pod(name, "Running", &[("Ready", "True")])
}

#[fixture]
pub fn test_service(#[default(TEST_SERVICE)] name: &str) -> corev1::Service {
    make_service(name, &[(TEST_SELECTOR_KEY, TEST_SELECTOR_VALUE)])
}
