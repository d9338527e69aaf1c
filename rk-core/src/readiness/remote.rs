use std::fmt::Debug;
use std::time::Duration;

use kube::api::{
    ListParams,
    ObjectList,
    PostParams,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::time::timeout;

use super::ReadinessError;
use crate::constants::REMOTE_CALL_DEADLINE_SECONDS;

pub(super) fn default_deadline() -> Duration {
    Duration::from_secs(REMOTE_CALL_DEADLINE_SECONDS)
}

// Thin wrappers around the apiserver client: every remote call gets a bounded
// deadline so a wedged apiserver surfaces as a lookup error on the resource
// being checked instead of hanging the whole reconciliation pass.

pub(super) async fn get<K>(api: &kube::Api<K>, key: &str, name: &str, deadline: Duration) -> anyhow::Result<K>
where
    K: Clone + DeserializeOwned + Debug,
{
    match timeout(deadline, api.get(name)).await {
        Ok(res) => Ok(res?),
        Err(_) => Err(ReadinessError::remote_call_timed_out(key)),
    }
}

pub(super) async fn get_opt<K>(
    api: &kube::Api<K>,
    key: &str,
    name: &str,
    deadline: Duration,
) -> anyhow::Result<Option<K>>
where
    K: Clone + DeserializeOwned + Debug,
{
    match timeout(deadline, api.get_opt(name)).await {
        Ok(res) => Ok(res?),
        Err(_) => Err(ReadinessError::remote_call_timed_out(key)),
    }
}

pub(super) async fn create<K>(api: &kube::Api<K>, key: &str, obj: &K, deadline: Duration) -> anyhow::Result<K>
where
    K: Clone + DeserializeOwned + Debug + Serialize,
{
    match timeout(deadline, api.create(&PostParams::default(), obj)).await {
        Ok(res) => Ok(res?),
        Err(_) => Err(ReadinessError::remote_call_timed_out(key)),
    }
}

pub(super) async fn list<K>(
    api: &kube::Api<K>,
    key: &str,
    lp: &ListParams,
    deadline: Duration,
) -> anyhow::Result<ObjectList<K>>
where
    K: Clone + DeserializeOwned + Debug,
{
    match timeout(deadline, api.list(lp)).await {
        Ok(res) => Ok(res?),
        Err(_) => Err(ReadinessError::remote_call_timed_out(key)),
    }
}
