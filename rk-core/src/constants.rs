// Workload phases
pub const POD_PHASE_RUNNING: &str = "Running";
pub const POD_PHASE_SUCCEEDED: &str = "Succeeded";

// Condition types and statuses
pub const POD_CONDITION_READY: &str = "Ready";
pub const JOB_CONDITION_COMPLETE: &str = "Complete";
pub const CONDITION_STATUS_TRUE: &str = "True";

// Kind labels, as they appear in resource keys and error messages
pub const POD_KIND_LABEL: &str = "pod";
pub const JOB_KIND_LABEL: &str = "job";
pub const REPLICASET_KIND_LABEL: &str = "replicaset";
pub const SERVICE_KIND_LABEL: &str = "service";

// Timing
pub const REMOTE_CALL_DEADLINE_SECONDS: u64 = 30;
