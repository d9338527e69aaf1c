pub const TEST_NAMESPACE: &str = "test-namespace";
pub const TEST_POD: &str = "the-pod";
pub const TEST_JOB: &str = "the-job";
pub const TEST_REPLICASET: &str = "the-replicaset";
pub const TEST_SERVICE: &str = "the-service";
pub const TEST_SELECTOR_KEY: &str = "app";
pub const TEST_SELECTOR_VALUE: &str = "frontend";
