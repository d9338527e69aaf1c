use assertables::*;

use super::*;

fn svc_path(name: &str) -> String {
    format!("/api/v1/namespaces/{TEST_NAMESPACE}/services/{name}")
}

fn selector_query() -> String {
    format!("{TEST_SELECTOR_KEY}={TEST_SELECTOR_VALUE}")
}

// Mounts the service object plus the three selector list endpoints its
// aggregation resolves dependents from
fn handle_service_and_lists(
    fake_apiserver: &mut MockServerBuilder,
    svc: &corev1::Service,
    pods: Vec<corev1::Pod>,
    jobs: Vec<batchv1::Job>,
    replicasets: Vec<appsv1::ReplicaSet>,
) {
    let svc_obj = svc.clone();
    let path = svc_path(&svc.name_any());
    fake_apiserver.handle(move |when, then| {
        when.method(GET).path(&path);
        then.json_body_obj(&svc_obj);
    });
    fake_apiserver.handle(move |when, then| {
        when.method(GET)
            .path(format!("/api/v1/namespaces/{TEST_NAMESPACE}/pods"))
            .query_param("labelSelector", selector_query());
        then.json_body(obj_list("PodList", &pods));
    });
    fake_apiserver.handle(move |when, then| {
        when.method(GET)
            .path(format!("/apis/batch/v1/namespaces/{TEST_NAMESPACE}/jobs"))
            .query_param("labelSelector", selector_query());
        then.json_body(obj_list("JobList", &jobs));
    });
    fake_apiserver.handle(move |when, then| {
        when.method(GET)
            .path(format!("/apis/apps/v1/namespaces/{TEST_NAMESPACE}/replicasets"))
            .query_param("labelSelector", selector_query());
        then.json_body(obj_list("ReplicaSetList", &replicasets));
    });
}

fn handle_pod(fake_apiserver: &mut MockServerBuilder, pod: corev1::Pod) {
    let path = format!("/api/v1/namespaces/{TEST_NAMESPACE}/pods/{}", pod.name_any());
    fake_apiserver.handle(move |when, then| {
        when.method(GET).path(&path);
        then.json_body_obj(&pod);
    });
}

fn handle_job(fake_apiserver: &mut MockServerBuilder, job: batchv1::Job) {
    let path = format!("/apis/batch/v1/namespaces/{TEST_NAMESPACE}/jobs/{}", job.name_any());
    fake_apiserver.handle(move |when, then| {
        when.method(GET).path(&path);
        then.json_body_obj(&job);
    });
}

fn handle_replicaset(fake_apiserver: &mut MockServerBuilder, rs: appsv1::ReplicaSet) {
    let path = format!("/apis/apps/v1/namespaces/{TEST_NAMESPACE}/replicasets/{}", rs.name_any());
    fake_apiserver.handle(move |when, then| {
        when.method(GET).path(&path);
        then.json_body_obj(&rs);
    });
}

#[rstest]
#[traced_test]
#[tokio::test]
async fn test_service_status_ready(test_service: corev1::Service) {
    let (mut fake_apiserver, client) = make_fake_apiserver();
    let pod = make_pod("web-0", "Running", &[("Ready", "True")]);
    let job = make_job("migrate", &[("Complete", "True")]);
    let rs = make_replicaset("web", Some(2), Some(2));
    handle_service_and_lists(
        &mut fake_apiserver,
        &test_service,
        vec![pod.clone()],
        vec![job.clone()],
        vec![rs.clone()],
    );
    handle_pod(&mut fake_apiserver, pod);
    handle_job(&mut fake_apiserver, job);
    handle_replicaset(&mut fake_apiserver, rs);
    fake_apiserver.build();

    let svc = ServiceResource::new(test_service, client);
    assert_eq!(svc.key(), "service/the-service");
    let res = svc.status(&StatusQuery::default()).await.unwrap();
    fake_apiserver.assert();
    assert_eq!(res, Readiness::Ready);
}

#[rstest]
#[traced_test]
#[tokio::test]
async fn test_service_status_no_matches(test_service: corev1::Service) {
    let (mut fake_apiserver, client) = make_fake_apiserver();
    handle_service_and_lists(&mut fake_apiserver, &test_service, vec![], vec![], vec![]);
    fake_apiserver.build();

    // a selector that matches nothing blocks on nothing
    let svc = ServiceResource::new(test_service, client);
    let res = svc.status(&StatusQuery::default()).await.unwrap();
    fake_apiserver.assert();
    assert_eq!(res, Readiness::Ready);
}

#[rstest]
#[traced_test]
#[tokio::test]
async fn test_service_status_no_selector() {
    let (mut fake_apiserver, client) = make_fake_apiserver();
    let headless = make_service(TEST_SERVICE, &[]);
    let svc_obj = headless.clone();
    fake_apiserver
        .handle(move |when, then| {
            when.method(GET).path(svc_path(TEST_SERVICE));
            then.json_body_obj(&svc_obj);
        })
        .build();

    let svc = ServiceResource::new(headless, client);
    let res = svc.status(&StatusQuery::default()).await.unwrap();
    fake_apiserver.assert();
    assert_eq!(res, Readiness::Ready);
}

#[rstest]
#[traced_test]
#[tokio::test]
async fn test_service_status_pod_not_ready(test_service: corev1::Service) {
    let (mut fake_apiserver, client) = make_fake_apiserver();
    let pending = make_pod("pending-lolo0", "Pending", &[]);
    handle_service_and_lists(&mut fake_apiserver, &test_service, vec![pending.clone()], vec![], vec![]);
    handle_pod(&mut fake_apiserver, pending);
    fake_apiserver.build();

    let svc = ServiceResource::new(test_service, client);
    let err = svc.status(&StatusQuery::default()).await.unwrap_err();
    fake_apiserver.assert();
    assert_eq!(err.to_string(), "Resource pod/pending-lolo0 is not ready");
}

#[rstest]
#[traced_test]
#[tokio::test]
async fn test_service_status_job_not_ready(test_service: corev1::Service) {
    let (mut fake_apiserver, client) = make_fake_apiserver();
    let pending = make_job("pending-lolo0", &[]);
    handle_service_and_lists(&mut fake_apiserver, &test_service, vec![], vec![pending.clone()], vec![]);
    handle_job(&mut fake_apiserver, pending);
    fake_apiserver.build();

    let svc = ServiceResource::new(test_service, client);
    let err = svc.status(&StatusQuery::default()).await.unwrap_err();
    fake_apiserver.assert();
    assert_eq!(err.to_string(), "Resource job/pending-lolo0 is not ready");
}

#[rstest]
#[traced_test]
#[tokio::test]
async fn test_service_status_replicaset_not_ready(test_service: corev1::Service) {
    let (mut fake_apiserver, client) = make_fake_apiserver();
    let failed = make_replicaset("fail", Some(3), Some(2));
    handle_service_and_lists(&mut fake_apiserver, &test_service, vec![], vec![], vec![failed.clone()]);
    handle_replicaset(&mut fake_apiserver, failed);
    fake_apiserver.build();

    let svc = ServiceResource::new(test_service, client);
    let err = svc.status(&StatusQuery::default()).await.unwrap_err();
    fake_apiserver.assert();
    assert_eq!(err.to_string(), "Resource replicaset/fail is not ready");
}

#[rstest]
#[traced_test]
#[tokio::test]
async fn test_service_status_pods_block_before_jobs(test_service: corev1::Service) {
    let (mut fake_apiserver, client) = make_fake_apiserver();
    let pending_pod = make_pod("zzz", "Pending", &[]);
    let pending_job = make_job("aaa", &[]);
    handle_service_and_lists(
        &mut fake_apiserver,
        &test_service,
        vec![pending_pod.clone()],
        vec![pending_job],
        vec![],
    );
    handle_pod(&mut fake_apiserver, pending_pod);
    fake_apiserver.build();

    // pods are evaluated before jobs regardless of name ordering
    let svc = ServiceResource::new(test_service, client);
    let err = svc.status(&StatusQuery::default()).await.unwrap_err();
    fake_apiserver.assert();
    assert_eq!(err.to_string(), "Resource pod/zzz is not ready");
}

#[rstest]
#[traced_test]
#[tokio::test]
async fn test_service_status_blocking_pod_is_lexicographic_first(test_service: corev1::Service) {
    let (mut fake_apiserver, client) = make_fake_apiserver();
    let second = make_pod("bbb", "Pending", &[]);
    let first = make_pod("aaa", "Pending", &[]);
    // list order deliberately unsorted; evaluation order must not follow it
    handle_service_and_lists(&mut fake_apiserver, &test_service, vec![second, first.clone()], vec![], vec![]);
    handle_pod(&mut fake_apiserver, first);
    fake_apiserver.build();

    let svc = ServiceResource::new(test_service, client);
    let err = svc.status(&StatusQuery::default()).await.unwrap_err();
    fake_apiserver.assert();
    assert_eq!(err.to_string(), "Resource pod/aaa is not ready");
}

#[rstest]
#[traced_test]
#[tokio::test]
async fn test_service_status_dependent_lookup_error(test_service: corev1::Service) {
    let (mut fake_apiserver, client) = make_fake_apiserver();
    let gone = make_pod("gone", "Running", &[("Ready", "True")]);
    handle_service_and_lists(&mut fake_apiserver, &test_service, vec![gone], vec![], vec![]);
    fake_apiserver.handle_not_found(format!("/api/v1/namespaces/{TEST_NAMESPACE}/pods/gone"));
    fake_apiserver.build();

    let svc = ServiceResource::new(test_service, client);
    let err = svc.status(&StatusQuery::default()).await.unwrap_err();
    fake_apiserver.assert();

    // the identifying message is deterministic, the lookup fault stays on the chain
    assert_eq!(err.to_string(), "Resource pod/gone is not ready");
    assert_contains!(format!("{err:#}"), "NotFound");
}

#[rstest]
#[traced_test]
#[tokio::test]
async fn test_service_status_service_lookup_error(test_service: corev1::Service) {
    let (mut fake_apiserver, client) = make_fake_apiserver();
    fake_apiserver.handle_not_found(svc_path(TEST_SERVICE)).build();

    let svc = ServiceResource::new(test_service, client);
    let err = svc.status(&StatusQuery::default()).await.unwrap_err();
    fake_apiserver.assert();
    assert!(err.downcast_ref::<kube::Error>().is_some());
}

#[rstest]
#[traced_test]
#[tokio::test]
async fn test_service_create_skips_existing(test_service: corev1::Service) {
    let (mut fake_apiserver, client) = make_fake_apiserver();
    let svc_obj = test_service.clone();
    fake_apiserver
        .handle(move |when, then| {
            when.method(GET).path(svc_path(TEST_SERVICE));
            then.json_body_obj(&svc_obj);
        })
        .build();

    let mut svc = ServiceResource::new(test_service, client);
    svc.create().await.unwrap();
    fake_apiserver.assert();
    assert!(logs_contain("skipping creation"));
}

#[rstest]
#[traced_test]
#[tokio::test]
async fn test_service_create_when_missing(test_service: corev1::Service) {
    let (mut fake_apiserver, client) = make_fake_apiserver();
    let created = test_service.clone();
    fake_apiserver.handle_not_found(svc_path(TEST_SERVICE));
    fake_apiserver
        .handle(move |when, then| {
            when.method(POST).path(format!("/api/v1/namespaces/{TEST_NAMESPACE}/services"));
            then.json_body_obj(&created);
        })
        .build();

    let mut svc = ServiceResource::new(test_service, client);
    svc.create().await.unwrap();
    fake_apiserver.assert();
}
