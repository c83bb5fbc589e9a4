//! 准入管道端到端测试
//!
//! 直接驱动路由层，覆盖从 HTTP 请求到响应信封的完整管道。

use hyper::{Body, Method, Request, Response, StatusCode};
use serde_json::{json, Value};

use admission_webhook::config::Config;
use admission_webhook::server::WebhookServer;
use k8s_admission_apis::admission::{v1, v1beta1};

fn test_server(cloud_provider: &str) -> WebhookServer {
    WebhookServer::new(Config {
        cert_file: None,
        key_file: None,
        port: 0,
        message: "integration test".to_string(),
        cloud_provider: cloud_provider.to_string(),
        reserved_namespace: "default".to_string(),
    })
}

fn admission_post(path: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(path)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn v1_review_for(namespace: &str, uid: &str) -> Value {
    json!({
        "apiVersion": "admission.k8s.io/v1",
        "kind": "AdmissionReview",
        "request": {
            "uid": uid,
            "kind": {"group": "", "version": "v1", "kind": "Pod"},
            "resource": {"group": "", "version": "v1", "resource": "pods"},
            "operation": "CREATE",
            "object": {"metadata": {"name": "web", "namespace": namespace}}
        }
    })
}

async fn body_json(response: Response<Body>) -> Value {
    let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_text(response: Response<Body>) -> String {
    let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_auxiliary_endpoints_bypass_the_pipeline() {
    let server = test_server("aws");

    let readyz = Request::builder()
        .method(Method::GET)
        .uri("/readyz")
        .body(Body::empty())
        .unwrap();
    let response = server.route(readyz).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "ok");

    let ping = Request::builder()
        .method(Method::GET)
        .uri("/ping")
        .body(Body::empty())
        .unwrap();
    assert_eq!(body_text(server.route(ping).await).await, "pong");

    let message = Request::builder()
        .method(Method::GET)
        .uri("/message")
        .body(Body::empty())
        .unwrap();
    assert_eq!(body_text(server.route(message).await).await, "integration test");
}

#[tokio::test]
async fn test_unknown_path_is_not_found() {
    let server = test_server("aws");
    let request = Request::builder()
        .method(Method::GET)
        .uri("/nope")
        .body(Body::empty())
        .unwrap();
    assert_eq!(server.route(request).await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_wrong_content_type_gets_structured_400() {
    let server = test_server("aws");
    let request = Request::builder()
        .method(Method::POST)
        .uri("/no-default-namespace")
        .header("Content-Type", "text/plain")
        .body(Body::from(v1_review_for("default", "uid-1").to_string()))
        .unwrap();

    let response = server.route(request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let status = body_json(response).await;
    assert_eq!(status["status"], "Failure");
    assert!(status["message"]
        .as_str()
        .unwrap()
        .contains("application/json"));
}

#[tokio::test]
async fn test_unparseable_body_gets_400() {
    let server = test_server("aws");
    let request = Request::builder()
        .method(Method::POST)
        .uri("/no-default-namespace")
        .header("Content-Type", "application/json")
        .body(Body::from("this is not json"))
        .unwrap();

    let response = server.route(request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unsupported_group_version_kind_gets_400() {
    let server = test_server("aws");
    let body = json!({
        "apiVersion": "apps/v1",
        "kind": "Deployment",
        "spec": {}
    });
    let response = server
        .route(admission_post("/no-default-namespace", body))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let status = body_json(response).await;
    assert!(status["message"]
        .as_str()
        .unwrap()
        .contains("unsupported group version kind"));
}

#[tokio::test]
async fn test_review_without_request_gets_400() {
    let server = test_server("aws");
    let body = json!({
        "apiVersion": "admission.k8s.io/v1",
        "kind": "AdmissionReview"
    });
    let response = server
        .route(admission_post("/no-default-namespace", body))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_v1_default_namespace_is_denied_with_uid_echoed() {
    let server = test_server("aws");
    let response = server
        .route(admission_post(
            "/no-default-namespace",
            v1_review_for("default", "uid-deny"),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let review: v1::AdmissionReview =
        serde_json::from_value(body_json(response).await).unwrap();
    assert_eq!(review.type_meta.api_version.as_deref(), Some("admission.k8s.io/v1"));
    assert!(review.request.is_none());

    let admission = review.response.unwrap();
    assert_eq!(admission.uid, "uid-deny");
    assert!(!admission.allowed);
    assert!(admission.patch.is_none());
    assert!(!admission
        .result
        .unwrap()
        .message
        .unwrap_or_default()
        .is_empty());
}

#[tokio::test]
async fn test_v1_other_namespace_is_allowed() {
    let server = test_server("aws");
    let response = server
        .route(admission_post(
            "/no-default-namespace",
            v1_review_for("not-default", "uid-allow"),
        ))
        .await;

    let review: v1::AdmissionReview =
        serde_json::from_value(body_json(response).await).unwrap();
    let admission = review.response.unwrap();
    assert_eq!(admission.uid, "uid-allow");
    assert!(admission.allowed);
    assert!(admission.patch.is_none());
}

#[tokio::test]
async fn test_v1beta1_review_is_answered_in_v1beta1() {
    let server = test_server("aws");
    let body = json!({
        "apiVersion": "admission.k8s.io/v1beta1",
        "kind": "AdmissionReview",
        "request": {
            "uid": "uid-legacy",
            "kind": {"group": "", "version": "v1", "kind": "Pod"},
            "resource": {"group": "", "version": "v1", "resource": "pods"},
            "operation": "CREATE",
            "object": {"metadata": {"name": "web", "namespace": "DEFAULT"}}
        }
    });

    let response = server.route(admission_post("/no-default-namespace", body)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let review: v1beta1::AdmissionReview =
        serde_json::from_value(body_json(response).await).unwrap();
    assert_eq!(
        review.type_meta.api_version.as_deref(),
        Some("admission.k8s.io/v1beta1")
    );

    // 大小写不同的保留命名空间同样被拒绝，uid 原样回传
    let admission = review.response.unwrap();
    assert_eq!(admission.uid, "uid-legacy");
    assert!(!admission.allowed);
}

#[tokio::test]
async fn test_malformed_target_object_becomes_denial_not_transport_error() {
    let server = test_server("aws");
    let body = json!({
        "apiVersion": "admission.k8s.io/v1",
        "kind": "AdmissionReview",
        "request": {
            "uid": "uid-bad-object",
            "operation": "CREATE",
            "object": {"metadata": "this should be a map"}
        }
    });

    let response = server.route(admission_post("/no-default-namespace", body)).await;
    // 策略内部的解码失败是合法信封里的拒绝，不是传输错误
    assert_eq!(response.status(), StatusCode::OK);

    let review: v1::AdmissionReview =
        serde_json::from_value(body_json(response).await).unwrap();
    let admission = review.response.unwrap();
    assert_eq!(admission.uid, "uid-bad-object");
    assert!(!admission.allowed);
    assert!(!admission
        .result
        .unwrap()
        .message
        .unwrap_or_default()
        .is_empty());
}

#[tokio::test]
async fn test_load_balancer_mutation_end_to_end() {
    let server = test_server("azure");
    let object = json!({
        "apiVersion": "v1",
        "kind": "Service",
        "metadata": {"name": "ingress-lb", "namespace": "edge"},
        "spec": {"type": "LoadBalancer"}
    });
    let body = json!({
        "apiVersion": "admission.k8s.io/v1",
        "kind": "AdmissionReview",
        "request": {
            "uid": "uid-mutate",
            "kind": {"group": "", "version": "v1", "kind": "Service"},
            "resource": {"group": "", "version": "v1", "resource": "services"},
            "operation": "CREATE",
            "object": object
        }
    });

    let response = server
        .route(admission_post("/no-external-ip-load-balancers", body))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let review: v1::AdmissionReview =
        serde_json::from_value(body_json(response).await).unwrap();
    let admission = review.response.unwrap();
    assert_eq!(admission.uid, "uid-mutate");
    assert!(admission.allowed);
    assert_eq!(admission.patch_type, Some(v1::PatchType::JsonPatch));

    // 补丁应用到原对象后必须得到期望的注解
    let patch: json_patch::Patch =
        serde_json::from_slice(&admission.patch.unwrap().0).unwrap();
    let mut patched = object;
    json_patch::patch(&mut patched, &patch.0).unwrap();
    assert_eq!(
        patched["metadata"]["annotations"]
            ["service.beta.kubernetes.io/azure-load-balancer-internal"],
        json!("true")
    );
}

#[tokio::test]
async fn test_unconfigured_cloud_provider_denies_with_explanation() {
    let server = test_server("");
    let body = json!({
        "apiVersion": "admission.k8s.io/v1",
        "kind": "AdmissionReview",
        "request": {
            "uid": "uid-misconfigured",
            "operation": "CREATE",
            "object": {"metadata": {"name": "svc", "namespace": "edge"}}
        }
    });

    let response = server
        .route(admission_post("/no-external-ip-load-balancers", body))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let review: v1::AdmissionReview =
        serde_json::from_value(body_json(response).await).unwrap();
    let admission = review.response.unwrap();
    assert!(!admission.allowed);
    assert!(admission
        .result
        .unwrap()
        .message
        .unwrap()
        .contains("unexpected cloud provider configuration"));
}
