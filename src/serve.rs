//! 准入请求管道
//!
//! 处理来自 apiserver 的一次准入 HTTP 调用：校验 Content-Type，
//! 两段式解码信封（先取版本标签，再解码对应的具体类型），按
//! group/version/kind 分派到处理器的对应版本入口，把请求的 uid
//! 无条件回写到响应上，最后按请求到达时的版本标签序列化回去。
//!
//! 传输层错误统一用结构化的 Status 响应体回答；策略内部的失败
//! 在更深的层次就已经折叠成 allowed=false 的合法信封，绝不会让
//! apiserver 看到一个裸的传输故障。

use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::{Body, Request, Response, StatusCode};

use k8s_admission_apis::admission::{v1, v1beta1, Status, TypeMeta, KIND_ADMISSION_REVIEW};
use k8s_admission_core::AdmitHandler;

/// 请求和响应要求的媒体类型
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// 处理 HTTP 层面的准入请求，再交给 AdmitHandler 裁决
pub async fn serve(req: Request<Body>, admit: &AdmitHandler) -> Response<Body> {
    // 1. 校验 Content-Type；媒体类型参数（如 charset）忽略
    let content_type = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let media_type = content_type.split(';').next().unwrap_or_default().trim();
    if media_type != JSON_CONTENT_TYPE {
        tracing::warn!(content_type = %content_type, "rejecting request with unexpected Content-Type");
        return status_response(
            StatusCode::BAD_REQUEST,
            format!("Content-Type={content_type}, expected {JSON_CONTENT_TYPE}"),
        );
    }

    // 2. 读取请求体
    let body = match hyper::body::to_bytes(req.into_body()).await {
        Ok(body) => body,
        Err(err) => {
            tracing::error!(error = %err, "failed to read request body");
            return status_response(
                StatusCode::BAD_REQUEST,
                format!("request body could not be read: {err}"),
            );
        }
    };
    tracing::debug!(policy = admit.policy_name(), body_len = body.len(), "handling admission request");

    // 3. 两段式解码：先只取版本标签，避免一个万能解码器
    let type_meta: TypeMeta = match serde_json::from_slice(&body) {
        Ok(meta) => meta,
        Err(err) => {
            tracing::error!(error = %err, "request could not be decoded");
            return status_response(
                StatusCode::BAD_REQUEST,
                format!("request could not be decoded: {err}"),
            );
        }
    };
    let api_version = type_meta.api_version.unwrap_or_default();
    let kind = type_meta.kind.unwrap_or_default();

    // 4. 按版本标签分派：请求是哪个版本，就回哪个版本的信封
    let serialized = match (api_version.as_str(), kind.as_str()) {
        (v1beta1::API_VERSION, KIND_ADMISSION_REVIEW) => {
            let review: v1beta1::AdmissionReview = match serde_json::from_slice(&body) {
                Ok(review) => review,
                Err(err) => {
                    // 防御分支：标签匹配后完整解码不应再失败
                    tracing::error!(error = %err, "expected a v1beta1.AdmissionReview but decoding failed");
                    return status_response(
                        StatusCode::BAD_REQUEST,
                        format!("expected a v1beta1.AdmissionReview: {err}"),
                    );
                }
            };
            let Some(request_uid) = review.request.as_ref().map(|r| r.uid.clone()) else {
                return status_response(
                    StatusCode::BAD_REQUEST,
                    "admission review contains no request".to_string(),
                );
            };

            let mut response = admit.admit_v1beta1(&review);
            // 处理器不被信任会自己回写 uid，这里无条件覆盖
            response.uid = request_uid;

            serde_json::to_vec(&v1beta1::AdmissionReview {
                type_meta: review.type_meta.clone(),
                request: None,
                response: Some(response),
            })
        }
        (v1::API_VERSION, KIND_ADMISSION_REVIEW) => {
            let review: v1::AdmissionReview = match serde_json::from_slice(&body) {
                Ok(review) => review,
                Err(err) => {
                    tracing::error!(error = %err, "expected a v1.AdmissionReview but decoding failed");
                    return status_response(
                        StatusCode::BAD_REQUEST,
                        format!("expected a v1.AdmissionReview: {err}"),
                    );
                }
            };
            let Some(request_uid) = review.request.as_ref().map(|r| r.uid.clone()) else {
                return status_response(
                    StatusCode::BAD_REQUEST,
                    "admission review contains no request".to_string(),
                );
            };

            let mut response = admit.admit_v1(&review);
            response.uid = request_uid;

            serde_json::to_vec(&v1::AdmissionReview {
                type_meta: review.type_meta.clone(),
                request: None,
                response: Some(response),
            })
        }
        _ => {
            let msg = format!("unsupported group version kind: {api_version}/{kind}");
            tracing::error!(api_version = %api_version, kind = %kind, "unsupported admission review version");
            return status_response(StatusCode::BAD_REQUEST, msg);
        }
    };

    // 5. 序列化并写回
    match serialized {
        Ok(bytes) => {
            tracing::debug!(policy = admit.policy_name(), "sending admission response");
            json_response(StatusCode::OK, bytes)
        }
        Err(err) => {
            tracing::error!(error = %err, "failed to serialize admission response");
            status_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("could not serialize response: {err}"),
            )
        }
    }
}

/// 构造带结构化 Status 体的错误响应
pub fn status_response(code: StatusCode, message: String) -> Response<Body> {
    let status = Status {
        code: Some(code.as_u16() as i32),
        ..Status::failure(message)
    };
    let bytes = serde_json::to_vec(&status).unwrap_or_else(|_| b"{}".to_vec());
    json_response(code, bytes)
}

fn json_response(code: StatusCode, bytes: Vec<u8>) -> Response<Body> {
    let mut response = Response::new(Body::from(bytes));
    *response.status_mut() = code;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
    response
}
