// k8s-admission-webhooks/src/internallb/mod.rs

//! 负载均衡器内网注解策略
//!
//! 确保 LoadBalancer 类型的 Service 带着所在云厂商的"内网负载均衡"
//! 注解，从而不会分配公网 IP。注解缺失或取值不对时返回补丁修正，
//! 已经正确时原样放行。
//!
//! 三种变更各用一种 JSON Patch 形态：RFC 6902 的 add 不能落在
//! 不存在的父路径上，所以整个 annotations 映射缺失、单个键缺失、
//! 键值错误必须分别用整映射 add、单键 add、单键 replace 处理。

use json_patch::jsonptr::PointerBuf;
use json_patch::{AddOperation, Patch, PatchOperation, ReplaceOperation};
use serde_json::Value;

use k8s_admission_apis::admission::v1;
use k8s_admission_core::{decode_object_meta, AdmissionError, AdmissionPolicy, Verdict};

/// 插件名称
pub const PLUGIN_NAME: &str = "internallb";

// AWS 内网负载均衡注解
const AWS_INTERNAL_LB_ANNOTATION: &str = "service.beta.kubernetes.io/aws-load-balancer-scheme";
const AWS_INTERNAL_LB_VALUE: &str = "internal";

// Azure 内网负载均衡注解
const AZURE_INTERNAL_LB_ANNOTATION: &str =
    "service.beta.kubernetes.io/azure-load-balancer-internal";
const AZURE_INTERNAL_LB_VALUE: &str = "true";

// GCP/GKE 内网负载均衡注解
const GCP_INTERNAL_LB_ANNOTATION: &str = "networking.gke.io/load-balancer-type";
const GCP_INTERNAL_LB_VALUE: &str = "internal";

/// 支持的云厂商
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CloudProvider {
    Aws,
    Azure,
    Gcp,
}

impl CloudProvider {
    /// 不区分大小写地解析配置值
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "aws" => Some(CloudProvider::Aws),
            "azure" => Some(CloudProvider::Azure),
            "gcp" => Some(CloudProvider::Gcp),
            _ => None,
        }
    }

    /// 本厂商的内网负载均衡注解键值对
    pub fn internal_lb_annotation(&self) -> (&'static str, &'static str) {
        match self {
            CloudProvider::Aws => (AWS_INTERNAL_LB_ANNOTATION, AWS_INTERNAL_LB_VALUE),
            CloudProvider::Azure => (AZURE_INTERNAL_LB_ANNOTATION, AZURE_INTERNAL_LB_VALUE),
            CloudProvider::Gcp => (GCP_INTERNAL_LB_ANNOTATION, GCP_INTERNAL_LB_VALUE),
        }
    }
}

/// 负载均衡器内网注解策略
///
/// 配置在构造时注入一次，之后请求路径上只读。无法识别的厂商
/// 不会让进程崩溃：配置错误以拒绝响应的形式按请求上报。
#[derive(Debug, Clone)]
pub struct InternalLoadBalancer {
    provider: Option<CloudProvider>,
    configured: String,
}

impl InternalLoadBalancer {
    /// 用配置的云厂商标识构造策略
    pub fn new(cloud_provider: &str) -> Self {
        let provider = CloudProvider::parse(cloud_provider);
        if provider.is_none() {
            tracing::warn!(
                configured = %cloud_provider,
                "unexpected cloud provider configuration, requests will be denied"
            );
        }
        InternalLoadBalancer {
            provider,
            configured: cloud_provider.to_string(),
        }
    }

    fn configuration_error(&self) -> AdmissionError {
        AdmissionError::Configuration(format!(
            "unexpected cloud provider configuration: got [{}], expected one of [aws, azure, gcp]",
            self.configured
        ))
    }
}

impl AdmissionPolicy for InternalLoadBalancer {
    fn name(&self) -> &str {
        PLUGIN_NAME
    }

    fn admit(&self, request: &v1::AdmissionRequest) -> Verdict {
        tracing::debug!("testing load balancer for public IP addresses");

        let Some(provider) = self.provider else {
            let err = self.configuration_error();
            tracing::error!(error = %err, "cloud provider is not configured");
            return Verdict::from_error(err);
        };

        let meta = match decode_object_meta(request) {
            Ok(meta) => meta,
            Err(err) => {
                tracing::error!(error = %err, "failed to decode object metadata");
                return Verdict::from_error(err);
            }
        };

        let (key, value) = provider.internal_lb_annotation();
        let annotations = meta.annotations.unwrap_or_default();

        if annotations.is_empty() {
            return Verdict::allow_with_patch(add_annotations_map_patch(key, value));
        }
        match annotations.get(key) {
            None => Verdict::allow_with_patch(add_annotation_patch(key, value)),
            Some(current) if current != value => {
                Verdict::allow_with_patch(replace_annotation_patch(key, value))
            }
            Some(_) => Verdict::allow(),
        }
    }
}

/// 对象完全没有注解时，add 整个 annotations 映射
fn add_annotations_map_patch(key: &str, value: &str) -> Patch {
    let mut annotations = serde_json::Map::new();
    annotations.insert(key.to_string(), Value::String(value.to_string()));
    Patch(vec![PatchOperation::Add(AddOperation {
        path: annotations_pointer(None),
        value: Value::Object(annotations),
    })])
}

/// 注解映射已存在但缺少目标键时，add 单个键
fn add_annotation_patch(key: &str, value: &str) -> Patch {
    Patch(vec![PatchOperation::Add(AddOperation {
        path: annotations_pointer(Some(key)),
        value: Value::String(value.to_string()),
    })])
}

/// 目标键取值不对时，replace 单个键
fn replace_annotation_patch(key: &str, value: &str) -> Patch {
    Patch(vec![PatchOperation::Replace(ReplaceOperation {
        path: annotations_pointer(Some(key)),
        value: Value::String(value.to_string()),
    })])
}

/// 构造指向注解映射或其中某个键的 JSON Pointer
///
/// 注解键里的 `/` 和 `~` 按 RFC 6901 转义成 `~1` 和 `~0`。
fn annotations_pointer(key: Option<&str>) -> PointerBuf {
    let pointer = match key {
        None => "/metadata/annotations".to_string(),
        Some(key) => {
            let escaped = key.replace('~', "~0").replace('/', "~1");
            format!("/metadata/annotations/{escaped}")
        }
    };
    PointerBuf::parse(pointer).expect("escaped annotation path is a valid JSON pointer")
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_admission_apis::admission::RawExtension;
    use serde_json::json;
    use std::collections::BTreeMap;

    fn service_with_annotations(annotations: &BTreeMap<String, String>) -> Value {
        let mut metadata = json!({"name": "ingress-lb", "namespace": "edge"});
        if !annotations.is_empty() {
            metadata["annotations"] = serde_json::to_value(annotations).unwrap();
        }
        json!({
            "apiVersion": "v1",
            "kind": "Service",
            "metadata": metadata,
            "spec": {"type": "LoadBalancer"}
        })
    }

    fn admit_service(policy: &InternalLoadBalancer, object: &Value) -> Verdict {
        let request = v1::AdmissionRequest {
            object: Some(RawExtension(object.clone())),
            ..Default::default()
        };
        policy.admit(&request)
    }

    /// 应用裁决里的补丁并返回最终的注解映射
    fn annotations_after(verdict: &Verdict, object: &Value) -> BTreeMap<String, String> {
        let mut patched = object.clone();
        if let Some(patch) = &verdict.patch {
            json_patch::patch(&mut patched, &patch.0).unwrap();
        }
        serde_json::from_value(patched["metadata"]["annotations"].clone()).unwrap()
    }

    fn map(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_annotation_outcomes_per_provider() {
        for (provider, key, value) in [
            ("aws", AWS_INTERNAL_LB_ANNOTATION, AWS_INTERNAL_LB_VALUE),
            ("azure", AZURE_INTERNAL_LB_ANNOTATION, AZURE_INTERNAL_LB_VALUE),
            ("gcp", GCP_INTERNAL_LB_ANNOTATION, GCP_INTERNAL_LB_VALUE),
        ] {
            let policy = InternalLoadBalancer::new(provider);
            let test_cases = [
                // 完全没有注解：add 整个映射
                (map(&[]), map(&[(key, value)])),
                // 有别的注解但缺目标键：add 单键，别的键不动
                (
                    map(&[("unrelated.example.com/internal", "false")]),
                    map(&[("unrelated.example.com/internal", "false"), (key, value)]),
                ),
                // 目标键取值错误：replace
                (map(&[(key, "false")]), map(&[(key, value)])),
                // 已经正确：不变
                (map(&[(key, value)]), map(&[(key, value)])),
            ];

            for (initial, expected) in test_cases {
                let object = service_with_annotations(&initial);
                let verdict = admit_service(&policy, &object);
                assert!(verdict.allowed, "provider {provider}: must allow");
                assert_eq!(
                    annotations_after(&verdict, &object),
                    expected,
                    "provider {provider}, initial {initial:?}"
                );
            }
        }
    }

    #[test]
    fn test_distinct_patch_operations() {
        let policy = InternalLoadBalancer::new("azure");
        let key = AZURE_INTERNAL_LB_ANNOTATION;

        // 无注解 -> 对整个映射的 add
        let verdict = admit_service(&policy, &service_with_annotations(&map(&[])));
        let patch = verdict.patch.unwrap();
        assert!(matches!(
            &patch.0[0],
            PatchOperation::Add(op) if op.path.to_string() == "/metadata/annotations"
        ));

        // 缺键 -> 对单键的 add，路径里的 / 必须转义
        let verdict = admit_service(
            &policy,
            &service_with_annotations(&map(&[("team", "payments")])),
        );
        let patch = verdict.patch.unwrap();
        assert!(matches!(
            &patch.0[0],
            PatchOperation::Add(op)
                if op.path.to_string()
                    == "/metadata/annotations/service.beta.kubernetes.io~1azure-load-balancer-internal"
        ));

        // 值错误 -> replace
        let verdict =
            admit_service(&policy, &service_with_annotations(&map(&[(key, "false")])));
        let patch = verdict.patch.unwrap();
        assert!(matches!(&patch.0[0], PatchOperation::Replace(_)));

        // 已正确 -> 无补丁
        let verdict =
            admit_service(&policy, &service_with_annotations(&map(&[(key, "true")])));
        assert!(verdict.patch.is_none());
    }

    #[test]
    fn test_unconfigured_provider_denies() {
        for configured in ["", "digitalocean"] {
            let policy = InternalLoadBalancer::new(configured);
            let verdict = admit_service(&policy, &service_with_annotations(&map(&[])));
            assert!(!verdict.allowed);
            assert!(verdict
                .message
                .unwrap()
                .contains("unexpected cloud provider configuration"));
        }
    }

    #[test]
    fn test_provider_parse_is_case_insensitive() {
        assert_eq!(CloudProvider::parse("AWS"), Some(CloudProvider::Aws));
        assert_eq!(CloudProvider::parse("Azure"), Some(CloudProvider::Azure));
        assert_eq!(CloudProvider::parse("gcp"), Some(CloudProvider::Gcp));
        assert_eq!(CloudProvider::parse("on-prem"), None);
    }

    #[test]
    fn test_malformed_object_is_denied() {
        let policy = InternalLoadBalancer::new("aws");
        let request = v1::AdmissionRequest {
            object: Some(RawExtension(json!({"metadata": []}))),
            ..Default::default()
        };
        let verdict = policy.admit(&request);
        assert!(!verdict.allowed);
        assert!(!verdict.message.unwrap_or_default().is_empty());
    }
}
