// k8s-admission-webhooks/src/nodefaultns/mod.rs

//! 保留命名空间排除策略
//!
//! 拒绝落在保留命名空间（默认 "default"）里的任何对象：
//! 每个工作负载都应该待在自己的命名空间里，而不是 default。

use k8s_admission_apis::admission::v1;
use k8s_admission_core::{decode_object_meta, AdmissionPolicy, Verdict};

/// 插件名称
pub const PLUGIN_NAME: &str = "nodefaultns";

/// 默认的保留命名空间
pub const DEFAULT_RESERVED_NAMESPACE: &str = "default";

/// 保留命名空间排除策略
///
/// 只解码对象信封的 metadata 存根，负载其余部分一律不看。
/// 命名空间比较不区分大小写。
#[derive(Debug, Clone)]
pub struct NoReservedNamespace {
    reserved: String,
}

impl NoReservedNamespace {
    /// 用指定的保留命名空间构造策略
    pub fn new(reserved: impl Into<String>) -> Self {
        NoReservedNamespace {
            reserved: reserved.into(),
        }
    }
}

impl Default for NoReservedNamespace {
    fn default() -> Self {
        NoReservedNamespace::new(DEFAULT_RESERVED_NAMESPACE)
    }
}

impl AdmissionPolicy for NoReservedNamespace {
    fn name(&self) -> &str {
        PLUGIN_NAME
    }

    fn admit(&self, request: &v1::AdmissionRequest) -> Verdict {
        tracing::debug!(
            reserved = %self.reserved,
            "validating object is not in the reserved namespace"
        );

        let meta = match decode_object_meta(request) {
            Ok(meta) => meta,
            Err(err) => {
                tracing::error!(error = %err, "failed to decode object metadata");
                return Verdict::from_error(err);
            }
        };

        let namespace = meta.namespace.unwrap_or_default();
        if namespace.eq_ignore_ascii_case(&self.reserved) {
            Verdict::deny(format!("{} namespace not allowed", self.reserved))
        } else {
            Verdict::allow()
        }
    }
}
