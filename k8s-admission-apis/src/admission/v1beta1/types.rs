/*
Copyright 2018 The Kubernetes Authors.

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.
*/

//! 准入 API v1beta1 版本类型定义
//!
//! 与 v1 的字段集合完全相同，只是版本标签和枚举标记属于本版本。
//! 两个版本各自保留独立的类型，字段级转换见 `admission::convert`。

use k8s_openapi::ByteString;
use serde::{Deserialize, Serialize};

use crate::admission::{
    GroupVersionKind,
    GroupVersionResource,
    RawExtension,
    Status,
    TypeMeta,
    UserInfo,
    UID,
};

/// v1beta1 的资源操作类型
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    #[serde(rename = "CREATE")]
    #[default]
    Create,
    #[serde(rename = "UPDATE")]
    Update,
    #[serde(rename = "DELETE")]
    Delete,
    #[serde(rename = "CONNECT")]
    Connect,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Create => "CREATE",
            Operation::Update => "UPDATE",
            Operation::Delete => "DELETE",
            Operation::Connect => "CONNECT",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// v1beta1 的补丁格式标记
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PatchType {
    #[serde(rename = "JSONPatch")]
    JsonPatch,
}

impl PatchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatchType::JsonPatch => "JSONPatch",
        }
    }
}

/// v1beta1 的准入审查请求
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdmissionRequest {
    #[serde(rename = "uid", default)]
    pub uid: UID,

    #[serde(default)]
    pub kind: GroupVersionKind,

    #[serde(default)]
    pub resource: GroupVersionResource,

    #[serde(rename = "subResource", skip_serializing_if = "Option::is_none")]
    pub sub_resource: Option<String>,

    #[serde(rename = "requestKind", skip_serializing_if = "Option::is_none")]
    pub request_kind: Option<GroupVersionKind>,

    #[serde(rename = "requestResource", skip_serializing_if = "Option::is_none")]
    pub request_resource: Option<GroupVersionResource>,

    #[serde(rename = "requestSubResource", skip_serializing_if = "Option::is_none")]
    pub request_sub_resource: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    pub operation: Operation,

    #[serde(rename = "userInfo", default)]
    pub user_info: UserInfo,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub object: Option<RawExtension>,

    #[serde(rename = "oldObject", skip_serializing_if = "Option::is_none")]
    pub old_object: Option<RawExtension>,

    #[serde(rename = "dryRun", skip_serializing_if = "Option::is_none")]
    pub dry_run: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<RawExtension>,
}

/// v1beta1 的准入审查响应
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdmissionResponse {
    #[serde(rename = "uid", default)]
    pub uid: UID,

    pub allowed: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Status>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub patch: Option<ByteString>,

    #[serde(rename = "patchType", skip_serializing_if = "Option::is_none")]
    pub patch_type: Option<PatchType>,

    #[serde(
        rename = "auditAnnotations",
        skip_serializing_if = "Option::is_none"
    )]
    pub audit_annotations: Option<std::collections::BTreeMap<String, String>>,

    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub warnings: Vec<String>,
}

/// v1beta1 的准入审查信封
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdmissionReview {
    #[serde(flatten)]
    pub type_meta: TypeMeta,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub request: Option<AdmissionRequest>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<AdmissionResponse>,
}

impl Default for AdmissionReview {
    fn default() -> Self {
        AdmissionReview {
            type_meta: TypeMeta {
                api_version: Some(super::API_VERSION.to_string()),
                kind: Some(crate::admission::KIND_ADMISSION_REVIEW.to_string()),
            },
            request: None,
            response: None,
        }
    }
}
