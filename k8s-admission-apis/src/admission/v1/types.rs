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

//! 准入 API v1 版本类型定义
//!
//! 此模块定义了 admission.k8s.io/v1 的数据结构。

use k8s_openapi::ByteString;
use serde::{Deserialize, Serialize};

// 导入外层的核心类型定义
use crate::admission::{
    GroupVersionKind,
    GroupVersionResource,
    RawExtension,
    Status,
    TypeMeta,
    UserInfo,
    UID,
};

/// Operation 是被准入控制检查的资源操作类型
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    /// 资源创建操作
    #[serde(rename = "CREATE")]
    #[default]
    Create,
    /// 资源更新操作
    #[serde(rename = "UPDATE")]
    Update,
    /// 资源删除操作
    #[serde(rename = "DELETE")]
    Delete,
    /// 资源连接操作（例如 pod exec）
    #[serde(rename = "CONNECT")]
    Connect,
}

impl Operation {
    /// 将操作转换为字符串
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

/// PatchType 标识响应中补丁文档的格式
///
/// 目前 API 只定义了 RFC 6902 的 JSONPatch 一种格式。
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

/// AdmissionRequest 描述 apiserver 发来的一次准入审查请求
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdmissionRequest {
    /// 唯一标识此准入调用的 UID，必须原样回传到响应中
    #[serde(rename = "uid", default)]
    pub uid: UID,

    /// 被提交对象的完全限定 Group/Version/Kind
    #[serde(default)]
    pub kind: GroupVersionKind,

    /// 被请求资源的完全限定 Group/Version/Resource
    #[serde(default)]
    pub resource: GroupVersionResource,

    /// 被请求的子资源（如 "status" 或 "scale"），可为空
    #[serde(rename = "subResource", skip_serializing_if = "Option::is_none")]
    pub sub_resource: Option<String>,

    /// 原始请求的 Group/Version/Kind（启用了匹配转换时与 kind 不同）
    #[serde(rename = "requestKind", skip_serializing_if = "Option::is_none")]
    pub request_kind: Option<GroupVersionKind>,

    /// 原始请求的 Group/Version/Resource
    #[serde(rename = "requestResource", skip_serializing_if = "Option::is_none")]
    pub request_resource: Option<GroupVersionResource>,

    /// 原始请求的子资源
    #[serde(rename = "requestSubResource", skip_serializing_if = "Option::is_none")]
    pub request_sub_resource: Option<String>,

    /// 被审查对象的名字，CREATE 时对象名可能尚未生成
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// 被审查对象关联的命名空间（若有）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    /// 本次请求的操作类型
    pub operation: Operation,

    /// 发起请求的已认证用户信息
    #[serde(rename = "userInfo", default)]
    pub user_info: UserInfo,

    /// 请求中的新对象，原样序列化
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object: Option<RawExtension>,

    /// 修改前的既有对象，仅 UPDATE 和 DELETE 请求填充
    #[serde(rename = "oldObject", skip_serializing_if = "Option::is_none")]
    pub old_object: Option<RawExtension>,

    /// DryRun 表示本次请求不会被持久化
    /// 注意：标记了 sideEffects == Unknown 或 Some 的 webhook 必须拒绝 dry-run 请求
    #[serde(rename = "dryRun", skip_serializing_if = "Option::is_none")]
    pub dry_run: Option<bool>,

    /// 本次操作附带的选项对象（如 meta.k8s.io/v1 CreateOptions）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<RawExtension>,
}

/// AdmissionResponse 描述一次准入审查的裁决
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdmissionResponse {
    /// 对应 AdmissionRequest 的 uid，必须一致
    #[serde(rename = "uid", default)]
    pub uid: UID,

    /// 是否允许本次准入请求
    pub allowed: bool,

    /// 拒绝时的详细结果，允许时可省略
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Status>,

    /// 补丁文档体，wire 格式为 base64 编码的 JSON Patch
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patch: Option<ByteString>,

    /// 补丁格式，当前唯一合法值是 "JSONPatch"，有补丁时必填
    #[serde(rename = "patchType", skip_serializing_if = "Option::is_none")]
    pub patch_type: Option<PatchType>,

    /// 随审计事件记录的非结构化键值对
    #[serde(
        rename = "auditAnnotations",
        skip_serializing_if = "Option::is_none"
    )]
    pub audit_annotations: Option<std::collections::BTreeMap<String, String>>,

    /// 返回给客户端的非致命警告消息列表
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub warnings: Vec<String>,
}

/// AdmissionReview 描述一次准入审查的信封
///
/// 入站方向只填 request，出站方向只填 response。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdmissionReview {
    #[serde(flatten)]
    pub type_meta: TypeMeta,

    /// 描述被审查操作的请求
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request: Option<AdmissionRequest>,

    /// 描述本次审查裁决的响应
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
