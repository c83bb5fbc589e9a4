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

//! 准入 API 公共类型定义
//!
//! 此模块定义了 v1 和 v1beta1 两个版本共用的数据结构。

use k8s_openapi::api::authentication::v1 as authnv1;
use serde::{Deserialize, Serialize};

// ========== 自定义核心类型（因为 k8s-openapi 0.21.1 缺少这些类型） ==========

/// TypeMeta 描述一个对象的类型信息
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypeMeta {
    #[serde(rename = "apiVersion", skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// GroupVersionKind 标识一个 kind
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupVersionKind {
    #[serde(default)]
    pub group: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub kind: String,
}

impl GroupVersionKind {
    pub fn new(group: &str, version: &str, kind: &str) -> Self {
        Self {
            group: group.to_string(),
            version: version.to_string(),
            kind: kind.to_string(),
        }
    }
}

/// GroupVersionResource 标识一个资源
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupVersionResource {
    #[serde(default)]
    pub group: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub resource: String,
}

impl GroupVersionResource {
    pub fn new(group: &str, version: &str, resource: &str) -> Self {
        Self {
            group: group.to_string(),
            version: version.to_string(),
            resource: resource.to_string(),
        }
    }
}

/// Status 是返回调用者错误的类型
///
/// 准入响应在拒绝请求时通过 `result` 字段携带此结构，
/// HTTP 边界的传输错误也用它构造结构化的错误响应体。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Status {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<i32>,
}

impl Status {
    /// 用一条消息构造失败状态
    pub fn failure(message: impl Into<String>) -> Self {
        Status {
            status: Some("Failure".to_string()),
            message: Some(message.into()),
            reason: None,
            code: None,
        }
    }
}

/// ObjectMeta 是被审查对象元数据的部分映射
///
/// 准入策略只需要读取对象信封的少数元数据字段，
/// 其余负载按原样忽略，所以这里刻意不是完整的 apimachinery ObjectMeta。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "generateName", skip_serializing_if = "Option::is_none")]
    pub generate_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(rename = "uid", skip_serializing_if = "Option::is_none")]
    pub uid: Option<UID>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<std::collections::BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotations: Option<std::collections::BTreeMap<String, String>>,
}

/// RawExtension 携带原样保留的序列化对象
///
/// 对应 apimachinery 的 runtime.RawExtension：请求中被审查的对象
/// 不做解码地透传给策略，由策略自行按需解码。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawExtension(pub serde_json::Value);

impl RawExtension {
    /// 将携带的 JSON 解码为具体类型
    pub fn decode<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.0.clone())
    }
}

impl From<serde_json::Value> for RawExtension {
    fn from(value: serde_json::Value) -> Self {
        RawExtension(value)
    }
}

/// UID 类型
pub type UID = String;

pub type UserInfo = authnv1::UserInfo;
