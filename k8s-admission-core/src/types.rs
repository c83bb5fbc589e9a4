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

//! 准入核心类型定义
//!
//! 此模块定义了策略接口和裁决类型。

use json_patch::Patch;
use thiserror::Error;

use k8s_admission_apis::admission::{v1, ObjectMeta};

/// 策略内部的错误
///
/// 这些错误永远不会作为传输层故障冒泡出去：
/// 调用方把它们转换成 allowed=false 的结构化拒绝响应。
#[derive(Debug, Error)]
pub enum AdmissionError {
    /// 被审查对象的负载无法解码
    #[error("object decode failed: {0}")]
    ObjectDecode(#[from] serde_json::Error),

    /// 请求中没有携带被审查对象
    #[error("admission request carries no object")]
    MissingObject,

    /// 进程配置不可用，按请求粒度上报
    #[error("{0}")]
    Configuration(String),
}

/// Verdict 是策略面向的裁决简化
///
/// 策略只表达允许/拒绝、消息和可选补丁，不关心 wire 版本；
/// 具体的 AdmissionResponse 由分发层构造。
#[derive(Debug, Clone, Default)]
pub struct Verdict {
    /// 是否允许请求
    pub allowed: bool,
    /// 给调用方看的结果消息，拒绝时必填
    pub message: Option<String>,
    /// 需要变更时的 RFC 6902 补丁，仅在允许时有意义
    pub patch: Option<Patch>,
    /// 非致命警告
    pub warnings: Vec<String>,
}

impl Verdict {
    /// 允许请求，不做变更
    pub fn allow() -> Self {
        Verdict {
            allowed: true,
            ..Default::default()
        }
    }

    /// 允许请求并附带补丁
    pub fn allow_with_patch(patch: Patch) -> Self {
        Verdict {
            allowed: true,
            patch: Some(patch),
            ..Default::default()
        }
    }

    /// 拒绝请求并说明原因
    pub fn deny(message: impl Into<String>) -> Self {
        Verdict {
            allowed: false,
            message: Some(message.into()),
            ..Default::default()
        }
    }

    /// 把策略内部错误转换成拒绝裁决
    ///
    /// 对应的约定：策略绝不允许请求在未处理的情况下通过。
    pub fn from_error(err: AdmissionError) -> Self {
        Verdict::deny(err.to_string())
    }
}

/// AdmissionPolicy 是所有准入策略实现的接口
///
/// 策略是输入的纯函数：只依据请求本身和启动时注入的只读配置做
/// 判断，不得修改输入，也不得留下任何跨请求状态。每条策略只针对
/// v1（当前）schema 编写一次，v1beta1 的入口由 `AdmitHandler` 适配。
pub trait AdmissionPolicy: Send + Sync {
    /// 策略名，用于日志和路由注册
    fn name(&self) -> &str;

    /// 对一次准入请求做出裁决
    ///
    /// 实现不允许 panic 或向上抛错：任何内部失败（对象解码失败、
    /// 配置缺失）都必须折叠成 `Verdict::deny` 返回。
    fn admit(&self, request: &v1::AdmissionRequest) -> Verdict;
}

/// 解码被审查对象的元数据存根
///
/// 策略通常只关心对象信封的 metadata 部分，负载的其余字段一律忽略。
pub fn decode_object_meta(request: &v1::AdmissionRequest) -> Result<ObjectMeta, AdmissionError> {
    #[derive(serde::Deserialize)]
    struct MetadataStub {
        #[serde(default)]
        metadata: ObjectMeta,
    }

    let object = request.object.as_ref().ok_or(AdmissionError::MissingObject)?;
    let stub: MetadataStub = object.decode()?;
    Ok(stub.metadata)
}
