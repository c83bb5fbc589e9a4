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

//! 准入版本分发
//!
//! 每条策略只针对 v1 schema 实现一次，这里把它包装成同时服务
//! v1 和 v1beta1 两个 wire 版本的处理器对：v1beta1 入口先把请求
//! 向下转换成 v1，调用策略，再把响应向上转换回 v1beta1。这是
//! 一次性的适配，不是继承体系。

use std::sync::Arc;

use k8s_openapi::ByteString;

use k8s_admission_apis::admission::{convert, v1, v1beta1, Status};

use crate::types::{AdmissionPolicy, Verdict};

/// 把裁决构造成 v1 准入响应
///
/// 这里同时强制执行补丁不变量：补丁只会出现在允许的响应上，
/// 拒绝裁决里即使带着补丁也会被丢弃。
pub fn response_from_verdict(verdict: &Verdict) -> v1::AdmissionResponse {
    let mut response = v1::AdmissionResponse {
        allowed: verdict.allowed,
        warnings: verdict.warnings.clone(),
        ..Default::default()
    };

    if let Some(message) = &verdict.message {
        response.result = Some(Status::failure(message.clone()));
    }

    if verdict.allowed {
        if let Some(patch) = &verdict.patch {
            match serde_json::to_vec(patch) {
                Ok(bytes) => {
                    response.patch = Some(ByteString(bytes));
                    response.patch_type = Some(v1::PatchType::JsonPatch);
                }
                Err(err) => {
                    // 编码失败宁可拒绝也不放行一个半成品变更
                    tracing::error!(error = %err, "failed to encode admission patch");
                    response.allowed = false;
                    response.result =
                        Some(Status::failure(format!("failed to encode patch: {err}")));
                }
            }
        }
    }

    response
}

/// AdmitHandler 把一个 v1 策略同时暴露为两个版本的处理入口
///
/// 对应注册约定：每个 webhook 注册时都必须能处理 v1 和 v1beta1
/// 两种请求路径，而策略本身永远不会写第二遍。
#[derive(Clone)]
pub struct AdmitHandler {
    policy: Arc<dyn AdmissionPolicy>,
}

impl AdmitHandler {
    /// 用一个 v1 策略构造出双版本处理器
    pub fn delegate_to_v1(policy: Arc<dyn AdmissionPolicy>) -> Self {
        AdmitHandler { policy }
    }

    /// 被包装策略的名字
    pub fn policy_name(&self) -> &str {
        self.policy.name()
    }

    /// v1 入口：策略原样调用
    pub fn admit_v1(&self, review: &v1::AdmissionReview) -> v1::AdmissionResponse {
        let Some(request) = &review.request else {
            return v1::AdmissionResponse {
                allowed: false,
                result: Some(Status::failure("admission review contains no request")),
                ..Default::default()
            };
        };

        let verdict = self.policy.admit(request);
        let mut response = response_from_verdict(&verdict);
        response.uid = request.uid.clone();
        response
    }

    /// v1beta1 入口：向下转换、调用策略、再向上转换
    pub fn admit_v1beta1(&self, review: &v1beta1::AdmissionReview) -> v1beta1::AdmissionResponse {
        let Some(request) = &review.request else {
            return v1beta1::AdmissionResponse {
                allowed: false,
                result: Some(Status::failure("admission review contains no request")),
                ..Default::default()
            };
        };

        let converted = convert::request_to_v1(request);
        let verdict = self.policy.admit(&converted);
        let mut response = response_from_verdict(&verdict);
        response.uid = request.uid.clone();
        convert::response_to_v1beta1(&response)
    }
}

impl std::fmt::Debug for AdmitHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdmitHandler")
            .field("policy", &self.policy.name())
            .finish()
    }
}
