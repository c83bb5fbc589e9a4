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

//! Kubernetes准入控制核心模块
//!
//! 此crate提供了准入 webhook 的版本无关核心，包括：
//! - 策略接口：每条准入规则只针对 v1 schema 实现一次
//! - 裁决类型：允许/拒绝加可选补丁的简化表达
//! - 版本分发：同一个策略同时服务 v1 和 v1beta1 两个 wire 版本
//!
//! # 示例
//! ```
//! use std::sync::Arc;
//! use k8s_admission_apis::admission::v1;
//! use k8s_admission_core::{AdmissionPolicy, AdmitHandler, Verdict};
//!
//! struct AllowEverything;
//!
//! impl AdmissionPolicy for AllowEverything {
//!     fn name(&self) -> &str {
//!         "allow-everything"
//!     }
//!
//!     fn admit(&self, _request: &v1::AdmissionRequest) -> Verdict {
//!         Verdict::allow()
//!     }
//! }
//!
//! let handler = AdmitHandler::delegate_to_v1(Arc::new(AllowEverything));
//! let review = v1::AdmissionReview {
//!     request: Some(v1::AdmissionRequest {
//!         uid: "abc".to_string(),
//!         ..Default::default()
//!     }),
//!     ..Default::default()
//! };
//! assert!(handler.admit_v1(&review).allowed);
//! ```

// 公开的模块
pub mod handler;
pub mod types;

// 重新导出常用类型
pub use handler::{response_from_verdict, AdmitHandler};
pub use types::{decode_object_meta, AdmissionError, AdmissionPolicy, Verdict};
