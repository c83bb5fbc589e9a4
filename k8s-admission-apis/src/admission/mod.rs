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

// 核心模块
mod types;

// 版本化模块
pub mod v1;
pub mod v1beta1;

// 版本转换模块
pub mod convert;

// 导出核心类型
pub use types::*;

/// API 组名常量
pub const GROUP_NAME: &str = "admission.k8s.io";

/// 信封类型的 kind 常量，两个版本共用
pub const KIND_ADMISSION_REVIEW: &str = "AdmissionReview";
