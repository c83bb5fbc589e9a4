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

//! 准入 API 版本转换
//!
//! 此模块提供 v1 和 v1beta1 之间的逐字段转换。两个版本共享的每个
//! 字段都原样复制，枚举字段重新打上目标版本的标记但不改变取值，
//! 因此来回转换必须逐字段还原出原值。
//!
//! 转换对合法输入是全函数：不合法的信封在解码阶段就被拒绝，
//! 不会到达这里。

use crate::admission::{v1, v1beta1};

/// 将 v1beta1 准入请求转换为 v1 准入请求
pub fn request_to_v1(r: &v1beta1::AdmissionRequest) -> v1::AdmissionRequest {
    v1::AdmissionRequest {
        uid: r.uid.clone(),
        kind: r.kind.clone(),
        resource: r.resource.clone(),
        sub_resource: r.sub_resource.clone(),
        request_kind: r.request_kind.clone(),
        request_resource: r.request_resource.clone(),
        request_sub_resource: r.request_sub_resource.clone(),
        name: r.name.clone(),
        namespace: r.namespace.clone(),
        operation: operation_to_v1(r.operation),
        user_info: r.user_info.clone(),
        object: r.object.clone(),
        old_object: r.old_object.clone(),
        dry_run: r.dry_run,
        options: r.options.clone(),
    }
}

/// 将 v1 准入请求转换为 v1beta1 准入请求
pub fn request_to_v1beta1(r: &v1::AdmissionRequest) -> v1beta1::AdmissionRequest {
    v1beta1::AdmissionRequest {
        uid: r.uid.clone(),
        kind: r.kind.clone(),
        resource: r.resource.clone(),
        sub_resource: r.sub_resource.clone(),
        request_kind: r.request_kind.clone(),
        request_resource: r.request_resource.clone(),
        request_sub_resource: r.request_sub_resource.clone(),
        name: r.name.clone(),
        namespace: r.namespace.clone(),
        operation: operation_to_v1beta1(r.operation),
        user_info: r.user_info.clone(),
        object: r.object.clone(),
        old_object: r.old_object.clone(),
        dry_run: r.dry_run,
        options: r.options.clone(),
    }
}

/// 将 v1 准入响应转换为 v1beta1 准入响应
pub fn response_to_v1beta1(r: &v1::AdmissionResponse) -> v1beta1::AdmissionResponse {
    v1beta1::AdmissionResponse {
        uid: r.uid.clone(),
        allowed: r.allowed,
        result: r.result.clone(),
        patch: r.patch.clone(),
        patch_type: r.patch_type.map(patch_type_to_v1beta1),
        audit_annotations: r.audit_annotations.clone(),
        warnings: r.warnings.clone(),
    }
}

/// 将 v1beta1 准入响应转换为 v1 准入响应
pub fn response_to_v1(r: &v1beta1::AdmissionResponse) -> v1::AdmissionResponse {
    v1::AdmissionResponse {
        uid: r.uid.clone(),
        allowed: r.allowed,
        result: r.result.clone(),
        patch: r.patch.clone(),
        patch_type: r.patch_type.map(patch_type_to_v1),
        audit_annotations: r.audit_annotations.clone(),
        warnings: r.warnings.clone(),
    }
}

fn operation_to_v1(op: v1beta1::Operation) -> v1::Operation {
    match op {
        v1beta1::Operation::Create => v1::Operation::Create,
        v1beta1::Operation::Update => v1::Operation::Update,
        v1beta1::Operation::Delete => v1::Operation::Delete,
        v1beta1::Operation::Connect => v1::Operation::Connect,
    }
}

fn operation_to_v1beta1(op: v1::Operation) -> v1beta1::Operation {
    match op {
        v1::Operation::Create => v1beta1::Operation::Create,
        v1::Operation::Update => v1beta1::Operation::Update,
        v1::Operation::Delete => v1beta1::Operation::Delete,
        v1::Operation::Connect => v1beta1::Operation::Connect,
    }
}

fn patch_type_to_v1beta1(pt: v1::PatchType) -> v1beta1::PatchType {
    match pt {
        v1::PatchType::JsonPatch => v1beta1::PatchType::JsonPatch,
    }
}

fn patch_type_to_v1(pt: v1beta1::PatchType) -> v1::PatchType {
    match pt {
        v1beta1::PatchType::JsonPatch => v1::PatchType::JsonPatch,
    }
}
