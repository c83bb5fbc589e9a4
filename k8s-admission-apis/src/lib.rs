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

//! # Kubernetes Admission API for Rust
//!
//! This crate provides Rust types for the Kubernetes `admission.k8s.io`
//! API group, translated from the original Go definitions in the
//! Kubernetes project.
//!
//! ## Features
//!
//! - `AdmissionReview` / `AdmissionRequest` / `AdmissionResponse` for the
//!   `v1` and `v1beta1` wire versions
//! - Serialization support (JSON via Serde)
//! - Lossless conversion between the two wire versions
//!
//! ## Quick Start
//!
//! ```rust
//! use k8s_admission_apis::admission::v1;
//!
//! let response = v1::AdmissionResponse {
//!     uid: "705ab4f5-6393-11e8-b7cc-42010a800002".to_string(),
//!     allowed: true,
//!     ..Default::default()
//! };
//!
//! let review = v1::AdmissionReview {
//!     response: Some(response),
//!     ..Default::default()
//! };
//! assert_eq!(review.type_meta.kind.as_deref(), Some("AdmissionReview"));
//! ```

#![warn(rust_2018_idioms)]
#![warn(missing_debug_implementations)]

/// Main admission module
pub mod admission;

// Re-export for convenience
pub use admission::*;
