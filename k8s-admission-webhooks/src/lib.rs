//! Kubernetes准入策略插件
//!
//! 这个crate包含了准入 webhook 服务器的各种策略实现，包括：
//! - nodefaultns: 保留命名空间排除策略
//! - internallb: 负载均衡器内网注解策略
//!
//! 每条策略都是 `AdmissionPolicy` 的一个实现：针对 v1 schema 写一次，
//! 由核心层的 `AdmitHandler` 适配出 v1beta1 的入口。

pub mod internallb;
pub mod nodefaultns;

pub use internallb::{CloudProvider, InternalLoadBalancer};
pub use nodefaultns::NoReservedNamespace;
