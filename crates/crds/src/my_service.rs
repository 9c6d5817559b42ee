//! MyService CRD
//!
//! Declares a replicated workload plus the Service that exposes it.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(CustomResource, Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[kube(
    group = "webapp.my.domain",
    version = "v1",
    kind = "MyService",
    plural = "myservices",
    namespaced,
    status = "MyServiceStatus"
)]
#[serde(rename_all = "camelCase")]
pub struct MyServiceSpec {
    /// Container image run by the backing Deployment
    pub target_image: String,

    /// Number of pod replicas
    #[serde(default = "default_replica_count")]
    pub replica_count: i32,

    /// Type of the Service exposing the Deployment
    #[serde(default)]
    pub service_kind: ServiceKind,
}

fn default_replica_count() -> i32 {
    1
}

/// Observed state of a MyService. Nothing is reported yet.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq, Eq)]
pub struct MyServiceStatus {}

/// Kubernetes Service type
///
/// Serializes exactly as the core API spells it. `ExternalName` is not
/// offered: such a Service has no selector or ports to point at the Deployment.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, Default, PartialEq, Eq, Hash)]
pub enum ServiceKind {
    /// Cluster-internal virtual IP
    #[default]
    ClusterIP,

    /// Exposed on a static port of every node
    NodePort,

    /// Exposed through the cloud provider's load balancer
    LoadBalancer,
}

impl ServiceKind {
    /// Value used for `spec.type` on a core/v1 Service.
    pub fn as_str(self) -> &'static str {
        match self {
            ServiceKind::ClusterIP => "ClusterIP",
            ServiceKind::NodePort => "NodePort",
            ServiceKind::LoadBalancer => "LoadBalancer",
        }
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
