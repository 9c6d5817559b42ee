//! Objects owned by a MyService

use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::Service;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use std::fmt;

/// Kind of an owned object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    /// MyService custom resource (only ever read)
    MyService,
    /// apps/v1 Deployment
    Deployment,
    /// core/v1 Service
    Service,
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ObjectKind::MyService => "MyService",
            ObjectKind::Deployment => "Deployment",
            ObjectKind::Service => "Service",
        };
        f.write_str(s)
    }
}

/// A child object the controller creates on behalf of a MyService
#[derive(Debug, Clone, PartialEq)]
pub enum OwnedObject {
    Deployment(Deployment),
    Service(Service),
}

impl OwnedObject {
    pub fn kind(&self) -> ObjectKind {
        match self {
            OwnedObject::Deployment(_) => ObjectKind::Deployment,
            OwnedObject::Service(_) => ObjectKind::Service,
        }
    }

    pub fn meta(&self) -> &ObjectMeta {
        match self {
            OwnedObject::Deployment(d) => &d.metadata,
            OwnedObject::Service(s) => &s.metadata,
        }
    }

    pub fn meta_mut(&mut self) -> &mut ObjectMeta {
        match self {
            OwnedObject::Deployment(d) => &mut d.metadata,
            OwnedObject::Service(s) => &mut s.metadata,
        }
    }

    /// `metadata.name`, or an empty string when unset
    pub fn name(&self) -> &str {
        self.meta().name.as_deref().unwrap_or_default()
    }

    pub fn namespace(&self) -> Option<&str> {
        self.meta().namespace.as_deref()
    }
}

impl From<Deployment> for OwnedObject {
    fn from(d: Deployment) -> Self {
        OwnedObject::Deployment(d)
    }
}

impl From<Service> for OwnedObject {
    fn from(s: Service) -> Self {
        OwnedObject::Service(s)
    }
}
