//! Derived objects built from a MyService spec.
//!
//! Both objects share the MyService's name and namespace and select pods by
//! the `app=<name>` label.

use crate::error::ControllerError;
use crds::MyService;
use k8s_openapi::api::apps::v1::{Deployment, DeploymentSpec};
use k8s_openapi::api::core::v1::{
    Container, ContainerPort, PodSpec, PodTemplateSpec, Service, ServicePort, ServiceSpec,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, ObjectMeta};
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use std::collections::BTreeMap;

/// Name of the single container in the pod template
pub const CONTAINER_NAME: &str = "myservice";
/// Port the container listens on and the Service exposes
pub const HTTP_PORT: i32 = 80;
/// Label key shared by selector, pod template and Service
pub const APP_LABEL: &str = "app";

fn identity(my_service: &MyService) -> Result<(&str, &str), ControllerError> {
    let name = my_service
        .metadata
        .name
        .as_deref()
        .ok_or(ControllerError::MissingObjectKey(".metadata.name"))?;
    let namespace = my_service
        .metadata
        .namespace
        .as_deref()
        .ok_or(ControllerError::MissingObjectKey(".metadata.namespace"))?;
    Ok((name, namespace))
}

/// `{app: <name>}`
pub fn selector_labels(name: &str) -> BTreeMap<String, String> {
    BTreeMap::from([(APP_LABEL.to_string(), name.to_string())])
}

/// Deployment running `replicaCount` copies of `targetImage` on port 80
pub fn build_deployment(my_service: &MyService) -> Result<Deployment, ControllerError> {
    let (name, namespace) = identity(my_service)?;
    let labels = selector_labels(name);

    Ok(Deployment {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            ..Default::default()
        },
        spec: Some(DeploymentSpec {
            replicas: Some(my_service.spec.replica_count),
            selector: LabelSelector {
                match_labels: Some(labels.clone()),
                ..Default::default()
            },
            template: PodTemplateSpec {
                metadata: Some(ObjectMeta {
                    labels: Some(labels),
                    ..Default::default()
                }),
                spec: Some(PodSpec {
                    containers: vec![Container {
                        name: CONTAINER_NAME.to_string(),
                        image: Some(my_service.spec.target_image.clone()),
                        ports: Some(vec![ContainerPort {
                            container_port: HTTP_PORT,
                            ..Default::default()
                        }]),
                        ..Default::default()
                    }],
                    ..Default::default()
                }),
            },
            ..Default::default()
        }),
        ..Default::default()
    })
}

/// Service of `serviceKind` forwarding port 80 to the pods' port 80
pub fn build_service(my_service: &MyService) -> Result<Service, ControllerError> {
    let (name, namespace) = identity(my_service)?;

    Ok(Service {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            ..Default::default()
        },
        spec: Some(ServiceSpec {
            type_: Some(my_service.spec.service_kind.as_str().to_string()),
            selector: Some(selector_labels(name)),
            ports: Some(vec![ServicePort {
                name: Some("http".to_string()),
                port: HTTP_PORT,
                target_port: Some(IntOrString::Int(HTTP_PORT)),
                ..Default::default()
            }]),
            ..Default::default()
        }),
        ..Default::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::create_test_my_service;
    use crds::ServiceKind;

    #[test]
    fn test_deployment_shape() {
        let svc = create_test_my_service("sample", "default", "nginx:1.25", 2, ServiceKind::ClusterIP);
        let deployment = build_deployment(&svc).unwrap();

        assert_eq!(deployment.metadata.name.as_deref(), Some("sample"));
        assert_eq!(deployment.metadata.namespace.as_deref(), Some("default"));

        let spec = deployment.spec.unwrap();
        assert_eq!(spec.replicas, Some(2));
        assert_eq!(spec.selector.match_labels, Some(selector_labels("sample")));

        let template = spec.template;
        assert_eq!(template.metadata.unwrap().labels, Some(selector_labels("sample")));
        let containers = template.spec.unwrap().containers;
        assert_eq!(containers.len(), 1);
        assert_eq!(containers[0].name, "myservice");
        assert_eq!(containers[0].image.as_deref(), Some("nginx:1.25"));
        let ports = containers[0].ports.clone().unwrap();
        assert_eq!(ports.len(), 1);
        assert_eq!(ports[0].container_port, 80);
    }

    #[test]
    fn test_service_shape() {
        let svc = create_test_my_service("sample", "default", "nginx:1.25", 2, ServiceKind::NodePort);
        let service = build_service(&svc).unwrap();

        assert_eq!(service.metadata.name.as_deref(), Some("sample"));
        let spec = service.spec.unwrap();
        assert_eq!(spec.type_.as_deref(), Some("NodePort"));
        assert_eq!(spec.selector, Some(selector_labels("sample")));
        let ports = spec.ports.unwrap();
        assert_eq!(ports.len(), 1);
        assert_eq!(ports[0].name.as_deref(), Some("http"));
        assert_eq!(ports[0].port, 80);
        assert_eq!(ports[0].target_port, Some(IntOrString::Int(80)));
    }

    #[test]
    fn test_missing_namespace_is_an_error() {
        let mut svc = create_test_my_service("sample", "default", "nginx", 1, ServiceKind::ClusterIP);
        svc.metadata.namespace = None;

        assert!(matches!(
            build_deployment(&svc),
            Err(ControllerError::MissingObjectKey(".metadata.namespace"))
        ));
        assert!(build_service(&svc).is_err());
    }
}
