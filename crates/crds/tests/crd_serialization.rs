use crds::{MyService, MyServiceSpec, ServiceKind};
use kube::CustomResourceExt;
use serde_json::json;

#[test]
fn spec_uses_camel_case_fields() {
    let spec = MyServiceSpec {
        target_image: "nginx:1.25".into(),
        replica_count: 2,
        service_kind: ServiceKind::NodePort,
    };
    let j = serde_json::to_value(&spec).unwrap();
    assert_eq!(
        j,
        json!({"targetImage": "nginx:1.25", "replicaCount": 2, "serviceKind": "NodePort"})
    );
}

#[test]
fn spec_defaults_replicas_and_service_kind() {
    let spec: MyServiceSpec = serde_json::from_value(json!({"targetImage": "nginx"})).unwrap();
    assert_eq!(spec.replica_count, 1);
    assert_eq!(spec.service_kind, ServiceKind::ClusterIP);
}

#[test]
fn spec_requires_target_image() {
    let res = serde_json::from_value::<MyServiceSpec>(json!({"replicaCount": 3}));
    assert!(res.is_err());
}

#[test]
fn unknown_service_kind_is_rejected() {
    let res = serde_json::from_value::<MyServiceSpec>(
        json!({"targetImage": "nginx", "serviceKind": "Headless"}),
    );
    assert!(res.is_err());
}

#[test]
fn crd_identity() {
    let crd = MyService::crd();
    assert_eq!(crd.metadata.name.as_deref(), Some("myservices.webapp.my.domain"));
    assert_eq!(crd.spec.group, "webapp.my.domain");
    assert_eq!(crd.spec.names.kind, "MyService");
    assert_eq!(crd.spec.scope, "Namespaced");
    assert_eq!(crd.spec.versions.len(), 1);
    assert_eq!(crd.spec.versions[0].name, "v1");
    let subresources = crd.spec.versions[0].subresources.as_ref().unwrap();
    assert!(subresources.status.is_some());
}

#[test]
fn service_kind_matches_core_api_spelling() {
    assert_eq!(ServiceKind::ClusterIP.as_str(), "ClusterIP");
    assert_eq!(ServiceKind::LoadBalancer.to_string(), "LoadBalancer");
    assert_eq!(serde_json::to_value(ServiceKind::NodePort).unwrap(), json!("NodePort"));
}

#[test]
fn external_name_service_kind_is_rejected() {
    let res = serde_json::from_value::<MyServiceSpec>(
        json!({"targetImage": "nginx", "serviceKind": "ExternalName"}),
    );
    assert!(res.is_err());

    let crd = serde_json::to_string(&MyService::crd()).unwrap();
    assert!(crd.contains("LoadBalancer"));
    assert!(!crd.contains("ExternalName"));
}
