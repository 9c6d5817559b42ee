//! Controller owner references
//!
//! Linking a child to its owner lets the garbage collector delete the child
//! with the owner, and lets the watcher map child events back to the owner.

use crate::error::StoreError;
use crate::object::OwnedObject;
use kube::Resource;
use tracing::debug;

/// Marks `owner` as the managing controller of `child`.
///
/// Fails when the owner has no name/uid yet, when owner and child live in
/// different namespaces, or when another controller already owns the child.
/// A reference to the same owner (by uid) is replaced instead of duplicated.
pub fn set_controller_reference<K>(owner: &K, child: &mut OwnedObject) -> Result<(), StoreError>
where
    K: Resource<DynamicType = ()>,
{
    let kind = child.kind();
    let child_name = child.name().to_string();

    let mut owner_ref = owner.controller_owner_ref(&()).ok_or_else(|| StoreError::OwnerReference {
        kind,
        name: child_name.clone(),
        reason: format!("owner {} has no name or uid", K::kind(&())),
    })?;

    let owner_ns = owner.meta().namespace.as_deref();
    if owner_ns.is_some() && owner_ns != child.namespace() {
        return Err(StoreError::OwnerReference {
            kind,
            name: child_name,
            reason: format!(
                "cross-namespace owner references are disallowed (owner in {}, child in {})",
                owner_ns.unwrap_or_default(),
                child.namespace().unwrap_or("<cluster>"),
            ),
        });
    }

    let refs = child.meta_mut().owner_references.get_or_insert_with(Vec::new);

    if let Some(existing) = refs
        .iter()
        .find(|r| r.controller == Some(true) && r.uid != owner_ref.uid)
    {
        return Err(StoreError::AlreadyOwned {
            kind,
            name: child_name,
            controller_kind: existing.kind.clone(),
            controller_name: existing.name.clone(),
        });
    }

    // Foreground deletion of the owner waits for the child
    owner_ref.block_owner_deletion = Some(true);

    refs.retain(|r| r.uid != owner_ref.uid);
    debug!(
        "Setting controller reference on {} {} -> {} {}",
        kind, child_name, owner_ref.kind, owner_ref.name
    );
    refs.push(owner_ref);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crds::{MyService, MyServiceSpec, ServiceKind};
    use k8s_openapi::api::core::v1::Service;
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::{ObjectMeta, OwnerReference};

    fn owner(uid: Option<&str>) -> MyService {
        let mut svc = MyService::new(
            "sample",
            MyServiceSpec {
                target_image: "nginx:1.25".to_string(),
                replica_count: 1,
                service_kind: ServiceKind::ClusterIP,
            },
        );
        svc.metadata.namespace = Some("default".to_string());
        svc.metadata.uid = uid.map(str::to_string);
        svc
    }

    fn child(namespace: &str) -> OwnedObject {
        OwnedObject::Service(Service {
            metadata: ObjectMeta {
                name: Some("sample".to_string()),
                namespace: Some(namespace.to_string()),
                ..Default::default()
            },
            ..Default::default()
        })
    }

    #[test]
    fn test_sets_controller_reference() {
        let mut obj = child("default");
        set_controller_reference(&owner(Some("uid-1")), &mut obj).unwrap();

        let refs = obj.meta().owner_references.clone().unwrap();
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].api_version, "webapp.my.domain/v1");
        assert_eq!(refs[0].kind, "MyService");
        assert_eq!(refs[0].name, "sample");
        assert_eq!(refs[0].uid, "uid-1");
        assert_eq!(refs[0].controller, Some(true));
        assert_eq!(refs[0].block_owner_deletion, Some(true));
    }

    #[test]
    fn test_same_owner_is_not_duplicated() {
        let mut obj = child("default");
        let o = owner(Some("uid-1"));
        set_controller_reference(&o, &mut obj).unwrap();
        set_controller_reference(&o, &mut obj).unwrap();

        assert_eq!(obj.meta().owner_references.as_ref().unwrap().len(), 1);
    }

    #[test]
    fn test_owner_without_uid_fails() {
        let mut obj = child("default");
        let err = set_controller_reference(&owner(None), &mut obj).unwrap_err();

        assert!(matches!(err, StoreError::OwnerReference { .. }));
        assert!(obj.meta().owner_references.is_none());
    }

    #[test]
    fn test_cross_namespace_owner_fails() {
        let mut obj = child("other");
        let err = set_controller_reference(&owner(Some("uid-1")), &mut obj).unwrap_err();

        assert!(matches!(err, StoreError::OwnerReference { .. }));
    }

    #[test]
    fn test_foreign_controller_fails() {
        let mut obj = child("default");
        obj.meta_mut().owner_references = Some(vec![OwnerReference {
            api_version: "apps/v1".to_string(),
            kind: "ReplicaSet".to_string(),
            name: "someone-else".to_string(),
            uid: "uid-other".to_string(),
            controller: Some(true),
            block_owner_deletion: None,
        }]);

        let err = set_controller_reference(&owner(Some("uid-1")), &mut obj).unwrap_err();
        match err {
            StoreError::AlreadyOwned { controller_kind, controller_name, .. } => {
                assert_eq!(controller_kind, "ReplicaSet");
                assert_eq!(controller_name, "someone-else");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_non_controller_refs_are_kept() {
        let mut obj = child("default");
        obj.meta_mut().owner_references = Some(vec![OwnerReference {
            api_version: "v1".to_string(),
            kind: "ConfigMap".to_string(),
            name: "settings".to_string(),
            uid: "uid-cm".to_string(),
            controller: None,
            block_owner_deletion: None,
        }]);

        set_controller_reference(&owner(Some("uid-1")), &mut obj).unwrap();
        assert_eq!(obj.meta().owner_references.as_ref().unwrap().len(), 2);
    }
}
