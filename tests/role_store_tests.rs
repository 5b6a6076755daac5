//! Integration tests for the document-backed role store.

mod common;

use common::{init_logging, role_provider, store_options, test_role};
use tenant_identity_store::document::{InMemoryConnector, ObjectId};
use tenant_identity_store::{
    Claim, DocumentRoleStore, ErrorCode, MultiTenancyHandling, QueryableRoleStore,
    RoleClaimStore, RoleStore, StoreProvider, TenantStoreOptions,
};
use tokio_util::sync::CancellationToken;

fn store() -> DocumentRoleStore<InMemoryConnector> {
    init_logging();
    DocumentRoleStore::new(TenantStoreOptions::new(store_options()), InMemoryConnector::new())
        .expect("valid store options")
}

#[tokio::test]
async fn test_create_find_and_rename_role() {
    let store = store();
    let cancel = CancellationToken::new();

    let mut role = test_role("admin");
    assert!(store.create(&mut role, &cancel).await.unwrap().succeeded());

    let found = store.find_by_name("ADMIN", &cancel).await.unwrap().unwrap();
    assert_eq!(found.id, role.id);
    assert_eq!(store.role_id(&found, &cancel).unwrap(), role.id.to_string());

    store.set_role_name(&mut role, "administrator", &cancel).unwrap();
    store
        .set_normalized_role_name(&mut role, Some("ADMINISTRATOR"), &cancel)
        .unwrap();
    assert!(store.update(&role, &cancel).await.unwrap().succeeded());

    assert!(store.find_by_name("ADMIN", &cancel).await.unwrap().is_none());
    let renamed = store
        .find_by_id(&role.id.to_string(), &cancel)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(store.role_name(&renamed, &cancel).unwrap(), "administrator");
}

#[tokio::test]
async fn test_role_claim_round_trip() {
    let store = store();
    let cancel = CancellationToken::new();

    let mut role = test_role("admin");
    store.create(&mut role, &cancel).await.unwrap();

    let claim = Claim::new("scope", "create:user");
    store.add_claim(&mut role, claim.clone(), &cancel).unwrap();
    assert!(store.update(&role, &cancel).await.unwrap().succeeded());

    let mut stored = store
        .find_by_id(&role.id.to_string(), &cancel)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(store.claims(&stored, &cancel).unwrap(), vec![claim.clone()]);

    store.add_claim(&mut stored, claim.clone(), &cancel).unwrap();
    assert_eq!(stored.claims.len(), 1);

    // Re-adding an identical claim leaves the document unchanged
    let unchanged = store.update(&stored, &cancel).await.unwrap();
    assert!(unchanged.has_code(ErrorCode::RoleNotModified));
}

#[tokio::test]
async fn test_delete_role_and_missing_role() {
    let store = store();
    let cancel = CancellationToken::new();

    let mut role = test_role("auditor");
    store.create(&mut role, &cancel).await.unwrap();
    assert!(store.delete(&role, &cancel).await.unwrap().succeeded());

    let again = store.delete(&role, &cancel).await.unwrap();
    assert!(again.has_code(ErrorCode::RoleNotFound));
    assert_eq!(again.errors()[0].code.as_str(), "MONGO-0401");

    let mut ghost = test_role("ghost");
    ghost.id = ObjectId::new();
    let missing = store.update(&ghost, &cancel).await.unwrap();
    assert!(missing.has_code(ErrorCode::RoleNotFound));
}

#[tokio::test]
async fn test_roles_listing_is_tenant_filtered() {
    init_logging();
    let connector = InMemoryConnector::new();
    let provider = role_provider(&connector, MultiTenancyHandling::TenantField);
    let cancel = CancellationToken::new();

    let acme = provider.get_store("acme").unwrap();
    let globex = provider.get_store("globex").unwrap();

    for name in ["admin", "user"] {
        let mut role = test_role(name);
        acme.create(&mut role, &cancel).await.unwrap();
    }
    let mut role = test_role("admin");
    globex.create(&mut role, &cancel).await.unwrap();

    assert_eq!(acme.roles(&cancel).await.unwrap().len(), 2);

    let globex_roles = globex.roles(&cancel).await.unwrap();
    assert_eq!(globex_roles.len(), 1);
    assert_eq!(globex_roles[0].tenant_id.as_deref(), Some("globex"));
}
