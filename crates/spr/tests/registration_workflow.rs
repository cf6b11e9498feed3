//! End-to-end registration workflow behavior
//!
//! Exercises idempotent register-or-update, fee handling, and removal
//! semantics against the in-memory chain backend.

use spr::chain::MemoryChain;
use spr::client::{BatchAggregator, ProviderResolver, RegistryGateway};
use spr::{
    Address, ProductType, ProviderRegistration, RegistrationOutcome, RegistrationService,
    ServiceOffering,
};
use std::sync::Arc;

const REGISTRY: Address = Address::from_bytes([1u8; 20]);
const ALICE: Address = Address::from_bytes([0xa1; 20]);

fn stack(chain: &MemoryChain) -> (Arc<RegistryGateway>, RegistrationService) {
    let gateway = Arc::new(RegistryGateway::new(Arc::new(chain.clone()), REGISTRY));
    (gateway.clone(), RegistrationService::new(gateway))
}

fn registration() -> ProviderRegistration {
    ProviderRegistration {
        payee: ALICE,
        name: "alice".to_string(),
        description: "cold storage".to_string(),
        product_type: ProductType::Pdp,
        offering: Some(ServiceOffering {
            service_url: "https://alice.example/api".to_string(),
            min_piece_size: 127,
            max_piece_size: 1 << 30,
            ..ServiceOffering::default()
        }),
        capabilities: vec![("region".to_string(), "eu".to_string())],
    }
}

#[tokio::test]
async fn registering_twice_never_creates_a_second_id() {
    let chain = MemoryChain::new(REGISTRY, ALICE);
    let (gateway, service) = stack(&chain);

    let first = service
        .register_or_update(&registration())
        .await
        .expect("register");
    assert!(matches!(first, RegistrationOutcome::Registered { .. }));

    // Same desired state again: the workflow routes to the update path
    // and issues no writes at all.
    let second = service
        .register_or_update(&registration())
        .await
        .expect("re-register");
    assert_eq!(second, RegistrationOutcome::Unchanged);

    assert_eq!(gateway.provider_count().await.expect("count"), 1);
    assert_eq!(
        gateway
            .get_provider_id_by_address(ALICE)
            .await
            .expect("ok"),
        Some(1)
    );
}

#[tokio::test]
async fn changed_fields_route_to_targeted_updates() {
    let chain = MemoryChain::new(REGISTRY, ALICE);
    let (gateway, service) = stack(&chain);
    service
        .register_or_update(&registration())
        .await
        .expect("register");

    // Only the description changes: one info write, no product write.
    let mut changed = registration();
    changed.description = "warm storage".to_string();
    match service.register_or_update(&changed).await.expect("update") {
        RegistrationOutcome::Updated {
            info_tx,
            product_tx,
        } => {
            assert!(info_tx.is_some());
            assert!(product_tx.is_none());
        }
        other => panic!("unexpected outcome: {other:?}"),
    }

    // Only the offering changes: no info write, one product write.
    let mut changed = changed.clone();
    changed.offering.as_mut().expect("offering").min_piece_size = 256;
    match service.register_or_update(&changed).await.expect("update") {
        RegistrationOutcome::Updated {
            info_tx,
            product_tx,
        } => {
            assert!(info_tx.is_none());
            assert!(product_tx.is_some());
        }
        other => panic!("unexpected outcome: {other:?}"),
    }

    let info = gateway
        .get_provider_by_address(ALICE)
        .await
        .expect("ok")
        .expect("present");
    assert_eq!(info.description, "warm storage");
}

#[tokio::test]
async fn update_path_adds_a_product_registered_without_one() {
    let chain = MemoryChain::new(REGISTRY, ALICE);
    let (gateway, service) = stack(&chain);

    let mut bare = registration();
    bare.offering = None;
    bare.capabilities.clear();
    service.register_or_update(&bare).await.expect("register");
    assert!(
        !gateway
            .provider_has_product(1, ProductType::Pdp)
            .await
            .expect("ok")
    );

    match service
        .register_or_update(&registration())
        .await
        .expect("update")
    {
        RegistrationOutcome::Updated { product_tx, .. } => assert!(product_tx.is_some()),
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert!(
        gateway
            .provider_has_product(1, ProductType::Pdp)
            .await
            .expect("ok")
    );
}

#[tokio::test]
async fn workflow_reads_the_current_fee_before_submitting() {
    let chain = MemoryChain::new(REGISTRY, ALICE);
    let (gateway, service) = stack(&chain);

    // Raise the fee after construction; the workflow must still succeed
    // because it reads the fee immediately before registering.
    chain.set_registration_fee(1_000_000);
    let outcome = service
        .register_or_update(&registration())
        .await
        .expect("register at the new fee");
    assert!(matches!(outcome, RegistrationOutcome::Registered { .. }));
    assert!(gateway.is_registered_provider(ALICE).await.expect("ok"));
}

#[tokio::test]
async fn removal_is_idempotent_and_deactivates() {
    let chain = MemoryChain::new(REGISTRY, ALICE);
    let (gateway, service) = stack(&chain);
    service
        .register_or_update(&registration())
        .await
        .expect("register");

    gateway.remove_provider().await.expect("first removal");
    assert!(!gateway.is_provider_active(1).await.expect("ok"));

    gateway.remove_provider().await.expect("second removal");
    assert!(!gateway.is_provider_active(1).await.expect("ok"));

    // The record survives deactivated and keeps its id.
    let info = gateway.get_provider(1).await.expect("ok").expect("present");
    assert!(!info.active);
    assert_eq!(gateway.active_provider_count().await.expect("count"), 0);
    assert_eq!(gateway.provider_count().await.expect("count"), 1);
}

#[tokio::test]
async fn removed_provider_disappears_from_listings() {
    let chain = MemoryChain::new(REGISTRY, ALICE);
    let (gateway, service) = stack(&chain);
    service
        .register_or_update(&registration())
        .await
        .expect("register");
    gateway.remove_provider().await.expect("remove");

    let resolver = ProviderResolver::new(
        gateway.clone(),
        Arc::new(BatchAggregator::new(Arc::new(chain.clone()), None)),
    );
    assert!(resolver.list_active().await.expect("list").is_empty());
    assert!(
        resolver
            .list_by_product_type(ProductType::Pdp)
            .await
            .expect("list")
            .is_empty()
    );
}

#[tokio::test]
async fn encoded_capabilities_round_trip_through_the_registry() {
    let chain = MemoryChain::new(REGISTRY, ALICE);
    let (gateway, service) = stack(&chain);
    service
        .register_or_update(&registration())
        .await
        .expect("register");

    let resolver = ProviderResolver::new(
        gateway,
        Arc::new(BatchAggregator::new(Arc::new(chain.clone()), None)),
    );
    let provider = resolver
        .get_provider_by_address(ALICE)
        .await
        .expect("ok")
        .expect("present");
    let product = provider.product(ProductType::Pdp).expect("product");

    let desired = registration();
    let offering = desired.offering.expect("offering");
    assert_eq!(product.offering, offering);
    assert_eq!(
        product.capabilities.get("region").map(String::as_str),
        Some("eu")
    );
}
