//! End-to-end resolution behavior over the in-memory chain backend
//!
//! Exercises the resolver's pagination, the aggregated/sequential
//! strategy equivalence, per-call failure isolation, and the documented
//! example scenario of a provider advertising a partial capability set.

use spr::chain::wire::{ProductPayload, RegistryCall};
use spr::chain::MemoryChain;
use spr::client::{BatchAggregator, ProviderResolver, RegistryGateway};
use spr::ports::ChainClient;
use spr::{Address, ProductType, ServiceProvider};
use std::sync::Arc;

const REGISTRY: Address = Address::from_bytes([1u8; 20]);
const AGGREGATOR: Address = Address::from_bytes([2u8; 20]);
const OPERATOR: Address = Address::from_bytes([0xee; 20]);

fn provider_address(i: u8) -> Address {
    let mut bytes = [0u8; 20];
    bytes[0] = 0xaa;
    bytes[19] = i;
    Address::from_bytes(bytes)
}

/// Registry with `count` active providers; every odd id also carries a
/// verifiable-storage product
async fn seeded_chain(count: u8) -> MemoryChain {
    let chain = MemoryChain::new(REGISTRY, OPERATOR).with_aggregator(AGGREGATOR);
    for i in 1..=count {
        let sender = chain.with_sender(provider_address(i));
        let initial_product = (i % 2 == 1).then(|| ProductPayload {
            product_type: ProductType::Pdp,
            capability_keys: vec!["serviceURL".to_string()],
            capability_values: vec![format!("https://provider-{i}.example")],
        });
        let call = RegistryCall::RegisterProvider {
            payee: provider_address(i),
            name: format!("provider-{i}"),
            description: String::new(),
            initial_product,
        }
        .to_call(REGISTRY)
        .expect("encode");
        sender.send(call, 0).await.expect("register");
    }
    chain
}

fn resolver_over(chain: &MemoryChain, aggregator: Option<Address>) -> ProviderResolver {
    let chain: Arc<dyn spr::ports::ChainClient> = Arc::new(chain.clone());
    let gateway = Arc::new(RegistryGateway::new(chain.clone(), REGISTRY));
    let batch = Arc::new(BatchAggregator::new(chain, aggregator));
    ProviderResolver::new(gateway, batch)
}

fn ids(providers: &[ServiceProvider]) -> Vec<u64> {
    providers.iter().map(|p| p.info.id).collect()
}

#[tokio::test]
async fn listing_spans_pages_and_preserves_order() {
    let chain = seeded_chain(12).await;
    let resolver = resolver_over(&chain, Some(AGGREGATOR))
        .with_page_size(5)
        .expect("page size");

    let providers = resolver.list_active().await.expect("list");
    assert_eq!(ids(&providers), (1..=12).collect::<Vec<u64>>());

    // Odd ids carry the product, even ids resolve productless.
    for provider in &providers {
        let has_product = provider.product(ProductType::Pdp).is_some();
        assert_eq!(has_product, provider.info.id % 2 == 1, "id {}", provider.info.id);
    }
}

#[tokio::test]
async fn unconfigured_aggregator_falls_back_to_identical_results() {
    let chain = seeded_chain(9).await;
    let aggregated = resolver_over(&chain, Some(AGGREGATOR))
        .with_page_size(4)
        .expect("page size");
    let sequential_only = resolver_over(&chain, None)
        .with_page_size(4)
        .expect("page size");

    let baseline = aggregated.list_active().await.expect("aggregated");
    let degraded = sequential_only.list_active().await.expect("fallback");
    assert_eq!(baseline, degraded);
}

#[tokio::test]
async fn failing_aggregator_endpoint_falls_back_to_identical_results() {
    let chain = seeded_chain(7).await;
    // Point the batch aggregator at an address where nothing is
    // deployed: every aggregated round trip errors and the resolver
    // must degrade per page.
    let broken = resolver_over(&chain, Some(Address::from_bytes([0x99; 20])))
        .with_page_size(3)
        .expect("page size");
    let baseline = resolver_over(&chain, Some(AGGREGATOR))
        .with_page_size(3)
        .expect("page size");

    let expected = baseline.list_active().await.expect("aggregated");
    let degraded = broken.list_active().await.expect("fallback");
    assert_eq!(expected, degraded);
}

#[tokio::test]
async fn product_type_listing_filters_inactive_providers() {
    let chain = seeded_chain(6).await;
    // Provider 3 removes itself: it stays in the registry (id retained)
    // but must not appear in any listing.
    chain
        .with_sender(provider_address(3))
        .send(
            RegistryCall::RemoveProvider.to_call(REGISTRY).expect("encode"),
            0,
        )
        .await
        .expect("remove");

    let resolver = resolver_over(&chain, Some(AGGREGATOR));
    let providers = resolver
        .list_by_product_type(ProductType::Pdp)
        .await
        .expect("list");
    assert_eq!(ids(&providers), vec![1, 5]);
    assert!(providers.iter().all(|p| p.info.active));
}

#[tokio::test]
async fn listing_matches_repeated_single_page_fetches() {
    let chain = seeded_chain(11).await;
    let resolver = resolver_over(&chain, Some(AGGREGATOR))
        .with_page_size(4)
        .expect("page size");
    let gateway = RegistryGateway::new(Arc::new(chain.clone()), REGISTRY);

    let mut expected = Vec::new();
    let mut offset = 0;
    loop {
        let page = gateway
            .get_all_active_providers(offset, 4)
            .await
            .expect("page");
        expected.extend(page.ids.iter().copied());
        if !page.has_more {
            break;
        }
        offset += 4;
    }

    let providers = resolver.list_active().await.expect("list");
    assert_eq!(ids(&providers), expected);
}

#[tokio::test]
async fn partial_capability_set_decodes_with_zero_defaults() {
    // The documented scenario: provider id 7 advertises three
    // capability pairs and no location; the typed offering must decode
    // without error, defaulting the absent keys.
    let chain = seeded_chain(6).await;
    let seventh = chain.with_sender(provider_address(7));
    let call = RegistryCall::RegisterProvider {
        payee: provider_address(7),
        name: "provider-7".to_string(),
        description: String::new(),
        initial_product: Some(ProductPayload {
            product_type: ProductType::Pdp,
            capability_keys: vec![
                "serviceURL".to_string(),
                "minPieceSizeInBytes".to_string(),
                "maxPieceSizeInBytes".to_string(),
            ],
            capability_values: vec![
                "https://x".to_string(),
                "127".to_string(),
                "34091302912".to_string(),
            ],
        }),
    }
    .to_call(REGISTRY)
    .expect("encode");
    seventh.send(call, 0).await.expect("register");

    let resolver = resolver_over(&chain, Some(AGGREGATOR));
    let provider = resolver
        .get_provider(7)
        .await
        .expect("no error")
        .expect("present");
    let product = provider.product(ProductType::Pdp).expect("product");

    assert!(product.is_active);
    assert_eq!(product.offering.service_url, "https://x");
    assert_eq!(product.offering.min_piece_size, 127);
    assert_eq!(product.offering.max_piece_size, 34_091_302_912);
    assert_eq!(product.offering.location, "");
    assert_eq!(product.offering.storage_price_per_tib_per_month, 0);
}

#[tokio::test]
async fn absent_ids_resolve_to_none() {
    let chain = seeded_chain(2).await;
    let resolver = resolver_over(&chain, Some(AGGREGATOR));
    assert!(resolver.get_provider(0).await.expect("ok").is_none());
    assert!(resolver.get_provider(40).await.expect("ok").is_none());
    assert!(
        resolver
            .get_provider_by_address(Address::from_bytes([0x42; 20]))
            .await
            .expect("ok")
            .is_none()
    );
}

#[tokio::test]
async fn empty_registry_lists_empty() {
    let chain = MemoryChain::new(REGISTRY, OPERATOR).with_aggregator(AGGREGATOR);
    let resolver = resolver_over(&chain, Some(AGGREGATOR));
    assert!(resolver.list_active().await.expect("list").is_empty());
    assert!(
        resolver
            .list_by_product_type(ProductType::Pdp)
            .await
            .expect("list")
            .is_empty()
    );
}
