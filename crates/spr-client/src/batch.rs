//! Batch Aggregator
//!
//! Packs independent read-only calls into one aggregated network round
//! trip. The defining property, and what distinguishes this from a
//! sequential loop, is per-call failure isolation: a reverting slot is
//! reported as a `success == false` outcome and never aborts its
//! siblings. Errors from [`BatchAggregator::try_aggregate`] itself are
//! reserved for aggregator-unavailable conditions - no aggregator
//! contract on the active network, or the aggregation round trip
//! failing as a whole.

use spr_chain::wire;
use spr_domain::ports::{Call, CallOutcome, ChainClient};
use spr_domain::{Address, Error, Result};
use std::sync::Arc;

/// Executes many reads as one aggregated call with per-slot isolation
pub struct BatchAggregator {
    chain: Arc<dyn ChainClient>,
    aggregator: Option<Address>,
}

impl BatchAggregator {
    /// Create an aggregator client; `aggregator` is the aggregation
    /// contract's address on the active network, when one exists
    pub fn new(chain: Arc<dyn ChainClient>, aggregator: Option<Address>) -> Self {
        Self { chain, aggregator }
    }

    /// Whether an aggregator contract is configured at all
    pub fn is_available(&self) -> bool {
        self.aggregator.is_some()
    }

    /// Execute `calls` in one round trip, returning index-aligned
    /// outcomes
    ///
    /// Individual call failures are captured in their outcome slot and
    /// never escalate; an `Err` here means the aggregation itself could
    /// not run.
    pub async fn try_aggregate(&self, calls: Vec<Call>) -> Result<Vec<CallOutcome>> {
        let target = self.aggregator.ok_or_else(|| {
            Error::aggregation_unavailable("no aggregator contract configured for the active network")
        })?;
        if calls.is_empty() {
            return Ok(Vec::new());
        }

        let data = wire::encode_aggregate(&calls)?;
        let raw = self.chain.call(Call { target, data }).await?;
        let outcomes = wire::decode_aggregate_return(&raw)?;
        if outcomes.len() != calls.len() {
            return Err(Error::registry_call(format!(
                "aggregator answered {} slots for {} calls",
                outcomes.len(),
                calls.len()
            )));
        }
        Ok(outcomes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spr_chain::wire::RegistryCall;
    use spr_chain::MemoryChain;

    const REGISTRY: Address = Address::from_bytes([1u8; 20]);
    const AGGREGATOR: Address = Address::from_bytes([2u8; 20]);
    const ALICE: Address = Address::from_bytes([0xa1; 20]);

    #[tokio::test]
    async fn missing_aggregator_is_unavailable_not_a_call_error() {
        let chain = Arc::new(MemoryChain::new(REGISTRY, ALICE));
        let batch = BatchAggregator::new(chain, None);
        assert!(!batch.is_available());
        let err = batch
            .try_aggregate(vec![
                RegistryCall::GetProvider { id: 1 }
                    .to_call(REGISTRY)
                    .expect("encode"),
            ])
            .await
            .expect_err("must fail");
        assert!(matches!(err, Error::AggregationUnavailable { .. }));
    }

    #[tokio::test]
    async fn outcomes_align_with_calls() {
        let chain = MemoryChain::new(REGISTRY, ALICE).with_aggregator(AGGREGATOR);
        let batch = BatchAggregator::new(Arc::new(chain), Some(AGGREGATOR));

        // Slot 0 succeeds (sentinel read), slot 1 reverts (combined read
        // of a nonexistent provider); the failure stays in its slot.
        let outcomes = batch
            .try_aggregate(vec![
                RegistryCall::GetProvider { id: 1 }
                    .to_call(REGISTRY)
                    .expect("encode"),
                RegistryCall::GetProviderWithProduct {
                    id: 1,
                    product_type: spr_domain::ProductType::Pdp,
                }
                .to_call(REGISTRY)
                .expect("encode"),
            ])
            .await
            .expect("aggregation runs");
        assert_eq!(outcomes.len(), 2);
        assert!(outcomes[0].success);
        assert!(!outcomes[1].success);
    }

    #[tokio::test]
    async fn empty_batch_short_circuits() {
        let chain = MemoryChain::new(REGISTRY, ALICE).with_aggregator(AGGREGATOR);
        let batch = BatchAggregator::new(Arc::new(chain), Some(AGGREGATOR));
        assert!(batch.try_aggregate(Vec::new()).await.expect("ok").is_empty());
    }
}
