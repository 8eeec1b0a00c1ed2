//! Bounded fan-out of transaction detail lookups.
//!
//! # Responsibilities
//! - Resolve a page of signatures into `TransactionRecord`s
//! - Cap the number of lookups in flight
//! - Keep every per-signature outcome, in signature order

use futures_util::stream::{self, StreamExt};

use crate::rpc::{RpcClient, RpcError, TransactionRecord};

/// A detail lookup that did not produce a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailFailure {
    pub signature: String,
    pub reason: String,
}

/// Per-item results of one fan-out, split by outcome.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetailBatch {
    /// Resolved records, in the order the signatures were given.
    pub records: Vec<TransactionRecord>,
    pub failures: Vec<DetailFailure>,
}

impl DetailBatch {
    pub fn requested(&self) -> usize {
        self.records.len() + self.failures.len()
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Look up every signature with at most `limit` requests in flight.
pub async fn fetch_details(
    client: &dyn RpcClient,
    signatures: Vec<String>,
    limit: usize,
) -> DetailBatch {
    let results: Vec<(String, Result<TransactionRecord, RpcError>)> = stream::iter(signatures)
        .map(|signature| async move {
            let result = match client.get_parsed_transaction(&signature).await {
                Ok(Some(tx)) => Ok(TransactionRecord::from_parsed(&signature, tx)),
                Ok(None) => Err(RpcError::NotFound(signature.clone())),
                Err(e) => Err(e),
            };
            (signature, result)
        })
        .buffered(limit.max(1))
        .collect()
        .await;

    let mut batch = DetailBatch::default();
    for (signature, result) in results {
        match result {
            Ok(record) => batch.records.push(record),
            Err(e) => {
                tracing::debug!(signature = %signature, error = %e, "Transaction lookup failed");
                batch.failures.push(DetailFailure {
                    signature,
                    reason: e.to_string(),
                });
            }
        }
    }
    batch
}
