//! Scripted in-memory RPC double for sync tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::rpc::{
    Address, ParsedTransaction, RpcClient, RpcError, RpcResult, SignatureInfo, TransactionBody,
};

pub const ADDRESS: &str = "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA";
pub const OTHER_ADDRESS: &str = "Vote111111111111111111111111111111111111111";

pub fn address() -> Address {
    ADDRESS.parse().unwrap()
}

pub fn other_address() -> Address {
    OTHER_ADDRESS.parse().unwrap()
}

pub fn signature(sig: &str) -> SignatureInfo {
    SignatureInfo {
        signature: sig.to_string(),
        slot: 0,
        err: None,
        memo: None,
        block_time: None,
        confirmation_status: Some("confirmed".to_string()),
    }
}

pub fn parsed(sig: &str, slot: u64, block_time: Option<i64>) -> ParsedTransaction {
    ParsedTransaction {
        slot,
        block_time,
        transaction: TransactionBody {
            signatures: vec![sig.to_string()],
        },
    }
}

pub struct ScriptedRpc {
    balances: Mutex<HashMap<String, RpcResult<u64>>>,
    signatures: Mutex<RpcResult<Vec<SignatureInfo>>>,
    details: Mutex<HashMap<String, RpcResult<Option<ParsedTransaction>>>>,
    detail_delay: Mutex<Duration>,
    balance_gate: Mutex<Option<Arc<Notify>>>,
    signature_gate: Mutex<Option<Arc<Notify>>>,
    pub balance_calls: AtomicUsize,
    pub signature_calls: AtomicUsize,
    pub detail_calls: AtomicUsize,
    in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
}

impl ScriptedRpc {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            balances: Mutex::new(HashMap::new()),
            signatures: Mutex::new(Ok(Vec::new())),
            details: Mutex::new(HashMap::new()),
            detail_delay: Mutex::new(Duration::ZERO),
            balance_gate: Mutex::new(None),
            signature_gate: Mutex::new(None),
            balance_calls: AtomicUsize::new(0),
            signature_calls: AtomicUsize::new(0),
            detail_calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        })
    }

    pub fn set_balance(&self, address: &Address, result: RpcResult<u64>) {
        self.balances
            .lock()
            .unwrap()
            .insert(address.to_string(), result);
    }

    pub fn set_signatures(&self, result: RpcResult<Vec<SignatureInfo>>) {
        *self.signatures.lock().unwrap() = result;
    }

    pub fn set_detail(&self, sig: &str, result: RpcResult<Option<ParsedTransaction>>) {
        self.details.lock().unwrap().insert(sig.to_string(), result);
    }

    pub fn set_detail_delay(&self, delay: Duration) {
        *self.detail_delay.lock().unwrap() = delay;
    }

    /// Hold the next balance call until the returned notifier fires.
    pub fn gate_next_balance(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.balance_gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    /// Hold the next signature page call until the returned notifier fires.
    /// The page is read before waiting.
    pub fn gate_next_signatures(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.signature_gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    pub fn total_calls(&self) -> usize {
        self.balance_calls.load(Ordering::SeqCst)
            + self.signature_calls.load(Ordering::SeqCst)
            + self.detail_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RpcClient for ScriptedRpc {
    async fn get_balance(&self, address: &Address) -> RpcResult<u64> {
        self.balance_calls.fetch_add(1, Ordering::SeqCst);
        let result = self
            .balances
            .lock()
            .unwrap()
            .get(address.as_str())
            .cloned()
            .unwrap_or(Ok(0));
        let gate = self.balance_gate.lock().unwrap().take();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        result
    }

    async fn get_signatures_for_address(
        &self,
        _address: &Address,
        _limit: Option<usize>,
    ) -> RpcResult<Vec<SignatureInfo>> {
        self.signature_calls.fetch_add(1, Ordering::SeqCst);
        let result = self.signatures.lock().unwrap().clone();
        let gate = self.signature_gate.lock().unwrap().take();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        result
    }

    async fn get_parsed_transaction(&self, sig: &str) -> RpcResult<Option<ParsedTransaction>> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let delay = *self.detail_delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.details
            .lock()
            .unwrap()
            .get(sig)
            .cloned()
            .unwrap_or_else(|| Err(RpcError::Transport(format!("no script for {sig}"))))
    }
}
