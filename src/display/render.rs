//! Text rendering of the dashboard.

use chrono::{Local, TimeZone};

use crate::rpc::TransactionRecord;
use crate::sync::{Balance, DisplayState, SyncStatus};
use crate::wallet::WalletSession;

pub const DISCONNECTED_PROMPT: &str = "Please connect your wallet to view details.";

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// `"2.34 SOL"`.
pub fn format_balance(balance: &Balance) -> String {
    format!("{} SOL", balance)
}

/// Block time in local time, or `N/A` when the node did not report one.
pub fn format_block_time(block_time: Option<i64>) -> String {
    block_time
        .and_then(|secs| Local.timestamp_opt(secs, 0).single())
        .map(|time| time.format(TIME_FORMAT).to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

pub fn format_record(record: &TransactionRecord) -> String {
    format!(
        "Signature: {}\nSlot: {}\nBlock Time: {}",
        record.signature,
        record.slot,
        format_block_time(record.block_time)
    )
}

fn status_note(status: &SyncStatus) -> Option<String> {
    match status {
        SyncStatus::Syncing => Some("(refreshing)".to_string()),
        SyncStatus::Failed { reason } => Some(format!("(stale: {})", reason)),
        SyncStatus::Idle | SyncStatus::Synced => None,
    }
}

/// Render the whole dashboard for `session`.
///
/// A disconnected session always shows the prompt, whatever `state` holds.
pub fn render_dashboard(session: &WalletSession, state: &DisplayState) -> String {
    let Some(address) = session.ready_address() else {
        return DISCONNECTED_PROMPT.to_string();
    };

    let mut out = String::from("Wallet Overview\n");
    out.push_str(&format!("Wallet Address: {}\n", address));

    out.push_str(&format!("Balance: {}", format_balance(&state.balance.value)));
    if let Some(note) = status_note(&state.balance.status) {
        out.push_str(&format!(" {}", note));
    }
    out.push('\n');

    out.push_str("\nTransaction History");
    if let Some(note) = status_note(&state.transactions.status) {
        out.push_str(&format!(" {}", note));
    }
    out.push('\n');

    if state.transactions.value.is_empty() {
        out.push_str("No transactions.\n");
    }
    for record in &state.transactions.value {
        out.push_str(&format!("\n{}\n", format_record(record)));
    }
    out
}
