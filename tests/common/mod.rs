//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

pub const ADDRESS: &str = "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA";

/// What the mock node answers to one JSON-RPC call.
#[allow(dead_code)]
pub enum Reply {
    Result(Value),
    Error { code: i64, message: String },
    Status(u16),
    Raw(String),
    Delay(Duration, Box<Reply>),
}

/// A recorded JSON-RPC call.
#[derive(Debug, Clone)]
pub struct Call {
    pub method: String,
    pub params: Value,
}

pub struct MockRpcNode {
    pub addr: SocketAddr,
    calls: Arc<Mutex<Vec<Call>>>,
}

#[allow(dead_code)]
impl MockRpcNode {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, method: &str) -> usize {
        self.calls().iter().filter(|c| c.method == method).count()
    }
}

/// Start a programmable JSON-RPC node on an ephemeral port.
pub async fn start_rpc_node<F>(handler: F) -> MockRpcNode
where
    F: Fn(&str, &Value) -> Reply + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let calls = Arc::new(Mutex::new(Vec::new()));
    let handler = Arc::new(handler);

    {
        let calls = calls.clone();
        tokio::spawn(async move {
            loop {
                match listener.accept().await {
                    Ok((socket, _)) => {
                        let handler = handler.clone();
                        let calls = calls.clone();
                        tokio::spawn(async move {
                            serve(socket, handler.as_ref(), &calls).await;
                        });
                    }
                    Err(_) => break,
                }
            }
        });
    }

    MockRpcNode { addr, calls }
}

async fn serve<F>(mut socket: TcpStream, handler: &F, calls: &Mutex<Vec<Call>>)
where
    F: Fn(&str, &Value) -> Reply,
{
    let Some(body) = read_request_body(&mut socket).await else {
        return;
    };
    let request: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    let method = request["method"].as_str().unwrap_or_default().to_string();
    let params = request["params"].clone();
    let id = request["id"].clone();

    calls.lock().unwrap().push(Call {
        method: method.clone(),
        params: params.clone(),
    });

    let mut reply = handler(&method, &params);
    while let Reply::Delay(delay, inner) = reply {
        tokio::time::sleep(delay).await;
        reply = *inner;
    }

    let (status, body) = match reply {
        Reply::Result(result) => (200, json!({"jsonrpc": "2.0", "id": id, "result": result}).to_string()),
        Reply::Error { code, message } => (
            200,
            json!({"jsonrpc": "2.0", "id": id, "error": {"code": code, "message": message}}).to_string(),
        ),
        Reply::Status(code) => (code, String::new()),
        Reply::Raw(text) => (200, text),
        Reply::Delay(..) => unreachable!(),
    };

    let status_text = match status {
        200 => "200 OK",
        429 => "429 Too Many Requests",
        500 => "500 Internal Server Error",
        502 => "502 Bad Gateway",
        503 => "503 Service Unavailable",
        _ => "500 Internal Server Error",
    };
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status_text,
        body.len(),
        body
    );
    let _ = socket.write_all(response.as_bytes()).await;
    let _ = socket.shutdown().await;
}

async fn read_request_body(socket: &mut TcpStream) -> Option<Vec<u8>> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let headers = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let content_length = headers
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    Some(buf[header_end..].to_vec())
}

/// `getTransaction` result for a signature.
#[allow(dead_code)]
pub fn transaction(signature: &str, slot: u64, block_time: Option<i64>) -> Value {
    json!({
        "slot": slot,
        "blockTime": block_time,
        "meta": { "err": null, "fee": 5000 },
        "transaction": {
            "signatures": [signature],
            "message": { "accountKeys": [], "instructions": [] }
        }
    })
}

/// `getSignaturesForAddress` result for a list of signatures.
#[allow(dead_code)]
pub fn signature_page(signatures: &[&str]) -> Value {
    Value::Array(
        signatures
            .iter()
            .enumerate()
            .map(|(i, sig)| {
                json!({
                    "signature": sig,
                    "slot": 1000 - i as u64,
                    "err": null,
                    "memo": null,
                    "blockTime": null,
                    "confirmationStatus": "finalized"
                })
            })
            .collect(),
    )
}

/// `getBalance` result.
#[allow(dead_code)]
pub fn balance(lamports: u64) -> Value {
    json!({ "context": { "slot": 1 }, "value": lamports })
}
