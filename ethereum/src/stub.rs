//! A json-rpc node answering from a table of canned replies, for tests.

use std::{
	collections::{HashMap, VecDeque},
	sync::{Arc, Mutex},
};

use serde_json::{json, Value};
use tokio::{
	io::{AsyncReadExt, AsyncWriteExt},
	net::{TcpListener, TcpStream},
};

type Replies = Arc<Mutex<HashMap<String, VecDeque<Value>>>>;

pub fn ok(result: Value) -> Value {
	json!({ "result": result })
}

pub fn rpc_error(message: &str) -> Value {
	json!({ "error": { "code": -32000, "message": message } })
}

/// Replies per method are used in order, the last one keeps answering.
pub struct RpcNode {
	pub url: String,
	calls: Arc<Mutex<Vec<(String, Value)>>>,
}

impl RpcNode {
	pub async fn start(replies: Vec<(&str, Vec<Value>)>) -> Self {
		let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
		let url = format!("http://{}", listener.local_addr().unwrap());
		let replies: Replies = Arc::new(Mutex::new(
			replies.into_iter().map(|(m, r)| (m.to_owned(), r.into())).collect(),
		));
		let calls = Arc::new(Mutex::new(vec![]));

		let (r, c) = (replies.clone(), calls.clone());
		tokio::spawn(async move {
			loop {
				let (socket, _) = listener.accept().await.unwrap();
				tokio::spawn(serve(socket, r.clone(), c.clone()));
			}
		});
		RpcNode { url, calls }
	}

	pub fn methods(&self) -> Vec<String> {
		self.calls.lock().unwrap().iter().map(|(m, _)| m.clone()).collect()
	}

	pub fn params(&self, method: &str) -> Vec<Value> {
		self.calls
			.lock()
			.unwrap()
			.iter()
			.filter(|(m, _)| m == method)
			.map(|(_, p)| p.clone())
			.collect()
	}
}

async fn serve(mut socket: TcpStream, replies: Replies, calls: Arc<Mutex<Vec<(String, Value)>>>) {
	// one request at a time, the connection may be kept alive by the client
	while let Some(body) = read_body(&mut socket).await {
		let request: Value = serde_json::from_slice(&body).unwrap();
		let method = request["method"].as_str().unwrap_or_default().to_owned();
		calls.lock().unwrap().push((method.clone(), request["params"].clone()));

		let mut reply = {
			let mut replies = replies.lock().unwrap();
			match replies.get_mut(&method) {
				Some(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
				Some(queue) if !queue.is_empty() => queue[0].clone(),
				_ => json!({ "error": { "code": -32601, "message": format!("method {} not found", method) } }),
			}
		};
		reply["jsonrpc"] = json!("2.0");
		reply["id"] = request["id"].clone();

		let reply = reply.to_string();
		let response = format!(
			"HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{}",
			reply.len(),
			reply
		);
		if socket.write_all(response.as_bytes()).await.is_err() {
			break
		}
	}
}

async fn read_body(socket: &mut TcpStream) -> Option<Vec<u8>> {
	let mut buf = Vec::new();
	let mut chunk = [0u8; 4096];
	loop {
		let n = socket.read(&mut chunk).await.ok()?;
		if n == 0 {
			return None
		}
		buf.extend_from_slice(&chunk[..n]);
		let head_end = match buf.windows(4).position(|w| w == b"\r\n\r\n") {
			Some(p) => p + 4,
			None => continue,
		};
		let head = String::from_utf8_lossy(&buf[..head_end]).to_lowercase();
		let len = head
			.lines()
			.find_map(|l| l.strip_prefix("content-length:"))
			.and_then(|v| v.trim().parse::<usize>().ok())
			.unwrap_or(0);
		if buf.len() >= head_end + len {
			return Some(buf[head_end..head_end + len].to_vec())
		}
	}
}
