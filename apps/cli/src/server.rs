//! Newline-delimited JSON-RPC 2.0 tool server on stdin/stdout.
//!
//! Requests are handled one at a time, in arrival order. Messages without an
//! `id` are notifications and get no response.

use std::sync::Arc;

use color_eyre::eyre::Result;
use folio_core::{ArchiveIndex, call_tool, definitions};
use serde_json::{Value, json};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};

/// Protocol revision reported in the `initialize` handshake.
const PROTOCOL_VERSION: &str = "2024-11-05";

/// JSON-RPC "method not found".
const METHOD_NOT_FOUND: i64 = -32601;

pub(crate) struct Server {
    index: Arc<ArchiveIndex>,
    name: String,
}

impl Server {
    pub(crate) fn new(index: Arc<ArchiveIndex>, name: String) -> Self {
        Self { index, name }
    }

    /// Serve until stdin closes.
    pub(crate) async fn run_stdio(&self) -> Result<()> {
        info!(server = %self.name, "serving on stdio");
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut stdout = tokio::io::stdout();

        while let Some(line) = lines.next_line().await? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let message: Value = match serde_json::from_str(line) {
                Ok(message) => message,
                Err(e) => {
                    warn!(error = %e, "skipping malformed message");
                    continue;
                }
            };
            let Some(response) = self.handle(message).await else {
                continue;
            };

            let mut bytes = serde_json::to_vec(&response)?;
            bytes.push(b'\n');
            stdout.write_all(&bytes).await?;
            stdout.flush().await?;
        }

        info!("stdin closed, shutting down");
        Ok(())
    }

    /// Response for one message, or `None` for notifications.
    pub(crate) async fn handle(&self, message: Value) -> Option<Value> {
        let id = message.get("id").filter(|id| !id.is_null())?.clone();
        let method = message
            .get("method")
            .and_then(Value::as_str)
            .unwrap_or_default();
        let params = message.get("params").cloned().unwrap_or(Value::Null);
        debug!(method, "request");

        let outcome = match method {
            "initialize" => Ok(self.initialize()),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(json!({ "tools": definitions() })),
            "tools/call" => Ok(self.call(&params).await),
            other => Err(json!({
                "code": METHOD_NOT_FOUND,
                "message": format!("Unknown method: {other}"),
            })),
        };

        Some(match outcome {
            Ok(result) => json!({ "jsonrpc": "2.0", "id": id, "result": result }),
            Err(error) => json!({ "jsonrpc": "2.0", "id": id, "error": error }),
        })
    }

    fn initialize(&self) -> Value {
        json!({
            "protocolVersion": PROTOCOL_VERSION,
            "serverInfo": {
                "name": self.name,
                "version": env!("CARGO_PKG_VERSION"),
            },
            "capabilities": { "tools": {} },
        })
    }

    /// Run the tool off the async runtime; the first call may build the index.
    async fn call(&self, params: &Value) -> Value {
        let name = params
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let arguments = params.get("arguments").cloned().unwrap_or(Value::Null);

        let index = Arc::clone(&self.index);
        let text = match tokio::task::spawn_blocking(move || call_tool(&index, &name, &arguments)).await
        {
            Ok(text) => text,
            Err(e) => format!("Error: {e}"),
        };
        json!({ "content": [{ "type": "text", "text": text }] })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::fs;

    use folio_shared::ArchiveSettings;

    use super::*;

    fn server(root: &std::path::Path) -> Server {
        let dir = root.join("Design-Notes-1a2b");
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join("design-notes.html"),
            "<article><h1>Design Notes For Busy Teams</h1><p>a workflow for ux work</p></article>",
        )
        .unwrap();

        let index = ArchiveIndex::new(ArchiveSettings {
            root: root.to_path_buf(),
            finished: HashSet::from(["Design-Notes-1a2b".to_string()]),
        });
        Server::new(Arc::new(index), "folio-test".into())
    }

    #[tokio::test]
    async fn notifications_get_no_response() {
        let dir = tempfile::tempdir().unwrap();
        let server = server(dir.path());
        let reply = server
            .handle(json!({ "jsonrpc": "2.0", "method": "notifications/initialized" }))
            .await;
        assert!(reply.is_none());
    }

    #[tokio::test]
    async fn initialize_reports_server_name() {
        let dir = tempfile::tempdir().unwrap();
        let server = server(dir.path());
        let reply = server
            .handle(json!({ "jsonrpc": "2.0", "id": 1, "method": "initialize" }))
            .await
            .unwrap();
        assert_eq!(reply["id"], 1);
        assert_eq!(reply["result"]["serverInfo"]["name"], "folio-test");
        assert_eq!(reply["result"]["protocolVersion"], PROTOCOL_VERSION);
    }

    #[tokio::test]
    async fn lists_every_tool() {
        let dir = tempfile::tempdir().unwrap();
        let server = server(dir.path());
        let reply = server
            .handle(json!({ "jsonrpc": "2.0", "id": "a", "method": "tools/list" }))
            .await
            .unwrap();
        let tools = reply["result"]["tools"].as_array().unwrap();
        assert_eq!(tools.len(), 10);
        assert!(tools.iter().all(|t| t["inputSchema"]["type"] == "object"));
    }

    #[tokio::test]
    async fn calls_return_text_content() {
        let dir = tempfile::tempdir().unwrap();
        let server = server(dir.path());
        let reply = server
            .handle(json!({
                "jsonrpc": "2.0",
                "id": 2,
                "method": "tools/call",
                "params": { "name": "get_chapter_content", "arguments": { "chapter_id": "Design-Notes-1a2b" } }
            }))
            .await
            .unwrap();
        let text = reply["result"]["content"][0]["text"].as_str().unwrap();
        assert!(text.starts_with("# Design Notes For Busy Teams\n"));
        assert!(text.contains("**Status:** Finished"));

        let reply = server
            .handle(json!({
                "jsonrpc": "2.0",
                "id": 3,
                "method": "tools/call",
                "params": { "name": "rewrite_history" }
            }))
            .await
            .unwrap();
        assert_eq!(
            reply["result"]["content"][0]["text"],
            "Error: Unknown tool 'rewrite_history'"
        );
    }

    #[tokio::test]
    async fn unknown_methods_are_rpc_errors() {
        let dir = tempfile::tempdir().unwrap();
        let server = server(dir.path());
        let reply = server
            .handle(json!({ "jsonrpc": "2.0", "id": 4, "method": "resources/list" }))
            .await
            .unwrap();
        assert_eq!(reply["error"]["code"], METHOD_NOT_FOUND);
        assert!(reply.get("result").is_none());
    }
}
