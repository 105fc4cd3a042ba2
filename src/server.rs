//! Line-delimited JSON-RPC 2.0 server exposing the tools, prompts and the
//! CSV index resource using Model Context Protocol method names.
//!
//! One request per input line, one response per output line. Requests without
//! an `id` are notifications and never get a response.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::{
    analyst::{CSV_INDEX_URI, CsvAnalyst, tool_definitions},
    prompts::{self, PROMPTS},
};

pub const PROTOCOL_VERSION: &str = "2024-11-05";
pub const SERVER_NAME: &str = "CSV Analyst";

const PARSE_ERROR: i64 = -32700;
const INVALID_REQUEST: i64 = -32600;
const METHOD_NOT_FOUND: i64 = -32601;
const INVALID_PARAMS: i64 = -32602;
const INTERNAL_ERROR: i64 = -32603;

#[derive(Debug, Deserialize)]
struct Request {
    method: String,
    #[serde(default)]
    params: Option<Value>,
}

#[derive(Debug, Serialize, PartialEq)]
struct RpcError {
    code: i64,
    message: String,
}

impl RpcError {
    fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Serves requests from `input` until EOF.
pub fn serve<R, W>(analyst: &CsvAnalyst, input: R, mut output: W) -> Result<()>
where
    R: BufRead,
    W: Write,
{
    info!(
        "Serving CSV tools for {:?} over stdio",
        analyst.root().path()
    );
    let mut handled = 0usize;
    for line in input.lines() {
        let line = line.context("Reading request line")?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Some(response) = handle_line(analyst, trimmed) {
            serde_json::to_writer(&mut output, &response).context("Writing response")?;
            output.write_all(b"\n")?;
            output.flush()?;
        }
        handled += 1;
    }
    info!("Input closed after {} message(s)", handled);
    Ok(())
}

/// Handles one raw request line; `None` for notifications.
pub fn handle_line(analyst: &CsvAnalyst, line: &str) -> Option<Value> {
    let raw: Value = match serde_json::from_str(line) {
        Ok(value) => value,
        Err(err) => {
            warn!("Discarding unparseable request: {err}");
            return Some(error_response(
                Value::Null,
                RpcError::new(PARSE_ERROR, format!("Parse error: {err}")),
            ));
        }
    };
    let request: Request = match serde_json::from_value(raw.clone()) {
        Ok(request) => request,
        Err(err) => {
            warn!("Rejecting malformed request: {err}");
            let id = raw.get("id").cloned().unwrap_or(Value::Null);
            return Some(error_response(
                id,
                RpcError::new(INVALID_REQUEST, format!("Invalid request: {err}")),
            ));
        }
    };
    let id = match raw.get("id") {
        None => {
            debug!("Notification '{}'", request.method);
            return None;
        }
        Some(Value::Null) => {
            warn!("Rejecting '{}' with a null id", request.method);
            return Some(error_response(
                Value::Null,
                RpcError::new(INVALID_REQUEST, "Invalid request: id must not be null"),
            ));
        }
        Some(id) => id.clone(),
    };
    let params = match request.params {
        Some(Value::Object(map)) => map,
        _ => Map::new(),
    };
    let response = match dispatch(analyst, &request.method, &params) {
        Ok(result) => json!({"jsonrpc": "2.0", "id": id, "result": result}),
        Err(err) => error_response(id, err),
    };
    Some(response)
}

fn dispatch(
    analyst: &CsvAnalyst,
    method: &str,
    params: &Map<String, Value>,
) -> Result<Value, RpcError> {
    debug!("Dispatching '{}'", method);
    match method {
        "initialize" => Ok(json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {"tools": {}, "prompts": {}, "resources": {}},
            "serverInfo": {"name": SERVER_NAME, "version": env!("CARGO_PKG_VERSION")}
        })),
        "ping" => Ok(json!({})),
        "tools/list" => Ok(json!({"tools": tool_definitions()})),
        "tools/call" => {
            let name = str_param(params, "name")?;
            let arguments = object_param(params, "arguments")?;
            Ok(tool_result(analyst, name, &arguments))
        }
        "prompts/list" => Ok(json!({"prompts": PROMPTS})),
        "prompts/get" => {
            let name = str_param(params, "name")?;
            let arguments = object_param(params, "arguments")?;
            let text = prompts::render(name, &arguments)
                .map_err(|err| RpcError::new(INVALID_PARAMS, err.to_string()))?;
            let description = PROMPTS
                .iter()
                .find(|spec| spec.name == name)
                .map(|spec| spec.description)
                .unwrap_or_default();
            Ok(json!({
                "description": description,
                "messages": [{"role": "user", "content": {"type": "text", "text": text}}]
            }))
        }
        "resources/list" => Ok(json!({
            "resources": [{
                "uri": CSV_INDEX_URI,
                "name": "csv_index",
                "description": "CSV files available in the data directory",
                "mimeType": "text/plain"
            }]
        })),
        "resources/read" => {
            let uri = str_param(params, "uri")?;
            if uri != CSV_INDEX_URI {
                return Err(RpcError::new(
                    INVALID_PARAMS,
                    format!("Unknown resource '{uri}'"),
                ));
            }
            let text = analyst
                .csv_index()
                .map_err(|err| RpcError::new(INTERNAL_ERROR, err.to_string()))?;
            Ok(json!({
                "contents": [{"uri": CSV_INDEX_URI, "mimeType": "text/plain", "text": text}]
            }))
        }
        other => Err(RpcError::new(
            METHOD_NOT_FOUND,
            format!("Method not found: {other}"),
        )),
    }
}

/// Tool failures are results flagged `isError`, not protocol errors.
fn tool_result(analyst: &CsvAnalyst, name: &str, arguments: &Map<String, Value>) -> Value {
    match analyst.call_tool(name, arguments) {
        Ok(value) => {
            let text = serde_json::to_string_pretty(&value).unwrap_or_default();
            let structured = match value {
                Value::Object(_) => value,
                other => json!({"result": other}),
            };
            json!({
                "content": [{"type": "text", "text": text}],
                "structuredContent": structured,
                "isError": false
            })
        }
        Err(err) => {
            warn!("Tool '{}' failed: {}", name, err);
            json!({
                "content": [{"type": "text", "text": format!("{}: {}", err.kind(), err)}],
                "isError": true
            })
        }
    }
}

fn str_param<'a>(params: &'a Map<String, Value>, key: &str) -> Result<&'a str, RpcError> {
    params
        .get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| RpcError::new(INVALID_PARAMS, format!("Missing string param '{key}'")))
}

fn object_param(params: &Map<String, Value>, key: &str) -> Result<Map<String, Value>, RpcError> {
    match params.get(key) {
        None | Some(Value::Null) => Ok(Map::new()),
        Some(Value::Object(map)) => Ok(map.clone()),
        Some(_) => Err(RpcError::new(
            INVALID_PARAMS,
            format!("Param '{key}' must be an object"),
        )),
    }
}

fn error_response(id: Value, error: RpcError) -> Value {
    json!({"jsonrpc": "2.0", "id": id, "error": error})
}
