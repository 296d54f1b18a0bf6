//! Built-in tools: file I/O, JSON helpers, and HTTP requests.

use crate::error::{Result, ToolError};
use crate::tool::{Tool, ToolRegistry};
use serde_json::{json, Map, Value};

fn require_str(tool: &str, args: &Value, key: &str) -> Result<String> {
    args.get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| ToolError::invalid_arguments(tool, format!("'{key}' must be a string")))
}

/// `file_read` - read a file into a string.
///
/// Arguments: `{ "path": string }`. Returns the file content.
pub fn file_read() -> Tool {
    Tool::new("file_read", "Read content from a file", |args| {
        Box::pin(async move {
            let path = require_str("file_read", &args, "path")?;
            let content = tokio::fs::read_to_string(&path)
                .await
                .map_err(|e| ToolError::execution("file_read", e))?;
            Ok(Value::String(content))
        })
    })
}

/// `file_write` - write a string to a file, replacing its content.
///
/// Arguments: `{ "path": string, "content": string }`. Returns `true`.
pub fn file_write() -> Tool {
    Tool::new("file_write", "Write content to a file", |args| {
        Box::pin(async move {
            let path = require_str("file_write", &args, "path")?;
            let content = require_str("file_write", &args, "content")?;
            tokio::fs::write(&path, content)
                .await
                .map_err(|e| ToolError::execution("file_write", e))?;
            Ok(json!(true))
        })
    })
}

/// `json_parse` - parse a JSON string into a value.
///
/// Arguments: `{ "text": string }`.
pub fn json_parse() -> Tool {
    Tool::new("json_parse", "Parse a JSON string into a value", |args| {
        Box::pin(async move {
            let text = require_str("json_parse", &args, "text")?;
            serde_json::from_str(&text).map_err(|e| ToolError::execution("json_parse", e))
        })
    })
}

/// `json_stringify` - serialize a value to a JSON string.
///
/// Arguments: `{ "value": any, "pretty": bool? }` (`pretty` defaults to
/// false). Returns the serialized string.
pub fn json_stringify() -> Tool {
    Tool::new(
        "json_stringify",
        "Convert a value to a JSON string",
        |args| {
            Box::pin(async move {
                let value = args.get("value").ok_or_else(|| {
                    ToolError::invalid_arguments("json_stringify", "'value' is required")
                })?;
                let pretty = args
                    .get("pretty")
                    .and_then(Value::as_bool)
                    .unwrap_or(false);
                let text = if pretty {
                    serde_json::to_string_pretty(value)
                } else {
                    serde_json::to_string(value)
                }
                .map_err(|e| ToolError::execution("json_stringify", e))?;
                Ok(Value::String(text))
            })
        },
    )
}

/// `http_request` - perform an HTTP request.
///
/// Arguments: `{ "url": string, "method": string?, "headers": object?,
/// "body": object? }`. The method defaults to GET; for GET the body
/// object is sent as query parameters, for POST/PUT/PATCH as a JSON
/// body. Returns `{ "status": u16, "content": any, "headers": object }`
/// with `content` decoded as JSON when the response says it is.
pub fn http_request() -> Tool {
    Tool::new("http_request", "Make an HTTP request to a URL", |args| {
        Box::pin(async move {
            let url = require_str("http_request", &args, "url")?;
            let method = args
                .get("method")
                .and_then(Value::as_str)
                .unwrap_or("GET")
                .to_uppercase();
            let method = reqwest::Method::from_bytes(method.as_bytes())
                .map_err(|e| ToolError::invalid_arguments("http_request", e.to_string()))?;

            let client = reqwest::Client::new();
            let mut request = client.request(method.clone(), &url);

            if let Some(headers) = args.get("headers").and_then(Value::as_object) {
                for (key, value) in headers {
                    let value = value.as_str().ok_or_else(|| {
                        ToolError::invalid_arguments(
                            "http_request",
                            format!("header '{key}' must be a string"),
                        )
                    })?;
                    request = request.header(key, value);
                }
            }

            if let Some(body) = args.get("body").and_then(Value::as_object) {
                request = match method.as_str() {
                    "GET" => request.query(body),
                    "POST" | "PUT" | "PATCH" => request.json(body),
                    _ => request,
                };
            }

            let response = request
                .send()
                .await
                .map_err(|e| ToolError::execution("http_request", e))?;

            let status = response.status().as_u16();
            let mut headers = Map::new();
            for (key, value) in response.headers() {
                headers.insert(
                    key.to_string(),
                    Value::String(String::from_utf8_lossy(value.as_bytes()).into_owned()),
                );
            }
            let is_json = response
                .headers()
                .get(reqwest::header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map_or(false, |v| v.starts_with("application/json"));

            let text = response
                .text()
                .await
                .map_err(|e| ToolError::execution("http_request", e))?;
            let content = if is_json {
                serde_json::from_str(&text).unwrap_or(Value::String(text))
            } else {
                Value::String(text)
            };

            Ok(json!({
                "status": status,
                "content": content,
                "headers": headers,
            }))
        })
    })
}

/// A registry pre-loaded with every built-in tool.
pub fn registry() -> Result<ToolRegistry> {
    let mut registry = ToolRegistry::new();
    registry.register(file_read())?;
    registry.register(file_write())?;
    registry.register(json_parse())?;
    registry.register(json_stringify())?;
    registry.register(http_request())?;
    Ok(registry)
}
