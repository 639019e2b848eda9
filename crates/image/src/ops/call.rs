//! JSON request dispatch.

use super::{
    ChromakeyParams, CompressParams, ConvertParams, ImageTools, MetadataParams, ResizeParams,
};
use crate::response::Failure;
use imgtools_core::ErrorCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Names of the available tools.
pub const TOOL_NAMES: [&str; 5] = [
    "chromakey_to_transparent",
    "resize_image",
    "convert_format",
    "compress_png",
    "get_image_metadata",
];

/// A tool invocation: `{"tool": "<name>", "arguments": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tool", content = "arguments", rename_all = "snake_case")]
pub enum ToolCall {
    /// Key a background color out
    ChromakeyToTransparent(ChromakeyParams),
    /// Resize by dimensions or scale
    ResizeImage(ResizeParams),
    /// Re-encode by output extension
    ConvertFormat(ConvertParams),
    /// Lossy PNG compression
    CompressPng(CompressParams),
    /// Describe an image
    GetImageMetadata(MetadataParams),
}

impl ToolCall {
    /// Tool name as it appears on the wire.
    pub fn name(&self) -> &'static str {
        match self {
            ToolCall::ChromakeyToTransparent(_) => TOOL_NAMES[0],
            ToolCall::ResizeImage(_) => TOOL_NAMES[1],
            ToolCall::ConvertFormat(_) => TOOL_NAMES[2],
            ToolCall::CompressPng(_) => TOOL_NAMES[3],
            ToolCall::GetImageMetadata(_) => TOOL_NAMES[4],
        }
    }
}

impl ImageTools {
    /// Run a tool call and return its response document.
    pub fn call(&self, call: &ToolCall) -> Value {
        let _span = tracing::debug_span!("tool_call", tool = call.name()).entered();
        match call {
            ToolCall::ChromakeyToTransparent(p) => self.chromakey_to_transparent(p).to_json(),
            ToolCall::ResizeImage(p) => self.resize_image(p).to_json(),
            ToolCall::ConvertFormat(p) => self.convert_format(p).to_json(),
            ToolCall::CompressPng(p) => self.compress_png(p).to_json(),
            ToolCall::GetImageMetadata(p) => self.get_image_metadata(p).to_json(),
        }
    }

    /// Parse a JSON request and run it. Malformed requests get an error document.
    pub fn call_json(&self, request: &str) -> Value {
        match serde_json::from_str::<ToolCall>(request) {
            Ok(call) => self.call(&call),
            Err(e) => {
                tracing::info!(error = %e, "malformed tool request");
                let failure = Failure {
                    error: format!("Invalid request: {e}"),
                    code: ErrorCode::InvalidInput.to_string(),
                };
                serde_json::to_value(failure).unwrap_or(Value::Null)
            }
        }
    }
}
