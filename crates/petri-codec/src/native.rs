//! The native JSON form.

use crate::dto::NetDto;
use crate::error::CodecError;

/// Encode a net as pretty-printed native JSON.
pub fn encode_native(net: &NetDto) -> Result<String, CodecError> {
    Ok(serde_json::to_string_pretty(net)?)
}

/// Decode a native JSON document.
///
/// Only the document shape is checked here. Element-level problems are
/// reported later by [`NetDto::into_net`].
pub fn decode_native(text: &str) -> Result<NetDto, CodecError> {
    Ok(serde_json::from_str(text)?)
}
