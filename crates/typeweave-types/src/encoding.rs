//! Encoding utilities for compiled type files.
//!
//! Type files are BCS-encoded [`CompiledType`] values. JSON helpers exist for
//! inspection and for assembling type files from hand-written definitions.

use anyhow::{anyhow, Result};
use sha2::{Digest, Sha256};

use crate::compiled::CompiledType;
use crate::errors::WeaveError;

/// Encode a compiled type into type-file bytes.
pub fn encode_type(ty: &CompiledType) -> Result<Vec<u8>, WeaveError> {
    bcs::to_bytes(ty).map_err(|e| WeaveError::malformed(&ty.name, e))
}

/// Decode type-file bytes.
///
/// # Arguments
/// * `bytes` - Raw file contents
/// * `context` - Description for error messages (e.g., the file path)
pub fn decode_type(bytes: &[u8], context: &str) -> Result<CompiledType, WeaveError> {
    bcs::from_bytes(bytes).map_err(|e| WeaveError::malformed(context, e))
}

/// SHA-256 of raw bytes as lowercase hex.
pub fn bytes_sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Digest of the encoded form of a compiled type.
///
/// Two types with equal digests are byte-for-byte identical once written.
pub fn type_digest(ty: &CompiledType) -> Result<String, WeaveError> {
    Ok(bytes_sha256_hex(&encode_type(ty)?))
}

/// Render a compiled type as pretty JSON.
pub fn type_to_json_pretty(ty: &CompiledType) -> Result<String> {
    serde_json::to_string_pretty(ty).map_err(|e| anyhow!("Failed to serialize {}: {}", ty.name, e))
}

/// Parse a compiled type from its JSON form.
pub fn type_from_json(json: &str) -> Result<CompiledType> {
    serde_json::from_str(json).map_err(|e| anyhow!("Failed to parse type JSON: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiled::{FieldDef, MethodDef, Signature, TypeSig};
    use crate::marker::{Marker, MarkerValue};

    fn sample() -> CompiledType {
        CompiledType::class("def.lib.Sample")
            .with_marker(
                Marker::new("typeweave.lang.Mixin")
                    .with_value("target", MarkerValue::type_ref("def.lib.Target")),
            )
            .with_field(FieldDef::new("count", TypeSig::Int))
            .with_method(MethodDef::new("run", Signature::unit()))
            .with_nested(CompiledType::class("Inner"))
    }

    #[test]
    fn test_bcs_decode_of_encoded_type_is_identical() {
        let ty = sample();
        let bytes = encode_type(&ty).unwrap();
        let decoded = decode_type(&bytes, "sample").unwrap();
        assert_eq!(decoded, ty);
    }

    #[test]
    fn test_decode_garbage_is_malformed() {
        let err = decode_type(&[0xff, 0xff, 0xff], "garbage.ctype").unwrap_err();
        assert_eq!(err.kind(), "malformed");
    }

    #[test]
    fn test_digest_tracks_content() {
        let a = sample();
        let mut b = sample();
        assert_eq!(type_digest(&a).unwrap(), type_digest(&b).unwrap());
        b.fields.push(FieldDef::new("extra", TypeSig::Bool));
        assert_ne!(type_digest(&a).unwrap(), type_digest(&b).unwrap());
        assert_eq!(type_digest(&a).unwrap().len(), 64);
    }

    #[test]
    fn test_json_form_parses_back() {
        let ty = sample();
        let json = type_to_json_pretty(&ty).unwrap();
        assert!(json.contains("\"def.lib.Sample$Inner\""));
        assert_eq!(type_from_json(&json).unwrap(), ty);
    }
}
