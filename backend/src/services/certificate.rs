//! Certificate NFT metadata decoding.
//!
//! Certificates carry fully on-chain metadata: `tokenURI` returns a
//! `data:application/json;base64,` URL whose JSON holds the name, description,
//! an inline SVG image and a list of attributes.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::models::{CourseId, TokenId, UnixTimestamp};

pub const JSON_DATA_PREFIX: &str = "data:application/json;base64,";
pub const SVG_DATA_PREFIX: &str = "data:image/svg+xml;base64,";
/// Attribute holding the completion time (display type `date`).
pub const COMPLETED_AT_TRAIT: &str = "Completed At";

/// Errors while decoding certificate data URLs.
#[derive(Debug, thiserror::Error)]
pub enum CertificateError {
    #[error("Invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Payload is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("Invalid certificate metadata JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// One `attributes` entry of the metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CertificateAttribute {
    #[serde(default)]
    pub trait_type: Option<String>,
    #[serde(default)]
    pub value: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_type: Option<String>,
}

/// Decoded token metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CertificateMetadata {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub attributes: Vec<CertificateAttribute>,
}

fn decode_text(b64: &str) -> Result<String, CertificateError> {
    let bytes = STANDARD.decode(b64.trim())?;
    Ok(String::from_utf8(bytes)?)
}

/// Decode a token URI. URIs that are not inline JSON data URLs give `Ok(None)`.
pub fn decode_token_uri(uri: &str) -> Result<Option<CertificateMetadata>, CertificateError> {
    let Some(payload) = uri.strip_prefix(JSON_DATA_PREFIX) else {
        return Ok(None);
    };
    let json = decode_text(payload)?;
    Ok(Some(serde_json::from_str(&json)?))
}

impl CertificateMetadata {
    /// Value of the attribute with the given trait type.
    pub fn attribute(&self, trait_type: &str) -> Option<&serde_json::Value> {
        self.attributes
            .iter()
            .find(|a| a.trait_type.as_deref() == Some(trait_type))
            .map(|a| &a.value)
    }

    /// The `Completed At` attribute, accepting a number or a numeric string.
    pub fn completed_at(&self) -> Option<UnixTimestamp> {
        let value = self.attribute(COMPLETED_AT_TRAIT)?;
        let secs = match value {
            serde_json::Value::Number(n) => n.as_u64(),
            serde_json::Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }?;
        Some(UnixTimestamp::new(secs))
    }

    /// Whether the image is an inline SVG data URL.
    pub fn has_svg_image(&self) -> bool {
        self.image
            .as_deref()
            .is_some_and(|i| i.starts_with(SVG_DATA_PREFIX))
    }

    /// The SVG document embedded in the image, if the image is an inline SVG.
    pub fn svg_document(&self) -> Result<Option<String>, CertificateError> {
        match self.image.as_deref().and_then(|i| i.strip_prefix(SVG_DATA_PREFIX)) {
            Some(b64) => decode_text(b64).map(Some),
            None => Ok(None),
        }
    }
}

/// File name offered when downloading a certificate image.
pub fn download_file_name(course: CourseId, token: TokenId) -> String {
    format!("certificate_course_{}_token_{}.svg", course, token)
}

/// Encode metadata as an inline token URI, the way the certificate contract does.
pub fn encode_token_uri(metadata: &CertificateMetadata) -> Result<String, CertificateError> {
    let json = serde_json::to_string(metadata)?;
    Ok(format!("{}{}", JSON_DATA_PREFIX, STANDARD.encode(json)))
}

/// Encode an SVG document as an image data URL.
pub fn encode_svg_image(svg: &str) -> String {
    format!("{}{}", SVG_DATA_PREFIX, STANDARD.encode(svg))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SVG: &str = "<svg xmlns=\"http://www.w3.org/2000/svg\"><text>Done</text></svg>";

    fn sample_uri() -> String {
        let json = serde_json::json!({
            "name": "Blockchain Basics Certificate",
            "description": "Awarded for completing all milestones.",
            "image": encode_svg_image(SVG),
            "attributes": [
                {"trait_type": "Course ID", "value": 1},
                {"trait_type": "Completed At", "display_type": "date", "value": 1700000000u64}
            ]
        });
        format!("{}{}", JSON_DATA_PREFIX, STANDARD.encode(json.to_string()))
    }

    #[test]
    fn test_decode_inline_metadata() {
        let meta = decode_token_uri(&sample_uri()).unwrap().unwrap();
        assert_eq!(meta.name, "Blockchain Basics Certificate");
        assert_eq!(meta.attributes.len(), 2);
        assert_eq!(meta.completed_at(), Some(UnixTimestamp::new(1_700_000_000)));
        assert!(meta.has_svg_image());
        assert_eq!(meta.svg_document().unwrap().as_deref(), Some(SVG));
    }

    #[test]
    fn test_non_data_uri_is_none() {
        assert!(decode_token_uri("ipfs://bafy/1.json").unwrap().is_none());
        assert!(decode_token_uri("").unwrap().is_none());
    }

    #[test]
    fn test_bad_payloads_error() {
        let bad_b64 = format!("{}!!!", JSON_DATA_PREFIX);
        assert!(matches!(decode_token_uri(&bad_b64), Err(CertificateError::Base64(_))));

        let not_json = format!("{}{}", JSON_DATA_PREFIX, STANDARD.encode("not json"));
        assert!(matches!(decode_token_uri(&not_json), Err(CertificateError::Json(_))));

        let not_utf8 = format!("{}{}", JSON_DATA_PREFIX, STANDARD.encode([0xffu8, 0xfe]));
        assert!(matches!(decode_token_uri(&not_utf8), Err(CertificateError::Utf8(_))));
    }

    #[test]
    fn test_missing_fields_default() {
        let uri = format!("{}{}", JSON_DATA_PREFIX, STANDARD.encode("{}"));
        let meta = decode_token_uri(&uri).unwrap().unwrap();
        assert_eq!(meta, CertificateMetadata::default());
        assert_eq!(meta.completed_at(), None);
        assert_eq!(meta.svg_document().unwrap(), None);
    }

    #[test]
    fn test_completed_at_from_string() {
        let meta = CertificateMetadata {
            attributes: vec![CertificateAttribute {
                trait_type: Some(COMPLETED_AT_TRAIT.to_string()),
                value: serde_json::json!("1700000000"),
                display_type: Some("date".to_string()),
            }],
            ..Default::default()
        };
        assert_eq!(meta.completed_at(), Some(UnixTimestamp::new(1_700_000_000)));
    }

    #[test]
    fn test_png_image_is_not_svg() {
        let meta = CertificateMetadata {
            image: Some("data:image/png;base64,AAAA".to_string()),
            ..Default::default()
        };
        assert!(!meta.has_svg_image());
        assert_eq!(meta.svg_document().unwrap(), None);
    }

    #[test]
    fn test_encode_then_decode_keeps_metadata() {
        let meta = decode_token_uri(&sample_uri()).unwrap().unwrap();
        let again = decode_token_uri(&encode_token_uri(&meta).unwrap()).unwrap().unwrap();
        assert_eq!(again, meta);
    }

    #[test]
    fn test_download_file_name() {
        assert_eq!(
            download_file_name(CourseId::new(4), TokenId::new(17)),
            "certificate_course_4_token_17.svg"
        );
    }
}
