//! Off-chain metadata document for diploma tokens.
//!
//! The token-metadata instruction only stores a name/symbol/URI triple; the
//! URI points at this JSON document. Without a hosting base URI the document
//! is inlined as a `data:` URI, which wallets generally do not resolve.

use base64::Engine as _;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::errors::{VerigradError, VerigradResult};
use crate::model::DiplomaMetadata;

pub const DIPLOMA_SYMBOL: &str = "DIPLOMA";

const AVATAR_ENDPOINT: &str = "https://api.dicebear.com/7.x/initials/svg";
const AVATAR_BACKGROUND: &str = "0d8abc";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub trait_type: String,
    pub value: String,
}

impl Attribute {
    fn new(trait_type: &str, value: impl Into<String>) -> Self {
        Self {
            trait_type: trait_type.to_string(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataFile {
    pub uri: String,
    #[serde(rename = "type")]
    pub mime: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Properties {
    pub category: String,
    pub files: Vec<MetadataFile>,
}

/// JSON document referenced by the on-chain metadata URI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadataDocument {
    pub name: String,
    pub symbol: String,
    pub description: String,
    pub image: String,
    pub attributes: Vec<Attribute>,
    pub properties: Properties,
}

impl TokenMetadataDocument {
    pub fn for_diploma(diploma: &DiplomaMetadata) -> VerigradResult<Self> {
        let image = avatar_url(&diploma.student_name)?;

        let mut attributes = vec![
            Attribute::new("Student", diploma.student_name.clone()),
            Attribute::new("Degree", diploma.degree.clone()),
            Attribute::new("Year", diploma.graduation_year.to_string()),
            Attribute::new("Institution", diploma.institution.clone()),
        ];
        if let Some(gpa) = &diploma.gpa {
            attributes.push(Attribute::new("GPA", gpa.clone()));
        }
        if let Some(honors) = &diploma.honors {
            attributes.push(Attribute::new("Honors", honors.clone()));
        }

        Ok(Self {
            name: format!("{} - {}", diploma.degree, diploma.student_name),
            symbol: DIPLOMA_SYMBOL.to_string(),
            description: format!(
                "Official {} diploma issued to {} in {} by {}",
                diploma.degree, diploma.student_name, diploma.graduation_year, diploma.institution
            ),
            image: image.clone(),
            attributes,
            properties: Properties {
                category: "image".to_string(),
                files: vec![MetadataFile {
                    uri: image,
                    mime: "image/svg+xml".to_string(),
                }],
            },
        })
    }

    /// URI under which this document is published.
    ///
    /// With `base_uri` the document is expected at `<base_uri>/<key>.json`;
    /// without it the document is inlined as base64 JSON.
    pub fn uri(&self, base_uri: Option<&str>, key: &str) -> VerigradResult<String> {
        match base_uri {
            Some(base) => {
                let base = base.trim_end_matches('/');
                if base.is_empty() {
                    return Err(VerigradError::invalid_argument("metadata base uri is empty"));
                }
                Ok(format!("{base}/{key}.json"))
            }
            None => {
                let json = serde_json::to_vec(self)
                    .map_err(|e| VerigradError::invalid_argument(format!("metadata json: {e}")))?;
                Ok(format!(
                    "data:application/json;base64,{}",
                    base64::engine::general_purpose::STANDARD.encode(json)
                ))
            }
        }
    }
}

fn avatar_url(seed: &str) -> VerigradResult<String> {
    let url = Url::parse_with_params(
        AVATAR_ENDPOINT,
        &[("seed", seed), ("backgroundColor", AVATAR_BACKGROUND)],
    )
    .map_err(|e| VerigradError::invalid_argument(format!("avatar url: {e}")))?;
    Ok(url.to_string())
}

/// Truncate to at most `max` bytes without splitting a character.
pub fn truncate_utf8(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
