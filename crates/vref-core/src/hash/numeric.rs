use crate::error::HashError;

use super::{decode_segment, encode_segment, normalize_path, HashPair, Hasher};

const SEGMENT_JOINER: char = '-';

/// Compacts the leading all-digit segments of a path.
///
/// `/12/7/Images` hashes to `("12-7", base64("Images"))`; a path with no
/// numeric prefix is carried whole in the secondary hash.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumericPathHasher;

impl NumericPathHasher {
    pub const fn new() -> Self {
        Self
    }
}

fn is_numeric(segment: &str) -> bool {
    !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit())
}

impl Hasher for NumericPathHasher {
    type Value = str;

    fn hash(&self, path: &str) -> Result<HashPair, HashError> {
        if path.is_empty() {
            return Err(HashError::EmptyPath);
        }

        let path = normalize_path(path);
        if path == "/" {
            return Ok(HashPair::secondary(""));
        }
        let Some(relative) = path.strip_prefix('/') else {
            return Ok(HashPair::secondary(encode_segment(path)));
        };

        let segments: Vec<&str> = relative.split('/').collect();
        let numeric = segments.iter().take_while(|s| is_numeric(s)).count();
        if numeric == 0 {
            return Ok(HashPair::secondary(encode_segment(path)));
        }

        let prefix = segments[..numeric].join(&SEGMENT_JOINER.to_string());
        if numeric == segments.len() {
            Ok(HashPair::primary(prefix))
        } else {
            let remainder = segments[numeric..].join("/");
            Ok(HashPair::both(prefix, encode_segment(&remainder)))
        }
    }

    fn lookup(&self, hash: &HashPair) -> Result<String, HashError> {
        let numeric_path = |prefix: &str| {
            if prefix.split(SEGMENT_JOINER).all(is_numeric) {
                Ok(format!("/{}", prefix.replace(SEGMENT_JOINER, "/")))
            } else {
                Err(HashError::InvalidHash(prefix.to_string()))
            }
        };

        match (hash.primary.as_deref(), hash.secondary.as_deref()) {
            (Some(prefix), None) => numeric_path(prefix),
            (Some(prefix), Some(remainder)) => Ok(format!(
                "{}/{}",
                numeric_path(prefix)?,
                decode_segment(remainder)?
            )),
            (None, Some("")) => Ok("/".to_string()),
            (None, Some(whole)) => decode_segment(whole),
            (None, None) => Err(HashError::InvalidHash(format!("{hash:?}"))),
        }
    }
}
