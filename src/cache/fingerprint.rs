//! Fingerprint Module
//!
//! Reduces an ordered tuple of heterogeneous lookup keys to one stable,
//! URL-safe identifier. Equal tuples (by value and order) always produce
//! equal fingerprints; any difference in value or order changes the result.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde_json::Value;
use sha1::{Digest, Sha1};

/// Domain-separation marker appended to every part sequence, so an
/// identical raw tuple fingerprinted in another context cannot collide.
const DIGEST_DOMAIN: &str = "@shard@";

/// Joins canonical parts. The ASCII unit separator cannot appear in any
/// canonical text form, so joined sequences never alias each other.
const PART_SEPARATOR: char = '\u{1f}';

// == Fingerprint ==
/// Computes the fingerprint of an ordered key tuple.
///
/// Each part is canonicalized: objects and arrays as canonical JSON (sorted
/// keys), `Null` as the literal text `undefined`, strings unquoted, numbers
/// and booleans via their display form. The joined text is SHA-1 hashed
/// over UTF-8 and encoded as unpadded URL-safe base64, yielding 27
/// characters. Total for any input.
pub fn fingerprint(parts: &[Value]) -> String {
    let joined = parts
        .iter()
        .map(canonical_part)
        .chain(std::iter::once(DIGEST_DOMAIN.to_string()))
        .collect::<Vec<_>>()
        .join(&PART_SEPARATOR.to_string());

    let digest = Sha1::digest(joined.as_bytes());
    URL_SAFE_NO_PAD.encode(digest)
}

/// Canonical text form of one key part.
fn canonical_part(part: &Value) -> String {
    match part {
        Value::Null => "undefined".to_string(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        structured => String::from_utf8(
            serde_json_canonicalizer::to_vec(structured)
                .expect("JSON value is always canonicalizable"),
        )
        .expect("canonical JSON is valid UTF-8"),
    }
}
