//! Player key normalization.
//!
//! The same normalization is applied to every source, so "José Álvarez",
//! "Jose Alvarez" and "JOSE ALVAREZ JR." all land on `jose-alvarez`.

use std::sync::LazyLock;

use hoops_models::PlayerKey;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Whitespace runs, replaced by a single hyphen.
static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Anything that is not a word character or a hyphen.
static NON_WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w-]").expect("valid regex"));

/// Generational suffix at the end of a key.
static SUFFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-(?:sr|jr|ii|iii|iv|v|vi|vii)$").expect("valid regex"));

/// Normalizes a display name into a [`PlayerKey`].
///
/// The pipeline:
/// 1. NFD-decompose and drop every non-ASCII character (accents go away)
/// 2. Lowercase and trim
/// 3. Replace whitespace runs with `-`
/// 4. Remove characters other than word characters and `-`
/// 5. Strip trailing generational suffixes (`-jr`, `-sr`, `-ii` … `-vii`)
///
/// Suffixes are stripped repeatedly, so the function is idempotent. A strip
/// that would leave the key empty is skipped.
#[must_use]
pub fn player_key(name: &str) -> PlayerKey {
    let ascii: String = name.nfd().filter(char::is_ascii).collect();
    let lowered = ascii.to_ascii_lowercase();
    let hyphenated = WHITESPACE_RE.replace_all(lowered.trim(), "-");
    let mut key = NON_WORD_RE.replace_all(&hyphenated, "").into_owned();
    strip_suffixes(&mut key);
    PlayerKey::from_normalized(key)
}

fn strip_suffixes(key: &mut String) {
    while let Some(m) = SUFFIX_RE.find(key) {
        if m.start() == 0 {
            break;
        }
        key.truncate(m.start());
    }
}
