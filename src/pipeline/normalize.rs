//! Filename derivations used to pair design files with their preview images
//! and to produce stable catalog ids.

use once_cell::sync::Lazy;
use regex::Regex;
use uuid::Uuid;

use crate::common::constants::MAX_ID_LEN;

static EXT_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.[^.]+$").unwrap());
static EXT_CAPTURE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.([^.]+)$").unwrap());
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static NON_ALNUM: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

/// Length of the hash suffix used when a filename has no usable characters
const FALLBACK_SUFFIX_LEN: usize = 12;

/// Strip the extension, turn `_` and `-` into spaces and collapse whitespace.
fn unify_separators(name: &str) -> String {
    let base = EXT_SUFFIX.replace(name.trim(), "");
    let base = base.replace(['_', '-'], " ");
    WHITESPACE.replace_all(&base, " ").trim().to_string()
}

/// Lowercase join key shared by a design file and its preview image.
///
/// `"Flower_Panel-01.DXF"` and `"flower panel 01.png"` both yield `"flower panel 01"`.
pub fn stem(name: &str) -> String {
    unify_separators(name).to_lowercase()
}

/// Display title: same normalization as [`stem`] but case preserving.
pub fn title(name: &str) -> String {
    unify_separators(name)
}

/// Lowercased text after the last dot, or an empty string when there is none.
pub fn ext(name: &str) -> String {
    let lowered = name.to_lowercase();
    EXT_CAPTURE
        .captures(lowered.trim())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// Returns the extension of `name` when it is in `supported` (case-insensitive).
pub fn supported_ext(name: &str, supported: &[String]) -> Option<String> {
    let e = ext(name);
    if e.is_empty() {
        return None;
    }
    supported
        .iter()
        .any(|s| s.eq_ignore_ascii_case(&e))
        .then_some(e)
}

/// Catalog id for a filename: `<prefix>_<body>`, at most 60 characters.
///
/// The body is the stem with every run of characters outside `[a-z0-9]` replaced
/// by one underscore. Names with no such characters at all (punctuation only,
/// non-Latin script) get a short deterministic hash of the stem instead, so
/// files sharing a stem share an id. Names whose stem is empty hash the raw name.
pub fn slug(prefix: &str, name: &str) -> String {
    let stem = stem(name);
    let collapsed = NON_ALNUM.replace_all(&stem, "_");
    let body = collapsed.trim_matches('_');

    let id = if body.is_empty() {
        let key = if stem.is_empty() { name.trim() } else { stem.as_str() };
        let hash = Uuid::new_v5(&Uuid::NAMESPACE_URL, key.as_bytes())
            .simple()
            .to_string();
        format!("{}_{}", prefix, &hash[..FALLBACK_SUFFIX_LEN])
    } else {
        format!("{}_{}", prefix, body)
    };

    id.chars().take(MAX_ID_LEN).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_slug_shaped(id: &str, prefix: &str) -> bool {
        let Some(body) = id.strip_prefix(&format!("{}_", prefix)) else {
            return false;
        };
        body.chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
            && !id.contains("__")
            && id.len() <= MAX_ID_LEN
    }

    #[test]
    fn test_stem_unifies_separators_and_case() {
        assert_eq!(stem("Flower_Panel-01.DXF"), "flower panel 01");
        assert_eq!(stem("  flower   panel 01.png "), "flower panel 01");
        assert_eq!(stem("a__b--c.svg"), "a b c");
    }

    #[test]
    fn test_stem_strips_only_last_extension() {
        assert_eq!(stem("box.v2.dxf"), "box.v2");
        assert_eq!(stem("no_extension"), "no extension");
        assert_eq!(stem(".hidden"), "");
    }

    #[test]
    fn test_stem_is_idempotent() {
        for name in ["Flower_Panel-01.DXF", "ستارة_مودرن.svg", "  x -_- y.pdf", "plain"] {
            let once = stem(name);
            // Re-applying must not strip anything else, so append a dummy extension.
            let twice = stem(&format!("{}.tmp", once));
            assert_eq!(once, twice, "stem not idempotent for {name:?}");
        }
    }

    #[test]
    fn test_title_preserves_case() {
        assert_eq!(title("Flower_Panel-01.DXF"), "Flower Panel 01");
        assert_eq!(title("ستارة_مودرن.svg"), "ستارة مودرن");
    }

    #[test]
    fn test_ext() {
        assert_eq!(ext("Panel.DXF"), "dxf");
        assert_eq!(ext("archive.tar.gz"), "gz");
        assert_eq!(ext("README"), "");
        assert_eq!(ext("trailing."), "");
    }

    #[test]
    fn test_supported_ext_is_case_insensitive() {
        let supported = vec!["dxf".to_string(), "SVG".to_string()];
        assert_eq!(supported_ext("a.DXF", &supported), Some("dxf".to_string()));
        assert_eq!(supported_ext("a.svg", &supported), Some("svg".to_string()));
        assert_eq!(supported_ext("a.png", &supported), None);
        assert_eq!(supported_ext("folder", &supported), None);
    }

    #[test]
    fn test_slug_basic() {
        assert_eq!(slug("gh", "Flower_Panel-01.DXF"), "gh_flower_panel_01");
        assert_eq!(slug("gh", "Box (v2) & lid!.svg"), "gh_box_v2_lid");
        assert_eq!(slug("gh", "sample.dxf"), "gh_sample");
    }

    #[test]
    fn test_slug_truncates_to_limit() {
        let long = format!("{}.dxf", "abcdefghij".repeat(10));
        let id = slug("gh", &long);
        assert_eq!(id.len(), MAX_ID_LEN);
        assert!(id.starts_with("gh_abcdefghij"));
    }

    #[test]
    fn test_slug_fallback_is_deterministic() {
        let a = slug("gh", "ستارة.svg");
        let b = slug("gh", "ستارة.svg");
        let c = slug("gh", "نافذة.svg");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), "gh_".len() + FALLBACK_SUFFIX_LEN);
        assert!(is_slug_shaped(&a, "gh"));
    }

    #[test]
    fn test_slug_fallback_follows_stem() {
        assert_eq!(slug("gh", "ستارة.svg"), slug("gh", "ستارة.dxf"));
        assert_eq!(slug("gh", "ستارة_مودرن.svg"), slug("gh", "ستارة-مودرن.dxf"));
        assert_eq!(slug("gh", "ستارة_مودرن.svg"), slug("gh", "ستارة  مودرن.pdf"));
        assert_ne!(slug("gh", "ستارة.svg"), slug("gh", "ستارة مودرن.svg"));
        assert_ne!(slug("gh", "__--__.dxf"), slug("gh", "..."));
    }

    #[test]
    fn test_slug_shape_holds_for_awkward_names() {
        let repeated = "x_".repeat(80);
        for name in [
            "__--__.dxf",
            "...",
            "A  B__C--D.svg",
            "mixed ستارة 3.pdf",
            "UPPER_lower_123.ai",
            repeated.as_str(),
        ] {
            let id = slug("gh", name);
            assert!(is_slug_shaped(&id, "gh"), "bad slug {id:?} for {name:?}");
        }
    }
}
