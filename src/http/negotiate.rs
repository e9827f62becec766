//! Content negotiation module
//!
//! Decides between the JSON and HTML representations from the `Accept` header.

use std::cmp::Ordering;

/// One entry of an `Accept` header
#[derive(Debug, Clone, PartialEq)]
pub struct MediaRange {
    /// Lowercased `type/subtype`
    pub media_type: String,
    /// Weight from the `q` parameter, 1.0 when absent or unparsable
    pub quality: f32,
}

/// Parse an `Accept` header, dropping empty entries
pub fn parse_accept(header: &str) -> Vec<MediaRange> {
    header
        .split(',')
        .filter_map(|entry| {
            let mut parts = entry.split(';');
            let media_type = parts.next()?.trim().to_ascii_lowercase();
            if media_type.is_empty() {
                return None;
            }
            let quality = parts
                .filter_map(|param| {
                    let (key, value) = param.split_once('=')?;
                    key.trim().eq_ignore_ascii_case("q").then_some(value.trim())
                })
                .next_back()
                .and_then(|v| v.parse::<f32>().ok())
                .map_or(1.0, |q| q.clamp(0.0, 1.0));
            Some(MediaRange {
                media_type,
                quality,
            })
        })
        .collect()
}

/// How specifically `range` names `media_type`: 2 exact, 1 `type/*`, 0 `*/*`
fn specificity(range: &str, media_type: &str) -> Option<u8> {
    if range == media_type {
        return Some(2);
    }
    if range == "*/*" {
        return Some(0);
    }
    let (kind, _) = media_type.split_once('/')?;
    range
        .strip_suffix("/*")
        .filter(|prefix| *prefix == kind)
        .map(|_| 1)
}

/// Most specific range matching `media_type`, with its specificity
fn best_match<'a>(ranges: &'a [MediaRange], media_type: &str) -> Option<(u8, &'a MediaRange)> {
    ranges
        .iter()
        .filter_map(|r| specificity(&r.media_type, media_type).map(|s| (s, r)))
        .max_by_key(|(s, _)| *s)
}

/// Whether the client prefers the JSON representation.
///
/// Each of `application/json` and `text/html` takes the weight of its most
/// specific matching range. The higher weight wins; on a tie the more specific
/// match wins, then JSON. A bare `*/*` therefore gives `curl` JSON, while a
/// browser listing `text/html` above `*/*;q=0.8` keeps getting the form.
pub fn wants_json(accept: Option<&str>) -> bool {
    let Some(header) = accept else {
        return false;
    };
    let ranges = parse_accept(header);

    let json = best_match(&ranges, "application/json").filter(|(_, r)| r.quality > 0.0);
    let Some((json_rank, json)) = json else {
        return false;
    };
    let html = best_match(&ranges, "text/html").filter(|(_, r)| r.quality > 0.0);
    let Some((html_rank, html)) = html else {
        return true;
    };

    match json.quality.partial_cmp(&html.quality) {
        Some(Ordering::Greater) => true,
        Some(Ordering::Less) => false,
        _ => json_rank >= html_rank,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accept_quality() {
        let ranges = parse_accept("text/html, application/json;q=0.5 , */*;Q=0");
        assert_eq!(ranges.len(), 3);
        assert_eq!(ranges[0].media_type, "text/html");
        assert!((ranges[0].quality - 1.0).abs() < f32::EPSILON);
        assert!((ranges[1].quality - 0.5).abs() < f32::EPSILON);
        assert!(ranges[2].quality.abs() < f32::EPSILON);
    }

    #[test]
    fn test_parse_accept_ignores_empty_entries() {
        assert!(parse_accept("").is_empty());
        assert_eq!(parse_accept(",,application/json,").len(), 1);
    }

    #[test]
    fn test_missing_header_is_html() {
        assert!(!wants_json(None));
    }

    #[test]
    fn test_explicit_json() {
        assert!(wants_json(Some("application/json")));
        assert!(wants_json(Some("APPLICATION/JSON; charset=utf-8")));
        assert!(wants_json(Some("application/*")));
        assert!(wants_json(Some("application/json, text/html")));
    }

    #[test]
    fn test_weights_decide() {
        assert!(!wants_json(Some("application/json;q=0.1, text/html")));
        assert!(wants_json(Some("text/html;q=0.5, application/json")));
        assert!(!wants_json(Some("text/*, application/*;q=0.9")));
    }

    #[test]
    fn test_specific_range_overrides_wildcard() {
        assert!(!wants_json(Some("*/*, application/json;q=0")));
        assert!(wants_json(Some("*/*, text/html;q=0")));
        assert!(!wants_json(Some("*/*, text/html")));
    }

    #[test]
    fn test_refused_json() {
        assert!(!wants_json(Some("application/json;q=0")));
        assert!(!wants_json(Some("text/html")));
    }

    #[test]
    fn test_wildcard() {
        assert!(wants_json(Some("*/*")));
        assert!(!wants_json(Some(
            "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"
        )));
    }
}
