//! SSML sanitization for engine dispatch
//!
//! The engine consumes plain text, so supported markup is folded into
//! it: substitutions are applied, breaks become pause spacing, say-as
//! character spans are spelled out, and every remaining tag is
//! stripped. Invalid markup degrades to plain-text extraction rather
//! than failing the request.

use std::sync::OnceLock;

use regex::Regex;

fn xml_decl() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<\?xml[^>]*\?>").expect("must be valid regex"))
}

fn sub_tag() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?s)<sub\b[^>]*\balias="([^"]*)"[^>]*>.*?</sub>"#).expect("must be valid regex")
    })
}

fn say_as_characters() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?s)<say-as\b[^>]*\binterpret-as="(?:characters|digits)"[^>]*>(.*?)</say-as>"#)
            .expect("must be valid regex")
    })
}

fn break_tag() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"<break\b[^>]*?(?:\btime="([^"]*)")?[^>]*/?>"#).expect("must be valid regex"))
}

fn any_tag() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]+>").expect("must be valid regex"))
}

fn whitespace() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[ \t\r\n]+").expect("must be valid regex"))
}

/// Reduce SSML markup to plain text for the synthesis engine
///
/// Whitespace is normalized before break expansion so the inserted
/// pause spacing survives to dispatch.
#[must_use]
pub fn sanitize(ssml: &str) -> String {
    let text = xml_decl().replace_all(ssml, "");

    let text = whitespace().replace_all(&text, " ");

    let text = sub_tag().replace_all(&text, "$1");

    let text = say_as_characters().replace_all(&text, |captures: &regex::Captures<'_>| spell_out(&captures[1]));

    let text = break_tag().replace_all(&text, |captures: &regex::Captures<'_>| {
        pause_spacing(captures.get(1).map(|m| m.as_str()))
    });

    let text = any_tag().replace_all(&text, "");

    text.trim().to_string()
}

/// Spell a span out character by character
fn spell_out(span: &str) -> String {
    let mut out = String::with_capacity(span.len() * 2);
    for c in span.chars().filter(|c| !c.is_whitespace()) {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push(c);
    }
    out
}

/// Map a break duration to pause spacing the engine renders naturally
fn pause_spacing(time: Option<&str>) -> String {
    let seconds = time.map_or(0.5, parse_duration_seconds);

    let width = if seconds <= 0.2 {
        1
    } else if seconds <= 0.5 {
        2
    } else if seconds <= 1.0 {
        3
    } else {
        4
    };

    " ".repeat(width)
}

fn parse_duration_seconds(time: &str) -> f64 {
    if let Some(millis) = time.strip_suffix("ms") {
        millis.parse::<f64>().map_or(0.5, |v| v / 1000.0)
    } else if let Some(seconds) = time.strip_suffix('s') {
        seconds.parse::<f64>().unwrap_or(0.5)
    } else {
        0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_untouched() {
        assert_eq!(sanitize("Hello there"), "Hello there");
    }

    #[test]
    fn speak_wrapper_is_stripped() {
        assert_eq!(sanitize("<speak>Hello there</speak>"), "Hello there");
    }

    #[test]
    fn xml_declaration_is_removed() {
        assert_eq!(sanitize("<?xml version=\"1.0\"?><speak>Hi</speak>"), "Hi");
    }

    #[test]
    fn sub_alias_replaces_content() {
        assert_eq!(
            sanitize("<speak>Call <sub alias=\"Doctor\">Dr.</sub> Smith</speak>"),
            "Call Doctor Smith"
        );
    }

    #[test]
    fn break_inserts_pause_spacing() {
        assert_eq!(sanitize("<speak>one<break time=\"600ms\"/>two</speak>"), "one   two");
        assert_eq!(sanitize("<speak>one<break time=\"100ms\"/>two</speak>"), "one two");
    }

    #[test]
    fn say_as_characters_is_spelled_out() {
        assert_eq!(
            sanitize("<speak>code <say-as interpret-as=\"characters\">abc</say-as></speak>"),
            "code a b c"
        );
    }

    #[test]
    fn nested_unknown_tags_keep_their_text() {
        assert_eq!(
            sanitize("<speak><prosody rate=\"slow\">take it easy</prosody></speak>"),
            "take it easy"
        );
    }

    #[test]
    fn invalid_markup_degrades_to_text_extraction() {
        assert_eq!(sanitize("<speak>unclosed <emphasis>still readable"), "unclosed still readable");
    }

    #[test]
    fn whitespace_is_collapsed() {
        assert_eq!(sanitize("<speak>a\n   b\t c</speak>"), "a b c");
    }
}
