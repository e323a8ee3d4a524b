use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use summarizer_logging::summarizer_warn;

/// How far into the document to look for a `<meta charset>` declaration.
const META_PRESCAN_BYTES: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedHtml {
    pub html: String,
    pub encoding_label: String,
    /// Some bytes were invalid and became U+FFFD.
    pub lossy: bool,
}

/// Decode raw page bytes into UTF-8. Never fails; malformed sequences are
/// replaced.
///
/// Order: byte-order mark, `Content-Type` charset, `<meta>` charset in the
/// first kilobyte, then statistical detection.
pub fn decode_html(bytes: &[u8], content_type: Option<&str>) -> DecodedHtml {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return decode_with(bytes, encoding);
    }

    if let Some(enc) = content_type
        .and_then(charset_param)
        .and_then(|label| Encoding::for_label(label.as_bytes()))
    {
        return decode_with(bytes, enc);
    }

    if let Some(enc) = meta_charset(bytes).and_then(|label| Encoding::for_label(label.as_bytes())) {
        return decode_with(bytes, enc);
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    decode_with(bytes, detector.guess(None, true))
}

fn charset_param(content_type: &str) -> Option<String> {
    content_type.split(';').find_map(|part| {
        let (key, value) = part.split_once('=')?;
        if !key.trim().eq_ignore_ascii_case("charset") {
            return None;
        }
        let value = value.trim().trim_matches(&['"', '\''][..]);
        (!value.is_empty()).then(|| value.to_string())
    })
}

/// Only `charset=` inside a `<meta ...>` tag counts; script and comment text
/// in the prescan window is ignored.
fn meta_charset(bytes: &[u8]) -> Option<String> {
    let head = &bytes[..bytes.len().min(META_PRESCAN_BYTES)];
    let head = String::from_utf8_lossy(head).to_ascii_lowercase();

    let mut rest = head.as_str();
    while let Some(open) = rest.find("<meta") {
        let tag = &rest[open..];
        let tag = &tag[..tag.find('>').unwrap_or(tag.len())];
        if let Some(at) = tag.find("charset=") {
            let label = charset_label(&tag[at + "charset=".len()..]);
            if !label.is_empty() {
                return Some(label);
            }
        }
        rest = &rest[open + "<meta".len()..];
    }
    None
}

fn charset_label(value: &str) -> String {
    value
        .trim_start_matches(&['"', '\''][..])
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.'))
        .collect()
}

fn decode_with(bytes: &[u8], enc: &'static Encoding) -> DecodedHtml {
    let (text, actual, had_errors) = enc.decode(bytes);
    if had_errors {
        summarizer_warn!(
            "Page is not valid {}; invalid bytes were replaced",
            actual.name()
        );
    }
    DecodedHtml {
        html: text.into_owned(),
        encoding_label: actual.name().to_string(),
        lossy: had_errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn charset_param_is_case_insensitive_and_unquoted() {
        assert_eq!(
            charset_param("text/html; Charset=\"ISO-8859-1\""),
            Some("ISO-8859-1".to_string())
        );
        assert_eq!(charset_param("text/html"), None);
    }

    #[test]
    fn meta_charset_is_found_in_head() {
        let html = br#"<html><head><meta charset="windows-1251"></head></html>"#;
        assert_eq!(meta_charset(html), Some("windows-1251".to_string()));
    }

    #[test]
    fn meta_charset_after_prescan_window_is_ignored() {
        let mut html = vec![b' '; META_PRESCAN_BYTES];
        html.extend_from_slice(br#"<meta charset="koi8-r">"#);
        assert_eq!(meta_charset(&html), None);
    }

    #[test]
    fn charset_outside_meta_tags_is_ignored() {
        let html = br#"<script>var enc = "charset=koi8-r";</script><!-- charset=big5 -->
            <meta http-equiv="Content-Type" content="text/html; charset=iso-8859-2">"#;
        assert_eq!(meta_charset(html), Some("iso-8859-2".to_string()));
    }

    #[test]
    fn meta_without_charset_is_skipped() {
        let html = br#"<meta name="viewport" content="width=device-width"><meta charset=utf-8>"#;
        assert_eq!(meta_charset(html), Some("utf-8".to_string()));
    }
}
