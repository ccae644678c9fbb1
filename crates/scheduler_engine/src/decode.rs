use chardetng::EncodingDetector;
use encoding_rs::Encoding;

/// Bytes of a saved page decoded to UTF-8.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedHtml {
    pub html: String,
    pub encoding_label: String,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("saved page is not valid {encoding}")]
    Malformed { encoding: String },
}

/// How far into the document a `<meta charset>` declaration is looked for.
const META_SCAN_LIMIT: usize = 1024;

/// Decodes a saved portal page. Order: BOM, caller hint (for example a
/// `Content-Type` value), `<meta charset>` near the top, then detection.
pub fn decode_html(bytes: &[u8], charset_hint: Option<&str>) -> Result<DecodedHtml, DecodeError> {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return decode_with(bytes, encoding);
    }

    let declared = charset_hint
        .and_then(charset_param)
        .or_else(|| meta_charset(bytes));
    if let Some(encoding) = declared.and_then(|label| Encoding::for_label(label.as_bytes())) {
        return decode_with(bytes, encoding);
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    decode_with(bytes, detector.guess(None, true))
}

/// Accepts either a bare label (`utf-8`) or a header value
/// (`text/html; charset=utf-8`).
fn charset_param(hint: &str) -> Option<String> {
    if !hint.contains('=') && !hint.contains(';') {
        let label = hint.trim();
        return (!label.is_empty()).then(|| label.to_string());
    }
    hint.split(';').find_map(|part| {
        let (name, value) = part.split_once('=')?;
        name.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches(['"', '\''].as_ref()).to_string())
    })
}

fn meta_charset(bytes: &[u8]) -> Option<String> {
    let head = &bytes[..bytes.len().min(META_SCAN_LIMIT)];
    let head = String::from_utf8_lossy(head).to_ascii_lowercase();
    let start = head.find("charset=")? + "charset=".len();
    let label: String = head[start..]
        .trim_start_matches(['"', '\''].as_ref())
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':'))
        .collect();
    (!label.is_empty()).then_some(label)
}

fn decode_with(bytes: &[u8], encoding: &'static Encoding) -> Result<DecodedHtml, DecodeError> {
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        return Err(DecodeError::Malformed {
            encoding: encoding.name().to_string(),
        });
    }
    Ok(DecodedHtml {
        html: text.into_owned(),
        encoding_label: encoding.name().to_string(),
    })
}
