use chardetng::EncodingDetector;
use encoding_rs::Encoding;

/// How far into a captured page to look for a `<meta charset>` declaration.
const META_SNIFF_LIMIT: usize = 1024;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("captured frame is not valid {encoding}")]
    Malformed { encoding: String },
}

/// Decodes a captured page into UTF-8: BOM, then `<meta charset>`, then a
/// `chardetng` guess.
pub fn decode_frame(bytes: &[u8]) -> Result<String, DecodeError> {
    let encoding = Encoding::for_bom(bytes)
        .map(|(encoding, _)| encoding)
        .or_else(|| sniff_meta_charset(bytes))
        .unwrap_or_else(|| {
            let mut detector = EncodingDetector::new();
            detector.feed(bytes, true);
            detector.guess(None, true)
        });

    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        return Err(DecodeError::Malformed {
            encoding: encoding.name().to_string(),
        });
    }
    Ok(text.into_owned())
}

fn sniff_meta_charset(bytes: &[u8]) -> Option<&'static Encoding> {
    let head = &bytes[..bytes.len().min(META_SNIFF_LIMIT)];
    let head = String::from_utf8_lossy(head).to_ascii_lowercase();
    let start = head.find("charset=")? + "charset=".len();
    let label: String = head[start..]
        .trim_start_matches(['"', '\''])
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.'))
        .collect();
    Encoding::for_label(label.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::decode_frame;

    #[test]
    fn utf8_bom_is_stripped() {
        assert_eq!(decode_frame(b"\xEF\xBB\xBF<p>hi</p>").unwrap(), "<p>hi</p>");
    }

    #[test]
    fn meta_charset_is_honoured() {
        let bytes = b"<html><head><meta charset=\"windows-1252\"></head><body>caf\xe9</body></html>";
        let decoded = decode_frame(bytes).unwrap();
        assert!(decoded.contains("caf\u{e9}"));
    }

    #[test]
    fn plain_utf8_is_detected() {
        let text = "<article>żółw</article>";
        assert_eq!(decode_frame(text.as_bytes()).unwrap(), text);
    }
}
