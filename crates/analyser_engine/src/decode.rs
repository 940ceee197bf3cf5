use chardetng::EncodingDetector;
use encoding_rs::Encoding;

/// Response body decoded into UTF-8.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedFragment {
    pub html: String,
    pub encoding_label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("failed to decode response body as {encoding}")]
    DecodeFailure { encoding: String },
}

/// Decode raw bytes into UTF-8 using: BOM -> Content-Type charset -> chardetng fallback.
pub fn decode_fragment(
    bytes: &[u8],
    content_type: Option<&str>,
) -> Result<DecodedFragment, DecodeError> {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return decode_with(bytes, encoding);
    }

    if let Some(encoding) = content_type.and_then(charset_from_content_type) {
        return decode_with(bytes, encoding);
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    decode_with(bytes, detector.guess(None, true))
}

fn charset_from_content_type(content_type: &str) -> Option<&'static Encoding> {
    content_type.split(';').skip(1).find_map(|part| {
        let (key, value) = part.trim().split_once('=')?;
        if !key.trim().eq_ignore_ascii_case("charset") {
            return None;
        }
        Encoding::for_label(value.trim_matches([' ', '"', '\''].as_ref()).as_bytes())
    })
}

fn decode_with(bytes: &[u8], encoding: &'static Encoding) -> Result<DecodedFragment, DecodeError> {
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        return Err(DecodeError::DecodeFailure {
            encoding: encoding.name().to_string(),
        });
    }
    Ok(DecodedFragment {
        html: text.into_owned(),
        encoding_label: encoding.name().to_string(),
    })
}
