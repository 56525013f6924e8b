// src/source/decode.rs

/// Decode raw bytes to text: UTF-8 first, EUC-KR on failure. The exports
/// this crate targets come from Korean-locale spreadsheet tools, which still
/// save CP949/EUC-KR by default.
pub fn decode(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => {
            let bytes = e.into_bytes();
            let (decoded, _, _) = encoding_rs::EUC_KR.decode(&bytes);
            decoded.into_owned()
        }
    }
}
