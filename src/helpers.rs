use http::header::{HeaderName, HeaderValue};

use crate::Error;

pub(crate) fn convert_raw_header(name: &[u8], value: &[u8]) -> crate::Result<(HeaderName, HeaderValue)> {
    let header_name = HeaderName::from_bytes(name).map_err(|err| Error::DecodeHeaderName {
        name: String::from_utf8_lossy(name).into_owned(),
        cause: err.into(),
    })?;

    let header_value = HeaderValue::from_bytes(value).map_err(|err| Error::DecodeHeaderValue {
        value: value.to_vec(),
        cause: err.into(),
    })?;

    Ok((header_name, header_value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_raw_header() {
        let (name, value) = convert_raw_header(b"Content-Type", b"text/plain").unwrap();
        assert_eq!(name, http::header::CONTENT_TYPE);
        assert_eq!(value, "text/plain");

        let (_, value) = convert_raw_header(b"X-Trace", b"a\xffb").unwrap();
        assert_eq!(value.as_bytes(), b"a\xffb");

        assert!(convert_raw_header(b"", b"x").is_err());
        assert!(matches!(
            convert_raw_header(b"X-Bad", b"a\nb"),
            Err(Error::DecodeHeaderValue { .. })
        ));
    }
}
