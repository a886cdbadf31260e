use http::header::{self, HeaderMap};

use crate::constants;

pub(crate) struct ContentDisposition {
    pub(crate) field_name: Option<String>,
    pub(crate) file_name: Option<String>,
}

impl ContentDisposition {
    pub fn parse(headers: &HeaderMap) -> ContentDisposition {
        let content_disposition = headers.get(header::CONTENT_DISPOSITION).map(|val| val.as_bytes());

        let field_name = content_disposition.and_then(|val| param(val, "name"));
        let file_name = content_disposition.and_then(|val| param(val, "filename"));

        ContentDisposition { field_name, file_name }
    }
}

/// Looks up a `key=value` or `key="value"` parameter after the disposition type.
fn param(value: &[u8], key: &str) -> Option<String> {
    constants::CONTENT_DISPOSITION_PARAM_RE
        .captures_iter(value)
        .find(|cap| cap[1].eq_ignore_ascii_case(key.as_bytes()))
        .and_then(|cap| cap.get(2).or_else(|| cap.get(3)))
        .filter(|m| !m.as_bytes().is_empty())
        .and_then(|m| std::str::from_utf8(m.as_bytes()).ok())
        .map(|val| val.to_owned())
}
