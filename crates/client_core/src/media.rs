use chrono::Utc;
use url::Url;

pub const CACHE_BUST_PARAM: &str = "t";

/// Resolves a media URL against `base` and tags it with a cache-busting timestamp.
///
/// A URL that cannot be resolved is passed through with the timestamp appended
/// as a plain query string.
pub fn cache_busted_url(raw: &str, base: Option<&Url>, timestamp_millis: i64) -> String {
    let resolved = match base {
        Some(base) => base.join(raw),
        None => Url::parse(raw),
    };

    match resolved {
        Ok(mut url) => {
            url.query_pairs_mut()
                .append_pair(CACHE_BUST_PARAM, &timestamp_millis.to_string());
            url.into()
        }
        Err(_) => {
            let separator = if raw.contains('?') { '&' } else { '?' };
            format!("{raw}{separator}{CACHE_BUST_PARAM}={timestamp_millis}")
        }
    }
}

pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}
