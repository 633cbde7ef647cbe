//! Request URL composition.

use crate::config::QueryEncoding;
use indexmap::IndexMap;

/// Query parameters in insertion order. Keys are unique.
pub type Query = IndexMap<String, String>;

/// Joins `base`, each segment of `segments` and the query string.
///
/// Segments are concatenated literally; no slash is added or removed. The
/// query is appended as `?k1=v1&k2=v2` in insertion order, or with a leading
/// `&` when the path already carries a `?`.
///
/// # Examples
///
/// ```
/// use chainfetch::compose::{compose, Query};
/// use chainfetch::QueryEncoding;
///
/// let mut query = Query::new();
/// query.insert("page".to_string(), "2".to_string());
///
/// let url = compose("http://host/api", &["/users", "/42"], &query, QueryEncoding::Raw);
/// assert_eq!(url, "http://host/api/users/42?page=2");
/// ```
pub fn compose<S: AsRef<str>>(
    base: &str,
    segments: &[S],
    query: &Query,
    encoding: QueryEncoding,
) -> String {
    let mut url = String::from(base);
    for segment in segments {
        url.push_str(segment.as_ref());
    }

    if query.is_empty() {
        return url;
    }

    let mut separator = if url.contains('?') { '&' } else { '?' };
    for (key, value) in query {
        url.push(separator);
        match encoding {
            QueryEncoding::Raw => {
                url.push_str(key);
                url.push('=');
                url.push_str(value);
            }
            QueryEncoding::Percent => {
                url.extend(url::form_urlencoded::byte_serialize(key.as_bytes()));
                url.push('=');
                url.extend(url::form_urlencoded::byte_serialize(value.as_bytes()));
            }
        }
        separator = '&';
    }

    url
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(pairs: &[(&str, &str)]) -> Query {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_no_segments_no_query() {
        let url = compose::<&str>("http://host/", &[], &Query::new(), QueryEncoding::Raw);
        assert_eq!(url, "http://host/");
    }

    #[test]
    fn test_segments_are_not_normalized() {
        let url = compose("http://host/", &["/a", "b//", "c"], &Query::new(), QueryEncoding::Raw);
        assert_eq!(url, "http://host//ab//c");
    }

    #[test]
    fn test_query_in_insertion_order() {
        let url = compose(
            "http://host/search",
            &[] as &[&str],
            &query(&[("z", "1"), ("a", "2")]),
            QueryEncoding::Raw,
        );
        assert_eq!(url, "http://host/search?z=1&a=2");
    }

    #[test]
    fn test_raw_values_are_not_encoded() {
        let url = compose(
            "http://host/q",
            &[] as &[&str],
            &query(&[("term", "a b&c")]),
            QueryEncoding::Raw,
        );
        assert_eq!(url, "http://host/q?term=a b&c");
    }

    #[test]
    fn test_percent_mode_encodes_keys_and_values() {
        let url = compose(
            "http://host/q",
            &[] as &[&str],
            &query(&[("the term", "a b&c=d")]),
            QueryEncoding::Percent,
        );
        assert_eq!(url, "http://host/q?the+term=a+b%26c%3Dd");
    }

    #[test]
    fn test_existing_query_is_extended() {
        let url = compose(
            "http://host/q?fixed=1",
            &[] as &[&str],
            &query(&[("k", "v")]),
            QueryEncoding::Raw,
        );
        assert_eq!(url, "http://host/q?fixed=1&k=v");
    }
}
