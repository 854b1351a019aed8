use reqwest::Url;
use std::net::IpAddr;

pub fn parse_bool_str(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Loopback and unspecified addresses, plus `localhost`.
pub fn is_local_endpoint_url(url: &str) -> bool {
    let Ok(parsed) = Url::parse(url.trim()) else {
        return false;
    };
    let Some(host) = parsed.host_str() else {
        return false;
    };
    if host.eq_ignore_ascii_case("localhost") {
        return true;
    }
    host.trim_start_matches('[')
        .trim_end_matches(']')
        .parse::<IpAddr>()
        .is_ok_and(|ip| ip.is_loopback() || ip.is_unspecified())
}

/// `{base}/threads/{thread_id}/{tail...}`, with the thread id encoded as a
/// single path segment. A base that is not a URL is joined as plain text;
/// `Config::validate` rejects it before any request is made.
pub fn thread_endpoint(base: &str, thread_id: &str, tail: &[&str]) -> String {
    let mut segments = vec!["threads", thread_id.trim()];
    segments.extend_from_slice(tail);

    let base = base.trim();
    let Ok(mut url) = Url::parse(base) else {
        return format!("{}/{}", base.trim_end_matches('/'), segments.join("/"));
    };
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(&segments);
    }
    url.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bool_flags_accept_common_spellings() {
        assert_eq!(parse_bool_str("true"), Some(true));
        assert_eq!(parse_bool_str("0"), Some(false));
        assert_eq!(parse_bool_str(" YES "), Some(true));
        assert_eq!(parse_bool_str("maybe"), None);
    }

    #[test]
    fn test_local_servers_are_recognised_by_host() {
        assert!(is_local_endpoint_url(" HTTP://LOCALHOST:2024 "));
        assert!(is_local_endpoint_url("https://127.0.0.1/threads"));
        assert!(is_local_endpoint_url("http://[::1]:2024"));
        assert!(is_local_endpoint_url("http://0.0.0.0:2024"));
        assert!(!is_local_endpoint_url("https://evil-localhost.com/threads"));
        assert!(!is_local_endpoint_url("https://api.smith.langchain.com"));
        assert!(!is_local_endpoint_url("localhost:2024"));
    }

    #[test]
    fn test_thread_endpoints_keep_the_base_path() {
        assert_eq!(
            thread_endpoint("http://localhost:2024/", "t-1", &["runs"]),
            "http://localhost:2024/threads/t-1/runs"
        );
        assert_eq!(
            thread_endpoint("https://host.example/api", "t-1", &["runs"]),
            "https://host.example/api/threads/t-1/runs"
        );
    }

    #[test]
    fn test_thread_ids_cannot_escape_their_segment() {
        assert_eq!(
            thread_endpoint("http://localhost:2024", " a/b c ", &["runs"]),
            "http://localhost:2024/threads/a%2Fb%20c/runs"
        );
    }
}
