use reqwest::Url;

/// Extracts the accounting key out of an address: lowercase host without a leading `www.`.
///
/// Anything that can't be parsed or doesn't carry a host (`about:blank`, `file:///tmp/a`, plain
/// garbage) yields an empty string, which callers treat as "nothing to attribute".
pub fn normalize_domain(address: &str) -> String {
    let Ok(url) = Url::parse(address) else {
        return String::new();
    };
    let host = url.host_str().unwrap_or_default().to_lowercase();
    match host.strip_prefix("www.") {
        Some(stripped) => stripped.to_owned(),
        None => host,
    }
}

#[cfg(test)]
mod tests {
    use super::normalize_domain;

    #[test]
    fn test_strips_www_and_lowercases() {
        assert_eq!(normalize_domain("https://www.Example.com/page"), "example.com");
    }

    #[test]
    fn test_keeps_subdomains() {
        assert_eq!(
            normalize_domain("https://developer.mozilla.org/en-US/docs?q=1#top"),
            "developer.mozilla.org"
        );
        assert_eq!(normalize_domain("http://WWW.github.com:8080/"), "github.com");
    }

    #[test]
    fn test_only_leading_www_is_removed() {
        assert_eq!(normalize_domain("https://www.www.test.io"), "www.test.io");
        assert_eq!(normalize_domain("https://mywww.test.io"), "mywww.test.io");
    }

    #[test]
    fn test_unparseable_addresses_are_empty() {
        assert_eq!(normalize_domain(""), "");
        assert_eq!(normalize_domain("not a url"), "");
        assert_eq!(normalize_domain("about:blank"), "");
        assert_eq!(normalize_domain("file:///home/user/notes.txt"), "");
    }
}
