use crate::UrlError;
use url::Url;

/// Normalizes a URL into the canonical form used as the frontier's
/// deduplication key.
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Validate the scheme (HTTP and HTTPS only)
/// 3. Lowercase the host/domain
/// 4. Remove www. prefix from the domain
/// 5. Normalize path:
///    - Remove dot segments (. and ..)
///    - Collapse duplicate slashes
///    - Remove trailing slash (except for root /)
///    - Empty path becomes /
/// 6. Remove fragment (everything after #)
/// 7. Drop all query parameters except those in `keep_query`
///    (pagination parameters are the only ones that matter for identity)
/// 8. Sort surviving query parameters alphabetically
/// 9. Remove empty query string (trailing ?)
///
/// # Arguments
///
/// * `url_str` - The URL string to normalize
/// * `keep_query` - Query parameter names that survive normalization
///
/// # Examples
///
/// ```
/// use larder::url::normalize_url;
///
/// let url = normalize_url("https://WWW.Example.com/in/cheese/?ref=nav#top", &[]).unwrap();
/// assert_eq!(url.as_str(), "https://example.com/in/cheese");
///
/// let paged = normalize_url("https://example.com/in/cheese?ref=nav&page=2", &["page"]).unwrap();
/// assert_eq!(paged.as_str(), "https://example.com/in/cheese?page=2");
/// ```
pub fn normalize_url(url_str: &str, keep_query: &[&str]) -> Result<Url, UrlError> {
    // Step 1: Parse the URL
    let mut url = Url::parse(url_str).map_err(|e| UrlError::Parse(e.to_string()))?;

    // Step 2: Validate scheme (both schemes supported so tests can run
    // against plain-HTTP mock servers)
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    // Step 3 & 4: Lowercase the host and remove www. prefix
    if let Some(host) = url.host_str() {
        let mut normalized_host = host.to_lowercase();

        if normalized_host.starts_with("www.") {
            normalized_host = normalized_host[4..].to_string();
        }

        url.set_host(Some(&normalized_host))
            .map_err(|e| UrlError::Malformed(format!("Failed to set host: {}", e)))?;
    } else {
        return Err(UrlError::MissingDomain);
    }

    // Step 5: Normalize path
    let normalized_path = normalize_path(url.path());
    url.set_path(&normalized_path);

    // Step 6: Remove fragment
    url.set_fragment(None);

    // Step 7 & 8: Keep only the allowed query parameters, sorted
    if url.query().is_some() {
        let kept_params = filter_and_sort_query_params(&url, keep_query);

        // Step 9: Set query or remove if empty
        if kept_params.is_empty() {
            url.set_query(None);
        } else {
            let query_string = kept_params
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect::<Vec<_>>()
                .join("&");
            url.set_query(Some(&query_string));
        }
    }

    Ok(url)
}

/// Normalizes a URL path by removing dot segments and trailing slashes
fn normalize_path(path: &str) -> String {
    if path.is_empty() {
        return "/".to_string();
    }

    let segments: Vec<&str> = path.split('/').collect();
    let mut normalized_segments: Vec<&str> = Vec::new();

    for segment in segments {
        match segment {
            // Skip empty segments (from multiple slashes) and current directory markers
            "" | "." => continue,
            // Parent directory - pop the last segment if possible
            ".." => {
                if !normalized_segments.is_empty() {
                    normalized_segments.pop();
                }
            }
            // Regular segment
            _ => normalized_segments.push(segment),
        }
    }

    if normalized_segments.is_empty() {
        return "/".to_string();
    }

    format!("/{}", normalized_segments.join("/"))
}

/// Keeps only the allowed query parameters and sorts them by key
fn filter_and_sort_query_params(url: &Url, keep_query: &[&str]) -> Vec<(String, String)> {
    let mut params: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| keep_query.contains(&key.as_ref()))
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    params.sort_by(|a, b| a.0.cmp(&b.0));

    params
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercase_host() {
        let result = normalize_url("https://EXAMPLE.COM/Page", &[]).unwrap();
        assert_eq!(result.as_str(), "https://example.com/Page");
    }

    #[test]
    fn test_remove_www() {
        let result = normalize_url("https://www.example.com/", &[]).unwrap();
        assert_eq!(result.as_str(), "https://example.com/");
    }

    #[test]
    fn test_scheme_preserved() {
        let result = normalize_url("http://example.com/page", &[]).unwrap();
        assert_eq!(result.as_str(), "http://example.com/page");
    }

    #[test]
    fn test_remove_trailing_slash() {
        let result = normalize_url("https://example.com/in/cheese/", &[]).unwrap();
        assert_eq!(result.as_str(), "https://example.com/in/cheese");
    }

    #[test]
    fn test_keep_root_slash() {
        let result = normalize_url("https://example.com/", &[]).unwrap();
        assert_eq!(result.as_str(), "https://example.com/");
    }

    #[test]
    fn test_remove_fragment() {
        let result = normalize_url("https://example.com/page#reviews", &[]).unwrap();
        assert_eq!(result.as_str(), "https://example.com/page");
    }

    #[test]
    fn test_drop_all_query_params_by_default() {
        let result = normalize_url("https://example.com/page?ref=nav&src=banner", &[]).unwrap();
        assert_eq!(result.as_str(), "https://example.com/page");
    }

    #[test]
    fn test_keep_pagination_param() {
        let result =
            normalize_url("https://example.com/in/dairy?page=3&ref=nav", &["page"]).unwrap();
        assert_eq!(result.as_str(), "https://example.com/in/dairy?page=3");
    }

    #[test]
    fn test_kept_params_sorted() {
        let result = normalize_url(
            "https://example.com/list?page=2&offset=10",
            &["page", "offset"],
        )
        .unwrap();
        assert_eq!(result.as_str(), "https://example.com/list?offset=10&page=2");
    }

    #[test]
    fn test_normalize_path_with_dots() {
        let result = normalize_url("https://example.com/a/../b/./c", &[]).unwrap();
        assert_eq!(result.as_str(), "https://example.com/b/c");
    }

    #[test]
    fn test_multiple_slashes() {
        let result = normalize_url("https://example.com///in//cheese", &[]).unwrap();
        assert_eq!(result.as_str(), "https://example.com/in/cheese");
    }

    #[test]
    fn test_invalid_scheme() {
        let result = normalize_url("ftp://example.com/page", &[]);
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), UrlError::InvalidScheme(_)));
    }

    #[test]
    fn test_malformed_url() {
        let result = normalize_url("not a url", &[]);
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_path_becomes_root() {
        let result = normalize_url("https://example.com", &[]).unwrap();
        assert_eq!(result.as_str(), "https://example.com/");
    }

    #[test]
    fn test_two_relative_forms_collapse() {
        let a = normalize_url("https://example.com/in/a/../brownie/", &[]).unwrap();
        let b = normalize_url("https://example.com/in/brownie", &[]).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_parent_directory_at_root() {
        let result = normalize_url("https://example.com/../page", &[]).unwrap();
        assert_eq!(result.as_str(), "https://example.com/page");
    }
}
