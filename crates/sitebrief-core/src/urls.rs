use url::{Host, Url};

use crate::error::AppError;

/// Prepend `https://` to URLs that carry no `http://` or `https://` scheme.
///
/// Example: `"example.com"` → `"https://example.com"`
pub fn normalize_url(url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{url}")
    }
}

/// Check that user input names a fetchable web page.
///
/// Accepts an optional `http`/`https` scheme, then a dotted domain with an
/// alphabetic top-level label (`example.com`, `blog.example.co.uk`), an IP
/// literal, or `localhost`, with an optional port, path, and query.
pub fn is_valid_url(input: &str) -> bool {
    let input = input.trim();
    if input.is_empty() || input.chars().any(char::is_whitespace) {
        return false;
    }

    let Ok(parsed) = Url::parse(&normalize_url(input)) else {
        return false;
    };
    if !parsed.username().is_empty() || parsed.password().is_some() {
        return false;
    }

    match parsed.host() {
        Some(Host::Domain(domain)) => is_valid_domain(domain),
        Some(Host::Ipv4(_)) | Some(Host::Ipv6(_)) => true,
        None => false,
    }
}

fn is_valid_domain(domain: &str) -> bool {
    if domain == "localhost" {
        return true;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    let Some((tld, rest)) = labels.split_last() else {
        return false;
    };

    !rest.is_empty()
        && tld.len() >= 2
        && tld.chars().all(|c| c.is_ascii_alphabetic())
        && rest.iter().all(|label| {
            !label.is_empty() && label.chars().all(|c| c.is_alphanumeric() || c == '-' || c == '_')
        })
}

/// Resolve a possibly-relative link against the page it was found on.
///
/// Only `http`/`https` targets are fetchable; `mailto:`, `tel:` and the like
/// fail with [`AppError::FetchError`].
pub fn resolve_link(base: &str, link: &str) -> Result<String, AppError> {
    let base = Url::parse(base)
        .map_err(|e| AppError::ConfigError(format!("Invalid base URL {base}: {e}")))?;
    let resolved = base
        .join(link)
        .map_err(|e| AppError::FetchError(format!("Invalid link {link}: {e}")))?;

    match resolved.scheme() {
        "http" | "https" => Ok(resolved.into()),
        scheme => Err(AppError::FetchError(format!(
            "Unsupported link scheme '{scheme}' in {link}"
        ))),
    }
}
