use shared_types::Company;

/// Pull a bare, lowercased domain out of an email address or a URL/host.
///
/// Anything containing `@` is treated as an email and must have exactly one
/// `@` followed by a dotted host. Anything else is treated as a URL: the
/// scheme, a leading `www.` and any path are dropped. The result must contain
/// a dot, which rules out fragments like `"h"` or `"https:"`.
pub fn extract_domain(value: &str) -> Option<String> {
    let value = value.trim().to_lowercase();
    if value.is_empty() {
        return None;
    }

    if value.contains('@') {
        let parts: Vec<&str> = value.split('@').collect();
        if parts.len() != 2 {
            return None;
        }
        let host = parts[1];
        return host.contains('.').then(|| host.to_string());
    }

    let without_scheme = value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"))
        .unwrap_or(&value);
    let without_www = without_scheme
        .strip_prefix("www.")
        .unwrap_or(without_scheme);
    let host = without_www.split('/').next().unwrap_or_default();

    host.contains('.').then(|| host.to_string())
}

/// The domain a company is identified by.
///
/// Sources are tried in order `domain`, `website`, `email`; the first one
/// that yields a valid domain wins.
pub fn resolve_company_domain(company: &Company) -> Option<String> {
    [&company.domain, &company.website, &company.email]
        .into_iter()
        .flatten()
        .find_map(|value| extract_domain(value))
}
