use crate::{UrlError, UrlResult};

/// Extracts the host and the address (scheme + host) from a URL
///
/// The URL is split on `/`: the host is the third field (after the scheme and
/// the empty segment between the two slashes) and the address is
/// `scheme//host`. No further parsing is done, so ports and userinfo stay part
/// of the host.
///
/// # Arguments
///
/// * `url` - An absolute URL of the form `scheme://host/...`
///
/// # Returns
///
/// * `Ok((host, address))` - The host and the address prefix
/// * `Err(UrlError::Malformed)` - The URL has fewer than three `/` fields or an empty host
///
/// # Examples
///
/// ```
/// use web_scout::url::extract_host_and_address;
///
/// let (host, address) = extract_host_and_address("https://pkg.go.dev/std").unwrap();
/// assert_eq!(host, "pkg.go.dev");
/// assert_eq!(address, "https://pkg.go.dev");
/// ```
pub fn extract_host_and_address(url: &str) -> UrlResult<(String, String)> {
    let fields: Vec<&str> = url.split('/').collect();

    if fields.len() < 3 || fields[0].is_empty() || !fields[1].is_empty() || fields[2].is_empty() {
        return Err(UrlError::Malformed(url.to_string()));
    }

    let host = fields[2].to_string();
    let address = format!("{}//{}", fields[0], host);

    Ok((host, address))
}
