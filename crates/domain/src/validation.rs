use std::str::FromStr;

use hickory_proto::rr::Name;

use crate::errors::DomainError;
use crate::zone::Zone;

const MAX_LABEL_LEN: usize = 63;

/// Checks that `domain` may be written by `owner`.
///
/// The name must be fully qualified, sit below the apex inside the owner's own
/// subdomain, avoid reserved subdomains, and not repeat the apex.
pub fn validate_domain_name(domain: &str, owner: &str, zone: &Zone) -> Result<(), DomainError> {
    let invalid = |reason: String| Err(DomainError::InvalidDomainName(reason));

    if !domain.ends_with('.') {
        return invalid(format!("{domain} must end with '.'"));
    }

    let labels = &domain[..domain.len() - 1];
    if labels
        .split('.')
        .any(|l| l.is_empty() || l.len() > MAX_LABEL_LEN)
        || Name::from_str(domain).is_err()
    {
        return invalid(format!("{domain} is not a valid domain name"));
    }

    let normalized = domain.to_ascii_lowercase();
    let apex = zone.apex();
    let Some(relative) = zone.relative_part(&normalized) else {
        return invalid(format!("{domain} must end with .{apex}"));
    };

    let subdomain = relative.rsplit('.').next().unwrap_or_default();
    if subdomain != owner.to_ascii_lowercase() {
        return invalid(format!("{domain} does not belong to {owner}"));
    }
    if zone.is_reserved(subdomain) {
        return invalid(format!("{subdomain} is reserved"));
    }
    if relative.contains(apex.trim_end_matches('.')) {
        return invalid(format!("{domain} repeats {apex}"));
    }

    Ok(())
}
