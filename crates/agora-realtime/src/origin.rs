//! Origin admission for WebSocket upgrades.

/// Whether a connection's `Origin` header is acceptable.
///
/// An empty allow-list admits everything, which keeps local development
/// and non-browser clients working out of the box. With a non-empty
/// list the header must match one entry exactly, and a missing header
/// is rejected.
pub fn origin_allowed(origin: Option<&str>, allowed: &[String]) -> bool {
    if allowed.is_empty() {
        return true;
    }

    match origin {
        Some(origin) => allowed.iter().any(|candidate| candidate == origin),
        None => false,
    }
}
