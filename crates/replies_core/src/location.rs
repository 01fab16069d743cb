use url::Url;

use crate::RunError;

const REPLIES_MARKER: &str = "/with_replies";

/// Whether `location` points at a "replies timeline for user X" page.
/// Anything else leaves the harvester inert.
pub fn is_replies_timeline(location: &str) -> bool {
    location_path(location).contains(REPLIES_MARKER)
}

/// Target identity from the first path segment of `location`,
/// e.g. `https://x.com/alice/with_replies` yields `alice`.
pub fn resolve_target_identity(location: &str) -> Result<String, RunError> {
    let path = location_path(location);
    path.split('/')
        .nth(1)
        .filter(|segment| !segment.is_empty())
        .map(ToOwned::to_owned)
        .ok_or_else(|| RunError::IdentityResolution {
            location: location.to_string(),
        })
}

/// Accepts either an absolute URL or a bare path.
fn location_path(location: &str) -> String {
    let trimmed = location.trim();
    match Url::parse(trimmed) {
        Ok(url) => url.path().to_string(),
        Err(_) if trimmed.starts_with('/') => trimmed.to_string(),
        Err(_) => format!("/{trimmed}"),
    }
}

#[cfg(test)]
mod tests {
    use super::{is_replies_timeline, resolve_target_identity};
    use crate::RunError;

    #[test]
    fn replies_timeline_detection() {
        assert!(is_replies_timeline("https://x.com/alice/with_replies"));
        assert!(is_replies_timeline("/alice/with_replies"));
        assert!(!is_replies_timeline("https://x.com/alice"));
    }

    #[test]
    fn identity_comes_from_first_segment() {
        assert_eq!(
            resolve_target_identity("https://twitter.com/bob/with_replies").unwrap(),
            "bob"
        );
        assert_eq!(resolve_target_identity("bob/with_replies").unwrap(), "bob");
    }

    #[test]
    fn empty_first_segment_fails() {
        assert_eq!(
            resolve_target_identity("https://x.com/"),
            Err(RunError::IdentityResolution {
                location: "https://x.com/".to_string()
            })
        );
        assert!(resolve_target_identity("https://x.com//with_replies").is_err());
    }
}
