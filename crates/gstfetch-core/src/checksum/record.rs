//! Parsed `.sha256sum` companion file.

/// Contents of a remote checksum file: `<digest> [<resource>]`.
///
/// Older publications carried the resource path as a second token; newer
/// ones may omit it, so `resource` is optional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecksumRecord {
    pub digest: String,
    pub resource: Option<String>,
}

impl ChecksumRecord {
    /// Split the body on whitespace. Returns `None` for an empty body.
    pub fn parse(body: &str) -> Option<Self> {
        let mut tokens = body.split_whitespace();
        let digest = tokens.next()?.to_string();
        let resource = tokens.next().map(|t| t.to_string());
        Some(Self { digest, resource })
    }

    /// Best-effort check of the optional resource token against the package.
    ///
    /// Returns `None` when the record names no resource. A `sha256sum`
    /// binary-mode marker (`*`) is ignored. The token matches when it equals
    /// the URL path or ends with the package file name as a path component.
    pub fn resource_matches(&self, url_path: &str, file_name: &str) -> Option<bool> {
        let resource = self.resource.as_deref()?;
        let resource = resource.strip_prefix('*').unwrap_or(resource);
        if resource == url_path || resource == file_name {
            return Some(true);
        }
        let matches = resource
            .rsplit(['/', '\\'])
            .next()
            .map(|last| last == file_name)
            .unwrap_or(false);
        Some(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FILE: &str = "gstreamer-1.0-1.16.2-x86_64.pkg";
    const PATH: &str = "/data/pkg/osx/1.16.2/gstreamer-1.0-1.16.2-x86_64.pkg";

    #[test]
    fn parse_digest_only() {
        let r = ChecksumRecord::parse("abcdef\n").unwrap();
        assert_eq!(r.digest, "abcdef");
        assert!(r.resource.is_none());
        assert_eq!(r.resource_matches(PATH, FILE), None);
    }

    #[test]
    fn parse_digest_and_resource() {
        let r = ChecksumRecord::parse(&format!("abcdef  {PATH}\n")).unwrap();
        assert_eq!(r.digest, "abcdef");
        assert_eq!(r.resource.as_deref(), Some(PATH));
        assert_eq!(r.resource_matches(PATH, FILE), Some(true));
    }

    #[test]
    fn parse_empty_body() {
        assert_eq!(ChecksumRecord::parse("  \n"), None);
    }

    #[test]
    fn resource_accepts_bare_name_and_binary_marker() {
        let r = ChecksumRecord::parse(&format!("abcdef *{FILE}")).unwrap();
        assert_eq!(r.resource_matches(PATH, FILE), Some(true));
        let r = ChecksumRecord::parse(&format!("abcdef /srv/www/{FILE}")).unwrap();
        assert_eq!(r.resource_matches(PATH, FILE), Some(true));
    }

    #[test]
    fn resource_mismatch_is_reported() {
        let r = ChecksumRecord::parse("abcdef gstreamer-1.0-devel-1.16.2-x86_64.pkg").unwrap();
        assert_eq!(r.resource_matches(PATH, FILE), Some(false));
    }
}
