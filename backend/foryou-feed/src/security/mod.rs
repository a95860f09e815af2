//! Viewer access control.
//!
//! A viewer is allowed when the whitelist is empty (open access), when they
//! match the admin entry, or when they match any whitelist entry. Matching
//! is case-insensitive and accepts exact DIDs as well as handle/hostname
//! substrings in either direction, so `example.com` admits
//! `alice.example.com` and vice versa.

use crate::config::AccessConfig;

fn matches(entry: &str, viewer: &str) -> bool {
    if entry.is_empty() {
        return false;
    }
    let entry = entry.to_lowercase();
    let viewer = viewer.to_lowercase();
    entry == viewer || viewer.contains(&entry) || entry.contains(&viewer)
}

pub fn is_allowed(access: &AccessConfig, viewer: &str) -> bool {
    if viewer.is_empty() {
        return false;
    }
    if !access.admin.is_empty() && matches(&access.admin, viewer) {
        return true;
    }
    if access.whitelist.is_empty() {
        return true;
    }
    access.whitelist.iter().any(|entry| matches(entry, viewer))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn access(whitelist: &[&str], admin: &str) -> AccessConfig {
        AccessConfig {
            whitelist: whitelist.iter().map(|s| s.to_string()).collect(),
            admin: admin.to_string(),
        }
    }

    #[test]
    fn empty_whitelist_is_open_access() {
        assert!(is_allowed(&access(&[], ""), "did:plc:anyone"));
    }

    #[test]
    fn empty_viewer_is_always_denied() {
        assert!(!is_allowed(&access(&[], ""), ""));
    }

    #[test]
    fn admin_bypasses_whitelist() {
        let cfg = access(&["did:plc:listed"], "did:plc:admin");
        assert!(is_allowed(&cfg, "did:plc:admin"));
        assert!(!is_allowed(&cfg, "did:plc:other"));
    }

    #[test]
    fn handle_substring_matches_either_direction() {
        let cfg = access(&["example.com"], "");
        assert!(is_allowed(&cfg, "alice.example.com"));
        let cfg = access(&["alice.example.com"], "");
        assert!(is_allowed(&cfg, "example.com"));
    }

    #[test]
    fn matching_is_case_insensitive() {
        let cfg = access(&["Alice.Example.com"], "");
        assert!(is_allowed(&cfg, "alice.example.COM"));
    }
}
