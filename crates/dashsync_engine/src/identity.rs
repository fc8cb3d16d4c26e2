//! Matching desired definitions against the dashboard listing.
//!
//! Two rules live here and are kept apart on purpose:
//! - [`find_match`] checks all four identity keys and guards a single create.
//! - [`find_by_id`] checks the primary id only and backs update and bulk sync.

use dashsync_protocol::{ApiDefinition, RecordId, RemoteRecord};
use std::fmt;

/// An identity key, in matching priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IdentityKey {
    /// Primary identifier.
    Id,
    /// Dashboard-assigned API id.
    ApiId,
    /// URL-safe alias.
    Slug,
    /// Path prefix the API is served under.
    ListenPath,
}

impl IdentityKey {
    /// All keys, highest priority first.
    pub const ALL: [IdentityKey; 4] = [
        IdentityKey::Id,
        IdentityKey::ApiId,
        IdentityKey::Slug,
        IdentityKey::ListenPath,
    ];

    /// Reads this key from a definition.
    pub fn value_of<'a>(&self, def: &'a ApiDefinition) -> &'a str {
        match self {
            IdentityKey::Id => def.id.as_str(),
            IdentityKey::ApiId => &def.api_id,
            IdentityKey::Slug => &def.slug,
            IdentityKey::ListenPath => def.listen_path(),
        }
    }
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            IdentityKey::Id => "id",
            IdentityKey::ApiId => "api id",
            IdentityKey::Slug => "slug",
            IdentityKey::ListenPath => "listen path",
        })
    }
}

/// A remote record that shares an identity key with a desired definition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Match<'a> {
    /// Highest-priority key that matched.
    pub key: IdentityKey,
    /// The matching record.
    pub record: &'a RemoteRecord,
}

impl Match<'_> {
    /// Returns the value both sides share.
    pub fn value(&self) -> &str {
        self.key.value_of(&self.record.api_definition)
    }
}

/// Finds a remote record sharing any identity key with `def`.
///
/// Keys are tried in priority order across the whole listing, so an id
/// match on any record wins over a slug match on an earlier one. A key
/// that is empty on `def` never matches.
pub fn find_match<'a>(def: &ApiDefinition, listing: &'a [RemoteRecord]) -> Option<Match<'a>> {
    IdentityKey::ALL.into_iter().find_map(|key| {
        let wanted = key.value_of(def);
        if wanted.is_empty() {
            return None;
        }
        listing
            .iter()
            .find(|record| key.value_of(&record.api_definition) == wanted)
            .map(|record| Match { key, record })
    })
}

/// Returns true if `def` collides with anything in the listing.
pub fn exists_remotely(def: &ApiDefinition, listing: &[RemoteRecord]) -> bool {
    find_match(def, listing).is_some()
}

/// Finds the remote record with the given primary id.
pub fn find_by_id<'a>(id: &RecordId, listing: &'a [RemoteRecord]) -> Option<&'a RemoteRecord> {
    if id.is_empty() {
        return None;
    }
    listing.iter().find(|record| record.id() == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn def(id: &str, api_id: &str, slug: &str, listen_path: &str) -> ApiDefinition {
        let mut def = ApiDefinition::new(id, format!("api {id}"));
        def.api_id = api_id.into();
        def.slug = slug.into();
        def.proxy.listen_path = listen_path.into();
        def
    }

    fn record(id: &str, api_id: &str, slug: &str, listen_path: &str) -> RemoteRecord {
        RemoteRecord::from_definition(def(id, api_id, slug, listen_path))
    }

    #[test]
    fn id_wins_over_slug_mismatch() {
        let listing = vec![record("a", "x", "foo", "/foo/")];
        let m = find_match(&def("a", "", "foo2", "/other/"), &listing).unwrap();
        assert_eq!(m.key, IdentityKey::Id);
        assert_eq!(m.value(), "a");
    }

    #[test]
    fn each_key_blocks_on_its_own() {
        let listing = vec![record("a", "x", "foo", "/foo/")];

        let m = find_match(&def("b", "x", "", ""), &listing).unwrap();
        assert_eq!(m.key, IdentityKey::ApiId);

        let m = find_match(&def("b", "y", "foo", ""), &listing).unwrap();
        assert_eq!(m.key, IdentityKey::Slug);

        let m = find_match(&def("b", "y", "bar", "/foo/"), &listing).unwrap();
        assert_eq!(m.key, IdentityKey::ListenPath);

        assert!(find_match(&def("b", "y", "bar", "/bar/"), &listing).is_none());
    }

    #[test]
    fn priority_is_across_the_listing() {
        let listing = vec![record("a", "", "shared", ""), record("b", "", "other", "")];
        let m = find_match(&def("b", "", "shared", ""), &listing).unwrap();
        assert_eq!(m.key, IdentityKey::Id);
        assert_eq!(m.record.id().as_str(), "b");
    }

    #[test]
    fn empty_keys_never_match() {
        let listing = vec![record("a", "", "", "")];
        assert!(!exists_remotely(&def("", "", "", ""), &listing));
        assert!(exists_remotely(&def("a", "", "", ""), &listing));
    }

    #[test]
    fn listen_path_compares_against_desired() {
        let listing = vec![record("a", "x", "foo", "/foo/")];
        assert!(!exists_remotely(&def("b", "y", "bar", "/bar/"), &listing));
        assert!(exists_remotely(&def("b", "y", "bar", "/foo/"), &listing));
    }

    #[test]
    fn find_by_id_ignores_other_keys() {
        let listing = vec![record("a", "x", "foo", "/foo/")];
        assert!(find_by_id(&"a".into(), &listing).is_some());
        assert!(find_by_id(&"b".into(), &listing).is_none());
        assert!(find_by_id(&RecordId::default(), &listing).is_none());
    }
}
