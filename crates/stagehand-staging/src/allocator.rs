// allocator.rs — Deterministic staging-name proposer.
//
// Staging copies live next to their original, under a reserved prefix that
// makes them recognizable and keeps them out of the directory listings
// editors show. Collisions (stale copies from crashed sessions) are rare,
// so linear probing with a small integer suffix keeps names
// human-inspectable. The allocator only proposes names — it never reserves
// one; the caller binds a candidate by attempting the store copy.

use stagehand_store::{parent_folder, resource_name};

/// Reserved prefix that marks a resource as a staging copy.
pub const STAGING_PREFIX: &str = "__temp_";

/// Default cap on collision probes before giving up. Bounds the loop when
/// the namespace is pathologically polluted with stale copies.
pub const DEFAULT_PROBE_CAP: usize = 1000;

/// Stateless, side-effect-free staging-name allocator.
pub struct NameAllocator;

impl NameAllocator {
    /// Base staging name for an original path: same parent folder, the
    /// reserved prefix, then the original name.
    ///
    /// `/a/doc.txt` → `/a/__temp_doc.txt`.
    pub fn staging_base(original_path: &str) -> String {
        format!(
            "{}{}{}",
            parent_folder(original_path),
            STAGING_PREFIX,
            resource_name(original_path)
        )
    }

    /// Candidate names in probe order: `base`, `base0`, `base1`, …
    ///
    /// The sequence is unbounded; callers apply their probe cap with
    /// `take`.
    pub fn candidates(base: &str) -> impl Iterator<Item = String> + '_ {
        std::iter::once(base.to_string()).chain((0u32..).map(move |n| format!("{}{}", base, n)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_keeps_parent_and_prefixes_name() {
        assert_eq!(
            NameAllocator::staging_base("/a/doc.txt"),
            "/a/__temp_doc.txt"
        );
        assert_eq!(
            NameAllocator::staging_base("/a/b/c/page.html"),
            "/a/b/c/__temp_page.html"
        );
    }

    #[test]
    fn base_of_bare_name() {
        assert_eq!(NameAllocator::staging_base("doc.txt"), "__temp_doc.txt");
    }

    #[test]
    fn candidates_probe_in_order() {
        let names: Vec<String> = NameAllocator::candidates("/a/__temp_doc.txt")
            .take(4)
            .collect();
        assert_eq!(
            names,
            vec![
                "/a/__temp_doc.txt",
                "/a/__temp_doc.txt0",
                "/a/__temp_doc.txt1",
                "/a/__temp_doc.txt2",
            ]
        );
    }

    #[test]
    fn candidates_do_not_overlap() {
        // Suffixes never collide with each other or with the base.
        let names: Vec<String> = NameAllocator::candidates("/a/__temp_doc.txt")
            .take(50)
            .collect();
        let mut deduped = names.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), names.len());
    }
}
