//! Deterministic file identifiers.
//!
//! Production file ids are random v4 UUIDs. Tests and fixtures sometimes need
//! reproducible ids that still pass the v4 filename checks applied by sidecar
//! discovery; this helper derives one from a name.

use uuid::Uuid;

/// Derives a stable, v4-shaped file id from a name.
///
/// The same name always yields the same id. The result carries the RFC 4122
/// variant and version-4 bits, so it is indistinguishable from a random file
/// id to anything that validates filenames.
pub fn deterministic_file_id(name: &str) -> Uuid {
    let digest = blake3::hash(name.as_bytes());
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&digest.as_bytes()[..16]);
    uuid::Builder::from_random_bytes(bytes).into_uuid()
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::{Variant, Version};

    #[test]
    fn should_derive_stable_id_from_name() {
        // given/when
        let a = deterministic_file_id("node-001");
        let b = deterministic_file_id("node-001");

        // then
        assert_eq!(a, b);
    }

    #[test]
    fn should_derive_distinct_ids_from_distinct_names() {
        // given/when
        let a = deterministic_file_id("node-001");
        let b = deterministic_file_id("node-002");

        // then
        assert_ne!(a, b);
    }

    #[test]
    fn should_carry_v4_version_and_variant_bits() {
        // given/when
        let id = deterministic_file_id("any-name");

        // then
        assert_eq!(id.get_version(), Some(Version::Random));
        assert_eq!(id.get_variant(), Variant::RFC4122);
    }
}
