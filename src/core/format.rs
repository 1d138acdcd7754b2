//! Purpose: Centralize wire format versioning for contract responses.
//! Exports: `WIRE_FORMAT_VERSION`, `SUPPORTED_WIRE_FORMAT_VERSIONS`, `check_wire_version`.
//! Role: Shared gate for ABI entry points that decode node records.
//! Invariants: Version list is additive; bump only for incompatible layout changes.
//! Invariants: Version 2 carries packed u32 dates and the oracle vote arrays.

use crate::core::error::{Error, ErrorKind};

pub const WIRE_FORMAT_VERSION: u32 = 2;
pub const SUPPORTED_WIRE_FORMAT_VERSIONS: &[u32] = &[WIRE_FORMAT_VERSION];

pub fn wire_version_error(detected: u32) -> Error {
    let supported = SUPPORTED_WIRE_FORMAT_VERSIONS
        .iter()
        .map(|version| version.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    Error::new(ErrorKind::Usage)
        .with_message(format!(
            "unsupported wire format version {detected} (supported: {supported})"
        ))
        .with_hint("Rebuild the caller against the current quottery_shim.h.")
}

pub fn check_wire_version(version: u32) -> Result<(), Error> {
    if SUPPORTED_WIRE_FORMAT_VERSIONS.contains(&version) {
        Ok(())
    } else {
        Err(wire_version_error(version))
    }
}

#[cfg(test)]
mod tests {
    use super::{WIRE_FORMAT_VERSION, check_wire_version};
    use crate::core::error::ErrorKind;

    #[test]
    fn current_version_is_accepted() {
        check_wire_version(WIRE_FORMAT_VERSION).expect("current");
    }

    #[test]
    fn legacy_version_names_supported_list() {
        let err = check_wire_version(1).expect_err("legacy");
        assert_eq!(err.kind(), ErrorKind::Usage);
        assert!(err.message().unwrap_or("").contains("supported: 2"));
        assert!(err.hint().is_some());
    }
}
