//! See [`AnalysisId`].

use std::fmt::{self, Display, Formatter};

use derive_more::derive::{Deref, From};
use ring::digest::{digest, SHA256};
use serde_with::SerializeDisplay;

/// The prefix of every [`AnalysisId`] when displayed.
const PREFIX: &str = "analysis_";

/// An analysis ID, displayed and serialized as `analysis_<n>` with `n` below [`AnalysisId::MODULUS`].
///
/// It's derived from a hash of the uploaded image's bytes, so identical uploads always get the same
/// ID. With so few possible values, different uploads often share one too. It's only for display
/// and must never be used as a unique key.
#[derive(Deref, From, SerializeDisplay, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub(crate) struct AnalysisId(u16);

impl AnalysisId {
    /// The exclusive upper bound of an analysis ID's number.
    pub(crate) const MODULUS: u64 = 10_000;

    /// Derives an analysis ID from the content of an upload.
    pub(crate) fn from_content<T: AsRef<[u8]>>(bytes: &T) -> Self {
        let hash = digest(&SHA256, bytes.as_ref());

        let mut prefix = [0; 8];
        prefix.copy_from_slice(&hash.as_ref()[..8]);

        let number = u64::from_be_bytes(prefix) % Self::MODULUS;

        Self(u16::try_from(number).expect("number should be less than `MODULUS`"))
    }
}

impl Display for AnalysisId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{PREFIX}{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_content_same_id() {
        let bytes = b"the same bytes twice";

        assert_eq!(
            AnalysisId::from_content(bytes),
            AnalysisId::from_content(&bytes.to_vec()),
        );
    }

    #[test]
    fn id_is_bounded() {
        for length in 0..64_u8 {
            let bytes: Vec<u8> = (0..length).collect();
            let id = AnalysisId::from_content(&bytes);

            assert!(
                u64::from(*id) < AnalysisId::MODULUS,
                "analysis ID number should be below the modulus"
            );
        }
    }

    #[test]
    fn id_display_format() {
        assert_eq!(AnalysisId::from(42).to_string(), "analysis_42");
        assert_eq!(
            serde_json::to_value(AnalysisId::from(7)).ok(),
            Some(serde_json::json!("analysis_7")),
        );
    }
}
