use crate::core::{IntCst, INT_CST_MAX};
use thiserror::Error;

/// A malformed request made while building a model.
///
/// These are reported immediately to the caller of the posting function, never during search.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ArgumentError {
    #[error("{constraint}: argument arrays have mismatched sizes {sizes:?}")]
    SizeMismatch {
        constraint: &'static str,
        sizes: Vec<usize>,
    },
    #[error("{constraint}: mandatory fraction {value} is not in the open interval (0, 1)")]
    InvalidFraction { constraint: &'static str, value: f64 },
    #[error("{constraint}: negative extent {extent} for item {index}")]
    NegativeExtent {
        constraint: &'static str,
        index: usize,
        extent: IntCst,
    },
    #[error("{constraint}: extent {extent} for item {index} exceeds the largest supported value")]
    ExtentTooLarge {
        constraint: &'static str,
        index: usize,
        extent: IntCst,
    },
    #[error("no brancher with id {0}")]
    UnknownBrancher(u32),
    #[error("choice refers to position {pos} but brancher {brancher} only has {len} variables")]
    InvalidPosition { brancher: u32, pos: u32, len: usize },
}

pub(crate) fn check_same_sizes(constraint: &'static str, sizes: &[usize]) -> Result<(), ArgumentError> {
    if sizes.windows(2).all(|w| w[0] == w[1]) {
        Ok(())
    } else {
        Err(ArgumentError::SizeMismatch {
            constraint,
            sizes: sizes.to_vec(),
        })
    }
}

/// Checks that all extents lie in `[0, INT_CST_MAX]`, so that adding one to a bound never overflows.
pub(crate) fn check_extents(constraint: &'static str, extents: &[IntCst]) -> Result<(), ArgumentError> {
    for (index, &extent) in extents.iter().enumerate() {
        if extent < 0 {
            return Err(ArgumentError::NegativeExtent {
                constraint,
                index,
                extent,
            });
        }
        if extent > INT_CST_MAX {
            return Err(ArgumentError::ExtentTooLarge {
                constraint,
                index,
                extent,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn size_checks() {
        assert!(check_same_sizes("c", &[3, 3, 3]).is_ok());
        assert!(check_same_sizes("c", &[]).is_ok());
        let err = check_same_sizes("nooverlap", &[3, 2, 3, 3]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "nooverlap: argument arrays have mismatched sizes [3, 2, 3, 3]"
        );
        assert_eq!(
            check_extents("c", &[1, -2]),
            Err(ArgumentError::NegativeExtent {
                constraint: "c",
                index: 1,
                extent: -2
            })
        );
        assert!(check_extents("c", &[0, INT_CST_MAX]).is_ok());
        assert_eq!(
            check_extents("c", &[3, IntCst::MAX]),
            Err(ArgumentError::ExtentTooLarge {
                constraint: "c",
                index: 1,
                extent: IntCst::MAX
            })
        );
    }
}
