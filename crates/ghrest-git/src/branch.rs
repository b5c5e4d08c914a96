//! Names for throwaway branches.

use rand::seq::IndexedRandom;

use crate::error::{Error, Result};

/// Prefix used by [`default_temp_branch_name`].
pub const DEFAULT_TEMP_BRANCH_PREFIX: &str = "_branch_";

const DIGITS: [char; 10] = ['0', '1', '2', '3', '4', '5', '6', '7', '8', '9'];

/// Generate a branch name from `prefix` and `n` distinct characters of `chars`.
///
/// Characters are sampled without replacement, so `n` can't exceed the
/// number of characters available.
///
/// # Errors
/// Returns [`Error::InvalidSample`] if `n > chars.len()`.
pub fn temp_branch_name(prefix: &str, chars: &[char], n: usize) -> Result<String> {
    if n > chars.len() {
        return Err(Error::InvalidSample {
            requested: n,
            available: chars.len(),
        });
    }

    let mut rng = rand::rng();
    let suffix: String = chars.choose_multiple(&mut rng, n).collect();
    Ok(format!("{prefix}{suffix}"))
}

/// `_branch_` followed by a random permutation of the ten digits.
#[must_use]
pub fn default_temp_branch_name() -> String {
    let mut rng = rand::rng();
    let suffix: String = DIGITS.choose_multiple(&mut rng, DIGITS.len()).collect();
    format!("{DEFAULT_TEMP_BRANCH_PREFIX}{suffix}")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_default_name_is_digit_permutation() {
        let name = default_temp_branch_name();
        let suffix = name.strip_prefix(DEFAULT_TEMP_BRANCH_PREFIX).unwrap();
        assert_eq!(suffix.len(), 10);
        let unique: HashSet<char> = suffix.chars().collect();
        assert_eq!(unique.len(), 10);
        assert!(suffix.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_custom_prefix_and_length() {
        let name = temp_branch_name("tmp/", &['a', 'b', 'c', 'd'], 3).unwrap();
        let suffix = name.strip_prefix("tmp/").unwrap();
        assert_eq!(suffix.len(), 3);
        let unique: HashSet<char> = suffix.chars().collect();
        assert_eq!(unique.len(), 3);
    }

    #[test]
    fn test_oversampling_is_rejected() {
        let err = temp_branch_name("x", &['a', 'b'], 3).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidSample {
                requested: 3,
                available: 2
            }
        ));
    }
}
