//! Index and dimension validation for BCRS containers

use crate::BcrsError;

/// Check that `index` addresses one of `len` positions
pub const fn check_index(index: usize, len: usize) -> Result<(), BcrsError> {
    if index >= len {
        return Err(BcrsError::IndexOutOfBounds { index, len });
    }
    Ok(())
}

/// Check that two operand sizes agree
///
/// `context` names the operation in the resulting error message.
pub const fn check_dimensions(
    context: &'static str,
    expected: usize,
    found: usize,
) -> Result<(), BcrsError> {
    if expected != found {
        return Err(BcrsError::DimensionMismatch {
            context,
            expected,
            found,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_index() {
        assert_eq!(check_index(0, 1), Ok(()));
        assert_eq!(check_index(9, 10), Ok(()));
        assert_eq!(
            check_index(10, 10),
            Err(BcrsError::IndexOutOfBounds { index: 10, len: 10 })
        );
        assert_eq!(
            check_index(0, 0),
            Err(BcrsError::IndexOutOfBounds { index: 0, len: 0 })
        );
    }

    #[test]
    fn test_check_dimensions() {
        assert_eq!(check_dimensions("mv", 4, 4), Ok(()));
        assert_eq!(
            check_dimensions("mv", 4, 3),
            Err(BcrsError::DimensionMismatch {
                context: "mv",
                expected: 4,
                found: 3
            })
        );
    }
}
