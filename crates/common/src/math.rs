/// Errors from numeric helpers.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MathError {
    #[error("source range is empty: {start}..{end}")]
    ZeroRange { start: f32, end: f32 },
}

/// Linearly remap `value` from `start1..end1` onto `start2..end2`.
///
/// Values outside the source range extrapolate.
pub fn remap(
    value: f32,
    start1: f32,
    end1: f32,
    start2: f32,
    end2: f32,
) -> Result<f32, MathError> {
    if start1 == end1 {
        return Err(MathError::ZeroRange {
            start: start1,
            end: end1,
        });
    }
    Ok(start2 + ((value - start1) / (end1 - start1)) * (end2 - start2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remap_midpoint() {
        assert_eq!(remap(5.0, 0.0, 10.0, 100.0, 200.0), Ok(150.0));
    }

    #[test]
    fn remap_inverted_target() {
        assert_eq!(remap(0.0, 0.0, 10.0, 1.0, 0.0), Ok(1.0));
    }

    #[test]
    fn remap_rejects_empty_source_range() {
        assert!(matches!(
            remap(1.0, 3.0, 3.0, 0.0, 1.0),
            Err(MathError::ZeroRange { .. })
        ));
    }
}
