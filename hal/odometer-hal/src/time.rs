//! Time source abstraction

/// Monotonic millisecond tick source
///
/// The counter wraps at `u32::MAX`; intervals are computed with wrapping
/// subtraction and are valid for spans shorter than ~49 days.
///
/// The clock is read from interrupt handlers as well as the foreground, so
/// implementations must be `Sync`.
pub trait Clock: Sync {
    /// Milliseconds since an arbitrary fixed point
    fn now_ms(&self) -> u32;
}

impl<T: Clock + ?Sized> Clock for &T {
    fn now_ms(&self) -> u32 {
        (**self).now_ms()
    }
}

/// Milliseconds elapsed from `since` to `now`, tolerating one wrap
pub fn elapsed_ms(since: u32, now: u32) -> u32 {
    now.wrapping_sub(since)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elapsed_simple() {
        assert_eq!(elapsed_ms(1_000, 4_500), 3_500);
    }

    #[test]
    fn test_elapsed_across_wrap() {
        assert_eq!(elapsed_ms(u32::MAX - 99, 100), 200);
    }
}
