//! Wall-clock timing around kernel invocations.

use std::time::Instant;

/// Runs `f` and returns its value together with the elapsed wall-clock
/// time in fractional seconds. `Instant` is monotonic, so the reading is
/// unaffected by system clock adjustments.
pub fn time_kernel<T>(f: impl FnOnce() -> T) -> (T, f64) {
    let start = Instant::now();
    let value = f();
    (value, start.elapsed().as_secs_f64())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_returns_value_and_non_negative_duration() {
        let (value, elapsed) = time_kernel(|| 21 * 2);
        assert_eq!(value, 42);
        assert!(elapsed >= 0.0);
    }

    #[test]
    fn test_measures_real_work() {
        let (_, elapsed) = time_kernel(|| std::thread::sleep(std::time::Duration::from_millis(5)));
        assert!(elapsed >= 0.004);
    }
}
