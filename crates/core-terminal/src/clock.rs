//! Monotonic deadline arithmetic for the tick scheduler.

use std::time::{Duration, Instant};

/// Milliseconds remaining until `last_tick + delay`, clamped to
/// `[0, i32::MAX]`. `0` means the deadline already passed.
pub fn remaining_ms(last_tick: Instant, delay: Duration) -> i32 {
    let target = last_tick + delay;
    let now = Instant::now();
    if target <= now {
        0
    } else {
        (target - now).as_millis().min(i32::MAX as u128) as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn past_deadline_is_zero() {
        let then = Instant::now() - Duration::from_secs(1);
        assert_eq!(remaining_ms(then, Duration::from_millis(10)), 0);
    }

    #[test]
    fn future_deadline_is_positive() {
        let now = Instant::now();
        let ms = remaining_ms(now, Duration::from_millis(500));
        assert!(ms > 0 && ms <= 500);
    }
}
