/// A duration in whole microseconds.
///
/// Game configs express pacing (fire cooldowns, wave pauses) in wall-clock
/// terms and convert to tick counts at the match tick rate, so the same
/// config plays identically at any tick rate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Micros(u64);

impl Micros {
    const MICROS_PER_SEC: u64 = 1_000_000;

    pub const fn from_secs(secs: u32) -> Self {
        Self(secs as u64 * Self::MICROS_PER_SEC)
    }

    pub const fn from_millis(millis: u32) -> Self {
        Self(millis as u64 * 1_000)
    }

    pub const fn from_micros(micros: u64) -> Self {
        Self(micros)
    }

    /// Tick count at the given tick rate, rounding down.
    ///
    /// 128-bit intermediate so `micros * tick_hz` cannot overflow.
    pub const fn to_ticks(self, tick_hz: u32) -> u64 {
        (self.0 as u128 * tick_hz as u128 / Self::MICROS_PER_SEC as u128) as u64
    }

    pub const fn as_micros(self) -> u64 {
        self.0
    }
}

impl core::ops::Add for Micros {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl core::ops::Sub for Micros {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl core::ops::Mul<u32> for Micros {
    type Output = Self;
    fn mul(self, rhs: u32) -> Self {
        Self(self.0 * rhs as u64)
    }
}

impl core::ops::Div<u32> for Micros {
    type Output = Self;
    fn div(self, rhs: u32) -> Self {
        Self(self.0 / rhs as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors() {
        assert_eq!(Micros::from_secs(1).as_micros(), 1_000_000);
        assert_eq!(Micros::from_millis(500).as_micros(), 500_000);
        assert_eq!(Micros::from_micros(42).as_micros(), 42);
    }

    #[test]
    fn to_ticks() {
        // 1 second at 60 Hz = 60 ticks
        assert_eq!(Micros::from_secs(1).to_ticks(60), 60);
        // 30 seconds at 60 Hz = 1800 ticks
        assert_eq!(Micros::from_secs(30).to_ticks(60), 1800);
        // 500 ms at 60 Hz = 30 ticks
        assert_eq!(Micros::from_millis(500).to_ticks(60), 30);
    }

    #[test]
    fn to_ticks_rounds_down() {
        // 24 ms at 60 Hz = 1.44 ticks
        assert_eq!(Micros::from_millis(24).to_ticks(60), 1);
        assert_eq!(Micros::from_millis(10).to_ticks(60), 0);
    }

    #[test]
    fn arithmetic() {
        let a = Micros::from_secs(5);
        let b = Micros::from_secs(3);

        assert_eq!((a + b).to_ticks(60), 480); // 8 seconds
        assert_eq!((a - b).to_ticks(60), 120); // 2 seconds
        assert_eq!((a * 2).to_ticks(60), 600); // 10 seconds
        assert_eq!((a / 5).to_ticks(60), 60); // 1 second
    }
}
