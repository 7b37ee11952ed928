//! Tunable constants for the gacha session.
//!
//! Everything is compile-time; there is no environment or file config.

/// localStorage key for the daily free-draw counter.
pub const KEY_FREE_DRAWS: &str = "free_draws";

/// localStorage key for the activity log.
pub const KEY_LOGS: &str = "mvp_logs";

/// Prefix of the per-book cover keys (`cover_<bookId>`).
pub const COVER_KEY_PREFIX: &str = "cover_";

/// Cover thumbnail re-encode settings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ThumbnailConfig {
    /// The longer edge is capped to this many pixels.
    pub max_dimension: u32,
    /// Lossy quality in `0.0..=1.0`.
    pub quality: f32,
}

impl Default for ThumbnailConfig {
    fn default() -> Self {
        Self {
            max_dimension: 900,
            quality: 0.85,
        }
    }
}

impl ThumbnailConfig {
    /// Quality on the JPEG encoder's 1..=100 scale.
    pub fn jpeg_quality(&self) -> u8 {
        (self.quality * 100.0).round().clamp(1.0, 100.0) as u8
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GachaConfig {
    /// Free draws granted per calendar day.
    pub daily_free_draws: u32,
    /// Length of the action countdown.
    pub play_seconds: u32,
    /// Length of the simulated advertisement.
    pub ad_seconds: u32,
    /// Draws granted by watching the advertisement to the end.
    pub ad_bonus: u32,
    /// Discrete ticks per real-time second fed into the session.
    pub ticks_per_second: u32,
    pub thumbnail: ThumbnailConfig,
}

impl Default for GachaConfig {
    fn default() -> Self {
        Self {
            daily_free_draws: 3,
            play_seconds: 60,
            ad_seconds: 5,
            ad_bonus: 3,
            ticks_per_second: 10,
            thumbnail: ThumbnailConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_product_rules() {
        let c = GachaConfig::default();
        assert_eq!(c.daily_free_draws, 3);
        assert_eq!(c.play_seconds, 60);
        assert_eq!(c.ad_seconds, 5);
        assert_eq!(c.ad_bonus, 3);
        assert_eq!(c.thumbnail.max_dimension, 900);
    }

    #[test]
    fn jpeg_quality_scale() {
        assert_eq!(ThumbnailConfig::default().jpeg_quality(), 85);
        let low = ThumbnailConfig { max_dimension: 10, quality: 0.0 };
        assert_eq!(low.jpeg_quality(), 1);
        let high = ThumbnailConfig { max_dimension: 10, quality: 2.0 };
        assert_eq!(high.jpeg_quality(), 100);
    }
}
