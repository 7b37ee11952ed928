//! The draw itself: a uniform pick from a book's action pool.
//!
//! Draws are independent; repeats are allowed.

use crate::catalog::actions_for;

// ── RNG ──────────────────────────────────────────────────────

fn next_rng(seed: u64) -> u64 {
    seed.wrapping_mul(6364136223846793005)
        .wrapping_add(1442695040888963407)
}

pub struct Gacha {
    seed: u64,
}

impl Gacha {
    pub fn with_seed(seed: u64) -> Self {
        Self { seed }
    }

    /// Seeded from `Math.random()` in the browser, the system clock elsewhere.
    pub fn from_entropy() -> Self {
        #[cfg(target_arch = "wasm32")]
        let seed = (js_sys::Math::random() * u64::MAX as f64) as u64;
        #[cfg(not(target_arch = "wasm32"))]
        let seed = chrono::Utc::now()
            .timestamp_nanos_opt()
            .unwrap_or_default() as u64;
        Self::with_seed(seed)
    }

    /// Index in `0..len`. `len` must be non-zero.
    fn pick(&mut self, len: usize) -> usize {
        self.seed = next_rng(self.seed);
        ((self.seed >> 33) % len as u64) as usize
    }

    /// One action for `book_id`, or an empty string if the book has no pool.
    pub fn draw(&mut self, book_id: &str) -> String {
        let pool = actions_for(book_id);
        if pool.is_empty() {
            return String::new();
        }
        pool[self.pick(pool.len())].to_string()
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn arb_book_id() -> impl Strategy<Value = &'static str> {
        prop_oneof![
            Just("atomic"),
            Just("dream_elephant"),
            Just("seven_habits"),
            Just("carnegie"),
        ]
    }

    proptest! {
        #[test]
        fn prop_draw_always_from_pool(seed in any::<u64>(), id in arb_book_id()) {
            let mut g = Gacha::with_seed(seed);
            let a = g.draw(id);
            prop_assert!(actions_for(id).contains(&a.as_str()), "drew {}", a);
        }
    }
}
