use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Two pseudo-random values in `[0, 1)` derived from `(seed, id)`.
pub fn stable_pair(id: &str, seed: u64) -> (f32, f32) {
    let mut hasher = DefaultHasher::new();
    seed.hash(&mut hasher);
    id.hash(&mut hasher);
    let hash = hasher.finish();

    let x = ((hash & 0xffff_ffff) as f64 / (u32::MAX as f64 + 1.0)) as f32;
    let y = (((hash >> 32) & 0xffff_ffff) as f64 / (u32::MAX as f64 + 1.0)) as f32;
    (x.min(0.999_999), y.min(0.999_999))
}

pub fn format_score(score: f32) -> String {
    format!("{:.0}", score.clamp(0.0, 100.0))
}
