use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Rounds to two decimals, the precision used for display and export.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn format_usd(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    out.push('$');
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// `owner/name` -> `name`.
pub fn short_name(id: &str) -> &str {
    id.rsplit('/').next().unwrap_or(id)
}

/// Three pseudo-random values in `[-1, 1]` derived from `id`; stable across runs.
pub fn stable_triple(id: &str) -> (f32, f32, f32) {
    let mut hasher = DefaultHasher::new();
    id.hash(&mut hasher);
    let hash = hasher.finish();

    let unit = |bits: u64| ((bits & 0x1f_ffff) as f64 / 0x1f_ffff as f64) as f32 * 2.0 - 1.0;
    (unit(hash), unit(hash >> 21), unit(hash >> 42))
}
