//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `mealbook_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    println!("mealbook_core ping={}", mealbook_core::ping());
    println!("mealbook_core version={}", mealbook_core::core_version());
}
