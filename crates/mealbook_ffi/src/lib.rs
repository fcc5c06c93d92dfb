//! Flutter-facing FFI surface for the MealBook core.

pub mod api;
