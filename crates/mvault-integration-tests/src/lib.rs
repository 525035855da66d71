//! Host crate for cross-crate integration tests. See `tests/`.
