//! Crate version information.

/// Full version string, e.g. `"0.1.0"`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn version_major() -> u32 {
    env!("CARGO_PKG_VERSION_MAJOR").parse().unwrap_or_default()
}

pub fn version_minor() -> u32 {
    env!("CARGO_PKG_VERSION_MINOR").parse().unwrap_or_default()
}

pub fn version_patch() -> u32 {
    env!("CARGO_PKG_VERSION_PATCH").parse().unwrap_or_default()
}

/// `"major.minor.patch"`.
pub fn version_string() -> String {
    VERSION.to_string()
}
