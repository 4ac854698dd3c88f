//! Command: print version information.

/// The bundler version: the release or `git describe` string baked in at
/// build time, else the crate version.
#[must_use]
pub fn version() -> &'static str {
    option_env!("CEP_BUNDLER_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
}

/// Print the bundler version to stdout.
pub fn run() {
    println!("cep-bundler {}", version());
}
