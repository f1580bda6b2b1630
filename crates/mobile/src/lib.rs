pub mod error;
pub(crate) mod logging;
pub mod records;
pub mod route;
pub mod session;

uniffi::setup_scaffolding!();

/// Install logging and route panics into it.
/// Call this once at startup from Kotlin/Swift
#[uniffi::export]
pub fn init_logging() {
    logging::setup_logging();
}
