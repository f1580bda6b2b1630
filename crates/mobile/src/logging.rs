use std::{panic::PanicHookInfo, sync::Once};

use tracing_subscriber::{
    filter::FilterFn, fmt::format::Format, layer::SubscriberExt, util::SubscriberInitExt,
};

#[cfg(target_os = "android")]
const LOG_TAG: &str = "Mariner-Rust";

fn is_mariner_event(metadata: &tracing::Metadata<'_>) -> bool {
    metadata
        .module_path()
        .unwrap_or_default()
        .starts_with("mariner")
}

/// Install the tracing subscriber and panic hook. Safe to call repeatedly.
pub(crate) fn setup_logging() {
    static LOGGING_SETUP: Once = Once::new();

    LOGGING_SETUP.call_once(|| {
        #[cfg(target_os = "android")]
        {
            use tracing_logcat::{LogcatMakeWriter, LogcatTag};

            let tag = LogcatTag::Fixed(LOG_TAG.to_owned());
            match LogcatMakeWriter::new(tag) {
                Ok(writer) => {
                    let layer = tracing_subscriber::fmt::layer()
                        .event_format(Format::default().with_level(false).without_time())
                        .with_writer(writer)
                        .with_ansi(false);
                    // try_init: the host app may already own the global subscriber
                    let _ = tracing_subscriber::registry()
                        .with(layer)
                        .with(FilterFn::new(is_mariner_event))
                        .try_init();
                }
                Err(error) => eprintln!("{LOG_TAG}: failed to initialize logcat writer: {error}"),
            }
        }

        #[cfg(not(target_os = "android"))]
        {
            let layer = tracing_subscriber::fmt::layer()
                .event_format(Format::default().with_target(false))
                .with_ansi(false);
            let _ = tracing_subscriber::registry()
                .with(layer)
                .with(FilterFn::new(is_mariner_event))
                .try_init();
        }

        std::panic::set_hook(Box::new(panic_hook));
    })
}

fn panic_hook(info: &PanicHookInfo) {
    let backtrace = std::backtrace::Backtrace::force_capture();
    tracing::error!("{info}\n{backtrace}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_logging_is_idempotent() {
        setup_logging();
        setup_logging();
        tracing::info!("logging twice did not panic");
    }
}
