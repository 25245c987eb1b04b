#[macro_use]
extern crate tracing;

mod banner;
mod logging;

pub use banner::{
    print_banner,
    print_done,
    print_farewell,
    print_playing,
    print_run_hint,
    print_test_header,
};
pub use logging::init_logging;

/// Install the `color-eyre` report hooks and a panic handler: human friendly crash reports in release builds,
/// full backtraces while developing.
pub fn init_errors() -> eyre::Result<()> {
    let (panic_hook, eyre_hook) = color_eyre::config::HookBuilder::default()
        .display_location_section(cfg!(debug_assertions))
        .into_hooks();
    eyre_hook.install()?;

    #[cfg(not(debug_assertions))]
    {
        let _ = panic_hook;
        human_panic::setup_panic!();
    }

    #[cfg(debug_assertions)]
    {
        let panic_hook = panic_hook.into_panic_hook();
        std::panic::set_hook(Box::new(move |info| {
            panic_hook(info);
            better_panic::Settings::auto()
                .most_recent_first(false)
                .lineno_suffix(true)
                .verbosity(better_panic::Verbosity::Full)
                .create_panic_handler()(info);
        }));
    }

    Ok(())
}
