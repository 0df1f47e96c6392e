use std::sync::Once;

static INIT: Once = Once::new();

/// Sets up `env_logger` once; later calls are ignored.
///
/// `filter` uses the `env_logger` syntax (e.g. "debug",
/// "triangle_drag=trace"). Without it `RUST_LOG` is consulted, then `info`.
pub fn init_logging(filter: Option<&str>) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        match (filter, std::env::var("RUST_LOG")) {
            (Some(filter), _) => builder.parse_filters(filter),
            (None, Ok(filter)) => builder.parse_filters(&filter),
            (None, Err(_)) => builder.filter_level(log::LevelFilter::Info),
        };

        builder.init();

        log::debug!("logging initialized");
    });
}
