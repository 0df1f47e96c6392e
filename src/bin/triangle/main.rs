use clap::Parser;

use triangle_drag::logging::init_logging;

mod app;
mod args;

use app::App;
use args::Args;

fn main() {
    // clion needs help in trait annotation
    let args = <Args as Parser>::parse();

    init_logging(args.log.as_deref());

    let app = match App::new(args) {
        Ok(app) => app,
        Err(e) => {
            log::error!("Could not open window: {e}");
            std::process::exit(1);
        }
    };

    app.run();
}
