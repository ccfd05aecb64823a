use anyhow::Result;
use clap::Parser;

use rpidisplay_gfx::demo::{self, Frame};
use rpidisplay_gfx::{config, logging, Cli};

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.log_level())?;

    let options = config::load_config(cli.config.as_deref())?;
    let options = cli.merge_into_options(options)?;
    log::debug!("Options: {:?}", options);

    let frame = demo::render(&options)?;
    match (&options.output, &frame) {
        (Some(path), _) => frame.save_png(path)?,
        (None, Frame::Mono(fb)) => print!("{}", demo::ascii_art(fb)),
        (None, Frame::Color(fb)) => print!("{}", demo::summary(fb)),
    }
    Ok(())
}
