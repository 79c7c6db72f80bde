#[cfg(feature = "cli")]
use branchsite::{cli::Command, Cli};
#[cfg(feature = "cli")]
use clap::Parser;
use color_eyre::eyre::{Report, Result};

fn main() -> Result<(), Report> {
    #[cfg(feature = "cli")]
    {
        // ------------------------------------------------------------------------
        // CLI Setup

        // Parse CLI parameters
        let args = Cli::parse();

        // initialize color_eyre crate for colorized logs
        color_eyre::install()?;

        // Set logging/verbosity level via RUST_LOG
        std::env::set_var("RUST_LOG", args.verbosity.to_string());

        // initialize env_logger crate for logging/verbosity level
        env_logger::init();

        // check which CLI command we're running (run, presets, toy)
        match args.command {
            Command::Run(args) => _ = branchsite::run(&args)?,
            Command::Presets => println!("{}", branchsite::classify::Preset::list()),
            Command::Toy(args) => _ = branchsite::toy::dataset(&args)?,
        }
    }

    Ok(())
}
