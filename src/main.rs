use clap::Parser;

use cardmatch::cli::Cli;

fn main() -> cardmatch::error::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("cardmatch=info"))
        .init();

    let cli = Cli::parse();
    log::debug!("Running {:?}", cli.command);

    match cardmatch::run(&cli) {
        Ok(()) => {
            log::info!("Done");
            Ok(())
        }
        Err(e) => {
            log::error!("cardmatch failed: {}", e);
            Err(e)
        }
    }
}
