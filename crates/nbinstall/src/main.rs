use anyhow::Result;

use nbinstall::{APP_NAME, Cli, InstallSettings, install, logging};

fn main() -> Result<()> {
    let args = Cli::parse_for(APP_NAME);
    logging::init_logging();

    let settings = InstallSettings::from_cli(APP_NAME, &args);
    install::run(&settings)?;
    Ok(())
}
