use std::path::PathBuf;

use fireburst::{AppError, FireworksConfig};

fn main() -> Result<(), AppError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = FireworksConfig::discover(path.as_deref())?;

    fireburst::run(config)
}
