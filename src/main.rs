use particle_morph::ViewerConfig;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            info!(%path, "loading config");
            match ViewerConfig::from_json_file(&path) {
                Ok(config) => config,
                Err(e) => {
                    error!("{}", e);
                    std::process::exit(1);
                }
            }
        }
        None => ViewerConfig::default(),
    };

    if let Err(e) = particle_morph::run(config) {
        error!("{}", e);
        std::process::exit(1);
    }
}
