use anyhow::Result;
use finder_engine::logging::init_logging;
use finder_engine::window::Runtime;
use fractal_finder::app::FinderApp;
use fractal_finder::config::GameConfig;
use fractal_finder::error::FinderError;
use fractal_finder::levels::LevelTable;

fn main() -> Result<()> {
    let config = GameConfig::from_env();
    init_logging(config.logging.clone());

    let table = LevelTable::authored().map_err(FinderError::from)?;
    log::info!("{} levels, resources in {}", table.len(), config.res_dir.display());

    let app = FinderApp::new(&config, table);
    Runtime::run(config.runtime_config(), config.gpu_init(), app)
}
