mod app;

use screenloupe::AppConfig;

fn main() -> eframe::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let config = AppConfig::load();
    app::run(config)
}
