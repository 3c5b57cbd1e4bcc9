use log::info;
use std::io;

use userlogin::auth::AuthManager;
use userlogin::config::Config;
use userlogin::console::Console;
use userlogin::error::AppError;

fn main() -> Result<(), AppError> {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = Config::from_env()?;
    info!("Using user store at {}", config.users_file.display());

    let auth = AuthManager::from_config(&config);
    let stdin = io::stdin();
    let mut console = Console::new(auth, stdin.lock(), io::stdout());
    console.run()?;

    Ok(())
}
