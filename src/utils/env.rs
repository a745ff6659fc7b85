use log::debug;

/// Load variables from a `.env` file when one is present. Missing files are
/// fine; the environment wins over file values either way.
pub fn load_env() {
    match dotenv::dotenv() {
        Ok(path) => debug!("loaded environment from {}", path.display()),
        Err(_) => debug!("no .env file found, using process environment"),
    }
}
