//! Startup configuration loading.

use anyhow::Context;

/// Load layered configuration, with any workspace `.env` applied first so
/// `AULA_*` variables from it participate in the figment chain.
pub fn load_config() -> anyhow::Result<aula_config::AulaConfig> {
    aula_config::AulaConfig::load_with_dotenv().context("failed to load aula configuration")
}
