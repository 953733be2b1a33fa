//! Shared application resources initialized once at startup.

use anyhow::Context;

use aula_config::AulaConfig;
use aula_core::limits::EnrollmentLimits;
use aula_db::service::AulaService;
use aula_store::SessionStore;

pub struct AppContext {
    pub service: AulaService,
    pub config: AulaConfig,
    pub sessions: SessionStore,
}

impl AppContext {
    /// Initialize the database service and session store from config.
    ///
    /// When a remote database is configured, open a synced embedded replica;
    /// if that fails, fall back to the local file so the CLI stays usable
    /// offline.
    pub async fn init(config: AulaConfig) -> anyhow::Result<Self> {
        let db_path = config.database.path.clone();

        let service = if config.database.is_remote() {
            match AulaService::new_synced(
                &db_path,
                &config.database.url,
                &config.database.auth_token,
            )
            .await
            {
                Ok(service) => service,
                Err(error) => {
                    tracing::warn!(%error, "failed to open synced replica; falling back to local");
                    AulaService::new_local(&db_path)
                        .await
                        .context("failed to open local database")?
                }
            }
        } else {
            AulaService::new_local(&db_path)
                .await
                .context("failed to open local database")?
        };

        let sessions = SessionStore::default_location()
            .context("failed to resolve session store location")?;

        Ok(Self {
            service,
            config,
            sessions,
        })
    }

    /// Enrollment limits from config (canonical defaults unless overridden).
    #[must_use]
    pub const fn limits(&self) -> EnrollmentLimits {
        self.config.enrollment.limits()
    }

    /// The logged-in student's id.
    ///
    /// # Errors
    ///
    /// Fails with a login hint when no session exists.
    pub fn require_login(&self) -> anyhow::Result<String> {
        let session = self
            .sessions
            .load()
            .context("failed to read session file")?;
        session
            .map(|s| s.student_id)
            .context("not logged in. Run 'aula auth login --email <email>' first")
    }
}
