use chrono::Duration;

#[derive(Clone, Debug)]
pub struct AxumSessionConfig {
    /// How long a token stays valid without being used.
    pub(crate) idle_timeout: Duration,
    /// Sessions closer than this to expiry get their new expiry written back
    /// to the database; younger ones are only refreshed in memory.
    pub(crate) refresh_threshold: Duration,
    /// Minimum time between sweeps of expired sessions out of both levels.
    pub(crate) purge_interval: Duration,
}

impl Default for AxumSessionConfig {
    fn default() -> Self {
        AxumSessionConfig {
            idle_timeout: Duration::days(7),
            refresh_threshold: Duration::days(3),
            purge_interval: Duration::hours(1),
        }
    }
}

impl AxumSessionConfig {
    pub fn with_idle_timeout(mut self, idle_timeout: Duration) -> Self {
        self.idle_timeout = idle_timeout;
        self.refresh_threshold = idle_timeout / 2;
        self
    }

    pub fn with_purge_interval(mut self, purge_interval: Duration) -> Self {
        self.purge_interval = purge_interval;
        self
    }

    pub fn idle_timeout(&self) -> Duration {
        self.idle_timeout
    }
}
