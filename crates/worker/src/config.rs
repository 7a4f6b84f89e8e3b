use std::time::Duration;

/// Worker configuration loaded from environment variables.
#[derive(Debug, Clone, Default)]
pub struct WorkerConfig {
    /// Repeat the repair pass on this interval. `None` runs it once.
    pub repair_interval: Option<Duration>,
    /// Run the artifact audit before repairing.
    pub audit_artifacts: bool,
    /// Report drift without writing it back.
    pub dry_run: bool,
    /// Emit JSON log lines.
    pub json_logs: bool,
}

impl WorkerConfig {
    /// | Env Var                | Default                 |
    /// |------------------------|-------------------------|
    /// | `REPAIR_INTERVAL_SECS` | unset (run once, exit)  |
    /// | `AUDIT_ARTIFACTS`      | `false`                 |
    /// | `REPAIR_DRY_RUN`       | `false`                 |
    /// | `LOG_FORMAT`           | `text`                  |
    pub fn from_env() -> Self {
        let repair_interval = std::env::var("REPAIR_INTERVAL_SECS").ok().map(|v| {
            let secs: u64 = v
                .parse()
                .expect("REPAIR_INTERVAL_SECS must be a valid u64");
            assert!(secs > 0, "REPAIR_INTERVAL_SECS must be greater than zero");
            Duration::from_secs(secs)
        });

        let audit_artifacts = env_flag("AUDIT_ARTIFACTS");
        let dry_run = env_flag("REPAIR_DRY_RUN");

        let json_logs = std::env::var("LOG_FORMAT").is_ok_and(|v| v == "json");

        Self {
            repair_interval,
            audit_artifacts,
            dry_run,
            json_logs,
        }
    }
}

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .map(|v| matches!(v.as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}
