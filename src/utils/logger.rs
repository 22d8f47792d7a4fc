use anyhow::{Context, Result};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Installs a stdout subscriber as the global default.
///
/// Embedding applications that already configure `tracing` should skip this.
pub fn setup_logging(max_level: Level) -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(max_level)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set default tracing subscriber")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_one_global_subscriber() {
        let _ = setup_logging(Level::DEBUG);
        assert!(setup_logging(Level::INFO).is_err());
    }
}
