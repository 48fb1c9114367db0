//! `fern` logger set-up.

use log::LevelFilter;

/// Environment variable that overrides the configured level.
pub const LOG_ENV: &str = "VERNISSAGE_LOG";

/// Parses a level name (case-insensitive).
pub fn parse_level(name: &str) -> Option<LevelFilter> {
    name.trim().parse().ok()
}

/// Level to use given the configured name and the `VERNISSAGE_LOG` value.
///
/// Unknown names fall back to `Info`.
pub fn resolve_level(configured: &str, env: Option<&str>) -> LevelFilter {
    env.and_then(parse_level)
        .or_else(|| parse_level(configured))
        .unwrap_or(LevelFilter::Info)
}

/// Installs the global logger: `[LEVEL target] message` on stderr.
///
/// The GPU stack is capped at `Warn` whatever the level.
pub fn init(configured: &str) -> Result<(), log::SetLoggerError> {
    let env = std::env::var(LOG_ENV).ok();
    let level = resolve_level(configured, env.as_deref());
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {}] {}",
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .level_for("wgpu_core", LevelFilter::Warn.min(level))
        .level_for("wgpu_hal", LevelFilter::Warn.min(level))
        .level_for("naga", LevelFilter::Warn.min(level))
        .chain(std::io::stderr())
        .apply()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_overrides_configuration() {
        assert_eq!(resolve_level("info", Some("trace")), LevelFilter::Trace);
        assert_eq!(resolve_level("WARN", None), LevelFilter::Warn);
    }

    #[test]
    fn garbage_falls_back() {
        assert_eq!(resolve_level("loud", Some("very")), LevelFilter::Info);
        assert_eq!(resolve_level("debug", Some("very")), LevelFilter::Debug);
    }
}
