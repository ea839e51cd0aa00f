pub mod build_info;

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Default filter when `RUST_LOG` does not say otherwise.
const DEFAULT_DIRECTIVE: &str =
    "pg_reformas=info,reformas_core=info,reformas_storage_json=info,reformas_config=info";

/// Initializes the global tracing subscriber, writing to stderr.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    });
}

#[cfg(test)]
mod tests {
    use super::DEFAULT_DIRECTIVE;

    #[test]
    fn default_directive_covers_every_workspace_crate() {
        for target in ["pg_reformas", "reformas_core", "reformas_storage_json", "reformas_config"] {
            assert!(
                DEFAULT_DIRECTIVE.contains(&format!("{target}=info")),
                "{target} missing from default filter"
            );
        }
        assert!(tracing_subscriber::EnvFilter::try_new(DEFAULT_DIRECTIVE).is_ok());
    }
}
