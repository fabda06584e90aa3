//! Process-wide registry
//!
//! Object mappers that cannot thread a registry through every call install
//! one here at startup. It can be installed exactly once.

use crate::registry::Registry;
use once_cell::sync::OnceCell;

static GLOBAL: OnceCell<Registry> = OnceCell::new();

/// Install the process-wide registry. Hands the registry back if one is
/// already installed.
pub fn install(registry: Registry) -> Result<&'static Registry, Registry> {
    let models = registry.len();
    match GLOBAL.try_insert(registry) {
        Ok(installed) => {
            tracing::info!(models, "installed global registry");
            Ok(installed)
        }
        Err((_, rejected)) => Err(rejected),
    }
}

/// The process-wide registry, if installed
pub fn global() -> Option<&'static Registry> {
    GLOBAL.get()
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldlock_core::ModelDef;

    #[test]
    fn test_install_once() {
        let mut builder = Registry::builder();
        builder.register(ModelDef::new("Invoice")).unwrap();

        let installed = install(builder.build()).unwrap();
        assert!(installed.model("Invoice").is_some());
        assert!(global().and_then(|r| r.model("Invoice")).is_some());

        let second = install(Registry::default());
        assert!(second.is_err());
        assert_eq!(global().map(Registry::len), Some(1));
    }
}
