//! The process-wide generator.
//!
//! Uniqueness holds per generator, so a process should issue all of its IDs
//! from one instance. These accessors give that instance a home: initialize
//! it once at startup, then reach it from anywhere.

use std::sync::OnceLock;

use crate::{Error, IdGenerator, Result};

static GLOBAL: OnceLock<IdGenerator> = OnceLock::new();

/// Installs `generator` as the process-wide instance.
///
/// # Errors
///
/// Returns [`Error::AlreadyInitialized`] if an instance is already installed;
/// `generator` is dropped and the existing one stays in place.
pub fn init_global(generator: IdGenerator) -> Result<&'static IdGenerator> {
    let mut installed = false;
    let global = GLOBAL.get_or_init(|| {
        installed = true;
        generator
    });
    if installed {
        Ok(global)
    } else {
        Err(Error::AlreadyInitialized)
    }
}

/// Returns the process-wide instance, if one has been installed.
pub fn global() -> Option<&'static IdGenerator> {
    GLOBAL.get()
}

/// Returns the process-wide instance, installing [`IdGenerator::new`] on first
/// use.
///
/// # Errors
///
/// Returns [`Error::Configuration`] if no instance exists yet and the default
/// one cannot resolve a machine ID.
pub fn get_or_init_global() -> Result<&'static IdGenerator> {
    if let Some(global) = GLOBAL.get() {
        return Ok(global);
    }
    let generator = IdGenerator::new()?;
    // A concurrent initializer may win; its instance is kept and ours dropped.
    Ok(GLOBAL.get_or_init(|| generator))
}

#[cfg(test)]
mod tests {
    use super::*;

    // The global is shared by every test in this binary, so its whole
    // lifecycle is exercised in one test.
    #[test]
    fn global_lifecycle() {
        assert!(global().is_none());

        let generator = IdGenerator::builder().machine_id(11).build().unwrap();
        let installed = init_global(generator).unwrap();
        assert_eq!(installed.machine_id(), 11);

        let again = IdGenerator::builder().machine_id(12).build().unwrap();
        assert_eq!(init_global(again).unwrap_err(), Error::AlreadyInitialized);

        let fetched = global().unwrap();
        assert!(core::ptr::eq(fetched, installed));
        assert!(core::ptr::eq(get_or_init_global().unwrap(), installed));

        let a = fetched.generate().unwrap();
        let b = installed.generate().unwrap();
        assert!(a < b);
    }
}
