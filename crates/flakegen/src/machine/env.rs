use std::{borrow::Cow, env::VarError};

use crate::{Error, MachineIdSource, Result, validate_machine_id};

/// Environment variable consulted by [`EnvMachineId::default`].
pub const MACHINE_ID_ENV: &str = "FLAKEGEN_MACHINE_ID";

/// Reads the machine ID from an environment variable.
#[derive(Clone, Debug)]
pub struct EnvMachineId {
    var: Cow<'static, str>,
}

impl Default for EnvMachineId {
    fn default() -> Self {
        Self::new(MACHINE_ID_ENV)
    }
}

impl EnvMachineId {
    /// Reads the machine ID from `var` instead of [`MACHINE_ID_ENV`].
    pub fn new(var: impl Into<Cow<'static, str>>) -> Self {
        Self { var: var.into() }
    }

    /// The variable this source reads.
    pub fn var(&self) -> &str {
        &self.var
    }

    /// Like [`MachineIdSource::resolve`], but an unset variable is `Ok(None)`
    /// rather than an error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the variable is set but is not
    /// unicode, or not an integer in `0..=1023`.
    pub fn lookup(&self) -> Result<Option<u16>> {
        let raw = match std::env::var(self.var.as_ref()) {
            Ok(raw) => raw,
            Err(VarError::NotPresent) => return Ok(None),
            Err(VarError::NotUnicode(raw)) => {
                return Err(Error::configuration(format!(
                    "{} is not valid unicode: {raw:?}",
                    self.var
                )));
            }
        };
        let id = raw.trim().parse::<u16>().map_err(|_| {
            Error::configuration(format!("{} is not a valid machine id: {raw:?}", self.var))
        })?;
        validate_machine_id(id).map(Some)
    }
}

impl MachineIdSource for EnvMachineId {
    fn resolve(&self) -> Result<u16> {
        self.lookup()?
            .ok_or_else(|| Error::configuration(format!("{} is not set", self.var)))
    }
}
