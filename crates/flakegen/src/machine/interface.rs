use crate::{EnvMachineId, Error, Result, SnowflakeId};

/// Resolves the 10-bit machine ID a generator stamps into every ID.
///
/// Sources are consulted once, at construction. Implement this to plug in an
/// externally coordinated assignment (a configuration service, a fleet
/// registry) when hardware-derived IDs are not collision-free enough.
///
/// Closures returning `Result<u16>` implement this trait.
///
/// # Example
///
/// ```
/// use flakegen::{IdGenerator, Result};
///
/// let from_registry = || -> Result<u16> { Ok(17) };
/// let generator = IdGenerator::builder()
///     .machine_id_source(from_registry)
///     .build()
///     .unwrap();
/// assert_eq!(generator.machine_id(), 17);
/// ```
pub trait MachineIdSource {
    /// Returns a machine ID in `0..=1023`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if no usable ID can be resolved.
    fn resolve(&self) -> Result<u16>;
}

impl<F> MachineIdSource for F
where
    F: Fn() -> Result<u16>,
{
    fn resolve(&self) -> Result<u16> {
        self()
    }
}

/// An explicitly assigned machine ID.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedMachineId(pub u16);

impl MachineIdSource for FixedMachineId {
    fn resolve(&self) -> Result<u16> {
        validate_machine_id(self.0)
    }
}

/// The resolution chain used when nothing is configured explicitly:
/// [`EnvMachineId`] first, then (with the `network` feature) the first
/// suitable network interface.
#[derive(Clone, Debug, Default)]
pub struct DefaultMachineId {
    env: EnvMachineId,
}

impl MachineIdSource for DefaultMachineId {
    fn resolve(&self) -> Result<u16> {
        if let Some(id) = self.env.lookup()? {
            return Ok(id);
        }

        #[cfg(feature = "network")]
        {
            crate::NetworkMachineId.resolve()
        }
        #[cfg(not(feature = "network"))]
        {
            Err(Error::configuration(format!(
                "no machine id configured: set {} or supply one explicitly",
                self.env.var()
            )))
        }
    }
}

/// Rejects machine IDs that do not fit in 10 bits.
///
/// # Errors
///
/// Returns [`Error::Configuration`] if `id > 1023`.
pub fn validate_machine_id(id: u16) -> Result<u16> {
    if id > SnowflakeId::MAX_MACHINE_ID {
        return Err(Error::configuration(format!(
            "machine id {id} exceeds maximum {}",
            SnowflakeId::MAX_MACHINE_ID
        )));
    }
    Ok(id)
}

/// Snapshot of one network interface, as far as machine-ID derivation cares.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InterfaceInfo {
    /// OS interface name, e.g. `eth0`.
    pub name: String,
    /// Whether the interface is a loopback device.
    pub is_loopback: bool,
    /// The 48-bit hardware (MAC) address, if the interface has one.
    pub hardware_address: Option<[u8; 6]>,
}

/// Picks the hardware address of the first non-loopback interface whose
/// address is present and non-zero.
pub fn select_hardware_address<I>(interfaces: I) -> Option<[u8; 6]>
where
    I: IntoIterator<Item = InterfaceInfo>,
{
    interfaces
        .into_iter()
        .filter(|iface| !iface.is_loopback)
        .filter_map(|iface| iface.hardware_address)
        .find(|mac| mac.iter().any(|&b| b != 0))
}

/// Reduces a hardware address, read as a big-endian 48-bit integer, modulo
/// 1024.
///
/// Deterministic per host, but with only 1024 buckets distinct hosts collide
/// easily. Large fleets should assign machine IDs explicitly.
pub fn machine_id_from_hardware_address(mac: [u8; 6]) -> u16 {
    let numeric = mac.iter().fold(0u64, |acc, &b| (acc << 8) | u64::from(b));
    (numeric % (u64::from(SnowflakeId::MAX_MACHINE_ID) + 1)) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iface(name: &str, is_loopback: bool, mac: Option<[u8; 6]>) -> InterfaceInfo {
        InterfaceInfo {
            name: name.to_owned(),
            is_loopback,
            hardware_address: mac,
        }
    }

    #[test]
    fn fixed_machine_id_in_range() {
        assert_eq!(FixedMachineId(0).resolve(), Ok(0));
        assert_eq!(FixedMachineId(1023).resolve(), Ok(1023));
    }

    #[test]
    fn fixed_machine_id_out_of_range() {
        let err = FixedMachineId(1024).resolve().unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
    }

    #[test]
    fn closure_source() {
        let source = || -> Result<u16> { Ok(9) };
        assert_eq!(source.resolve(), Ok(9));
    }

    #[test]
    fn default_chain_prefers_environment() {
        let var = "FLAKEGEN_TEST_DEFAULT_MACHINE_ID";
        // SAFETY: the variable name is unique to this test.
        unsafe { std::env::set_var(var, "321") };
        let source = DefaultMachineId {
            env: EnvMachineId::new(var),
        };
        assert_eq!(source.resolve(), Ok(321));

        // SAFETY: as above.
        unsafe { std::env::set_var(var, "4096") };
        assert!(matches!(
            source.resolve(),
            Err(Error::Configuration { .. })
        ));
    }

    #[test]
    fn hardware_address_reduces_modulo_1024() {
        assert_eq!(machine_id_from_hardware_address([0, 0, 0, 0, 0, 5]), 5);
        assert_eq!(machine_id_from_hardware_address([0, 0, 0, 0, 4, 0]), 0);
        assert_eq!(machine_id_from_hardware_address([0, 0, 0, 0, 3, 255]), 1023);
        assert_eq!(
            machine_id_from_hardware_address([0x02, 0x42, 0xac, 0x11, 0x00, 0x02]),
            2
        );
        assert_eq!(
            machine_id_from_hardware_address([0xff; 6]),
            SnowflakeId::MAX_MACHINE_ID
        );
    }

    #[test]
    fn selects_first_non_loopback_non_zero_address() {
        let picked = select_hardware_address([
            iface("lo", true, Some([0, 0, 0, 0, 0, 1])),
            iface("tun0", false, None),
            iface("dummy0", false, Some([0; 6])),
            iface("eth0", false, Some([0, 0x1b, 0x21, 0x3c, 0x9d, 0xf8])),
            iface("eth1", false, Some([0, 0x1b, 0x21, 0x3c, 0x9d, 0xf9])),
        ]);
        assert_eq!(picked, Some([0, 0x1b, 0x21, 0x3c, 0x9d, 0xf8]));
    }

    #[test]
    fn no_suitable_interface() {
        assert_eq!(select_hardware_address([]), None);
        assert_eq!(
            select_hardware_address([iface("lo", true, Some([1; 6])), iface("sit0", false, None)]),
            None
        );
    }
}
