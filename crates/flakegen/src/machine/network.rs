use crate::{
    Error, InterfaceInfo, MachineIdSource, Result, machine_id_from_hardware_address,
    select_hardware_address,
};

/// Derives the machine ID from the first non-loopback network interface with
/// a non-zero hardware address.
///
/// Deterministic per host, collision-prone across a fleet (1024 buckets).
#[derive(Clone, Copy, Debug, Default)]
pub struct NetworkMachineId;

impl NetworkMachineId {
    /// Enumerates the host's interfaces in OS order.
    pub fn interfaces() -> Vec<InterfaceInfo> {
        pnet_datalink::interfaces()
            .into_iter()
            .map(|iface| InterfaceInfo {
                is_loopback: iface.is_loopback(),
                hardware_address: iface
                    .mac
                    .map(|pnet_datalink::MacAddr(a, b, c, d, e, f)| [a, b, c, d, e, f]),
                name: iface.name,
            })
            .collect()
    }
}

impl MachineIdSource for NetworkMachineId {
    fn resolve(&self) -> Result<u16> {
        select_hardware_address(Self::interfaces())
            .map(machine_id_from_hardware_address)
            .ok_or_else(|| {
                Error::configuration(
                    "no non-loopback network interface with a hardware address",
                )
            })
    }
}
