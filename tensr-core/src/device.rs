//! Compute-target tags.
//!
//! The core only stores and propagates the tag; byte migration, queueing,
//! and real synchronization belong to the accelerator collaborator behind
//! this interface.

use std::fmt;

/// Opaque marker for the compute target a tensor is associated with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Device {
    #[default]
    Cpu,
    Cuda,
    Xpu,
    Npu,
    Tpu,
}

impl Device {
    pub fn name(self) -> &'static str {
        match self {
            Device::Cpu => "CPU",
            Device::Cuda => "CUDA",
            Device::Xpu => "XPU",
            Device::Npu => "NPU",
            Device::Tpu => "TPU",
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Block until all previously queued operations on the device are complete.
///
/// The only ordering primitive toward accelerators. The core itself never
/// queues asynchronous work, so with no backend attached this returns
/// immediately for every tag.
pub fn synchronize(_device: Device, _device_id: usize) {}

/// Number of available devices of the given kind.
///
/// The host CPU always exists; accelerator counts come from the backend
/// collaborator, and none is attached in the core.
pub fn device_count(device: Device) -> usize {
    match device {
        Device::Cpu => 1,
        _ => 0,
    }
}
