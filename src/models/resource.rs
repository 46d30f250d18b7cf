//! Machine and disk models.
//!
//! Machines execute jobs; disks store job outputs and serve them to
//! dependent jobs. Both are exclusive: one job at a time.
//!
//! # Timing
//!
//! Partial time units count as full units, so every duration is a ceiling
//! division:
//!
//! | Quantity | Formula |
//! |----------|---------|
//! | Execution | `ceil(size / power)` |
//! | Transfer | `ceil(bytes / speed)` |

use serde::{Deserialize, Serialize};

/// A compute machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Machine {
    /// Machine index (0-based).
    pub id: usize,
    /// Work units processed per time unit.
    pub power: u64,
}

/// A storage disk with a cumulative write quota.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Disk {
    /// Disk index (0-based).
    pub id: usize,
    /// Bytes transferred per time unit.
    pub speed: u64,
    /// Maximum total bytes written across the whole schedule.
    pub quota: u64,
}

impl Machine {
    /// Creates a machine.
    pub fn new(id: usize, power: u64) -> Self {
        Self { id, power }
    }

    /// Time to execute `size` work units. `power` must be positive.
    #[inline]
    pub fn execution_time(&self, size: u64) -> u64 {
        size.div_ceil(self.power)
    }
}

impl Disk {
    /// Creates a disk.
    pub fn new(id: usize, speed: u64, quota: u64) -> Self {
        Self { id, speed, quota }
    }

    /// Time to read or write `bytes`. `speed` must be positive.
    #[inline]
    pub fn transfer_time(&self, bytes: u64) -> u64 {
        bytes.div_ceil(self.speed)
    }

    /// Whether `used` bytes fit within the quota.
    #[inline]
    pub fn fits(&self, used: u64) -> bool {
        used <= self.quota
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_execution_time_rounds_up() {
        let m = Machine::new(0, 5);
        assert_eq!(m.execution_time(10), 2);
        assert_eq!(m.execution_time(11), 3);
        assert_eq!(m.execution_time(1), 1);
    }

    #[test]
    fn test_transfer_time() {
        let d = Disk::new(0, 10, 100);
        assert_eq!(d.transfer_time(0), 0);
        assert_eq!(d.transfer_time(20), 2);
        assert_eq!(d.transfer_time(21), 3);
    }

    #[test]
    fn test_disk_quota() {
        let d = Disk::new(0, 10, 100);
        assert!(d.fits(100));
        assert!(!d.fits(101));
        assert!(Disk::new(1, 1, 0).fits(0));
    }
}
