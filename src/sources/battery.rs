use super::types::StorageParams;

/// A battery energy store tracking its state of charge over one dispatch run.
///
/// `Battery` absorbs surplus generation and covers deficits, losing energy
/// through `efficiency` once on the way in and once on the way out. The state
/// of charge is held in absolute energy units and never leaves
/// `[floor, capacity]` once it has entered that range.
///
/// # Examples
///
/// ```
/// use minigrid_sizer::sources::{Battery, StorageParams};
///
/// let params = StorageParams {
///     initial_soc: 0.5,
///     floor_fraction: 0.1,
///     efficiency: 1.0,
///     capex: 140.0,
///     max: 5000.0,
/// };
/// let mut battery = Battery::new(100.0, &params);
/// assert_eq!(battery.discharge(30.0), 30.0);
/// assert_eq!(battery.soc(), 20.0);
/// ```
#[derive(Debug, Clone)]
pub struct Battery {
    /// Energy capacity.
    capacity: f64,

    /// Stored energy.
    soc: f64,

    /// Energy that must stay stored.
    floor: f64,

    /// One-way efficiency (0..1.0].
    efficiency: f64,
}

impl Battery {
    /// Creates a battery of `capacity` charged to `params.initial_soc`.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Energy capacity (negative values are treated as zero)
    /// * `params` - Efficiency, floor reserve and initial state of charge
    pub fn new(capacity: f64, params: &StorageParams) -> Self {
        let capacity = capacity.max(0.0);
        Self {
            capacity,
            soc: params.initial_soc * capacity,
            floor: params.floor_fraction * capacity,
            efficiency: params.efficiency,
        }
    }

    /// Energy capacity.
    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    /// Stored energy.
    pub fn soc(&self) -> f64 {
        self.soc
    }

    /// Reserve floor in energy units.
    pub fn floor(&self) -> f64 {
        self.floor
    }

    /// Charges from a surplus and returns the share of the surplus absorbed.
    ///
    /// Stored energy rises by `efficiency × surplus`, capped at capacity. The
    /// rest of the surplus is curtailed by the caller.
    pub fn charge(&mut self, surplus: f64) -> f64 {
        if surplus <= 0.0 {
            return 0.0;
        }
        let before = self.soc;
        self.soc = (self.soc + self.efficiency * surplus).min(self.capacity);
        // a battery that started above capacity cannot absorb anything
        ((self.soc - before) / self.efficiency).max(0.0)
    }

    /// Discharges towards a deficit and returns the energy delivered.
    ///
    /// Covering `deficit` costs `deficit / efficiency` of stored energy; the
    /// draw is limited to what sits above the floor.
    pub fn discharge(&mut self, deficit: f64) -> f64 {
        let available = self.soc - self.floor;
        let drawn = available.min(deficit / self.efficiency).max(0.0);
        self.soc -= drawn;
        drawn * self.efficiency
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(efficiency: f64) -> StorageParams {
        StorageParams {
            initial_soc: 0.5,
            floor_fraction: 0.1,
            efficiency,
            capex: 140.0,
            max: 5000.0,
        }
    }

    #[test]
    fn test_new_battery() {
        let battery = Battery::new(10.0, &params(0.95));
        assert_eq!(battery.capacity(), 10.0);
        assert_eq!(battery.soc(), 5.0);
        assert!((battery.floor() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_negative_capacity_clamped_to_zero() {
        let battery = Battery::new(-5.0, &params(0.95));
        assert_eq!(battery.capacity(), 0.0);
        assert_eq!(battery.soc(), 0.0);
    }

    #[test]
    fn test_charge_capped_at_capacity() {
        let mut battery = Battery::new(10.0, &params(1.0));
        let absorbed = battery.charge(8.0);
        assert_eq!(battery.soc(), 10.0);
        assert_eq!(absorbed, 5.0);
    }

    #[test]
    fn test_charge_applies_efficiency() {
        let mut battery = Battery::new(100.0, &params(0.9));
        let absorbed = battery.charge(10.0);
        assert!((battery.soc() - 59.0).abs() < 1e-9);
        assert!((absorbed - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_discharge_limited_by_floor() {
        let mut battery = Battery::new(10.0, &params(1.0));
        // 5 stored, floor 1 → 4 available
        let delivered = battery.discharge(6.0);
        assert!((delivered - 4.0).abs() < 1e-12);
        assert!((battery.soc() - battery.floor()).abs() < 1e-12);
    }

    #[test]
    fn test_discharge_applies_efficiency() {
        let mut battery = Battery::new(100.0, &params(0.8));
        // delivering 8 needs 10 from storage
        let delivered = battery.discharge(8.0);
        assert!((delivered - 8.0).abs() < 1e-12);
        assert!((battery.soc() - 40.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_battery_delivers_nothing() {
        let mut battery = Battery::new(0.0, &params(0.95));
        assert_eq!(battery.discharge(3.0), 0.0);
        assert_eq!(battery.charge(3.0), 0.0);
    }

    #[test]
    fn test_round_trip_loses_efficiency_twice() {
        let eff = 0.95_f64.sqrt();
        let mut battery = Battery::new(1000.0, &StorageParams {
            initial_soc: 0.0,
            floor_fraction: 0.0,
            efficiency: eff,
            capex: 0.0,
            max: 1000.0,
        });
        battery.charge(100.0);
        let delivered = battery.discharge(1000.0);
        assert!((delivered - 95.0).abs() < 1e-9);
    }
}
