//! Published outputs of every device and the coupling between them.

use rb_components::{
    AirDistributorOutputs, BrakeCraneOutputs, BrakeLockOutputs, LocoCraneOutputs,
    MotorCompressorOutputs, MotorFanOutputs, PhaseSplitterOutputs, PneumoRelayOutputs,
    PressureRegulatorOutputs, ReservoirOutputs, SplitterOutputs, SwitchingValveOutputs,
    TrolleyBrakeMechOutputs,
};
pub use rb_project::CouplingMode;

/// Outputs of the whole device network at one instant.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NetworkSignals {
    pub phase_splitter: PhaseSplitterOutputs,
    pub motor_fans: [MotorFanOutputs; 2],
    pub main_reservoir: ReservoirOutputs,
    pub motor_compressor: MotorCompressorOutputs,
    pub pressure_regulator: PressureRegulatorOutputs,
    pub brake_lock: BrakeLockOutputs,
    pub brake_crane: BrakeCraneOutputs,
    pub loco_crane: LocoCraneOutputs,
    pub switching_valve: SwitchingValveOutputs,
    pub splitter: SplitterOutputs,
    pub relay: PneumoRelayOutputs,
    pub trolley_front: TrolleyBrakeMechOutputs,
    pub trolley_rear: TrolleyBrakeMechOutputs,
    pub supply_reservoir: ReservoirOutputs,
    pub air_distributor: AirDistributorOutputs,
}

/// Holds what devices may read from each other.
///
/// In [`CouplingMode::Sequential`] a published output is visible at once, so a
/// device stepped later in the pass reads this tick's value and one stepped
/// earlier reads last tick's. In [`CouplingMode::Lagged`] outputs are staged
/// and become visible only at [`SignalBus::end_pass`].
#[derive(Debug, Clone, Default)]
pub struct SignalBus {
    mode: CouplingMode,
    visible: NetworkSignals,
    staged: NetworkSignals,
}

impl SignalBus {
    pub fn new(mode: CouplingMode, initial: NetworkSignals) -> Self {
        Self {
            mode,
            visible: initial,
            staged: initial,
        }
    }

    pub fn mode(&self) -> CouplingMode {
        self.mode
    }

    pub fn signals(&self) -> &NetworkSignals {
        &self.visible
    }

    pub fn publish(&mut self, write: impl Fn(&mut NetworkSignals)) {
        write(&mut self.staged);
        if self.mode == CouplingMode::Sequential {
            write(&mut self.visible);
        }
    }

    /// Close one pass over the network.
    pub fn end_pass(&mut self) {
        self.visible = self.staged;
    }

    /// Replace everything, bypassing the coupling mode. Used after the device
    /// states were set from outside the step loop.
    pub fn reset(&mut self, signals: NetworkSignals) {
        self.visible = signals;
        self.staged = signals;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_pressure(p: f64) -> impl Fn(&mut NetworkSignals) {
        move |s| s.main_reservoir.pressure = p
    }

    #[test]
    fn sequential_publishes_immediately() {
        let mut bus = SignalBus::new(CouplingMode::Sequential, NetworkSignals::default());
        bus.publish(with_pressure(0.7));
        assert_eq!(bus.signals().main_reservoir.pressure, 0.7);
        bus.end_pass();
        assert_eq!(bus.signals().main_reservoir.pressure, 0.7);
    }

    #[test]
    fn lagged_publishes_after_pass() {
        let mut bus = SignalBus::new(CouplingMode::Lagged, NetworkSignals::default());
        bus.publish(with_pressure(0.7));
        assert_eq!(bus.signals().main_reservoir.pressure, 0.0);
        bus.end_pass();
        assert_eq!(bus.signals().main_reservoir.pressure, 0.7);
    }

    #[test]
    fn reset_overrides_both_views() {
        let mut bus = SignalBus::new(CouplingMode::Lagged, NetworkSignals::default());
        let mut init = NetworkSignals::default();
        init.supply_reservoir.pressure = 0.5;
        bus.reset(init);
        assert_eq!(bus.signals().supply_reservoir.pressure, 0.5);
        bus.end_pass();
        assert_eq!(bus.signals().supply_reservoir.pressure, 0.5);
    }
}
