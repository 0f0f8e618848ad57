//! Owned device registry.

use crate::bus::NetworkSignals;
use crate::error::{SimError, SimResult};
use rb_components::{
    AirDistributor, BrakeCrane, BrakeLock, ComponentResult, Device, LocoCrane, MotorCompressor,
    MotorFan, PhaseSplitter, PneumoRelay, PneumoSplitter, PressureRegulator, Publish, Reservoir,
    SwitchingValve, TrainHorn, TrolleyBrakeMech,
};
use rb_project::VehicleConfig;

/// Stable identifier of every device on the vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceSlot {
    PhaseSplitter,
    MotorFan1,
    MotorFan2,
    MainReservoir,
    MotorCompressor,
    PressureRegulator,
    BrakeLock,
    BrakeCrane,
    LocoCrane,
    SwitchingValve,
    Splitter,
    Relay,
    TrolleyFront,
    TrolleyRear,
    SupplyReservoir,
    AirDistributor,
    Horn,
}

impl DeviceSlot {
    /// Every slot, in the order devices are stepped within one tick.
    pub const STEP_ORDER: [DeviceSlot; 17] = [
        DeviceSlot::PhaseSplitter,
        DeviceSlot::MotorFan1,
        DeviceSlot::MotorFan2,
        DeviceSlot::MainReservoir,
        DeviceSlot::MotorCompressor,
        DeviceSlot::PressureRegulator,
        DeviceSlot::BrakeLock,
        DeviceSlot::BrakeCrane,
        DeviceSlot::LocoCrane,
        DeviceSlot::SwitchingValve,
        DeviceSlot::Splitter,
        DeviceSlot::Relay,
        DeviceSlot::TrolleyFront,
        DeviceSlot::TrolleyRear,
        DeviceSlot::SupplyReservoir,
        DeviceSlot::AirDistributor,
        DeviceSlot::Horn,
    ];
}

fn built<T>(slot: DeviceSlot, result: ComponentResult<T>) -> SimResult<T> {
    result.map_err(|source| SimError::Device { slot, source })
}

/// All devices of one vehicle, each owned exactly once.
#[derive(Debug, Clone)]
pub struct DeviceSet {
    pub phase_splitter: PhaseSplitter,
    pub motor_fans: [MotorFan; 2],
    pub main_reservoir: Reservoir,
    pub motor_compressor: MotorCompressor,
    pub pressure_regulator: PressureRegulator,
    pub brake_lock: BrakeLock,
    pub brake_crane: BrakeCrane,
    pub loco_crane: LocoCrane,
    pub switching_valve: SwitchingValve,
    pub splitter: PneumoSplitter,
    pub relay: PneumoRelay,
    pub trolley_front: TrolleyBrakeMech,
    pub trolley_rear: TrolleyBrakeMech,
    pub supply_reservoir: Reservoir,
    pub air_distributor: AirDistributor,
    pub horn: TrainHorn,
}

impl DeviceSet {
    /// Build every device from `config`. Either all devices are built or none.
    pub fn build(config: &VehicleConfig) -> SimResult<Self> {
        use DeviceSlot as S;
        let integrator = config.simulation.integrator;

        let mut trolley = config.trolley.clone();
        trolley.wheel_diameter = config.vehicle.wheel_diameter;
        trolley.axle_count = u32::try_from(config.vehicle.num_axles / 2).map_err(|_| {
            SimError::InvalidArg {
                what: "axle count does not fit a truck",
            }
        })?;

        let fan = |slot, index| {
            built(slot, MotorFan::new(index, config.motor_fan.clone()))
                .map(|f| f.with_integrator(integrator))
        };

        Ok(Self {
            phase_splitter: built(S::PhaseSplitter, PhaseSplitter::new(config.phase_splitter.clone()))?
                .with_integrator(integrator),
            motor_fans: [fan(S::MotorFan1, 1)?, fan(S::MotorFan2, 2)?],
            main_reservoir: built(
                S::MainReservoir,
                Reservoir::new("main-reservoir", config.vehicle.main_reservoir_volume),
            )?
            .with_integrator(integrator),
            motor_compressor: built(
                S::MotorCompressor,
                MotorCompressor::new(config.compressor.clone()),
            )?
            .with_integrator(integrator),
            pressure_regulator: built(
                S::PressureRegulator,
                PressureRegulator::new(config.regulator.clone()),
            )?,
            brake_lock: built(S::BrakeLock, BrakeLock::new(config.brake_lock.clone()))?
                .with_integrator(integrator),
            brake_crane: built(S::BrakeCrane, BrakeCrane::new(config.brake_crane.clone()))?
                .with_integrator(integrator),
            loco_crane: built(S::LocoCrane, LocoCrane::new(config.loco_crane.clone()))?
                .with_integrator(integrator),
            switching_valve: built(
                S::SwitchingValve,
                SwitchingValve::new(config.switching_valve.clone()),
            )?
            .with_integrator(integrator),
            splitter: built(S::Splitter, PneumoSplitter::new(config.splitter.clone()))?
                .with_integrator(integrator),
            relay: built(S::Relay, PneumoRelay::new(config.relay.clone()))?
                .with_integrator(integrator),
            trolley_front: built(
                S::TrolleyFront,
                TrolleyBrakeMech::new("trolley-front", trolley.clone()),
            )?
            .with_integrator(integrator),
            trolley_rear: built(S::TrolleyRear, TrolleyBrakeMech::new("trolley-rear", trolley))?
                .with_integrator(integrator),
            supply_reservoir: built(
                S::SupplyReservoir,
                Reservoir::new("supply-reservoir", config.vehicle.supply_reservoir_volume),
            )?
            .with_integrator(integrator),
            air_distributor: built(
                S::AirDistributor,
                AirDistributor::new(config.air_distributor.clone()),
            )?
            .with_integrator(integrator),
            horn: TrainHorn::new(),
        })
    }

    pub fn get(&self, slot: DeviceSlot) -> &dyn Device {
        match slot {
            DeviceSlot::PhaseSplitter => &self.phase_splitter,
            DeviceSlot::MotorFan1 => &self.motor_fans[0],
            DeviceSlot::MotorFan2 => &self.motor_fans[1],
            DeviceSlot::MainReservoir => &self.main_reservoir,
            DeviceSlot::MotorCompressor => &self.motor_compressor,
            DeviceSlot::PressureRegulator => &self.pressure_regulator,
            DeviceSlot::BrakeLock => &self.brake_lock,
            DeviceSlot::BrakeCrane => &self.brake_crane,
            DeviceSlot::LocoCrane => &self.loco_crane,
            DeviceSlot::SwitchingValve => &self.switching_valve,
            DeviceSlot::Splitter => &self.splitter,
            DeviceSlot::Relay => &self.relay,
            DeviceSlot::TrolleyFront => &self.trolley_front,
            DeviceSlot::TrolleyRear => &self.trolley_rear,
            DeviceSlot::SupplyReservoir => &self.supply_reservoir,
            DeviceSlot::AirDistributor => &self.air_distributor,
            DeviceSlot::Horn => &self.horn,
        }
    }

    pub fn get_mut(&mut self, slot: DeviceSlot) -> &mut dyn Device {
        match slot {
            DeviceSlot::PhaseSplitter => &mut self.phase_splitter,
            DeviceSlot::MotorFan1 => &mut self.motor_fans[0],
            DeviceSlot::MotorFan2 => &mut self.motor_fans[1],
            DeviceSlot::MainReservoir => &mut self.main_reservoir,
            DeviceSlot::MotorCompressor => &mut self.motor_compressor,
            DeviceSlot::PressureRegulator => &mut self.pressure_regulator,
            DeviceSlot::BrakeLock => &mut self.brake_lock,
            DeviceSlot::BrakeCrane => &mut self.brake_crane,
            DeviceSlot::LocoCrane => &mut self.loco_crane,
            DeviceSlot::SwitchingValve => &mut self.switching_valve,
            DeviceSlot::Splitter => &mut self.splitter,
            DeviceSlot::Relay => &mut self.relay,
            DeviceSlot::TrolleyFront => &mut self.trolley_front,
            DeviceSlot::TrolleyRear => &mut self.trolley_rear,
            DeviceSlot::SupplyReservoir => &mut self.supply_reservoir,
            DeviceSlot::AirDistributor => &mut self.air_distributor,
            DeviceSlot::Horn => &mut self.horn,
        }
    }

    /// Current outputs of every device.
    pub fn snapshot(&self) -> NetworkSignals {
        NetworkSignals {
            phase_splitter: self.phase_splitter.outputs(),
            motor_fans: [self.motor_fans[0].outputs(), self.motor_fans[1].outputs()],
            main_reservoir: self.main_reservoir.outputs(),
            motor_compressor: self.motor_compressor.outputs(),
            pressure_regulator: self.pressure_regulator.outputs(),
            brake_lock: self.brake_lock.outputs(),
            brake_crane: self.brake_crane.outputs(),
            loco_crane: self.loco_crane.outputs(),
            switching_valve: self.switching_valve.outputs(),
            splitter: self.splitter.outputs(),
            relay: self.relay.outputs(),
            trolley_front: self.trolley_front.outputs(),
            trolley_rear: self.trolley_rear.outputs(),
            supply_reservoir: self.supply_reservoir.outputs(),
            air_distributor: self.air_distributor.outputs(),
        }
    }
}
