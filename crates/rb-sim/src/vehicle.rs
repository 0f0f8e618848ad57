//! The ER2T motor car: owns every device and steps them in a fixed order.

use crate::bus::{NetworkSignals, SignalBus};
use crate::devices::{DeviceSet, DeviceSlot};
use crate::diagnostics::Status;
use crate::error::SimResult;
use crate::model::VehicleModel;
use crate::traction::TractionCharacteristic;
use rb_components::{Device, NullSink, Publish, SoundSink};
use rb_controls::{
    Control, ControlSnapshot, EdgeDetector, Reverser, ReverserLatch, TractionLevel, Trigger,
};
use rb_core::units::mps_to_kmh;
use rb_project::{BrakesState, ProjectResult, VehicleConfig, load_vehicle_section, validate_config};
use std::path::Path;

/// Composite brake and auxiliary-machinery model of one ER2T motor car.
///
/// Built once from a [`VehicleConfig`]; a vehicle that was built is always
/// complete. Sound events go to the sink `S` in step order.
#[derive(Debug)]
pub struct Er2tVehicle<S: SoundSink = NullSink> {
    config: VehicleConfig,
    traction: TractionCharacteristic,
    devices: DeviceSet,
    bus: SignalBus,
    sink: S,

    controls: ControlSnapshot,
    edges: EdgeDetector,
    traction_level: TractionLevel,
    reverser: ReverserLatch,
    phase_splitter_tumbler: Trigger,
    fan_tumblers: [Trigger; 2],
    compressor_tumbler: Trigger,

    velocity: f64,
    railway_coord: f64,
    p_tm: f64,
    supply_voltage: f64,
    charge_press: Option<f64>,

    p0: f64,
    aux_rate: f64,
    traction_force: f64,
    traction_torques: Vec<f64>,
    brake_torques: Vec<f64>,
    debug_message: String,
}

impl<S: SoundSink> Er2tVehicle<S> {
    pub fn new(config: VehicleConfig, sink: S) -> SimResult<Self> {
        validate_config(&config)?;
        let devices = DeviceSet::build(&config)?;
        let bus = SignalBus::new(config.simulation.coupling, devices.snapshot());
        let axles = config.vehicle.num_axles;

        tracing::info!(
            axles,
            coupling = ?config.simulation.coupling,
            integrator = ?config.simulation.integrator,
            "ER2T vehicle built"
        );

        Ok(Self {
            traction: TractionCharacteristic::from_section(&config.vehicle),
            supply_voltage: config.simulation.supply_voltage,
            devices,
            bus,
            sink,
            controls: ControlSnapshot::default(),
            edges: EdgeDetector::default(),
            traction_level: TractionLevel::default(),
            reverser: ReverserLatch::default(),
            phase_splitter_tumbler: Trigger::default(),
            fan_tumblers: [Trigger::default(); 2],
            compressor_tumbler: Trigger::default(),
            velocity: 0.0,
            railway_coord: 0.0,
            p_tm: 0.0,
            charge_press: None,
            p0: 0.0,
            aux_rate: 0.0,
            traction_force: 0.0,
            traction_torques: vec![0.0; axles],
            brake_torques: vec![0.0; axles],
            debug_message: String::new(),
            config,
        })
    }

    /// Build from the per-device documents of a vehicle directory.
    pub fn from_dirs(config_dir: &Path, modules_dir: &Path, sink: S) -> SimResult<Self> {
        Self::new(VehicleConfig::from_dirs(config_dir, modules_dir), sink)
    }

    // Host inputs

    /// Vehicle speed, m/s.
    pub fn set_velocity(&mut self, v: f64) {
        self.velocity = v;
    }

    /// Railway coordinate, m.
    pub fn set_railway_coord(&mut self, x: f64) {
        self.railway_coord = x;
    }

    /// Brake-pipe pressure at this car, MPa.
    pub fn set_brake_pipe_pressure(&mut self, p: f64) {
        self.p_tm = p;
    }

    /// Voltage offered to the phase splitter, V.
    pub fn set_supply_voltage(&mut self, u: f64) {
        self.supply_voltage = u;
    }

    // Host outputs

    /// Pressure the car feeds into the head of the brake pipe (`p0`), MPa.
    pub fn brake_pipe_init_pressure(&self) -> f64 {
        self.p0
    }

    /// Air drawn from the brake pipe by the air distributor.
    pub fn aux_rate(&self) -> f64 {
        self.aux_rate
    }

    /// Traction force, N.
    pub fn traction_force(&self) -> f64 {
        self.traction_force
    }

    /// Traction torque per wheel pair, N·m.
    pub fn traction_torques(&self) -> &[f64] {
        &self.traction_torques
    }

    /// Brake torque per wheel pair, N·m. Front truck first.
    pub fn brake_torques(&self) -> &[f64] {
        &self.brake_torques
    }

    /// Total shoe force of both trucks, N.
    pub fn shoe_force(&self) -> f64 {
        self.devices.trolley_front.shoe_force() + self.devices.trolley_rear.shoe_force()
    }

    pub fn debug_message(&self) -> &str {
        &self.debug_message
    }

    pub fn charge_pressure(&self) -> Option<f64> {
        self.charge_press
    }

    pub fn main_reservoir_pressure(&self) -> f64 {
        self.devices.main_reservoir.pressure()
    }

    pub fn supply_reservoir_pressure(&self) -> f64 {
        self.devices.supply_reservoir.pressure()
    }

    /// Brake-cylinder pressures of the front and rear trucks, MPa.
    pub fn brake_cylinder_pressures(&self) -> (f64, f64) {
        (
            self.devices.trolley_front.brake_cylinder_pressure(),
            self.devices.trolley_rear.brake_cylinder_pressure(),
        )
    }

    pub fn reverser(&self) -> Reverser {
        self.reverser.position()
    }

    pub fn traction_level(&self) -> f64 {
        self.traction_level.value()
    }

    pub fn config(&self) -> &VehicleConfig {
        &self.config
    }

    pub fn devices(&self) -> &DeviceSet {
        &self.devices
    }

    pub fn signals(&self) -> &NetworkSignals {
        self.bus.signals()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Current brake state, in the form `initialize_braking` reads it back.
    pub fn brakes_state(&self) -> BrakesState {
        let d = &self.devices;
        BrakesState {
            main_reservoir_pressure: Some(d.main_reservoir.pressure()),
            main_reservoir_flow: Some(d.main_reservoir.flow_coeff()),
            charging_pressure: self.charge_press,
            train_crane_pos: Some(d.brake_crane.position() as i64),
            loco_crane_pos: Some(d.loco_crane.handle_position() as i64),
            combine_crane_pos: Some(d.brake_lock.combine_crane_pos().into()),
            brake_lock_device: Some(d.brake_lock.state()),
        }
    }

    /// Apply a brake-state snapshot. Absent fields are left alone; invalid
    /// ones are logged and skipped.
    pub fn apply_brakes_state(&mut self, state: &BrakesState) {
        let d = &mut self.devices;
        if let Some(p) = state.main_reservoir_pressure {
            d.main_reservoir.set_y(0, p);
        }
        if let Some(k) = state.main_reservoir_flow {
            if let Err(e) = d.main_reservoir.set_flow_coeff(k) {
                tracing::warn!(error = %e, "MainReservoirFlow ignored");
            }
        }
        if let Some(p) = state.charging_pressure {
            self.charge_press = Some(p);
        }
        if let Some(pos) = state.train_crane_pos {
            if let Err(e) = d.brake_crane.set_position(pos) {
                tracing::warn!(error = %e, "TrainCranePos ignored");
            }
        }
        if let Some(pos) = state.loco_crane_pos {
            if let Err(e) = d.loco_crane.set_handle_position(pos) {
                tracing::warn!(error = %e, "LocoCranePos ignored");
            }
        }
        if let Some(pos) = state.combine_crane_pos {
            if let Err(e) = d.brake_lock.set_combine_crane_pos(pos) {
                tracing::warn!(error = %e, "CombineCranePos ignored");
            }
        }
        if let Some(lock) = state.brake_lock_device {
            match d.brake_lock.set_state(lock) {
                Ok(()) if lock == 1 => match self.charge_press {
                    Some(charge) => {
                        let p_fl = state
                            .main_reservoir_pressure
                            .unwrap_or_else(|| d.main_reservoir.pressure());
                        d.brake_lock.set_y(0, charge);
                        d.brake_crane.init(charge, p_fl);
                        d.supply_reservoir.set_y(0, charge);
                    }
                    None => tracing::warn!("brake lock connected without a charging pressure"),
                },
                Ok(()) => {}
                Err(e) => tracing::warn!(error = %e, "BrakeLockDevice ignored"),
            }
        }
        self.bus.reset(self.devices.snapshot());
    }

    fn apply_tumbler(tumbler: &mut Trigger, shift: bool) {
        if shift {
            tumbler.set();
        } else {
            tumbler.reset();
        }
    }

    fn handle_press(&mut self, control: Control) {
        let d = &mut self.devices;
        let moved = match control {
            Control::TrainCraneRelease if d.brake_crane.position() > 0 => {
                d.brake_crane.move_handle(d.brake_crane.position() as i64 - 1)
            }
            Control::TrainCraneApply if d.brake_crane.position() + 1 < d.brake_crane.position_count() => {
                d.brake_crane.move_handle(d.brake_crane.position() as i64 + 1)
            }
            Control::LocoCraneRelease => {
                d.loco_crane.release_notch();
                Ok(())
            }
            Control::LocoCraneApply => {
                d.loco_crane.apply_notch();
                Ok(())
            }
            Control::BrakeLockToggle => {
                d.brake_lock.toggle();
                Ok(())
            }
            Control::CombineCraneTrain => d.brake_lock.set_combine_crane_pos(-1),
            Control::CombineCraneDoubleTraction => d.brake_lock.set_combine_crane_pos(0),
            Control::CombineCraneEmergency => d.brake_lock.set_combine_crane_pos(1),
            _ => Ok(()),
        };
        if let Err(e) = moved {
            tracing::warn!(?control, error = %e, "control rejected");
        }
    }

    fn step_supply_machines(&mut self, t: f64, dt: f64) {
        let d = &mut self.devices;
        let bus = &mut self.bus;

        d.phase_splitter
            .set_u_in(self.supply_voltage * self.phase_splitter_tumbler.factor());
        d.phase_splitter.step(t, dt);
        let out = d.phase_splitter.outputs();
        bus.publish(|s| s.phase_splitter = out);

        for (i, fan) in d.motor_fans.iter_mut().enumerate() {
            fan.set_u_in(bus.signals().phase_splitter.u_out * self.fan_tumblers[i].factor());
            fan.step(t, dt);
            let out = fan.outputs();
            bus.publish(|s| s.motor_fans[i] = out);
        }

        d.main_reservoir.set_air_flow(bus.signals().motor_compressor.air_flow);
        d.main_reservoir.step(t, dt);
        let out = d.main_reservoir.outputs();
        bus.publish(|s| s.main_reservoir = out);

        let sig = bus.signals();
        d.motor_compressor.set_external_pressure(sig.main_reservoir.pressure);
        d.motor_compressor.set_u_power(
            sig.phase_splitter.u_out
                * self.compressor_tumbler.factor()
                * sig.pressure_regulator.state,
        );
        d.motor_compressor.step(t, dt);
        let out = d.motor_compressor.outputs();
        bus.publish(|s| s.motor_compressor = out);

        d.pressure_regulator.set_pressure(bus.signals().main_reservoir.pressure);
        d.pressure_regulator.step(t, dt);
        let out = d.pressure_regulator.outputs();
        bus.publish(|s| s.pressure_regulator = out);
    }

    fn step_brake_control(&mut self, t: f64, dt: f64) {
        let d = &mut self.devices;
        let bus = &mut self.bus;

        let sig = bus.signals();
        d.brake_lock.set_loco_fl_pressure(sig.main_reservoir.pressure);
        d.brake_lock.set_crane_tm_pressure(sig.brake_crane.brake_pipe_init_pressure);
        self.p0 = sig.brake_lock.loco_tm_pressure;
        d.brake_lock.step(t, dt);
        let out = d.brake_lock.outputs();
        bus.publish(|s| s.brake_lock = out);

        d.brake_crane.set_feed_line_pressure(bus.signals().brake_lock.crane_fl_pressure);
        d.brake_crane.set_charge_pressure(self.charge_press.unwrap_or(0.0));
        d.brake_crane.set_brake_pipe_pressure(self.p_tm);
        d.brake_crane.step(t, dt);
        let out = d.brake_crane.outputs();
        bus.publish(|s| s.brake_crane = out);

        let sig = bus.signals();
        d.loco_crane.set_feedline_pressure(sig.brake_lock.crane_fl_pressure);
        d.loco_crane.set_brake_cylinder_pressure(sig.switching_valve.pressure2);
        d.loco_crane.set_air_distributor_flow(0.0);
        d.loco_crane.step(t, dt);
        let out = d.loco_crane.outputs();
        bus.publish(|s| s.loco_crane = out);
    }

    fn step_trolleys_brake_mech(&mut self, t: f64, dt: f64) {
        let d = &mut self.devices;
        let bus = &mut self.bus;

        let sig = bus.signals();
        d.switching_valve.set_input_flow1(sig.air_distributor.brake_cyl_flow);
        d.switching_valve.set_input_flow2(sig.loco_crane.brake_cyl_flow);
        d.switching_valve.set_output_pressure(sig.splitter.p_in);
        d.switching_valve.step(t, dt);
        let out = d.switching_valve.outputs();
        bus.publish(|s| s.switching_valve = out);

        // Splitter fed by the switching valve.
        let sig = bus.signals();
        d.splitter.set_q_in(sig.switching_valve.output_flow);
        d.splitter.set_p_out1(sig.relay.work_pressure);
        d.splitter.set_p_out2(sig.trolley_rear.brake_cyl_pressure);
        d.splitter.step(t, dt);
        let out = d.splitter.outputs();
        bus.publish(|s| s.splitter = out);

        let sig = bus.signals();
        d.relay.set_pipeline_pressure(sig.main_reservoir.pressure);
        d.relay.set_work_air_flow(sig.splitter.q_out1);
        d.relay.set_brake_cyl_pressure(sig.trolley_front.brake_cyl_pressure);
        d.relay.step(t, dt);
        let out = d.relay.outputs();
        bus.publish(|s| s.relay = out);

        // Front truck through the relay, rear truck straight from the splitter.
        d.trolley_front.set_air_flow(bus.signals().relay.brake_cyl_flow);
        d.trolley_front.set_velocity(self.velocity);
        d.trolley_front.step(t, dt);
        let out = d.trolley_front.outputs();
        bus.publish(|s| s.trolley_front = out);

        d.trolley_rear.set_air_flow(bus.signals().splitter.q_out2);
        d.trolley_rear.set_velocity(self.velocity);
        d.trolley_rear.step(t, dt);
        let out = d.trolley_rear.outputs();
        bus.publish(|s| s.trolley_rear = out);

        let half = self.brake_torques.len() / 2;
        let (front, rear) = self.brake_torques.split_at_mut(half);
        front.fill(d.trolley_front.brake_torque());
        rear.fill(d.trolley_rear.brake_torque());
    }

    fn step_air_distributors(&mut self, t: f64, dt: f64) {
        let d = &mut self.devices;
        let bus = &mut self.bus;

        d.supply_reservoir.set_air_flow(bus.signals().air_distributor.supply_flow);
        d.supply_reservoir.step(t, dt);
        let out = d.supply_reservoir.outputs();
        bus.publish(|s| s.supply_reservoir = out);

        let sig = bus.signals();
        d.air_distributor.set_brake_cylinder_pressure(sig.switching_valve.pressure1);
        d.air_distributor.set_air_supply_pressure(sig.supply_reservoir.pressure);
        d.air_distributor.set_brake_pipe_pressure(self.p_tm);
        self.aux_rate = sig.air_distributor.aux_rate;
        d.air_distributor.step(t, dt);
        let out = d.air_distributor.outputs();
        bus.publish(|s| s.air_distributor = out);
    }

    fn step_other_equipment(&mut self, t: f64, dt: f64) {
        self.devices.horn.set_control(self.controls.is_held(Control::Whistle));
        self.devices.horn.step(t, dt);
    }

    fn status(&self) -> Status {
        let d = &self.devices;
        Status {
            main_reservoir: d.main_reservoir.pressure(),
            traction_level: self.traction_level.value(),
            velocity: mps_to_kmh(self.velocity),
            traction_force: self.traction_force / 1000.0,
            supply_reservoir: d.supply_reservoir.pressure(),
            brake_cyl_front: d.trolley_front.brake_cylinder_pressure(),
            brake_cyl_rear: d.trolley_rear.brake_cylinder_pressure(),
            shoe_force: d.trolley_front.shoe_force() / 1000.0,
            brake_pipe: self.p_tm,
            railway_coord: self.railway_coord,
            f_max: self.config.vehicle.f_max,
        }
    }
}

impl<S: SoundSink> VehicleModel for Er2tVehicle<S> {
    fn step(&mut self, t: f64, dt: f64) {
        if dt.is_nan() || dt <= 0.0 {
            return;
        }

        let level = self.traction_level.value();
        self.traction_force = level * self.traction.force(self.velocity);
        let torque = self.reverser.position().sign() * self.traction_force
            * self.config.vehicle.wheel_diameter
            / 2.0
            / self.traction_torques.len() as f64;
        self.traction_torques.fill(torque);

        self.step_supply_machines(t, dt);
        self.step_brake_control(t, dt);
        self.step_trolleys_brake_mech(t, dt);
        self.step_air_distributors(t, dt);
        self.step_other_equipment(t, dt);
        self.bus.end_pass();

        for slot in DeviceSlot::STEP_ORDER {
            self.devices.get_mut(slot).drain_sounds(&mut self.sink);
        }

        self.debug_message = self.status().to_string();
    }

    fn process_control_input(&mut self, controls: &ControlSnapshot) {
        self.controls = controls.clone();

        self.traction_level.update(
            controls.is_held(Control::Accelerate),
            controls.is_held(Control::Decelerate),
        );

        if controls.is_held(Control::CompressorSwitch) {
            Self::apply_tumbler(&mut self.compressor_tumbler, controls.shift);
        }
        if controls.is_held(Control::PhaseSplitterSwitch) {
            Self::apply_tumbler(&mut self.phase_splitter_tumbler, controls.shift);
        }
        if controls.is_held(Control::MotorFanSwitch) {
            for tumbler in &mut self.fan_tumblers {
                Self::apply_tumbler(tumbler, controls.shift);
            }
        }

        for (control, position) in [
            (Control::ReverserBackward, Reverser::Backward),
            (Control::ReverserForward, Reverser::Forward),
            (Control::ReverserNeutral, Reverser::Neutral),
        ] {
            if controls.is_held(control) {
                self.reverser.request(position, self.velocity);
            }
        }

        for control in self.edges.pressed(controls) {
            self.handle_press(control);
        }
    }

    fn load_configuration(&mut self, path: &Path) -> ProjectResult<()> {
        match load_vehicle_section(path) {
            Ok(section) => {
                let v = &mut self.config.vehicle;
                v.f_max = section.f_max;
                v.f_min = section.f_min;
                v.v_nom = section.v_nom;
                self.traction = TractionCharacteristic::from_section(v);
                tracing::debug!(path = %path.display(), "traction parameters loaded");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "vehicle config not loaded, keeping defaults");
                Err(e)
            }
        }
    }

    fn initialize_braking(&mut self, p0: f64, p_tm: f64, p_fl: f64) {
        let d = &mut self.devices;
        d.main_reservoir.set_y(0, p_fl);
        d.supply_reservoir.set_y(0, p_tm);
        d.air_distributor.init(p_tm);
        self.charge_press = Some(p0);
        self.p_tm = p_tm;

        match self.config.brakes_init.clone() {
            Some(state) => self.apply_brakes_state(&state),
            None => {
                tracing::warn!("no initial brake state configured");
                self.bus.reset(self.devices.snapshot());
            }
        }
        tracing::info!(p0, p_tm, p_fl, "brakes initialized");
    }
}
