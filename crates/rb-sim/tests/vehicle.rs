//! End-to-end behavior of the ER2T vehicle through the host surface.

use rb_components::RecordingSink;
use rb_controls::{Control, ControlSnapshot, Reverser};
use rb_core::{ABS_TOL, nearly_equal};
use rb_project::{BrakesState, CouplingMode, VehicleConfig};
use rb_sim::{Er2tVehicle, SimError, VehicleModel};
use std::path::Path;

const DT: f64 = 0.01;

fn vehicle_with(config: VehicleConfig) -> Er2tVehicle<RecordingSink> {
    Er2tVehicle::new(config, RecordingSink::new()).unwrap()
}

fn charged() -> Er2tVehicle<RecordingSink> {
    let mut car = vehicle_with(VehicleConfig::default());
    car.initialize_braking(0.5, 0.5, 0.9);
    car
}

fn run(car: &mut Er2tVehicle<RecordingSink>, t0: f64, ticks: usize) -> f64 {
    let mut t = t0;
    for _ in 0..ticks {
        car.step(t, DT);
        t += DT;
    }
    t
}

#[test]
fn invalid_config_builds_nothing() {
    let mut config = VehicleConfig::default();
    config.vehicle.main_reservoir_volume = 0.0;
    let err = Er2tVehicle::new(config, RecordingSink::new()).unwrap_err();
    assert!(matches!(err, SimError::Config(_)));
}

#[test]
fn bad_brake_state_file_still_builds() {
    let root = std::env::temp_dir().join(format!("rb_sim_{}_bad_brakes", std::process::id()));
    let config_dir = root.join("er2t");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(
        config_dir.join("brakes-init.yaml"),
        "BrakesState:\n  TrainCranePos: 9\n  ChargingPressure: 0.7\n",
    )
    .unwrap();

    let mut car = Er2tVehicle::from_dirs(&config_dir, &root.join("modules"), RecordingSink::new())
        .unwrap();
    car.initialize_braking(0.5, 0.5, 0.9);
    assert_eq!(car.brakes_state().train_crane_pos, Some(1));
    assert_eq!(car.charge_pressure(), Some(0.5));

    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn invalid_brake_state_fields_are_skipped() {
    let mut config = VehicleConfig::default();
    config.brakes_init = Some(BrakesState {
        train_crane_pos: Some(9),
        loco_crane_pos: Some(2),
        ..BrakesState::default()
    });
    let mut car = vehicle_with(config);
    car.initialize_braking(0.5, 0.5, 0.9);
    let state = car.brakes_state();
    assert_eq!(state.train_crane_pos, Some(1));
    assert_eq!(state.loco_crane_pos, Some(2));
}

#[test]
fn brake_pipe_reduction_fills_cylinders() {
    let mut car = charged();
    car.set_velocity(15.0);
    let t = run(&mut car, 0.0, 100);
    let (front0, rear0) = car.brake_cylinder_pressures();

    car.set_brake_pipe_pressure(0.4);
    car.step(t, DT);
    car.step(t + DT, DT);
    let (_, rear1) = car.brake_cylinder_pressures();
    assert!(rear1 > rear0, "rear cylinder did not start filling");

    run(&mut car, t + 2.0 * DT, 3000);
    let (front, rear) = car.brake_cylinder_pressures();
    assert!(front > front0 + 0.05);
    assert!(rear > rear0 + 0.05);
    assert!(car.shoe_force() > 0.0);

    // Plateau once the brake pipe is steady.
    let before = car.brake_cylinder_pressures();
    run(&mut car, 100.0, 500);
    let after = car.brake_cylinder_pressures();
    assert!((after.0 - before.0).abs() < 0.01);
    assert!((after.1 - before.1).abs() < 0.01);
}

#[test]
fn truck_axles_share_brake_torque() {
    let mut car = charged();
    car.set_velocity(20.0);
    car.set_brake_pipe_pressure(0.35);
    run(&mut car, 0.0, 1000);
    let q = car.brake_torques();
    assert_eq!(q.len(), 4);
    assert_eq!(q[0], q[1]);
    assert_eq!(q[2], q[3]);
    assert!(q.iter().all(|&m| m > 0.0));
}

#[test]
fn latched_interlock_forces_charge_pressure() {
    let mut config = VehicleConfig::default();
    config.brakes_init = Some(BrakesState {
        charging_pressure: Some(5.0),
        brake_lock_device: Some(1),
        ..BrakesState::default()
    });
    let mut car = vehicle_with(config);
    car.initialize_braking(0.5, 0.5, 0.9);
    assert_eq!(car.supply_reservoir_pressure(), 5.0);
    assert_eq!(car.charge_pressure(), Some(5.0));
    assert!(car.devices().brake_lock.is_connected());
}

#[test]
fn brakes_state_reads_back_after_initialization() {
    let init = BrakesState {
        main_reservoir_pressure: Some(0.85),
        main_reservoir_flow: Some(0.0),
        charging_pressure: Some(0.5),
        train_crane_pos: Some(3),
        loco_crane_pos: Some(2),
        combine_crane_pos: Some(0),
        brake_lock_device: Some(0),
    };
    let mut config = VehicleConfig::default();
    config.brakes_init = Some(init.clone());
    let mut car = vehicle_with(config);
    car.initialize_braking(0.5, 0.5, 0.9);
    assert_eq!(car.brakes_state(), init);
}

#[test]
fn unreadable_config_keeps_defaults() {
    let mut car = vehicle_with(VehicleConfig::default());
    let result = car.load_configuration(Path::new("/nonexistent/rb-sim/vehicle.yaml"));
    assert!(result.is_err());
    assert_eq!(car.charge_pressure(), None);
    let v = &car.config().vehicle;
    assert_eq!((v.f_max, v.f_min, v.v_nom), (450.0, 350.0, 80.0));
}

#[test]
fn load_configuration_updates_traction() {
    let dir = std::env::temp_dir().join(format!("rb_sim_{}_traction", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("vehicle.yaml");
    std::fs::write(&path, "Vehicle:\n  F_max: 300.0\n  F_min: 200.0\n  V_nom: 60.0\n").unwrap();

    let mut car = vehicle_with(VehicleConfig::default());
    car.load_configuration(&path).unwrap();
    let v = &car.config().vehicle;
    assert_eq!((v.f_max, v.f_min, v.v_nom), (300.0, 200.0, 60.0));

    car.process_control_input(&ControlSnapshot::new().with(Control::ReverserForward));
    for _ in 0..100 {
        car.process_control_input(&ControlSnapshot::new().with(Control::Accelerate));
    }
    car.step(0.0, DT);
    assert!(nearly_equal(car.traction_force(), 300_000.0, ABS_TOL));

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn reverser_moves_only_at_standstill() {
    let mut car = charged();
    car.set_velocity(3.0);
    car.process_control_input(&ControlSnapshot::new().with(Control::ReverserForward));
    assert_eq!(car.reverser(), Reverser::Neutral);

    car.set_velocity(0.0);
    car.process_control_input(&ControlSnapshot::new().with(Control::ReverserForward));
    assert_eq!(car.reverser(), Reverser::Forward);

    car.set_velocity(-1.0);
    car.process_control_input(&ControlSnapshot::new().with(Control::ReverserBackward));
    assert_eq!(car.reverser(), Reverser::Forward);
}

#[test]
fn neutral_reverser_gives_no_torque() {
    let mut car = charged();
    for _ in 0..30 {
        car.process_control_input(&ControlSnapshot::new().with(Control::Accelerate));
    }
    car.step(0.0, DT);
    assert!(car.traction_force() > 0.0);
    assert!(car.traction_torques().iter().all(|&q| q == 0.0));
}

#[test]
fn sounds_arrive_in_step_order() {
    let mut car = charged();
    let snapshot = ControlSnapshot::new()
        .with(Control::Whistle)
        .with(Control::BrakeLockToggle)
        .with(Control::TrainCraneApply);
    car.process_control_input(&snapshot);
    car.step(0.0, DT);
    assert_eq!(car.sink().names(), vec!["UBT_On", "Kran_395", "Svistok"]);

    // Held controls do not repeat edge actions.
    car.sink_mut().clear();
    car.process_control_input(&snapshot);
    car.step(DT, DT);
    assert!(car.sink().names().is_empty());
}

#[test]
fn machines_start_from_tumblers() {
    let mut car = charged();
    let on = ControlSnapshot::new()
        .with(Control::PhaseSplitterSwitch)
        .with(Control::MotorFanSwitch)
        .with_shift();
    car.process_control_input(&on);
    run(&mut car, 0.0, 500);
    let sig = car.signals();
    assert!(sig.phase_splitter.relative_speed > 0.5);
    assert!(sig.motor_fans.iter().all(|f| f.relative_speed > 0.1));
    assert!(car.sink().names().contains(&"Phase_Splitter"));
    assert!(car.sink().names().contains(&"Motor_Fan1"));

    // Without shift the same switches turn the machines off.
    let off = ControlSnapshot::new()
        .with(Control::PhaseSplitterSwitch)
        .with(Control::MotorFanSwitch);
    car.process_control_input(&off);
    run(&mut car, 5.0, 2000);
    assert!(car.signals().phase_splitter.relative_speed < 0.01);
}

#[test]
fn compressor_charges_main_reservoir_until_cutout() {
    let mut car = vehicle_with(VehicleConfig::default());
    car.initialize_braking(0.5, 0.5, 0.7);
    car.process_control_input(
        &ControlSnapshot::new()
            .with(Control::PhaseSplitterSwitch)
            .with(Control::CompressorSwitch)
            .with_shift(),
    );
    run(&mut car, 0.0, 3000);
    assert!(car.devices().pressure_regulator.is_on());
    assert!(car.main_reservoir_pressure() > 0.7);
    assert!(car.signals().motor_compressor.air_flow > 0.0);
}

#[test]
fn compressor_idle_above_cutout() {
    let mut car = vehicle_with(VehicleConfig::default());
    car.initialize_braking(0.5, 0.5, 0.95);
    car.process_control_input(
        &ControlSnapshot::new()
            .with(Control::PhaseSplitterSwitch)
            .with(Control::CompressorSwitch)
            .with_shift(),
    );
    run(&mut car, 0.0, 1000);
    assert!(!car.devices().pressure_regulator.is_on());
    assert_eq!(car.signals().motor_compressor.air_flow, 0.0);
    assert!(car.main_reservoir_pressure() <= 0.95);
}

fn fan_speed_after(coupling: CouplingMode, ticks: usize) -> f64 {
    let mut config = VehicleConfig::default();
    config.simulation.coupling = coupling;
    let mut car = vehicle_with(config);
    car.initialize_braking(0.5, 0.5, 0.9);
    car.process_control_input(
        &ControlSnapshot::new()
            .with(Control::PhaseSplitterSwitch)
            .with(Control::MotorFanSwitch)
            .with_shift(),
    );
    run(&mut car, 0.0, ticks);
    car.devices().motor_fans[0].relative_speed()
}

#[test]
fn lagged_coupling_delays_reads_one_tick() {
    assert!(fan_speed_after(CouplingMode::Sequential, 1) > 0.0);
    assert_eq!(fan_speed_after(CouplingMode::Lagged, 1), 0.0);
    assert!(fan_speed_after(CouplingMode::Lagged, 2) > 0.0);
}

#[test]
fn debug_line_reports_state() {
    let mut car = charged();
    car.set_railway_coord(1234.5);
    car.step(0.0, DT);
    let line = car.debug_message();
    assert!(line.starts_with("MR:0.90"));
    assert!(line.contains("X:1234.5"));
    assert!(line.ends_with("|| 450"));
}
