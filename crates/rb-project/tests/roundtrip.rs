use rb_project::*;
use std::path::PathBuf;

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("rb_project_{}_{name}", std::process::id()))
}

#[test]
fn roundtrip_yaml_default_config() {
    let config = VehicleConfig::default();
    let path = temp_path("default.yaml");

    save_yaml(&path, &config).unwrap();
    let loaded = load_yaml(&path).unwrap();

    assert_eq!(config, loaded);
}

#[test]
fn roundtrip_json_tuned_config() {
    let mut config = VehicleConfig::default();
    config.vehicle.f_max = 480.0;
    config.simulation.coupling = CouplingMode::Lagged;
    config.compressor.q_nom = 0.006;
    config.brakes_init = Some(BrakesState {
        charging_pressure: Some(0.5),
        brake_lock_device: Some(1),
        ..BrakesState::default()
    });
    let path = temp_path("tuned.json");

    save_json(&path, &config).unwrap();
    let loaded = load_json(&path).unwrap();

    assert_eq!(loaded.vehicle.f_max, 480.0);
    assert_eq!(loaded.simulation.coupling, CouplingMode::Lagged);
    assert!((loaded.compressor.q_nom - 0.006).abs() < 1e-15);
    assert_eq!(loaded.brakes_init, config.brakes_init);
    assert_eq!(loaded.brake_crane.positions, config.brake_crane.positions);
}

#[test]
fn invalid_config_is_not_saved() {
    let mut config = VehicleConfig::default();
    config.vehicle.v_nom = 0.0;
    let path = temp_path("invalid.yaml");
    assert!(matches!(
        save_yaml(&path, &config),
        Err(ProjectError::Validation(_))
    ));
}

#[test]
fn roundtrip_brakes_state() {
    let state = BrakesState {
        main_reservoir_pressure: Some(0.85),
        main_reservoir_flow: Some(0.0001),
        charging_pressure: Some(0.5),
        train_crane_pos: Some(1),
        loco_crane_pos: Some(0),
        combine_crane_pos: Some(-1),
        brake_lock_device: Some(1),
    };
    let path = temp_path("brakes-init.yaml");

    save_brakes_state(&path, &state).unwrap();
    let loaded = load_brakes_state(&path).unwrap();

    assert_eq!(loaded.main_reservoir_pressure, Some(0.85));
    assert_eq!(loaded.charging_pressure, Some(0.5));
    assert_eq!(loaded.train_crane_pos, Some(1));
    assert_eq!(loaded.loco_crane_pos, Some(0));
    assert_eq!(state, loaded);

    let doc = ConfigDocument::load(&path).unwrap();
    assert_eq!(doc.get_f64("BrakesState", "MainReservoirPressure"), Some(0.85));
    assert_eq!(doc.get_i64("BrakesState", "BrakeLockDevice"), Some(1));
}

#[test]
fn roundtrip_config_dirs() {
    let root = temp_path("dirs");
    let config_dir = root.join("er2t");
    let modules_dir = root.join("modules");

    let mut config = VehicleConfig::default();
    config.vehicle.f_min = 300.0;
    config.loco_crane.p_max = 0.4;
    config.trolley.slack_pressure = 0.04;
    config.regulator.p_on = 0.7;
    config.brakes_init = Some(BrakesState {
        train_crane_pos: Some(1),
        ..BrakesState::default()
    });

    config.write_dirs(&config_dir, &modules_dir).unwrap();
    let loaded = VehicleConfig::from_dirs(&config_dir, &modules_dir);

    assert_eq!(config, loaded);
}

#[test]
fn missing_dirs_give_defaults() {
    let root = temp_path("nowhere");
    let loaded = VehicleConfig::from_dirs(&root.join("cfg"), &root.join("modules"));
    assert_eq!(loaded, VehicleConfig::default());
}

#[test]
fn malformed_device_file_keeps_defaults() {
    let root = temp_path("malformed");
    let config_dir = root.join("cfg");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(config_dir.join("vehicle.yaml"), "Vehicle:\n  F_max: [1, 2\n").unwrap();
    std::fs::write(
        config_dir.join("motor-compressor.yaml"),
        "Device:\n  q_nom: fast\n",
    )
    .unwrap();

    let loaded = VehicleConfig::from_dirs(&config_dir, &root.join("modules"));
    assert_eq!(loaded.vehicle.f_max, 450.0);
    assert_eq!(loaded.compressor, VehicleConfig::default().compressor);
}

#[test]
fn out_of_range_brake_state_is_dropped() {
    let root = temp_path("bad_brakes");
    let config_dir = root.join("cfg");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(
        config_dir.join("brakes-init.yaml"),
        "BrakesState:\n  TrainCranePos: 9\n  ChargingPressure: 0.5\n",
    )
    .unwrap();
    std::fs::write(config_dir.join("vehicle.yaml"), "Vehicle:\n  F_max: 400.0\n").unwrap();

    let loaded = VehicleConfig::from_dirs(&config_dir, &root.join("modules"));
    assert_eq!(loaded.brakes_init, None);
    assert_eq!(loaded.vehicle.f_max, 400.0);
    validate_config(&loaded).unwrap();

    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn unreadable_vehicle_section_reports_error() {
    let path = temp_path("does-not-exist.yaml");
    assert!(matches!(
        load_vehicle_section(&path),
        Err(ProjectError::Io(_))
    ));
}
