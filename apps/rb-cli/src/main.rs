use clap::{Parser, Subcommand, ValueEnum};
use rb_components::SoundEvent;
use rb_controls::{Control, ControlSnapshot};
use rb_core::units::{kmh_to_mps, mps_to_kmh};
use rb_project::{CouplingMode, VehicleConfig};
use rb_sim::{Er2tVehicle, SimResult, VehicleModel};
use std::path::{Path, PathBuf};
use std::sync::mpsc;

#[derive(Parser)]
#[command(name = "rb-cli")]
#[command(about = "RailBrake CLI - ER2T motor car brake and auxiliary machinery model", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scripted service-brake scenario
    Run {
        /// Vehicle config directory (vehicle.yaml, brakes-init.yaml, ...)
        config_dir: PathBuf,
        /// Shared device modules directory (krm395.yaml, vr242.yaml, ...)
        modules_dir: PathBuf,
        /// Time step in seconds
        #[arg(long, default_value_t = 0.01)]
        dt: f64,
        /// End time in seconds
        #[arg(long, default_value_t = 60.0)]
        t_end: f64,
        /// Initial speed in km/h
        #[arg(long, default_value_t = 60.0)]
        speed: f64,
        /// Time the brake pipe is reduced, in seconds
        #[arg(long, default_value_t = 10.0)]
        brake_at: f64,
        /// Brake-pipe reduction in MPa
        #[arg(long, default_value_t = 0.1)]
        reduction: f64,
        /// Print the status line every this many seconds
        #[arg(long, default_value_t = 1.0)]
        print_every: f64,
        /// Override the coupling mode from the config
        #[arg(long, value_enum)]
        coupling: Option<Coupling>,
        /// Log sound events
        #[arg(long)]
        sounds: bool,
    },
    /// Write the default configuration files
    WriteDefaults {
        config_dir: PathBuf,
        modules_dir: PathBuf,
    },
    /// Validate a whole-vehicle YAML or JSON file
    Validate {
        /// Path to the config file
        path: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Coupling {
    Sequential,
    Lagged,
}

impl From<Coupling> for CouplingMode {
    fn from(c: Coupling) -> Self {
        match c {
            Coupling::Sequential => CouplingMode::Sequential,
            Coupling::Lagged => CouplingMode::Lagged,
        }
    }
}

struct Scenario {
    dt: f64,
    t_end: f64,
    speed_kmh: f64,
    brake_at: f64,
    reduction: f64,
    print_every: f64,
    coupling: Option<Coupling>,
    sounds: bool,
}

const CHARGE_PRESSURE: f64 = 0.5;
const FEED_LINE_PRESSURE: f64 = 0.9;

fn main() -> SimResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config_dir,
            modules_dir,
            dt,
            t_end,
            speed,
            brake_at,
            reduction,
            print_every,
            coupling,
            sounds,
        } => cmd_run(
            &config_dir,
            &modules_dir,
            &Scenario {
                dt,
                t_end,
                speed_kmh: speed,
                brake_at,
                reduction,
                print_every,
                coupling,
                sounds,
            },
        ),
        Commands::WriteDefaults {
            config_dir,
            modules_dir,
        } => cmd_write_defaults(&config_dir, &modules_dir),
        Commands::Validate { path } => cmd_validate(&path),
    }
}

fn cmd_run(config_dir: &Path, modules_dir: &Path, scenario: &Scenario) -> SimResult<()> {
    if scenario.dt.is_nan() || scenario.dt <= 0.0 || scenario.t_end < 0.0 {
        return Err(rb_sim::SimError::InvalidArg {
            what: "dt must be positive and t_end non-negative",
        });
    }

    let mut config = VehicleConfig::from_dirs(config_dir, modules_dir);
    if let Some(coupling) = scenario.coupling {
        config.simulation.coupling = coupling.into();
    }

    let (tx, rx) = mpsc::channel::<SoundEvent>();
    let mut car = Er2tVehicle::new(config, tx)?;
    car.initialize_braking(CHARGE_PRESSURE, CHARGE_PRESSURE, FEED_LINE_PRESSURE);
    if let Err(e) = car.load_configuration(&config_dir.join("vehicle.yaml")) {
        println!("Using default traction parameters ({e})");
    }

    // Driver starts the machines, then coasts.
    car.process_control_input(
        &ControlSnapshot::new()
            .with(Control::PhaseSplitterSwitch)
            .with(Control::MotorFanSwitch)
            .with(Control::CompressorSwitch)
            .with_shift(),
    );
    car.process_control_input(&ControlSnapshot::new());

    let mut v = kmh_to_mps(scenario.speed_kmh);
    let mut x = 0.0;
    let mut p_tm = CHARGE_PRESSURE;
    let mut next_print = 0.0;
    let steps = (scenario.t_end / scenario.dt).round() as usize;

    println!(
        "Running {:.1} s at dt = {:.3} s, brake pipe -{:.2} MPa at t = {:.1} s",
        scenario.t_end, scenario.dt, scenario.reduction, scenario.brake_at
    );

    for i in 0..steps {
        let t = i as f64 * scenario.dt;
        if t >= scenario.brake_at {
            p_tm = CHARGE_PRESSURE - scenario.reduction;
        }

        car.set_velocity(v);
        car.set_railway_coord(x);
        car.set_brake_pipe_pressure(p_tm);
        car.step(t, scenario.dt);

        // Crude point-mass host: brake torque at the rail slows the car.
        let wheel_radius = car.config().vehicle.wheel_diameter / 2.0;
        let brake_force: f64 = car.brake_torques().iter().sum::<f64>() / wheel_radius;
        let mass = 60_000.0;
        v = (v - brake_force / mass * scenario.dt).max(0.0);
        x += v * scenario.dt;

        if scenario.sounds {
            for event in rx.try_iter() {
                tracing::info!(?event, "sound");
            }
        } else {
            rx.try_iter().for_each(drop);
        }

        if t >= next_print {
            println!("t={:7.2} {}", t, car.debug_message());
            next_print += scenario.print_every;
        }
    }

    let (bc1, bc2) = car.brake_cylinder_pressures();
    println!("✓ Finished: v = {:.1} km/h, BC = {:.3}/{:.3} MPa", mps_to_kmh(v), bc1, bc2);
    Ok(())
}

fn cmd_write_defaults(config_dir: &Path, modules_dir: &Path) -> SimResult<()> {
    VehicleConfig::default().write_dirs(config_dir, modules_dir)?;
    println!(
        "✓ Wrote defaults to {} and {}",
        config_dir.display(),
        modules_dir.display()
    );
    Ok(())
}

fn cmd_validate(path: &Path) -> SimResult<()> {
    println!("Validating config: {}", path.display());
    let is_json = path.extension().is_some_and(|ext| ext == "json");
    let config = if is_json {
        rb_project::load_json(path)?
    } else {
        rb_project::load_yaml(path)?
    };
    Er2tVehicle::new(config, rb_components::NullSink)?;
    println!("✓ Config is valid");
    Ok(())
}
