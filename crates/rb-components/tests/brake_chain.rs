//! Cross-device tests: distributor through valve network to the trucks.

use rb_components::{
    AirDistributor, AirDistributorParams, Device, DistributorMode, PneumoRelay, PneumoRelayParams,
    PneumoSplitter, Reservoir, SplitterParams, SwitchingValve, SwitchingValveParams,
    TrolleyBrakeMech, TrolleyBrakeMechParams,
};

const DT: f64 = 0.01;

struct Chain {
    supply: Reservoir,
    vr: AirDistributor,
    zpk: SwitchingValve,
    tee: PneumoSplitter,
    relay: PneumoRelay,
    front: TrolleyBrakeMech,
    rear: TrolleyBrakeMech,
}

impl Chain {
    fn charged(p_tm: f64) -> Self {
        let mut supply = Reservoir::new("supply-reservoir", 0.078).unwrap();
        supply.set_y(0, p_tm);
        let mut vr = AirDistributor::new(AirDistributorParams::default()).unwrap();
        vr.init(p_tm);
        Self {
            supply,
            vr,
            zpk: SwitchingValve::new(SwitchingValveParams::default()).unwrap(),
            tee: PneumoSplitter::new(SplitterParams::default()).unwrap(),
            relay: PneumoRelay::new(PneumoRelayParams::default()).unwrap(),
            front: TrolleyBrakeMech::new("front", TrolleyBrakeMechParams::default()).unwrap(),
            rear: TrolleyBrakeMech::new("rear", TrolleyBrakeMechParams::default()).unwrap(),
        }
    }

    /// Same order as the vehicle: valve network, trucks, then distributor.
    fn step(&mut self, t: f64, p_tm: f64, p_main: f64, v: f64) {
        self.zpk.set_input_flow1(self.vr.brake_cylinder_air_flow());
        self.zpk.set_input_flow2(0.0);
        self.zpk.set_output_pressure(self.tee.p_in());
        self.zpk.step(t, DT);

        self.tee.set_q_in(self.zpk.output_flow());
        self.tee.set_p_out1(self.relay.work_pressure());
        self.tee.set_p_out2(self.rear.brake_cylinder_pressure());
        self.tee.step(t, DT);

        self.relay.set_pipeline_pressure(p_main);
        self.relay.set_work_air_flow(self.tee.q_out1());
        self.relay.set_brake_cyl_pressure(self.front.brake_cylinder_pressure());
        self.relay.step(t, DT);

        self.front.set_air_flow(self.relay.brake_cyl_air_flow());
        self.front.set_velocity(v);
        self.front.step(t, DT);
        self.rear.set_air_flow(self.tee.q_out2());
        self.rear.set_velocity(v);
        self.rear.step(t, DT);

        self.supply.set_air_flow(self.vr.air_supply_flow());
        self.supply.step(t, DT);
        self.vr.set_brake_cylinder_pressure(self.zpk.pressure1());
        self.vr.set_air_supply_pressure(self.supply.pressure());
        self.vr.set_brake_pipe_pressure(p_tm);
        self.vr.step(t, DT);
    }
}

#[test]
fn brake_pipe_reduction_applies_both_trucks() {
    let mut chain = Chain::charged(0.5);
    let mut t = 0.0;
    for _ in 0..100 {
        chain.step(t, 0.5, 0.9, 10.0);
        t += DT;
    }
    assert_eq!(chain.vr.mode(), DistributorMode::Release);
    assert!(chain.zpk.pressure1().abs() < 1e-9);

    // Step down the brake pipe by 0.1 MPa at tick k.
    chain.step(t, 0.4, 0.9, 10.0);
    t += DT;
    assert_eq!(chain.vr.mode(), DistributorMode::Brake);
    let before = chain.zpk.pressure1();

    // Tick k+1: the valve sees the distributor's flow.
    chain.step(t, 0.4, 0.9, 10.0);
    t += DT;
    assert!(chain.zpk.pressure1() > before);

    for _ in 0..6000 {
        chain.step(t, 0.4, 0.9, 10.0);
        t += DT;
    }
    let target = 2.5 * 0.1;
    let front = chain.front.brake_cylinder_pressure();
    let rear = chain.rear.brake_cylinder_pressure();
    assert!((rear - target).abs() < 0.03, "rear = {rear}");
    assert!((front - target).abs() < 0.05, "front = {front}");
    assert!(chain.front.brake_torque() > 0.0);
    assert!(chain.rear.brake_torque() > 0.0);
}

#[test]
fn brake_pipe_recovery_releases() {
    let mut chain = Chain::charged(0.5);
    let mut t = 0.0;
    for _ in 0..3000 {
        chain.step(t, 0.4, 0.9, 0.0);
        t += DT;
    }
    assert!(chain.zpk.pressure1() > 0.1);

    for _ in 0..6000 {
        chain.step(t, 0.5, 0.9, 0.0);
        t += DT;
    }
    assert_eq!(chain.vr.mode(), DistributorMode::Release);
    assert!(chain.zpk.pressure1() < 0.02);
}
