use crate::aircraft::{FlightPhase, Status};
use crate::simulation::simulation::Simulation;
use crate::simulation::tests::utils::{add_aircraft, arb_track, config};
use proptest::prelude::*;
use proptest::proptest;

proptest! {
    #[test]
    fn test_tick_invariants(
        tracks in prop::collection::vec(arb_track(), 1..6),
        step in 1..120u64,
        seed in any::<u64>(),
    ) {
        let mut roster = vec![];
        for (i, waypoints) in tracks.into_iter().enumerate() {
            add_aircraft(&mut roster, &format!("ac{}", i), waypoints);
        }
        let mut cfg = config(1000, step);
        cfg.seed = Some(seed);
        let mut sim = Simulation::new(cfg, roster).unwrap();

        let mut cursors = vec![0; sim.aircraft().len()];
        while let Some(report) = sim.tick() {
            let holding = report.weather.as_ref().unwrap().requires_holding();
            for r in &report.aircraft {
                let inside = r.distance_km.is_some_and(|d| d <= 50.0);
                prop_assert_eq!(inside, report.in_area.contains(&r.id));
                match r.status {
                    Status::Holding => prop_assert!(inside && holding),
                    Status::ClearedToLand => prop_assert!(inside && !holding),
                    Status::InFlight => prop_assert!(!inside),
                    Status::Scheduled => prop_assert!(false, "scheduled after first tick"),
                    Status::Landed | Status::NoTrack => {}
                }
            }
            for (i, ac) in sim.aircraft().iter().enumerate() {
                prop_assert!(ac.cursor() >= cursors[i]);
                prop_assert!(ac.cursor() <= ac.track().len());
                cursors[i] = ac.cursor();
                if ac.track().is_empty() {
                    prop_assert_eq!(FlightPhase::NoTrack, ac.phase());
                }
            }
        }
        prop_assert!(sim.clock() >= sim.config().end);
    }
}
