//! Projection tests over synthetic and solved shock grids.

use afterglow_common::con::C;
use afterglow_common::{create_grid, Coord, Ism, MeshGrid, Microphysics, TopHatJet};
use blast_wave::{solve_forward_shock, ShockGrid};
use observer::{observe_many, ArrivalTimes, ConstantEmission, Observer, ObserverError, ObserverParams};
use std::f64::consts::PI;
use test_utils::assert_rel_eq;
use test_utils::fixtures::canonical;

fn light_travel(coord: &Coord) -> MeshGrid<f64> {
    let (n_theta, _) = coord.shape();
    MeshGrid::from_rows(vec![coord.r.iter().map(|r| r / C).collect(); n_theta]).unwrap()
}

fn canonical_shock(coord: &Coord) -> ShockGrid {
    let jet = TopHatJet::new(
        canonical::THETA_C,
        canonical::E_ISO,
        canonical::GAMMA0,
        canonical::DURATION,
    )
    .unwrap();
    let ism = Ism::new(canonical::N_ISM).unwrap();
    solve_forward_shock(coord, &jet, &ism, &Microphysics::default()).unwrap()
}

#[test]
fn test_static_on_axis_shell() {
    let coord = Coord::uniform(1e15, 1e18, 1e-6, 16, 1, 1).unwrap();
    let gamma = create_grid(1, 16, 1.0);
    let t_eng = light_travel(&coord);
    let obs = Observer::observe(
        &coord,
        &gamma,
        ArrivalTimes::Engine(&t_eng),
        ObserverParams::default(),
    )
    .unwrap();

    assert!(obs.doppler.as_slice().iter().all(|&d| d == 1.0));
    for (k, &r) in coord.r.iter().enumerate() {
        assert_rel_eq!(obs.t_obs[(0, 0, k)], r / C, 1e-10);
    }
}

#[test]
fn test_constant_emission_normalization() {
    let coord = Coord::uniform(1e15, 1e16, 0.5, 8, 4, 2).unwrap();
    let (n_theta, n_r) = coord.shape();
    let gamma = create_grid(n_theta, n_r, 1.0 + 1e-12);
    let t_eng = light_travel(&coord);
    let params = ObserverParams::new(0.0, 1e27, 0.0);
    let obs = Observer::observe(&coord, &gamma, ArrivalTimes::Engine(&t_eng), params).unwrap();

    let intensity = 3.0;
    let t_max = obs.t_obs.max();
    let bin = [0.0, 2.0 * t_max];
    let flux = obs.flux_binned(&bin, 1e9, &ConstantEmission(intensity)).unwrap();

    let solid_angle = 2.0 * PI * (1.0 - 0.5f64.cos());
    let r2: f64 = coord.r.iter().map(|r| r * r).sum();
    let expected = solid_angle * intensity * r2 / (4.0 * PI * 1e27 * 1e27) / (2.0 * t_max);
    assert_rel_eq!(flux[0], expected, 1e-4);
}

#[test]
fn test_rest_cells_contribute_nothing() {
    let coord = Coord::uniform(1e15, 1e16, 0.5, 8, 2, 1).unwrap();
    let gamma = create_grid(2, 8, 1.0);
    let t_eng = light_travel(&coord);
    let obs = Observer::observe(
        &coord,
        &gamma,
        ArrivalTimes::Engine(&t_eng),
        ObserverParams::default(),
    )
    .unwrap();
    let flux = obs.flux_binned(&[0.0, 1e10], 1e9, &ConstantEmission(1.0)).unwrap();
    assert_eq!(flux, vec![0.0]);
}

#[test]
fn test_arrival_paths_agree() {
    let coord = Coord::uniform(1e15, 1e19, 0.2, 128, 4, 1).unwrap();
    let shock = canonical_shock(&coord);
    for theta_obs in [0.0, 0.05] {
        let params = ObserverParams::new(theta_obs, 1e28, 0.5);
        let algebraic =
            Observer::observe(&coord, &shock.gamma, ArrivalTimes::Engine(&shock.t_eng), params)
                .unwrap();
        let integrated =
            Observer::observe(&coord, &shock.gamma, ArrivalTimes::Integrated, params).unwrap();

        for (&a, &b) in algebraic.t_obs.as_slice().iter().zip(integrated.t_obs.as_slice()) {
            if a.is_infinite() {
                assert!(b.is_infinite());
            } else {
                assert_rel_eq!(a, b, 5e-3);
            }
        }
    }
}

#[test]
fn test_eat_surface_is_complete_and_sorted() {
    let coord = Coord::uniform(1e15, 1e19, 0.2, 32, 4, 3).unwrap();
    let shock = canonical_shock(&coord);
    let obs = Observer::observe(
        &coord,
        &shock.gamma,
        ArrivalTimes::Engine(&shock.t_eng),
        ObserverParams::new(0.02, 1e28, 0.0),
    )
    .unwrap();

    let eat = obs.eat_surface();
    assert_eq!(eat.len(), 3 * 4 * 32);
    assert!(eat.points().windows(2).all(|w| w[0].t_obs <= w[1].t_obs));
    // Sectors outside the core sort to the end with infinite times.
    let infinite = eat.points().iter().filter(|p| p.t_obs.is_infinite()).count();
    assert_eq!(infinite, 3 * 2 * 32);
}

#[test]
fn test_light_curve_and_band() {
    let coord = Coord::uniform(1e15, 1e19, 0.2, 64, 4, 1).unwrap();
    let shock = canonical_shock(&coord);
    let obs = Observer::observe(
        &coord,
        &shock.gamma,
        ArrivalTimes::Engine(&shock.t_eng),
        ObserverParams::default(),
    )
    .unwrap();

    let source = ConstantEmission(1.0);
    let t = [1e2, 1e4, 1e6];
    let lc = obs.light_curve(&t, 1e14, &source);
    assert!(lc.iter().all(|f| f.is_finite() && *f > 0.0));

    // A narrow band integrates to flux times width.
    let band = obs.band_flux(&t, &[1e14, 1.001e14], &source).unwrap();
    let center = obs.light_curve(&t, (1e14f64 * 1.001e14).sqrt(), &source);
    for (b, f) in band.iter().zip(center) {
        assert_rel_eq!(*b, f * 0.001e14, 1e-9);
    }
}

#[test]
fn test_many_viewing_angles() {
    let coord = Coord::uniform(1e15, 1e19, 0.2, 32, 4, 1).unwrap();
    let shock = canonical_shock(&coord);
    let params: Vec<_> = [0.0, 0.1, 0.3]
        .iter()
        .map(|&theta| ObserverParams::new(theta, 1e28, 0.0))
        .collect();
    let observers =
        observe_many(&coord, &shock.gamma, ArrivalTimes::Engine(&shock.t_eng), &params).unwrap();
    assert_eq!(observers.len(), 3);
    for (o, p) in observers.iter().zip(&params) {
        assert_eq!(o.params, *p);
    }
}

#[test]
fn test_rejects_bad_input() {
    let coord = Coord::uniform(1e15, 1e16, 0.5, 8, 2, 1).unwrap();
    let gamma = create_grid(2, 8, 2.0);
    let t_eng = light_travel(&coord);
    let obs = Observer::observe(
        &coord,
        &gamma,
        ArrivalTimes::Engine(&t_eng),
        ObserverParams::default(),
    )
    .unwrap();
    assert!(matches!(
        obs.flux_binned(&[1.0, 1.0], 1e9, &ConstantEmission(1.0)),
        Err(ObserverError::InvalidBins)
    ));

    let wrong = create_grid(3, 8, 2.0);
    assert!(Observer::observe(&coord, &wrong, ArrivalTimes::Integrated, ObserverParams::default())
        .is_err());
    assert!(matches!(
        Observer::observe(
            &coord,
            &gamma,
            ArrivalTimes::Integrated,
            ObserverParams::new(-1.0, 1e28, 0.0)
        ),
        Err(ObserverError::InvalidParams(_))
    ));
}
