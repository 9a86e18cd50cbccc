//! Full runs of the canonical scenario.

use afterglow::{run, GridConfig, LightCurveConfig, LightCurveMethod, PipelineConfig};
use blast_wave::deceleration_radius;
use std::io::Write;
use synchrotron::{InverseCompton, Regime};
use test_utils::{assert_log_slope, assert_rel_eq, canonical};

fn single_sector() -> PipelineConfig {
    let r_dec = deceleration_radius(canonical::E_ISO, canonical::N_ISM, canonical::GAMMA0);
    PipelineConfig {
        grid: GridConfig {
            r_min: r_dec / 100.0,
            r_max: r_dec * 100.0,
            theta_max: 0.05,
            r_num: 160,
            theta_num: 1,
            phi_num: 1,
            adaptive_theta: false,
        },
        light_curve: LightCurveConfig {
            t_min: 1e3,
            t_max: 1e7,
            t_num: 16,
            frequencies: vec![1e9, 1e17],
            ..LightCurveConfig::default()
        },
        ..PipelineConfig::default()
    }
}

#[test]
fn test_canonical_run() {
    let config = single_sector();
    let out = run(&config).unwrap();

    let gamma = out.dynamics.forward.gamma.row(0);
    assert_rel_eq!(gamma[0], canonical::GAMMA0, 0.01);
    let first = gamma.iter().position(|&g| g < 30.0).unwrap();
    let last = gamma.iter().rposition(|&g| g > 10.0).unwrap();
    assert_log_slope!(
        (out.coord.r[first], gamma[first]),
        (out.coord.r[last], gamma[last]),
        -1.7..=-1.3
    );

    for e in out.forward_spectra.electrons.as_slice() {
        assert_eq!(Regime::classify(e.gamma_a, e.gamma_c, e.gamma_m), Some(e.regime));
    }

    assert_eq!(out.light_curves.len(), 2);
    for lc in &out.light_curves {
        assert_eq!(lc.t.len(), 16);
        assert!(lc.reverse.is_none());
        assert!(lc.forward.iter().all(|f| f.is_finite() && *f > 0.0), "{:?}", lc);
    }
    // Late-time decline of the optically thin X-ray afterglow.
    let x_ray = &out.light_curves[1].forward;
    assert!(x_ray[15] < x_ray[8]);
}

#[test]
fn test_reverse_shock_run() {
    let config = PipelineConfig {
        reverse_shock: true,
        ..single_sector()
    };
    let out = run(&config).unwrap();

    let reverse = out.dynamics.reverse.as_ref().unwrap();
    assert_eq!(reverse.gamma, out.dynamics.forward.gamma);
    assert!(reverse.crossing[0].is_some());
    assert!(out.reverse_spectra.is_some());
    assert!(out.light_curves.iter().all(|lc| lc.reverse.is_some()));
}

#[test]
fn test_binned_and_compton_run() {
    let mut config = single_sector();
    config.light_curve.method = LightCurveMethod::Binned;
    config.inverse_compton = InverseCompton::SelfConsistent;
    let out = run(&config).unwrap();

    assert!(out
        .forward_spectra
        .electrons
        .as_slice()
        .iter()
        .any(|e| e.y > 0.0));
    for lc in &out.light_curves {
        assert!(lc.forward.iter().all(|f| f.is_finite() && *f >= 0.0));
        assert!(lc.forward.iter().any(|f| *f > 0.0));
    }
}

#[test]
fn test_bands_and_further_viewing_angles() {
    let mut config = single_sector();
    config.light_curve.bands = vec![[1e17, 1e18]];
    config.light_curve.viewing_angles = vec![0.0, 0.02];
    let out = run(&config).unwrap();

    assert_eq!(out.band_curves.len(), 1);
    let band = &out.band_curves[0];
    assert_eq!(band.t, out.light_curves[0].t);
    assert!(band.forward.iter().all(|f| f.is_finite() && *f > 0.0));

    assert_eq!(out.views.len(), 2);
    assert_eq!(out.views[1].params.theta_obs, 0.02);
    // The on-axis view repeats the main observer.
    for (view, main) in out.views[0].light_curves.iter().zip(&out.light_curves) {
        for (&a, &b) in view.forward.iter().zip(&main.forward) {
            assert_rel_eq!(a, b, 1e-12);
        }
    }
}

#[test]
fn test_rejects_invalid_config() {
    let mut config = single_sector();
    config.micro.eps_e = 2.0;
    assert!(run(&config).is_err());
}

#[test]
fn test_yaml_round_trip() {
    let config = single_sector();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(config.to_yaml().unwrap().as_bytes()).unwrap();
    let loaded = PipelineConfig::from_yaml_file(file.path()).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_shipped_config_loads() {
    let path = test_utils::config_file("canonical.yaml");
    let config = PipelineConfig::from_yaml_file(path).unwrap();
    assert!(config.validate().is_ok());
    assert_eq!(config.jet.gamma0, canonical::GAMMA0);
}
