//! Regime coverage and continuity of the piecewise spectra.

use afterglow_common::{Coord, Ism, Microphysics, TopHatJet};
use blast_wave::solve_forward_shock;
use synchrotron::breaks::{gamma_n_peak, nu_e_peak};
use synchrotron::{
    gen_syn_electrons, gen_syn_photons, InverseCompton, Regime, ShockCell, SynElectrons,
    SynPhotons,
};
use test_utils::fixtures::{canonical, regimes};
use test_utils::{assert_rel_eq, random_breaks, seeded_rng};

fn photons(breaks: (f64, f64, f64), p: f64) -> SynPhotons {
    let (a, c, m) = breaks;
    let regime = Regime::classify(a, c, m).unwrap();
    SynPhotons {
        nu_m: m,
        nu_c: c,
        nu_a: a,
        nu_max: 1e9,
        nu_e_peak: nu_e_peak(regime, a, c, m),
        i_nu_peak: 1.0,
        p,
        regime,
    }
}

fn electrons(breaks: (f64, f64, f64), p: f64) -> SynElectrons {
    let (a, c, m) = breaks;
    SynElectrons {
        gamma_m: m,
        gamma_c: c,
        gamma_a: a,
        gamma_max: 1e9,
        gamma_n_peak: gamma_n_peak(a, c, m),
        p,
        n_tot: 1.0,
        column: 1.0,
        i_nu_peak: 1.0,
        y: 0.0,
        regime: Regime::classify(a, c, m).unwrap(),
    }
}

/// Internal boundaries of the electron shape; the support edge where the
/// shape drops to zero is not one of them.
fn electron_boundaries(e: &SynElectrons) -> Vec<f64> {
    let (a, c, m) = (e.gamma_a, e.gamma_c, e.gamma_m);
    match e.regime {
        Regime::Amc | Regime::Mac => vec![c],
        Regime::Acm => vec![m],
        Regime::Cam => vec![a, m],
        Regime::Mca | Regime::Cma => vec![a],
    }
}

const EDGE: f64 = 1e-10;

#[test]
fn test_random_breaks_always_classify() {
    let mut rng = seeded_rng(42);
    let mut seen = std::collections::HashSet::new();
    for _ in 0..10_000 {
        let (a, c, m) = random_breaks(&mut rng);
        let regime = Regime::classify(a, c, m).expect("ordered breaks classify");
        seen.insert(regime);
    }
    assert_eq!(seen.len(), 6);
}

#[test]
fn test_fixture_regimes_in_order() {
    for (breaks, expected) in regimes::ALL.iter().zip(Regime::ALL) {
        let (a, c, m) = *breaks;
        assert_eq!(Regime::classify(a, c, m), Some(expected));
    }
}

#[test]
fn test_photon_spectrum_continuous_at_breaks() {
    let mut rng = seeded_rng(7);
    for p in [1.8, 2.0, 2.3, 3.0] {
        for _ in 0..500 {
            let ph = photons(random_breaks(&mut rng), p);
            for nu in [ph.nu_a, ph.nu_c, ph.nu_m] {
                let below = ph.spectrum(nu * (1.0 - EDGE));
                let above = ph.spectrum(nu * (1.0 + EDGE));
                assert_rel_eq!(below, above, 1e-6);
            }
        }
    }
}

#[test]
fn test_electron_spectrum_continuous_at_internal_breaks() {
    let mut rng = seeded_rng(11);
    for p in [1.8, 2.0, 2.3, 3.0] {
        for _ in 0..500 {
            let e = electrons(random_breaks(&mut rng), p);
            for g in electron_boundaries(&e) {
                let below = e.spectrum(g * (1.0 - EDGE));
                let above = e.spectrum(g * (1.0 + EDGE));
                assert_rel_eq!(below, above, 1e-6);
            }
        }
    }
}

#[test]
fn test_high_frequency_slope_every_regime() {
    for breaks in regimes::ALL {
        let mut ph = photons(breaks, 2.3);
        ph.nu_max = f64::INFINITY;
        let (x1, x2) = (1e7, 1e8);
        let slope = (ph.spectrum(x2) / ph.spectrum(x1)).ln() / (x2 / x1).ln();
        assert!((slope + 1.15).abs() < 1e-9, "{}: {}", ph.regime, slope);
    }
}

#[test]
fn test_flat_index_cell() {
    let micro = Microphysics {
        p: 2.0,
        ..Microphysics::default()
    };
    let cell = ShockCell {
        gamma: 30.0,
        b: 0.5,
        n_p: 100.0,
        t_com: 1e6,
        width: 1e15,
    };
    let e = SynElectrons::from_cell(&cell, &micro, InverseCompton::None).unwrap();
    assert!(e.gamma_m > 1.0 && e.gamma_m < e.gamma_max);
}

#[test]
fn test_grids_from_forward_shock() {
    let coord = Coord::uniform(1e15, 1e19, 0.2, 32, 4, 1).unwrap();
    let jet = TopHatJet::new(
        canonical::THETA_C,
        canonical::E_ISO,
        canonical::GAMMA0,
        canonical::DURATION,
    )
    .unwrap();
    let ism = Ism::new(canonical::N_ISM).unwrap();
    let micro = Microphysics::default();
    let shock = solve_forward_shock(&coord, &jet, &ism, &micro).unwrap();

    let e = gen_syn_electrons(&shock, &micro, InverseCompton::None).unwrap();
    let ph = gen_syn_photons(&e, &shock).unwrap();
    assert_eq!(e.shape(), shock.shape());
    assert_eq!(ph.shape(), shock.shape());

    // Inside the core every cell radiates; outside nothing does.
    assert!(ph.row(0).iter().all(|x| x.i_nu_peak > 0.0));
    assert!(ph.row(3).iter().all(|x| x.i_nu_peak == 0.0));
    // The injection frequency falls as the shell decelerates.
    let row = ph.row(0);
    assert!(row[row.len() - 1].nu_m < row[0].nu_m);

    // Rows are assembled in polar order whatever order they were computed in.
    let (n_theta, n_r) = shock.shape();
    for j in 0..n_theta {
        for k in 0..n_r {
            assert_eq!(ph[(j, k)], SynPhotons::from_electrons(&e[(j, k)], shock.b[(j, k)]));
        }
    }

    let narrow = Coord::uniform(1e15, 1e19, 0.2, 32, 2, 1).unwrap();
    let other = solve_forward_shock(&narrow, &jet, &ism, &micro).unwrap();
    assert!(gen_syn_photons(&e, &other).is_err());
}
