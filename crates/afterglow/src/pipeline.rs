//! Stage drivers for one run.

use crate::config::{LightCurveMethod, PipelineConfig};
use crate::error::Result;
use afterglow_common::{boundary_to_center_log, logspace, Coord, Jet, MeshGrid};
use blast_wave::{solve_forward_shock, solve_shocks, ShockGrid};
use observer::{observe_many, ArrivalTimes, EmissionSource, Observer, ObserverParams};
use synchrotron::{gen_syn_electrons, gen_syn_photons, InverseCompton, SynElectrons, SynPhotons};
use tracing::info;

/// Shock grids of one run. Both shocks share `Γ` and the time grids.
#[derive(Debug, Clone)]
pub struct Dynamics {
    pub forward: ShockGrid,
    pub reverse: Option<ShockGrid>,
}

/// Electron and photon grids of one shock.
#[derive(Debug, Clone)]
pub struct Spectra {
    pub electrons: MeshGrid<SynElectrons>,
    pub photons: MeshGrid<SynPhotons>,
}

/// Observed flux densities at one frequency.
#[derive(Debug, Clone, PartialEq)]
pub struct LightCurve {
    /// Observed frequency, Hz.
    pub nu: f64,
    /// Observed times, s.
    pub t: Vec<f64>,
    /// Forward-shock flux density, erg s^-1 cm^-2 Hz^-1.
    pub forward: Vec<f64>,
    pub reverse: Option<Vec<f64>>,
}

/// Flux integrated over one frequency band.
#[derive(Debug, Clone, PartialEq)]
pub struct BandCurve {
    /// Band edges, Hz.
    pub nu_lo: f64,
    pub nu_hi: f64,
    pub t: Vec<f64>,
    /// Forward-shock flux, erg s^-1 cm^-2.
    pub forward: Vec<f64>,
    pub reverse: Option<Vec<f64>>,
}

/// Light curves seen from one of the further viewing angles.
#[derive(Debug, Clone)]
pub struct ViewCurves {
    pub params: ObserverParams,
    pub light_curves: Vec<LightCurve>,
}

#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub coord: Coord,
    pub dynamics: Dynamics,
    pub forward_spectra: Spectra,
    pub reverse_spectra: Option<Spectra>,
    pub observer: Observer,
    pub light_curves: Vec<LightCurve>,
    pub band_curves: Vec<BandCurve>,
    pub views: Vec<ViewCurves>,
}

/// Log-spaced sub-bands each band is split into before summing.
const BAND_SUBDIVISIONS: usize = 16;

/// Coordinate grid for the configured jet.
pub fn build_coord(config: &PipelineConfig, jet: &dyn Jet) -> Result<Coord> {
    Ok(config.grid.build(|theta| jet.gamma0(theta))?)
}

/// Solve the forward shock, and the reverse shock when enabled.
pub fn solve_dynamics(config: &PipelineConfig, coord: &Coord) -> Result<Dynamics> {
    let medium = config.medium.build()?;
    let jet = config.jet.build()?;
    if config.reverse_shock {
        let pair = solve_shocks(coord, jet.as_ref(), medium.as_ref(), &config.micro)?;
        Ok(Dynamics {
            forward: pair.forward,
            reverse: Some(pair.reverse),
        })
    } else {
        Ok(Dynamics {
            forward: solve_forward_shock(coord, jet.as_ref(), medium.as_ref(), &config.micro)?,
            reverse: None,
        })
    }
}

/// Electron and photon spectra of one shock grid.
pub fn compute_spectra(
    shock: &ShockGrid,
    config: &PipelineConfig,
    ic: InverseCompton,
) -> Result<Spectra> {
    let electrons = gen_syn_electrons(shock, &config.micro, ic)?;
    let photons = gen_syn_photons(&electrons, shock)?;
    Ok(Spectra { electrons, photons })
}

/// Light curves of every configured frequency for one observer.
pub fn compute_light_curves(
    config: &PipelineConfig,
    observer: &Observer,
    forward: &dyn EmissionSource,
    reverse: Option<&dyn EmissionSource>,
) -> Result<Vec<LightCurve>> {
    let lc = &config.light_curve;
    let (t, edges) = observed_times(config)?;

    let flux = |nu: f64, source: &dyn EmissionSource| -> Result<Vec<f64>> {
        Ok(match lc.method {
            LightCurveMethod::Interpolated => observer.light_curve(&t, nu, source),
            LightCurveMethod::Binned => observer.flux_binned(&edges, nu, source)?,
        })
    };

    lc.frequencies
        .iter()
        .map(|&nu| -> Result<LightCurve> {
            Ok(LightCurve {
                nu,
                t: t.clone(),
                forward: flux(nu, forward)?,
                reverse: reverse.map(|source| flux(nu, source)).transpose()?,
            })
        })
        .collect()
}

/// Observed times of the light curves and, for binned curves, the bin
/// edges around them.
fn observed_times(config: &PipelineConfig) -> Result<(Vec<f64>, Vec<f64>)> {
    let lc = &config.light_curve;
    let edges = logspace(lc.t_min, lc.t_max, lc.t_num + 1)?;
    let t = match lc.method {
        LightCurveMethod::Interpolated => logspace(lc.t_min, lc.t_max, lc.t_num)?,
        LightCurveMethod::Binned => boundary_to_center_log(&edges)?,
    };
    Ok((t, edges))
}

/// Band-integrated flux of every configured band for one observer.
pub fn compute_band_curves(
    config: &PipelineConfig,
    observer: &Observer,
    forward: &dyn EmissionSource,
    reverse: Option<&dyn EmissionSource>,
) -> Result<Vec<BandCurve>> {
    let (t, _) = observed_times(config)?;
    config
        .light_curve
        .bands
        .iter()
        .map(|&[nu_lo, nu_hi]| -> Result<BandCurve> {
            let bounds = logspace(nu_lo, nu_hi, BAND_SUBDIVISIONS + 1)?;
            Ok(BandCurve {
                nu_lo,
                nu_hi,
                t: t.clone(),
                forward: observer.band_flux(&t, &bounds, forward)?,
                reverse: reverse
                    .map(|source| observer.band_flux(&t, &bounds, source))
                    .transpose()?,
            })
        })
        .collect()
}

/// Run every stage for `config`.
pub fn run(config: &PipelineConfig) -> Result<PipelineOutput> {
    config.check()?;
    let jet = config.jet.build()?;
    let coord = build_coord(config, jet.as_ref())?;
    let (n_phi, n_theta, n_r) = coord.shape_3d();
    info!(
        phi = n_phi,
        theta = n_theta,
        r = n_r,
        reverse_shock = config.reverse_shock,
        "Starting afterglow run"
    );

    let dynamics = solve_dynamics(config, &coord)?;
    let crossed = dynamics
        .reverse
        .as_ref()
        .map(|r| r.crossing.iter().flatten().count());
    info!(crossed = ?crossed, "Dynamics complete");

    let forward_spectra = compute_spectra(&dynamics.forward, config, config.inverse_compton)?;
    let reverse_spectra = dynamics
        .reverse
        .as_ref()
        .map(|shock| compute_spectra(shock, config, config.inverse_compton))
        .transpose()?;
    info!("Spectra complete");

    let times = if config.light_curve.integrate_arrival {
        ArrivalTimes::Integrated
    } else {
        ArrivalTimes::Engine(&dynamics.forward.t_eng)
    };
    let observer = Observer::observe(&coord, &dynamics.forward.gamma, times, config.observer)?;

    let forward_source: &dyn EmissionSource = &forward_spectra.photons;
    let reverse_source = reverse_spectra
        .as_ref()
        .map(|s| &s.photons as &dyn EmissionSource);
    let light_curves = compute_light_curves(config, &observer, forward_source, reverse_source)?;
    let band_curves = compute_band_curves(config, &observer, forward_source, reverse_source)?;
    info!(
        frequencies = light_curves.len(),
        bands = band_curves.len(),
        theta_obs = config.observer.theta_obs,
        "Light curves complete"
    );

    let view_params: Vec<ObserverParams> = config
        .light_curve
        .viewing_angles
        .iter()
        .map(|&theta_obs| ObserverParams {
            theta_obs,
            ..config.observer
        })
        .collect();
    let views = observe_many(&coord, &dynamics.forward.gamma, times, &view_params)?
        .iter()
        .map(|view| -> Result<ViewCurves> {
            Ok(ViewCurves {
                params: view.params,
                light_curves: compute_light_curves(config, view, forward_source, reverse_source)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    if !views.is_empty() {
        info!(views = views.len(), "Further viewing angles complete");
    }

    Ok(PipelineOutput {
        coord,
        dynamics,
        forward_spectra,
        reverse_spectra,
        observer,
        light_curves,
        band_curves,
        views,
    })
}
