//! Comoving emissivity seen by the projection.

use afterglow_common::MeshGrid;
use synchrotron::SynPhotons;

/// Comoving specific intensity of each `(theta, r)` cell.
pub trait EmissionSource: Sync {
    fn intensity(&self, theta: usize, r: usize, nu_comoving: f64) -> f64;
}

impl EmissionSource for MeshGrid<SynPhotons> {
    fn intensity(&self, theta: usize, r: usize, nu_comoving: f64) -> f64 {
        self[(theta, r)].i_nu(nu_comoving)
    }
}

/// Flat spectrum of the same intensity in every cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantEmission(pub f64);

impl EmissionSource for ConstantEmission {
    fn intensity(&self, _theta: usize, _r: usize, _nu_comoving: f64) -> f64 {
        self.0
    }
}
