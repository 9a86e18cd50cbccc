//! Synchrotron spectra of shock-accelerated electrons.
//!
//! Every shock cell is reduced to four characteristic electron Lorentz
//! factors (injection `γ_m`, cooling `γ_c`, self-absorption `γ_a`, maximum
//! `γ_M`) and their photon frequencies. The ordering of `(γ_a, γ_c, γ_m)`
//! selects one of six [`Regime`]s, each with a closed-form broken power-law
//! shape for the electron number spectrum and the photon intensity.

pub mod breaks;
pub mod electrons;
pub mod error;
pub mod inverse_compton;
pub mod photons;
pub mod regime;

pub use breaks::{syn_gamma, syn_nu};
pub use electrons::{gen_syn_electrons, ShockCell, SynElectrons};
pub use error::{Result, SynchrotronError};
pub use inverse_compton::{thomson_y, InverseCompton};
pub use photons::{gen_syn_photons, SynPhotons};
pub use regime::Regime;
