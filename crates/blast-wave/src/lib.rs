//! Shock dynamics of a relativistic blast wave.
//!
//! Each polar sector of the coordinate grid is integrated independently over
//! radius. The forward-only engine evolves `{Γ, u, t_eng, t_com}`; the dual
//! engine adds the comoving widths of the reverse- and forward-shocked
//! regions and tracks the reverse shock until it crosses the ejecta shell.

pub mod eqn;
pub mod error;
pub mod jump;
pub mod shock;
pub mod solver;

pub use eqn::{BlastWaveEqn, ForwardShockEqn};
pub use error::{DynamicsError, Result};
pub use jump::{adiabatic_index, co_moving_b, e_thermal_down, n_down, sound_speed};
pub use shock::{CrossingLatch, ShockGrid, ShockPair};
pub use solver::{deceleration_radius, solve_forward_shock, solve_shocks};
