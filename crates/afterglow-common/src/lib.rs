//! Common types and utilities shared across the afterglow crates.
//!
//! Everything here is leaf-level: physical constants, the coordinate grid,
//! dense numeric containers and the two functional collaborators (`Medium`
//! and `Jet`) that the shock engine treats as black boxes.

pub mod constants;
pub mod error;
pub mod grid;
pub mod jet;
pub mod medium;
pub mod mesh;

pub use constants as con;
pub use error::{AfterglowError, AfterglowResult};
pub use grid::{
    create_3d_grid, create_3d_grid_like, create_array, create_array_like, create_grid,
    create_grid_like, MeshGrid, MeshGrid3,
};
pub use jet::{GaussianJet, Jet, PowerLawJet, TopHatJet};
pub use medium::{Ism, Medium, Microphysics, Wind};
pub use mesh::{
    adaptive_theta_space, boundary_to_center, boundary_to_center_log, is_linear_scale,
    is_log_scale, linspace, logspace, Coord,
};
