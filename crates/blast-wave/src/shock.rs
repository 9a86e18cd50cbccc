//! Materialized shock grids and the reverse-shock crossing latch.

use afterglow_common::{create_array, AfterglowResult, MeshGrid};
use serde::{Deserialize, Serialize};

/// Per-cell downstream state of one shock over the `(theta, r)` grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShockGrid {
    /// Bulk Lorentz factor.
    pub gamma: MeshGrid<f64>,
    /// Internal energy of the sector as integrated by the ODE, erg.
    pub u: MeshGrid<f64>,
    /// Comoving magnetic field, G.
    pub b: MeshGrid<f64>,
    /// Downstream proton number density, cm^-3.
    pub n_p: MeshGrid<f64>,
    /// Downstream thermal energy density from the jump condition, erg cm^-3.
    pub e_th: MeshGrid<f64>,
    /// Comoving time since launch, s.
    pub t_com: MeshGrid<f64>,
    /// Engine-frame time, s.
    pub t_eng: MeshGrid<f64>,
    /// Comoving width of the shocked region, cm.
    pub width: MeshGrid<f64>,
    /// Radial index at which the reverse shock crossed the ejecta shell,
    /// per sector. Always `None` for a forward shock.
    pub crossing: Vec<Option<usize>>,
}

impl ShockGrid {
    pub fn shape(&self) -> (usize, usize) {
        self.gamma.shape()
    }

    pub(crate) fn from_sectors(sectors: Vec<SectorRows>) -> AfterglowResult<Self> {
        let n = sectors.len();
        let mut gamma = Vec::with_capacity(n);
        let mut u = Vec::with_capacity(n);
        let mut b = Vec::with_capacity(n);
        let mut n_p = Vec::with_capacity(n);
        let mut e_th = Vec::with_capacity(n);
        let mut t_com = Vec::with_capacity(n);
        let mut t_eng = Vec::with_capacity(n);
        let mut width = Vec::with_capacity(n);
        let mut crossing = Vec::with_capacity(n);

        for rows in sectors {
            gamma.push(rows.gamma);
            u.push(rows.u);
            b.push(rows.b);
            n_p.push(rows.n_p);
            e_th.push(rows.e_th);
            t_com.push(rows.t_com);
            t_eng.push(rows.t_eng);
            width.push(rows.width);
            crossing.push(rows.crossing);
        }

        Ok(Self {
            gamma: MeshGrid::from_rows(gamma)?,
            u: MeshGrid::from_rows(u)?,
            b: MeshGrid::from_rows(b)?,
            n_p: MeshGrid::from_rows(n_p)?,
            e_th: MeshGrid::from_rows(e_th)?,
            t_com: MeshGrid::from_rows(t_com)?,
            t_eng: MeshGrid::from_rows(t_eng)?,
            width: MeshGrid::from_rows(width)?,
            crossing,
        })
    }
}

/// Forward and reverse shock grids of one dual-engine run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShockPair {
    pub forward: ShockGrid,
    pub reverse: ShockGrid,
}

/// One sector's output rows, owned by the task that solved it.
#[derive(Debug, Clone, Default)]
pub(crate) struct SectorRows {
    pub gamma: Vec<f64>,
    pub u: Vec<f64>,
    pub b: Vec<f64>,
    pub n_p: Vec<f64>,
    pub e_th: Vec<f64>,
    pub t_com: Vec<f64>,
    pub t_eng: Vec<f64>,
    pub width: Vec<f64>,
    pub crossing: Option<usize>,
}

impl SectorRows {
    pub fn with_capacity(n: usize) -> Self {
        Self {
            gamma: Vec::with_capacity(n),
            u: Vec::with_capacity(n),
            b: Vec::with_capacity(n),
            n_p: Vec::with_capacity(n),
            e_th: Vec::with_capacity(n),
            t_com: Vec::with_capacity(n),
            t_eng: Vec::with_capacity(n),
            width: Vec::with_capacity(n),
            crossing: None,
        }
    }

    /// A sector with no outflow: the medium stays at rest.
    pub fn at_rest(n: usize) -> Self {
        Self {
            gamma: create_array(n, 1.0),
            u: create_array(n, 0.0),
            b: create_array(n, 0.0),
            n_p: create_array(n, 0.0),
            e_th: create_array(n, 0.0),
            t_com: create_array(n, 0.0),
            t_eng: create_array(n, f64::INFINITY),
            width: create_array(n, 0.0),
            crossing: None,
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn push(
        &mut self,
        gamma: f64,
        u: f64,
        b: f64,
        n_p: f64,
        e_th: f64,
        t_com: f64,
        t_eng: f64,
        width: f64,
    ) {
        self.gamma.push(gamma);
        self.u.push(u);
        self.b.push(b);
        self.n_p.push(n_p);
        self.e_th.push(e_th);
        self.t_com.push(t_com);
        self.t_eng.push(t_eng);
        self.width.push(width);
    }
}

/// One-way switch from direct reverse-shock tracking to self-similar decay.
///
/// Fires the first time the reverse-shocked width reaches the ejecta shell
/// width, freezing the particle number and thermal energy swept by the
/// reverse shock. Once fired it never resets.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CrossingLatch {
    frozen: Option<Frozen>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Frozen {
    index: usize,
    n3: f64,
    e_th3: f64,
}

impl CrossingLatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn crossed(&self) -> bool {
        self.frozen.is_some()
    }

    /// Radial index at which the latch fired.
    pub fn crossing_index(&self) -> Option<usize> {
        self.frozen.map(|f| f.index)
    }

    /// Frozen `(N3, E_th3)` per unit solid angle.
    pub fn frozen(&self) -> Option<(f64, f64)> {
        self.frozen.map(|f| (f.n3, f.e_th3))
    }

    /// Fire if `d_rs >= d_fs` and the latch is still open. Returns whether
    /// it fired on this call.
    pub fn check(
        &mut self,
        index: usize,
        d_rs: f64,
        d_fs: f64,
        r: f64,
        n_p: f64,
        e_th: f64,
    ) -> bool {
        if self.frozen.is_some() || d_rs < d_fs {
            return false;
        }
        self.frozen = Some(Frozen {
            index,
            n3: n_p * d_rs * r * r,
            e_th3: e_th * d_rs * r * r,
        });
        true
    }

    /// Self-similar `(n, e_th)` at radius `r` for shell width `d_fs`.
    pub fn decayed(&self, r: f64, d_fs: f64) -> Option<(f64, f64)> {
        self.frozen.map(|f| {
            let volume = d_fs * r * r;
            (f.n3 / volume, f.e_th3 / volume)
        })
    }
}
