//! Delimited-text writers for grids and light curves.
//!
//! Every file holds one row per polar index with space-separated radial
//! values at 16 significant digits, divided by a display unit.

use afterglow::{BandCurve, LightCurve, Spectra, ViewCurves};
use afterglow_common::con::{CM, GAUSS, MJY, SEC};
use afterglow_common::{Coord, MeshGrid};
use blast_wave::ShockGrid;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use synchrotron::{SynElectrons, SynPhotons};

pub struct Writer {
    dir: PathBuf,
    prefix: String,
}

impl Writer {
    pub fn new(dir: &Path, prefix: &str) -> Self {
        Self {
            dir: dir.to_path_buf(),
            prefix: prefix.to_string(),
        }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}_{}.txt", self.prefix, name))
    }

    pub fn write_coord(&self, coord: &Coord) -> io::Result<()> {
        write_rows(&self.path("r"), [coord.r.as_slice()], CM)?;
        write_rows(&self.path("theta"), [coord.theta.as_slice()], 1.0)?;
        write_rows(&self.path("phi"), [coord.phi.as_slice()], 1.0)
    }

    pub fn write_shock(&self, tag: &str, shock: &ShockGrid) -> io::Result<()> {
        let grids: [(&str, &MeshGrid<f64>, f64); 8] = [
            ("Gamma", &shock.gamma, 1.0),
            ("u", &shock.u, 1.0),
            ("B", &shock.b, GAUSS),
            ("n_p", &shock.n_p, 1.0),
            ("e_th", &shock.e_th, 1.0),
            ("t_com", &shock.t_com, SEC),
            ("t_eng", &shock.t_eng, SEC),
            ("width", &shock.width, CM),
        ];
        for (name, grid, unit) in grids {
            write_grid(&self.path(&format!("{}_{}", tag, name)), grid, unit)?;
        }
        Ok(())
    }

    pub fn write_spectra(&self, tag: &str, spectra: &Spectra) -> io::Result<()> {
        let electrons: [(&str, fn(&SynElectrons) -> f64); 5] = [
            ("gamma_m", |e| e.gamma_m),
            ("gamma_c", |e| e.gamma_c),
            ("gamma_a", |e| e.gamma_a),
            ("gamma_M", |e| e.gamma_max),
            ("Y", |e| e.y),
        ];
        for (name, field) in electrons {
            let path = self.path(&format!("{}_{}", tag, name));
            write_mapped(&path, &spectra.electrons, field, 1.0)?;
        }

        let photons: [(&str, fn(&SynPhotons) -> f64); 7] = [
            ("nu_m", |p| p.nu_m),
            ("nu_c", |p| p.nu_c),
            ("nu_a", |p| p.nu_a),
            ("nu_M", |p| p.nu_max),
            ("nu_E_peak", |p| p.nu_e_peak),
            ("I_nu_peak", |p| p.i_nu_peak),
            ("regime", |p| f64::from(p.regime.number())),
        ];
        for (name, field) in photons {
            let path = self.path(&format!("{}_{}", tag, name));
            write_mapped(&path, &spectra.photons, field, 1.0)?;
        }
        Ok(())
    }

    /// Observed times in one file, then one row of flux densities in mJy
    /// per frequency for each shock.
    pub fn write_light_curves(&self, curves: &[LightCurve]) -> io::Result<()> {
        self.write_curves("", curves)
    }

    fn write_curves(&self, suffix: &str, curves: &[LightCurve]) -> io::Result<()> {
        let Some(first) = curves.first() else {
            return Ok(());
        };
        write_rows(&self.path("t_obs"), [first.t.as_slice()], SEC)?;
        let nu: Vec<f64> = curves.iter().map(|c| c.nu).collect();
        write_rows(&self.path("nu"), [nu.as_slice()], 1.0)?;
        write_rows(
            &self.path(&format!("flux_fs{}", suffix)),
            curves.iter().map(|c| c.forward.as_slice()),
            MJY,
        )?;
        if curves.iter().all(|c| c.reverse.is_some()) {
            write_rows(
                &self.path(&format!("flux_rs{}", suffix)),
                curves.iter().filter_map(|c| c.reverse.as_deref()),
                MJY,
            )?;
        }
        Ok(())
    }

    /// Band edges in one file, then one row of integrated flux in
    /// erg s^-1 cm^-2 per band for each shock.
    pub fn write_band_curves(&self, bands: &[BandCurve]) -> io::Result<()> {
        if bands.is_empty() {
            return Ok(());
        }
        let edges: Vec<[f64; 2]> = bands.iter().map(|b| [b.nu_lo, b.nu_hi]).collect();
        write_rows(&self.path("band_nu"), edges.iter().map(|e| e.as_slice()), 1.0)?;
        write_rows(
            &self.path("band_flux_fs"),
            bands.iter().map(|b| b.forward.as_slice()),
            1.0,
        )?;
        if bands.iter().all(|b| b.reverse.is_some()) {
            write_rows(
                &self.path("band_flux_rs"),
                bands.iter().filter_map(|b| b.reverse.as_deref()),
                1.0,
            )?;
        }
        Ok(())
    }

    /// One set of light-curve files per further viewing angle, suffixed by
    /// its position, plus the list of angles.
    pub fn write_views(&self, views: &[ViewCurves]) -> io::Result<()> {
        if views.is_empty() {
            return Ok(());
        }
        let angles: Vec<f64> = views.iter().map(|v| v.params.theta_obs).collect();
        write_rows(&self.path("view_theta_obs"), [angles.as_slice()], 1.0)?;
        for (n, view) in views.iter().enumerate() {
            self.write_curves(&format!("_view{}", n), &view.light_curves)?;
        }
        Ok(())
    }
}

fn format_row(values: &[f64], unit: f64) -> String {
    values
        .iter()
        .map(|v| format!("{:.15e}", v / unit))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Write each row as one line, every value divided by `unit`.
pub fn write_rows<'a, I>(path: &Path, rows: I, unit: f64) -> io::Result<()>
where
    I: IntoIterator<Item = &'a [f64]>,
{
    let mut out = BufWriter::new(File::create(path)?);
    for row in rows {
        writeln!(out, "{}", format_row(row, unit))?;
    }
    out.flush()
}

pub fn write_grid(path: &Path, grid: &MeshGrid<f64>, unit: f64) -> io::Result<()> {
    write_rows(path, grid.rows(), unit)
}

/// Write one scalar field of a grid of records.
pub fn write_mapped<T>(
    path: &Path,
    grid: &MeshGrid<T>,
    field: fn(&T) -> f64,
    unit: f64,
) -> io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    for row in grid.rows() {
        let values: Vec<f64> = row.iter().map(field).collect();
        writeln!(out, "{}", format_row(&values, unit))?;
    }
    out.flush()
}
