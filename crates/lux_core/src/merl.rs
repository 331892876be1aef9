//! MERL measured BRDF tables.
//!
//! A MERL `.binary` file starts with three little-endian `i32` dimensions
//! followed by `3 * n1 * n2 * n3` `f64` samples laid out as three planes
//! (red, green, blue). The table is indexed by the Rusinkiewicz half/difference
//! angles, with `phi_diff` folded into `[0, π)` by reciprocity so only half of
//! the nominal 360 `phi_diff` bins are stored.

use std::f32::consts::{FRAC_PI_2, PI};
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

use byteorder::{LittleEndian, ReadBytesExt};
use lux_math::{Quat, Vec3};
use thiserror::Error;

pub const THETA_HALF_RES: usize = 90;
pub const THETA_DIFF_RES: usize = 90;
pub const PHI_DIFF_RES: usize = 360;

/// Samples per color plane: 90 * 90 * 180.
pub const PLANE_SIZE: usize = THETA_HALF_RES * THETA_DIFF_RES * PHI_DIFF_RES / 2;

const RED_SCALE: f64 = 1.0 / 1500.0;
const GREEN_SCALE: f64 = 1.15 / 1500.0;
const BLUE_SCALE: f64 = 1.66 / 1500.0;

/// Errors that can occur while reading a MERL table.
#[derive(Error, Debug)]
pub enum MerlError {
    #[error("MERL data truncated: expected {expected} bytes of {section}")]
    Truncated {
        section: &'static str,
        expected: usize,
    },

    #[error("MERL dimensions {dims:?} describe {found} samples per plane, expected {expected}")]
    DimensionMismatch {
        dims: [i32; 3],
        found: i64,
        expected: usize,
    },

    #[error("MERL dimensions {0:?} are not positive")]
    InvalidDimensions([i32; 3]),

    #[error("Failed to open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

pub type MerlResult<T> = Result<T, MerlError>;

/// What to do when the header dimensions don't multiply out to [`PLANE_SIZE`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DimensionCheck {
    /// Fail with [`MerlError::DimensionMismatch`].
    #[default]
    Reject,
    /// Log a warning and read the payload the header declares.
    /// Bins past the end of a short table read as zero.
    Warn,
}

/// Half/difference angle parameterization of a direction pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HalfDiff {
    pub theta_half: f32,
    pub phi_half: f32,
    pub theta_diff: f32,
    pub phi_diff: f32,
}

impl HalfDiff {
    /// Convert a local-frame direction pair (z = normal) to half/difference angles.
    pub fn from_directions(wo: Vec3, wi: Vec3) -> Self {
        let wo = wo.normalize_or_zero();
        let wi = wi.normalize_or_zero();

        let wh = (wo + wi).normalize_or_zero();
        let theta_half = wh.z.clamp(-1.0, 1.0).acos();
        let phi_half = wh.y.atan2(wh.x);

        // Rotate wi so the half vector lands on the normal
        let temp = Quat::from_axis_angle(Vec3::Z, -phi_half) * wi;
        let diff = Quat::from_axis_angle(Vec3::Y, -theta_half) * temp;

        let theta_diff = diff.z.clamp(-1.0, 1.0).acos();
        let phi_diff = diff.y.atan2(diff.x);

        Self {
            theta_half,
            phi_half,
            theta_diff,
            phi_diff,
        }
    }

    /// Flattened table index. `phi_half` is ignored since the data is isotropic.
    pub fn table_index(&self) -> usize {
        phi_diff_index(self.phi_diff)
            + theta_diff_index(self.theta_diff) * (PHI_DIFF_RES / 2)
            + theta_half_index(self.theta_half) * (PHI_DIFF_RES / 2) * THETA_DIFF_RES
    }
}

/// `theta_half` bin. Non-linear: square-root compressed so bins are denser
/// near normal incidence.
///
/// In: `[0, π/2]`, out: `[0, 89]`.
pub fn theta_half_index(theta_half: f32) -> usize {
    if theta_half <= 0.0 {
        return 0;
    }
    let theta_half_deg = theta_half / FRAC_PI_2 * THETA_HALF_RES as f32;
    let idx = (theta_half_deg * THETA_HALF_RES as f32).sqrt() as usize;
    idx.min(THETA_HALF_RES - 1)
}

/// `theta_diff` bin, linear.
///
/// In: `[0, π/2]`, out: `[0, 89]`.
pub fn theta_diff_index(theta_diff: f32) -> usize {
    let idx = (theta_diff / FRAC_PI_2 * THETA_DIFF_RES as f32) as usize;
    idx.min(THETA_DIFF_RES - 1)
}

/// `phi_diff` bin, linear over `[0, π)`.
///
/// The BRDF is unchanged under `phi_diff -> phi_diff + π`, so negative angles
/// fold onto the stored half. Out: `[0, 179]`.
pub fn phi_diff_index(phi_diff: f32) -> usize {
    let phi_diff = if phi_diff < 0.0 { phi_diff + PI } else { phi_diff };
    let idx = (phi_diff / PI * (PHI_DIFF_RES / 2) as f32) as usize;
    idx.min(PHI_DIFF_RES / 2 - 1)
}

/// A loaded MERL table.
///
/// Immutable after loading and cheap to share behind an `Arc`.
#[derive(Clone, Debug)]
pub struct MerlTable {
    samples: Vec<f64>,
    dims: [i32; 3],
}

impl MerlTable {
    /// Load a table from a `.binary` file.
    pub fn open(path: impl AsRef<Path>, check: DimensionCheck) -> MerlResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| MerlError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let table = Self::from_reader(BufReader::new(file), check)?;

        log::debug!(
            "Loaded MERL table: {} ({:?}, {:.1} MB)",
            path.display(),
            table.dims,
            table.size_bytes() as f32 / (1024.0 * 1024.0)
        );

        Ok(table)
    }

    /// Read a table from any byte stream.
    pub fn from_reader<R: Read>(mut reader: R, check: DimensionCheck) -> MerlResult<Self> {
        let mut dims = [0i32; 3];
        for dim in dims.iter_mut() {
            *dim = reader
                .read_i32::<LittleEndian>()
                .map_err(|e| truncated(e, "header", 3 * std::mem::size_of::<i32>()))?;
        }

        if dims.iter().any(|&d| d <= 0) {
            return Err(MerlError::InvalidDimensions(dims));
        }
        let n = dims
            .iter()
            .try_fold(1i64, |acc, &d| acc.checked_mul(d as i64))
            .ok_or(MerlError::InvalidDimensions(dims))?;

        if n != PLANE_SIZE as i64 {
            match check {
                DimensionCheck::Reject => {
                    return Err(MerlError::DimensionMismatch {
                        dims,
                        found: n,
                        expected: PLANE_SIZE,
                    });
                }
                DimensionCheck::Warn => {
                    log::warn!(
                        "MERL dimensions {:?} describe {} samples per plane, expected {}",
                        dims,
                        n,
                        PLANE_SIZE
                    );
                }
            }
        }

        let total = (n as usize).saturating_mul(3);
        let payload_bytes = total.saturating_mul(std::mem::size_of::<f64>());

        // Read in chunks so a lying header can't force a huge allocation up front
        let mut samples = Vec::with_capacity(total.min(3 * PLANE_SIZE));
        let mut chunk = [0.0f64; 4096];
        let mut remaining = total;
        while remaining > 0 {
            let len = remaining.min(chunk.len());
            reader
                .read_f64_into::<LittleEndian>(&mut chunk[..len])
                .map_err(|e| truncated(e, "payload", payload_bytes))?;
            samples.extend_from_slice(&chunk[..len]);
            remaining -= len;
        }

        Ok(Self { samples, dims })
    }

    /// Build a full-size table from raw samples (three planes of [`PLANE_SIZE`]).
    pub fn from_samples(samples: Vec<f64>) -> Self {
        debug_assert_eq!(samples.len(), 3 * PLANE_SIZE);
        Self {
            samples,
            dims: [THETA_HALF_RES as i32, THETA_DIFF_RES as i32, (PHI_DIFF_RES / 2) as i32],
        }
    }

    /// Header dimensions as read from the file.
    pub fn dims(&self) -> [i32; 3] {
        self.dims
    }

    /// Size of the sample data in bytes.
    pub fn size_bytes(&self) -> usize {
        self.samples.len() * std::mem::size_of::<f64>()
    }

    /// Scaled RGB reflectance for a local-frame direction pair.
    pub fn lookup(&self, wo: Vec3, wi: Vec3) -> Vec3 {
        self.lookup_index(HalfDiff::from_directions(wo, wi).table_index())
    }

    /// Scaled RGB reflectance at a flattened table index. Never negative.
    pub fn lookup_index(&self, index: usize) -> Vec3 {
        let red = self.sample(index) * RED_SCALE;
        let green = self.sample(index + PLANE_SIZE) * GREEN_SCALE;
        let blue = self.sample(index + 2 * PLANE_SIZE) * BLUE_SCALE;

        Vec3::new(red.max(0.0) as f32, green.max(0.0) as f32, blue.max(0.0) as f32)
    }

    fn sample(&self, index: usize) -> f64 {
        self.samples.get(index).copied().unwrap_or(0.0)
    }
}

fn truncated(err: io::Error, section: &'static str, expected: usize) -> MerlError {
    if err.kind() == io::ErrorKind::UnexpectedEof {
        MerlError::Truncated { section, expected }
    } else {
        MerlError::Io(err)
    }
}
