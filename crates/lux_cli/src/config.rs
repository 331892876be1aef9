//! Render job configuration: JSON file plus command-line overrides.

use anyhow::{bail, Context, Result};
use lux_core::{DimensionCheck, DEFAULT_BRDF_DIR};
use lux_renderer::scenes::{CORNELL_EYE, MERL_MODELS};
use lux_renderer::{CameraSettings, RenderConfig, DEFAULT_EPSILON};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Scene setup options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneSettings {
    /// Self-intersection tolerance
    pub epsilon: f32,
    /// Directory holding `<name>.binary` MERL tables
    pub brdf_dir: PathBuf,
    /// Measured materials for the sphere grid, in order
    pub brdfs: Vec<String>,
    /// Use diffuse spheres instead of measured ones
    pub diffuse: bool,
    /// Accept MERL tables whose header disagrees with the standard size
    pub lenient_dimensions: bool,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
            brdf_dir: PathBuf::from(DEFAULT_BRDF_DIR),
            brdfs: MERL_MODELS.iter().map(|s| s.to_string()).collect(),
            diffuse: false,
            lenient_dimensions: false,
        }
    }
}

impl SceneSettings {
    pub fn dimension_check(&self) -> DimensionCheck {
        if self.lenient_dimensions {
            DimensionCheck::Warn
        } else {
            DimensionCheck::Reject
        }
    }
}

/// Everything needed for one render.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JobConfig {
    pub render: RenderConfig,
    pub camera: CameraSettings,
    pub scene: SceneSettings,
    pub output: PathBuf,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            render: RenderConfig::default(),
            camera: CameraSettings {
                look_from: CORNELL_EYE.to_array(),
                look_at: [278.0, 274.4, 0.0],
                ..CameraSettings::default()
            },
            scene: SceneSettings::default(),
            output: PathBuf::from("lux.png"),
        }
    }
}

impl JobConfig {
    /// Load from a JSON file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("Invalid config {}", path.display()))
    }

    /// Build the job from command-line arguments (without the program name).
    pub fn from_args(args: &[String]) -> Result<Self> {
        let mut config = match flag_value(args, "--config")? {
            Some(path) => Self::load(Path::new(path))?,
            None => Self::default(),
        };
        config.apply_overrides(args)?;
        Ok(config)
    }

    fn apply_overrides(&mut self, args: &[String]) -> Result<()> {
        let mut brdfs = Vec::new();
        let mut iter = args.iter();

        while let Some(arg) = iter.next() {
            let mut value = || {
                iter.next()
                    .map(String::as_str)
                    .with_context(|| format!("Missing value for {}", arg))
            };

            match arg.as_str() {
                "--config" => {
                    value()?;
                }
                "--out" => self.output = PathBuf::from(value()?),
                "--brdf-dir" => self.scene.brdf_dir = PathBuf::from(value()?),
                "--brdf" => brdfs.push(value()?.to_string()),
                "--spp" => self.render.samples_per_pixel = parse(arg, value()?)?,
                "--seed" => self.render.seed = parse(arg, value()?)?,
                "--width" => self.camera.width = parse(arg, value()?)?,
                "--height" => self.camera.height = parse(arg, value()?)?,
                "--diffuse" => self.scene.diffuse = true,
                "--lenient" => self.scene.lenient_dimensions = true,
                other => bail!("Unknown argument: {}", other),
            }
        }

        if !brdfs.is_empty() {
            self.scene.brdfs = brdfs;
        }
        Ok(())
    }
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Result<Option<&'a str>> {
    match args.iter().position(|a| a == flag) {
        Some(i) => args
            .get(i + 1)
            .map(|v| Some(v.as_str()))
            .with_context(|| format!("Missing value for {}", flag)),
        None => Ok(None),
    }
}

fn parse<T: std::str::FromStr>(flag: &str, value: &str) -> Result<T> {
    value
        .parse()
        .ok()
        .with_context(|| format!("Invalid value for {}: {}", flag, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_defaults() {
        let config = JobConfig::from_args(&[]).unwrap();
        assert_eq!(config.scene.brdfs.len(), 16);
        assert_eq!(config.scene.brdf_dir, PathBuf::from("BRDF"));
        assert_eq!(config.scene.dimension_check(), DimensionCheck::Reject);
        assert_eq!(config.render.max_bounces, 20);
    }

    #[test]
    fn test_overrides() {
        let config = JobConfig::from_args(&args(&[
            "--spp", "8", "--brdf", "blue-rubber", "--brdf", "alum-bronze", "--out", "x.png", "--lenient",
        ]))
        .unwrap();
        assert_eq!(config.render.samples_per_pixel, 8);
        assert_eq!(config.scene.brdfs, vec!["blue-rubber", "alum-bronze"]);
        assert_eq!(config.output, PathBuf::from("x.png"));
        assert_eq!(config.scene.dimension_check(), DimensionCheck::Warn);
    }

    #[test]
    fn test_bad_arguments() {
        assert!(JobConfig::from_args(&args(&["--spp"])).is_err());
        assert!(JobConfig::from_args(&args(&["--spp", "many"])).is_err());
        assert!(JobConfig::from_args(&args(&["--bogus"])).is_err());
    }

    #[test]
    fn test_config_file_with_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("job.json");
        std::fs::write(
            &path,
            r#"{"render": {"samples_per_pixel": 4, "seed": 9}, "scene": {"diffuse": true, "epsilon": 0.01}}"#,
        )
        .unwrap();

        let path_arg = path.to_string_lossy().to_string();
        let config = JobConfig::from_args(&args(&["--config", &path_arg, "--seed", "3"])).unwrap();
        assert_eq!(config.render.samples_per_pixel, 4);
        assert_eq!(config.render.seed, 3);
        assert!(config.scene.diffuse);
        assert_eq!(config.scene.epsilon, 0.01);
        // Untouched sections keep defaults
        assert_eq!(config.camera.look_from, CORNELL_EYE.to_array());
    }

    #[test]
    fn test_missing_config_file() {
        assert!(JobConfig::from_args(&args(&["--config", "/nonexistent/job.json"])).is_err());
    }
}
