use std::{env, fmt::Display, path::PathBuf, str::FromStr, time::Duration};

use glam::Vec3;
use log::warn;

pub const WIDTH_VAR: &str = "PLAYGROUND_WIDTH";
pub const HEIGHT_VAR: &str = "PLAYGROUND_HEIGHT";
pub const FIRST_TEXTURE_VAR: &str = "PLAYGROUND_TEXTURE_1";
pub const SECOND_TEXTURE_VAR: &str = "PLAYGROUND_TEXTURE_2";
pub const TARGET_SCALE_VAR: &str = "PLAYGROUND_TARGET_SCALE";
pub const ROTATION_INTERVAL_VAR: &str = "PLAYGROUND_ROTATION_INTERVAL_MS";
pub const MOUSE_SENSITIVITY_VAR: &str = "PLAYGROUND_MOUSE_SENSITIVITY";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub title: String,
    pub window_size: (u32, u32),
    pub texture_paths: [PathBuf; 2],
    /// Per-axis scale an object is driven to when a scale request is applied.
    pub target_scale: Vec3,
    /// Time between two rotation steps of the selected object. Zero rotates
    /// every frame.
    pub rotation_interval: Duration,
    /// Degrees of yaw / pitch per pixel of mouse motion.
    pub mouse_sensitivity: f32,
    /// Camera movement in units per millisecond.
    pub camera_speed: f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Transform Playground".to_string(),
            window_size: (1200, 800),
            texture_paths: [
                PathBuf::from("assets/box.png"),
                PathBuf::from("assets/smilie.png"),
            ],
            target_scale: Vec3::new(1.5, 1.5, 1.0),
            rotation_interval: Duration::from_millis(100),
            mouse_sensitivity: 0.1,
            camera_speed: 0.003,
        }
    }
}

fn parse_var<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) => match value.trim().parse() {
            Ok(parsed) => parsed,
            Err(err) => {
                warn!("Ignoring {}={:?}: {}", key, value, err);
                default
            }
        },
        None => default,
    }
}

/// Accepts either one uniform factor (`"2"`) or three comma separated ones
/// (`"1.5,1.5,1"`). All components must be positive, and x must equal y:
/// objects rotate about z, so a non-uniform xy target would never settle.
fn parse_scale(value: &str) -> Option<Vec3> {
    let parts = value
        .split(',')
        .map(|part| part.trim().parse::<f32>().ok())
        .collect::<Option<Vec<f32>>>()?;
    let scale = match parts.as_slice() {
        [uniform] => Vec3::splat(*uniform),
        [x, y, z] => Vec3::new(*x, *y, *z),
        _ => return None,
    };
    (scale.is_finite() && scale.min_element() > 0.0 && scale.x == scale.y).then_some(scale)
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Self {
        let default = Self::default();

        let width = parse_var(&lookup, WIDTH_VAR, default.window_size.0);
        let height = parse_var(&lookup, HEIGHT_VAR, default.window_size.1);
        let window_size = if width == 0 || height == 0 {
            warn!("Window size must not be zero, using default");
            default.window_size
        } else {
            (width, height)
        };

        let [first_texture, second_texture] = default.texture_paths;
        let texture_paths = [
            lookup(FIRST_TEXTURE_VAR)
                .map(PathBuf::from)
                .unwrap_or(first_texture),
            lookup(SECOND_TEXTURE_VAR)
                .map(PathBuf::from)
                .unwrap_or(second_texture),
        ];

        let target_scale = match lookup(TARGET_SCALE_VAR) {
            Some(value) => parse_scale(&value).unwrap_or_else(|| {
                warn!(
                    "Ignoring {}={:?}: expected positive scale with x = y",
                    TARGET_SCALE_VAR, value
                );
                default.target_scale
            }),
            None => default.target_scale,
        };

        let rotation_interval = Duration::from_millis(parse_var(
            &lookup,
            ROTATION_INTERVAL_VAR,
            default.rotation_interval.as_millis() as u64,
        ));

        let mouse_sensitivity =
            parse_var(&lookup, MOUSE_SENSITIVITY_VAR, default.mouse_sensitivity);

        Self {
            window_size,
            texture_paths,
            target_scale,
            rotation_interval,
            mouse_sensitivity,
            ..default
        }
    }
}

#[cfg(test)]
mod test {
    use std::{collections::HashMap, path::PathBuf, time::Duration};

    use glam::Vec3;

    use super::{
        parse_scale, AppConfig, FIRST_TEXTURE_VAR, HEIGHT_VAR, ROTATION_INTERVAL_VAR,
        TARGET_SCALE_VAR, WIDTH_VAR,
    };

    fn config_from(vars: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_empty_environment_gives_defaults() {
        assert_eq!(config_from(&[]), AppConfig::default());
    }

    #[test]
    fn test_overrides_are_applied() {
        let config = config_from(&[
            (WIDTH_VAR, "640"),
            (HEIGHT_VAR, " 480 "),
            (FIRST_TEXTURE_VAR, "/tmp/crate.png"),
            (TARGET_SCALE_VAR, "2"),
            (ROTATION_INTERVAL_VAR, "0"),
        ]);
        assert_eq!(config.window_size, (640, 480));
        assert_eq!(config.texture_paths[0], PathBuf::from("/tmp/crate.png"));
        assert_eq!(
            config.texture_paths[1],
            AppConfig::default().texture_paths[1]
        );
        assert_eq!(config.target_scale, Vec3::splat(2.0));
        assert_eq!(config.rotation_interval, Duration::ZERO);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = config_from(&[
            (WIDTH_VAR, "wide"),
            (HEIGHT_VAR, "0"),
            (TARGET_SCALE_VAR, "1,-2,1"),
            (ROTATION_INTERVAL_VAR, "-5"),
        ]);
        let default = AppConfig::default();
        assert_eq!(config.window_size, default.window_size);
        assert_eq!(config.target_scale, default.target_scale);
        assert_eq!(config.rotation_interval, default.rotation_interval);
    }

    #[test]
    fn test_parse_scale() {
        assert_eq!(parse_scale("1.5, 1.5, 1"), Some(Vec3::new(1.5, 1.5, 1.0)));
        assert_eq!(parse_scale("3"), Some(Vec3::splat(3.0)));
        assert_eq!(parse_scale("1,2"), None);
        assert_eq!(parse_scale("0"), None);
        assert_eq!(parse_scale("a,b,c"), None);
    }

    #[test]
    fn test_non_uniform_xy_scale_is_rejected() {
        assert_eq!(parse_scale("2,1,1"), None);
        assert_eq!(parse_scale("2, 2, 0.5"), Some(Vec3::new(2.0, 2.0, 0.5)));
        let config = config_from(&[(TARGET_SCALE_VAR, "1,3,1")]);
        assert_eq!(config.target_scale, AppConfig::default().target_scale);
    }
}
