//! Compiling declarative sensor descriptors into a live sensor array.

use std::fmt;

use drift_ir::BlueprintSpec;
use drift_math::Point2;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, VehicleError};
use crate::sensors::{Sensor, SensorArray};

/// The kinds of sensor a vehicle can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorKind {
    /// Ray-cast range finder.
    Distance,
    /// Chassis speed.
    Speed,
}

impl SensorKind {
    /// Configuration name of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            SensorKind::Distance => "distance",
            SensorKind::Speed => "speed",
        }
    }

    /// Kind for a configuration name; names are case-sensitive.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "distance" => Some(SensorKind::Distance),
            "speed" => Some(SensorKind::Speed),
            _ => None,
        }
    }
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated, compiled sensor descriptor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SensorBlueprint {
    /// Ray cast from a fixed attachment point.
    Distance {
        /// Ray angle from the forward axis, in radians.
        angle: f64,
        /// Ray length; also the "no hit" reading.
        max_length: f64,
        /// Ray origin in the vehicle-local frame.
        local_origin: Point2,
    },
    /// Magnitude of the chassis linear velocity.
    Speed,
}

impl SensorBlueprint {
    /// Validate one configuration entry.
    ///
    /// `index` is the entry's position in the list, used in errors.
    pub fn from_spec(index: usize, spec: &BlueprintSpec) -> Result<Self> {
        let kind = SensorKind::from_name(&spec.kind).ok_or_else(|| {
            VehicleError::UnknownSensorKind {
                index,
                kind: spec.kind.clone(),
            }
        })?;

        match kind {
            SensorKind::Speed => Ok(SensorBlueprint::Speed),
            SensorKind::Distance => {
                let angle = spec.angle.ok_or(VehicleError::MissingField {
                    index,
                    field: "angle",
                })?;
                let max_length = spec.length.ok_or(VehicleError::MissingField {
                    index,
                    field: "length",
                })?;
                let [x, y] = spec.start.ok_or(VehicleError::MissingField {
                    index,
                    field: "start",
                })?;

                if !angle.is_finite() || !x.is_finite() || !y.is_finite() {
                    return Err(VehicleError::InvalidBlueprint {
                        index,
                        reason: "angle and start must be finite".into(),
                    });
                }
                if !max_length.is_finite() || max_length <= 0.0 {
                    return Err(VehicleError::InvalidBlueprint {
                        index,
                        reason: format!("length must be positive, got {max_length}"),
                    });
                }

                Ok(SensorBlueprint::Distance {
                    angle: angle.to_radians(),
                    max_length,
                    local_origin: Point2::new(x, y),
                })
            }
        }
    }

    /// Kind of sensor this blueprint builds.
    pub fn kind(&self) -> SensorKind {
        match self {
            SensorBlueprint::Distance { .. } => SensorKind::Distance,
            SensorBlueprint::Speed => SensorKind::Speed,
        }
    }
}

/// Compile a blueprint list into a sensor array.
///
/// Every entry is validated before any sensor is built, so a bad entry
/// anywhere in the list yields an error and no sensors. Sensor order matches
/// blueprint order.
pub fn compile(specs: &[BlueprintSpec]) -> Result<SensorArray> {
    let blueprints = specs
        .iter()
        .enumerate()
        .map(|(index, spec)| SensorBlueprint::from_spec(index, spec))
        .collect::<Result<Vec<_>>>()?;

    let sensors: Vec<Sensor> = blueprints.into_iter().map(Sensor::new).collect();
    debug!(sensors = sensors.len(), "compiled sensor blueprints");

    Ok(SensorArray::new(sensors))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use drift_ir::default_blueprints;

    #[test]
    fn test_compile_preserves_order() {
        let specs = vec![
            BlueprintSpec::distance(-45.0, 5.0, [0.2, 0.45]),
            BlueprintSpec::speed(),
            BlueprintSpec::distance(90.0, 10.0, [-0.2, 0.0]),
        ];
        let array = compile(&specs).unwrap();

        let kinds: Vec<_> = array.iter().map(|s| s.kind()).collect();
        assert_eq!(
            kinds,
            vec![SensorKind::Distance, SensorKind::Speed, SensorKind::Distance]
        );
        assert_eq!(array.iter().nth(2).and_then(|s| s.max_length()), Some(10.0));
    }

    #[test]
    fn test_angle_converted_to_radians() {
        let bp = SensorBlueprint::from_spec(0, &BlueprintSpec::distance(90.0, 5.0, [0.0, 0.45]))
            .unwrap();
        match bp {
            SensorBlueprint::Distance {
                angle,
                max_length,
                local_origin,
            } => {
                assert_relative_eq!(angle, std::f64::consts::FRAC_PI_2);
                assert_eq!(max_length, 5.0);
                assert_eq!(local_origin, Point2::new(0.0, 0.45));
            }
            SensorBlueprint::Speed => panic!("expected a distance blueprint"),
        }
    }

    #[test]
    fn test_unknown_kind_fails_whole_list() {
        let specs = vec![
            BlueprintSpec::distance(0.0, 5.0, [0.0, 0.45]),
            BlueprintSpec {
                kind: "lidar".to_string(),
                angle: None,
                length: None,
                start: None,
            },
        ];
        let err = compile(&specs).unwrap_err();
        assert!(matches!(
            err,
            VehicleError::UnknownSensorKind { index: 1, ref kind } if kind == "lidar"
        ));
    }

    #[test]
    fn test_kind_names() {
        for kind in [SensorKind::Distance, SensorKind::Speed] {
            assert_eq!(SensorKind::from_name(kind.as_str()), Some(kind));
        }
        assert_eq!(SensorKind::from_name("lidar"), None);
    }

    #[test]
    fn test_kind_is_case_sensitive() {
        let spec = BlueprintSpec {
            kind: "Speed".to_string(),
            ..BlueprintSpec::speed()
        };
        assert!(SensorBlueprint::from_spec(0, &spec).is_err());
    }

    #[test]
    fn test_distance_requires_fields() {
        let spec = BlueprintSpec {
            length: None,
            ..BlueprintSpec::distance(0.0, 5.0, [0.0, 0.0])
        };
        let err = SensorBlueprint::from_spec(3, &spec).unwrap_err();
        assert!(matches!(
            err,
            VehicleError::MissingField {
                index: 3,
                field: "length"
            }
        ));
    }

    #[test]
    fn test_non_positive_length_rejected() {
        let spec = BlueprintSpec::distance(0.0, 0.0, [0.0, 0.0]);
        assert!(matches!(
            SensorBlueprint::from_spec(0, &spec),
            Err(VehicleError::InvalidBlueprint { .. })
        ));
    }

    #[test]
    fn test_compile_preset() {
        let array = compile(&default_blueprints()).unwrap();
        assert_eq!(array.by_kind(SensorKind::Distance).count(), 23);
        assert_eq!(array.by_kind(SensorKind::Speed).count(), 1);
    }

    #[test]
    fn test_empty_list_compiles() {
        let array = compile(&[]).unwrap();
        assert!(array.is_empty());
    }
}
