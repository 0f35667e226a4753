//! Runtime sensors and the per-tick sampling pass.

use drift_math::{direction_from_forward, Point2, Pose2, Vec2};

use crate::blueprint::{SensorBlueprint, SensorKind};
use crate::probe::{Canvas, WorldProbe};

/// A live sensor bound to its compiled blueprint.
#[derive(Debug, Clone)]
pub struct Sensor {
    blueprint: SensorBlueprint,
    reading: f64,
    /// World-space ray origin of the last cast.
    origin: Point2,
    /// World-space hit point, or the max-range endpoint on a miss.
    endpoint: Point2,
}

impl Sensor {
    /// A sensor that has not sampled yet.
    ///
    /// Until the first update the vehicle is placed at the world origin
    /// facing `+Y`, and distance sensors report a miss.
    pub(crate) fn new(blueprint: SensorBlueprint) -> Self {
        match blueprint {
            SensorBlueprint::Distance {
                angle,
                max_length,
                local_origin,
            } => {
                let pose = Pose2::identity();
                let origin = pose.transform_point(&local_origin);
                let direction = pose.transform_vector(&direction_from_forward(angle));
                Self {
                    blueprint,
                    reading: max_length,
                    origin,
                    endpoint: origin + direction * max_length,
                }
            }
            SensorBlueprint::Speed => Self {
                blueprint,
                reading: 0.0,
                origin: Point2::origin(),
                endpoint: Point2::origin(),
            },
        }
    }

    /// The blueprint this sensor was compiled from.
    pub fn blueprint(&self) -> &SensorBlueprint {
        &self.blueprint
    }

    /// Sensor kind.
    pub fn kind(&self) -> SensorKind {
        self.blueprint.kind()
    }

    /// Range of a distance sensor.
    pub fn max_length(&self) -> Option<f64> {
        match self.blueprint {
            SensorBlueprint::Distance { max_length, .. } => Some(max_length),
            SensorBlueprint::Speed => None,
        }
    }

    /// Last sampled value.
    ///
    /// Distance sensors report the hit distance, or their range when nothing
    /// was hit. Speed sensors report the chassis speed.
    pub fn reading(&self) -> f64 {
        self.reading
    }

    /// Reading scaled for a decision-making consumer.
    ///
    /// Distance readings are divided by the sensor range so they land in
    /// `[0, 1]`; speed is passed through.
    pub fn normalized(&self) -> f64 {
        match self.blueprint {
            SensorBlueprint::Distance { max_length, .. } => self.reading / max_length,
            SensorBlueprint::Speed => self.reading,
        }
    }

    /// World-space ray origin of the last cast, or of the origin pose before
    /// the first update.
    pub fn origin(&self) -> Point2 {
        self.origin
    }

    /// World-space end of the last cast.
    pub fn endpoint(&self) -> Point2 {
        self.endpoint
    }

    fn sample<P: WorldProbe + ?Sized>(&mut self, pose: &Pose2, velocity: &Vec2, probe: &P) {
        match self.blueprint {
            SensorBlueprint::Distance {
                angle,
                max_length,
                local_origin,
            } => {
                let origin = pose.transform_point(&local_origin);
                let direction = pose.transform_vector(&direction_from_forward(angle));

                let reading = match probe.cast_ray(&origin, &direction, max_length) {
                    Some(distance) if distance.is_finite() => distance.clamp(0.0, max_length),
                    _ => max_length,
                };

                self.reading = reading;
                self.origin = origin;
                self.endpoint = origin + direction * reading;
            }
            SensorBlueprint::Speed => {
                self.reading = velocity.norm();
            }
        }
    }
}

/// The compiled sensors of one vehicle, in blueprint order.
#[derive(Debug, Clone, Default)]
pub struct SensorArray {
    sensors: Vec<Sensor>,
}

impl SensorArray {
    pub(crate) fn new(sensors: Vec<Sensor>) -> Self {
        Self { sensors }
    }

    /// Re-sample every sensor against the current world state.
    ///
    /// The chassis pose and velocity are read once, so all sensors in a pass
    /// see the same snapshot.
    pub fn update<P: WorldProbe + ?Sized>(&mut self, probe: &P) {
        let pose = probe.pose();
        let velocity = probe.linear_velocity();

        for sensor in &mut self.sensors {
            sensor.sample(&pose, &velocity, probe);
        }
    }

    /// Sensors of one kind, in declaration order.
    pub fn by_kind(&self, kind: SensorKind) -> impl Iterator<Item = &Sensor> + '_ {
        self.sensors.iter().filter(move |s| s.kind() == kind)
    }

    /// Index of the first sensor of a kind.
    pub fn position_of(&self, kind: SensorKind) -> Option<usize> {
        self.sensors.iter().position(|s| s.kind() == kind)
    }

    /// Sensor at `index`.
    pub fn get(&self, index: usize) -> Option<&Sensor> {
        self.sensors.get(index)
    }

    /// All sensors, in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Sensor> + '_ {
        self.sensors.iter()
    }

    /// Number of sensors.
    pub fn len(&self) -> usize {
        self.sensors.len()
    }

    /// True if the array holds no sensors.
    pub fn is_empty(&self) -> bool {
        self.sensors.is_empty()
    }

    /// Raw readings, in declaration order.
    pub fn readings(&self) -> Vec<f64> {
        self.sensors.iter().map(Sensor::reading).collect()
    }

    /// Normalized readings, in declaration order.
    pub fn normalized_readings(&self) -> Vec<f64> {
        self.sensors.iter().map(Sensor::normalized).collect()
    }

    /// Draw one segment per distance sensor, origin to hit (or range end).
    pub fn draw<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        for sensor in self.by_kind(SensorKind::Distance) {
            canvas.line(sensor.origin, sensor.endpoint, sensor.normalized());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blueprint::compile;
    use crate::probe::SegmentRecorder;
    use crate::testing::CircleWorld;
    use approx::assert_relative_eq;
    use drift_ir::{default_blueprints, BlueprintSpec};
    use std::f64::consts::FRAC_PI_2;

    fn forward_and_speed() -> SensorArray {
        compile(&[
            BlueprintSpec::distance(0.0, 5.0, [0.0, 0.45]),
            BlueprintSpec::distance(90.0, 5.0, [0.0, 0.0]),
            BlueprintSpec::speed(),
        ])
        .unwrap()
    }

    #[test]
    fn test_miss_reports_max_length() {
        let mut array = forward_and_speed();
        let world = CircleWorld::empty();

        array.update(&world);

        for sensor in array.by_kind(SensorKind::Distance) {
            assert_eq!(sensor.reading(), 5.0);
            assert_eq!(sensor.normalized(), 1.0);
        }
    }

    #[test]
    fn test_hit_distance_from_attachment_point() {
        let mut array = forward_and_speed();
        // Disc of radius 1 centered 3.45 ahead: surface is 2.0 from the nose.
        let world = CircleWorld::empty().with_circle(Point2::new(0.0, 3.45), 1.0);

        array.update(&world);

        let forward = array.get(0).unwrap();
        assert_relative_eq!(forward.reading(), 2.0, epsilon = 1e-9);
        assert_relative_eq!(forward.normalized(), 0.4, epsilon = 1e-9);
        assert_relative_eq!(forward.endpoint().y, 2.45, epsilon = 1e-9);

        // The side ray points at -X and misses.
        assert_eq!(array.get(1).unwrap().reading(), 5.0);
    }

    #[test]
    fn test_rays_follow_vehicle_heading() {
        let mut array = forward_and_speed();
        // Heading +90 deg: forward is -X, so the side ray (also +90) points at -Y.
        let world = CircleWorld::empty()
            .with_pose(Pose2::new(Point2::new(1.0, 1.0), FRAC_PI_2))
            .with_circle(Point2::new(1.0, -2.0), 1.0);

        array.update(&world);

        assert_eq!(array.get(0).unwrap().reading(), 5.0);
        assert_relative_eq!(array.get(1).unwrap().reading(), 2.0, epsilon = 1e-9);

        let origin = array.get(0).unwrap().origin();
        assert_relative_eq!(origin.x, 0.55, epsilon = 1e-9);
        assert_relative_eq!(origin.y, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_origin_inside_obstacle_reads_zero() {
        let mut array = forward_and_speed();
        let world = CircleWorld::empty().with_circle(Point2::new(0.0, 0.5), 0.2);

        array.update(&world);

        assert_eq!(array.get(0).unwrap().reading(), 0.0);
    }

    #[test]
    fn test_readings_stay_in_range() {
        let mut array = compile(&default_blueprints()).unwrap();
        let world = CircleWorld::empty()
            .with_circle(Point2::new(0.0, 2.0), 0.5)
            .with_circle(Point2::new(-3.0, -1.0), 1.5)
            .with_circle(Point2::new(2.5, 0.0), 0.3)
            .with_circle(Point2::new(0.0, 9.0), 0.5);

        array.update(&world);

        for sensor in array.by_kind(SensorKind::Distance) {
            let max = sensor.max_length().unwrap();
            assert!((0.0..=max).contains(&sensor.reading()));
            assert!((0.0..=1.0).contains(&sensor.normalized()));
        }
        assert!(array.readings().iter().any(|r| *r < 5.0));
    }

    #[test]
    fn test_overlong_hit_is_clamped() {
        let mut array = forward_and_speed();
        let world = CircleWorld::empty().with_fixed_hit(7.5);

        array.update(&world);

        assert_eq!(array.get(0).unwrap().reading(), 5.0);
    }

    #[test]
    fn test_speed_is_velocity_magnitude() {
        let mut array = forward_and_speed();
        let world = CircleWorld::empty().with_velocity(Vec2::new(3.0, -4.0));

        array.update(&world);

        let speed = array.by_kind(SensorKind::Speed).next().unwrap();
        assert_relative_eq!(speed.reading(), 5.0);
        assert_relative_eq!(speed.normalized(), 5.0);
    }

    #[test]
    fn test_one_cast_per_distance_sensor_per_update() {
        let mut array = compile(&default_blueprints()).unwrap();
        let world = CircleWorld::empty();

        array.update(&world);
        array.update(&world);

        assert_eq!(world.casts(), 2 * 23);
    }

    #[test]
    fn test_by_kind_is_stable() {
        let array = compile(&default_blueprints()).unwrap();
        let first: Vec<_> = array
            .by_kind(SensorKind::Distance)
            .map(|s| *s.blueprint())
            .collect();
        let second: Vec<_> = array
            .by_kind(SensorKind::Distance)
            .map(|s| *s.blueprint())
            .collect();
        assert_eq!(first, second);
        assert_eq!(array.position_of(SensorKind::Speed), Some(23));
    }

    #[test]
    fn test_draw_emits_one_segment_per_ray() {
        let mut array = forward_and_speed();
        let world = CircleWorld::empty().with_circle(Point2::new(0.0, 3.45), 1.0);
        array.update(&world);

        let mut canvas = SegmentRecorder::default();
        array.draw(&mut canvas);

        assert_eq!(canvas.segments.len(), 2);
        let seg = canvas.segments[0];
        assert_relative_eq!((seg.to - seg.from).norm(), 2.0, epsilon = 1e-9);
        assert_relative_eq!(seg.intensity, 0.4, epsilon = 1e-9);
    }

    #[test]
    fn test_draw_before_update_uses_origin_pose() {
        let fresh = compile(&default_blueprints()).unwrap();
        let mut before = SegmentRecorder::default();
        fresh.draw(&mut before);

        let mut sampled = fresh.clone();
        sampled.update(&CircleWorld::empty());
        let mut after = SegmentRecorder::default();
        sampled.draw(&mut after);

        assert_eq!(before.segments.len(), 23);
        for (a, b) in before.segments.iter().zip(&after.segments) {
            assert_relative_eq!((a.from - b.from).norm(), 0.0, epsilon = 1e-12);
            assert_relative_eq!((a.to - b.to).norm(), 0.0, epsilon = 1e-9);
            assert_eq!(a.intensity, 1.0);
        }
    }
}
