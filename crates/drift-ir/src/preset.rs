//! Stock sensor layout for the 0.5 x 1.0 chassis.

use crate::BlueprintSpec;

const INSET: f64 = 0.05;
// Facing +Y, the left flank is at -X.
const LEFT: f64 = -0.25 + INSET;
const RIGHT: f64 = 0.25 - INSET;
const BACK: f64 = -0.50 + INSET;
const TOP: f64 = 0.50 - INSET;

/// The 24-sensor layout: a forward fan, a rear fan, long-range forward rays,
/// side rays and one speed sensor, in that order.
pub fn default_blueprints() -> Vec<BlueprintSpec> {
    let near = 5.0;
    let far = 10.0;

    let distance = |angle: f64, length: f64, start: [f64; 2]| {
        BlueprintSpec::distance(angle, length, start)
    };

    vec![
        distance(-45.0, near, [RIGHT, TOP]),
        distance(-30.0, near, [0.0, TOP]),
        distance(-15.0, near, [0.0, TOP]),
        distance(0.0, near, [0.0, TOP]),
        distance(15.0, near, [0.0, TOP]),
        distance(30.0, near, [0.0, TOP]),
        distance(45.0, near, [LEFT, TOP]),
        //
        distance(135.0, near, [LEFT, BACK]),
        distance(165.0, near, [0.0, BACK]),
        distance(-180.0, near, [0.0, BACK]),
        distance(-165.0, near, [0.0, BACK]),
        distance(-135.0, near, [RIGHT, BACK]),
        //
        distance(-10.0, far, [0.0, TOP]),
        distance(-3.0, far, [0.0, TOP]),
        distance(0.0, far, [0.0, TOP]),
        distance(3.0, far, [0.0, TOP]),
        distance(10.0, far, [0.0, TOP]),
        //
        distance(60.0, near, [LEFT, 0.0]),
        distance(90.0, near, [LEFT, 0.0]),
        distance(120.0, near, [LEFT, 0.0]),
        //
        distance(-60.0, near, [RIGHT, 0.0]),
        distance(-90.0, near, [RIGHT, 0.0]),
        distance(-120.0, near, [RIGHT, 0.0]),
        //
        BlueprintSpec::speed(),
    ]
}
