// File: crates/ezchart-core/src/shape.rs
// Summary: SVG path generators: lines with linear/step/cardinal curves and annular arcs.

use std::f64::consts::TAU;
use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::dom::fmt_num;
use crate::geometry::Point;

const EPSILON: f64 = 1e-9;

/// Interpolation between consecutive line points.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Curve {
    Linear,
    /// Horizontal then vertical, switching halfway between points.
    Step,
    /// Cardinal spline through every point; `tension` 0 is Catmull-Rom-like, 1 is straight.
    Cardinal { tension: f64 },
}

impl Default for Curve {
    fn default() -> Self { Curve::Cardinal { tension: 0.0 } }
}

fn pt(out: &mut String, cmd: char, p: Point) {
    let _ = write!(out, "{}{},{}", cmd, fmt_num(p.x), fmt_num(p.y));
}

/// Path data for a polyline through `points`; empty for no points.
pub fn line_path(points: &[Point], curve: Curve) -> String {
    let mut d = String::new();
    let Some(&first) = points.first() else { return d };
    pt(&mut d, 'M', first);
    if points.len() == 1 {
        return d;
    }
    match curve {
        Curve::Linear => {
            for &p in &points[1..] {
                pt(&mut d, 'L', p);
            }
        }
        Curve::Step => {
            for w in points.windows(2) {
                let mid = (w[0].x + w[1].x) / 2.0;
                pt(&mut d, 'L', Point::new(mid, w[0].y));
                pt(&mut d, 'L', Point::new(mid, w[1].y));
            }
            if let Some(&last) = points.last() {
                pt(&mut d, 'L', last);
            }
        }
        Curve::Cardinal { tension } => {
            if points.len() == 2 {
                pt(&mut d, 'L', points[1]);
                return d;
            }
            let k = (1.0 - tension) / 6.0;
            let n = points.len();
            for i in 0..n - 1 {
                let p0 = points[i.saturating_sub(1)];
                let p1 = points[i];
                let p2 = points[i + 1];
                let p3 = points[(i + 2).min(n - 1)];
                let c1 = Point::new(p1.x + k * (p2.x - p0.x), p1.y + k * (p2.y - p0.y));
                let c2 = Point::new(p2.x + k * (p1.x - p3.x), p2.y + k * (p1.y - p3.y));
                let _ = write!(
                    d,
                    "C{},{},{},{},{},{}",
                    fmt_num(c1.x),
                    fmt_num(c1.y),
                    fmt_num(c2.x),
                    fmt_num(c2.y),
                    fmt_num(p2.x),
                    fmt_num(p2.y)
                );
            }
        }
    }
    d
}

/// Annular sector centred on the origin. Angles are radians, 0 at 12 o'clock, clockwise.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Arc {
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub start_angle: f64,
    pub end_angle: f64,
}

impl Arc {
    pub fn new(inner_radius: f64, outer_radius: f64, start_angle: f64, end_angle: f64) -> Self {
        let (inner_radius, outer_radius) = if inner_radius <= outer_radius {
            (inner_radius.max(0.0), outer_radius.max(0.0))
        } else {
            (outer_radius.max(0.0), inner_radius.max(0.0))
        };
        Self { inner_radius, outer_radius, start_angle, end_angle }
    }

    /// Mid-angle, mid-radius point; handy for placing labels.
    pub fn centroid(&self) -> Point {
        let r = (self.inner_radius + self.outer_radius) / 2.0;
        Point::polar(r, (self.start_angle + self.end_angle) / 2.0)
    }

    pub fn path(&self) -> String {
        let (r0, r1) = (self.inner_radius, self.outer_radius);
        let (a0, a1) = if self.start_angle <= self.end_angle {
            (self.start_angle, self.end_angle)
        } else {
            (self.end_angle, self.start_angle)
        };
        let sweep = a1 - a0;
        let mut d = String::new();
        if r1 <= EPSILON || sweep <= EPSILON {
            let _ = write!(d, "M0,0Z");
            return d;
        }

        if sweep >= TAU - EPSILON {
            // full ring: two half-circle arcs per radius
            ring(&mut d, r1, a0, 1);
            if r0 > EPSILON {
                ring(&mut d, r0, a0, 0);
            }
            return d;
        }

        let large = if sweep > std::f64::consts::PI { 1 } else { 0 };
        pt(&mut d, 'M', Point::polar(r1, a0));
        arc_to(&mut d, r1, large, 1, Point::polar(r1, a1));
        if r0 > EPSILON {
            pt(&mut d, 'L', Point::polar(r0, a1));
            arc_to(&mut d, r0, large, 0, Point::polar(r0, a0));
        } else {
            d.push_str("L0,0");
        }
        d.push('Z');
        d
    }
}

fn arc_to(d: &mut String, r: f64, large: u8, sweep: u8, to: Point) {
    let rr = fmt_num(r);
    let _ = write!(d, "A{},{},0,{},{},{},{}", rr, rr, large, sweep, fmt_num(to.x), fmt_num(to.y));
}

fn ring(d: &mut String, r: f64, a0: f64, sweep: u8) {
    let start = Point::polar(r, a0);
    let opposite = Point::polar(r, a0 + std::f64::consts::PI);
    pt(d, 'M', start);
    arc_to(d, r, 1, sweep, opposite);
    arc_to(d, r, 1, sweep, start);
    d.push('Z');
}

/// Closed circle path starting at 12 o'clock and running clockwise; used by
/// `textPath` labels so `startOffset` percentages follow the angle.
pub fn circle_path(r: f64) -> String {
    let rr = fmt_num(r);
    format!("M0,-{rr}A{rr},{rr},0,1,1,0,{rr}A{rr},{rr},0,1,1,0,-{rr}")
}
