// File: crates/ezchart-core/src/axis.rs
// Summary: Axis generator: tick layout for linear/time/band scales, rendered as an SVG group.

use std::fmt;
use std::rc::Rc;

use tracing::trace;

use crate::dom::{fmt_num, Document, NodeId};
use crate::error::Result;
use crate::scale::{format_time_tick, BandScale, LinearScale, TimeScale};
use crate::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orient {
    Top,
    Right,
    Bottom,
    Left,
}

impl Orient {
    fn is_vertical(&self) -> bool { matches!(self, Orient::Left | Orient::Right) }
    /// +1 for ticks pointing down/right, -1 for up/left.
    fn k(&self) -> f64 { if matches!(self, Orient::Top | Orient::Left) { -1.0 } else { 1.0 } }
}

#[derive(Clone, Debug, PartialEq)]
pub enum AxisScale {
    Linear(LinearScale),
    Time(TimeScale),
    Band(BandScale),
}

impl AxisScale {
    fn range(&self) -> (f64, f64) {
        match self {
            AxisScale::Linear(s) => s.range(),
            AxisScale::Time(s) => s.range(),
            AxisScale::Band(s) => s.range(),
        }
    }
}

/// One laid-out tick: domain value, pixel position along the axis and its label.
/// Time ticks carry epoch milliseconds, band ticks their index in the domain.
#[derive(Clone, Debug, PartialEq)]
pub struct Tick {
    pub value: f64,
    pub position: f64,
    pub label: String,
}

type TickFormat = Rc<dyn Fn(f64) -> String>;

#[derive(Clone)]
pub struct Axis {
    pub label: String,
    orient: Orient,
    scale: AxisScale,
    tick_count: usize,
    tick_size_inner: f64,
    tick_size_outer: f64,
    tick_padding: f64,
    tick_format: Option<TickFormat>,
}

impl fmt::Debug for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Axis")
            .field("label", &self.label)
            .field("orient", &self.orient)
            .field("scale", &self.scale)
            .field("tick_count", &self.tick_count)
            .finish_non_exhaustive()
    }
}

impl Axis {
    pub fn new(orient: Orient, scale: AxisScale) -> Self {
        Self {
            label: String::new(),
            orient,
            scale,
            tick_count: 10,
            tick_size_inner: 6.0,
            tick_size_outer: 6.0,
            tick_padding: 3.0,
            tick_format: None,
        }
    }

    pub fn bottom(scale: AxisScale) -> Self { Self::new(Orient::Bottom, scale) }
    pub fn left(scale: AxisScale) -> Self { Self::new(Orient::Left, scale) }

    pub fn orient(&self) -> Orient { self.orient }
    pub fn scale(&self) -> &AxisScale { &self.scale }
    pub fn tick_count(&self) -> usize { self.tick_count }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_ticks(mut self, count: usize) -> Self {
        self.tick_count = count;
        self
    }

    pub fn with_tick_size(mut self, inner: f64, outer: f64) -> Self {
        self.tick_size_inner = inner;
        self.tick_size_outer = outer;
        self
    }

    pub fn with_tick_padding(mut self, padding: f64) -> Self {
        self.tick_padding = padding;
        self
    }

    /// Override labels of linear ticks (value) and time ticks (epoch milliseconds).
    pub fn with_tick_format<F>(mut self, f: F) -> Self
    where
        F: Fn(f64) -> String + 'static,
    {
        self.tick_format = Some(Rc::new(f));
        self
    }

    pub fn ticks(&self) -> Vec<Tick> {
        let fmt = self.tick_format.as_ref();
        match &self.scale {
            AxisScale::Linear(s) => {
                let default = s.tick_format(self.tick_count);
                s.ticks(self.tick_count)
                    .into_iter()
                    .map(|v| Tick {
                        value: v,
                        position: s.scale(v),
                        label: fmt.map_or_else(|| default(v), |f| f(v)),
                    })
                    .collect()
            }
            AxisScale::Time(s) => s
                .ticks(self.tick_count)
                .into_iter()
                .map(|t| Tick {
                    value: t.timestamp_millis() as f64,
                    position: s.scale(&t),
                    label: fmt.map_or_else(|| format_time_tick(&t), |f| f(t.timestamp_millis() as f64)),
                })
                .collect(),
            AxisScale::Band(s) => s
                .domain()
                .iter()
                .enumerate()
                .filter_map(|(i, k)| {
                    s.scale(k).map(|x| Tick { value: i as f64, position: x + s.bandwidth() / 2.0, label: k.clone() })
                })
                .collect(),
        }
    }

    /// Draw into `group` (usually a `g` translated to the axis origin). Safe to call repeatedly.
    pub fn render(&self, doc: &mut Document, group: NodeId, theme: &Theme) -> Result<()> {
        let k = self.orient.k();
        let vertical = self.orient.is_vertical();
        let (r0, r1) = self.scale.range();
        let outer = fmt_num(k * self.tick_size_outer);

        doc.set_attr(group, "fill", "none")?;
        doc.set_num(group, "font-size", theme.font_size)?;
        doc.set_attr(group, "font-family", theme.font_family)?;
        doc.set_attr(
            group,
            "text-anchor",
            match self.orient {
                Orient::Left => "end",
                Orient::Right => "start",
                _ => "middle",
            },
        )?;

        let domain = doc.select_or_append(group, "path", "domain")?;
        let d = if vertical {
            format!("M{},{}H0V{}H{}", outer, fmt_num(r0), fmt_num(r1), outer)
        } else {
            format!("M{},{}V0H{}V{}", fmt_num(r0), outer, fmt_num(r1), outer)
        };
        doc.set_attr(domain, "d", d)?;
        doc.set_attr(domain, "stroke", theme.axis_line)?;

        let ticks = self.ticks();
        // labels can repeat, values cannot
        let keys: Vec<String> = ticks.iter().map(|t| t.value.to_string()).collect();
        let join = doc.join(group, "g", "tick", &keys)?;
        let spacing = self.tick_size_inner.max(0.0) + self.tick_padding;
        for (tick, &node) in ticks.iter().zip(&join.nodes) {
            let transform = if vertical {
                format!("translate(0,{})", fmt_num(tick.position))
            } else {
                format!("translate({},0)", fmt_num(tick.position))
            };
            doc.set_attr(node, "transform", transform)?;

            let line = doc.select_or_append(node, "line", "tick-line")?;
            doc.set_attr(line, "stroke", theme.axis_line)?;
            doc.set_num(line, if vertical { "x2" } else { "y2" }, k * self.tick_size_inner)?;

            let text = doc.select_or_append(node, "text", "tick-label")?;
            doc.set_attr(text, "fill", theme.axis_label)?;
            doc.set_num(text, if vertical { "x" } else { "y" }, k * spacing)?;
            let dy = match self.orient {
                Orient::Top => "0em",
                Orient::Bottom => "0.71em",
                _ => "0.32em",
            };
            doc.set_attr(text, "dy", dy)?;
            doc.set_text(text, tick.label.clone())?;
        }

        match (self.label.is_empty(), doc.select_child(group, "text", "axis-label")) {
            (true, Some(existing)) => doc.remove(existing)?,
            (true, None) => {}
            (false, _) => {
                let title = doc.select_or_append(group, "text", "axis-label")?;
                let mid = fmt_num((r0 + r1) / 2.0);
                let offset = fmt_num(k * (spacing + theme.font_size * 2.5));
                let transform = if vertical {
                    format!("translate({offset},{mid}) rotate(-90)")
                } else {
                    format!("translate({mid},{offset})")
                };
                doc.set_attr(title, "transform", transform)?;
                doc.set_attr(title, "text-anchor", "middle")?;
                doc.set_attr(title, "fill", theme.axis_label)?;
                doc.set_text(title, self.label.clone())?;
            }
        }
        trace!(orient = ?self.orient, ticks = join.nodes.len(), exited = join.exited, "axis");
        Ok(())
    }
}
