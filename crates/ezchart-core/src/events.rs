// File: crates/ezchart-core/src/events.rs
// Summary: Custom interaction events and the pub/sub dispatcher re-broadcasting DOM events.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use tracing::trace;

use crate::data::DataValue;
use crate::dom::{Document, NodeId};
use crate::error::{ChartError, Result};

/// Pointer events a rendered node can receive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DomEvent {
    MouseOver,
    MouseOut,
    Click,
}

impl DomEvent {
    pub const ALL: [DomEvent; 3] = [DomEvent::MouseOver, DomEvent::MouseOut, DomEvent::Click];
}

/// Event names consumers subscribe to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CustomEvent {
    ValueMouseOver,
    ValueMouseOut,
    ValueClick,
    SeriesMouseOver,
    SeriesMouseOut,
    SeriesClick,
}

impl CustomEvent {
    pub const ALL: [CustomEvent; 6] = [
        CustomEvent::ValueMouseOver,
        CustomEvent::ValueMouseOut,
        CustomEvent::ValueClick,
        CustomEvent::SeriesMouseOver,
        CustomEvent::SeriesMouseOut,
        CustomEvent::SeriesClick,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CustomEvent::ValueMouseOver => "customValueMouseOver",
            CustomEvent::ValueMouseOut => "customValueMouseOut",
            CustomEvent::ValueClick => "customValueClick",
            CustomEvent::SeriesMouseOver => "customSeriesMouseOver",
            CustomEvent::SeriesMouseOut => "customSeriesMouseOut",
            CustomEvent::SeriesClick => "customSeriesClick",
        }
    }

    /// Value-level event raised by `ev` on a single shape.
    pub fn value(ev: DomEvent) -> Self {
        match ev {
            DomEvent::MouseOver => CustomEvent::ValueMouseOver,
            DomEvent::MouseOut => CustomEvent::ValueMouseOut,
            DomEvent::Click => CustomEvent::ValueClick,
        }
    }

    /// Series-level event raised by `ev` on a series group.
    pub fn series(ev: DomEvent) -> Self {
        match ev {
            DomEvent::MouseOver => CustomEvent::SeriesMouseOver,
            DomEvent::MouseOut => CustomEvent::SeriesMouseOut,
            DomEvent::Click => CustomEvent::SeriesClick,
        }
    }
}

impl fmt::Display for CustomEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for CustomEvent {
    type Err = ChartError;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        CustomEvent::ALL
            .iter()
            .copied()
            .find(|e| e.as_str() == s)
            .ok_or_else(|| ChartError::invalid_value("events", 0, format!("unknown event `{s}`")))
    }
}

/// Data bound to a rendered node.
#[derive(Clone, Debug, PartialEq)]
pub struct Datum {
    pub series: String,
    /// `(index, value)` for value shapes; `None` on series groups.
    pub value: Option<(usize, DataValue)>,
}

impl Datum {
    pub fn series(key: impl Into<String>) -> Self {
        Self { series: key.into(), value: None }
    }

    pub fn value(key: impl Into<String>, index: usize, value: DataValue) -> Self {
        Self { series: key.into(), value: Some((index, value)) }
    }
}

type Handler = Rc<dyn Fn(&Datum)>;

/// Named-event broadcaster. Clones share the same subscriber table.
#[derive(Clone, Default)]
pub struct Dispatcher {
    handlers: Rc<RefCell<HashMap<CustomEvent, Vec<Handler>>>>,
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts: Vec<(&'static str, usize)> = self
            .handlers
            .borrow()
            .iter()
            .map(|(k, v)| (k.as_str(), v.len()))
            .collect();
        f.debug_struct("Dispatcher").field("handlers", &counts).finish()
    }
}

impl Dispatcher {
    pub fn new() -> Self { Self::default() }

    /// Subscribe `handler` to `event`. Multiple handlers run in subscription order.
    pub fn on<F>(&self, event: CustomEvent, handler: F) -> &Self
    where
        F: Fn(&Datum) + 'static,
    {
        self.handlers.borrow_mut().entry(event).or_default().push(Rc::new(handler));
        self
    }

    /// Remove every handler of `event`.
    pub fn off(&self, event: CustomEvent) -> &Self {
        self.handlers.borrow_mut().remove(&event);
        self
    }

    pub fn has_handlers(&self, event: CustomEvent) -> bool {
        self.handlers.borrow().get(&event).is_some_and(|h| !h.is_empty())
    }

    /// Invoke every handler of `event`; returns how many ran.
    pub fn call(&self, event: CustomEvent, datum: &Datum) -> usize {
        // snapshot so handlers may subscribe/unsubscribe while running
        let handlers: Vec<Handler> = self.handlers.borrow().get(&event).cloned().unwrap_or_default();
        for h in &handlers {
            h(datum);
        }
        handlers.len()
    }

    /// Deliver a DOM event at `target` and bubble it to the root. Every node on
    /// the way with a listener for `ev` re-broadcasts its custom event with its
    /// bound datum. Returns the custom events raised, innermost first.
    pub fn fire(&self, doc: &Document, target: NodeId, ev: DomEvent) -> Result<Vec<CustomEvent>> {
        if !doc.contains(target) {
            return Err(ChartError::MissingNode(target));
        }
        let mut raised = Vec::new();
        let mut cursor = Some(target);
        while let Some(id) = cursor {
            if let (Some(custom), Some(datum)) = (doc.listener(id, ev), doc.datum(id)) {
                trace!(event = custom.as_str(), series = %datum.series, "dispatch");
                self.call(custom, datum);
                raised.push(custom);
            }
            cursor = doc.parent(id);
        }
        Ok(raised)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn names_round_trip_through_from_str() {
        for e in CustomEvent::ALL {
            assert_eq!(e.as_str().parse::<CustomEvent>().unwrap(), e);
        }
        assert!("customNothing".parse::<CustomEvent>().is_err());
    }

    #[test]
    fn clones_share_handlers() {
        let d = Dispatcher::new();
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        d.clone().on(CustomEvent::ValueClick, move |_| h.set(h.get() + 1));
        assert_eq!(d.call(CustomEvent::ValueClick, &Datum::series("a")), 1);
        assert_eq!(hits.get(), 1);
        d.off(CustomEvent::ValueClick);
        assert_eq!(d.call(CustomEvent::ValueClick, &Datum::series("a")), 0);
    }

    #[test]
    fn fire_bubbles_from_value_to_series() {
        let mut doc = Document::new();
        let group = doc.append(doc.root(), "g").unwrap();
        doc.set_datum(group, Datum::series("s1")).unwrap();
        doc.on(group, DomEvent::Click, CustomEvent::SeriesClick).unwrap();
        let dot = doc.append(group, "circle").unwrap();
        doc.set_datum(dot, Datum::value("s1", 0, DataValue::new("a", 1.0))).unwrap();
        doc.on(dot, DomEvent::Click, CustomEvent::ValueClick).unwrap();

        let seen = Rc::new(RefCell::new(Vec::new()));
        let d = Dispatcher::new();
        for e in [CustomEvent::ValueClick, CustomEvent::SeriesClick] {
            let seen = seen.clone();
            d.on(e, move |datum| seen.borrow_mut().push((e, datum.value.is_some())));
        }
        let raised = d.fire(&doc, dot, DomEvent::Click).unwrap();
        assert_eq!(raised, vec![CustomEvent::ValueClick, CustomEvent::SeriesClick]);
        assert_eq!(*seen.borrow(), vec![(CustomEvent::ValueClick, true), (CustomEvent::SeriesClick, false)]);
        assert!(d.fire(&doc, dot, DomEvent::MouseOver).unwrap().is_empty());
    }
}
