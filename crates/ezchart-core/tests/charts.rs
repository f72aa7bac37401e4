// File: crates/ezchart-core/tests/charts.rs
// Purpose: End-to-end chart renders into a shared document: joins, classes, labels and event bubbling.

use std::cell::RefCell;
use std::rc::Rc;

use ezchart_core::{
    Axis, AxisScale, CandlestickChart, Chart, ChartError, CustomEvent, DataSeries, DataValue, Document, DomEvent,
    HeatMapRadial, Insets, LineChart,
};

fn line_data() -> Vec<DataSeries> {
    vec![
        DataSeries::new("a", vec![DataValue::new(0.0, 1.0), DataValue::new(1.0, 3.0), DataValue::new(2.0, 2.0)]),
        DataSeries::new("b", vec![DataValue::new(0.0, 4.0), DataValue::new(1.0, 1.0), DataValue::new(2.0, 5.0)]),
    ]
}

fn candles() -> Vec<DataSeries> {
    vec![DataSeries::new(
        "ACME",
        vec![
            DataValue::candle("2024-03-04", 10.0, 12.0, 9.0, 11.0),
            DataValue::candle("2024-03-05", 11.0, 13.0, 10.0, 10.5),
            DataValue::candle("2024-03-06", 10.5, 15.0, 10.0, 14.0),
        ],
    )]
}

fn weekly_heat() -> Vec<DataSeries> {
    ["Mon", "Tue", "Wed"]
        .iter()
        .enumerate()
        .map(|(d, day)| {
            DataSeries::new(
                *day,
                ["00", "06", "12", "18"]
                    .iter()
                    .enumerate()
                    .map(|(h, hour)| DataValue::new(*hour, (d * 4 + h) as f64))
                    .collect(),
            )
        })
        .collect()
}

#[test]
fn line_chart_rerender_updates_in_place() {
    let mut doc = Document::new();
    let root = doc.root();
    let mut chart = LineChart::new();
    chart.render(&mut doc, root, &line_data()).expect("first render");

    assert_eq!(doc.select_all(root, "ezchart").len(), 1);
    let groups = doc.select_all(root, "series");
    assert_eq!(groups.len(), 2);
    assert_eq!(doc.select_all(root, "dot").len(), 6);
    assert_eq!(doc.select_all(root, "line").len(), 2);
    let size = doc.len();

    // same data again: nothing is created or dropped
    chart.render(&mut doc, root, &line_data()).expect("idempotent render");
    assert_eq!(doc.len(), size);
    assert_eq!(doc.select_all(root, "series"), groups);

    // drop series b, grow series a
    let mut grown = line_data();
    grown.truncate(1);
    grown[0].values.push(DataValue::new(3.0, 6.0));
    chart.render(&mut doc, root, &grown).expect("update render");

    assert_eq!(doc.select_all(root, "ezchart").len(), 1);
    assert_eq!(doc.select_all(root, "series"), vec![groups[0]]);
    assert_eq!(doc.select_all(root, "dot").len(), 4);
    assert_eq!(doc.select_all(root, "line").len(), 1);
    assert_eq!(chart.y_scale().map(|s| s.domain().1), Some(6.0));
}

#[test]
fn candlestick_chart_classifies_days() {
    let data = vec![DataSeries::new(
        "ACME",
        vec![
            DataValue::candle("2024-03-04", 10.0, 12.0, 9.0, 11.0),
            DataValue::candle("2024-03-05", 11.0, 13.0, 10.0, 10.5),
            DataValue::candle("2024-03-06", 10.5, 15.0, 10.0, 14.0),
            DataValue::candle("2024-03-07", 14.0, 14.5, 13.0, 14.0),
        ],
    )];
    let mut doc = Document::new();
    let root = doc.root();
    let mut chart = CandlestickChart::new();
    chart.set_y_label("price").render(&mut doc, root, &data).expect("render");

    assert_eq!(doc.select_all(root, "candle").len(), 4);
    assert_eq!(doc.select_all(root, "up-day").len(), 2);
    // a doji is not an up day
    assert_eq!(doc.select_all(root, "down-day").len(), 2);
    assert_eq!(doc.select_all(root, "body").len(), 4);
    assert_eq!(doc.select_all(root, "high-low").len(), 4);
    let label = doc.select_all(root, "axis-label");
    assert!(label.iter().any(|&id| doc.text(id) == Some("price")));
}

#[test]
fn heat_map_radial_lays_out_cells_and_labels() {
    let mut doc = Document::new();
    let root = doc.root();
    let mut chart = HeatMapRadial::new();
    chart.render(&mut doc, root, &weekly_heat()).expect("render");

    assert_eq!(doc.select_all(root, "cell").len(), 12);
    assert_eq!(doc.select_all(root, "ring-label").len(), 3);

    let sectors = doc.select_all(root, "sector-label");
    assert_eq!(sectors.len(), 4);
    let offsets: Vec<&str> = sectors
        .iter()
        .filter_map(|&t| doc.children(t).first().copied())
        .filter_map(|tp| doc.attr(tp, "startOffset"))
        .collect();
    assert_eq!(offsets, vec!["0%", "25%", "50%", "75%"]);

    // every cell is filled from the threshold palette
    for cell in doc.select_all(root, "cell") {
        assert!(doc.attr(cell, "fill").is_some_and(|f| f.starts_with('#')));
    }
}

#[test]
fn fire_bubbles_from_dot_to_series() {
    let mut doc = Document::new();
    let root = doc.root();
    let mut chart = LineChart::new();

    let seen = Rc::new(RefCell::new(Vec::new()));
    for event in [CustomEvent::ValueClick, CustomEvent::SeriesClick] {
        let seen = seen.clone();
        chart.on(event, move |d| {
            seen.borrow_mut().push((event, d.series.clone(), d.value.as_ref().map(|(i, _)| *i)));
        });
    }
    chart.render(&mut doc, root, &line_data()).expect("render");

    let second_group = doc.select_all(root, "series")[1];
    let dot = doc.select_all(second_group, "dot")[2];
    let raised = chart.fire(&doc, dot, DomEvent::Click).expect("fire");
    assert_eq!(raised, vec![CustomEvent::ValueClick, CustomEvent::SeriesClick]);
    assert_eq!(
        *seen.borrow(),
        vec![(CustomEvent::ValueClick, "b".to_string(), Some(2)), (CustomEvent::SeriesClick, "b".to_string(), None)]
    );

    // no handler subscribed for hover: routes still fire, nothing is recorded
    let raised = chart.fire(&doc, dot, DomEvent::MouseOver).expect("fire hover");
    assert_eq!(raised, vec![CustomEvent::ValueMouseOver, CustomEvent::SeriesMouseOver]);
    assert_eq!(seen.borrow().len(), 2);
}

#[test]
fn unrenderable_input_is_an_error() {
    let mut doc = Document::new();
    let root = doc.root();
    let err = LineChart::new().render(&mut doc, root, &[]).unwrap_err();
    assert!(matches!(err, ChartError::NoData));

    let mut cramped = LineChart::new();
    cramped.set_width(40.0).set_margin(Insets::uniform(30));
    let err = cramped.render(&mut doc, root, &line_data()).unwrap_err();
    assert!(matches!(err, ChartError::EmptyPlotArea { .. }));
    assert!(doc.is_empty(), "failed renders leave nothing behind");

    let plain = vec![DataSeries::new("p", vec![DataValue::new("2024-01-01", 3.0)])];
    let err = CandlestickChart::new().render(&mut doc, root, &plain).unwrap_err();
    assert!(matches!(err, ChartError::InvalidValue { .. }));
    assert!(doc.is_empty());
}

#[test]
fn rejected_line_data_leaves_previous_render_intact() {
    let mut doc = Document::new();
    let root = doc.root();
    let mut chart = LineChart::new();
    chart.render(&mut doc, root, &line_data()).expect("render");
    let before = doc.markup(root);
    let size = doc.len();
    let y = chart.y_scale().copied();

    let mut bad = line_data();
    bad[1].values.push(DataValue::new("soon", 2.0));
    chart.set_width(900.0);
    let err = chart.render(&mut doc, root, &bad).unwrap_err();
    assert!(matches!(err, ChartError::InvalidValue { index: 3, .. }));

    assert_eq!(doc.markup(root), before);
    assert_eq!(doc.len(), size);
    assert_eq!(chart.y_scale().copied(), y);
}

#[test]
fn rejected_candles_leave_previous_render_intact() {
    let mut doc = Document::new();
    let root = doc.root();
    let mut chart = CandlestickChart::new();
    chart.render(&mut doc, root, &candles()).expect("render");
    let before = doc.markup(root);
    let x = chart.x_scale().copied();

    let mut bad = candles();
    bad.push(DataSeries::new("EMCA", vec![DataValue::new("2024-03-07", 12.0)]));
    chart.set_height(600.0);
    let err = chart.render(&mut doc, root, &bad).unwrap_err();
    assert!(matches!(err, ChartError::InvalidValue { .. }));

    assert_eq!(doc.markup(root), before);
    assert_eq!(chart.x_scale().copied(), x);
}

#[test]
fn candlestick_rerender_keeps_candle_nodes() {
    let mut doc = Document::new();
    let root = doc.root();
    let mut chart = CandlestickChart::new();
    chart.render(&mut doc, root, &candles()).expect("first render");
    let first = doc.select_all(root, "candle");
    let bodies = doc.select_all(root, "body");
    let size = doc.len();

    chart.render(&mut doc, root, &candles()).expect("same data");
    assert_eq!(doc.select_all(root, "candle"), first);
    assert_eq!(doc.select_all(root, "body"), bodies);
    assert_eq!(doc.len(), size);

    // roll the window one day forward
    let mut rolled = candles();
    rolled[0].values.remove(0);
    rolled[0].values.push(DataValue::candle("2024-03-07", 14.0, 14.5, 13.0, 14.0));
    chart.render(&mut doc, root, &rolled).expect("rolled");
    let after = doc.select_all(root, "candle");
    assert_eq!(after.len(), 3);
    assert_eq!(after[..2], first[1..]);
    assert!(!doc.contains(first[0]));
    assert_eq!(doc.select_all(root, "body").len(), 3);
}

#[test]
fn time_axis_ticks_sit_on_their_dates() {
    let data = vec![DataSeries::new(
        "a",
        vec![DataValue::new("2024-01-01", 1.0), DataValue::new("2024-01-11", 2.0), DataValue::new("2024-01-31", 4.0)],
    )];
    let mut doc = Document::new();
    let root = doc.root();
    let mut chart = LineChart::new();
    chart.set_width(340.0).set_margin(Insets::new(20, 20, 20, 20));
    chart.render(&mut doc, root, &data).expect("render");

    let Some(AxisScale::Time(x)) = chart.x_scale().cloned() else {
        panic!("expected a time x scale");
    };
    let expected = Axis::bottom(AxisScale::Time(x)).ticks();
    let x_axis = doc.select_all(root, "x-axis")[0];
    let ticks = doc.select_all(x_axis, "tick");
    assert_eq!(ticks.len(), expected.len());

    // 300px over 30 days
    let positions: Vec<f64> = ticks
        .iter()
        .filter_map(|&t| doc.attr(t, "transform"))
        .filter_map(|t| t.strip_prefix("translate(")?.strip_suffix(",0)")?.parse().ok())
        .collect();
    assert_eq!(positions.len(), ticks.len());
    for (p, tick) in positions.iter().zip(&expected) {
        assert!((p - tick.position).abs() < 1e-3);
        let days = (tick.value - expected[0].value) / 86_400_000.0;
        assert!((p - positions[0] - days * 10.0).abs() < 1e-3);
    }
    assert!(positions[0] >= 0.0 && positions[positions.len() - 1] <= 300.0);
    assert!(positions.windows(2).all(|w| w[0] < w[1]));

    // the dot on Jan 11 sits on the same 10px-per-day grid
    let dots = doc.select_all(root, "dot");
    assert_eq!(doc.attr_f64(dots[1], "cx"), Some(100.0));
}

#[test]
fn pointer_out_and_series_shapes_raise_their_events() {
    let mut doc = Document::new();
    let root = doc.root();
    let mut chart = LineChart::new();
    let seen = Rc::new(RefCell::new(Vec::new()));
    for event in CustomEvent::ALL {
        let seen = seen.clone();
        chart.on(event, move |d| seen.borrow_mut().push((event, d.series.clone())));
    }
    chart.render(&mut doc, root, &line_data()).expect("render");

    let group = doc.select_all(root, "series")[0];
    let dot = doc.select_all(group, "dot")[1];
    assert_eq!(
        chart.fire(&doc, dot, DomEvent::MouseOut).expect("out"),
        vec![CustomEvent::ValueMouseOut, CustomEvent::SeriesMouseOut]
    );

    // the line belongs to the whole series, so only series events fire
    let line = doc.select_all(group, "line")[0];
    for (ev, series_event) in [
        (DomEvent::MouseOver, CustomEvent::SeriesMouseOver),
        (DomEvent::MouseOut, CustomEvent::SeriesMouseOut),
        (DomEvent::Click, CustomEvent::SeriesClick),
    ] {
        assert_eq!(chart.fire(&doc, line, ev).expect("line"), vec![series_event]);
    }
    assert_eq!(
        *seen.borrow(),
        vec![
            (CustomEvent::ValueMouseOut, "a".to_string()),
            (CustomEvent::SeriesMouseOut, "a".to_string()),
            (CustomEvent::SeriesMouseOver, "a".to_string()),
            (CustomEvent::SeriesMouseOut, "a".to_string()),
            (CustomEvent::SeriesClick, "a".to_string()),
        ]
    );

    // the svg and plot groups carry no routes
    let svg = doc.select_all(root, "ezchart")[0];
    assert!(chart.fire(&doc, svg, DomEvent::MouseOut).expect("svg").is_empty());
}

#[test]
fn candle_parts_bubble_to_their_candle_and_series() {
    let mut doc = Document::new();
    let root = doc.root();
    let mut chart = CandlestickChart::new();
    chart.render(&mut doc, root, &candles()).expect("render");

    let candle = doc.select_all(root, "candle")[2];
    let wick = doc.select_child(candle, "line", "high-low").expect("wick");
    assert_eq!(
        chart.fire(&doc, wick, DomEvent::MouseOut).expect("wick"),
        vec![CustomEvent::ValueMouseOut, CustomEvent::SeriesMouseOut]
    );
    let group = doc.select_all(root, "series")[0];
    assert_eq!(chart.fire(&doc, group, DomEvent::MouseOver).expect("group"), vec![CustomEvent::SeriesMouseOver]);
    let datum = doc.datum(candle).expect("candle datum");
    assert_eq!(datum.value.as_ref().map(|(i, _)| *i), Some(2));
}
