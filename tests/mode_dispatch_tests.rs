use approx::assert_abs_diff_eq;
use chart_scales::api::{
    AxisRole, AxisType, BoxPlotConfig, BoxPlotGroup, ChartConfig, ForestPlotConfig,
    ForestPlotType, ModePlan, Orientation, RegressionConfig, ScaleRequest, Series, SeriesAxis,
    VisualizationType, XAxisConfig, resolve_domain, resolve_scales,
};
use chart_scales::core::{AxisValue, Row, ScaleDomain, ScaleKind, Viewport};
use chart_scales::ChartError;
use serde_json::json;

fn rows(value: serde_json::Value) -> Vec<Row> {
    serde_json::from_value(value).expect("rows")
}

fn years() -> Vec<AxisValue> {
    [2019, 2020, 2021].into_iter().map(AxisValue::from).collect()
}

fn bar_config() -> ChartConfig {
    ChartConfig::new(VisualizationType::Bar)
        .with_x_axis(XAxisConfig {
            data_key: "year".to_owned(),
            ..XAxisConfig::default()
        })
        .with_series(vec![Series::new("cases"), Series::new("deaths")])
}

fn bar_rows() -> Vec<Row> {
    rows(json!([
        { "year": 2019, "cases": 10, "deaths": 2 },
        { "year": 2020, "cases": 40, "deaths": 8 },
        { "year": 2021, "cases": 25, "deaths": 5 },
    ]))
}

#[test]
fn vertical_bar_lays_years_out_as_padded_points() {
    let config = bar_config();
    let data = bar_rows();
    let keys = years();
    let request = ScaleRequest::new(&config, &data, Viewport::new(300.0, 200.0))
        .with_min_max(0.0, 40.0)
        .with_x_axis_data(&keys);

    let set = resolve_scales(&request).expect("scales");
    let x = set.x_scale.expect("x scale");
    assert_eq!(x.kind(), ScaleKind::Point);
    assert_eq!(x.range(), (0.0, 300.0));
    assert_eq!(x.map_number(2019.0), Some(50.0));
    assert_eq!(x.map_number(2020.0), Some(150.0));
    assert_eq!(x.map_number(2021.0), Some(250.0));

    let y = set.y_scale.expect("y scale");
    assert_eq!(y.kind(), ScaleKind::Linear);
    assert_eq!(y.range(), (200.0, 0.0));
    assert_eq!(y.domain(), ScaleDomain::continuous(0.0, 40.0));

    let series = set.series_scale.expect("series scale");
    assert_eq!(series.map(&"cases".into()), Some(0.0));
    assert_eq!(series.map(&"deaths".into()), Some(300.0));

    let brush = set.x_scale_brush.expect("brush scale");
    assert_eq!(brush.kind(), ScaleKind::Point);
    assert_eq!(brush.map_number(2020.0), Some(150.0));

    assert!(set.g1x_scale.is_none());
    assert!(set.g2x_scale.is_none());
    assert!(set.x_scale_no_padding.is_none());
}

#[test]
fn horizontal_bar_swaps_value_and_category_axes() {
    let config = bar_config().with_orientation(Orientation::Horizontal);
    let data = bar_rows();
    let keys = years();
    let request = ScaleRequest::new(&config, &data, Viewport::new(400.0, 300.0))
        .with_min_max(10.0, 40.0)
        .with_x_axis_data(&keys);

    let set = resolve_scales(&request).expect("scales");
    let x = set.x_scale.expect("value scale");
    assert_eq!(x.kind(), ScaleKind::Linear);
    let (low, high) = x.domain().bounds().expect("continuous");
    assert_abs_diff_eq!(low, 10.3, epsilon = 1e-12);
    assert_eq!(high, 40.0);

    let y = set.y_scale.expect("category scale");
    assert_eq!(y.kind(), ScaleKind::Point);
    assert!(y.is_rounded());
    assert_eq!(y.map_number(2020.0), Some(150.0));

    let series = set.series_scale.expect("series scale");
    assert_eq!(series.range(), (0.0, 300.0));
    assert!(set.x_scale_brush.is_none());
}

#[test]
fn horizontal_bar_on_date_axis_uses_time_category_scale() {
    let config = bar_config()
        .with_orientation(Orientation::Horizontal)
        .with_x_axis(XAxisConfig {
            axis_type: AxisType::Date,
            data_key: "date".to_owned(),
            ..XAxisConfig::default()
        });
    let data = bar_rows();
    let keys = vec![AxisValue::number(3_000.0), AxisValue::number(1_000.0)];
    let request = ScaleRequest::new(&config, &data, Viewport::new(400.0, 300.0))
        .with_min_max(0.0, 40.0)
        .with_x_axis_data(&keys);

    let y = resolve_scales(&request).expect("scales").y_scale.expect("y");
    assert_eq!(y.kind(), ScaleKind::Time);
    assert_eq!(y.domain(), ScaleDomain::continuous(1_000.0, 3_000.0));
    assert_eq!(y.range(), (0.0, 300.0));
}

#[test]
fn sorted_date_overlay_replaces_x_with_time_scale() {
    let config = ChartConfig::new(VisualizationType::AreaChart)
        .with_x_axis(XAxisConfig {
            axis_type: AxisType::Date,
            sort_dates: true,
            data_key: "date".to_owned(),
            ..XAxisConfig::default()
        })
        .with_series(vec![Series::new("value")]);
    let data = rows(json!([{ "date": "2024-01-01", "value": 3 }]));
    let keys = vec![
        AxisValue::number(2_000.0),
        AxisValue::number(1_000.0),
        AxisValue::number(5_000.0),
    ];
    let request = ScaleRequest::new(&config, &data, Viewport::new(800.0, 400.0))
        .with_min_max(0.0, 3.0)
        .with_x_axis_data(&keys);

    let set = resolve_scales(&request).expect("scales");
    let x = set.x_scale.clone().expect("time scale");
    assert_eq!(x.kind(), ScaleKind::Time);
    assert_eq!(x.domain(), ScaleDomain::continuous(1_000.0, 5_000.0));
    assert_eq!(x.range(), (0.0, 800.0));
    assert_eq!(set.x_scale_brush, set.x_scale);
    assert_eq!(set.y_scale.expect("inherited y").kind(), ScaleKind::Linear);
}

#[test]
fn log_value_axis_shifts_near_zero_minimum_and_rounds_to_decades() {
    let config = bar_config().with_log_scale(true);
    let data = bar_rows();
    let keys = years();
    let request = ScaleRequest::new(&config, &data, Viewport::new(300.0, 200.0))
        .with_min_max(0.5, 40.0)
        .with_x_axis_data(&keys);

    let y = resolve_scales(&request).expect("scales").y_scale.expect("y");
    assert_eq!(y.kind(), ScaleKind::Log);
    assert!(y.is_nice());
    let (low, high) = y.domain().bounds().expect("continuous");
    // 0.6 after the epsilon shift, then floored to the previous power of ten.
    assert_abs_diff_eq!(low, 0.1, epsilon = 1e-12);
    assert_abs_diff_eq!(high, 100.0, epsilon = 1e-9);
}

#[test]
fn log_value_axis_keeps_minimum_on_exact_power() {
    let config = ChartConfig::new(VisualizationType::Line)
        .with_log_scale(true)
        .with_series(vec![Series::new("cases")]);
    let keys = years();
    let request = ScaleRequest::new(&config, &[], Viewport::new(300.0, 200.0))
        .with_min_max(1_000.0, 50_000.0)
        .with_x_axis_data(&keys);

    let y = resolve_scales(&request).expect("scales").y_scale.expect("y");
    assert_eq!(y.domain(), ScaleDomain::continuous(1_000.0, 100_000.0));
}

#[test]
fn log_value_axis_with_negative_minimum_is_rejected() {
    let config = bar_config().with_log_scale(true);
    let data = bar_rows();
    let keys = years();
    let request = ScaleRequest::new(&config, &data, Viewport::new(300.0, 200.0))
        .with_min_max(-5.0, 40.0)
        .with_x_axis_data(&keys);

    assert_eq!(
        resolve_scales(&request),
        Err(ChartError::InvalidLogDomain {
            low: -5.0,
            high: 40.0
        })
    );
}

#[test]
fn combo_value_axis_tops_out_at_left_axis_maximum() {
    let config = ChartConfig::new(VisualizationType::Combo)
        .with_x_axis(XAxisConfig {
            data_key: "year".to_owned(),
            ..XAxisConfig::default()
        })
        .with_series(vec![
            Series::new("cases"),
            Series::new("deaths").with_axis(SeriesAxis::Right),
        ]);
    let data = rows(json!([
        { "year": 2019, "cases": 10, "deaths": 200 },
        { "year": 2020, "cases": 35, "deaths": 500 },
    ]));
    let keys = vec![AxisValue::from(2019), AxisValue::from(2020)];
    let request = ScaleRequest::new(&config, &data, Viewport::new(300.0, 200.0))
        .with_min_max(0.0, 500.0)
        .with_x_axis_data(&keys);

    let y = resolve_scales(&request).expect("scales").y_scale.expect("y");
    assert_eq!(y.domain(), ScaleDomain::continuous(0.0, 35.0));

    let explicit = request.with_left_max(50.0);
    let y = resolve_scales(&explicit).expect("scales").y_scale.expect("y");
    assert_eq!(y.domain(), ScaleDomain::continuous(0.0, 50.0));
}

#[test]
fn deviation_bar_uses_band_categories_and_target_aware_domain() {
    let config = ChartConfig::new(VisualizationType::DeviationBar).with_x_axis(XAxisConfig {
        data_key: "state".to_owned(),
        target: Some(100.0),
        ..XAxisConfig::default()
    });
    let data = rows(json!([{ "state": "AL" }, { "state": "AK" }]));
    let keys = vec![AxisValue::from("AL"), AxisValue::from("AK")];
    let request = ScaleRequest::new(&config, &data, Viewport::new(500.0, 200.0))
        .with_min_max(-20.0, 80.0)
        .with_x_axis_data(&keys);

    let set = resolve_scales(&request).expect("scales");
    let y = set.y_scale.expect("band scale");
    assert_eq!(y.kind(), ScaleKind::Band);
    assert_eq!(y.bandwidth(), Some(100.0));

    let x = set.x_scale.expect("value scale");
    assert_eq!(x.kind(), ScaleKind::Linear);
    assert!(x.is_nice());
    assert!(x.is_rounded());
    // [-20.6, 100] rounds outward to [-30, 100].
    assert_eq!(x.domain(), ScaleDomain::continuous(-30.0, 100.0));
    assert!(set.series_scale.is_none());
}

#[test]
fn lollipop_deviation_widens_minimum_further() {
    let base = ChartConfig::new(VisualizationType::DeviationBar);
    let lollipop = base.clone().with_lollipop(true);
    let keys = vec![AxisValue::from("AL")];
    let data: Vec<Row> = Vec::new();

    let resolve = |config: &ChartConfig| {
        let request = ScaleRequest::new(config, &data, Viewport::new(500.0, 200.0))
            .with_min_max(-100.0, 50.0)
            .with_x_axis_data(&keys);
        resolve_domain(
            &ModePlan::from_config(config).expect("plan"),
            AxisRole::X,
            &request,
        )
        .and_then(|domain| domain.bounds())
        .expect("bounds")
    };

    assert_abs_diff_eq!(resolve(&base).0, -103.0, epsilon = 1e-9);
    assert_abs_diff_eq!(resolve(&lollipop).0, -105.0, epsilon = 1e-9);
}

#[test]
fn scatter_on_continuous_axis_rebases_x_to_zero() {
    let config = ChartConfig::new(VisualizationType::ScatterPlot)
        .with_x_axis(XAxisConfig {
            axis_type: AxisType::Continuous,
            data_key: "dose".to_owned(),
            ..XAxisConfig::default()
        })
        .with_series(vec![Series::new("response")]);
    let data = rows(json!([{ "dose": 5, "response": 1 }, { "dose": 12, "response": 3 }]));
    let keys = vec![AxisValue::from(5), AxisValue::from(12), AxisValue::from(8)];
    let request = ScaleRequest::new(&config, &data, Viewport::new(600.0, 300.0))
        .with_min_max(1.0, 3.0)
        .with_x_axis_data(&keys);

    let set = resolve_scales(&request).expect("scales");
    let x = set.x_scale.expect("x");
    assert_eq!(x.kind(), ScaleKind::Linear);
    assert_eq!(x.domain(), ScaleDomain::continuous(0.0, 12.0));
    assert_eq!(x.map_number(6.0), Some(300.0));
    assert_eq!(set.y_scale.expect("inherited y").range(), (300.0, 0.0));
}

#[test]
fn box_plot_widens_to_outliers_and_fences() {
    let config = ChartConfig::new(VisualizationType::BoxPlot).with_box_plot(BoxPlotConfig {
        plots: vec![BoxPlotGroup {
            column_outliers: vec![150.0],
            column_lower_bounds: vec![10.0],
            column_upper_bounds: vec![90.0],
        }],
        categories: vec![AxisValue::from("Group A")],
        hide_outliers: false,
    });
    let data: Vec<Row> = Vec::new();
    let request = ScaleRequest::new(&config, &data, Viewport::new(400.0, 300.0))
        .with_min_max(20.0, 80.0);

    let set = resolve_scales(&request).expect("scales");
    let y = set.y_scale.expect("value scale");
    assert_eq!(y.domain(), ScaleDomain::continuous(10.0, 150.0));
    assert_eq!(y.range(), (300.0, 0.0));
    assert!(y.is_rounded());

    let x = set.x_scale.expect("category scale");
    assert_eq!(x.kind(), ScaleKind::Band);
    assert!(x.map(&"Group A".into()).is_some());
}

#[test]
fn box_plot_without_configuration_is_a_contract_violation() {
    let config = ChartConfig::new(VisualizationType::BoxPlot);
    let data: Vec<Row> = Vec::new();
    let request = ScaleRequest::new(&config, &data, Viewport::new(400.0, 300.0))
        .with_min_max(0.0, 1.0);

    assert_eq!(
        resolve_scales(&request),
        Err(ChartError::ConfigurationMismatch {
            mode: "Box Plot",
            field: "boxplot"
        })
    );
}

#[test]
fn paired_bar_builds_mirrored_group_scales() {
    let config = ChartConfig::new(VisualizationType::PairedBar)
        .with_series(vec![Series::new("male"), Series::new("female")]);
    let data = rows(json!([
        { "age": "0-9", "male": 40, "female": 38 },
        { "age": "10-19", "male": 45, "female": 50 },
    ]));
    let request = ScaleRequest::new(&config, &data, Viewport::new(600.0, 300.0));

    let set = resolve_scales(&request).expect("scales");
    let g1 = set.g1x_scale.expect("group one");
    let g2 = set.g2x_scale.expect("group two");
    assert_eq!(g1.domain(), g2.domain());
    assert_eq!(g1.domain(), ScaleDomain::continuous(0.0, 50.0 * 1.02));
    assert_eq!(g1.range(), (300.0, 0.0));
    assert_eq!(g2.range(), (300.0, 600.0));
    assert!(set.x_scale.is_none());
    assert!(set.y_scale.is_none());
}

#[test]
fn paired_bar_without_two_series_draws_nothing() {
    let config =
        ChartConfig::new(VisualizationType::PairedBar).with_series(vec![Series::new("male")]);
    let data = rows(json!([{ "male": 40 }]));
    let request = ScaleRequest::new(&config, &data, Viewport::new(600.0, 300.0));

    let set = resolve_scales(&request).expect("scales");
    assert!(set.populated_fields().is_empty());
}

fn forest_config(scale_type: ForestPlotType) -> ChartConfig {
    ChartConfig::new(VisualizationType::ForestPlot).with_forest_plot(ForestPlotConfig {
        scale_type,
        lower: Some("lower".to_owned()),
        upper: Some("upper".to_owned()),
        row_height: 20.0,
        left_width_offset: 10.0,
        right_width_offset: 20.0,
        left_width_offset_mobile: 5.0,
        right_width_offset_mobile: 5.0,
        regression: RegressionConfig::default(),
    })
}

fn forest_rows() -> Vec<Row> {
    rows(json!([
        { "study": "A", "lower": "0.4", "upper": "1.8" },
        { "study": "B", "lower": "0.9", "upper": "3.2" },
        { "study": "C", "lower": 0.7, "upper": 2.1 },
    ]))
}

#[test]
fn linear_forest_plot_pads_domain_and_uses_desktop_offsets() {
    let config = forest_config(ForestPlotType::Linear);
    let data = forest_rows();
    let request = ScaleRequest::new(&config, &data, Viewport::new(1000.0, 400.0))
        .with_screen(Viewport::new(1200.0, 800.0));

    let set = resolve_scales(&request).expect("scales");
    let x = set.x_scale.expect("x");
    assert_eq!(x.kind(), ScaleKind::Linear);
    let (low, high) = x.domain().bounds().expect("continuous");
    assert_abs_diff_eq!(low, 0.4 - 5.0, epsilon = 1e-12);
    assert_abs_diff_eq!(high, 3.2 + 5.0, epsilon = 1e-12);
    assert_eq!(x.range(), (100.0, 800.0));

    let y = set.y_scale.expect("y");
    assert_eq!(y.domain(), ScaleDomain::continuous(0.0, 3.0));
    assert_eq!(y.range(), (40.0, 400.0));
}

#[test]
fn logarithmic_forest_plot_keeps_raw_span_and_picks_base_ten() {
    let config = forest_config(ForestPlotType::Logarithmic);
    let data = forest_rows();
    let request = ScaleRequest::new(&config, &data, Viewport::new(1000.0, 400.0))
        .with_screen(Viewport::new(1200.0, 800.0));

    let x = resolve_scales(&request).expect("scales").x_scale.expect("x");
    assert_eq!(x.kind(), ScaleKind::Log);
    assert_eq!(x.base(), Some(10.0));
    assert_eq!(x.domain(), ScaleDomain::continuous(0.4, 3.2));
}

#[test]
fn logarithmic_forest_plot_below_one_picks_base_two() {
    let config = forest_config(ForestPlotType::Logarithmic);
    let data = rows(json!([{ "lower": 0.2, "upper": 0.9 }]));
    let request = ScaleRequest::new(&config, &data, Viewport::new(1000.0, 400.0));

    let x = resolve_scales(&request).expect("scales").x_scale.expect("x");
    assert_eq!(x.base(), Some(2.0));
}

#[test]
fn logarithmic_forest_plot_with_zero_lower_bound_starts_at_epsilon() {
    let config = forest_config(ForestPlotType::Logarithmic);
    let data = rows(json!([
        { "lower": 0, "upper": 2 },
        { "lower": 0.5, "upper": 3 },
    ]));
    let request = ScaleRequest::new(&config, &data, Viewport::new(1000.0, 400.0));

    let set = resolve_scales(&request).expect("scales");
    let x = set.x_scale.expect("x");
    assert_eq!(x.kind(), ScaleKind::Log);
    assert_eq!(x.domain(), ScaleDomain::continuous(0.1, 3.0));
    assert_eq!(
        set.y_scale.expect("y").domain(),
        ScaleDomain::continuous(0.0, 2.0)
    );
}

#[test]
fn logarithmic_forest_plot_with_negative_lower_bound_keeps_row_axis() {
    let config = forest_config(ForestPlotType::Logarithmic);
    let data = rows(json!([
        { "lower": -0.5, "upper": 2 },
        { "lower": 0.5, "upper": 3 },
    ]));
    let request = ScaleRequest::new(&config, &data, Viewport::new(1000.0, 400.0));

    let set = resolve_scales(&request).expect("scales");
    assert!(set.x_scale.is_none());
    assert_eq!(
        set.y_scale.expect("y").domain(),
        ScaleDomain::continuous(0.0, 2.0)
    );
}

#[test]
fn base_two_forest_axis_gets_readable_ticks() {
    let config = forest_config(ForestPlotType::Logarithmic);
    let data = rows(json!([{ "lower": 0.4, "upper": 0.9 }]));
    let request = ScaleRequest::new(&config, &data, Viewport::new(1000.0, 400.0));

    let x = resolve_scales(&request).expect("scales").x_scale.expect("x");
    let ticks = x.ticks(10);
    assert!(ticks.len() > 2);
    assert_abs_diff_eq!(ticks[0], 0.4, epsilon = 1e-12);
    assert_abs_diff_eq!(ticks[ticks.len() - 1], 0.9, epsilon = 1e-12);
}

#[test]
fn forest_plot_at_breakpoint_width_uses_mobile_offsets() {
    let config = forest_config(ForestPlotType::Linear);
    let data = forest_rows();
    let request = ScaleRequest::new(&config, &data, Viewport::new(400.0, 400.0))
        .with_screen(Viewport::new(480.0, 800.0));

    let x = resolve_scales(&request).expect("scales").x_scale.expect("x");
    assert_eq!(x.range(), (20.0, 380.0));

    let wider = request.with_screen(Viewport::new(481.0, 800.0));
    let x = resolve_scales(&wider).expect("scales").x_scale.expect("x");
    assert_eq!(x.range(), (40.0, 320.0));
}

#[test]
fn forest_plot_regression_row_reserves_bottom_space() {
    let mut config = forest_config(ForestPlotType::Linear);
    if let Some(forest) = config.forest_plot.as_mut() {
        forest.regression.show_diamond = true;
    }
    let data = forest_rows();
    let request = ScaleRequest::new(&config, &data, Viewport::new(1000.0, 400.0));

    let y = resolve_scales(&request).expect("scales").y_scale.expect("y");
    assert_eq!(y.range(), (40.0, 380.0));
}

#[test]
fn forest_plot_without_bound_columns_is_a_contract_violation() {
    let mut config = forest_config(ForestPlotType::Linear);
    if let Some(forest) = config.forest_plot.as_mut() {
        forest.lower = None;
    }
    let data = forest_rows();
    let request = ScaleRequest::new(&config, &data, Viewport::new(1000.0, 400.0));

    assert_eq!(
        resolve_scales(&request),
        Err(ChartError::ConfigurationMismatch {
            mode: "Forest Plot",
            field: "forestPlot.lower"
        })
    );
}

#[test]
fn empty_inputs_leave_scales_unset_instead_of_failing() {
    let config = ChartConfig::new(VisualizationType::Bar);
    let data: Vec<Row> = Vec::new();
    let request = ScaleRequest::new(&config, &data, Viewport::new(300.0, 200.0));

    let set = resolve_scales(&request).expect("scales");
    assert!(set.x_scale.is_none());
    assert!(set.y_scale.is_none());
    assert!(set.series_scale.is_none());
    assert!(set.x_scale_brush.is_none());
}

#[test]
fn invalid_plot_viewport_is_rejected() {
    let config = bar_config();
    let data = bar_rows();
    let request = ScaleRequest::new(&config, &data, Viewport::new(-1.0, 200.0));

    assert!(matches!(
        resolve_scales(&request),
        Err(ChartError::InvalidViewport { .. })
    ));
}

#[test]
fn scale_set_serializes_kind_domain_and_range() {
    let config = bar_config();
    let data = bar_rows();
    let keys = years();
    let request = ScaleRequest::new(&config, &data, Viewport::new(300.0, 200.0))
        .with_min_max(0.0, 40.0)
        .with_x_axis_data(&keys);

    let json = resolve_scales(&request)
        .expect("scales")
        .to_json_pretty()
        .expect("json");
    let value: serde_json::Value = serde_json::from_str(&json).expect("parse");
    assert_eq!(value["xScale"]["kind"], "point");
    assert_eq!(value["xScale"]["domain"], json!([2019.0, 2020.0, 2021.0]));
    assert_eq!(value["yScale"]["domain"], json!({ "low": 0.0, "high": 40.0 }));
    assert_eq!(value["g1xScale"], serde_json::Value::Null);
}
