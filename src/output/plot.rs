//! SVG charts of a finished run. Rendering problems are logged and never fail the run.

use std::error::Error;
use std::ops::Range;
use std::path::{Path, PathBuf};

use itertools::izip;
use plotters::prelude::*;
use tracing::{debug, warn};

use crate::config::{Bounds, Configuration};
use crate::optimizer::{POWER_HEATER, TEMPERATURE_HOUSE};
use crate::series::DerivedSeries;
use crate::simulation::SolveResult;

type PlotResult = Result<(), Box<dyn Error>>;

const SIZE: (u32, u32) = (1400, 700);
const AMBIENT: RGBColor = RGBColor(255, 70, 0);
const PRICE: RGBColor = RGBColor(255, 109, 0);

/// Inputs shared by every chart
struct ChartData<'a> {
    config: &'a Configuration,
    times: Vec<f64>,
    step: f64,
    ambient: &'a [f64],
    price: &'a [f64],
    temperature: Option<Vec<f64>>,
    power: Option<Vec<f64>>,
    total_cost: f64,
}

/// Render `temp_power.svg`, `bounds.svg`, `price.svg` and `cost.svg` into `directory`.
///
/// Returns the charts that were written.
pub fn render_all(
    config: &Configuration,
    series: &DerivedSeries,
    result: &SolveResult,
    directory: &Path,
) -> Vec<PathBuf> {
    let data = ChartData {
        config,
        times: series.raw_time.iter().map(|&t| f64::from(t)).collect(),
        step: f64::from(config.step_size()),
        ambient: &series.temperature_ambient,
        price: &series.cost_electricity,
        temperature: result.get(TEMPERATURE_HOUSE).map(|s| s.values_only()),
        power: result.get(POWER_HEATER).map(|s| s.values_only()),
        total_cost: result.objective_function,
    };

    let charts: [(&str, fn(&ChartData<'_>, &Path) -> PlotResult); 4] = [
        ("temp_power", plot_temp_power),
        ("bounds", plot_bounds),
        ("price", plot_price),
        ("cost", plot_cost),
    ];

    let mut written = Vec::new();
    for (name, plot) in charts {
        let path = directory.join(format!("{name}.svg"));
        match plot(&data, &path) {
            Ok(()) => {
                debug!(path = %path.display(), "chart written");
                written.push(path);
            }
            Err(error) => warn!(chart = name, %error, "failed to render chart"),
        }
    }
    written
}

fn require<'a>(values: &'a Option<Vec<f64>>, name: &str) -> Result<&'a [f64], Box<dyn Error>> {
    values
        .as_deref()
        .ok_or_else(|| format!("'{name}' was not extracted").into())
}

/// Post-step polyline: each value holds until the next step starts.
fn step_points(times: &[f64], values: &[f64], step: f64) -> Vec<(f64, f64)> {
    times
        .iter()
        .zip(values)
        .flat_map(|(&t, &v)| [(t, v), (t + step, v)])
        .collect()
}

fn value_range<'a>(series: impl IntoIterator<Item = &'a f64>) -> Range<f64> {
    let (min, max) = series
        .into_iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    if !min.is_finite() || !max.is_finite() {
        return 0.0..1.0;
    }
    let padding = ((max - min) * 0.1).max(0.5);
    (min - padding)..(max + padding)
}

fn time_range(data: &ChartData<'_>) -> Range<f64> {
    0.0..f64::from(data.config.cardinality_horizon())
}

fn bound_line(data: &ChartData<'_>, value: f64) -> Vec<(f64, f64)> {
    let range = time_range(data);
    vec![(range.start, value), (range.end, value)]
}

fn legend_line(color: RGBColor) -> impl Fn((i32, i32)) -> PathElement<(i32, i32)> {
    move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
}

fn plot_temp_power(data: &ChartData<'_>, path: &Path) -> PlotResult {
    let temperature = require(&data.temperature, TEMPERATURE_HOUSE)?;
    let power = require(&data.power, POWER_HEATER)?;

    let root = SVGBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Optimal power and temperature", ("sans-serif", 24))
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(60)
        .right_y_label_area_size(60)
        .build_cartesian_2d(time_range(data), value_range(temperature.iter().chain(data.ambient)))?
        .set_secondary_coord(time_range(data), value_range(power));

    chart
        .configure_mesh()
        .x_desc("Time Horizon [h]")
        .y_desc("Temperature [C]")
        .draw()?;
    chart.configure_secondary_axes().y_desc("Power [kW]").draw()?;

    chart
        .draw_series(LineSeries::new(
            step_points(&data.times, temperature, data.step),
            RED.stroke_width(2),
        ))?
        .label("Temperature house")
        .legend(legend_line(RED));
    chart
        .draw_series(LineSeries::new(
            step_points(&data.times, data.ambient, data.step),
            AMBIENT.stroke_width(2),
        ))?
        .label("Temperature ambient")
        .legend(legend_line(AMBIENT));
    chart
        .draw_secondary_series(LineSeries::new(
            step_points(&data.times, power, data.step),
            BLUE.stroke_width(2),
        ))?
        .label("Power heater")
        .legend(legend_line(BLUE));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;
    root.present()?;
    Ok(())
}

fn plot_bounds(data: &ChartData<'_>, path: &Path) -> PlotResult {
    let temperature = require(&data.temperature, TEMPERATURE_HOUSE)?;
    let power = require(&data.power, POWER_HEATER)?;
    let Bounds {
        min: t_min,
        max: t_max,
    } = data.config.temperature_bounds();
    let Bounds {
        min: p_min,
        max: p_max,
    } = data.config.power_bounds();

    let root = SVGBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Variables and their bounds", ("sans-serif", 24))
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(60)
        .right_y_label_area_size(60)
        .build_cartesian_2d(
            time_range(data),
            value_range(temperature.iter().chain([&t_min, &t_max])),
        )?
        .set_secondary_coord(time_range(data), value_range(power.iter().chain([&p_min, &p_max])));

    chart
        .configure_mesh()
        .x_desc("Time Horizon [h]")
        .y_desc("Temperature [C]")
        .draw()?;
    chart.configure_secondary_axes().y_desc("Power [kW]").draw()?;

    for (value, label) in [(t_min, Some("Temperature bounds")), (t_max, None)] {
        let drawn = chart.draw_series(LineSeries::new(bound_line(data, value), RED.mix(0.7)))?;
        if let Some(label) = label {
            drawn.label(label).legend(legend_line(RED));
        }
    }
    chart
        .draw_series(LineSeries::new(
            step_points(&data.times, temperature, data.step),
            RED.stroke_width(2),
        ))?
        .label("Temperature house")
        .legend(legend_line(RED));

    for (value, label) in [(p_min, Some("Power bounds")), (p_max, None)] {
        let drawn =
            chart.draw_secondary_series(LineSeries::new(bound_line(data, value), BLUE.mix(0.7)))?;
        if let Some(label) = label {
            drawn.label(label).legend(legend_line(BLUE));
        }
    }
    chart
        .draw_secondary_series(LineSeries::new(
            step_points(&data.times, power, data.step),
            BLUE.stroke_width(2),
        ))?
        .label("Power heater")
        .legend(legend_line(BLUE));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;
    root.present()?;
    Ok(())
}

fn plot_price(data: &ChartData<'_>, path: &Path) -> PlotResult {
    let power = require(&data.power, POWER_HEATER)?;
    let caption = format!("Total cost: ${:.2}", data.total_cost);

    let root = SVGBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(&caption, ("sans-serif", 24))
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(60)
        .right_y_label_area_size(60)
        .build_cartesian_2d(time_range(data), value_range(data.price))?
        .set_secondary_coord(time_range(data), value_range(power));

    chart
        .configure_mesh()
        .x_desc("Time Horizon [h]")
        .y_desc("Price [$/kWh]")
        .draw()?;
    chart.configure_secondary_axes().y_desc("Power [kW]").draw()?;

    chart
        .draw_series(LineSeries::new(
            step_points(&data.times, data.price, data.step),
            PRICE.stroke_width(2),
        ))?
        .label("Price electricity")
        .legend(legend_line(PRICE));
    chart
        .draw_secondary_series(LineSeries::new(
            step_points(&data.times, power, data.step),
            BLUE.stroke_width(2),
        ))?
        .label("Power heater")
        .legend(legend_line(BLUE));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;
    root.present()?;
    Ok(())
}

fn plot_cost(data: &ChartData<'_>, path: &Path) -> PlotResult {
    let power = require(&data.power, POWER_HEATER)?;
    let costs: Vec<f64> = izip!(data.price, power)
        .map(|(price, power)| price * power * data.step)
        .collect();
    let caption = format!("Total cost: ${:.2}", data.total_cost);

    let root = SVGBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(&caption, ("sans-serif", 24))
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(60)
        .build_cartesian_2d(time_range(data), value_range(&costs))?;

    chart
        .configure_mesh()
        .x_desc("Time Horizon [h]")
        .y_desc("Cost [$]")
        .draw()?;

    chart
        .draw_series(LineSeries::new(
            step_points(&data.times, &costs, data.step),
            RED.stroke_width(2),
        ))?
        .label("Cost power")
        .legend(legend_line(RED));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;
    root.present()?;
    Ok(())
}
