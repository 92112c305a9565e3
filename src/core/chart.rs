use crate::domain::model::RankedCountry;
use crate::utils::error::{PipelineError, Result};
use charts_rs::{svg_to_png, BarChart, Series};

const CHART_WIDTH: f32 = 1024.0;
const CHART_HEIGHT: f32 = 768.0;
const CHART_TITLE: &str = "Top 10 Countries by COVID-19 Vaccines Administered";
// Descriptive caption carried over as-is; the counts are raw doses.
const CHART_CAPTION: &str = "Vaccines Administered in Billions";

/// Renders the ranked countries as a vertical bar chart and encodes it to
/// PNG bytes. An empty input is an explicit error so callers never write an
/// axis-only image.
pub fn render_bar_chart(ranked: &[RankedCountry]) -> Result<Vec<u8>> {
    if ranked.is_empty() {
        return Err(PipelineError::EmptyChartError);
    }

    let countries: Vec<String> = ranked.iter().map(|c| c.country.clone()).collect();
    let counts: Vec<f32> = ranked
        .iter()
        .map(|c| c.vaccines_administered as f32)
        .collect();

    let mut chart = BarChart::new(vec![Series::new(String::new(), counts)], countries);
    chart.width = CHART_WIDTH;
    chart.height = CHART_HEIGHT;
    chart.title_text = CHART_TITLE.to_string();
    chart.sub_title_text = CHART_CAPTION.to_string();

    let svg = chart.svg().map_err(chart_error)?;
    let png = svg_to_png(&svg).map_err(chart_error)?;
    Ok(png)
}

fn chart_error<E: std::fmt::Display>(e: E) -> PipelineError {
    PipelineError::ChartError {
        message: e.to_string(),
    }
}
