// Chart layout - merging freshly fetched series into chart state
use crate::application::aggregate::aggregate_timeserieses;
use crate::application::colors::assign_colors;
use crate::domain::descriptor::{LevelOfDetail, LineDescriptor};
use crate::domain::line::Line;
use crate::domain::sample::{Range, Timeseries};

const Y_TICK_COUNT: usize = 5;

/// Y axis ticks, re-measured after every layout pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct YAxis {
    pub ticks: Vec<f64>,
}

/// The mutable state of one chart. Layout passes replace it wholesale;
/// nothing mutates a line in place.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartState {
    pub line_descriptors: Vec<LineDescriptor>,
    pub lines: Vec<Line>,
    pub range: Range,
    pub level_of_detail: LevelOfDetail,
    pub y_axis: YAxis,
    pub is_loading: bool,
}

impl ChartState {
    pub fn new(
        line_descriptors: Vec<LineDescriptor>,
        range: Range,
        level_of_detail: LevelOfDetail,
    ) -> Self {
        Self {
            line_descriptors,
            lines: Vec::new(),
            range,
            level_of_detail,
            y_axis: YAxis::default(),
            is_loading: false,
        }
    }
}

/// One layout pass: aggregate each line's freshly fetched serieses, replace
/// or append the line by descriptor equality, then recolor everything.
///
/// Lines not named in the batch are left untouched, so it does not matter
/// which line's data arrives first. A line whose aggregate came out empty is
/// skipped, not an error.
pub fn layout(
    mut state: ChartState,
    timeserieses_by_line: Vec<(LineDescriptor, Vec<Timeseries>)>,
) -> ChartState {
    for (descriptor, timeserieses) in timeserieses_by_line {
        let data = aggregate_timeserieses(
            &descriptor,
            &timeserieses,
            state.level_of_detail,
            &state.range,
        );
        if data.is_empty() {
            tracing::debug!(
                measurement = %descriptor.measurement,
                "no points in range for line"
            );
            continue;
        }

        let unit = timeserieses
            .first()
            .map(|series| series.unit.clone())
            .unwrap_or_default();
        let new_line = Line::new(descriptor, unit, data);

        match state
            .lines
            .iter()
            .position(|line| line.descriptor == new_line.descriptor)
        {
            Some(index) => state.lines[index] = new_line,
            None => state.lines.push(new_line),
        }
    }

    assign_colors(&mut state.lines);
    state
}

/// Evenly spaced ticks over the merged y extent of all lines.
pub fn measure_y_ticks(lines: &[Line]) -> YAxis {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for line in lines {
        for datum in &line.data {
            min = min.min(datum.y);
            max = max.max(datum.y);
        }
    }
    if !min.is_finite() || !max.is_finite() {
        return YAxis::default();
    }

    let step = (max - min) / (Y_TICK_COUNT - 1) as f64;
    YAxis {
        ticks: (0..Y_TICK_COUNT).map(|i| min + step * i as f64).collect(),
    }
}
