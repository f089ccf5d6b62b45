// Aggregation - merged display series with annotation icons
use crate::application::iterator::MultiTimeseriesIterator;
use crate::domain::descriptor::{LevelOfDetail, LineDescriptor};
use crate::domain::line::{DisplayDatum, Icon, IconColor};
use crate::domain::merged::MergedDatum;
use crate::domain::sample::{Range, Timeseries};

fn icon_for(datum: &MergedDatum) -> (Option<Icon>, Option<IconColor>) {
    if let Some(alert) = &datum.alert {
        if alert.improvement {
            return (Some(Icon::ThumbUp), Some(IconColor::Improvement));
        }
        let color = if alert.triaged() {
            IconColor::NeutralDark
        } else {
            IconColor::Error
        };
        return (Some(Icon::Error), Some(color));
    }
    if datum.diagnostics.is_some() {
        return (Some(Icon::Book), Some(IconColor::PrimaryDark));
    }
    (None, None)
}

/// Merge several raw sequences into one display series for a line.
///
/// Annotation icons are only computed above the coarsest level of detail.
/// Zero output points is a valid "no data" result, not an error.
pub fn aggregate_timeserieses(
    descriptor: &LineDescriptor,
    timeserieses: &[Timeseries],
    level_of_detail: LevelOfDetail,
    range: &Range,
) -> Vec<DisplayDatum> {
    let mut data = Vec::new();
    let mut books = 0usize;

    for (x, datum) in MultiTimeseriesIterator::new(descriptor, timeserieses, range) {
        let y = datum.statistic(descriptor.statistic);
        let mut display = DisplayDatum {
            x,
            y,
            datum,
            icon: None,
            icon_color: None,
        };
        if level_of_detail != LevelOfDetail::Xy {
            let (icon, icon_color) = icon_for(&display.datum);
            display.icon = icon;
            display.icon_color = icon_color;
            if display.icon == Some(Icon::Book) {
                books += 1;
            }
        }
        data.push(display);
    }

    // Some timeseries carry diagnostics on most points. Book icons on most
    // points are slow to render and not helpful, so hide them; the
    // diagnostics themselves stay on each datum.
    if books * 2 > data.len() {
        for display in &mut data {
            if display.icon == Some(Icon::Book) {
                display.icon = None;
                display.icon_color = None;
            }
        }
    }

    // The merge yields ascending x already; re-sort in case several merged
    // points collapsed onto one revision.
    data.sort_by_key(|display| display.x);
    data
}
