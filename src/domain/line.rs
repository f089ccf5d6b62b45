// Render-ready chart line domain models
use crate::domain::color::Color;
use crate::domain::descriptor::LineDescriptor;
use crate::domain::merged::MergedDatum;
use crate::domain::sample::Revision;

/// Marker drawn on a display datum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    /// Improvement alert.
    ThumbUp,
    /// Regression alert.
    Error,
    /// Diagnostics attached.
    Book,
    /// No recent upload.
    Clock,
}

/// Semantic icon color, resolved to a theme color by the rendering layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconColor {
    Improvement,
    Error,
    NeutralDark,
    PrimaryDark,
}

/// One plotted point: chart coordinates plus the merged datum behind them.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayDatum {
    pub x: Revision,
    pub y: f64,
    pub datum: MergedDatum,
    pub icon: Option<Icon>,
    pub icon_color: Option<IconColor>,
}

/// One render-ready chart line. The color fields are reassigned on every
/// layout pass based on the current sibling-line set.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub descriptor: LineDescriptor,
    pub unit: String,
    pub color: Color,
    pub shade_fill: Color,
    pub data: Vec<DisplayDatum>,
    pub stroke_width: u32,
}

impl Line {
    pub fn new(descriptor: LineDescriptor, unit: String, data: Vec<DisplayDatum>) -> Self {
        Self {
            descriptor,
            unit,
            color: Color::WHITE,
            shade_fill: Color::WHITE,
            data,
            stroke_width: 1,
        }
    }
}
