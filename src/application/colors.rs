// Deterministic per-layout-pass color assignment
use crate::domain::color::{Color, generate_colors};
use crate::domain::descriptor::BuildType;
use crate::domain::line::Line;
use std::collections::HashMap;

const SHADE_FILL_ALPHA: f64 = 0.2;
const HUE_OFFSET: f64 = 0.64;
const REFERENCE_TINT_LIGHTNESS: f64 = 0.9;

fn is_test_line(line: &Line) -> bool {
    line.descriptor.build_type != BuildType::Reference
}

/// Assign colors over the full current set of lines.
///
/// Test lines get evenly spaced hues in their original order. A reference
/// line pairs with its test-build counterpart via a lighter tint of the same
/// hue, except when it is the only non-test line: then it turns pure black,
/// since unselected legend entries and axis lines are already grey. A
/// reference line with no counterpart falls back to white.
///
/// Pure over the given slice; the same ordered line set always produces the
/// same assignment.
pub fn assign_colors(lines: &mut [Line]) {
    let test_count = lines.iter().filter(|line| is_test_line(line)).count();
    let mut colors = generate_colors(test_count, HUE_OFFSET).into_iter();
    let mut color_by_descriptor: HashMap<String, Color> = HashMap::new();

    for line in lines.iter_mut().filter(|line| is_test_line(line)) {
        let Some(color) = colors.next() else { break };
        color_by_descriptor.insert(line.descriptor.color_key(), color);
        line.color = color;
        line.shade_fill = color.with_alpha(SHADE_FILL_ALPHA);
    }

    let single_reference = lines.len() == test_count + 1;
    for line in lines.iter_mut() {
        if is_test_line(line) {
            continue;
        }
        if single_reference {
            line.color = Color::BLACK;
            line.shade_fill = Color::BLACK.with_alpha(SHADE_FILL_ALPHA);
            break;
        }
        match color_by_descriptor.get(&line.descriptor.color_key()) {
            Some(color) => {
                let tint = Color::hsl(color.h, 1.0, REFERENCE_TINT_LIGHTNESS);
                line.color = tint;
                line.shade_fill = tint.with_alpha(SHADE_FILL_ALPHA);
            }
            None => {
                line.color = Color::WHITE;
                line.shade_fill = Color::WHITE;
            }
        }
    }
}
