//! # Presentation
//!
//! Text renderings of a triangular map. `Display` prints one row per line, top row first. `pretty`
//! draws the triangle itself:
//!
//! ```text
//!    ╱╲
//!   ╱ 1╲
//!  ╱╲  ╱╲
//! ╱ 2╲╱ 3╲
//! ```
use std::fmt;

use itertools::Itertools;
use num_traits::ToPrimitive;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::map::TriangularMap;
use crate::storage::Storage;

/// How a single scalar is turned into text by `pretty`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ValueFormat {
    /// The `Display` implementation of the value.
    #[default]
    Display,
    /// Scientific notation with a fixed number of digits after the decimal point.
    Scientific {
        /// Digits after the decimal point.
        precision: usize,
    },
    /// Positional notation with a fixed number of digits after the decimal point.
    Positional {
        /// Digits after the decimal point.
        precision: usize,
    },
    /// Rounded to a number of decimals (half to even); zero or fewer decimals print an integer.
    Rounded {
        /// Decimals to keep, negative values round to tens, hundreds and so on.
        decimals: i32,
    },
}

impl ValueFormat {
    /// Format a scalar.
    ///
    /// The numeric formats fall back to `Display` for values that have no `f64` representation.
    pub fn format<T: fmt::Display + ToPrimitive>(&self, value: &T) -> String {
        let number = match (self, value.to_f64()) {
            (ValueFormat::Display, _) | (_, None) => return value.to_string(),
            (_, Some(number)) => number,
        };

        match *self {
            ValueFormat::Display => unreachable!("handled above"),
            ValueFormat::Scientific { precision } => signed_exponent(format!("{number:.precision$e}")),
            ValueFormat::Positional { precision } => format!("{number:.precision$}"),
            ValueFormat::Rounded { decimals } => {
                let rounded = if decimals >= 0 {
                    let factor = 10_f64.powi(decimals);
                    (number * factor).round_ties_even() / factor
                } else {
                    let factor = 10_f64.powi(-decimals);
                    (number / factor).round_ties_even() * factor
                };
                if decimals <= 0 && rounded.is_finite() {
                    (rounded as i64).to_string()
                } else {
                    rounded.to_string()
                }
            },
        }
    }
}

/// Rewrite Rust's `1.23e3` as `1.23e+03`: an explicit sign and at least two exponent digits.
fn signed_exponent(text: String) -> String {
    let Some((mantissa, exponent)) = text.split_once('e') else {
        // Infinite or not a number.
        return text;
    };
    match exponent.parse::<i32>() {
        Ok(exponent) => {
            let sign = if exponent < 0 { '-' } else { '+' };
            format!("{mantissa}e{sign}{:02}", exponent.unsigned_abs())
        },
        Err(_) => text,
    }
}

/// Settings of `TriangularMap::pretty`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PrettyOptions {
    /// Highest level to draw; the rows above it are left out.
    pub cut: Option<usize>,
    /// Formatting of the scalars.
    pub format: ValueFormat,
}

impl<T, S: Storage<Value=T>> TriangularMap<S> {
    /// Draw the map as a triangle.
    pub fn pretty(&self, options: &PrettyOptions) -> String
    where
        T: fmt::Display + ToPrimitive,
    {
        self.pretty_with(options.cut, |value| options.format.format(value))
    }

    /// Draw the map as a triangle, formatting scalars with a function.
    ///
    /// # Arguments
    ///
    /// * `cut`: Highest level to draw, `None` to draw all of them.
    /// * `format`: Text of a single scalar. Elements of more than one scalar are drawn as a
    ///   bracketed list.
    pub fn pretty_with(&self, cut: Option<usize>, mut format: impl FnMut(&T) -> String) -> String {
        let width = self.width();
        let drawn = |depth| cut.is_none_or(|cut| width - depth <= cut);

        let rows = (0..width)
            .map(|depth| if drawn(depth) {
                self.elements(depth).map(|element| self.element_text(element, &mut format)).collect()
            } else {
                Vec::new()
            })
            .collect::<Vec<Vec<_>>>();

        let max_width = rows.iter().flatten().map(|text| text.chars().count()).max().unwrap_or(0);
        let cell_width = max_width + max_width % 2;
        let lines_per_level = cell_width / 2 + 1;

        let mut drawing = String::new();
        for (depth, row) in rows.iter().enumerate() {
            if !drawn(depth) {
                continue;
            }
            let level = width - depth;
            let depth_indent = " ".repeat(lines_per_level * (level - 1));

            for line in 0..lines_per_level - 1 {
                if !drawing.is_empty() {
                    drawing.push('\n');
                }
                let within = " ".repeat(2 * line);
                let between = " ".repeat(2 * (lines_per_level - line - 1));

                drawing.push_str(&depth_indent);
                drawing.push_str(&" ".repeat(lines_per_level - line - 1));
                for _ in 0..depth {
                    drawing.push('╱');
                    drawing.push_str(&within);
                    drawing.push('╲');
                    drawing.push_str(&between);
                }
                drawing.push('╱');
                drawing.push_str(&within);
                drawing.push('╲');
            }

            drawing.push('\n');
            drawing.push_str(&depth_indent);
            drawing.push('╱');
            drawing.push_str(&row.iter().map(|text| format!("{text:>cell_width$}")).join("╲╱"));
            drawing.push('╲');
        }

        drawing
    }

    fn elements<'a>(&'a self, depth: usize) -> impl Iterator<Item=&'a [T]>
    where
        T: 'a,
    {
        let range = self.triangle().row(depth);
        self.storage().view(range, self.value_size()).chunks(self.value_size())
    }

    fn element_text(&self, element: &[T], format: &mut impl FnMut(&T) -> String) -> String {
        if self.value_size() == 1 {
            format(&element[0])
        } else {
            format!("[{}]", element.iter().map(format).join(" "))
        }
    }
}

impl<T: fmt::Display, S: Storage<Value=T>> fmt::Display for TriangularMap<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for depth in 0..self.width() {
            if depth > 0 {
                writeln!(f)?;
            }
            let mut texts = self.elements(depth).map(|element| self.element_text(element, &mut T::to_string));
            write!(f, "[{}]", texts.join(" "))?;
        }

        Ok(())
    }
}
