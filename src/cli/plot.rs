use std::fmt;
use std::path::Path;

use chrono::{Datelike, NaiveDate};
use svg::{
    node::element::{path::Data, Line, Path as SvgPath},
    Document,
};

use crate::lib::{
    error::{Error, Result},
    summary::WeekSummary,
};

pub struct Plotter<'d> {
    data: &'d [WeekSummary],
}

impl<'d> Plotter<'d> {
    pub fn from(data: &'d [WeekSummary]) -> Self {
        Self { data }
    }

    pub fn sparkline(&self) -> Sparkline {
        Sparkline {
            values: self.data.iter().map(|w| w.average()).collect(),
        }
    }

    pub fn save_svg(&self, file: &Path) -> Result<()> {
        svg::save(file, &self.step_drawer().render()).map_err(|source| Error::Chart {
            path: file.to_path_buf(),
            source,
        })
    }

    fn step_drawer(&self) -> StepDrawer {
        StepDrawer {
            // a week covers its last day entirely
            steps: self
                .data
                .iter()
                .map(|w| ((w.start(), w.end().succ_opt().unwrap_or(w.end())).to_range(), w.average()))
                .collect(),
        }
    }
}

/// One character per value, scaled between the smallest and largest
pub struct Sparkline {
    values: Vec<i64>,
}

const TICKS: &[char] = &['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

impl fmt::Display for Sparkline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let min = self.values.iter().copied().min().unwrap_or(0);
        let max = self.values.iter().copied().max().unwrap_or(0);
        let span = max - min;
        let top = TICKS.len() as i64 - 1;
        for v in &self.values {
            let idx = if span == 0 { top / 2 } else { (v - min) * top / span };
            write!(f, "{}", TICKS[idx as usize])?;
        }
        Ok(())
    }
}

pub trait Scalar {
    fn to_scalar(&self) -> i64;
}

pub trait ScalarRange {
    fn to_range(&self) -> (i64, i64);
}

impl Scalar for i64 {
    fn to_scalar(&self) -> i64 {
        *self
    }
}

impl Scalar for NaiveDate {
    fn to_scalar(&self) -> i64 {
        self.num_days_from_ce() as i64
    }
}

impl<T> ScalarRange for (T, T)
where
    T: Scalar,
{
    fn to_range(&self) -> (i64, i64) {
        (self.0.to_scalar(), self.1.to_scalar())
    }
}

#[derive(Debug)]
struct StepDrawer {
    steps: Vec<((i64, i64), i64)>,
}

impl StepDrawer {
    fn render(&self) -> Document {
        let (xmin, ymin, width, height) = {
            let mut xmin = i64::MAX;
            let mut xmax = i64::MIN;
            // the x axis stays in view
            let mut ymin = 0;
            let mut ymax = 0;
            for ((start, end), y) in &self.steps {
                xmin = xmin.min(*start);
                xmax = xmax.max(*end);
                ymin = ymin.min(*y);
                ymax = ymax.max(*y);
            }
            if self.steps.is_empty() {
                xmin = 0;
                xmax = 1;
            }
            (xmin, ymin, (xmax - xmin).max(1), (ymax - ymin).max(1))
        };
        let fheight = 700.0;
        let fwidth = 1000.0;
        let stroke_width = 2.0;
        let margin = 20.0;
        let resize_x = |x: i64| (x - xmin) as f64 / width as f64 * fwidth;
        let resize_y = |y: i64| (height - (y - ymin)) as f64 / height as f64 * fheight;
        let data = self.steps.iter().fold(Data::new(), |data, ((start, end), y)| {
            data.move_to((resize_x(*start), resize_y(*y)))
                .line_to((resize_x(*end), resize_y(*y)))
        });
        let steps = SvgPath::new()
            .set("fill", "none")
            .set("stroke", COLOR)
            .set("stroke-width", 2.0 * stroke_width)
            .set("d", data);
        let yaxis = Line::new()
            .set("x1", 0.0)
            .set("x2", 0.0)
            .set("y1", 0.0)
            .set("y2", fheight)
            .set("stroke", "black")
            .set("stroke-width", stroke_width);
        let xaxis = Line::new()
            .set("x1", 0.0)
            .set("x2", fwidth)
            .set("y1", resize_y(0))
            .set("y2", resize_y(0))
            .set("stroke", "black")
            .set("stroke-width", stroke_width);
        Document::new()
            .add(steps)
            .add(yaxis)
            .add(xaxis)
            .set("viewBox", (-margin, -margin, fwidth + 2.0 * margin, fheight + 2.0 * margin))
    }
}

const COLOR: &str = "red";
