//! @ai:module:intent Project the summary table into per-chart series data
//! @ai:module:layer application
//! @ai:module:public_api ChartKind, ChartData, ChartStyle, Series, Rgb
//! @ai:module:stateless true

use crate::config::ChartConfig;
use crate::error::Result;
use crate::results::{Minutes, SummaryTable};

pub const PUMP_A_MAX_QUEUE: &str = "Pump A Max Queue";
pub const AVG_FUEL_WAIT_A: &str = "Avg Fuel Wait A";
pub const AVG_FUEL_WAIT_B: &str = "Avg Fuel Wait B";
pub const PUMP_A_UTILIZATION: &str = "Pump A Utilization";
pub const PUMP_B_UTILIZATION: &str = "Pump B Utilization";
pub const CLERK_UTILIZATION: &str = "Clerk Utilization";
pub const AVG_STAY_TIME_A: &str = "Avg Stay Time A";

const DURATION_AXIS: &str = "模拟时长（分钟）";

/// matplotlib's default color cycle
const PALETTE: [Rgb; 10] = [
    Rgb(31, 119, 180),
    Rgb(255, 127, 14),
    Rgb(44, 160, 44),
    Rgb(214, 39, 40),
    Rgb(148, 103, 189),
    Rgb(140, 86, 75),
    Rgb(227, 119, 194),
    Rgb(127, 127, 127),
    Rgb(188, 189, 34),
    Rgb(23, 190, 207),
];

const SKY_BLUE: Rgb = Rgb(135, 206, 235);
const LIGHT_GREEN: Rgb = Rgb(144, 238, 144);
const SALMON: Rgb = Rgb(250, 128, 114);

/// @ai:intent Plain RGB color, independent of the drawing backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// @ai:intent One of the five comparison charts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    QueueLengths,
    WaitTimes,
    Utilization,
    PerformanceOverTime,
    StaffWorkload,
}

/// @ai:intent How the series of a chart are drawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChartStyle {
    Line,
    /// Bars for series `i` of `n` are offset by `(i - (n - 1) / 2) * width`
    GroupedBar { width: f64 },
}

/// @ai:intent One plotted series, one value per x category
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: String,
    pub values: Vec<f64>,
    pub color: Rgb,
    pub dashed: bool,
}

/// @ai:intent Everything needed to draw one chart
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub kind: ChartKind,
    pub title: String,
    pub x_desc: String,
    pub y_desc: String,
    pub categories: Vec<String>,
    pub series: Vec<Series>,
    pub style: ChartStyle,
}

impl ChartKind {
    pub const ALL: [ChartKind; 5] = [
        ChartKind::QueueLengths,
        ChartKind::WaitTimes,
        ChartKind::Utilization,
        ChartKind::PerformanceOverTime,
        ChartKind::StaffWorkload,
    ];

    /// @ai:intent Output file name of this chart
    /// @ai:effects pure
    pub fn file_name(&self) -> &'static str {
        match self {
            ChartKind::QueueLengths => "queue_lengths.png",
            ChartKind::WaitTimes => "wait_times.png",
            ChartKind::Utilization => "utilization.png",
            ChartKind::PerformanceOverTime => "performance_over_time.png",
            ChartKind::StaffWorkload => "staff_workload.png",
        }
    }

    /// @ai:intent Metric columns this chart reads
    /// @ai:effects pure
    pub fn required_metrics(&self) -> &'static [&'static str] {
        match self {
            ChartKind::QueueLengths => &[PUMP_A_MAX_QUEUE],
            ChartKind::WaitTimes => &[AVG_FUEL_WAIT_A, AVG_FUEL_WAIT_B],
            ChartKind::Utilization | ChartKind::StaffWorkload => {
                &[PUMP_A_UTILIZATION, PUMP_B_UTILIZATION, CLERK_UTILIZATION]
            }
            ChartKind::PerformanceOverTime => &[AVG_STAY_TIME_A],
        }
    }

    /// @ai:intent Union of the metrics all charts read
    /// @ai:effects pure
    pub fn all_required_metrics() -> Vec<&'static str> {
        let mut metrics: Vec<&'static str> = Self::ALL
            .iter()
            .flat_map(|k| k.required_metrics().iter().copied())
            .collect();
        metrics.sort_unstable();
        metrics.dedup();
        metrics
    }

    /// @ai:intent Build the series for this chart
    /// @ai:pre every requested (replications, duration) pair is in the table
    /// @ai:effects pure
    pub fn project(&self, table: &SummaryTable, config: &ChartConfig) -> Result<ChartData> {
        let durations = table.durations();
        let categories = durations.iter().map(|d| d.day_label()).collect();

        let (title, y_desc, series, style) = match self {
            ChartKind::QueueLengths => (
                "不同模拟时长下的A泵最大队列长度".to_string(),
                "最大队列长度",
                per_replication(table, &durations, &config.compared_replications, PUMP_A_MAX_QUEUE)?,
                ChartStyle::Line,
            ),
            ChartKind::WaitTimes => {
                let mut series = Vec::new();
                for &rep in &config.compared_replications {
                    series.push(Series {
                        label: format!("A泵 ({}次)", rep),
                        values: table.series(rep, &durations, AVG_FUEL_WAIT_A)?,
                        color: cycle(series.len()),
                        dashed: false,
                    });
                    series.push(Series {
                        label: format!("B泵 ({}次)", rep),
                        values: table.series(rep, &durations, AVG_FUEL_WAIT_B)?,
                        color: cycle(series.len()),
                        dashed: true,
                    });
                }
                (
                    "不同模拟时长下的平均等待时间".to_string(),
                    "平均等待时间（分钟）",
                    series,
                    ChartStyle::Line,
                )
            }
            ChartKind::Utilization => {
                let rep = config.utilization_replications;
                let labels = ["A泵利用率", "B泵利用率", "收银员利用率"];
                (
                    format!("设备利用率对比（{}次重复）", rep),
                    "利用率（%）",
                    per_metric(table, &durations, rep, &labels, &PALETTE[..3])?,
                    ChartStyle::Line,
                )
            }
            ChartKind::PerformanceOverTime => (
                "系统平均逗留时间随时间的变化".to_string(),
                "平均逗留时间（分钟）",
                per_replication(table, &durations, &config.compared_replications, AVG_STAY_TIME_A)?,
                ChartStyle::Line,
            ),
            ChartKind::StaffWorkload => {
                let rep = config.workload_replications;
                let labels = ["A泵操作员", "B泵操作员", "收银员"];
                (
                    format!("不同岗位员工工作强度对比（{}次重复）", rep),
                    "工作强度（%）",
                    per_metric(table, &durations, rep, &labels, &[SKY_BLUE, LIGHT_GREEN, SALMON])?,
                    ChartStyle::GroupedBar {
                        width: config.bar_width,
                    },
                )
            }
        };

        let x_desc = match self {
            ChartKind::StaffWorkload => "模拟时长",
            _ => DURATION_AXIS,
        };

        Ok(ChartData {
            kind: *self,
            title,
            x_desc: x_desc.to_string(),
            y_desc: y_desc.to_string(),
            categories,
            series,
            style,
        })
    }
}

impl std::fmt::Display for ChartKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.file_name().trim_end_matches(".png"))
    }
}

impl ChartData {
    /// @ai:intent Y range covering every value, with some headroom
    /// @ai:effects pure
    pub fn y_range(&self) -> (f64, f64) {
        let values = self.series.iter().flat_map(|s| s.values.iter().copied());
        let (mut lo, mut hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });

        if !lo.is_finite() || !hi.is_finite() {
            return (0.0, 1.0);
        }

        if let ChartStyle::GroupedBar { .. } = self.style {
            lo = lo.min(0.0);
            hi = hi.max(0.0);
        }

        let pad = if hi > lo { (hi - lo) * 0.05 } else { 1.0 };
        let lo = if lo == 0.0 { 0.0 } else { lo - pad };
        (lo, hi + pad)
    }

    /// @ai:intent X offset of series `index` within its category
    /// @ai:effects pure
    pub fn offset(&self, index: usize) -> f64 {
        match self.style {
            ChartStyle::Line => 0.0,
            ChartStyle::GroupedBar { width } => {
                let center = (self.series.len() as f64 - 1.0) / 2.0;
                (index as f64 - center) * width
            }
        }
    }
}

fn cycle(index: usize) -> Rgb {
    PALETTE[index % PALETTE.len()]
}

/// @ai:intent One series per replication count for a single metric
/// @ai:effects pure
fn per_replication(
    table: &SummaryTable,
    durations: &[Minutes],
    replications: &[u32],
    metric: &str,
) -> Result<Vec<Series>> {
    replications
        .iter()
        .enumerate()
        .map(|(i, &rep)| {
            Ok(Series {
                label: format!("重复{}次", rep),
                values: table.series(rep, durations, metric)?,
                color: cycle(i),
                dashed: false,
            })
        })
        .collect()
}

/// @ai:intent One series per utilization metric for a single replication count
/// @ai:effects pure
fn per_metric(
    table: &SummaryTable,
    durations: &[Minutes],
    replications: u32,
    labels: &[&str; 3],
    colors: &[Rgb],
) -> Result<Vec<Series>> {
    [PUMP_A_UTILIZATION, PUMP_B_UTILIZATION, CLERK_UTILIZATION]
        .iter()
        .zip(labels.iter())
        .zip(colors.iter())
        .map(|((metric, label), color)| {
            Ok(Series {
                label: label.to_string(),
                values: table.series(replications, durations, metric)?,
                color: *color,
                dashed: false,
            })
        })
        .collect()
}
