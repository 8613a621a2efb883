use std::{collections::BTreeMap, fs, path::Path};

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use itertools::Itertools;
use plotters::prelude::*;

use crate::{
    prelude::*,
    quantity::{KilowattHours, WattHours},
    statistics::{
        DailyProduction,
        GoalDay,
        HourlyProduction,
        PeriodProduction,
        ProductionSummary,
        RecentHour,
    },
};

const SINGLE_SIZE: (u32, u32) = (800, 600);
const MULTIPLE_SIZE: (u32, u32) = (480, 640);

/// Everything the chart set is rendered from.
#[must_use]
pub struct ReportCharts<'a> {
    pub hourly: &'a [HourlyProduction],
    pub daily: &'a [DailyProduction],
    pub weekly: &'a [PeriodProduction],
    pub monthly: &'a [PeriodProduction],
    pub goals: &'a [(WattHours, Vec<GoalDay>)],
    pub recent: &'a [RecentHour],
    pub recent_window: u32,
    pub summary: ProductionSummary,
}

impl ReportCharts<'_> {
    /// Render the whole chart set as SVG files under `directory`.
    ///
    /// File names are fixed by report type, so re-runs overwrite in place.
    #[instrument(skip_all, fields(directory = %directory.display()), name = "Rendering charts…")]
    pub fn render_to(&self, directory: &Path) -> Result {
        fs::create_dir_all(directory)
            .with_context(|| format!("failed to create `{}`", directory.display()))?;

        let total = format!("total: {:.0} kWh", self.summary.total.0);
        let until = self.daily.last().map_or_else(NaiveDate::default, |day| day.date);

        write_svg(directory, "kWh-date-hour.svg", &render_hourly(self.hourly)?)?;
        write_svg(directory, "kWh-date-day.svg", &self.render_daily(&total)?)?;
        write_svg(
            directory,
            "kWh-date-week.svg",
            &render_period_totals("kWh per week", self.weekly, until, &total)?,
        )?;
        write_svg(
            directory,
            "kWh-date-month.svg",
            &render_period_totals("kWh per month", self.monthly, until, &total)?,
        )?;
        write_svg(directory, "kWh-date-joined.svg", &self.render_joined(&total, until)?)?;
        write_svg(
            directory,
            &format!("kWh-hours-last-{}-days.svg", self.recent_window),
            &render_recent(self.recent, self.recent_window, self.summary.max_hour)?,
        )?;
        for (threshold, days) in self.goals {
            write_svg(
                directory,
                &format!("hours-of-{}Wh.svg", threshold.0),
                &render_goal(days, *threshold)?,
            )?;
        }
        Ok(())
    }

    fn render_daily(&self, total: &str) -> Result<String> {
        render_date_chart(
            "kWh per day",
            "kWh",
            self.summary.max_day.0.ceil().max(1.0),
            Some(total),
            &[DateSeries {
                label: "",
                color: BLUE,
                stroke_width: 1,
                points: step_points(&daily_points(self.daily)),
            }],
        )
    }

    fn render_joined(&self, total: &str, until: NaiveDate) -> Result<String> {
        render_date_chart(
            "kWh per day, averaged per week and month",
            "kWh per day",
            self.summary.max_day.0.ceil().max(1.0),
            Some(total),
            &[
                DateSeries {
                    label: "Day",
                    color: BLUE,
                    stroke_width: 1,
                    points: step_points(&daily_points(self.daily)),
                },
                DateSeries {
                    label: "Week",
                    color: GREEN,
                    stroke_width: 2,
                    points: step_points(&extended(mean_points(self.weekly), until)),
                },
                DateSeries {
                    label: "Month",
                    color: RED,
                    stroke_width: 3,
                    points: step_points(&extended(mean_points(self.monthly), until)),
                },
            ],
        )
    }
}

struct DateSeries<'a> {
    label: &'a str,
    color: RGBColor,
    stroke_width: u32,
    points: Vec<(NaiveDate, f64)>,
}

fn daily_points(daily: &[DailyProduction]) -> Vec<(NaiveDate, f64)> {
    daily.iter().map(|day| (day.date, day.energy.0)).collect()
}

fn mean_points(periods: &[PeriodProduction]) -> Vec<(NaiveDate, f64)> {
    periods.iter().map(|period| (period.starts_on, period.per_day_mean.0)).collect()
}

/// Duplicate each value at the start of the next interval, which draws the
/// series as post-step lines instead of diagonal interpolation.
fn step_points<X: Copy>(series: &[(X, f64)]) -> Vec<(X, f64)> {
    let mut points = Vec::with_capacity(series.len() * 2);
    for (&(x0, y0), &(x1, _)) in series.iter().tuple_windows() {
        points.push((x0, y0));
        points.push((x1, y0));
    }
    points.extend(series.last().copied());
    points
}

/// Repeat the final value at `until`, so the last period stays visible as a
/// full step.
fn extended<X: Copy + PartialOrd>(mut series: Vec<(X, f64)>, until: X) -> Vec<(X, f64)> {
    if let Some(&(last, value)) = series.last() {
        if last < until {
            series.push((until, value));
        }
    }
    series
}

fn write_svg(directory: &Path, file_name: &str, svg: &str) -> Result {
    if svg.is_empty() {
        warn!(file_name, "nothing to draw, skipping");
        return Ok(());
    }
    info!(file_name, "writing…");
    let path = directory.join(file_name);
    fs::write(&path, svg).with_context(|| format!("failed to write `{}`", path.display()))
}

/// One date-indexed line chart, shared by the day, week, month, joined and
/// goal reports. A legend is drawn when any series is labelled.
fn render_date_chart(
    caption: &str,
    y_desc: &str,
    y_top: f64,
    annotation: Option<&str>,
    series: &[DateSeries<'_>],
) -> Result<String> {
    let first = series.iter().filter_map(|series| series.points.first()).map(|&(x, _)| x).min();
    let last = series.iter().filter_map(|series| series.points.last()).map(|&(x, _)| x).max();
    let (Some(first), Some(last)) = (first, last) else {
        return Ok(String::new());
    };
    let last = if last > first { last } else { first.succ_opt().unwrap_or(last) };

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, SINGLE_SIZE).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(caption, ("sans-serif", 20))
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(first..last, 0.0..y_top)?;
        chart
            .configure_mesh()
            .y_desc(y_desc)
            .x_labels(6)
            .x_label_formatter(&|date| date.format("%Y-%m-%d").to_string())
            .label_style(("sans-serif", 12))
            .draw()?;

        let mut any_labelled = false;
        for series in series {
            let color = series.color;
            let anno = chart.draw_series(LineSeries::new(
                series.points.iter().copied(),
                color.stroke_width(series.stroke_width),
            ))?;
            if !series.label.is_empty() {
                any_labelled = true;
                anno.label(series.label).legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
                });
            }
        }
        if any_labelled {
            chart
                .configure_series_labels()
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .draw()?;
        }
        if let Some(annotation) = annotation {
            chart.draw_series(std::iter::once(Text::new(
                annotation.to_owned(),
                (first, y_top * 0.95),
                ("sans-serif", 14).into_font(),
            )))?;
        }
        root.present()?;
    }
    Ok(svg)
}

fn render_hourly(hourly: &[HourlyProduction]) -> Result<String> {
    let points: Vec<(NaiveDateTime, f64)> =
        hourly.iter().map(|record| (record.hour.naive_local(), record.energy.0)).collect();
    let (Some(&(first, _)), Some(&(last, _))) = (points.first(), points.last()) else {
        return Ok(String::new());
    };
    let last = if last > first {
        last
    } else {
        first.checked_add_signed(TimeDelta::hours(1)).unwrap_or(first)
    };
    let y_top = points.iter().map(|&(_, energy)| energy).fold(0.0, f64::max).max(0.1) * 1.05;

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, SINGLE_SIZE).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption("kWh per hour", ("sans-serif", 20))
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(RangedDateTime::from(first..last), 0.0..y_top)?;
        chart
            .configure_mesh()
            .y_desc("kWh")
            .x_labels(6)
            .x_label_formatter(&|time| time.format("%Y-%m-%d").to_string())
            .label_style(("sans-serif", 12))
            .draw()?;
        chart.draw_series(LineSeries::new(step_points(&points), &BLUE))?;
        root.present()?;
    }
    Ok(svg)
}

fn render_period_totals(
    caption: &str,
    periods: &[PeriodProduction],
    until: NaiveDate,
    total: &str,
) -> Result<String> {
    let points: Vec<(NaiveDate, f64)> =
        periods.iter().map(|period| (period.starts_on, period.total.0)).collect();
    let y_top = points.iter().map(|&(_, total)| total).fold(0.0, f64::max).max(1.0) * 1.05;
    render_date_chart(caption, "kWh", y_top, Some(total), &[DateSeries {
        label: "",
        color: BLUE,
        stroke_width: 1,
        points: step_points(&extended(points, until)),
    }])
}

fn render_goal(days: &[GoalDay], threshold: WattHours) -> Result<String> {
    let counts: Vec<(NaiveDate, f64)> =
        days.iter().map(|day| (day.date, f64::from(day.reached_hours))).collect();
    let means: Vec<(NaiveDate, f64)> =
        days.iter().map(|day| (day.date, day.trailing_mean)).collect();
    let y_top = counts.iter().map(|&(_, count)| count).fold(0.0, f64::max).max(1.0) * 1.05;
    render_date_chart(
        &format!("Hours of at least {threshold} per day"),
        "hours",
        y_top,
        None,
        &[
            DateSeries { label: "", color: BLUE, stroke_width: 1, points: counts },
            DateSeries { label: "", color: RED, stroke_width: 2, points: means },
        ],
    )
}

/// The small multiples: one panel per day of the recent window, most recent
/// day on top, hour of day on the shared x axis.
fn render_recent(recent: &[RecentHour], window: u32, max_hour: KilowattHours) -> Result<String> {
    let mut panels: BTreeMap<u32, Vec<&RecentHour>> = BTreeMap::new();
    for record in recent {
        panels.entry(record.days_past).or_default().push(record);
    }
    let Some(&deepest) = panels.keys().next_back() else {
        return Ok(String::new());
    };
    let n_panels = usize::try_from(deepest).unwrap_or(0) + 1;
    let y_top = max_hour.0.max(0.05);

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, MULTIPLE_SIZE).into_drawing_area();
        root.fill(&WHITE)?;
        let root = root.titled(&format!("Last {window} days"), ("sans-serif", 20))?;

        for (panel, days_past) in root.split_evenly((n_panels, 1)).iter().zip(0_u32..) {
            let is_bottom = days_past == deepest;
            let mut chart = ChartBuilder::on(panel)
                .x_label_area_size(if is_bottom { 20 } else { 0 })
                .y_label_area_size(25)
                .build_cartesian_2d(0_u32..24_u32, 0.0..y_top)?;
            chart
                .configure_mesh()
                .disable_mesh()
                .x_labels(13)
                .label_style(("sans-serif", 10))
                .draw()?;

            let Some(records) = panels.get(&days_past) else {
                continue;
            };
            chart.draw_series(records.iter().map(|record| {
                Rectangle::new(
                    [(record.hour_of_day, 0.0), (record.hour_of_day + 1, record.energy.0)],
                    BLUE.filled(),
                )
            }))?;

            let day_total: KilowattHours = records.iter().map(|record| record.energy).sum();
            if let Some(record) = records.first() {
                chart.draw_series(std::iter::once(Text::new(
                    format!("{} {:.1} kWh", record.date.format("%d.%m."), day_total.0),
                    (1_u32, y_top * 0.8),
                    ("sans-serif", 12).into_font(),
                )))?;
            }
        }
        root.present()?;
    }
    Ok(svg)
}

#[cfg(test)]
mod tests {
    use chrono_tz::Europe::Berlin;

    use super::*;

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_step_points() {
        assert_eq!(step_points(&[(0, 1.0), (2, 3.0)]), vec![(0, 1.0), (2, 1.0), (2, 3.0)]);
        assert_eq!(step_points(&[(0, 1.0)]), vec![(0, 1.0)]);
        assert!(step_points::<i32>(&[]).is_empty());
    }

    #[test]
    fn test_extended_repeats_the_final_value() {
        assert_eq!(extended(vec![(1, 2.0)], 3), vec![(1, 2.0), (3, 2.0)]);
        assert_eq!(extended(vec![(1, 2.0)], 1), vec![(1, 2.0)]);
        assert!(extended(Vec::new(), 3).is_empty());
    }

    #[test]
    fn test_render_date_chart() -> Result {
        let svg = render_date_chart("test", "kWh", 2.0, Some("total: 3 kWh"), &[DateSeries {
            label: "Day",
            color: BLUE,
            stroke_width: 1,
            points: vec![(ymd(2023, 10, 1), 1.0), (ymd(2023, 10, 2), 2.0)],
        }])?;
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>\n") || svg.ends_with("</svg>"));
        Ok(())
    }

    #[test]
    fn test_render_hourly() -> Result {
        let hourly = [
            HourlyProduction {
                hour: ymd(2023, 10, 1)
                    .and_hms_opt(10, 0, 0)
                    .unwrap()
                    .and_local_timezone(Berlin)
                    .unwrap(),
                energy: KilowattHours(0.1),
            },
            HourlyProduction {
                hour: ymd(2023, 10, 1)
                    .and_hms_opt(11, 0, 0)
                    .unwrap()
                    .and_local_timezone(Berlin)
                    .unwrap(),
                energy: KilowattHours(0.3),
            },
        ];
        let svg = render_hourly(&hourly)?;
        assert!(svg.starts_with("<svg"));
        Ok(())
    }

    #[test]
    fn test_render_empty_series() -> Result {
        assert!(render_date_chart("test", "kWh", 1.0, None, &[])?.is_empty());
        assert!(render_hourly(&[])?.is_empty());
        assert!(render_recent(&[], 14, KilowattHours(0.5))?.is_empty());
        Ok(())
    }

    #[test]
    fn test_render_recent() -> Result {
        let recent = [
            RecentHour {
                date: ymd(2023, 10, 2),
                hour_of_day: 12,
                days_past: 0,
                energy: KilowattHours(0.4),
            },
            RecentHour {
                date: ymd(2023, 10, 1),
                hour_of_day: 11,
                days_past: 1,
                energy: KilowattHours(0.2),
            },
        ];
        let svg = render_recent(&recent, 14, KilowattHours(0.4))?;
        assert!(svg.contains("Last 14 days"));
        Ok(())
    }

    #[test]
    fn test_render_to_writes_the_chart_set() -> Result {
        let hourly = [
            HourlyProduction {
                hour: ymd(2023, 10, 1)
                    .and_hms_opt(10, 0, 0)
                    .unwrap()
                    .and_local_timezone(Berlin)
                    .unwrap(),
                energy: KilowattHours(0.2),
            },
            HourlyProduction {
                hour: ymd(2023, 10, 2)
                    .and_hms_opt(11, 0, 0)
                    .unwrap()
                    .and_local_timezone(Berlin)
                    .unwrap(),
                energy: KilowattHours(0.4),
            },
        ];
        let daily = DailyProduction::aggregate(&hourly);
        let weekly = PeriodProduction::by_week(&daily)?;
        let monthly = PeriodProduction::by_month(&daily)?;
        let goals = vec![(WattHours(100), GoalDay::analyze(&hourly, WattHours(100)))];
        let recent = RecentHour::window(&hourly, 14);
        let summary = ProductionSummary::new(&hourly, &daily, KilowattHours(0.15));

        let directory = tempfile::tempdir()?;
        ReportCharts {
            hourly: &hourly,
            daily: &daily,
            weekly: &weekly,
            monthly: &monthly,
            goals: &goals,
            recent: &recent,
            recent_window: 14,
            summary,
        }
        .render_to(directory.path())?;

        for file_name in [
            "kWh-date-hour.svg",
            "kWh-date-day.svg",
            "kWh-date-week.svg",
            "kWh-date-month.svg",
            "kWh-date-joined.svg",
            "kWh-hours-last-14-days.svg",
            "hours-of-100Wh.svg",
        ] {
            assert!(directory.path().join(file_name).is_file(), "{file_name} is missing");
        }
        Ok(())
    }
}
