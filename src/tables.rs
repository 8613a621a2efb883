use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};

use crate::{
    quantity::KilowattHours,
    series::Median,
    statistics::{DailyProduction, GoalDay, PeriodProduction},
};

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED).apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.enforce_styling();
    table.set_header(header);
    table
}

fn energy_cell(energy: KilowattHours, median: KilowattHours) -> Cell {
    Cell::new(energy).set_alignment(CellAlignment::Right).fg(if energy >= median {
        Color::Green
    } else {
        Color::DarkYellow
    })
}

pub fn build_days_table(daily: &[DailyProduction]) -> Table {
    let median = daily.iter().map(|day| day.energy).median().unwrap_or(KilowattHours::ZERO);

    let mut table = new_table(vec!["Date", "Production"]);
    for day in daily {
        table.add_row(vec![Cell::new(day.date), energy_cell(day.energy, median)]);
    }
    table.add_row(vec![
        Cell::new("Total").add_attribute(Attribute::Bold),
        Cell::new(daily.iter().map(|day| day.energy).sum::<KilowattHours>())
            .set_alignment(CellAlignment::Right)
            .add_attribute(Attribute::Bold),
    ]);
    table
}

pub fn build_periods_table(
    periods: &[PeriodProduction],
    period_header: &str,
    date_format: &str,
) -> Table {
    let median = periods.iter().map(|period| period.total).median().unwrap_or(KilowattHours::ZERO);

    let mut table = new_table(vec![period_header, "Total", "Per day"]);
    for period in periods {
        table.add_row(vec![
            Cell::new(period.starts_on.format(date_format)),
            energy_cell(period.total, median),
            Cell::new(period.per_day_mean).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

#[must_use]
pub fn build_goal_table(days: &[GoalDay]) -> Table {
    let mut table = new_table(vec!["Date", "Hours", "7-day mean"]);
    for day in days {
        table.add_row(vec![
            Cell::new(day.date),
            Cell::new(day.reached_hours).set_alignment(CellAlignment::Right).fg(
                if day.reached_hours > 0 { Color::Green } else { Color::DarkGrey },
            ),
            Cell::new(format!("{:.1}", day.trailing_mean)).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_build_days_table() {
        let table = build_days_table(&[
            DailyProduction { date: ymd(2023, 10, 1), energy: KilowattHours(0.5) },
            DailyProduction { date: ymd(2023, 10, 2), energy: KilowattHours(1.0) },
        ]);

        let rendered = table.to_string();
        assert!(rendered.contains("2023-10-01"));
        assert!(rendered.contains("0.500 kWh"));
        assert!(rendered.contains("1.500 kWh"), "the total row is missing");
    }

    #[test]
    fn test_build_periods_table() {
        let table = build_periods_table(
            &[PeriodProduction {
                starts_on: ymd(2023, 10, 1),
                total: KilowattHours(4.0),
                per_day_mean: KilowattHours(2.0),
            }],
            "Month",
            "%Y-%m",
        );

        let rendered = table.to_string();
        assert!(rendered.contains("2023-10"));
        assert!(rendered.contains("4.000 kWh"));
    }

    #[test]
    fn test_build_goal_table() {
        let table = build_goal_table(&[GoalDay {
            date: ymd(2023, 10, 1),
            reached_hours: 3,
            trailing_mean: 3.0,
        }]);
        assert!(table.to_string().contains("3.0"));
    }
}
