use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, ContentArrangement, Row, Table};

use crate::catalog::Program;
use crate::evaluation::{Evaluation, Metric};
use crate::geo::{ItineraryStatus, Leg};
use crate::verdict::{Classification, Tone};

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn tone_color(tone: Tone) -> Color {
    match tone {
        Tone::Positive => Color::Green,
        Tone::Neutral => Color::Yellow,
        Tone::Negative => Color::Red,
    }
}

fn verdict_cell(classification: &Classification) -> Cell {
    Cell::new(classification.verdict.label()).fg(tone_color(classification.verdict.tone()))
}

fn bar(percent: f64) -> String {
    let filled = (percent / 5.0).round().clamp(0.0, 20.0) as usize;
    format!("{}{}", "#".repeat(filled), ".".repeat(20 - filled))
}

pub fn render_programs_table(programs: &[&Program]) -> String {
    let mut table = new_table();
    table.set_header(vec!["ID", "Program", "Category", "Value (cpp)", "Ref. PPM"]);
    for program in programs {
        table.add_row(vec![
            program.id.clone(),
            program.name.clone(),
            program.category.to_string(),
            format!("{:.2}", program.value),
            program
                .reference_ppm
                .map(|ppm| format!("{ppm:.1}"))
                .unwrap_or_else(|| "-".to_string()),
        ]);
    }
    table.to_string()
}

pub fn render_evaluation_table(evaluation: &Evaluation) -> String {
    let mut table = new_table();
    table.set_header(vec!["Metric", "Value", "Goal", "Verdict", "Scale"]);

    let program = evaluation
        .program
        .as_ref()
        .map(|p| format!("{} ({})", p.name, p.id))
        .unwrap_or_else(|| "-".to_string());
    table.add_row(vec![
        "Program".to_string(),
        program,
        String::new(),
        String::new(),
        String::new(),
    ]);

    let currency = if evaluation.currency_recognized {
        evaluation.currency.clone()
    } else {
        format!("{} (unrecognized)", evaluation.currency)
    };
    table.add_row(vec![
        "Currency".to_string(),
        currency,
        String::new(),
        String::new(),
        String::new(),
    ]);

    match (&evaluation.valuation, &evaluation.value_verdict) {
        (Metric::Available(result), Some(verdict)) => {
            table.add_row(Row::from(vec![
                Cell::new("Cents per point"),
                Cell::new(format!("{:.2}", result.cpp)),
                Cell::new(verdict.goal()),
                verdict_cell(verdict),
                Cell::new(bar(verdict.scale.user_percent)),
            ]));
        }
        (Metric::Available(result), None) => {
            table.add_row(vec![
                "Cents per point".to_string(),
                format!("{:.2}", result.cpp),
                String::new(),
                String::new(),
                String::new(),
            ]);
        }
        (Metric::Unavailable(reason), _) => {
            table.add_row(vec![
                "Cents per point".to_string(),
                format!("- ({reason})"),
                String::new(),
                String::new(),
                String::new(),
            ]);
        }
    }

    let route = match &evaluation.itinerary {
        ItineraryStatus::Resolved { miles } => format!("{miles} mi"),
        ItineraryStatus::Incomplete => "-".to_string(),
        ItineraryStatus::Invalid { code, leg } => {
            format!("invalid code {code} on leg {}", leg + 1)
        }
    };
    table.add_row(vec![
        "Distance".to_string(),
        route,
        String::new(),
        String::new(),
        String::new(),
    ]);

    if let Some(metrics) = evaluation.distance_metrics() {
        let deal = if evaluation.great_cash_deal {
            Cell::new("Great Cash Deal").fg(Color::Green)
        } else {
            Cell::new("")
        };
        table.add_row(Row::from(vec![
            Cell::new("Cash per mile"),
            Cell::new(format!("{:.3}", metrics.cash_per_unit)),
            Cell::new(""),
            deal,
            Cell::new(""),
        ]));

        match (metrics.points_per_unit, &evaluation.efficiency_verdict) {
            (Some(ppm), Some(verdict)) => {
                table.add_row(Row::from(vec![
                    Cell::new("Points per mile"),
                    Cell::new(format!("{ppm:.2}")),
                    Cell::new(verdict.goal()),
                    verdict_cell(verdict),
                    Cell::new(bar(verdict.scale.user_percent)),
                ]));
            }
            (Some(ppm), None) => {
                table.add_row(vec![
                    "Points per mile".to_string(),
                    format!("{ppm:.2}"),
                    String::new(),
                    String::new(),
                    String::new(),
                ]);
            }
            (None, _) => {}
        }
    }
    table.to_string()
}

pub fn render_legs_table(legs: &[Leg], status: &ItineraryStatus) -> String {
    let mut table = new_table();
    table.set_header(vec!["Leg", "From", "To", "Miles"]);
    for (idx, leg) in legs.iter().enumerate() {
        table.add_row(vec![
            (idx + 1).to_string(),
            leg.from.clone(),
            leg.to.clone(),
            leg.miles.to_string(),
        ]);
    }

    let mut rendered = table.to_string();
    match status {
        ItineraryStatus::Resolved { miles } => {
            rendered.push_str(&format!("\nTotal distance: {miles} mi"));
        }
        ItineraryStatus::Incomplete => {
            rendered.push_str("\nRoute needs at least two airports");
        }
        ItineraryStatus::Invalid { code, leg } => {
            rendered.push_str(&format!("\nUnknown airport {code} on leg {}", leg + 1));
        }
    }
    rendered
}
