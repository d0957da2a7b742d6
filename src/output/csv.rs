use anyhow::Result;

use crate::catalog::Program;
use crate::evaluation::Evaluation;
use crate::geo::Leg;

pub fn programs_to_csv(programs: &[&Program]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(["id", "name", "category", "value", "reference_ppm"])?;
    for program in programs {
        writer.write_record([
            program.id.clone(),
            program.name.clone(),
            program.category.as_slug().to_string(),
            format!("{:.2}", program.value),
            program
                .reference_ppm
                .map(|ppm| format!("{ppm:.2}"))
                .unwrap_or_default(),
        ])?;
    }
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}

pub fn evaluation_to_csv(evaluation: &Evaluation) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record([
        "program",
        "currency",
        "cpp",
        "value_verdict",
        "distance_miles",
        "cash_per_mile",
        "points_per_mile",
        "great_cash_deal",
        "efficiency_verdict",
    ])?;
    let metrics = evaluation.distance_metrics();
    writer.write_record([
        evaluation
            .program
            .as_ref()
            .map(|p| p.id.clone())
            .unwrap_or_default(),
        evaluation.currency.clone(),
        evaluation
            .cpp()
            .map(|cpp| format!("{cpp:.4}"))
            .unwrap_or_default(),
        evaluation
            .value_verdict
            .map(|c| c.verdict.label().to_string())
            .unwrap_or_default(),
        evaluation
            .itinerary
            .miles()
            .map(|miles| miles.to_string())
            .unwrap_or_default(),
        metrics
            .map(|m| format!("{:.4}", m.cash_per_unit))
            .unwrap_or_default(),
        metrics
            .and_then(|m| m.points_per_unit)
            .map(|ppm| format!("{ppm:.4}"))
            .unwrap_or_default(),
        evaluation.great_cash_deal.to_string(),
        evaluation
            .efficiency_verdict
            .map(|c| c.verdict.label().to_string())
            .unwrap_or_default(),
    ])?;
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}

pub fn legs_to_csv(legs: &[Leg]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(["leg", "from", "to", "miles"])?;
    for (idx, leg) in legs.iter().enumerate() {
        writer.write_record([
            (idx + 1).to_string(),
            leg.from.clone(),
            leg.to.clone(),
            leg.miles.to_string(),
        ])?;
    }
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}
