use crate::candidate::Candidate;
use crate::metrics::CandidateResult;

/// Stations as `id@row:col` joined by `;`.
fn stations_column(candidate: &Candidate) -> String {
    candidate
        .stations
        .values()
        .map(|s| format!("{}@{}:{}", s.id, s.location.row, s.location.col))
        .collect::<Vec<_>>()
        .join(";")
}

/// Allocation as `id=A/R` joined by `;`, skipping empty stations.
fn allocation_column(candidate: &Candidate) -> String {
    candidate
        .allocation
        .iter()
        .filter(|(_, counts)| counts.total() > 0)
        .map(|(id, counts)| format!("{id}={}/{}", counts.ambulances, counts.rapid_response))
        .collect::<Vec<_>>()
        .join(";")
}

fn optional(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

pub(crate) fn export_to_csv_impl(
    results: &[CandidateResult],
    candidates: &[Candidate],
    file: std::fs::File,
) -> Result<(), Box<dyn std::error::Error>> {
    if results.len() != candidates.len() {
        return Err(format!(
            "results length ({}) doesn't match candidates length ({})",
            results.len(),
            candidates.len()
        )
        .into());
    }

    let mut wtr = csv::Writer::from_writer(file);
    wtr.write_record([
        "candidate_id",
        "stations",
        "allocation",
        "ambulances",
        "rapid_response",
        "fitness",
        "cardiac_count",
        "cat_a_count",
        "served",
        "unserved",
        "deferrals",
        "mean_response_min",
        "median_response_min",
        "p90_response_min",
        "error",
    ])?;

    for (result, candidate) in results.iter().zip(candidates) {
        wtr.write_record([
            result.candidate_id.to_string(),
            stations_column(candidate),
            allocation_column(candidate),
            result.ambulances.to_string(),
            result.rapid_response.to_string(),
            optional(result.fitness),
            result.cardiac_count.to_string(),
            result.cat_a_count.to_string(),
            result.served.to_string(),
            result.unserved.to_string(),
            result.deferrals.to_string(),
            result.mean_response_min.to_string(),
            result.median_response_min.to_string(),
            result.p90_response_min.to_string(),
            result.error.clone().unwrap_or_default(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
