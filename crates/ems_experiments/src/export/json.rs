use crate::metrics::CandidateResult;

pub(crate) fn export_to_json_impl(
    results: &[CandidateResult],
    file: std::fs::File,
) -> Result<(), Box<dyn std::error::Error>> {
    serde_json::to_writer_pretty(std::io::BufWriter::new(file), results)?;
    Ok(())
}
