//! CSV rendering of a settlement result.
//!
//! One row per unit in result order, followed by a totals row. Column
//! headers are the ones expected by the spreadsheets networks already use.

use std::io::Write;

use sunshare_domain::settlement::SettlementResult;
use sunshare_domain::unit::UnitKind;

/// Column header of the balance export.
pub const HEADER: [&str; 8] = [
    "ID",
    "Nome",
    "Tipo",
    "Consumo (kWh)",
    "Tarifa (R$/kWh)",
    "Custo Total (R$)",
    "Geração (kWh)",
    "Pagamento Excedente (R$)",
];

/// Label of the trailing totals row.
pub const TOTALS_LABEL: &str = "Total";

/// Errors raised while rendering an export.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to write CSV")]
    Csv(#[from] csv::Error),

    #[error("CSV output is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}

fn kind_label(kind: UnitKind) -> &'static str {
    match kind {
        UnitKind::Consumer => "Consumidor",
        UnitKind::Generator => "Gerador",
    }
}

/// Write `result` as CSV to any writer.
///
/// # Errors
///
/// Returns [`ExportError::Csv`] if writing fails.
pub fn write_csv(result: &SettlementResult, writer: impl Write) -> Result<(), ExportError> {
    let mut wtr = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    wtr.write_record(HEADER)?;

    for row in &result.units {
        wtr.write_record(&[
            row.id.to_string(),
            row.name.clone(),
            kind_label(row.kind).to_string(),
            format!("{:.3}", row.consumption_kwh),
            row.cost_per_kwh.to_string(),
            format!("{:.2}", row.total_cost),
            format!("{:.3}", row.generation_kwh),
            format!("{:.2}", row.deficit_share),
        ])?;
    }

    wtr.write_record(&[
        TOTALS_LABEL.to_string(),
        String::new(),
        String::new(),
        format!("{:.3}", result.total_consumption),
        String::new(),
        format!("{:.2}", result.total_cost),
        format!("{:.3}", result.total_generation),
        format!("{:.2}", result.total_deficit_share),
    ])?;

    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Render `result` as a CSV string.
///
/// # Errors
///
/// See [`write_csv`].
pub fn to_csv_string(result: &SettlementResult) -> Result<String, ExportError> {
    let mut buf = Vec::new();
    write_csv(result, &mut buf)?;
    Ok(String::from_utf8(buf)?)
}
