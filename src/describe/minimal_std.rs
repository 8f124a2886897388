// Minimal-std column selection.
//
// A node's "identity" is the eligible column whose values vary least
// across the node's items. Eligible columns are those numeric in the
// raw schema AND present in the clean schema, kept in clean-schema
// order; that fixed order is also the tie-break order, so selection is
// fully deterministic.

use crate::data::table::Table;
use crate::error::{Error, Result};
use crate::stats;

/// The eligible ("density") columns: numeric in raw, present in clean,
/// in clean-schema order. Compute once and reuse.
pub fn density_columns(raw: &Table, clean: &Table) -> Vec<String> {
    clean
        .column_names()
        .filter(|name| raw.numeric(name).is_some())
        .map(|name| name.to_string())
        .collect()
}

/// Among `columns`, restricted to the rows in `mask`, the column with
/// the smallest sample standard deviation. Ties go to the first column
/// in the given order (strict `<` during the scan).
pub fn minimal_std_column(clean: &Table, mask: &[usize], columns: &[String]) -> Result<String> {
    let mut best: Option<(&str, f64)> = None;
    for name in columns {
        let Some(values) = clean.masked_numeric(name, mask) else {
            continue;
        };
        let std = stats::sample_std(&values);
        match best {
            Some((_, best_std)) if std >= best_std => {}
            _ => best = Some((name.as_str(), std)),
        }
    }

    best.map(|(name, _)| name.to_string()).ok_or_else(|| {
        Error::Precondition(
            "no density columns available: need columns numeric in raw and present in clean"
                .to_string(),
        )
    })
}
