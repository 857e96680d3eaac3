use crate::cli::CheckArgs;
use crate::config::{ArrayEntry, ValuesFile};
use crate::error::{CliError, Result};
use gmxapi::params::MdParams;
use gmxapi::{make_array, validate};
use std::fmt;
use tracing::{info, instrument, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Array,
    Param,
}

/// Outcome of checking one declared array or parameter.
#[derive(Debug)]
pub struct EntryReport {
    pub kind: EntryKind,
    pub name: String,
    pub outcome: std::result::Result<String, CliError>,
}

impl fmt::Display for EntryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            EntryKind::Array => "array",
            EntryKind::Param => "param",
        };
        match &self.outcome {
            Ok(summary) => write!(f, "✓ {} {}: {}", kind, self.name, summary),
            Err(e) => write!(f, "✗ {} {}: {}", kind, self.name, e),
        }
    }
}

pub fn run(args: CheckArgs) -> Result<()> {
    let values = ValuesFile::load(&args.file)?;
    let reports = check_values(&values);
    for report in &reports {
        println!("{}", report);
    }

    let failed = reports.iter().filter(|r| r.outcome.is_err()).count();
    if failed > 0 {
        return Err(CliError::Validation {
            failed,
            total: reports.len(),
        });
    }
    info!("All {} entries are valid.", reports.len());
    Ok(())
}

/// Checks every entry, arrays first, without stopping at the first failure.
#[instrument(skip_all, name = "check_values")]
pub fn check_values(values: &ValuesFile) -> Vec<EntryReport> {
    let arrays = values.arrays.iter().map(|(name, entry)| EntryReport {
        kind: EntryKind::Array,
        name: name.clone(),
        outcome: check_array(name, entry),
    });

    let mut store = MdParams::new();
    let params = values.params.iter().map(move |(name, value)| {
        let outcome = store
            .apply_entry(name, value)
            .map_err(CliError::from)
            .map(|()| match store.get(name) {
                Some(stored) => stored.to_string(),
                None => String::new(),
            });
        EntryReport {
            kind: EntryKind::Param,
            name: name.clone(),
            outcome,
        }
    });

    let reports: Vec<_> = arrays.chain(params).collect();
    for report in reports.iter().filter(|r| r.outcome.is_err()) {
        warn!(entry = %report.name, "Entry failed validation.");
    }
    reports
}

fn check_array(name: &str, entry: &ArrayEntry) -> std::result::Result<String, CliError> {
    let to_cli = |source| CliError::Array {
        name: name.to_string(),
        source,
    };
    let input = entry.input(name)?;
    let shape = entry.shape();
    validate(input.as_ref(), shape.as_ref(), entry.dtype).map_err(to_cli)?;
    let array = make_array(input, shape, entry.dtype).map_err(to_cli)?;
    Ok(array.to_string())
}
