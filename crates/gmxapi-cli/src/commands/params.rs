use crate::cli::ParamsArgs;
use crate::error::Result;
use gmxapi::params::{known_parameters, parameter_type};

pub fn run(args: ParamsArgs) -> Result<()> {
    for line in describe(args.name.as_deref())? {
        println!("{}", line);
    }
    Ok(())
}

/// One `name  type` line per requested parameter.
fn describe(name: Option<&str>) -> Result<Vec<String>> {
    let entries = match name {
        Some(name) => vec![(name.to_string(), parameter_type(name)?)],
        None => known_parameters()
            .into_iter()
            .map(|(name, dtype)| (name.to_string(), dtype))
            .collect(),
    };
    Ok(entries
        .into_iter()
        .map(|(name, dtype)| format!("{:<24} {}", name, dtype))
        .collect())
}
