use super::error::ParamError;
use crate::core::dtype::DType;
use itertools::Itertools;
use phf::phf_map;

/// Normalized element type of each recognized MDP entry.
static PARAMETER_TYPES: phf::Map<&'static str, DType> = phf_map! {
    "integrator" => DType::String,
    "tinit" => DType::Float64,
    "dt" => DType::Float64,
    "nsteps" => DType::Int64,
    "init-step" => DType::Int64,
    "simulation-part" => DType::Int64,
    "comm-mode" => DType::String,
    "nstcomm" => DType::Int64,
    // Group names; stored as an array of strings.
    "comm-grps" => DType::NdArray,
    "bd-fric" => DType::Float64,
    "ld-seed" => DType::Int64,
    "emtol" => DType::Float64,
    "emstep" => DType::Float64,
    "niter" => DType::Int64,
    "fcstep" => DType::Float64,
    "nstcgsteep" => DType::Int64,
    "nbfgscorr" => DType::Int64,
    "rtpi" => DType::Float64,
    "nstxout" => DType::Int64,
    "nstvout" => DType::Int64,
    "nstfout" => DType::Int64,
    "nstlog" => DType::Int64,
    "nstcalcenergy" => DType::Int64,
    "nstenergy" => DType::Int64,
    "nstxout-compressed" => DType::Int64,
    "compressed-x-precision" => DType::Float64,
    "cutoff-scheme" => DType::String,
    "nstlist" => DType::Int64,
    "ns-type" => DType::String,
    "pbc" => DType::String,
    "periodic-molecules" => DType::Bool,
};

/// Looks up the registered type of a simulation parameter.
///
/// # Errors
///
/// Returns [`ParamError::UnknownParameter`] for names with no type mapping.
pub fn parameter_type(name: &str) -> Result<DType, ParamError> {
    PARAMETER_TYPES
        .get(name)
        .copied()
        .ok_or_else(|| ParamError::UnknownParameter(name.to_string()))
}

/// The registered name as a `'static` key, if `name` is known.
pub(crate) fn canonical_name(name: &str) -> Option<&'static str> {
    PARAMETER_TYPES.get_entry(name).map(|(key, _)| *key)
}

/// All known parameters with their types, sorted by name.
pub fn known_parameters() -> Vec<(&'static str, DType)> {
    PARAMETER_TYPES
        .entries()
        .map(|(name, dtype)| (*name, *dtype))
        .sorted_by_key(|(name, _)| *name)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parameter_type_returns_registered_types() {
        assert_eq!(parameter_type("nsteps").unwrap(), DType::Int64);
        assert_eq!(parameter_type("dt").unwrap(), DType::Float64);
        assert_eq!(parameter_type("integrator").unwrap(), DType::String);
        assert_eq!(parameter_type("periodic-molecules").unwrap(), DType::Bool);
        assert_eq!(parameter_type("comm-grps").unwrap(), DType::NdArray);
    }

    #[test]
    fn parameter_type_fails_for_unknown_name() {
        let result = parameter_type("nstxtcout");
        assert!(matches!(result, Err(ParamError::UnknownParameter(name)) if name == "nstxtcout"));
    }

    #[test]
    fn known_parameters_are_sorted_and_complete() {
        let params = known_parameters();
        assert_eq!(params.len(), 31);
        assert!(params.windows(2).all(|w| w[0].0 < w[1].0));
        assert_eq!(params.first().map(|(name, _)| *name), Some("bd-fric"));
    }

    #[test]
    fn canonical_name_returns_static_key() {
        let owned = String::from("pbc");
        assert_eq!(canonical_name(&owned), Some("pbc"));
        assert_eq!(canonical_name("pcb"), None);
    }
}
