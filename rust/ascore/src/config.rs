//! Scoring parameters.
//!
//! [`ParameterConfig`] is the serialized form (read from JSON), [`AScoreParameters`]
//! is the validated form the engine works with.

use crate::errors::ConfigError;
use crate::mass::MassType;
use crate::models::{
    DynamicModification,
    ModMass,
    ModificationId,
    ModificationRegistry,
    StaticModification,
    TerminalModification,
    Terminus,
};
use serde::{
    Deserialize,
    Serialize,
};

/// Tolerances at or below this value use average masses for multiply charged fragments.
pub const AVERAGE_MASS_TOLERANCE_CUTOFF: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum FragmentationType {
    #[serde(rename = "CID", alias = "cid")]
    Cid,
    #[serde(rename = "ETD", alias = "etd")]
    Etd,
    #[serde(rename = "HCD", alias = "hcd")]
    Hcd,
    #[default]
    #[serde(rename = "Unspecified", alias = "unspecified")]
    Unspecified,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DynamicModificationConfig {
    pub symbol: char,
    #[serde(default)]
    pub label: Option<String>,
    pub mono_mass: f64,
    #[serde(default)]
    pub average_mass: Option<f64>,
    #[serde(default)]
    pub residues: String,
    #[serde(default)]
    pub n_terminal: bool,
    #[serde(default)]
    pub c_terminal: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaticModificationConfig {
    pub mono_mass: f64,
    #[serde(default)]
    pub average_mass: Option<f64>,
    pub residues: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerminalModificationConfig {
    pub mono_mass: f64,
    #[serde(default)]
    pub average_mass: Option<f64>,
    #[serde(default)]
    pub n_terminal: bool,
    #[serde(default)]
    pub c_terminal: bool,
}

fn default_msgf_pre_threshold() -> f64 {
    1.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterConfig {
    #[serde(default)]
    pub fragmentation: FragmentationType,
    /// Half-width of the fragment matching window, in Da.
    pub fragment_mass_tolerance: f64,
    /// PSMs with an MS-GF+ spectral E-value above this are not scored.
    #[serde(default = "default_msgf_pre_threshold")]
    pub msgf_pre_threshold: f64,
    #[serde(default)]
    pub dynamic_modifications: Vec<DynamicModificationConfig>,
    #[serde(default)]
    pub static_modifications: Vec<StaticModificationConfig>,
    #[serde(default)]
    pub terminal_modifications: Vec<TerminalModificationConfig>,
}

#[derive(Debug, Clone)]
pub struct AScoreParameters {
    pub fragmentation: FragmentationType,
    pub fragment_mass_tolerance: f64,
    pub msgf_pre_threshold: f64,
    pub dynamic_mods: ModificationRegistry,
    pub static_mods: Vec<StaticModification>,
    pub terminal_mods: Vec<TerminalModification>,
}

impl AScoreParameters {
    pub fn from_config(config: ParameterConfig) -> Result<Self, ConfigError> {
        config.try_into()
    }

    /// Mass type for fragments of a given charge.
    pub fn fragment_mass_type(&self, fragment_charge: u8) -> MassType {
        if fragment_charge > 1 && self.fragment_mass_tolerance <= AVERAGE_MASS_TOLERANCE_CUTOFF {
            MassType::Average
        } else {
            MassType::Monoisotopic
        }
    }
}

fn check_mass(index: usize, mono: f64, average: Option<f64>) -> Result<ModMass, ConfigError> {
    if !mono.is_finite() || average.is_some_and(|x| !x.is_finite()) {
        return Err(ConfigError::InvalidModification {
            index,
            reason: format!("mass must be finite, got {} / {:?}", mono, average),
        });
    }
    Ok(ModMass::new(mono, average))
}

fn check_residues(index: usize, residues: &str) -> Result<Vec<char>, ConfigError> {
    let mut out: Vec<char> = Vec::with_capacity(residues.len());
    for aa in residues.chars().filter(|c| !c.is_whitespace() && *c != ',') {
        if MassType::Monoisotopic.residue_mass(aa).is_none() {
            return Err(ConfigError::InvalidModification {
                index,
                reason: format!("'{}' is not a known residue", aa),
            });
        }
        if !out.contains(&aa) {
            out.push(aa);
        }
    }
    Ok(out)
}

impl TryFrom<ParameterConfig> for AScoreParameters {
    type Error = ConfigError;

    fn try_from(config: ParameterConfig) -> Result<Self, Self::Error> {
        if !config.fragment_mass_tolerance.is_finite() || config.fragment_mass_tolerance <= 0.0 {
            return Err(ConfigError::InvalidTolerance {
                value: config.fragment_mass_tolerance,
            });
        }
        if config.dynamic_modifications.is_empty() {
            return Err(ConfigError::MissingField {
                field: "dynamic_modifications",
                context: "at least one dynamic modification is needed to localize".into(),
            });
        }

        let mut dynamic_mods: Vec<DynamicModification> =
            Vec::with_capacity(config.dynamic_modifications.len());
        for (i, dm) in config.dynamic_modifications.into_iter().enumerate() {
            if dm.symbol.is_ascii_uppercase() || dm.symbol == '.' || dm.symbol.is_whitespace() {
                return Err(ConfigError::InvalidModification {
                    index: i,
                    reason: format!("'{}' cannot be used as a modification symbol", dm.symbol),
                });
            }
            if dynamic_mods.iter().any(|x| x.symbol == dm.symbol) {
                return Err(ConfigError::DuplicateSymbol { symbol: dm.symbol });
            }
            if dm.n_terminal && dm.c_terminal {
                return Err(ConfigError::InvalidModification {
                    index: i,
                    reason: "a modification cannot be both N- and C-terminal".into(),
                });
            }
            let residues = check_residues(i, &dm.residues)?;
            if residues.is_empty() && !dm.n_terminal && !dm.c_terminal {
                return Err(ConfigError::InvalidModification {
                    index: i,
                    reason: "no eligible residues".into(),
                });
            }
            let label = dm.label.unwrap_or_else(|| dm.symbol.to_string());
            if label.is_empty() || label.chars().any(|c| c.is_ascii_uppercase()) {
                return Err(ConfigError::InvalidLabel { label });
            }

            dynamic_mods.push(DynamicModification {
                id: (i + 1) as ModificationId,
                symbol: dm.symbol,
                label,
                mass: check_mass(i, dm.mono_mass, dm.average_mass)?,
                residues,
                n_terminal: dm.n_terminal,
                c_terminal: dm.c_terminal,
            });
        }

        let static_mods = config
            .static_modifications
            .into_iter()
            .enumerate()
            .map(|(i, sm)| {
                let residues = check_residues(i, &sm.residues)?;
                if residues.is_empty() {
                    return Err(ConfigError::MissingField {
                        field: "residues",
                        context: format!("static modification #{}", i),
                    });
                }
                Ok(StaticModification {
                    mass: check_mass(i, sm.mono_mass, sm.average_mass)?,
                    residues,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let terminal_mods = config
            .terminal_modifications
            .into_iter()
            .enumerate()
            .map(|(i, tm)| {
                let terminus = match (tm.n_terminal, tm.c_terminal) {
                    (true, false) => Terminus::N,
                    (false, true) => Terminus::C,
                    _ => {
                        return Err(ConfigError::InvalidModification {
                            index: i,
                            reason: "terminal modification needs exactly one of n_terminal / c_terminal"
                                .into(),
                        });
                    }
                };
                Ok(TerminalModification {
                    mass: check_mass(i, tm.mono_mass, tm.average_mass)?,
                    terminus,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            fragmentation: config.fragmentation,
            fragment_mass_tolerance: config.fragment_mass_tolerance,
            msgf_pre_threshold: config.msgf_pre_threshold,
            dynamic_mods: ModificationRegistry::new(dynamic_mods),
            static_mods,
            terminal_mods,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r##"{
        "fragmentation": "HCD",
        "fragment_mass_tolerance": 0.05,
        "dynamic_modifications": [
            {"symbol": "*", "mono_mass": 79.966331, "average_mass": 79.9799, "residues": "STY"},
            {"symbol": "#", "label": "[ox]", "mono_mass": 15.994915, "residues": "M"}
        ],
        "static_modifications": [{"mono_mass": 57.021464, "residues": "C"}],
        "terminal_modifications": [{"mono_mass": 229.162932, "n_terminal": true}]
    }"##;

    #[test]
    fn test_parse_and_validate() {
        let config: ParameterConfig = serde_json::from_str(SAMPLE).unwrap();
        let params = AScoreParameters::from_config(config).unwrap();
        assert_eq!(params.fragmentation, FragmentationType::Hcd);
        assert_eq!(params.dynamic_mods.len(), 2);
        assert_eq!(params.dynamic_mods.label(1), Some("*"));
        assert_eq!(params.dynamic_mods.label(2), Some("[ox]"));
        assert_eq!(params.dynamic_mods.by_symbol('#').map(|m| m.id), Some(2));
        assert_eq!(params.static_mods[0].residues, vec!['C']);
        assert_eq!(params.terminal_mods[0].terminus, Terminus::N);
        assert_eq!(params.msgf_pre_threshold, 1.0);
    }

    #[test]
    fn test_average_masses_only_for_tight_tolerance() {
        let config: ParameterConfig = serde_json::from_str(SAMPLE).unwrap();
        let mut params = AScoreParameters::from_config(config).unwrap();
        assert_eq!(params.fragment_mass_type(1), MassType::Monoisotopic);
        assert_eq!(params.fragment_mass_type(2), MassType::Average);
        params.fragment_mass_tolerance = 0.5;
        assert_eq!(params.fragment_mass_type(2), MassType::Monoisotopic);
    }

    #[test]
    fn test_rejects_bad_modifications() {
        let mut config: ParameterConfig = serde_json::from_str(SAMPLE).unwrap();
        config.dynamic_modifications[1].symbol = '*';
        assert!(matches!(
            AScoreParameters::from_config(config),
            Err(ConfigError::DuplicateSymbol { symbol: '*' })
        ));

        let mut config: ParameterConfig = serde_json::from_str(SAMPLE).unwrap();
        config.dynamic_modifications[0].residues = "SB".into();
        assert!(matches!(
            AScoreParameters::from_config(config),
            Err(ConfigError::InvalidModification { index: 0, .. })
        ));

        let mut config: ParameterConfig = serde_json::from_str(SAMPLE).unwrap();
        config.dynamic_modifications[1].label = Some("[Ox]".into());
        assert!(matches!(
            AScoreParameters::from_config(config),
            Err(ConfigError::InvalidLabel { .. })
        ));

        let mut config: ParameterConfig = serde_json::from_str(SAMPLE).unwrap();
        config.fragment_mass_tolerance = 0.0;
        assert!(matches!(
            AScoreParameters::from_config(config),
            Err(ConfigError::InvalidTolerance { .. })
        ));

        let mut config: ParameterConfig = serde_json::from_str(SAMPLE).unwrap();
        config.dynamic_modifications.clear();
        assert!(matches!(
            AScoreParameters::from_config(config),
            Err(ConfigError::MissingField { .. })
        ));
    }

    #[test]
    fn test_missing_tolerance_is_a_parse_error() {
        let out: Result<ParameterConfig, _> = serde_json::from_str(r#"{"fragmentation": "CID"}"#);
        assert!(out.is_err());
    }
}
