use serde::{
    Deserialize,
    Serialize,
};

/// One peptide-spectrum match, as handed over by the search-engine reader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PsmRecord {
    #[serde(rename = "Scan", alias = "scan", alias = "ScanNum")]
    pub scan: u32,
    #[serde(rename = "Charge", alias = "charge")]
    pub charge: u8,
    #[serde(rename = "Peptide", alias = "peptide", alias = "Sequence")]
    pub peptide: String,
    #[serde(
        rename = "SpecEValue",
        alias = "MSGF_SpecProb",
        alias = "spec_evalue",
        default
    )]
    pub spec_evalue: Option<f64>,
}

impl PsmRecord {
    pub fn new(scan: u32, charge: u8, peptide: impl Into<String>) -> Self {
        Self {
            scan,
            charge,
            peptide: peptide.into(),
            spec_evalue: None,
        }
    }

    pub fn key(&self) -> PsmKey {
        PsmKey {
            scan: self.scan,
            charge: self.charge,
            peptide: self.peptide.clone(),
        }
    }
}

/// Identity used to drop repeated PSMs within a run.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PsmKey {
    pub scan: u32,
    pub charge: u8,
    pub peptide: String,
}
