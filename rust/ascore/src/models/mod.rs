mod modification;
mod peptide;
mod psm;

pub use modification::{
    DynamicModification,
    ModMass,
    ModificationId,
    ModificationRegistry,
    StaticModification,
    TerminalModification,
    Terminus,
};
pub use peptide::{
    ModificationOccurrence,
    ParsedPeptide,
    render_sequence,
    strip_modifications,
};
pub use psm::{
    PsmKey,
    PsmRecord,
};
