pub mod fragment_mass_builder;
pub mod theoretical_spectrum;

pub use fragment_mass_builder::{
    FragmentMassBuilder,
    MzRange,
};
pub use theoretical_spectrum::{
    ChargeStateIons,
    TheoreticalSpectrum,
};
