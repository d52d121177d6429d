mod matching;
mod peak_depth;

pub use matching::{
    ION_IDENTITY_TOLERANCE,
    count_matches,
    find_value_range,
    site_determining_ions,
};
pub use peak_depth::{
    ExperimentalSpectrum,
    MAX_PEAK_DEPTH,
    Peak,
};
