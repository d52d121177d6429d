pub mod dta;
pub mod psm_table;
pub mod result_table;

pub use dta::{
    DtaFile,
    DtaHeader,
};
pub use psm_table::{
    read_psm_records,
    read_psm_table,
};
pub use result_table::{
    ResultRow,
    ResultTsvWriter,
    result_rows,
};
