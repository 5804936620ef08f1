pub mod csv_rows;
pub mod records;
pub mod source;

pub use csv_rows::*;
pub use records::*;
pub use source::*;
