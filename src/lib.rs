pub mod convert;
pub mod error;
pub mod logging;
pub mod normalize;
pub mod output;
pub mod process;
pub mod table;

pub use convert::{convert, load_table, ConversionReport, ConvertOptions};
pub use error::ConvertError;
pub use normalize::{composite_key, normalize};
pub use output::OutputFormat;
pub use table::{risk_factor, ConversionStats, IcmClass, IcmTable};
