pub mod cli;
pub mod errors;
pub mod types;

pub use cli::IoArgs;
pub use errors::{Result, SeriesError};
pub use types::{Column, ColumnPayload, FramePayload, SeriesPayload, Table, TimeSeries};
