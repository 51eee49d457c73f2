mod batch;
mod cli;
mod consts;
mod fetcher;
mod output;
mod record;
mod settings;

pub use self::settings::{
    DuplicatePolicy, ExplorerSettings, ListingSettings, OutputSettings, Settings,
};
pub use batch::{BatchReport, BatchScraper, Failure};
pub use cli::Args;
pub use fetcher::{extract_source, ExplorerFetcher, FetchError, SourceFetcher};
pub use output::{OutputDir, WriteError};
pub use record::{parse_address, parse_listing, ContractRecord, Line, RecordError};
