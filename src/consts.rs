pub const DEFAULT_EXPLORER_URL: &str = "https://etherscan.io/";
pub const DEFAULT_SOURCE_SELECTOR: &str = "#editor";

/// Listing lines shorter than this are not treated as records.
pub const DEFAULT_MIN_LINE_LENGTH: usize = 43;

pub const DEFAULT_OUTPUT_DIR: &str = "./erc20";
pub const DEFAULT_OUTPUT_EXTENSION: &str = "sol";
