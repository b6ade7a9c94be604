pub mod checks;
pub mod codec;
mod error;
mod load;
mod manager;
mod platform;
mod record;

pub use error::{LoadError, ParseError, ParseErrorKind, WriteError, WriteErrorKind};
pub use manager::{
    find_record, CatalogManager, CatalogOptions, SaveBatch, SaveReport, UpsertOutcome,
    DEFAULT_PLATFORM_EXTENSION,
};
pub use platform::{
    parse_platform_content, platform_file_path, serialize_platform, ParsedPlatform,
    PlatformEntry, PlatformFile,
};
pub use record::{PlatformKey, Record};
