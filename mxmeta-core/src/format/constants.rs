//! Format constants

/// Block size the engine uses when a description leaves it unset
pub const DEFAULT_BLOCK_SIZE: i32 = 1000;

/// Sentinel used by the runtime record for an unknown count
pub const UNKNOWN: i64 = -1;

/// Characteristics record constants
pub mod record {
    /// Magic bytes for a characteristics record
    pub const MAGIC: [u8; 4] = *b"MXMC";

    /// Current record version
    pub const VERSION: u8 = 1;

    /// Fixed size of an encoded record
    pub const SIZE: usize = 40;

    /// Format tag meaning "no format set"
    pub const NO_FORMAT: u8 = 0xFF;

    /// Presence bits, one per optional numeric field
    pub const HAS_ROWS: u8 = 1 << 0;
    pub const HAS_COLUMNS: u8 = 1 << 1;
    pub const HAS_NON_ZEROS: u8 = 1 << 2;
    pub const HAS_ROWS_PER_BLOCK: u8 = 1 << 3;
    pub const HAS_COLUMNS_PER_BLOCK: u8 = 1 << 4;

    /// Union of all defined presence bits
    pub const PRESENCE_MASK: u8 = 0b1_1111;
}
