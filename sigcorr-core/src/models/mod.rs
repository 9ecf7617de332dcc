pub mod extent;
pub mod memory;
pub mod record;

// re-export for cleaner imports
pub use self::extent::ChromExtent;
pub use self::memory::MemoryTrack;
pub use self::record::SignalRecord;
