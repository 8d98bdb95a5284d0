pub mod chained_table;
pub mod fixed_array;
pub mod hash_function;
pub mod open_table;
pub mod presets;
pub mod probe_sequence;
pub mod slot;
pub mod structure;

pub use presets::Preset;
pub use probe_sequence::ProbeStrategy;
pub use slot::Slot;
pub use structure::{Structure, StructureKind};
