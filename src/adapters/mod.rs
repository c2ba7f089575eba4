// Adapters layer: concrete collaborators behind the domain ports (storage, roster files, exports).

pub mod csv_export;
pub mod memory;
pub mod roster_file;
