pub mod ports;
pub mod sync_use_case;
