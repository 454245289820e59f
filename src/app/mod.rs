pub mod intent;
pub mod ports;
pub mod stats_use_case;
