pub mod host;
pub mod std_host;
