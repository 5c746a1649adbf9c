//! Pure parsers and normalizers for runtime CLI output.
//!
//! Nothing here spawns a process or logs above `debug!`; every function maps
//! text to typed data or reports why it cannot.

pub mod events;
pub mod files;
pub mod go_template;
pub mod image_name;
pub mod ip;
pub mod json;
pub mod kv;
pub mod ports;
pub mod prune;
pub mod size;
pub mod state;
pub mod timestamp;

pub use image_name::{parse_docker_like_image_name, parse_image_repository};
pub use ip::normalize_ip_address;
pub use json::{parse_array_or_lines, parse_json, parse_json_array, parse_ndjson};
pub use ports::{parse_docker_raw_port_string, parse_port_key, parse_port_map};
pub use size::try_parse_size;
pub use state::normalize_container_state;
