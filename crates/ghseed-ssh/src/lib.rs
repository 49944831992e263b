pub mod identities;

pub use identities::{default_config_path, list_identities, parse_identities, SshIdentity};
