use std::collections::BTreeMap;

/// Bot trait - what commands may ask of the running bot
pub trait Bot: Send + Sync {
    /// Monitored user name -> lower-cased aliases
    fn user_aliases(&self) -> BTreeMap<String, Vec<String>>;
}
