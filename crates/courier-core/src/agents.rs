use courier_api::types::AgentIdentity;

/// Directory of identities known to the application itself (bots, system
/// accounts) that exist in no external registry. Entries come from config;
/// lookups are case-insensitive on both handle and address.
#[derive(Clone, Debug, Default)]
pub struct AgentDirectory {
    entries: Vec<AgentIdentity>,
}

impl AgentDirectory {
    pub fn new(entries: Vec<AgentIdentity>) -> Self {
        Self { entries }
    }

    pub fn find_by_handle(&self, handle: &str) -> Option<&AgentIdentity> {
        self.entries
            .iter()
            .find(|agent| agent.handle.eq_ignore_ascii_case(handle.trim()))
    }

    pub fn find_by_address(&self, address: &str) -> Option<&AgentIdentity> {
        self.entries
            .iter()
            .find(|agent| agent.wallet_address.eq_ignore_ascii_case(address.trim()))
    }

    pub fn all(&self) -> &[AgentIdentity] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agent(handle: &str, address: &str) -> AgentIdentity {
        AgentIdentity {
            id: handle.to_string(),
            handle: handle.to_string(),
            display_name: handle.to_string(),
            wallet_address: address.to_string(),
            avatar_url: None,
            description: None,
        }
    }

    #[test]
    fn handle_lookup_ignores_case() {
        let directory = AgentDirectory::new(vec![agent(
            "PriceBot",
            "0x00000000000000000000000000000000000000aa",
        )]);
        assert!(directory.find_by_handle("pricebot").is_some());
        assert!(directory.find_by_handle(" PRICEBOT ").is_some());
        assert!(directory.find_by_handle("other").is_none());
    }

    #[test]
    fn address_lookup_ignores_case() {
        let directory = AgentDirectory::new(vec![agent(
            "pricebot",
            "0x00000000000000000000000000000000000000AA",
        )]);
        assert!(directory
            .find_by_address("0x00000000000000000000000000000000000000aa")
            .is_some());
    }
}
