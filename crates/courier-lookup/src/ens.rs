use crate::error::{LookupError, Result};
use courier_api::validation::normalize_ens_name;
use ethers::providers::{Http, Middleware, Provider, ProviderError};

/// ENS name resolution over a mainnet JSON-RPC endpoint.
///
/// ENS registration lives on mainnet only, so a single provider suffices.
pub struct EnsClient {
    provider: Provider<Http>,
}

impl EnsClient {
    pub fn new(rpc_url: &str) -> Result<EnsClient> {
        let provider =
            Provider::<Http>::try_from(rpc_url).map_err(|_| LookupError::InvalidBaseUrl)?;
        Ok(EnsClient { provider })
    }

    /// Resolves a name (suffix appended if missing) to a lowercased
    /// `0x`-prefixed address. An unregistered name is a miss, not an error.
    pub async fn resolve_name(&self, name: &str) -> Result<Option<String>> {
        let normalized =
            normalize_ens_name(name).map_err(|_| LookupError::InvalidInput("name"))?;
        match self.provider.resolve_name(&normalized).await {
            Ok(address) => Ok(Some(format!("{:#x}", address))),
            Err(ProviderError::EnsError(_)) => Ok(None),
            Err(ProviderError::EnsNotOwned(_)) => Ok(None),
            Err(err) => Err(LookupError::Rpc(err.to_string())),
        }
    }
}
