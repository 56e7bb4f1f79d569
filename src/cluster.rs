//! Network environment resolution

use crate::tx_builder::MintError;
use std::fmt;
use std::str::FromStr;

/// A Solana cluster, or an explicit RPC URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cluster {
    Devnet,
    Testnet,
    MainnetBeta,
    Localnet,
    Custom(String),
}

impl Cluster {
    /// Public JSON-RPC endpoint of the cluster
    pub fn url(&self) -> &str {
        match self {
            Cluster::Devnet => "https://api.devnet.solana.com",
            Cluster::Testnet => "https://api.testnet.solana.com",
            Cluster::MainnetBeta => "https://api.mainnet-beta.solana.com",
            Cluster::Localnet => "http://127.0.0.1:8899",
            Cluster::Custom(url) => url,
        }
    }
}

impl FromStr for Cluster {
    type Err = MintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            return Ok(Cluster::Custom(trimmed.to_string()));
        }

        match trimmed.to_ascii_lowercase().as_str() {
            "devnet" => Ok(Cluster::Devnet),
            "testnet" => Ok(Cluster::Testnet),
            "mainnet-beta" | "mainnet" => Ok(Cluster::MainnetBeta),
            "localnet" | "localhost" => Ok(Cluster::Localnet),
            _ => Err(MintError::Configuration(format!(
                "unknown network environment '{}'",
                s
            ))),
        }
    }
}

impl fmt::Display for Cluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cluster::Devnet => write!(f, "devnet"),
            Cluster::Testnet => write!(f, "testnet"),
            Cluster::MainnetBeta => write!(f, "mainnet-beta"),
            Cluster::Localnet => write!(f, "localnet"),
            Cluster::Custom(url) => write!(f, "{}", url),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names() {
        assert_eq!("devnet".parse::<Cluster>().unwrap(), Cluster::Devnet);
        assert_eq!("Mainnet".parse::<Cluster>().unwrap(), Cluster::MainnetBeta);
        assert_eq!("mainnet-beta".parse::<Cluster>().unwrap(), Cluster::MainnetBeta);
        assert_eq!("localhost".parse::<Cluster>().unwrap(), Cluster::Localnet);
    }

    #[test]
    fn test_parse_url() {
        let cluster: Cluster = "https://rpc.example.org".parse().unwrap();
        assert_eq!(cluster.url(), "https://rpc.example.org");
    }

    #[test]
    fn test_unknown_env() {
        assert!(matches!(
            "moonnet".parse::<Cluster>(),
            Err(MintError::Configuration(_))
        ));
    }

    #[test]
    fn test_display_round_trips_names() {
        for cluster in [Cluster::Devnet, Cluster::Testnet, Cluster::MainnetBeta, Cluster::Localnet] {
            assert_eq!(cluster.to_string().parse::<Cluster>().unwrap(), cluster);
        }
    }
}
