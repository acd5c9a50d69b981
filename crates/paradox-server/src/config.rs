use std::{
    env, fmt,
    net::{AddrParseError, SocketAddr},
};

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_INITIAL_AMOUNT: f64 = 100.0;
const DEFAULT_EXPORT_OUTPUT_PATH: &str = "artifacts/series.csv";

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub initial_amount: f64,
    pub export_output_path: String,
    pub coin_seed: Option<u64>,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidListenAddr(AddrParseError),
    InvalidInitialAmount,
    InvalidExportOutputPath,
    InvalidCoinSeed,
    NonUnicodeListenAddr,
    NonUnicodeInitialAmount,
    NonUnicodeExportOutput,
    NonUnicodeCoinSeed,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidListenAddr(err) => {
                write!(f, "PARADOX_SERVER_ADDR is not a valid socket address: {err}")
            }
            Self::InvalidInitialAmount => {
                write!(f, "PARADOX_INITIAL_AMOUNT must be a finite positive number")
            }
            Self::InvalidExportOutputPath => {
                write!(f, "PARADOX_EXPORT_OUTPUT must not be empty or whitespace")
            }
            Self::InvalidCoinSeed => {
                write!(f, "PARADOX_COIN_SEED must be an unsigned 64-bit integer")
            }
            Self::NonUnicodeListenAddr => {
                write!(f, "PARADOX_SERVER_ADDR contains non-unicode data")
            }
            Self::NonUnicodeInitialAmount => {
                write!(f, "PARADOX_INITIAL_AMOUNT contains non-unicode data")
            }
            Self::NonUnicodeExportOutput => {
                write!(f, "PARADOX_EXPORT_OUTPUT contains non-unicode data")
            }
            Self::NonUnicodeCoinSeed => {
                write!(f, "PARADOX_COIN_SEED contains non-unicode data")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidListenAddr(err) => Some(err),
            _ => None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let listen_addr = match env::var("PARADOX_SERVER_ADDR") {
            Ok(value) => value.parse().map_err(ConfigError::InvalidListenAddr)?,
            Err(env::VarError::NotPresent) => DEFAULT_LISTEN_ADDR
                .parse()
                .expect("default listen address must be valid"),
            Err(env::VarError::NotUnicode(_)) => {
                return Err(ConfigError::NonUnicodeListenAddr);
            }
        };

        let initial_amount = match env::var("PARADOX_INITIAL_AMOUNT") {
            Ok(value) => {
                let parsed: f64 = value
                    .parse()
                    .map_err(|_| ConfigError::InvalidInitialAmount)?;
                if !parsed.is_finite() || parsed <= 0.0 {
                    return Err(ConfigError::InvalidInitialAmount);
                }
                parsed
            }
            Err(env::VarError::NotPresent) => DEFAULT_INITIAL_AMOUNT,
            Err(env::VarError::NotUnicode(_)) => {
                return Err(ConfigError::NonUnicodeInitialAmount);
            }
        };

        let export_output_path = match env::var("PARADOX_EXPORT_OUTPUT") {
            Ok(value) => {
                if value.trim().is_empty() {
                    return Err(ConfigError::InvalidExportOutputPath);
                }
                value
            }
            Err(env::VarError::NotPresent) => DEFAULT_EXPORT_OUTPUT_PATH.to_owned(),
            Err(env::VarError::NotUnicode(_)) => {
                return Err(ConfigError::NonUnicodeExportOutput);
            }
        };

        let coin_seed = match env::var("PARADOX_COIN_SEED") {
            Ok(value) => Some(value.parse().map_err(|_| ConfigError::InvalidCoinSeed)?),
            Err(env::VarError::NotPresent) => None,
            Err(env::VarError::NotUnicode(_)) => {
                return Err(ConfigError::NonUnicodeCoinSeed);
            }
        };

        Ok(Self {
            listen_addr,
            initial_amount,
            export_output_path,
            coin_seed,
        })
    }
}
