use std::collections::HashMap;
use std::path::Path;

use secrecy::SecretString;
use uuid::Uuid;

use crate::Result;
use crate::auth::Credentials;
use crate::error::Error;

const PRIVATE_KEY: &str = "POLYMARKET_PRIVATE_KEY";
const API_KEY: &str = "POLYMARKET_API_KEY";
const SECRET: &str = "POLYMARKET_SECRET";
const PASSPHRASE: &str = "POLYMARKET_PASSPHRASE";

/// Parsed `KEY=VALUE` credentials file.
#[derive(Clone, Debug, Default)]
pub struct EnvFile {
    values: HashMap<String, String>,
}

impl EnvFile {
    /// Reads and parses the file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("unable to read {}: {e}", path.display())))?;
        Ok(Self::parse(&contents))
    }

    /// Parses `KEY=VALUE` lines.
    ///
    /// Each line is trimmed; blank lines and `#` comments are ignored; the
    /// split happens on the first `=` only, so values may contain `=`.
    /// Lines without any `=` are skipped and logged.
    #[must_use]
    pub fn parse(contents: &str) -> Self {
        let mut values = HashMap::new();
        for (index, line) in contents.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            match line.split_once('=') {
                Some((key, value)) => {
                    values.insert(key.to_owned(), value.to_owned());
                }
                None => {
                    tracing::warn!(line = index + 1, "skipping malformed line without `=`");
                }
            }
        }

        Self { values }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Values the probe reads from the credentials file.
#[derive(Clone, Debug)]
pub struct Settings {
    pub private_key: SecretString,
    pub credentials: Option<Credentials>,
}

impl Settings {
    /// Extracts the wallet key and, when fully present, the API credential
    /// triple. A partial triple is rejected naming the missing keys.
    pub fn from_env_file(env: &EnvFile) -> Result<Self> {
        let private_key = env
            .get(PRIVATE_KEY)
            .ok_or_else(|| Error::config(format!("missing {PRIVATE_KEY} in credentials file")))?;

        let credentials = match (env.get(API_KEY), env.get(SECRET), env.get(PASSPHRASE)) {
            (Some(key), Some(secret), Some(passphrase)) => {
                let key = Uuid::parse_str(key)
                    .map_err(|e| Error::config(format!("{API_KEY} is not a valid UUID: {e}")))?;
                Some(Credentials::new(
                    key,
                    SecretString::from(secret.to_owned()),
                    SecretString::from(passphrase.to_owned()),
                ))
            }
            (None, None, None) => None,
            (key, secret, passphrase) => {
                let missing: Vec<&str> = [(API_KEY, key), (SECRET, secret), (PASSPHRASE, passphrase)]
                    .into_iter()
                    .filter_map(|(name, value)| value.is_none().then_some(name))
                    .collect();
                return Err(Error::config(format!(
                    "incomplete API credential set; missing {}",
                    missing.join(", ")
                )));
            }
        };

        Ok(Self {
            private_key: SecretString::from(private_key.to_owned()),
            credentials,
        })
    }
}
