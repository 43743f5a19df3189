//! Connection target selection and connection-string assembly.

use crate::error::DemoStoreError;
use std::fmt;
use std::str::FromStr;
use tiberius::{AuthMethod, Config, EncryptionLevel};

/// Default SQL Server TCP port.
pub const DEFAULT_PORT: u16 = 1433;

/// Application name reported to the server in the login packet.
pub const APPLICATION_NAME: &str = "dbtest";

const PASSWORD_MASK: &str = "********";

/// Pick the server to connect to: the secondary when failing over, the
/// primary otherwise. Absent addresses stay absent.
pub fn select_server<'a>(
    failover: bool,
    primary: Option<&'a str>,
    secondary: Option<&'a str>,
) -> Option<&'a str> {
    if failover {
        secondary
    } else {
        primary
    }
}

/// A server address in ADO notation: `[tcp:]host[\instance][,port]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerAddress {
    pub host: String,
    pub instance: Option<String>,
    pub port: Option<u16>,
}

impl FromStr for ServerAddress {
    type Err = DemoStoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DemoStoreError::InvalidServer(s.to_string());

        let mut rest = s.trim();
        if rest
            .get(..4)
            .is_some_and(|head| head.eq_ignore_ascii_case("tcp:"))
        {
            rest = &rest[4..];
        }

        let (host_part, port) = match rest.split_once(',') {
            Some((host, port)) => {
                let port = port.trim().parse::<u16>().map_err(|_| invalid())?;
                (host.trim(), Some(port))
            }
            None => (rest, None),
        };

        let (host, instance) = match host_part.split_once('\\') {
            Some((host, instance)) if !instance.is_empty() => (host, Some(instance.to_string())),
            Some(_) => return Err(invalid()),
            None => (host_part, None),
        };

        let host = match host {
            "" => return Err(invalid()),
            "." | "(local)" => "localhost",
            other => other,
        };

        Ok(Self {
            host: host.to_string(),
            instance,
            port,
        })
    }
}

impl ServerAddress {
    /// Whether the port has to be resolved through SQL Browser. An explicit
    /// port wins over the instance name.
    pub fn uses_sql_browser(&self) -> bool {
        self.instance.is_some() && self.port.is_none()
    }
}

/// Everything needed to open a connection. Built once at startup.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionTarget {
    pub server: String,
    pub database: String,
    pub user: String,
    pub password: String,
    /// Port used when the server address does not name one.
    pub default_port: u16,
    /// Encrypt the whole session. Otherwise only the login is encrypted and
    /// the server certificate is not validated.
    pub encrypt: bool,
    /// Skip certificate validation when `encrypt` is set.
    pub trust_server_certificate: bool,
}

impl Default for ConnectionTarget {
    fn default() -> Self {
        Self {
            server: String::new(),
            database: String::new(),
            user: String::new(),
            password: String::new(),
            default_port: DEFAULT_PORT,
            encrypt: false,
            trust_server_certificate: false,
        }
    }
}

impl fmt::Debug for ConnectionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionTarget")
            .field("server", &self.server)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &PASSWORD_MASK)
            .field("default_port", &self.default_port)
            .field("encrypt", &self.encrypt)
            .field("trust_server_certificate", &self.trust_server_certificate)
            .finish()
    }
}

impl ConnectionTarget {
    /// Parsed form of `server`.
    pub fn address(&self) -> Result<ServerAddress, DemoStoreError> {
        self.server.parse()
    }

    /// Build the driver configuration using SQL Server authentication.
    pub fn to_tiberius_config(&self) -> Result<Config, DemoStoreError> {
        let address = self.address()?;

        let mut config = Config::new();
        config.host(&address.host);
        config.port(address.port.unwrap_or(self.default_port));
        if let Some(instance) = &address.instance {
            config.instance_name(instance);
        }
        if !self.database.is_empty() {
            config.database(&self.database);
        }
        config.application_name(APPLICATION_NAME);
        config.authentication(AuthMethod::sql_server(&self.user, &self.password));
        if self.encrypt {
            config.encryption(EncryptionLevel::Required);
            if self.trust_server_certificate {
                config.trust_cert();
            }
        } else {
            config.encryption(EncryptionLevel::Off);
            config.trust_cert();
        }

        Ok(config)
    }

    /// ADO-style connection string with the password masked.
    pub fn ado_string(&self) -> String {
        let password = if self.password.is_empty() {
            ""
        } else {
            PASSWORD_MASK
        };
        format!(
            "Server={};Database={};User Id={};Password={};Encrypt={};TrustServerCertificate={}",
            self.server,
            self.database,
            self.user,
            password,
            self.encrypt,
            self.trust_server_certificate
        )
    }
}
