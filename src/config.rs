//! Startup configuration.
//!
//! Values come from the command line, optionally layered over a YAML file,
//! and are frozen into a [`Config`] before the server binds.

use anyhow::{Context, Result, bail};
use clap::{CommandFactory, Parser};
use serde::Deserialize;
use std::ffi::OsString;
use std::net::{Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

pub const DEFAULT_PORT: u16 = 10000;
pub const DEFAULT_BACKEND_PORT: u16 = 20000;

/// Command line flags.
///
/// Every value is optional here so that a config file can fill in whatever
/// the command line leaves out.
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "fake-grpclb", version, about = "Fake grpclb balancer that always returns one loopback backend")]
pub struct Args {
    /// The server port
    #[arg(long)]
    pub port: Option<u16>,

    /// The backend server port
    #[arg(long = "backend_port")]
    pub backend_port: Option<u16>,

    /// Run the server with insecure (plaintext) credentials
    #[arg(
        long,
        visible_alias = "debug_mode",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    pub insecure: Option<bool>,

    /// PEM certificate presented to clients in secure mode
    #[arg(long = "tls_cert")]
    pub tls_cert: Option<PathBuf>,

    /// PEM private key for --tls_cert
    #[arg(long = "tls_key")]
    pub tls_key: Option<PathBuf>,

    /// PEM CA bundle used to authenticate clients in secure mode
    #[arg(long = "tls_client_ca")]
    pub tls_client_ca: Option<PathBuf>,

    /// Optional YAML config file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Shape of the optional YAML config file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub port: Option<u16>,
    pub backend_port: Option<u16>,
    pub insecure: Option<bool>,
    pub tls: Option<FileTlsConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileTlsConfig {
    pub cert: Option<PathBuf>,
    pub key: Option<PathBuf>,
    pub client_ca: Option<PathBuf>,
}

/// Locations of the PEM material for mutual TLS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsPaths {
    pub cert: PathBuf,
    pub key: PathBuf,
    pub client_ca: PathBuf,
}

/// How connections to the balancer are secured. Chosen once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportSecurity {
    /// Plaintext HTTP/2, for debugging and local test harnesses.
    Insecure,
    /// TLS with mandatory client certificates.
    MutualTls(TlsPaths),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    pub backend_port: u16,
    pub security: TransportSecurity,
}

impl Config {
    /// Build the config from the process arguments. `--help`, `--version` and
    /// usage errors exit the process the way clap normally does.
    pub fn load() -> Result<Self> {
        Self::from_parsed(Args::parse_from(normalize_flag_syntax(std::env::args_os())))
    }

    /// Build the config from an explicit argument list (first item is the
    /// program name).
    pub fn from_args<I, T>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Self::from_parsed(Args::try_parse_from(normalize_flag_syntax(args))?)
    }

    fn from_parsed(args: Args) -> Result<Self> {
        let file = match &args.config {
            Some(path) => FileConfig::from_path(path)?,
            None => FileConfig::default(),
        };
        Self::resolve(args, file)
    }

    /// Merge command line and file values; the command line wins.
    pub fn resolve(args: Args, file: FileConfig) -> Result<Self> {
        let file_tls = file.tls.unwrap_or_default();

        let port = args.port.or(file.port).unwrap_or(DEFAULT_PORT);
        let backend_port = args
            .backend_port
            .or(file.backend_port)
            .unwrap_or(DEFAULT_BACKEND_PORT);
        let insecure = args.insecure.or(file.insecure).unwrap_or(false);

        let security = if insecure {
            TransportSecurity::Insecure
        } else {
            let cert = args.tls_cert.or(file_tls.cert);
            let key = args.tls_key.or(file_tls.key);
            let client_ca = args.tls_client_ca.or(file_tls.client_ca);

            match (cert, key, client_ca) {
                (Some(cert), Some(key), Some(client_ca)) => {
                    TransportSecurity::MutualTls(TlsPaths { cert, key, client_ca })
                }
                _ => bail!(
                    "secure mode needs --tls_cert, --tls_key and --tls_client_ca \
                     (pass --insecure to serve plaintext)"
                ),
            }
        };

        Ok(Self {
            port,
            backend_port,
            security,
        })
    }

    /// Address the balancer listens on: every IPv4 interface.
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
    }

    pub fn is_insecure(&self) -> bool {
        matches!(self.security, TransportSecurity::Insecure)
    }
}

impl FileConfig {
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_yaml(&raw)
            .with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn from_yaml(raw: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(raw)?)
    }
}

/// Rewrite Go-style single-dash long flags (`-port=10000`, `-insecure`) into
/// the double-dash form clap expects. Only names of known long flags are
/// rewritten, and nothing after a `--` terminator is touched.
pub fn normalize_flag_syntax<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let command = Args::command();
    let mut known: Vec<&str> = command
        .get_arguments()
        .filter_map(|arg| arg.get_long_and_visible_aliases())
        .flatten()
        .collect();
    known.extend(["help", "version"]);

    let mut terminated = false;
    args.into_iter()
        .enumerate()
        .map(|(i, arg)| {
            let arg: OsString = arg.into();
            if i == 0 || terminated {
                return arg;
            }
            if arg == "--" {
                terminated = true;
                return arg;
            }
            if !arg.to_str().is_some_and(|s| is_go_style_flag(s, &known)) {
                return arg;
            }
            let mut long = OsString::from("-");
            long.push(&arg);
            long
        })
        .collect()
}

fn is_go_style_flag(arg: &str, known: &[&str]) -> bool {
    let Some(rest) = arg.strip_prefix('-') else {
        return false;
    };
    if rest.starts_with('-') {
        return false;
    }
    let name = rest.split_once('=').map_or(rest, |(name, _)| name);
    known.contains(&name)
}
