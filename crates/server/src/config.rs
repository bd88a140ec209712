// crates/server/src/config.rs
//! Command-line and environment configuration for the `aria-deck` binary.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use aria_deck_observability::LogFormat;
use aria_deck_supervisor::{LaunchConfig, SupervisorConfig};
use clap::Parser;

/// Default port for the HTTP control surface.
pub const DEFAULT_PORT: u16 = 44444;

/// Default aria2 RPC port (aria2's own default).
pub const DEFAULT_RPC_PORT: u16 = 6800;

#[derive(Debug, Clone, Parser)]
#[command(name = "aria-deck", version, about = "HTTP control surface for a supervised aria2c worker")]
pub struct Config {
    /// HTTP port. Falls back to $PORT, then 44444.
    #[arg(long, env = "ARIA_DECK_PORT")]
    pub port: Option<u16>,

    /// Address the HTTP listener binds to.
    #[arg(long, env = "ARIA_DECK_BIND", default_value_t = IpAddr::V4(Ipv4Addr::LOCALHOST))]
    pub bind: IpAddr,

    /// aria2c executable.
    #[arg(long, env = "ARIA_DECK_ARIA2_BIN", default_value = "aria2c")]
    pub aria2_bin: String,

    /// Local port aria2c serves JSON-RPC on.
    #[arg(long, env = "ARIA_DECK_RPC_PORT", default_value_t = DEFAULT_RPC_PORT)]
    pub rpc_port: u16,

    /// Shared RPC secret. A random one is generated when unset.
    #[arg(long, env = "ARIA_DECK_RPC_SECRET", hide_env_values = true)]
    pub rpc_secret: Option<String>,

    /// Per-call RPC timeout in milliseconds.
    #[arg(long, env = "ARIA_DECK_RPC_TIMEOUT_MS", default_value_t = 3000)]
    pub rpc_timeout_ms: u64,

    /// Delay before relaunching aria2c after a failed start or a crash.
    #[arg(long, env = "ARIA_DECK_RESTART_DELAY_MS", default_value_t = 1000)]
    pub restart_delay_ms: u64,

    /// How long to wait for aria2c to exit after aria2.shutdown before
    /// killing it. 0 waits forever.
    #[arg(long, env = "ARIA_DECK_SHUTDOWN_TIMEOUT_SECS", default_value_t = 30)]
    pub shutdown_timeout_secs: u64,

    /// Forward aria2c's stdout/stderr instead of discarding them.
    #[arg(long, env = "ARIA_DECK_WORKER_OUTPUT", default_value_t = false)]
    pub worker_output: bool,

    /// Log output format: pretty or json.
    #[arg(long, env = "ARIA_DECK_LOG_FORMAT", default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

impl Config {
    /// Resolved HTTP port: `--port`/`ARIA_DECK_PORT`, then `PORT`, then the default.
    pub fn port(&self) -> u16 {
        self.port
            .or_else(|| std::env::var("PORT").ok().and_then(|p| p.parse().ok()))
            .unwrap_or(DEFAULT_PORT)
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port())
    }

    pub fn rpc_url(&self) -> String {
        format!("http://127.0.0.1:{}/jsonrpc", self.rpc_port)
    }

    /// The configured secret, or a fresh random one. Call once per process.
    pub fn resolve_secret(&self) -> String {
        match self.rpc_secret.as_deref() {
            Some(s) if !s.is_empty() => s.to_string(),
            _ => uuid::Uuid::new_v4().simple().to_string(),
        }
    }

    pub fn rpc_timeout(&self) -> Duration {
        Duration::from_millis(self.rpc_timeout_ms)
    }

    pub fn launch_config(&self, secret: &str) -> LaunchConfig {
        LaunchConfig {
            binary: self.aria2_bin.clone(),
            rpc_port: self.rpc_port,
            rpc_secret: secret.to_string(),
            inherit_output: self.worker_output,
        }
    }

    pub fn supervisor_config(&self) -> SupervisorConfig {
        SupervisorConfig {
            restart_delay: Duration::from_millis(self.restart_delay_ms),
            shutdown_timeout: (self.shutdown_timeout_secs > 0)
                .then(|| Duration::from_secs(self.shutdown_timeout_secs)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Config {
        Config::try_parse_from(std::iter::once("aria-deck").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = parse(&[]);
        assert_eq!(config.rpc_port, 6800);
        assert_eq!(config.rpc_url(), "http://127.0.0.1:6800/jsonrpc");
        assert_eq!(config.rpc_timeout(), Duration::from_secs(3));
        assert_eq!(config.aria2_bin, "aria2c");
        assert_eq!(config.log_format, LogFormat::Pretty);

        let sup = config.supervisor_config();
        assert_eq!(sup.restart_delay, Duration::from_secs(1));
        assert_eq!(sup.shutdown_timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_zero_shutdown_timeout_waits_forever() {
        let config = parse(&["--shutdown-timeout-secs", "0"]);
        assert_eq!(config.supervisor_config().shutdown_timeout, None);
    }

    #[test]
    fn test_explicit_port_and_bind() {
        let config = parse(&["--port", "8080", "--bind", "0.0.0.0"]);
        assert_eq!(config.listen_addr(), "0.0.0.0:8080".parse().unwrap());
    }

    #[test]
    fn test_secret_resolution() {
        let config = parse(&["--rpc-secret", "hunter2"]);
        assert_eq!(config.resolve_secret(), "hunter2");

        let config = parse(&[]);
        let a = config.resolve_secret();
        let b = config.resolve_secret();
        assert_eq!(a.len(), 32);
        assert_ne!(a, b);
    }

    #[test]
    fn test_launch_config_uses_secret_and_port() {
        let config = parse(&["--rpc-port", "6900", "--aria2-bin", "/opt/aria2c"]);
        let launch = config.launch_config("s3cret");
        assert_eq!(launch.binary, "/opt/aria2c");
        assert!(launch.args().contains(&"--rpc-listen-port=6900".to_string()));
        assert!(launch.args().contains(&"--rpc-secret=s3cret".to_string()));
    }

    #[test]
    fn test_json_log_format() {
        let config = parse(&["--log-format", "json"]);
        assert_eq!(config.log_format, LogFormat::Json);
    }
}
