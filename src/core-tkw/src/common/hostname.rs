use std::net::SocketAddr;

/// Gets the host:port from the env vars HOST and PORT.
/// Uses defaults `127.0.0.1:3000` if env vars are empty.
pub fn get_api_base_url() -> Result<SocketAddr, HostPortError> {
    let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = std::env::var("PORT").ok();
    parse_host_port(&host, port.as_deref())
}

fn parse_host_port(host: &str, port: Option<&str>) -> Result<SocketAddr, HostPortError> {
    let port = match port {
        Some(p) => p.trim().parse::<u16>()?,
        None => 3000,
    };
    Ok(format!("{}:{}", host.trim(), port).parse::<SocketAddr>()?)
}

#[derive(Debug, thiserror::Error)]
pub enum HostPortError {
    #[error("Invalid port: {0}")]
    InvalidPort(#[from] std::num::ParseIntError),
    #[error("Invalid hostname: {0}")]
    InvalidHostname(#[from] std::net::AddrParseError),
}
