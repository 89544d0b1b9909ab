mod http_client;
mod network;
mod wifi_sta;

pub use http_client::{HttpClientError, TcpHttpClient};
pub use network::{init_network_stack, resolve_host};
pub use wifi_sta::EspWifiInterface;
