mod rate_limit;

pub use rate_limit::{IpRateLimit, client_ip, rate_limit};
