pub(crate) mod message;
pub(crate) mod udp_rx;
pub(crate) mod udp_tx;
