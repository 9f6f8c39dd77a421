pub mod tokio_channel;
pub mod webhook_reqwest;
