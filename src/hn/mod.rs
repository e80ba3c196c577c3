mod client;

pub use client::HnClient;
