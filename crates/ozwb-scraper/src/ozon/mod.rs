//! Ozon adapters: the composer API client, rendered-page widget parsing,
//! and the crawl loop driving a rendering transport.

pub mod api;
pub mod crawl;
pub mod widget;
