pub mod error;
pub mod ids;
pub mod jsonld;
pub mod ozon;
pub mod snapshot;
pub mod text;
pub mod wildberries;

pub use error::ScrapeError;
pub use ozon::api::{OzonClient, OzonConfig};
pub use ozon::crawl::{collect_page_prices, CrawlOptions, PageError, RenderedPage};
pub use ozon::widget::{extract_widget_prices, is_out_of_stock};
pub use snapshot::{parse_dir, parse_file};
pub use wildberries::{WbClient, WbConfig};
