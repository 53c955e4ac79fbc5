pub mod html_document;
pub mod http_client;

pub use html_document::parse_html;
pub use http_client::{FetchedPage, FormHttpClient, FormTransport, SubmitResponse};
