pub mod context;
pub mod cookie;
pub mod http_value;
pub mod meta;
pub mod request;
pub mod response;
