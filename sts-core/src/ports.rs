mod cache;
mod source;

pub use cache::CacheRepository;
pub use source::ProductSource;
