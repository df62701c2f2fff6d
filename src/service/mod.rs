pub mod catalog_loader;
pub mod endpoint_resolver;
pub mod orchestrator; // 批次编排与进度推送

pub use catalog_loader::{parse_catalog, CatalogLoader};
pub use endpoint_resolver::EndpointResolver;
pub use orchestrator::{
    AbortSignal, BalanceOrchestrator, BatchHandle, ResolutionUpdate, UpdateEvent,
};
