// 服务层模块
pub mod account;
pub mod audit;
pub mod hooks;
pub mod notify;
pub mod ownership;
pub mod samples;
pub mod work_items;

pub use account::AccountService;
pub use audit::{AuditRecorder, REGISTERED_ACTION};
pub use hooks::{SampleEvent, SampleHook, SampleHookChain, UserHook, UserHookChain};
pub use notify::{SignupNotice, SignupNotifier};
pub use ownership::OwnershipGuard;
pub use samples::SampleService;
pub use work_items::WorkItemService;
