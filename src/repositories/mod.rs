//! 数据访问层
//!
//! 需要参与事务的写操作以关联函数形式提供，接收调用方事务中的 `&mut PgConnection`；
//! 独立的读操作直接使用连接池。

pub mod audit;
pub mod sample;
pub mod user;
pub mod work_item;

pub use audit::AuditRepository;
pub use sample::SampleRepository;
pub use user::UserRepository;
pub use work_item::WorkItemRepository;
