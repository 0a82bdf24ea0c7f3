//! In-memory repository implementations.

mod assignment;
mod permission;
mod user;

pub use assignment::MemoryAssignmentRepository;
pub use permission::MemoryPermissionRepository;
pub use user::MemoryUserRepository;
