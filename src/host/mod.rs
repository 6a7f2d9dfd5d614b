//! Host capabilities: processes, privileges, PATH and filesystem
//!
//! Everything the lifecycle commands need from the operating system goes
//! through the traits in this module, so commands can run against fakes.

pub mod detached;
pub mod fs;
pub mod path_env;
pub mod probes;
pub mod process;

pub use detached::DetachedTask;
pub use fs::{FileSystem, LocalFs};
pub use path_env::{PathChange, PathEnvironment, PathManager, ProfileScriptPath, WindowsMachinePath};
pub use probes::{tool_available, HostPrivilege, PrivilegeProbe};
pub use process::{ProcessInvocation, ProcessRunner, SystemRunner};
