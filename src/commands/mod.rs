pub mod commit;
pub mod config;
pub mod init;
pub mod notes;
pub mod stage;
pub mod status;
pub mod sync;

pub use commit::*;
pub use config::*;
pub use init::*;
pub use notes::*;
pub use stage::*;
pub use status::*;
pub use sync::*;
