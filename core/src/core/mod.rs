pub mod cancel;
pub mod context;
pub mod stage;

pub use cancel::Cancellation;
pub use context::Context;
pub use stage::Stage;
