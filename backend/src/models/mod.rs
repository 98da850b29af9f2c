pub mod macros;

pub mod course;
pub mod eligibility;
pub mod progress;
pub mod reward;
pub mod schedule;
pub mod time;

pub use course::*;
pub use eligibility::*;
pub use progress::*;
pub use reward::*;
pub use schedule::*;
pub use time::*;
