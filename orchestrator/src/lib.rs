#[macro_use]
extern crate tracing;

pub mod clock;
pub mod evaluator;
pub mod runner;
pub mod scheduler;
pub mod source;


pub use clock::{
    Clock,
    SystemClock,
};
pub use evaluator::{
    evaluate,
    Evaluation,
    SAMPLE_PAUSE,
};
pub use runner::Orchestrator;
pub use scheduler::{
    SchedulerState,
    WindowScheduler,
};
pub use source::CountsSource;
